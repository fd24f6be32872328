//! Spring physics
//!
//! RK4-integrated damped springs. The carousel uses a critically damped
//! spring to pull a released card back onto its slot without overshoot.

/// Stiffness, damping and mass of a spring
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Damping set exactly to the critical value: fastest settle, no overshoot
    pub fn critically_damped(stiffness: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping: 2.0 * (stiffness * mass).sqrt(),
            mass,
        }
    }

    /// Snappy with a hint of overshoot
    pub fn stiff() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    /// Pointer release feel: quick, no bounce
    pub fn release() -> Self {
        Self::critically_damped(500.0, 1.0)
    }

}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::stiff()
    }
}

/// A spring-driven scalar
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    /// Position tolerance for settling, in value units
    pub const SETTLE_EPSILON: f32 = 0.5;
    /// Velocity tolerance for settling, in value units per second
    pub const SETTLE_VELOCITY: f32 = 5.0;
    /// Longest single integration step, in seconds
    pub const MAX_STEP: f32 = 1.0 / 60.0;

    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Retarget; current velocity is kept so interruptions stay smooth
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to a value with no motion (used while a pointer is driving it 1:1)
    pub fn snap(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < Self::SETTLE_EPSILON
            && self.velocity.abs() < Self::SETTLE_VELOCITY
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Long frames are split into sub-steps of at most [`Self::MAX_STEP`];
    /// a single RK4 step over a stall diverges for stiff springs.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        let steps = (dt / Self::MAX_STEP).ceil().max(1.0);
        let sub = dt / steps;
        for _ in 0..steps as u32 {
            if self.is_settled() {
                break;
            }
            self.integrate(sub);
        }

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    fn integrate(&mut self, dt: f32) {
        let half = dt * 0.5;

        let k1_x = self.velocity;
        let k1_v = self.acceleration(self.value, self.velocity);

        let k2_x = self.velocity + k1_v * half;
        let k2_v = self.acceleration(self.value + k1_x * half, k2_x);

        let k3_x = self.velocity + k2_v * half;
        let k3_v = self.acceleration(self.value + k2_x * half, k3_x);

        let k4_x = self.velocity + k3_v * dt;
        let k4_v = self.acceleration(self.value + k3_x * dt, k4_x);

        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;
        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_spring_returns_to_zero() {
        let mut spring = Spring::new(SpringConfig::release(), 150.0);
        spring.set_target(0.0);

        for _ in 0..120 {
            spring.step(1.0 / 60.0);
        }

        assert!(spring.is_settled());
        assert_eq!(spring.value(), 0.0);
    }

    #[test]
    fn test_critically_damped_never_overshoots() {
        let mut spring = Spring::new(SpringConfig::release(), 200.0);
        spring.set_target(0.0);

        for _ in 0..240 {
            spring.step(1.0 / 120.0);
            assert!(spring.value() >= -Spring::SETTLE_EPSILON);
        }
    }

    #[test]
    fn test_retarget_keeps_velocity() {
        let mut spring = Spring::new(SpringConfig::new(180.0, 12.0, 1.0), 0.0);
        spring.set_target(100.0);
        for _ in 0..10 {
            spring.step(1.0 / 60.0);
        }

        let velocity = spring.velocity();
        assert!(velocity > 0.0);

        spring.set_target(50.0);
        assert_eq!(spring.velocity(), velocity);
    }

    #[test]
    fn test_snap_clears_motion() {
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(100.0);
        spring.step(1.0 / 60.0);

        spring.snap(42.0);
        assert_eq!(spring.value(), 42.0);
        assert_eq!(spring.velocity(), 0.0);
        assert!(spring.is_settled());
    }

    #[test]
    fn test_presets_damping_class() {
        let critical = |c: SpringConfig| 2.0 * (c.stiffness * c.mass).sqrt();

        let stiff = SpringConfig::stiff();
        assert!(stiff.damping < critical(stiff));
        let release = SpringConfig::release();
        assert!((release.damping - critical(release)).abs() < 1e-3);
    }

    #[test]
    fn test_stalled_frame_still_settles() {
        let mut spring = Spring::new(SpringConfig::release(), 60.0);
        spring.set_target(0.0);

        spring.step(1.0);
        assert!(spring.is_settled());
        assert_eq!(spring.value(), 0.0);

        // a multi-second stall stops integrating once settled
        spring.set_target(300.0);
        spring.step(3_600.0);
        assert_eq!(spring.value(), 300.0);
    }

    #[test]
    fn test_large_steps_stay_bounded() {
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(1000.0);

        for _ in 0..100 {
            spring.step(0.1);
            assert!(spring.value() < 2000.0);
            assert!(spring.value() > -500.0);
        }
    }
}
