//! Easing curves
//!
//! Every curve maps linear progress `t` in `[0, 1]` to eased progress, with
//! `apply(0.0) == 0.0` and `apply(1.0) == 1.0`. Elastic curves overshoot in
//! between.

use std::f32::consts::PI;

/// Easing function applied to a tween's progress
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    /// Cubic ease-in
    EaseIn,
    /// Cubic ease-out
    EaseOut,
    /// Cubic ease-in-out
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    /// Quadratic ease-in-out, the gentle "power1" curve
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    /// Exponentially decaying sine that settles on 1.0
    ///
    /// `amplitude` below 1.0 shortens the period instead of lowering the peak.
    ElasticOut { amplitude: f32, period: f32 },
}

impl Easing {
    /// Elastic ease-out used by the bouncy carousel profile
    pub const fn elastic() -> Self {
        Easing::ElasticOut {
            amplitude: 0.6,
            period: 0.9,
        }
    }

    /// Map linear progress to eased progress
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn | Easing::EaseInCubic => t * t * t,
            Easing::EaseOut | Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::ElasticOut { amplitude, period } => elastic_out(t, amplitude, period),
        }
    }
}

fn elastic_out(t: f32, amplitude: f32, period: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let a = amplitude.max(1.0);
    let p = period.max(f32::EPSILON) / amplitude.clamp(f32::EPSILON, 1.0);
    let shift = p / (2.0 * PI) * (1.0 / a).asin();
    a * 2f32.powf(-10.0 * t) * ((t - shift) * 2.0 * PI / p).sin() + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 10] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::elastic(),
    ];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-5, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-5, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_clamps_input() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::EaseOutQuad.apply(2.0), 1.0);
    }

    #[test]
    fn test_in_out_symmetry() {
        let e = Easing::EaseInOutQuad;
        assert!((e.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((e.apply(0.25) + e.apply(0.75) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_elastic_overshoots_then_settles() {
        let e = Easing::elastic();
        let peak = (1..100)
            .map(|i| e.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
        assert!((e.apply(0.99) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_monotonic_polynomials() {
        for easing in &ALL[..9] {
            let mut prev = 0.0;
            for i in 1..=20 {
                let v = easing.apply(i as f32 / 20.0);
                assert!(v >= prev - 1e-6, "{easing:?} not monotonic");
                prev = v;
            }
        }
    }
}
