//! Animation scheduler
//!
//! Owns every active spring and timeline and advances them each frame.
//! Components never hold animation state directly; they register it through
//! a [`SchedulerHandle`] and keep an RAII wrapper:
//! - [`AnimatedValue`] - a spring-driven scalar
//! - [`AnimatedTimeline`] - a registered [`Timeline`] whose events the owner drains
//!
//! The scheduler is shared behind `Arc<Mutex<_>>`; handles hold a `Weak`
//! reference, so a component outliving its scheduler degrades to no-ops.

use crate::spring::{Spring, SpringConfig};
use crate::timeline::{EventBatch, Timeline};
use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Instant;

new_key_type! {
    /// Handle to a registered spring
    pub struct SpringId;
    /// Handle to a registered timeline
    pub struct TimelineId;
}

struct SchedulerInner {
    springs: SlotMap<SpringId, Spring>,
    timelines: SlotMap<TimelineId, Timeline>,
    last_frame: Instant,
}

impl SchedulerInner {
    fn step(&mut self, dt_ms: f32) -> bool {
        let dt = dt_ms / 1000.0;

        for (_, spring) in self.springs.iter_mut() {
            spring.step(dt);
        }

        for (_, timeline) in self.timelines.iter_mut() {
            timeline.tick(dt_ms);
        }

        // Finished entries stay registered until their wrapper drops so the
        // owner can still drain the final events.
        self.has_active()
    }

    fn has_active(&self) -> bool {
        self.springs.iter().any(|(_, s)| !s.is_settled())
            || self.timelines.iter().any(|(_, t)| t.is_playing())
    }
}

fn lock(inner: &Mutex<SchedulerInner>) -> MutexGuard<'_, SchedulerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ticks all registered springs and timelines
///
/// Typically created once by whatever owns the frame loop, which then calls
/// [`tick`](Self::tick) (wall clock) or [`tick_by`](Self::tick_by)
/// (fixed step) once per frame.
///
/// ```rust
/// use deckswap_animation::{AnimatedValue, AnimationScheduler, SpringConfig};
///
/// let scheduler = AnimationScheduler::new();
/// let mut offset = AnimatedValue::new(scheduler.handle(), 120.0, SpringConfig::release());
/// offset.set_target(0.0);
///
/// for _ in 0..120 {
///     scheduler.tick_by(1000.0 / 60.0);
/// }
/// assert_eq!(offset.get(), 0.0);
/// ```
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                springs: SlotMap::with_key(),
                timelines: SlotMap::with_key(),
                last_frame: Instant::now(),
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Tick using the wall-clock time since the previous tick
    ///
    /// Returns true if any animation is still active.
    pub fn tick(&self) -> bool {
        let mut inner = lock(&self.inner);
        let now = Instant::now();
        let dt_ms = (now - inner.last_frame).as_secs_f32() * 1000.0;
        inner.last_frame = now;
        inner.step(dt_ms)
    }

    /// Tick by a fixed step in milliseconds
    ///
    /// Returns true if any animation is still active.
    pub fn tick_by(&self, dt_ms: f32) -> bool {
        let mut inner = lock(&self.inner);
        inner.last_frame = Instant::now();
        inner.step(dt_ms)
    }

    pub fn spring_count(&self) -> usize {
        lock(&self.inner).springs.len()
    }

    pub fn timeline_count(&self) -> usize {
        lock(&self.inner).timelines.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("AnimationScheduler")
            .field("springs", &inner.springs.len())
            .field("timelines", &inner.timelines.len())
            .finish()
    }
}

/// A weak handle to the animation scheduler
///
/// Every operation is a no-op (or returns `None`) once the scheduler is gone.
#[derive(Clone, Debug)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    fn with_inner<R>(&self, f: impl FnOnce(&mut SchedulerInner) -> R) -> Option<R> {
        self.inner.upgrade().map(|inner| f(&mut lock(&inner)))
    }

    // =========================================================================
    // Spring Operations
    // =========================================================================

    pub fn register_spring(&self, spring: Spring) -> Option<SpringId> {
        self.with_inner(|inner| inner.springs.insert(spring))
    }

    pub fn set_spring_target(&self, id: SpringId, target: f32) {
        self.with_inner(|inner| {
            if let Some(spring) = inner.springs.get_mut(id) {
                spring.set_target(target);
            }
        });
    }

    pub fn snap_spring(&self, id: SpringId, value: f32) {
        self.with_inner(|inner| {
            if let Some(spring) = inner.springs.get_mut(id) {
                spring.snap(value);
            }
        });
    }

    pub fn get_spring_value(&self, id: SpringId) -> Option<f32> {
        self.with_inner(|inner| inner.springs.get(id).map(|s| s.value()))
            .flatten()
    }

    /// A missing spring counts as settled
    pub fn is_spring_settled(&self, id: SpringId) -> bool {
        self.with_inner(|inner| inner.springs.get(id).map(|s| s.is_settled()))
            .flatten()
            .unwrap_or(true)
    }

    pub fn remove_spring(&self, id: SpringId) {
        self.with_inner(|inner| inner.springs.remove(id));
    }

    // =========================================================================
    // Timeline Operations
    // =========================================================================

    pub fn register_timeline(&self, timeline: Timeline) -> Option<TimelineId> {
        self.with_inner(|inner| inner.timelines.insert(timeline))
    }

    /// Run a closure against a registered timeline
    pub fn with_timeline<R>(&self, id: TimelineId, f: impl FnOnce(&mut Timeline) -> R) -> Option<R> {
        self.with_inner(|inner| inner.timelines.get_mut(id).map(f))
            .flatten()
    }

    pub fn remove_timeline(&self, id: TimelineId) -> Option<Timeline> {
        self.with_inner(|inner| inner.timelines.remove(id)).flatten()
    }
}

// ============================================================================
// Animated Value
// ============================================================================

/// A spring-animated scalar registered with the scheduler
///
/// The spring is created lazily on the first retarget and removed on drop.
#[derive(Debug)]
pub struct AnimatedValue {
    handle: SchedulerHandle,
    spring_id: Option<SpringId>,
    config: SpringConfig,
    current: f32,
    target: f32,
}

impl AnimatedValue {
    pub fn new(handle: SchedulerHandle, initial: f32, config: SpringConfig) -> Self {
        Self {
            handle,
            spring_id: None,
            config,
            current: initial,
            target: initial,
        }
    }

    /// Animate toward `target`
    pub fn set_target(&mut self, target: f32) {
        self.target = target;

        match self.spring_id {
            Some(id) => self.handle.set_spring_target(id, target),
            None if (target - self.current).abs() > f32::EPSILON => {
                let mut spring = Spring::new(self.config, self.current);
                spring.set_target(target);
                self.spring_id = self.handle.register_spring(spring);
                if self.spring_id.is_none() {
                    self.current = target;
                }
            }
            None => {}
        }
    }

    /// Jump to `value` with no animation
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        if let Some(id) = self.spring_id {
            self.handle.snap_spring(id, value);
        }
    }

    pub fn get(&self) -> f32 {
        self.spring_id
            .and_then(|id| self.handle.get_spring_value(id))
            .unwrap_or(self.current)
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.spring_id
            .map(|id| !self.handle.is_spring_settled(id))
            .unwrap_or(false)
    }
}

impl Drop for AnimatedValue {
    fn drop(&mut self) {
        if let Some(id) = self.spring_id {
            self.handle.remove_spring(id);
        }
    }
}

// ============================================================================
// Animated Timeline
// ============================================================================

/// A timeline registered with the scheduler
///
/// Build the [`Timeline`] first, then register it. The scheduler advances it;
/// the owner drains its events after each tick. Dropping the wrapper removes
/// the timeline, discarding anything in flight.
#[derive(Debug)]
pub struct AnimatedTimeline {
    handle: SchedulerHandle,
    timeline_id: Option<TimelineId>,
}

impl AnimatedTimeline {
    pub fn register(handle: SchedulerHandle, timeline: Timeline) -> Self {
        let timeline_id = handle.register_timeline(timeline);
        Self {
            handle,
            timeline_id,
        }
    }

    /// Whether the scheduler accepted the timeline
    pub fn is_registered(&self) -> bool {
        self.timeline_id.is_some()
    }

    fn with<R: Default>(&self, f: impl FnOnce(&mut Timeline) -> R) -> R {
        self.timeline_id
            .and_then(|id| self.handle.with_timeline(id, f))
            .unwrap_or_default()
    }

    pub fn start(&self) {
        self.with(Timeline::start);
    }

    pub fn pause(&self) {
        self.with(Timeline::pause);
    }

    pub fn resume(&self) {
        self.with(Timeline::resume);
    }

    pub fn is_playing(&self) -> bool {
        self.with(|t| t.is_playing())
    }

    pub fn is_paused(&self) -> bool {
        self.with(|t| t.is_paused())
    }

    pub fn is_finished(&self) -> bool {
        self.with(|t| t.is_finished())
    }

    pub fn progress(&self) -> f32 {
        self.with(|t| t.progress())
    }

    pub fn duration_ms(&self) -> f32 {
        self.with(|t| t.duration_ms())
    }

    /// Take the events produced since the previous drain
    pub fn drain_events(&self) -> EventBatch {
        self.with(Timeline::drain_events)
    }
}

impl Drop for AnimatedTimeline {
    fn drop(&mut self) {
        if let Some(id) = self.timeline_id {
            self.handle.remove_timeline(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::timeline::{Position, TimelineEvent};
    use deckswap_core::{Property, TargetId, TrackKey};

    #[test]
    fn test_tick_by_moves_springs() {
        let scheduler = AnimationScheduler::new();
        let mut value = AnimatedValue::new(scheduler.handle(), 0.0, SpringConfig::stiff());
        assert!(!value.is_animating());

        value.set_target(100.0);
        assert!(value.is_animating());
        assert!(scheduler.tick_by(16.0));
        assert!(value.get() > 0.0);
    }

    #[test]
    fn test_one_second_tick_settles_release_spring() {
        let scheduler = AnimationScheduler::new();
        let mut offset = AnimatedValue::new(scheduler.handle(), 60.0, SpringConfig::release());
        offset.set_target(0.0);

        assert!(!scheduler.tick_by(1000.0));
        assert_eq!(offset.get(), 0.0);
        assert!(!offset.is_animating());
    }

    #[test]
    fn test_wall_clock_tick() {
        let scheduler = AnimationScheduler::new();
        let mut offset = AnimatedValue::new(scheduler.handle(), 60.0, SpringConfig::release());
        offset.set_target(0.0);

        std::thread::sleep(std::time::Duration::from_millis(20));
        scheduler.tick();
        let moved = offset.get();
        assert!(moved < 60.0);
        assert!(moved > -Spring::SETTLE_EPSILON);

        // long stall between frames
        std::thread::sleep(std::time::Duration::from_millis(300));
        scheduler.tick();
        std::thread::sleep(std::time::Duration::from_millis(800));
        assert!(!scheduler.tick());
        assert_eq!(offset.get(), 0.0);
    }

    #[test]
    fn test_spring_registered_lazily_and_removed_on_drop() {
        let scheduler = AnimationScheduler::new();
        {
            let mut value = AnimatedValue::new(scheduler.handle(), 5.0, SpringConfig::release());
            value.set_target(5.0);
            assert_eq!(scheduler.spring_count(), 0);

            value.set_target(0.0);
            assert_eq!(scheduler.spring_count(), 1);
        }
        assert_eq!(scheduler.spring_count(), 0);
    }

    #[test]
    fn test_set_immediate_snaps_registered_spring() {
        let scheduler = AnimationScheduler::new();
        let mut value = AnimatedValue::new(scheduler.handle(), 0.0, SpringConfig::release());
        value.set_target(50.0);
        scheduler.tick_by(16.0);

        value.set_immediate(-30.0);
        assert_eq!(value.get(), -30.0);
        assert!(!value.is_animating());
    }

    #[test]
    fn test_timeline_events_drained_by_owner() {
        let scheduler = AnimationScheduler::new();
        let key = TrackKey::new(TargetId(2), Property::Y);

        let mut timeline = Timeline::new();
        timeline.seed(key, 0.0);
        timeline.to(key, 100.0, 100.0, Easing::Linear, Position::End);

        let animated = AnimatedTimeline::register(scheduler.handle(), timeline);
        animated.start();
        assert!(animated.is_playing());
        assert_eq!(scheduler.timeline_count(), 1);

        assert!(scheduler.tick_by(50.0));
        assert!(!scheduler.tick_by(50.0));

        let events = animated.drain_events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2], TimelineEvent::Completed);
        assert!(animated.is_finished());

        drop(animated);
        assert_eq!(scheduler.timeline_count(), 0);
    }

    #[test]
    fn test_paused_timeline_is_not_active() {
        let scheduler = AnimationScheduler::new();
        let mut timeline = Timeline::new();
        timeline.cue(0, Position::At(100.0));
        let animated = AnimatedTimeline::register(scheduler.handle(), timeline);
        animated.start();
        animated.pause();

        assert!(!scheduler.tick_by(500.0));
        assert!(animated.is_paused());
        assert_eq!(animated.progress(), 0.0);
    }

    #[test]
    fn test_handle_outliving_scheduler() {
        let handle = {
            let scheduler = AnimationScheduler::new();
            scheduler.handle()
        };

        assert!(!handle.is_alive());
        assert!(handle
            .register_spring(Spring::new(SpringConfig::stiff(), 0.0))
            .is_none());

        let animated = AnimatedTimeline::register(handle.clone(), Timeline::new());
        assert!(!animated.is_registered());
        assert!(animated.drain_events().is_empty());

        let mut value = AnimatedValue::new(handle, 10.0, SpringConfig::stiff());
        value.set_target(0.0);
        assert_eq!(value.get(), 0.0);
    }
}
