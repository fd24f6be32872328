//! Drag gesture on the front card
//!
//! While the pointer is down the card follows it 1:1 horizontally and by
//! `vertical_factor` vertically. On release a critically damped spring pulls
//! the offset back to zero whether or not the release triggered a swap.

use crate::config::DragConfig;
use crate::order::CardId;
use deckswap_animation::{AnimatedValue, SchedulerHandle, SpringConfig};
use deckswap_core::Point;

/// Whether a release should rotate the carousel
///
/// Either gate is enough; both tripping still means one rotation.
pub fn release_triggers_swap(config: &DragConfig, displacement: Point, velocity: Point) -> bool {
    velocity.x.abs() > config.velocity_threshold
        || displacement.x.abs() > config.distance_threshold
}

/// Spring-backed pointer offset attached to one card
#[derive(Debug)]
pub(crate) struct DragOffset {
    config: DragConfig,
    card: Option<CardId>,
    dragging: bool,
    x: AnimatedValue,
    y: AnimatedValue,
}

impl DragOffset {
    pub(crate) fn new(handle: SchedulerHandle, config: DragConfig) -> Self {
        Self {
            config,
            card: None,
            dragging: false,
            x: AnimatedValue::new(handle.clone(), 0.0, SpringConfig::release()),
            y: AnimatedValue::new(handle, 0.0, SpringConfig::release()),
        }
    }

    /// Card currently carrying an offset, if any
    pub(crate) fn card(&self) -> Option<CardId> {
        self.card
    }

    pub(crate) fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Follow the pointer on `card`
    ///
    /// Returns false while another card still carries an offset. That card is
    /// let go and the pointer is ignored until it is home.
    pub(crate) fn follow(&mut self, card: CardId, displacement: Point) -> bool {
        if self.card.is_some_and(|c| c != card) {
            self.let_go();
            if !self.is_home() {
                return false;
            }
        }
        self.card = Some(card);
        self.dragging = true;
        self.x.set_immediate(displacement.x);
        self.y
            .set_immediate(displacement.y * self.config.vertical_factor);
        true
    }

    /// Let go and spring home; returns whether the release should swap
    pub(crate) fn release(&mut self, displacement: Point, velocity: Point) -> bool {
        self.let_go();
        release_triggers_swap(&self.config, displacement, velocity)
    }

    fn let_go(&mut self) {
        self.dragging = false;
        self.x.set_target(0.0);
        self.y.set_target(0.0);
    }

    fn is_home(&self) -> bool {
        !self.x.is_animating() && !self.y.is_animating() && self.offset() == Point::ZERO
    }

    /// Current offset
    pub(crate) fn offset(&self) -> Point {
        Point::new(self.x.get(), self.y.get())
    }

    /// Forget the attached card once it is home
    pub(crate) fn clear_if_settled(&mut self) {
        if !self.dragging && self.is_home() {
            self.card = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckswap_animation::AnimationScheduler;

    #[test]
    fn test_displacement_alone_triggers() {
        let config = DragConfig::default();
        assert!(release_triggers_swap(
            &config,
            Point::new(150.0, 0.0),
            Point::new(0.05, 0.0)
        ));
        assert!(release_triggers_swap(
            &config,
            Point::new(-150.0, 0.0),
            Point::ZERO
        ));
    }

    #[test]
    fn test_velocity_alone_triggers() {
        let config = DragConfig::default();
        assert!(release_triggers_swap(
            &config,
            Point::new(20.0, 0.0),
            Point::new(-0.5, 0.0)
        ));
    }

    #[test]
    fn test_vertical_motion_never_triggers() {
        let config = DragConfig::default();
        assert!(!release_triggers_swap(
            &config,
            Point::new(10.0, 400.0),
            Point::new(0.0, 3.0)
        ));
    }

    #[test]
    fn test_offset_follows_then_springs_home() {
        let scheduler = AnimationScheduler::new();
        let mut drag = DragOffset::new(scheduler.handle(), DragConfig::default());

        assert!(drag.follow(CardId(0), Point::new(80.0, 40.0)));
        assert_eq!(drag.offset(), Point::new(80.0, 10.0));
        assert!(drag.is_dragging());

        assert!(!drag.release(Point::new(80.0, 40.0), Point::new(0.1, 0.0)));
        for _ in 0..120 {
            scheduler.tick_by(1000.0 / 60.0);
        }
        assert_eq!(drag.offset(), Point::ZERO);

        drag.clear_if_settled();
        assert_eq!(drag.card(), None);
    }

    #[test]
    fn test_new_card_waits_for_abandoned_one() {
        let scheduler = AnimationScheduler::new();
        let mut drag = DragOffset::new(scheduler.handle(), DragConfig::default());
        assert!(drag.follow(CardId(0), Point::new(30.0, 0.0)));

        assert!(!drag.follow(CardId(1), Point::new(5.0, 0.0)));
        assert_eq!(drag.card(), Some(CardId(0)));
        assert!(!drag.is_dragging());
        assert_eq!(drag.offset(), Point::new(30.0, 0.0));

        for _ in 0..60 {
            scheduler.tick_by(1000.0 / 60.0);
        }
        assert_eq!(drag.offset(), Point::ZERO);

        assert!(drag.follow(CardId(1), Point::new(5.0, 0.0)));
        assert_eq!(drag.card(), Some(CardId(1)));
        assert_eq!(drag.offset(), Point::new(5.0, 0.0));
    }
}
