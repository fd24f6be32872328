//! Compound rotation timeline
//!
//! One rotation moves the front card to the back in three overlapping phases:
//!
//! 1. **drop** - the front card falls by [`DROP_DISTANCE`]
//! 2. **promote** - starting part-way through the drop, every other card moves
//!    one slot forward, staggered by [`PROMOTE_STAGGER_MS`]
//! 3. **return** - shortly after promotion begins, the dropped card jumps to
//!    the back slot's x/z and stacking order, then eases up into it
//!
//! The timeline ends with [`ROTATION_DONE`]; the engine rotates its order only
//! when that cue fires.

use crate::config::{CarouselConfig, DROP_DISTANCE, PROMOTE_STAGGER_MS};
use crate::order::Order;
use crate::slot::Slot;
use deckswap_animation::{Position, Timeline};
use deckswap_core::{CardTransform, Property};

/// Cue emitted once every phase has finished
pub const ROTATION_DONE: u32 = 1;

const PROMOTE: &str = "promote";
const RETURN: &str = "return";

/// Build the timeline for rotating `order` once
///
/// `placements` holds the current transform of every card, indexed by card id.
/// Returns `None` for fewer than two cards.
pub fn build_rotation(
    order: &Order,
    placements: &[CardTransform],
    config: &CarouselConfig,
) -> Option<Timeline> {
    if order.len() < 2 {
        return None;
    }

    let total = order.len();
    let timing = config.timing();
    let mut timeline = Timeline::new();

    for card in order.iter() {
        let current = placements.get(card.index()).copied().unwrap_or_default();
        for property in Property::ALL {
            timeline.seed(card.track(property), current.get(property));
        }
    }

    let front = order.front()?;
    let front_y = timeline.value(front.track(Property::Y)).unwrap_or(0.0);
    timeline.to(
        front.track(Property::Y),
        front_y + DROP_DISTANCE,
        timing.drop_ms,
        timing.easing,
        Position::End,
    );

    timeline.add_label(
        PROMOTE,
        Position::FromEnd(-timing.drop_ms * timing.promote_overlap),
    );
    for (depth, card) in order.iter().skip(1).enumerate() {
        let slot = Slot::at(depth, total, config);
        timeline.set(
            card.track(Property::ZIndex),
            slot.z_index as f32,
            Position::label(PROMOTE),
        );

        let at = Position::label_offset(PROMOTE, depth as f32 * PROMOTE_STAGGER_MS);
        for (property, value) in [
            (Property::X, slot.x),
            (Property::Y, slot.y),
            (Property::Z, slot.z),
            (Property::Scale, slot.scale),
        ] {
            timeline.to(
                card.track(property),
                value,
                timing.move_ms,
                timing.easing,
                at.clone(),
            );
        }
    }

    let back = Slot::at(total - 1, total, config);
    timeline.add_label(
        RETURN,
        Position::label_offset(PROMOTE, timing.move_ms * timing.return_delay),
    );
    timeline.set(
        front.track(Property::ZIndex),
        back.z_index as f32,
        Position::label(RETURN),
    );
    timeline.set(front.track(Property::X), back.x, Position::label(RETURN));
    timeline.set(front.track(Property::Z), back.z, Position::label(RETURN));
    timeline.to(
        front.track(Property::Y),
        back.y,
        timing.return_ms,
        timing.easing,
        Position::label(RETURN),
    );
    timeline.to(
        front.track(Property::Scale),
        back.scale,
        timing.return_ms,
        timing.easing,
        Position::label(RETURN),
    );

    timeline.cue(ROTATION_DONE, Position::End);
    Some(timeline)
}
