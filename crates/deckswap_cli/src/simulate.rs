//! Headless carousel simulation
//!
//! Drives a [`CardSwap`] against a [`RecordingSurface`] with a fixed frame
//! step and an optional scripted drag and hover window, recording every
//! completed rotation.

use deckswap_animation::AnimationScheduler;
use deckswap_carousel::{CardSwap, CarouselConfig, CarouselState, RecordingSurface};
use deckswap_core::Point;
use serde::Serialize;
use tracing::{debug, info};

/// A scripted drag, released in a single frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptedDrag {
    pub at_ms: f32,
    pub dx: f32,
    pub velocity: f32,
}

/// Pointer over the carousel between two times
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverWindow {
    pub from_ms: f32,
    pub to_ms: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationPlan {
    pub cards: usize,
    pub duration_ms: f32,
    pub fps: u32,
    pub drag: Option<ScriptedDrag>,
    pub hover: Option<HoverWindow>,
}

/// One completed rotation
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RotationRecord {
    pub index: u64,
    pub at_ms: f32,
    pub order: Vec<usize>,
}

/// Everything observed during a run
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationReport {
    pub cards: usize,
    pub profile: &'static str,
    pub frames: u64,
    pub surface_updates: usize,
    pub drag_triggered: Option<bool>,
    pub rotations: Vec<RotationRecord>,
    pub final_order: Vec<usize>,
    pub final_state: String,
    /// Handle drawn on top at the end of the run
    pub topmost: Option<usize>,
}

pub fn run(config: CarouselConfig, plan: &SimulationPlan) -> SimulationReport {
    let scheduler = AnimationScheduler::new();
    let profile = config.easing.name();
    let mut carousel = CardSwap::new(
        config,
        0..plan.cards,
        RecordingSurface::new(),
        scheduler.handle(),
    );

    let dt_ms = 1000.0 / plan.fps.max(1) as f32;
    let mut now_ms = 0.0;
    let mut frames = 0;
    let mut rotations = Vec::new();
    let mut drag_pending = plan.drag;
    let mut drag_triggered = None;
    let mut hovering = false;

    while now_ms < plan.duration_ms {
        if let Some(drag) = drag_pending.filter(|d| now_ms >= d.at_ms) {
            let displacement = Point::new(drag.dx, 0.0);
            carousel.drag_move(displacement);
            drag_triggered =
                Some(carousel.drag_release(displacement, Point::new(drag.velocity, 0.0)));
            drag_pending = None;
        }

        if let Some(hover) = plan.hover {
            let inside = now_ms >= hover.from_ms && now_ms < hover.to_ms;
            if inside != hovering {
                hovering = inside;
                if inside {
                    carousel.pointer_enter();
                } else {
                    carousel.pointer_leave();
                }
                debug!("hover {} at {:.0}ms", if inside { "enter" } else { "leave" }, now_ms);
            }
        }

        scheduler.tick_by(dt_ms);
        carousel.update(dt_ms);
        now_ms += dt_ms;
        frames += 1;

        record_rotations(
            &mut rotations,
            carousel.rotations_completed(),
            &order_of(&carousel),
            now_ms,
        );
    }

    SimulationReport {
        cards: plan.cards,
        profile,
        frames,
        surface_updates: carousel.surface().apply_count(),
        drag_triggered,
        final_order: order_of(&carousel),
        final_state: state_name(carousel.state()).to_string(),
        topmost: carousel.surface().topmost(),
        rotations,
    }
}

/// Append a record for every rotation completed since the last frame
///
/// `order` is the order after the latest one; orders of earlier rotations
/// finished in the same frame are recovered by rotating it back.
fn record_rotations(
    records: &mut Vec<RotationRecord>,
    completed: u64,
    order: &[usize],
    at_ms: f32,
) {
    while (records.len() as u64) < completed {
        let index = records.len() as u64 + 1;
        let mut earlier = order.to_vec();
        if !earlier.is_empty() {
            let behind = (completed - index) % earlier.len() as u64;
            earlier.rotate_right(behind as usize);
        }
        info!("rotation {} at {:.0}ms -> {:?}", index, at_ms, earlier);
        records.push(RotationRecord {
            index,
            at_ms,
            order: earlier,
        });
    }
}

fn order_of(carousel: &CardSwap<RecordingSurface>) -> Vec<usize> {
    carousel.order().iter().map(|card| card.index()).collect()
}

fn state_name(state: CarouselState) -> &'static str {
    match state {
        CarouselState::Idle => "idle",
        CarouselState::Rotating => "rotating",
        CarouselState::Paused => "paused",
    }
}
