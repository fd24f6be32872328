//! The card-swap carousel engine
//!
//! [`CardSwap`] owns the rotation order and every card's placement. It is
//! driven from outside by three kinds of input:
//!
//! - **time**: [`update`](CardSwap::update) once per frame, after the
//!   scheduler has ticked
//! - **gestures**: [`drag_move`](CardSwap::drag_move) and
//!   [`drag_release`](CardSwap::drag_release) on the front card
//! - **hover**: [`pointer_enter`](CardSwap::pointer_enter) and
//!   [`pointer_leave`](CardSwap::pointer_leave)
//!
//! Rotations are serialized. Asking for one while another is in flight
//! queues a single follow-up; further requests coalesce into it.
//!
//! # Example
//!
//! ```rust
//! use deckswap_animation::AnimationScheduler;
//! use deckswap_carousel::{CardSwap, CarouselConfig, RecordingSurface};
//!
//! let scheduler = AnimationScheduler::new();
//! let config = CarouselConfig { delay_ms: 0, ..Default::default() };
//! let mut carousel = CardSwap::new(config, 0..4, RecordingSurface::new(), scheduler.handle());
//!
//! carousel.advance();
//! for _ in 0..300 {
//!     scheduler.tick_by(16.0);
//!     carousel.update(16.0);
//! }
//! assert_eq!(carousel.order().to_string(), "[1, 2, 3, 0]");
//! ```

use crate::config::CarouselConfig;
use crate::drag::DragOffset;
use crate::order::{CardId, Order};
use crate::rotation::{build_rotation, ROTATION_DONE};
use crate::slot::Slot;
use crate::surface::CardSurface;
use deckswap_animation::{AnimatedTimeline, SchedulerHandle, TimelineEvent};
use deckswap_core::{CardTransform, Point};
use tracing::{debug, trace, warn};

/// Observable phase of the carousel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarouselState {
    /// Nothing animating; waiting for the timer or a gesture
    Idle,
    /// A compound rotation timeline is playing
    Rotating,
    /// Hover-paused: the timer is halted and any rotation is frozen
    Paused,
}

/// A card: stable identity plus the caller's rendering handle
#[derive(Clone, Debug)]
pub struct Card<H> {
    pub id: CardId,
    pub handle: H,
}

struct Rotation {
    timeline: AnimatedTimeline,
    /// Another rotation was requested while this one ran
    queued: bool,
}

/// Fixed-interval auto-advance countdown
#[derive(Clone, Copy, Debug)]
struct AutoAdvance {
    interval_ms: f32,
    elapsed_ms: f32,
    running: bool,
}

impl AutoAdvance {
    fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms as f32,
            elapsed_ms: 0.0,
            running: interval_ms > 0,
        }
    }

    /// Returns true when the interval elapsed during this step
    fn tick(&mut self, dt_ms: f32) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms %= self.interval_ms;
            return true;
        }
        false
    }

    /// Start a full interval from now
    fn restart(&mut self) {
        self.elapsed_ms = 0.0;
        self.running = self.interval_ms > 0.0;
    }

    fn halt(&mut self) {
        self.elapsed_ms = 0.0;
        self.running = false;
    }
}

type ClickCallback = Box<dyn FnMut(usize)>;

/// Card-swap carousel state machine
pub struct CardSwap<S: CardSurface> {
    config: CarouselConfig,
    cards: Vec<Card<S::Handle>>,
    order: Order,
    /// Timeline-driven placement per card id, without drag offset
    base: Vec<CardTransform>,
    /// Last transform pushed to the surface per card id
    applied: Vec<CardTransform>,
    surface: S,
    scheduler: SchedulerHandle,
    rotation: Option<Rotation>,
    paused: bool,
    timer: AutoAdvance,
    drag: DragOffset,
    on_card_click: Option<ClickCallback>,
    rotations_completed: u64,
}

impl<S: CardSurface> CardSwap<S> {
    /// Create a carousel and place every card in its initial slot
    ///
    /// Card `k` (the `k`th handle) starts at depth `k`. Placement is applied
    /// immediately with no animation.
    pub fn new(
        config: CarouselConfig,
        handles: impl IntoIterator<Item = S::Handle>,
        mut surface: S,
        scheduler: SchedulerHandle,
    ) -> Self {
        let cards: Vec<Card<S::Handle>> = handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| Card {
                id: CardId(index),
                handle,
            })
            .collect();

        let total = cards.len();
        let base: Vec<CardTransform> = (0..total)
            .map(|depth| Slot::at(depth, total, &config).transform(config.skew_amount))
            .collect();

        let size = config.card_size();
        for (card, transform) in cards.iter().zip(&base) {
            surface.resize(&card.handle, size);
            surface.apply(&card.handle, transform);
        }

        let mut carousel = Self {
            timer: AutoAdvance::new(config.delay_ms),
            drag: DragOffset::new(scheduler.clone(), config.drag),
            order: Order::identity(total),
            applied: base.clone(),
            base,
            cards,
            surface,
            scheduler,
            rotation: None,
            paused: false,
            on_card_click: None,
            rotations_completed: 0,
            config,
        };

        debug!(
            "CardSwap: created with {} cards, profile {}",
            total,
            carousel.config.easing.name()
        );

        if carousel.config.advance_on_mount {
            carousel.advance();
        }
        carousel
    }

    /// Invoke `callback` with the clicked card's current depth
    pub fn with_card_click(mut self, callback: impl FnMut(usize) + 'static) -> Self {
        self.on_card_click = Some(Box::new(callback));
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn cards(&self) -> &[Card<S::Handle>] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn state(&self) -> CarouselState {
        match &self.rotation {
            Some(rotation) if !rotation.timeline.is_paused() => CarouselState::Rotating,
            _ if self.paused => CarouselState::Paused,
            Some(_) => CarouselState::Rotating,
            None => CarouselState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Slot for `depth` in this carousel
    pub fn slot(&self, depth: usize) -> Slot {
        Slot::at(depth, self.len(), &self.config)
    }

    /// Current rendered placement of `card`, including any drag offset
    pub fn placement(&self, card: CardId) -> Option<CardTransform> {
        let base = *self.base.get(card.index())?;
        if self.drag.card() == Some(card) {
            let offset = self.drag.offset();
            Some(base.offset(offset.x, offset.y))
        } else {
            Some(base)
        }
    }

    pub fn rotations_completed(&self) -> u64 {
        self.rotations_completed
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    // =========================================================================
    // Rotation
    // =========================================================================

    /// Send the front card to the back
    ///
    /// No-op with fewer than two cards. While a rotation is in flight the
    /// request is queued (at most one).
    pub fn advance(&mut self) {
        if self.order.len() < 2 {
            trace!("CardSwap: advance ignored, {} card(s)", self.order.len());
            return;
        }

        if let Some(rotation) = &mut self.rotation {
            if !rotation.queued {
                debug!("CardSwap: rotation in flight, queueing one more");
            }
            rotation.queued = true;
            return;
        }

        self.start_rotation();
    }

    fn start_rotation(&mut self) {
        let Some(timeline) = build_rotation(&self.order, &self.base, &self.config) else {
            return;
        };

        let timeline = AnimatedTimeline::register(self.scheduler.clone(), timeline);
        if !timeline.is_registered() {
            warn!("CardSwap: scheduler gone, rotating without animation");
            self.finish_rotation(false);
            return;
        }

        debug!(
            "CardSwap: rotating {} to the back ({:.0}ms)",
            self.order.front().map(|c| c.to_string()).unwrap_or_default(),
            timeline.duration_ms()
        );
        timeline.start();
        self.rotation = Some(Rotation {
            timeline,
            queued: false,
        });
    }

    /// Commit the order change and snap every card onto its new slot
    fn finish_rotation(&mut self, queued: bool) {
        self.order.rotate_front_to_back();
        debug_assert!(self.order.is_permutation());
        self.rotations_completed += 1;

        let total = self.order.len();
        for (depth, card) in self.order.iter().enumerate() {
            self.base[card.index()] =
                Slot::at(depth, total, &self.config).transform(self.config.skew_amount);
        }
        debug!("CardSwap: rotation complete, order {}", self.order);

        if queued {
            self.start_rotation();
        }
    }

    fn drain_rotation(&mut self) {
        let events = match &self.rotation {
            Some(rotation) => rotation.timeline.drain_events(),
            None => return,
        };

        let mut done = false;
        for event in events {
            match event {
                TimelineEvent::Write { key, value } => {
                    if let Some(transform) = self.base.get_mut(key.target.index()) {
                        transform.set(key.property, value);
                    }
                }
                TimelineEvent::Cue(ROTATION_DONE) | TimelineEvent::Completed => done = true,
                TimelineEvent::Cue(_) => {}
            }
        }

        if done {
            if let Some(rotation) = self.rotation.take() {
                self.finish_rotation(rotation.queued);
            }
        }
    }

    // =========================================================================
    // Frame update
    // =========================================================================

    /// Advance the carousel by one frame
    ///
    /// Call after the scheduler has ticked by the same `dt_ms`.
    pub fn update(&mut self, dt_ms: f32) {
        self.drain_rotation();

        if self.timer.tick(dt_ms) {
            trace!("CardSwap: auto-advance");
            self.advance();
        }

        self.drag.clear_if_settled();
        self.flush();
    }

    /// Push changed placements to the surface
    fn flush(&mut self) {
        for card in &self.cards {
            let index = card.id.index();
            let mut transform = self.base[index];
            if self.drag.card() == Some(card.id) {
                let offset = self.drag.offset();
                transform = transform.offset(offset.x, offset.y);
            }
            if transform != self.applied[index] {
                self.surface.apply(&card.handle, &transform);
                self.applied[index] = transform;
            }
        }
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    /// Pointer moved while held on the front card
    pub fn drag_move(&mut self, displacement: Point) {
        let Some(front) = self.order.front() else {
            return;
        };
        if self.rotation.is_some() {
            trace!("CardSwap: drag ignored during rotation");
            return;
        }
        if !self.drag.follow(front, displacement) {
            trace!("CardSwap: drag on {} waits for the previous card", front);
        }
        self.flush();
    }

    /// Pointer released; returns whether the release triggered a rotation
    pub fn drag_release(&mut self, displacement: Point, velocity: Point) -> bool {
        if self.order.is_empty() {
            return false;
        }
        let triggered = self.drag.release(displacement, velocity);
        debug!(
            "CardSwap: drag released dx={:.1} vx={:.3} -> {}",
            displacement.x,
            velocity.x,
            if triggered { "swap" } else { "stay" }
        );
        if triggered {
            self.advance();
        }
        self.flush();
        triggered
    }

    /// A card was activated; reports its current depth to the click callback
    pub fn click(&mut self, card: CardId) -> Option<usize> {
        let depth = self.order.depth_of(card)?;
        if let Some(callback) = self.on_card_click.as_mut() {
            callback(depth);
        }
        Some(depth)
    }

    // =========================================================================
    // Hover pause
    // =========================================================================

    pub fn pointer_enter(&mut self) {
        self.pause();
    }

    pub fn pointer_leave(&mut self) {
        self.resume();
    }

    /// Freeze the in-flight rotation and halt the timer
    ///
    /// Only active when `pause_on_hover` is configured.
    pub fn pause(&mut self) {
        if !self.config.pause_on_hover || self.paused {
            return;
        }
        self.paused = true;
        self.timer.halt();
        if let Some(rotation) = &self.rotation {
            rotation.timeline.pause();
        }
        debug!("CardSwap: paused");
    }

    /// Unfreeze the rotation and restart the timer at a full interval
    pub fn resume(&mut self) {
        if !self.config.pause_on_hover || !self.paused {
            return;
        }
        self.paused = false;
        if let Some(rotation) = &self.rotation {
            rotation.timeline.resume();
        }
        self.timer.restart();
        debug!("CardSwap: resumed");
    }
}

impl<S: CardSurface> std::fmt::Debug for CardSwap<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardSwap")
            .field("order", &self.order.to_string())
            .field("state", &self.state())
            .field("rotations_completed", &self.rotations_completed)
            .finish_non_exhaustive()
    }
}
