//! Deckswap Carousel
//!
//! A stacked card carousel that periodically sends its front card to the
//! back. Cards sit in depth slots offset diagonally behind one another; each
//! rotation drops the front card, promotes the rest one slot forward, and
//! brings the dropped card up into the back slot.
//!
//! - [`CardSwap`] - the engine: order, placements, timer, drag, hover pause
//! - [`Slot`] - pure geometry for a depth position
//! - [`Order`] - the depth-to-card permutation
//! - [`CarouselConfig`] - construction-time settings, loadable from TOML
//! - [`CardSurface`] - where placements are sent

pub mod card_swap;
pub mod config;
pub mod drag;
pub mod error;
pub mod order;
pub mod rotation;
pub mod slot;
pub mod surface;

pub use card_swap::{Card, CardSwap, CarouselState};
pub use config::{
    CarouselConfig, DragConfig, EasingProfile, ProfileTiming, DROP_DISTANCE, PROMOTE_STAGGER_MS,
};
pub use drag::release_triggers_swap;
pub use error::{ConfigError, Result};
pub use order::{CardId, Order};
pub use rotation::{build_rotation, ROTATION_DONE};
pub use slot::Slot;
pub use surface::{CardSurface, RecordingSurface};
