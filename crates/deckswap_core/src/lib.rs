//! Deckswap Core
//!
//! Foundational primitives shared by the Deckswap crates:
//!
//! - **Geometry**: `Point`, `Size`
//! - **Transforms**: `CardTransform`, the full placement of one card on a surface
//! - **Track Addressing**: `TargetId` + `Property` pairs that animations write to
//!
//! # Example
//!
//! ```rust
//! use deckswap_core::{CardTransform, Property};
//!
//! let mut transform = CardTransform::default();
//! transform.set(Property::Y, 70.0);
//! assert_eq!(transform.get(Property::Y), 70.0);
//! ```

pub mod geometry;
pub mod transform;

pub use geometry::{Point, Size};
pub use transform::{CardTransform, Property, TargetId, TrackKey};
