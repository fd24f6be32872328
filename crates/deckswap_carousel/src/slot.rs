//! Slot geometry
//!
//! A slot is where the card at a given depth sits. Depth 0 is the front.
//! Slots are a pure function of depth, card count and configuration.

use crate::config::CarouselConfig;
use deckswap_core::CardTransform;

/// Placement for one depth position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub scale: f32,
    pub z_index: i32,
}

impl Slot {
    /// Compute the slot at `depth` in a carousel of `total` cards
    pub fn at(depth: usize, total: usize, config: &CarouselConfig) -> Self {
        let i = depth as f32;
        Self {
            x: i * config.card_distance,
            y: -i * config.vertical_distance,
            z: -i * config.card_distance * 1.5,
            scale: (1.0 - i * config.scale_decay).max(0.0),
            z_index: total as i32 - depth as i32,
        }
    }

    /// Full card transform for this slot with the carousel's constant skew
    pub fn transform(&self, skew_y: f32) -> CardTransform {
        CardTransform {
            x: self.x,
            y: self.y,
            z: self.z,
            scale: self.scale,
            skew_y,
            z_index: self.z_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_geometry() {
        let config = CarouselConfig::default();
        let slot = Slot::at(2, 4, &config);
        assert_eq!(slot.x, 120.0);
        assert_eq!(slot.y, -140.0);
        assert_eq!(slot.z, -180.0);
        assert_eq!(slot.scale, 1.0);
        assert_eq!(slot.z_index, 2);
    }

    #[test]
    fn test_slot_is_pure() {
        let config = CarouselConfig {
            scale_decay: 0.07,
            ..Default::default()
        };
        for depth in 0..6 {
            assert_eq!(Slot::at(depth, 6, &config), Slot::at(depth, 6, &config));
        }
    }

    #[test]
    fn test_front_is_topmost() {
        let config = CarouselConfig::default();
        for total in 1..8 {
            for depth in 0..total {
                assert_eq!(Slot::at(depth, total, &config).z_index, (total - depth) as i32);
            }
            assert_eq!(Slot::at(0, total, &config).z_index, total as i32);
        }
    }

    #[test]
    fn test_scale_decay_floors_at_zero() {
        let config = CarouselConfig {
            scale_decay: 0.4,
            ..Default::default()
        };
        assert!((Slot::at(1, 4, &config).scale - 0.6).abs() < 1e-6);
        assert_eq!(Slot::at(3, 4, &config).scale, 0.0);
    }

    #[test]
    fn test_transform_carries_skew() {
        let t = Slot::at(1, 3, &CarouselConfig::default()).transform(6.0);
        assert_eq!(t.skew_y, 6.0);
        assert_eq!(t.z_index, 2);
        assert_eq!(t.x, 60.0);
    }
}
