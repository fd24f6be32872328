//! Carousel configuration
//!
//! A [`CarouselConfig`] is fixed for the lifetime of one carousel. It can be
//! built in code or loaded from a TOML file such as:
//!
//! ```toml
//! width = 500.0
//! height = 400.0
//! card_distance = 60.0
//! vertical_distance = 70.0
//! delay_ms = 5000
//! pause_on_hover = true
//! easing = "linear"
//!
//! [drag]
//! velocity_threshold = 0.2
//! distance_threshold = 100.0
//! ```
//!
//! Missing fields take their defaults.

use crate::error::{ConfigError, Result};
use deckswap_animation::Easing;
use deckswap_core::Size;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Distance the front card falls before it returns to the back, in pixels
pub const DROP_DISTANCE: f32 = 500.0;

/// Delay between consecutive card promotions, in milliseconds
pub const PROMOTE_STAGGER_MS: f32 = 150.0;

/// Named pacing preset for the compound rotation timeline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EasingProfile {
    /// Long, bouncy, heavily overlapped phases
    #[default]
    Elastic,
    /// Short, evenly eased, lightly overlapped phases
    Linear,
}

/// Durations and overlaps selected by an [`EasingProfile`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileTiming {
    pub easing: Easing,
    pub drop_ms: f32,
    pub move_ms: f32,
    pub return_ms: f32,
    /// Fraction of the drop that the promotion overlaps
    pub promote_overlap: f32,
    /// Fraction of the promotion that elapses before the dropped card returns
    pub return_delay: f32,
}

impl EasingProfile {
    pub fn timing(self) -> ProfileTiming {
        match self {
            EasingProfile::Elastic => ProfileTiming {
                easing: Easing::elastic(),
                drop_ms: 2000.0,
                move_ms: 2000.0,
                return_ms: 2000.0,
                promote_overlap: 0.9,
                return_delay: 0.05,
            },
            EasingProfile::Linear => ProfileTiming {
                easing: Easing::EaseInOutQuad,
                drop_ms: 800.0,
                move_ms: 800.0,
                return_ms: 800.0,
                promote_overlap: 0.45,
                return_delay: 0.2,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EasingProfile::Elastic => "elastic",
            EasingProfile::Linear => "linear",
        }
    }
}

/// Gates for turning a released drag into a rotation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DragConfig {
    /// Horizontal release speed that triggers a swap, in px/ms
    pub velocity_threshold: f32,
    /// Horizontal travel that triggers a swap, in px
    pub distance_threshold: f32,
    /// How much of the vertical pointer travel the card follows
    pub vertical_factor: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            velocity_threshold: 0.2,
            distance_threshold: 100.0,
            vertical_factor: 0.25,
        }
    }
}

/// Construction-time configuration of a carousel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Card width in pixels
    pub width: f32,
    /// Card height in pixels
    pub height: f32,
    /// Horizontal offset per depth step
    pub card_distance: f32,
    /// Vertical offset per depth step
    pub vertical_distance: f32,
    /// Scale lost per depth step; 0.0 keeps every card full size
    pub scale_decay: f32,
    /// Skew applied to every card, in degrees
    pub skew_amount: f32,
    /// Milliseconds between automatic rotations; 0 disables the timer
    pub delay_ms: u32,
    /// Pause while the pointer is over the carousel
    pub pause_on_hover: bool,
    pub easing: EasingProfile,
    /// Rotate once as soon as the carousel is created
    pub advance_on_mount: bool,
    pub drag: DragConfig,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 400.0,
            card_distance: 60.0,
            vertical_distance: 70.0,
            scale_decay: 0.0,
            skew_amount: 6.0,
            delay_ms: 5000,
            pause_on_hover: false,
            easing: EasingProfile::Elastic,
            advance_on_mount: false,
            drag: DragConfig::default(),
        }
    }
}

impl CarouselConfig {
    pub fn card_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn timing(&self) -> ProfileTiming {
        self.easing.timing()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: CarouselConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write this config as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_toml_string()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject values the engine cannot lay out or animate
    pub fn validate(&self) -> Result<()> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        non_negative("card_distance", self.card_distance)?;
        non_negative("vertical_distance", self.vertical_distance)?;
        fraction("scale_decay", self.scale_decay)?;
        finite("skew_amount", self.skew_amount)?;
        positive("drag.velocity_threshold", self.drag.velocity_threshold)?;
        positive("drag.distance_threshold", self.drag.distance_threshold)?;
        fraction("drag.vertical_factor", self.drag.vertical_factor)?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is not a finite number"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is negative"),
        });
    }
    Ok(())
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be greater than zero"),
        });
    }
    Ok(())
}

fn fraction(field: &'static str, value: f32) -> Result<()> {
    non_negative(field, value)?;
    if value > 1.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is above 1.0"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = CarouselConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.easing, EasingProfile::Elastic);
        assert_eq!(config.card_size(), Size::new(500.0, 400.0));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = CarouselConfig::from_toml_str(
            r#"
            card_distance = 40.0
            easing = "linear"
            pause_on_hover = true

            [drag]
            distance_threshold = 80.0
            "#,
        )
        .unwrap();

        assert_eq!(config.card_distance, 40.0);
        assert_eq!(config.easing, EasingProfile::Linear);
        assert!(config.pause_on_hover);
        assert_eq!(config.drag.distance_threshold, 80.0);
        assert_eq!(config.drag.velocity_threshold, 0.2);
        assert_eq!(config.delay_ms, 5000);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = CarouselConfig {
            scale_decay: 0.05,
            easing: EasingProfile::Linear,
            ..Default::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(CarouselConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = CarouselConfig::from_toml_str("spin = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_profile_rejected() {
        let err = CarouselConfig::from_toml_str("easing = \"bouncy\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_name_the_field() {
        let config = CarouselConfig {
            width: 0.0,
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "width"),
            other => panic!("expected invalid width, got {other:?}"),
        }

        let config = CarouselConfig {
            scale_decay: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "scale_decay",
                ..
            })
        ));

        let config = CarouselConfig {
            card_distance: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = CarouselConfig::load("/definitely/not/here/carousel.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_profiles_differ_only_in_pacing() {
        let elastic = EasingProfile::Elastic.timing();
        let linear = EasingProfile::Linear.timing();
        assert!(elastic.drop_ms > linear.drop_ms);
        assert!(elastic.promote_overlap > linear.promote_overlap);
        assert_eq!(elastic.easing, Easing::elastic());
        assert_eq!(linear.easing, Easing::EaseInOutQuad);
        assert_eq!(EasingProfile::Linear.name(), "linear");
    }
}
