//! Card transforms and animation track addressing
//!
//! Animations never hold references into a render surface. They write plain
//! `f32` values to a [`TrackKey`], which names a target (usually a card) and
//! one [`Property`] channel of that target's [`CardTransform`].

/// Identifies the object an animation track writes to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

impl TargetId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for TargetId {
    fn from(index: usize) -> Self {
        TargetId(index as u32)
    }
}

/// A single animatable channel of a [`CardTransform`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    X,
    Y,
    Z,
    Scale,
    SkewY,
    /// Stacking order. Written as `f32` by timelines, rounded when read back.
    ZIndex,
}

impl Property {
    pub const ALL: [Property; 6] = [
        Property::X,
        Property::Y,
        Property::Z,
        Property::Scale,
        Property::SkewY,
        Property::ZIndex,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Property::X => "x",
            Property::Y => "y",
            Property::Z => "z",
            Property::Scale => "scale",
            Property::SkewY => "skewY",
            Property::ZIndex => "zIndex",
        }
    }
}

/// Address of one animated channel: which target, which property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TrackKey {
    pub target: TargetId,
    pub property: Property,
}

impl TrackKey {
    pub const fn new(target: TargetId, property: Property) -> Self {
        Self { target, property }
    }
}

/// Complete placement of a card on the render surface
///
/// Translation is relative to the carousel's anchor point; cards are centered
/// on their own origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardTransform {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub scale: f32,
    /// Skew around the Y axis in degrees
    pub skew_y: f32,
    pub z_index: i32,
}

impl Default for CardTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            scale: 1.0,
            skew_y: 0.0,
            z_index: 0,
        }
    }
}

impl CardTransform {
    /// Read a channel as `f32`
    pub fn get(&self, property: Property) -> f32 {
        match property {
            Property::X => self.x,
            Property::Y => self.y,
            Property::Z => self.z,
            Property::Scale => self.scale,
            Property::SkewY => self.skew_y,
            Property::ZIndex => self.z_index as f32,
        }
    }

    /// Write a channel from `f32`
    pub fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::X => self.x = value,
            Property::Y => self.y = value,
            Property::Z => self.z = value,
            Property::Scale => self.scale = value,
            Property::SkewY => self.skew_y = value,
            Property::ZIndex => self.z_index = value.round() as i32,
        }
    }

    /// Offset the translation in the screen plane
    pub fn offset(mut self, dx: f32, dy: f32) -> Self {
        self.x += dx;
        self.y += dy;
        self
    }
}
