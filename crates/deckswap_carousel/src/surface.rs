//! Render surface seam
//!
//! The carousel decides where cards go; a [`CardSurface`] puts them there.
//! Implement it over whatever owns the real elements (a DOM bridge, a scene
//! graph, a layout tree). [`RecordingSurface`] keeps the latest state in memory
//! for headless runs.

use deckswap_core::{CardTransform, Size};

/// Receives per-card size and transform updates
pub trait CardSurface {
    /// Opaque reference to one rendered card
    type Handle;

    /// Set the card's unscaled size
    fn resize(&mut self, handle: &Self::Handle, size: Size);

    /// Place the card
    fn apply(&mut self, handle: &Self::Handle, transform: &CardTransform);
}

/// In-memory surface addressed by `usize` handles
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    sizes: Vec<Option<Size>>,
    transforms: Vec<Option<CardTransform>>,
    applies: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest transform applied to `handle`
    pub fn transform(&self, handle: usize) -> Option<CardTransform> {
        self.transforms.get(handle).copied().flatten()
    }

    pub fn size(&self, handle: usize) -> Option<Size> {
        self.sizes.get(handle).copied().flatten()
    }

    /// Total number of `apply` calls received
    pub fn apply_count(&self) -> usize {
        self.applies
    }

    /// Handle of the card with the highest stacking order
    pub fn topmost(&self) -> Option<usize> {
        self.transforms
            .iter()
            .enumerate()
            .filter_map(|(handle, t)| t.map(|t| (handle, t.z_index)))
            .max_by_key(|(_, z)| *z)
            .map(|(handle, _)| handle)
    }
}

fn slot_for<T>(items: &mut Vec<Option<T>>, index: usize) -> &mut Option<T> {
    if items.len() <= index {
        items.resize_with(index + 1, || None);
    }
    &mut items[index]
}

impl CardSurface for RecordingSurface {
    type Handle = usize;

    fn resize(&mut self, handle: &usize, size: Size) {
        *slot_for(&mut self.sizes, *handle) = Some(size);
    }

    fn apply(&mut self, handle: &usize, transform: &CardTransform) {
        *slot_for(&mut self.transforms, *handle) = Some(*transform);
        self.applies += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_latest_state() {
        let mut surface = RecordingSurface::new();
        surface.resize(&2, Size::new(500.0, 400.0));
        surface.apply(
            &2,
            &CardTransform {
                z_index: 3,
                ..Default::default()
            },
        );
        surface.apply(
            &0,
            &CardTransform {
                z_index: 5,
                ..Default::default()
            },
        );

        assert_eq!(surface.size(2), Some(Size::new(500.0, 400.0)));
        assert_eq!(surface.size(1), None);
        assert_eq!(surface.transform(2).map(|t| t.z_index), Some(3));
        assert_eq!(surface.transform(9), None);
        assert_eq!(surface.apply_count(), 2);
        assert_eq!(surface.topmost(), Some(0));
    }
}
