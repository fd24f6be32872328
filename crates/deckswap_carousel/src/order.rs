//! Card identities and rotation order

use deckswap_core::{Property, TargetId, TrackKey};
use std::fmt;

/// Stable identity of a card: its index in the list the carousel was built from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub usize);

impl CardId {
    pub fn index(self) -> usize {
        self.0
    }

    /// Animation track for one property of this card
    pub fn track(self, property: Property) -> TrackKey {
        TrackKey::new(TargetId::from(self.0), property)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card-{}", self.0)
    }
}

/// Which card occupies which depth; index 0 is the front
///
/// Always a permutation of `0..len`. The only mutation is
/// [`rotate_front_to_back`](Self::rotate_front_to_back).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order(Vec<CardId>);

impl Order {
    /// Identity order: card `k` at depth `k`
    pub fn identity(len: usize) -> Self {
        Self((0..len).map(CardId).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn front(&self) -> Option<CardId> {
        self.0.first().copied()
    }

    pub fn back(&self) -> Option<CardId> {
        self.0.last().copied()
    }

    pub fn at(&self, depth: usize) -> Option<CardId> {
        self.0.get(depth).copied()
    }

    pub fn depth_of(&self, card: CardId) -> Option<usize> {
        self.0.iter().position(|c| *c == card)
    }

    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.0.iter().copied()
    }

    /// Move the front card to the back, shifting the rest forward by one
    pub fn rotate_front_to_back(&mut self) {
        if self.0.len() >= 2 {
            self.0.rotate_left(1);
        }
    }

    /// Whether every identity in `0..len` appears exactly once
    pub fn is_permutation(&self) -> bool {
        let mut seen = vec![false; self.0.len()];
        self.0.iter().all(|card| match seen.get_mut(card.0) {
            Some(slot) if !*slot => {
                *slot = true;
                true
            }
            _ => false,
        })
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, card) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", card.0)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(order: &Order) -> Vec<usize> {
        order.iter().map(CardId::index).collect()
    }

    #[test]
    fn test_rotation_scenario() {
        let mut order = Order::identity(4);
        order.rotate_front_to_back();
        assert_eq!(ids(&order), vec![1, 2, 3, 0]);
        order.rotate_front_to_back();
        assert_eq!(ids(&order), vec![2, 3, 0, 1]);

        for _ in 0..6 {
            order.rotate_front_to_back();
        }
        assert_eq!(order, Order::identity(4));
    }

    #[test]
    fn test_short_orders_do_not_rotate() {
        let mut order = Order::identity(1);
        order.rotate_front_to_back();
        assert_eq!(order, Order::identity(1));
        assert!(Order::identity(0).is_empty());
    }

    #[test]
    fn test_permutation_survives_rotation() {
        let mut order = Order::identity(7);
        for _ in 0..20 {
            order.rotate_front_to_back();
            assert!(order.is_permutation());
        }
        assert!(!Order(vec![CardId(0), CardId(0)]).is_permutation());
        assert!(!Order(vec![CardId(0), CardId(5)]).is_permutation());
    }

    #[test]
    fn test_lookup_and_display() {
        let mut order = Order::identity(3);
        order.rotate_front_to_back();
        assert_eq!(order.front(), Some(CardId(1)));
        assert_eq!(order.back(), Some(CardId(0)));
        assert_eq!(order.depth_of(CardId(0)), Some(2));
        assert_eq!(order.at(1), Some(CardId(2)));
        assert_eq!(order.to_string(), "[1, 2, 0]");
        assert_eq!(CardId(4).to_string(), "card-4");
    }
}
