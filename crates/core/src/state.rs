//! Active triple and persisted session state.

use serde::{Deserialize, Serialize};

use crate::{Board, Piece};

pub const TRIPLE_SIZE: usize = 3;

/// The three pieces on offer. Slots empty out as pieces are placed.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct PieceTriple {
    slots: [Option<Piece>; TRIPLE_SIZE],
}

impl PieceTriple {
    pub fn new(pieces: [Piece; TRIPLE_SIZE]) -> Self {
        Self {
            slots: pieces.map(Some),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// `None` for an out-of-range or already consumed slot
    pub fn get(&self, slot: usize) -> Option<&Piece> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn take(&mut self, slot: usize) -> Option<Piece> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    pub fn slots(&self) -> &[Option<Piece>; TRIPLE_SIZE] {
        &self.slots
    }

    /// Pieces still on offer, in slot order
    pub fn remaining(&self) -> impl Iterator<Item = &Piece> {
        self.slots.iter().flatten()
    }

    pub fn remaining_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_exhausted(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

impl From<[Piece; TRIPLE_SIZE]> for PieceTriple {
    fn from(pieces: [Piece; TRIPLE_SIZE]) -> Self {
        Self::new(pieces)
    }
}

/// What the persistence collaborator stores and hands back.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub board: Board,
    pub triple: PieceTriple,
    pub score: u64,
    pub best_score: u64,
    pub round: u32,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            board: Board::new(),
            triple: PieceTriple::empty(),
            score: 0,
            best_score: 0,
            round: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Catalogue, Color, PieceId};

    fn triple() -> PieceTriple {
        let cat = Catalogue::standard();
        let pick = |id: &str, n: u64| {
            cat.find(id)
                .expect("catalogue id")
                .instantiate(PieceId(n), Color::Green)
        };
        PieceTriple::new([pick("hor-2", 1), pick("vert-3", 2), pick("t-shape", 3)])
    }

    #[test]
    fn test_take_consumes_slot() {
        let mut t = triple();
        assert_eq!(t.remaining_count(), 3);
        let p = t.take(1).expect("slot 1 filled");
        assert_eq!(p.kind, "vert-3");
        assert!(t.get(1).is_none());
        assert!(t.take(1).is_none());
        assert_eq!(t.remaining_count(), 2);
        assert!(!t.is_exhausted());
    }

    #[test]
    fn test_out_of_range_slot() {
        let mut t = triple();
        assert!(t.get(3).is_none());
        assert!(t.take(7).is_none());
        assert_eq!(t.remaining_count(), 3);
    }

    #[test]
    fn test_exhausted_after_three() {
        let mut t = triple();
        for slot in 0..TRIPLE_SIZE {
            assert!(t.take(slot).is_some());
        }
        assert!(t.is_exhausted());
        assert_eq!(t.remaining().count(), 0);
    }

    #[test]
    fn test_snapshot_serde() {
        let snap = SessionSnapshot {
            triple: triple(),
            score: 42,
            best_score: 100,
            round: 3,
            ..SessionSnapshot::default()
        };
        let json = serde_json::to_string(&snap).expect("serialize");
        let back: SessionSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, snap);
    }
}
