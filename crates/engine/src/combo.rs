use serde::{Deserialize, Serialize};

/// Combo lifecycle across moves.
///
/// Closed at start. The first clearing move opens it without raising the
/// counter; later clearing moves add their line count. `reset_after`
/// consecutive non-clearing moves close it again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboState {
    pub counter: u32,
    pub opened: bool,
    pub moves_since_last_clear: u32,
}

impl ComboState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one move and return the multiplier for its line points.
    pub fn register_move(&mut self, lines: u32, reset_after: u32) -> u32 {
        if lines > 0 {
            self.moves_since_last_clear = 0;
            if !self.opened {
                self.opened = true;
                return 1;
            }
            self.counter = self.counter.saturating_add(lines);
            return self.counter;
        }

        self.moves_since_last_clear = self.moves_since_last_clear.saturating_add(1);
        if self.moves_since_last_clear >= reset_after {
            self.counter = 0;
            self.opened = false;
        }
        1
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_clear_opens_at_baseline() {
        let mut combo = ComboState::new();
        assert_eq!(combo.register_move(2, 3), 1);
        assert!(combo.opened);
        assert_eq!(combo.counter, 0);
    }

    #[test]
    fn test_following_clears_accumulate_lines() {
        let mut combo = ComboState::new();
        combo.register_move(1, 3);
        assert_eq!(combo.register_move(1, 3), 1);
        assert_eq!(combo.register_move(2, 3), 3);
        assert_eq!(combo.counter, 3);
    }

    #[test]
    fn test_gap_below_threshold_keeps_combo() {
        let mut combo = ComboState::new();
        combo.register_move(1, 3);
        combo.register_move(1, 3);
        combo.register_move(0, 3);
        combo.register_move(0, 3);
        assert!(combo.opened);
        assert_eq!(combo.register_move(1, 3), 2);
    }

    #[test]
    fn test_three_misses_close() {
        let mut combo = ComboState::new();
        combo.register_move(1, 3);
        combo.register_move(2, 3);
        for _ in 0..3 {
            assert_eq!(combo.register_move(0, 3), 1);
        }
        assert!(!combo.opened);
        assert_eq!(combo.counter, 0);
        // re-opens at baseline
        assert_eq!(combo.register_move(1, 3), 1);
        assert_eq!(combo.counter, 0);
    }

    #[test]
    fn test_reset() {
        let mut combo = ComboState::new();
        combo.register_move(1, 3);
        combo.register_move(4, 3);
        combo.reset();
        assert_eq!(combo, ComboState::default());
    }
}
