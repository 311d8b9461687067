//! Per-session score calculator holding combo state.

use blockgrid_core::{Board, Piece};
use serde::{Deserialize, Serialize};

use crate::combo::ComboState;
use crate::config::ScoringConfig;
use crate::placement::Placement;

/// Score breakdown for one placement. Never mutated after creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub cleared_lines: u32,
    pub cells_placed: u32,
    pub placed_points: u32,
    /// Table points before the combo multiplier
    pub line_clear_points: u32,
    /// Figure bonus: fully cleared multi-cell pieces only
    pub cleared_cell_points: u32,
    pub combo_level: u32,
    pub combo_multiplier: u32,
    pub board_cleared: bool,
    pub total_points: u32,
}

#[derive(Clone, Debug, Default)]
pub struct ScoreCalculator {
    config: ScoringConfig,
    combo: ComboState,
}

impl ScoreCalculator {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            combo: ComboState::new(),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn combo(&self) -> &ComboState {
        &self.combo
    }

    /// Score one move. `board` is the board after clearing.
    pub fn calculate_score(
        &mut self,
        board: &Board,
        cleared_lines: u32,
        cells_placed: u32,
        cells_in_cleared_lines: u32,
        piece: &Piece,
    ) -> ScoreResult {
        let cfg = &self.config;
        let placed_points = cells_placed * cfg.points_per_cell;
        let line_clear_points = cfg.line_points(cleared_lines);
        let combo_multiplier = self
            .combo
            .register_move(cleared_lines, cfg.combo_reset_after);

        let full_figure = piece.size() > 1 && cells_in_cleared_lines as usize == piece.size();
        let cleared_cell_points = if full_figure {
            let multiplier = if piece.shape.is_straight() {
                cfg.line_figure_multiplier
            } else {
                cfg.complex_figure_multiplier
            };
            cells_in_cleared_lines * cfg.points_per_cell * multiplier
        } else {
            0
        };

        let board_cleared = board.is_clear();
        let board_bonus = if board_cleared {
            cfg.board_clear_bonus
        } else {
            0
        };

        ScoreResult {
            cleared_lines,
            cells_placed,
            placed_points,
            line_clear_points,
            cleared_cell_points,
            combo_level: self.combo.counter,
            combo_multiplier,
            board_cleared,
            total_points: placed_points
                + line_clear_points * combo_multiplier
                + cleared_cell_points
                + board_bonus,
        }
    }

    /// Convenience over `calculate_score` for an applied placement
    pub fn score_placement(&mut self, placement: &Placement, piece: &Piece) -> ScoreResult {
        self.calculate_score(
            &placement.board,
            placement.lines,
            placement.cells_placed,
            placement.cells_in_cleared_lines,
            piece,
        )
    }

    pub fn reset_combo(&mut self) {
        self.combo.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockgrid_core::{Catalogue, Color, PieceId};

    fn piece(id: &str) -> Piece {
        Catalogue::standard()
            .find(id)
            .expect("catalogue id")
            .instantiate(PieceId(1), Color::Orange)
    }

    fn non_empty_board() -> Board {
        Board::from_ascii(&["#......."], Color::Red).expect("board")
    }

    #[test]
    fn test_plain_placement() {
        let mut calc = ScoreCalculator::default();
        let r = calc.calculate_score(&non_empty_board(), 0, 4, 0, &piece("square-2x2"));
        assert_eq!(r.placed_points, 4);
        assert_eq!(r.total_points, 4);
        assert_eq!(r.combo_multiplier, 1);
        assert!(!r.board_cleared);
    }

    #[test]
    fn test_line_table() {
        let mut calc = ScoreCalculator::default();
        let r = calc.calculate_score(&non_empty_board(), 3, 3, 0, &piece("hor-3"));
        assert_eq!(r.line_clear_points, 60);
        // opens combo, multiplier 1
        assert_eq!(r.total_points, 3 + 60);
    }

    #[test]
    fn test_combo_multiplies_line_points() {
        let mut calc = ScoreCalculator::default();
        let board = non_empty_board();
        calc.calculate_score(&board, 1, 2, 0, &piece("hor-2"));
        let r = calc.calculate_score(&board, 2, 2, 0, &piece("hor-2"));
        assert_eq!(r.combo_multiplier, 2);
        assert_eq!(r.combo_level, 2);
        assert_eq!(r.total_points, 2 + 20 * 2);
    }

    #[test]
    fn test_figure_multiplier_line_piece() {
        let mut calc = ScoreCalculator::default();
        let r = calc.calculate_score(&non_empty_board(), 1, 3, 3, &piece("hor-3"));
        assert_eq!(r.cleared_cell_points, 3 * 2);
    }

    #[test]
    fn test_figure_multiplier_complex_piece() {
        let mut calc = ScoreCalculator::default();
        let r = calc.calculate_score(&non_empty_board(), 2, 4, 4, &piece("square-2x2"));
        assert_eq!(r.cleared_cell_points, 4 * 5);
        assert_eq!(r.total_points, 4 + 20 + 20);
    }

    #[test]
    fn test_partial_figure_no_bonus() {
        let mut calc = ScoreCalculator::default();
        let r = calc.calculate_score(&non_empty_board(), 1, 4, 2, &piece("square-2x2"));
        assert_eq!(r.cleared_cell_points, 0);
    }

    #[test]
    fn test_board_clear_bonus() {
        let mut calc = ScoreCalculator::default();
        let r = calc.calculate_score(&Board::new(), 1, 2, 2, &piece("hor-2"));
        assert!(r.board_cleared);
        assert_eq!(r.total_points, 2 + 10 + 4 + 300);
    }

    #[test]
    fn test_reset_combo() {
        let mut calc = ScoreCalculator::default();
        let board = non_empty_board();
        calc.calculate_score(&board, 1, 2, 0, &piece("hor-2"));
        calc.calculate_score(&board, 1, 2, 0, &piece("hor-2"));
        assert_eq!(calc.combo().counter, 1);
        calc.reset_combo();
        assert_eq!(*calc.combo(), ComboState::default());
    }
}
