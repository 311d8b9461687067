//! blockgrid eval crate - difficulty and score potential of a piece on a board.

use blockgrid_core::{Board, Piece, Position, Shape};
use blockgrid_engine::find_all_valid_positions;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvalWeights {
    pub size: f32,
    pub shape: f32,
    pub placements: f32,
    pub clear_potential: f32,
    pub score_clear: f32,
    pub score_combo: f32,
    pub score_placement: f32,
    /// Cell count at which the size sub-score saturates
    pub size_cap: f32,
    /// Placement count at which the placement sub-score saturates
    pub placement_cap: f32,
    pub line_shape: f32,
    pub square_shape: f32,
    pub complex_shape: f32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            size: 0.3,
            shape: 0.2,
            placements: 0.3,
            clear_potential: 0.2,
            score_clear: 0.4,
            score_combo: 0.3,
            score_placement: 0.3,
            size_cap: 5.0,
            placement_cap: 20.0,
            line_shape: 0.3,
            square_shape: 0.6,
            complex_shape: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockEvaluation {
    /// 0..=1
    pub difficulty: f32,
    /// 0..=100
    pub score_potential: f32,
    pub placement_options: usize,
}

impl BlockEvaluation {
    pub fn is_placeable(&self) -> bool {
        self.placement_options > 0
    }
}

#[derive(Clone, Debug, Default)]
pub struct DifficultyEvaluator {
    pub weights: EvalWeights,
}

impl DifficultyEvaluator {
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }

    pub fn evaluate_block(&self, piece: &Piece, board: &Board) -> BlockEvaluation {
        self.evaluate_shape(&piece.shape, board)
    }

    pub fn evaluate_shape(&self, shape: &Shape, board: &Board) -> BlockEvaluation {
        let w = &self.weights;
        let placements = find_all_valid_positions(board, shape);
        let placement_options = placements.len();

        // unplaceable shapes rank as hardest and worthless
        if placement_options == 0 {
            return BlockEvaluation {
                difficulty: 1.0,
                score_potential: 0.0,
                placement_options,
            };
        }

        let clear = clear_potential(shape, board);
        let placement = placement_score(placement_options, w);

        let difficulty = size_score(shape, w) * w.size
            + shape_score(shape, w) * w.shape
            + placement * w.placements
            + clear * w.clear_potential;

        let combo = combo_potential(shape, board, &placements);
        let score_potential =
            (clear * w.score_clear + combo * w.score_combo + placement * w.score_placement) * 100.0;

        BlockEvaluation {
            difficulty: difficulty.clamp(0.0, 1.0),
            score_potential: score_potential.clamp(0.0, 100.0),
            placement_options,
        }
    }
}

pub fn size_score(shape: &Shape, weights: &EvalWeights) -> f32 {
    (shape.size() as f32 / weights.size_cap).min(1.0)
}

/// Judged on the bounding box: 1xN / Nx1, NxN, everything else
pub fn shape_score(shape: &Shape, weights: &EvalWeights) -> f32 {
    if shape.is_straight() {
        weights.line_shape
    } else if shape.width() == shape.height() {
        weights.square_shape
    } else {
        weights.complex_shape
    }
}

pub fn placement_score(options: usize, weights: &EvalWeights) -> f32 {
    (options as f32 / weights.placement_cap).min(1.0)
}

/// 0.5 for each row one shape-width short of full and each column one
/// shape-height short of full, capped at 1.
pub fn clear_potential(shape: &Shape, board: &Board) -> f32 {
    let rows = (0..board.height())
        .filter(|&y| board.row_fill(y) + shape.width() == board.width())
        .count();
    let cols = (0..board.width())
        .filter(|&x| board.column_fill(x) + shape.height() == board.height())
        .count();
    ((rows + cols) as f32 * 0.5).min(1.0)
}

/// Best over `placements` of 0.5 per row or column the shape would complete,
/// capped at 1.
pub fn combo_potential(shape: &Shape, board: &Board, placements: &[Position]) -> f32 {
    let mut best = 0.0f32;
    for pos in placements {
        let (x, y) = (pos.x as usize, pos.y as usize);
        let rows = (0..shape.height())
            .filter(|&dy| board.row_fill(y + dy) + shape.row_size(dy) == board.width())
            .count();
        let cols = (0..shape.width())
            .filter(|&dx| board.column_fill(x + dx) + shape.column_size(dx) == board.height())
            .count();
        best = best.max((rows + cols) as f32 * 0.5);
    }
    best.min(1.0)
}
