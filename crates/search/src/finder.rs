use std::cmp::Ordering;

use blockgrid_core::{Board, Piece, Position, Shape};
use blockgrid_engine::{find_all_valid_positions, place, preview_clear};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Triples examined before giving up
    pub max_combinations: usize,
    /// Empty cells required around a chosen anchor (bounding box grown by 1)
    pub min_free_margin: usize,
    pub early_exit_score: u32,
    pub early_exit_combo: u32,
    /// Score per row or column a placement completes
    pub line_score: u32,
}

impl FinderConfig {
    pub fn classic() -> Self {
        Self {
            max_combinations: 100,
            min_free_margin: 4,
            early_exit_score: 200,
            early_exit_combo: 2,
            line_score: 100,
        }
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self::classic()
    }
}

/// A sequentially placeable triple and the anchors chosen for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockSet {
    pub pieces: [Piece; 3],
    pub placements: [Position; 3],
    pub score_potential: u32,
    pub combo_potential: u32,
    pub total_size: usize,
}

impl BlockSet {
    fn rank(&self, other: &Self) -> Ordering {
        other
            .score_potential
            .cmp(&self.score_potential)
            .then(other.combo_potential.cmp(&self.combo_potential))
            .then(other.total_size.cmp(&self.total_size))
    }
}

pub struct BlockSetFinder {
    pub config: FinderConfig,
}

impl BlockSetFinder {
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Search ordered triples of distinct pool entries, best first.
    /// Empty when nothing in the budget fits.
    pub fn find_suitable_sets(&self, pool: &[Piece], board: &Board) -> Vec<BlockSet> {
        let mut order: Vec<usize> = (0..pool.len()).collect();
        order.sort_by(|&a, &b| {
            priority_score(&pool[b].shape)
                .partial_cmp(&priority_score(&pool[a].shape))
                .unwrap_or(Ordering::Equal)
        });

        let budget = self.config.max_combinations;
        let mut checked = 0usize;
        let mut found = Vec::new();

        'outer: for &i in &order {
            for &j in &order {
                if j == i {
                    continue;
                }
                for &k in &order {
                    if checked >= budget {
                        break 'outer;
                    }
                    if k == i || k == j {
                        continue;
                    }
                    checked += 1;

                    let triple = [&pool[i], &pool[j], &pool[k]];
                    if let Some(set) = self.evaluate_sequence(triple, board) {
                        if set.score_potential >= self.config.early_exit_score
                            && set.combo_potential >= self.config.early_exit_combo
                        {
                            return vec![set];
                        }
                        found.push(set);
                    }
                }
            }
        }

        found.sort_by(BlockSet::rank);
        found
    }

    /// Simulate placing the pieces in order. Lines are not cleared between
    /// steps. `None` if a piece has no anchor or starves its surroundings.
    pub fn evaluate_sequence(&self, pieces: [&Piece; 3], board: &Board) -> Option<BlockSet> {
        let mut current = board.clone();
        let mut placements = [Position::default(); 3];
        let mut score_potential = 0u32;
        let mut combo_potential = 0u32;
        let mut total_size = 0usize;

        for (slot, piece) in pieces.iter().enumerate() {
            let valid = find_all_valid_positions(&current, &piece.shape);
            let (&first, rest) = valid.split_first()?;

            let lines_at = |pos: Position| preview_clear(&current, &piece.shape, pos).line_count() as u32;
            let mut best = (first, lines_at(first) * self.config.line_score, lines_at(first));
            for &pos in rest {
                let lines = lines_at(pos);
                let score = lines * self.config.line_score;
                if score > best.1 || (score == best.1 && lines > best.2) {
                    best = (pos, score, lines);
                }
            }
            let (pos, score, combo) = best;

            if free_margin(&current, &piece.shape, pos) < self.config.min_free_margin {
                return None;
            }

            score_potential += score;
            combo_potential += combo;
            total_size += piece.size();
            placements[slot] = pos;
            current = place(&current, piece, pos);
        }

        Some(BlockSet {
            pieces: pieces.map(Piece::clone),
            placements,
            score_potential,
            combo_potential,
            total_size,
        })
    }
}

impl Default for BlockSetFinder {
    fn default() -> Self {
        Self::new(FinderConfig::classic())
    }
}

/// Bigger and more compact shapes first, with a bonus for 2x3, 3x3 and 2x2 boxes.
pub fn priority_score(shape: &Shape) -> f32 {
    let size = shape.size() as f32;
    let footprint = match (shape.height(), shape.width()) {
        (2, 3) | (3, 2) => 50.0,
        (3, 3) => 40.0,
        (2, 2) => 30.0,
        _ => 0.0,
    };
    size * 10.0 + footprint + shape.compactness() * 20.0
}

/// Empty cells in the anchor's bounding box grown by one, clamped to the board.
pub fn free_margin(board: &Board, shape: &Shape, pos: Position) -> usize {
    let x0 = (pos.x - 1).max(0);
    let y0 = (pos.y - 1).max(0);
    let x1 = (pos.x + shape.width() as i32 + 1).min(board.width() as i32);
    let y1 = (pos.y + shape.height() as i32 + 1).min(board.height() as i32);
    (y0..y1)
        .flat_map(|y| (x0..x1).map(move |x| (x, y)))
        .filter(|&(x, y)| board.is_free(x, y))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockgrid_core::{Catalogue, Cell, Color, PieceId};
    use blockgrid_engine::can_place;

    fn pool() -> Vec<Piece> {
        Catalogue::standard()
            .iter()
            .enumerate()
            .map(|(i, entry)| entry.instantiate(PieceId(i as u64), Color::Red))
            .collect()
    }

    fn find(pool: &[Piece], id: &str) -> Piece {
        pool.iter()
            .find(|p| p.kind == id)
            .cloned()
            .expect("pool id")
    }

    #[test]
    fn test_priority_order() {
        let pool = pool();
        let rect = priority_score(&find(&pool, "rect-2x3").shape);
        let big = priority_score(&find(&pool, "square-3x3").shape);
        let small = priority_score(&find(&pool, "square-2x2").shape);
        let dots = priority_score(&find(&pool, "3-dots-diagonal").shape);
        // 9*10 + 40 + 20
        assert!((big - 150.0).abs() < 0.0001);
        // 6*10 + 50 + 20
        assert!((rect - 130.0).abs() < 0.0001);
        assert!((small - 90.0).abs() < 0.0001);
        assert!(dots < small);
    }

    #[test]
    fn test_free_margin_clamps_to_board() {
        let board = Board::new();
        let pool = pool();
        let sq = find(&pool, "square-2x2");
        // corner: 3x3 window
        assert_eq!(free_margin(&board, &sq.shape, Position::new(0, 0)), 9);
        // interior: 4x4 window
        assert_eq!(free_margin(&board, &sq.shape, Position::new(3, 3)), 16);
    }

    #[test]
    fn test_empty_board_finds_sets() {
        let finder = BlockSetFinder::default();
        let pool = pool();
        let sets = finder.find_suitable_sets(&pool, &Board::new());
        assert!(!sets.is_empty());
        assert!(sets.len() <= finder.config.max_combinations);
        for pair in sets.windows(2) {
            assert_ne!(pair[0].rank(&pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn test_sets_replay_on_input_board() {
        let mut board = Board::new();
        for x in 0..5 {
            board.set(x, 7, Cell::Filled(Color::Blue));
        }
        let finder = BlockSetFinder::default();
        for set in finder.find_suitable_sets(&pool(), &board) {
            let mut current = board.clone();
            for (piece, &pos) in set.pieces.iter().zip(set.placements.iter()) {
                assert!(can_place(&current, &piece.shape, pos));
                current = place(&current, piece, pos);
            }
        }
    }

    #[test]
    fn test_early_exit_on_double_clear() {
        let mut board = Board::new();
        for y in 5..8 {
            for x in 0..8 {
                if x < 5 {
                    board.set(x, y, Cell::Filled(Color::Blue));
                }
            }
        }
        let pool = vec![find(&pool(), "square-3x3"), find(&pool(), "hor-2"), find(&pool(), "vert-2")];
        let sets = BlockSetFinder::default().find_suitable_sets(&pool, &board);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].pieces[0].kind, "square-3x3");
        assert_eq!(sets[0].placements[0], Position::new(5, 5));
        assert!(sets[0].score_potential >= 300);
    }

    #[test]
    fn test_unplaceable_pool_returns_empty() {
        let mut board = Board::new();
        for y in 0..8 {
            for x in 0..8 {
                if (x + y) % 2 == 0 {
                    board.set(x, y, Cell::Filled(Color::Blue));
                }
            }
        }
        let pool = vec![find(&pool(), "hor-2"), find(&pool(), "vert-2"), find(&pool(), "square-2x2")];
        assert!(BlockSetFinder::default().find_suitable_sets(&pool, &board).is_empty());
    }

    #[test]
    fn test_budget_caps_search() {
        let finder = BlockSetFinder::new(FinderConfig {
            max_combinations: 1,
            ..FinderConfig::classic()
        });
        let sets = finder.find_suitable_sets(&pool(), &Board::new());
        assert!(sets.len() <= 1);
    }

    #[test]
    fn test_pool_smaller_than_three() {
        let pool = vec![find(&pool(), "hor-2"), find(&pool(), "vert-2")];
        assert!(BlockSetFinder::default().find_suitable_sets(&pool, &Board::new()).is_empty());
    }
}
