//! Next-triple generation: bag draws with a diversity rule, falling back to
//! the set finder when the board looks critical.

use std::collections::VecDeque;

use blockgrid_core::{
    Board, Catalogue, CatalogueEntry, CatalogueError, Color, Piece, PieceId, Position, ShapeClass,
};
use blockgrid_engine::{has_valid_position, ShapeBag};
use blockgrid_eval::DifficultyEvaluator;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::finder::{BlockSetFinder, FinderConfig};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CriticalConfig {
    /// Any filled cell in this many top rows is critical
    pub danger_rows: usize,
    pub max_fill_ratio: f32,
    /// Critical when the largest empty region is no bigger than this. The
    /// direction is deliberate: "some region exceeds it" holds on an empty board.
    pub open_region_threshold: usize,
}

impl CriticalConfig {
    pub fn classic() -> Self {
        Self {
            danger_rows: 2,
            max_fill_ratio: 0.7,
            open_region_threshold: 12,
        }
    }
}

impl Default for CriticalConfig {
    fn default() -> Self {
        Self::classic()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Bag draws allowed before force-filling
    pub max_attempts: usize,
    /// Shape classes remembered for the diversity rule
    pub history_len: usize,
    /// Skip draws rated harder than this
    pub max_difficulty: Option<f32>,
    pub critical: CriticalConfig,
    pub finder: FinderConfig,
}

impl GeneratorConfig {
    pub fn classic() -> Self {
        Self {
            max_attempts: 50,
            history_len: 2,
            max_difficulty: None,
            critical: CriticalConfig::classic(),
            finder: FinderConfig::classic(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::classic()
    }
}

/// Everything the generator remembers between triples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorState {
    pub bag: ShapeBag,
    pub recent: VecDeque<ShapeClass>,
    pub next_id: u64,
    pub next_color: Color,
}

/// A freshly generated triple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DealtTriple {
    pub pieces: [Piece; 3],
    /// Anchors from the set finder; the pieces fit there in slot order
    pub plan: Option<[Position; 3]>,
}

impl DealtTriple {
    pub fn is_guaranteed(&self) -> bool {
        self.plan.is_some()
    }
}

pub struct BlockGenerator {
    catalogue: Catalogue,
    evaluator: DifficultyEvaluator,
    finder: BlockSetFinder,
    config: GeneratorConfig,
}

impl BlockGenerator {
    pub fn new(catalogue: Catalogue, config: GeneratorConfig) -> Result<Self, CatalogueError> {
        if catalogue.is_empty() {
            return Err(CatalogueError::Empty);
        }
        Ok(Self {
            catalogue,
            evaluator: DifficultyEvaluator::default(),
            finder: BlockSetFinder::new(config.finder.clone()),
            config,
        })
    }

    pub fn with_evaluator(mut self, evaluator: DifficultyEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn initial_state<R: Rng + ?Sized>(&self, rng: &mut R) -> GeneratorState {
        GeneratorState {
            bag: ShapeBag::new(self.catalogue.len(), rng),
            recent: VecDeque::with_capacity(self.config.history_len),
            next_id: 1,
            next_color: random_color(rng),
        }
    }

    pub fn is_critical_situation(&self, board: &Board) -> bool {
        is_critical_situation(board, &self.config.critical)
    }

    /// Always returns exactly three pieces.
    pub fn next_blocks<R: Rng + ?Sized>(
        &self,
        mut state: GeneratorState,
        board: &Board,
        rng: &mut R,
    ) -> (GeneratorState, DealtTriple) {
        if self.is_critical_situation(board) {
            if let Some(dealt) = self.guaranteed_triple(&mut state, board, rng) {
                return (state, dealt);
            }
        }

        let mut budget = DrawBudget::default();
        let pieces = [(); 3].map(|_| self.draw_one(&mut state, board, rng, &mut budget));
        (state, DealtTriple { pieces, plan: None })
    }

    // One bag draw that passes the filters, sharing the attempt budget across
    // the triple. Once the budget is spent the next bag entry is taken as is.
    fn draw_one<R: Rng + ?Sized>(
        &self,
        state: &mut GeneratorState,
        board: &Board,
        rng: &mut R,
        budget: &mut DrawBudget,
    ) -> Piece {
        while budget.attempts < self.config.max_attempts {
            budget.attempts += 1;
            let Some(idx) = state.bag.draw(rng) else {
                break;
            };
            let entry = self.entry(idx);
            let skip = !self.acceptable(entry, board)
                || (state.recent.contains(&entry.shape.class())
                    && self.has_fresh_alternative(state, board, entry));
            if skip {
                budget.reject(&mut state.bag, idx);
                continue;
            }
            return self.dispense(state, entry, rng);
        }

        let idx = state.bag.draw(rng).unwrap_or(0);
        self.dispense(state, self.entry(idx), rng)
    }

    fn acceptable(&self, entry: &CatalogueEntry, board: &Board) -> bool {
        let eval = self.evaluator.evaluate_shape(&entry.shape, board);
        let too_hard = self
            .config
            .max_difficulty
            .is_some_and(|max| eval.difficulty > max);
        eval.is_placeable() && !too_hard
    }

    /// Head of the bag as it would be dealt next, not consumed.
    pub fn preview_block(&self, state: &GeneratorState) -> Option<Piece> {
        let idx = state.bag.peek()?;
        Some(
            self.entry(idx)
                .instantiate(PieceId(state.next_id), state.next_color),
        )
    }

    fn entry(&self, idx: usize) -> &CatalogueEntry {
        // catalogue is non-empty, checked in new()
        &self.catalogue.entries()[idx % self.catalogue.len()]
    }

    fn dispense<R: Rng + ?Sized>(
        &self,
        state: &mut GeneratorState,
        entry: &CatalogueEntry,
        rng: &mut R,
    ) -> Piece {
        let piece = entry.instantiate(PieceId(state.next_id), state.next_color);
        state.next_id += 1;
        state.next_color = random_color(rng);
        state.recent.push_back(entry.shape.class());
        while state.recent.len() > self.config.history_len {
            state.recent.pop_front();
        }
        piece
    }

    // Another bag entry of the same difficulty tier whose class was not dealt
    // recently and which would be accepted.
    fn has_fresh_alternative(
        &self,
        state: &GeneratorState,
        board: &Board,
        drawn: &CatalogueEntry,
    ) -> bool {
        state.bag.remaining().any(|idx| {
            let other = self.entry(idx);
            other.id != drawn.id
                && other.difficulty == drawn.difficulty
                && !state.recent.contains(&other.shape.class())
                && self.acceptable(other, board)
        })
    }

    fn guaranteed_triple<R: Rng + ?Sized>(
        &self,
        state: &mut GeneratorState,
        board: &Board,
        rng: &mut R,
    ) -> Option<DealtTriple> {
        let pool: Vec<Piece> = self
            .catalogue
            .iter()
            .enumerate()
            .filter(|(_, entry)| has_valid_position(board, &entry.shape))
            .map(|(idx, entry)| entry.instantiate(PieceId(idx as u64), Color::Red))
            .collect();

        let best = self.finder.find_suitable_sets(&pool, board).into_iter().next()?;
        let pieces = best.pieces.map(|piece| {
            let fresh = piece.retagged(PieceId(state.next_id), state.next_color);
            state.next_id += 1;
            state.next_color = random_color(rng);
            state.recent.push_back(fresh.class());
            fresh
        });
        while state.recent.len() > self.config.history_len {
            state.recent.pop_front();
        }
        Some(DealtTriple {
            pieces,
            plan: Some(best.placements),
        })
    }
}

#[derive(Default)]
struct DrawBudget {
    attempts: usize,
    rejected: Vec<usize>,
}

impl DrawBudget {
    // A first rejection goes back to the end of its cycle. Meeting the same
    // entry again means the cycle has come round once, so it is dropped and
    // the bag moves on to the next cycle.
    fn reject(&mut self, bag: &mut ShapeBag, idx: usize) {
        if self.rejected.contains(&idx) {
            return;
        }
        self.rejected.push(idx);
        bag.put_back(idx);
    }
}

fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::ALL[rng.gen_range(0..Color::ALL.len())]
}

/// Board looks close to lost: filled cells in the danger rows, fill ratio
/// above the limit, or free space broken into small pockets.
pub fn is_critical_situation(board: &Board, config: &CriticalConfig) -> bool {
    let danger = (0..config.danger_rows.min(board.height())).any(|y| board.row_fill(y) > 0);
    if danger {
        return true;
    }
    if board.fill_ratio() > config.max_fill_ratio {
        return true;
    }
    largest_empty_region(board) <= config.open_region_threshold
}

/// Size of the largest 4-connected group of empty cells.
pub fn largest_empty_region(board: &Board) -> usize {
    let (width, height) = (board.width(), board.height());
    let mut seen = vec![false; width * height];
    let mut stack: Vec<(i32, i32)> = Vec::new();
    let mut largest = 0;

    for start in 0..width * height {
        let (sx, sy) = ((start % width) as i32, (start / width) as i32);
        if seen[start] || !board.is_free(sx, sy) {
            continue;
        }
        seen[start] = true;
        stack.push((sx, sy));
        let mut size = 0;
        while let Some((x, y)) = stack.pop() {
            size += 1;
            for (nx, ny) in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
                if board.is_free(nx, ny) {
                    let idx = ny as usize * width + nx as usize;
                    if !seen[idx] {
                        seen[idx] = true;
                        stack.push((nx, ny));
                    }
                }
            }
        }
        largest = largest.max(size);
    }
    largest
}
