//! blockgrid-engine - placement, line clearing and scoring for the block puzzle.
//!
//! Every function here is a pure query over `Board` / `Piece` values except
//! `ScoreCalculator` (combo state) and `ShapeBag` (draw order).

pub mod bag;
pub mod combo;
pub mod config;
pub mod placement;
pub mod positions;
pub mod scoring;

pub use bag::ShapeBag;
pub use combo::ComboState;
pub use config::{ConfigError, ScoringConfig, SnapConfig};
pub use placement::{
    apply_placement, can_place, cells_to_clear, clear_lines, is_game_over, place, preview_clear,
    ClearMask, LineClear, Placement,
};
pub use positions::{
    count_valid_positions, find_all_valid_positions, find_nearest_valid_position,
    has_valid_position, PositionList,
};
pub use scoring::{ScoreCalculator, ScoreResult};
