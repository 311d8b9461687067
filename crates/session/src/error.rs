use blockgrid_core::CatalogueError;
use blockgrid_engine::ConfigError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("slot {0} does not exist")]
    UnknownSlot(usize),
    #[error("slot {0} is empty")]
    EmptySlot(usize),
    #[error("piece in slot {slot} does not fit at ({x}, {y})")]
    InvalidPlacement { slot: usize, x: i32, y: i32 },
    #[error("the game is over")]
    GameOver,
    #[error("snapshot board is {found_width}x{found_height}, session board is {width}x{height}")]
    BoardMismatch {
        width: usize,
        height: usize,
        found_width: usize,
        found_height: usize,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
}

impl SessionError {
    /// Stable identifier for presentation layers.
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::UnknownSlot(_) => "unknown_slot",
            SessionError::EmptySlot(_) => "empty_slot",
            SessionError::InvalidPlacement { .. } => "invalid_placement",
            SessionError::GameOver => "game_over",
            SessionError::BoardMismatch { .. } => "board_mismatch",
            SessionError::Config(_) => "invalid_config",
            SessionError::Catalogue(_) => "invalid_catalogue",
        }
    }
}
