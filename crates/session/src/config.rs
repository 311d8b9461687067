use blockgrid_core::Board;
use blockgrid_engine::{ScoringConfig, SnapConfig};
use blockgrid_search::GeneratorConfig;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub width: usize,
    pub height: usize,
    pub scoring: ScoringConfig,
    pub snap: SnapConfig,
    pub generator: GeneratorConfig,
}

impl SessionConfig {
    pub fn classic() -> Self {
        Self {
            width: Board::DEFAULT_WIDTH,
            height: Board::DEFAULT_HEIGHT,
            scoring: ScoringConfig::classic(),
            snap: SnapConfig::classic(),
            generator: GeneratorConfig::classic(),
        }
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        self.scoring.validate()?;
        self.snap.validate()?;
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::classic()
    }
}
