//! Tunable scoring and snapping parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("line clear table must contain at least the zero-line entry")]
    EmptyLineTable,
    #[error("line clear table entry for zero lines must be 0, got {0}")]
    NonZeroBaseline(u32),
    #[error("combo reset threshold must be at least 1")]
    ZeroComboReset,
    #[error("snap distance {snap} must not exceed sticky distance {sticky}")]
    SnapOutsideSticky { snap: f32, sticky: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Points per placed cell
    pub points_per_cell: u32,
    /// Index = lines cleared in one move. Counts past the end use the last entry.
    pub line_clear_points: Vec<u32>,
    pub board_clear_bonus: u32,
    /// Figure multiplier for straight 1xN / Nx1 pieces
    pub line_figure_multiplier: u32,
    /// Figure multiplier for every other multi-cell piece
    pub complex_figure_multiplier: u32,
    /// Consecutive non-clearing moves that close an open combo
    pub combo_reset_after: u32,
}

impl ScoringConfig {
    pub fn classic() -> Self {
        Self {
            points_per_cell: 1,
            line_clear_points: vec![0, 10, 20, 60, 120, 200],
            board_clear_bonus: 300,
            line_figure_multiplier: 2,
            complex_figure_multiplier: 5,
            combo_reset_after: 3,
        }
    }

    /// Line clear points for `lines` cleared at once, saturating at the table end.
    pub fn line_points(&self, lines: u32) -> u32 {
        if lines == 0 {
            return 0;
        }
        let idx = (lines as usize).min(self.line_clear_points.len().saturating_sub(1));
        self.line_clear_points.get(idx).copied().unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.line_clear_points.first() {
            None => return Err(ConfigError::EmptyLineTable),
            Some(&base) if base != 0 => return Err(ConfigError::NonZeroBaseline(base)),
            Some(_) => {}
        }
        if self.combo_reset_after == 0 {
            return Err(ConfigError::ZeroComboReset);
        }
        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::classic()
    }
}

/// Two-tier snapping thresholds, in cell units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapConfig {
    /// Nearest valid anchor within this distance is taken
    pub snap_distance: f32,
    /// Last snapped anchor is kept while the pointer stays within this distance
    pub sticky_distance: f32,
}

impl SnapConfig {
    pub fn classic() -> Self {
        Self {
            snap_distance: 0.5,
            sticky_distance: 2.0,
        }
    }

    /// Snap only, no hysteresis
    pub fn strict() -> Self {
        Self {
            snap_distance: 0.5,
            sticky_distance: 0.5,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.snap_distance > self.sticky_distance {
            return Err(ConfigError::SnapOutsideSticky {
                snap: self.snap_distance,
                sticky: self.sticky_distance,
            });
        }
        Ok(())
    }
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_line_points() {
        let config = ScoringConfig::classic();
        assert_eq!(config.line_points(0), 0);
        assert_eq!(config.line_points(1), 10);
        assert_eq!(config.line_points(3), 60);
        assert_eq!(config.line_points(5), 200);
    }

    #[test]
    fn test_line_points_saturate() {
        let config = ScoringConfig::classic();
        assert_eq!(config.line_points(6), 200);
        assert_eq!(config.line_points(16), 200);
    }

    #[test]
    fn test_validate() {
        assert!(ScoringConfig::classic().validate().is_ok());
        let mut config = ScoringConfig::classic();
        config.line_clear_points.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyLineTable));
        config.line_clear_points = vec![5, 10];
        assert_eq!(config.validate(), Err(ConfigError::NonZeroBaseline(5)));
        config.line_clear_points = vec![0, 10];
        config.combo_reset_after = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroComboReset));
    }

    #[test]
    fn test_snap_validate() {
        assert!(SnapConfig::classic().validate().is_ok());
        assert!(SnapConfig::strict().validate().is_ok());
        let bad = SnapConfig {
            snap_distance: 3.0,
            sticky_distance: 1.0,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_serde_defaults() {
        let json = serde_json::to_string(&ScoringConfig::default()).expect("serialize");
        let back: ScoringConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, ScoringConfig::classic());
    }
}
