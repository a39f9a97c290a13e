//! Environment-driven configuration

use std::path::PathBuf;

use crate::drag::{DragConfig, DEFAULT_ACTIVATION_DISTANCE};
use crate::storage::DEFAULT_STORAGE_KEY;

pub const DATA_DIR_VAR: &str = "KANBAN_DATA_DIR";
pub const STORAGE_KEY_VAR: &str = "KANBAN_STORAGE_KEY";
pub const DRAG_DISTANCE_VAR: &str = "KANBAN_DRAG_DISTANCE";

const DEFAULT_DATA_DIR: &str = ".kanban-data";

/// Settings for a board host
#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    /// Directory the snapshot blob is written to
    pub data_dir: PathBuf,
    /// Namespace key of the snapshot blob
    pub storage_key: String,
    pub drag: DragConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            drag: DragConfig::default(),
        }
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_distance(raw: Option<String>) -> f64 {
    non_empty(raw)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value >= 0.0)
        .unwrap_or(DEFAULT_ACTIVATION_DISTANCE)
}

impl BoardConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through a variable lookup; unset or invalid values
    /// fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            data_dir: non_empty(lookup(DATA_DIR_VAR))
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            storage_key: non_empty(lookup(STORAGE_KEY_VAR))
                .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            drag: DragConfig {
                activation_distance: parse_distance(lookup(DRAG_DISTANCE_VAR)),
            },
        }
    }
}
