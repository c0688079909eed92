//! Engine configuration, loaded from `roverlab-config.yaml` when
//! present and defaulted otherwise.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Settings for a headless mission run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Catalog id of the mission to run.
    pub mission_id: String,
    /// Multiplier on instruction pacing delays. `1.0` is real time;
    /// `0.0` runs as fast as possible (timed doors still use wall
    /// clock).
    pub pacing_scale: f64,
    /// Whether to log every executor event.
    pub log_events: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mission_id: "mission_1_1".to_owned(),
            pacing_scale: 1.0,
            log_events: true,
        }
    }
}

impl EngineConfig {
    /// Parse configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let contents = std::fs::read_to_string(path).map_err(|e| EngineError::Config {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        serde_yml::from_str(&contents).map_err(|e| EngineError::Config {
            message: format!("failed to parse {}: {e}", path.display()),
        })
    }

    /// Load `roverlab-config.yaml` from the working directory, falling
    /// back to defaults when the file does not exist.
    pub fn load() -> Result<Self, EngineError> {
        let path = Path::new("roverlab-config.yaml");
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!("config file not found, using defaults");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = EngineConfig::default();
        assert_eq!(config.mission_id, "mission_1_1");
        assert_eq!(config.pacing_scale, 1.0);
        assert!(config.log_events);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: Result<EngineConfig, _> = serde_yml::from_str("mission_id: mission_2_1\n");
        let config = config.unwrap_or_default();
        assert_eq!(config.mission_id, "mission_2_1");
        assert_eq!(config.pacing_scale, 1.0);
    }
}
