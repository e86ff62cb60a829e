//! Serializable configuration for scene controllers.
//!
//! Configuration is plain JSON deserialized with serde. Validation uses
//! Stillwater's `Validation` so a bad file reports every problem at once.
//!
//! # Example
//!
//! ```rust
//! use sceneflow::config::FlowConfig;
//!
//! let config = FlowConfig::from_json_str(r#"{
//!     "protected_scenes": ["Core"],
//!     "preloaded_scenes": ["Core"],
//!     "boot_plan": { "to_load": ["Session"], "use_overlay": false }
//! }"#).unwrap();
//!
//! assert_eq!(config.protected_scenes, vec!["Core"]);
//! assert!(config.plan_defaults.use_overlay);
//! ```

use crate::scene::SceneTransitionPlan;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub mod error;

pub use error::{ConfigError, ConfigViolation};

fn enabled() -> bool {
    true
}

/// Flags applied to plans started from a controller
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanDefaults {
    /// Fade a loading overlay around each batch
    #[serde(default = "enabled")]
    pub use_overlay: bool,

    /// Reclaim unused assets after each batch
    #[serde(default = "enabled")]
    pub clean_unused_assets: bool,
}

impl Default for PlanDefaults {
    fn default() -> Self {
        Self {
            use_overlay: true,
            clean_unused_assets: true,
        }
    }
}

/// Scene flow configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Scenes no plan may unload
    #[serde(default)]
    pub protected_scenes: Vec<String>,

    /// Scenes resident before the first plan runs
    #[serde(default)]
    pub preloaded_scenes: Vec<String>,

    #[serde(default)]
    pub plan_defaults: PlanDefaults,

    /// Plan executed once the controller is up
    #[serde(default)]
    pub boot_plan: Option<SceneTransitionPlan>,
}

impl FlowConfig {
    /// Parse and validate configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Read, parse and validate configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading flow config from {}", path.display());
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Validate the configuration, accumulating every violation.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = Vec::new();

        if self.protected_scenes.iter().any(|s| s.trim().is_empty()) {
            checks.push(Validation::fail(ConfigViolation::EmptyProtectedScene));
        }

        if self.preloaded_scenes.iter().any(|s| s.trim().is_empty()) {
            checks.push(Validation::fail(ConfigViolation::EmptyPreloadedScene));
        }

        if let Some(plan) = &self.boot_plan {
            if let Err(violations) = plan.check() {
                for violation in violations {
                    checks.push(Validation::fail(ConfigViolation::BootPlan(violation)));
                }
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }

    fn check(&self) -> Result<(), ConfigError> {
        match self.validate() {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => Err(ConfigError::Invalid(errors.iter().cloned().collect())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::PlanViolation;

    #[test]
    fn empty_object_uses_defaults() {
        let config = FlowConfig::from_json_str("{}").unwrap();

        assert_eq!(config, FlowConfig::default());
        assert!(config.plan_defaults.use_overlay);
        assert!(config.plan_defaults.clean_unused_assets);
        assert!(config.boot_plan.is_none());
    }

    #[test]
    fn boot_plan_is_parsed() {
        let config = FlowConfig::from_json_str(
            r#"{ "boot_plan": { "to_load": ["MainMenu"], "active_scene": "MainMenu" } }"#,
        )
        .unwrap();

        let plan = config.boot_plan.unwrap();
        assert!(plan.to_load().contains("MainMenu"));
        assert_eq!(plan.active_scene(), Some("MainMenu"));
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let result = FlowConfig::from_json_str(
            r#"{
                "protected_scenes": [""],
                "preloaded_scenes": [" "],
                "boot_plan": { "to_load": [""], "active_scene": "" }
            }"#,
        );

        match result {
            Err(ConfigError::Invalid(violations)) => {
                assert_eq!(violations.len(), 4);
                assert!(violations.contains(&ConfigViolation::EmptyProtectedScene));
                assert!(violations.contains(&ConfigViolation::EmptyPreloadedScene));
                assert!(violations.contains(&ConfigViolation::BootPlan(
                    PlanViolation::EmptyLoadTarget
                )));
                assert!(violations.contains(&ConfigViolation::BootPlan(
                    PlanViolation::EmptyActiveTarget
                )));
            }
            other => panic!("Expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = FlowConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = FlowConfig::load("/definitely/not/here/sceneflow.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("sceneflow-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{ "protected_scenes": ["Core"] }"#).unwrap();

        let config = FlowConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.protected_scenes, vec!["Core"]);
    }
}
