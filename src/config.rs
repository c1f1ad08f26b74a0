//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/settree/settree.toml`
//! 3. Explicit config file given on the command line
//! 4. Environment variables: `SETTREE_*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::{AppError, AppResult};
use crate::template::Dictionary;

/// Settings for the template resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Templates resolved in order, each as the root of its own tree
    pub templates: Vec<String>,
    /// Variables the templates may reference as `@{key}`
    pub variables: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        let variables = [
            ("name", "Scarlet"),
            ("message", "Message with @{part1} and @{part2}"),
            ("part1", "**part1**"),
            ("part2", "&&part2&&"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

        Self {
            templates: vec![
                "Hello, @{name}! @{message}.".into(),
                "Hello, @{name}! @{message}. From @{part1}.".into(),
                "@{message}".into(),
            ],
            variables,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub templates: Option<Vec<String>>,
    pub variables: Option<BTreeMap<String, String>>,
}

/// Get the XDG config directory for settree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "settree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("settree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> AppResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> AppError {
    AppError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay a parsed file onto self.
    ///
    /// - `templates`: replaced entirely if the overlay specifies them
    /// - `variables`: merged per key, overlay wins
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut variables = self.variables.clone();
        if let Some(extra) = &overlay.variables {
            variables.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Self {
            templates: overlay
                .templates
                .clone()
                .unwrap_or_else(|| self.templates.clone()),
            variables,
        }
    }

    /// Load settings with layered precedence.
    ///
    /// An explicit `config_file` must exist; the global file is optional.
    #[instrument(level = "debug")]
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            debug!(path = %path.display(), "loading config file");
            current = current.merge_with(&load_raw_settings(path)?);
        }

        Self::apply_env_overrides(current)
    }

    /// Apply SETTREE_* environment variables as explicit overrides.
    ///
    /// `SETTREE_TEMPLATES` holds `;`-separated templates and replaces the list;
    /// `SETTREE_VARIABLES__<KEY>` sets a single variable. The config crate
    /// lowercases keys taken from the environment.
    fn apply_env_overrides(mut settings: Self) -> AppResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("SETTREE")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(";")
                    .with_list_parse_key("templates")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get::<Vec<String>>("templates") {
            settings.templates = val;
        }
        if let Ok(val) = config.get::<BTreeMap<String, String>>("variables") {
            settings.variables.extend(val);
        }

        Ok(settings)
    }

    pub fn dictionary(&self) -> Dictionary {
        self.variables
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect()
    }
}
