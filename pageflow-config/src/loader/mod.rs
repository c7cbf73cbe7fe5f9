//! Configuration loading.
//!
//! Evaluation order:
//! 1) `$PAGEFLOW_CONFIG_PATH` (TOML or JSON file),
//! 2) `$PAGEFLOW_CONFIG_JSON` (inline JSON),
//! 3) `pageflow.toml` / `pageflow.json` in the search directory,
//! 4) defaults if none of the above is present.
//!
//! The loaded document always passes through [`apply_guard_rails`] before it
//! is handed out.

pub mod error;

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use error::ConfigLoadError;

use crate::models::PageflowConfig;
use crate::validation::{ConfigWarnings, apply_guard_rails};

pub const CONFIG_PATH_ENV: &str = "PAGEFLOW_CONFIG_PATH";
pub const CONFIG_JSON_ENV: &str = "PAGEFLOW_CONFIG_JSON";

const DEFAULT_CANDIDATES: &[&str] = &[
    "pageflow.toml",
    "pageflow.json",
    "config/pageflow.toml",
    "config/pageflow.json",
];

/// Source that produced the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// A validated configuration together with where it came from.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: PageflowConfig,
    pub source: ConfigSource,
    pub warnings: ConfigWarnings,
}

#[derive(Debug, Clone)]
pub struct ConfigLoader {
    search_dir: PathBuf,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader that looks for default files relative to the working directory.
    pub fn new() -> Self {
        Self {
            search_dir: PathBuf::from("."),
        }
    }

    pub fn with_search_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            search_dir: dir.into(),
        }
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (config, source) = self.resolve()?;
        let warnings = apply_guard_rails(&config)?;
        for warning in &warnings.items {
            log::warn!("config: {}", warning.message);
        }
        log::debug!("pageflow config loaded from {:?}", source);
        Ok(ConfigLoad {
            config,
            source,
            warnings,
        })
    }

    /// Load from the environment and working directory, for binaries that
    /// only need a readable error.
    pub fn load_from_env() -> anyhow::Result<ConfigLoad> {
        Self::new()
            .load()
            .context("failed to load pageflow configuration")
    }

    /// Load and validate a single file, ignoring the environment.
    pub fn load_path(path: &Path) -> Result<ConfigLoad, ConfigLoadError> {
        let config = PageflowConfig::load_from_file(path)?;
        let warnings = apply_guard_rails(&config)?;
        Ok(ConfigLoad {
            config,
            source: ConfigSource::File(path.to_path_buf()),
            warnings,
        })
    }

    fn resolve(&self) -> Result<(PageflowConfig, ConfigSource), ConfigLoadError> {
        if let Ok(path_str) = env::var(CONFIG_PATH_ENV)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = PageflowConfig::load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Ok(raw) = env::var(CONFIG_JSON_ENV)
            && !raw.trim().is_empty()
        {
            let config = PageflowConfig::parse_json(&raw, CONFIG_JSON_ENV)?;
            return Ok((config, ConfigSource::EnvInline));
        }

        if let Some(path) = self.find_default_file() {
            let config = PageflowConfig::load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((PageflowConfig::default(), ConfigSource::Default))
    }

    fn find_default_file(&self) -> Option<PathBuf> {
        DEFAULT_CANDIDATES
            .iter()
            .map(|candidate| self.search_dir.join(candidate))
            .find(|path| path.exists())
    }
}

impl PageflowConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let origin = path.display().to_string();

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents, &origin),
            Some("toml") | Some("tml") => Self::parse_toml(&contents, &origin),
            _ => Self::parse_from_str(&contents, &origin),
        }
    }

    pub fn parse_toml(raw: &str, origin: &str) -> Result<Self, ConfigLoadError> {
        toml::from_str(raw).map_err(|source| ConfigLoadError::Toml {
            origin: origin.to_string(),
            source,
        })
    }

    pub fn parse_json(raw: &str, origin: &str) -> Result<Self, ConfigLoadError> {
        serde_json::from_str(raw).map_err(|source| ConfigLoadError::Json {
            origin: origin.to_string(),
            source,
        })
    }

    /// Try TOML first, then JSON.
    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> Result<Self, ConfigLoadError> {
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                ConfigLoadError::UnknownFormat {
                    origin: origin.to_string(),
                    toml: toml_err.to_string(),
                    json: json_err.to_string(),
                }
            })
        })
    }
}
