//! Runtime configuration (layered: defaults < TOML file < environment).

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WeftError};

/// Global default config (lazy-initialized from file and env).
static DEFAULT_CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

/// Tunables shared by agents, tool executors and graph runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub max_iterations: usize,
    pub tool_concurrency: usize,
    pub tool_timeout_ms: u64,
    pub model_timeout_ms: u64,
    pub max_graph_hops: usize,
    pub retry_max_attempts: u32,
    pub retry_initial_backoff_ms: u64,
    pub retry_max_backoff_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            tool_concurrency: 4,
            tool_timeout_ms: 30_000,
            model_timeout_ms: 120_000,
            max_graph_hops: 32,
            retry_max_attempts: 3,
            retry_initial_backoff_ms: 500,
            retry_max_backoff_ms: 30_000,
        }
    }
}

impl RuntimeConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    /// `<config dir>/weft/config.toml` for the current user, if resolvable.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "weft")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Build the layered config.
    ///
    /// An explicit `path` must exist; the default path is skipped when absent.
    /// A `.env` file, if present, is loaded before environment overrides apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(default) if default.is_file() => Self::from_file(default)?,
                _ => Self::default(),
            },
        };
        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from the default file and environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::load(None).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "invalid runtime config, using defaults");
            Self::default()
        })
    }

    /// Get (or create) the global default config.
    pub fn global() -> &'static RuntimeConfig {
        DEFAULT_CONFIG.get_or_init(Self::from_env)
    }

    /// Apply `WEFT_*` overrides read through `lookup`.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
            raw.trim().parse().map_err(|_| {
                WeftError::Configuration(format!("{key}: cannot parse '{raw}'"))
            })
        }

        if let Some(raw) = lookup("WEFT_MAX_ITERATIONS") {
            self.max_iterations = parse("WEFT_MAX_ITERATIONS", &raw)?;
        }
        if let Some(raw) = lookup("WEFT_TOOL_CONCURRENCY") {
            self.tool_concurrency = parse("WEFT_TOOL_CONCURRENCY", &raw)?;
        }
        if let Some(raw) = lookup("WEFT_TOOL_TIMEOUT_MS") {
            self.tool_timeout_ms = parse("WEFT_TOOL_TIMEOUT_MS", &raw)?;
        }
        if let Some(raw) = lookup("WEFT_MODEL_TIMEOUT_MS") {
            self.model_timeout_ms = parse("WEFT_MODEL_TIMEOUT_MS", &raw)?;
        }
        if let Some(raw) = lookup("WEFT_MAX_GRAPH_HOPS") {
            self.max_graph_hops = parse("WEFT_MAX_GRAPH_HOPS", &raw)?;
        }
        if let Some(raw) = lookup("WEFT_RETRY_MAX_ATTEMPTS") {
            self.retry_max_attempts = parse("WEFT_RETRY_MAX_ATTEMPTS", &raw)?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(WeftError::Configuration(
                "max_iterations must be at least 1".into(),
            ));
        }
        if self.max_graph_hops == 0 {
            return Err(WeftError::Configuration(
                "max_graph_hops must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
