//! Recipe run configuration.
//!
//! [`RunConfig`] is the plain value a pipeline consumes. [`ResolvedRunConfig`]
//! layers the possible sources of each setting and remembers where every
//! value came from.
//!
//! Precedence (highest to lowest):
//! 1. Explicit overrides
//! 2. Environment variables (`TUGREWRITE_*`)
//! 3. Configuration file (JSON)
//! 4. Defaults

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{RewriteError, RewriteResult};

/// Environment variable overriding [`RunConfig::max_cycles`].
pub const ENV_MAX_CYCLES: &str = "TUGREWRITE_MAX_CYCLES";
/// Environment variable overriding [`RunConfig::parallel`].
pub const ENV_PARALLEL: &str = "TUGREWRITE_PARALLEL";
/// Environment variable overriding [`RunConfig::mark_provenance`].
pub const ENV_MARK_PROVENANCE: &str = "TUGREWRITE_MARK_PROVENANCE";

/// Settings for a recipe pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Upper bound on pipeline passes over one tree. Passes stop early once a
    /// pass changes nothing.
    pub max_cycles: usize,
    /// Run multi-file pipelines on a thread pool.
    pub parallel: bool,
    /// Record the recipes that changed a file as a marker on its root.
    pub mark_provenance: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            max_cycles: 1,
            parallel: true,
            mark_provenance: true,
        }
    }
}

impl RunConfig {
    /// Parse a JSON configuration document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> RewriteResult<Self> {
        let config: RunConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load(path: &Path) -> RewriteResult<Self> {
        let json = std::fs::read_to_string(path)?;
        RunConfig::from_json_str(&json)
    }

    fn validate(&self) -> RewriteResult<()> {
        if self.max_cycles == 0 {
            return Err(RewriteError::config("max_cycles must be at least 1"));
        }
        Ok(())
    }
}

// ============================================================================
// Configuration Sources
// ============================================================================

/// Configuration value source (for precedence tracking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigSource {
    /// Built-in default value.
    Default = 0,
    /// From a configuration file.
    File = 1,
    /// From environment variable.
    EnvVar = 2,
    /// Set explicitly by the caller (highest precedence).
    Explicit = 3,
}

/// A configuration value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValue<T> {
    /// The actual value.
    pub value: T,
    /// Where the value came from.
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    /// Create a new config value with the given source.
    pub fn new(value: T, source: ConfigSource) -> Self {
        ConfigValue { value, source }
    }

    /// Merge with another value, preferring higher precedence.
    pub fn merge(self, other: Self) -> Self {
        if other.source >= self.source {
            other
        } else {
            self
        }
    }
}

/// Caller-supplied overrides.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub max_cycles: Option<usize>,
    pub parallel: Option<bool>,
    pub mark_provenance: Option<bool>,
}

/// Run configuration with the source of each value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRunConfig {
    pub max_cycles: ConfigValue<usize>,
    pub parallel: ConfigValue<bool>,
    pub mark_provenance: ConfigValue<bool>,
}

impl Default for ResolvedRunConfig {
    fn default() -> Self {
        let defaults = RunConfig::default();
        ResolvedRunConfig {
            max_cycles: ConfigValue::new(defaults.max_cycles, ConfigSource::Default),
            parallel: ConfigValue::new(defaults.parallel, ConfigSource::Default),
            mark_provenance: ConfigValue::new(defaults.mark_provenance, ConfigSource::Default),
        }
    }
}

impl ResolvedRunConfig {
    /// Resolve configuration from every source, reading the process
    /// environment.
    pub fn resolve(file: Option<&Path>, overrides: &RunOverrides) -> RewriteResult<Self> {
        Self::resolve_with_env(file, overrides, |key| std::env::var(key).ok())
    }

    /// Resolve configuration with an explicit environment lookup.
    pub fn resolve_with_env<E>(
        file: Option<&Path>,
        overrides: &RunOverrides,
        env: E,
    ) -> RewriteResult<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let mut config = ResolvedRunConfig::default();

        if let Some(path) = file {
            config.apply_file(&RunConfig::load(path)?);
        }
        config.apply_env(env);
        config.apply_overrides(overrides);

        if config.max_cycles.value == 0 {
            return Err(RewriteError::config("max_cycles must be at least 1"));
        }
        Ok(config)
    }

    /// The plain configuration value.
    pub fn to_config(&self) -> RunConfig {
        RunConfig {
            max_cycles: self.max_cycles.value,
            parallel: self.parallel.value,
            mark_provenance: self.mark_provenance.value,
        }
    }

    fn apply_file(&mut self, file: &RunConfig) {
        let source = ConfigSource::File;
        self.max_cycles = self.max_cycles.clone().merge(ConfigValue::new(file.max_cycles, source));
        self.parallel = self.parallel.clone().merge(ConfigValue::new(file.parallel, source));
        self.mark_provenance = self
            .mark_provenance
            .clone()
            .merge(ConfigValue::new(file.mark_provenance, source));
    }

    fn apply_env<E>(&mut self, env: E)
    where
        E: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = env(ENV_MAX_CYCLES) {
            match raw.trim().parse::<usize>() {
                Ok(cycles) => {
                    self.max_cycles = ConfigValue::new(cycles, ConfigSource::EnvVar);
                }
                Err(_) => warn!(var = ENV_MAX_CYCLES, value = %raw, "ignoring invalid value"),
            }
        }

        if let Some(raw) = env(ENV_PARALLEL) {
            match parse_flag(&raw) {
                Some(flag) => self.parallel = ConfigValue::new(flag, ConfigSource::EnvVar),
                None => warn!(var = ENV_PARALLEL, value = %raw, "ignoring invalid value"),
            }
        }

        if let Some(raw) = env(ENV_MARK_PROVENANCE) {
            match parse_flag(&raw) {
                Some(flag) => self.mark_provenance = ConfigValue::new(flag, ConfigSource::EnvVar),
                None => warn!(var = ENV_MARK_PROVENANCE, value = %raw, "ignoring invalid value"),
            }
        }
    }

    fn apply_overrides(&mut self, overrides: &RunOverrides) {
        if let Some(cycles) = overrides.max_cycles {
            self.max_cycles = ConfigValue::new(cycles, ConfigSource::Explicit);
        }
        if let Some(parallel) = overrides.parallel {
            self.parallel = ConfigValue::new(parallel, ConfigSource::Explicit);
        }
        if let Some(mark) = overrides.mark_provenance {
            self.mark_provenance = ConfigValue::new(mark, ConfigSource::Explicit);
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
