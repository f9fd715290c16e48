//! Site configuration module.
//!
//! Handles loading and validating `config.toml`. Every key is optional; a
//! missing file means stock defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! host = "github.com"       # Canonical URL is https://{host}/{owner}/{name}
//!
//! [scan]
//! skip_dirs = [".git", "node_modules", "vendor", ".github"]
//! max_contributors = 5      # Contributors shown on the overview page
//!
//! [templates]
//! main = "templates/main.hbs"    # Overview page template
//! doc = "templates/doc.hbs"      # Documentation page template
//! style = "templates/style.css"  # Replaces the built-in stylesheet
//!
//! [processing]
//! max_processes = 4         # Max parallel page renders (omit for auto = CPU cores)
//! ```
//!
//! Template paths are resolved relative to the directory holding the config
//! file. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Where the repository is hosted.
    pub site: SiteSection,
    /// Repository walking and statistics.
    pub scan: ScanConfig,
    /// Optional template overrides.
    pub templates: TemplatesConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let host = self.site.host.trim();
        if host.is_empty() || host.contains('/') {
            return Err(ConfigError::Validation(
                "site.host must be a bare host name like \"github.com\"".into(),
            ));
        }
        if self.scan.max_contributors == 0 {
            return Err(ConfigError::Validation(
                "scan.max_contributors must be at least 1".into(),
            ));
        }
        if self.scan.skip_dirs.iter().any(|d| d.is_empty() || d.contains('/')) {
            return Err(ConfigError::Validation(
                "scan.skip_dirs entries must be single directory names".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Hosting settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    pub host: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            host: "github.com".to_string(),
        }
    }
}

/// Repository scan settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Directory names skipped wherever they appear in the tree.
    pub skip_dirs: Vec<String>,
    /// Maximum number of contributors kept, ranked by commit count.
    pub max_contributors: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            skip_dirs: [".git", "node_modules", "vendor", ".github"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_contributors: crate::snapshot::MAX_CONTRIBUTORS,
        }
    }
}

/// Template overrides. Each part left unset uses the built-in skin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesConfig {
    pub main: Option<PathBuf>,
    pub doc: Option<PathBuf>,
    pub style: Option<PathBuf>,
}

impl TemplatesConfig {
    pub fn is_empty(&self) -> bool {
        self.main.is_none() && self.doc.is_none() && self.style.is_none()
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel page-rendering workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse and validate config text. `path` is only used in error messages.
pub fn parse_config(content: &str, path: &Path) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(content).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Load a config file that must exist.
pub fn load_config_file(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, path)
}

/// Load `config.toml` from `dir`, falling back to defaults when absent.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(SiteConfig::default());
    }
    load_config_file(&path)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# repo-site Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Host serving the repository. The overview page links to
# https://{host}/{owner}/{name}.
host = "github.com"

# ---------------------------------------------------------------------------
# Repository scan
# ---------------------------------------------------------------------------
[scan]
# Directory names that are never descended into, at any depth.
skip_dirs = [".git", "node_modules", "vendor", ".github"]

# How many top contributors (by commit count) to show.
max_contributors = 5

# ---------------------------------------------------------------------------
# Templates
# ---------------------------------------------------------------------------
# Handlebars templates replacing the built-in pages. Paths are relative to
# this file. Any part left out uses the built-in skin.
[templates]
# main = "templates/main.hbs"
# doc = "templates/doc.hbs"
# style = "templates/style.css"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page-rendering workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
