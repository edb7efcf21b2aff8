//! Wiki configuration module.
//!
//! Handles loading, validating, and merging `wiki.toml`. A user file only
//! needs the keys it wants to change; everything else comes from the stock
//! defaults.
//!
//! ## Config File Location
//!
//! `wiki.toml` lives in the repository root, next to the documentation
//! directories it describes:
//!
//! ```text
//! repo/
//! ├── wiki.toml          # Optional
//! ├── docs/
//! │   └── ...
//! └── notes/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_dirs = ["docs", "notes", "Docs", "Notes"]
//! output_dir = "wiki"
//! skip_prefixes = [".", "_"]
//!
//! [pages]
//! home = "Home"          # Index page name
//! sidebar = "_Sidebar"   # Navigation page name
//!
//! [sidebar]
//! recent_limit = 5       # "Recently Updated" entries, 0 disables the list
//!
//! [links]
//! matching = "boundary"  # Fallback link matching: "boundary" or "substring"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the repository root.
pub const CONFIG_FILE_NAME: &str = "wiki.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Wiki configuration loaded from `wiki.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WikiConfig {
    /// Candidate source directories, scanned in this order.
    pub source_dirs: Vec<String>,
    /// Output directory, relative to the repository root.
    pub output_dir: String,
    /// Markdown files whose name starts with any of these are ignored.
    pub skip_prefixes: Vec<String>,
    /// Names of the generated pages.
    pub pages: PagesConfig,
    /// Sidebar content settings.
    pub sidebar: SidebarConfig,
    /// Link rewriting settings.
    pub links: LinksConfig,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            source_dirs: ["docs", "notes", "Docs", "Notes"]
                .into_iter()
                .map(String::from)
                .collect(),
            output_dir: "wiki".to_string(),
            skip_prefixes: vec![".".to_string(), "_".to_string()],
            pages: PagesConfig::default(),
            sidebar: SidebarConfig::default(),
            links: LinksConfig::default(),
        }
    }
}

impl WikiConfig {
    /// Output directory resolved against the repository root.
    ///
    /// An absolute `output_dir` is used as-is.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir)
    }

    /// Validate that the config describes a usable run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_dirs.is_empty() {
            return Err(ConfigError::Validation(
                "source_dirs must not be empty".into(),
            ));
        }
        if self.source_dirs.iter().any(|d| d.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "source_dirs entries must not be empty".into(),
            ));
        }
        if self.output_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output_dir must not be empty".into(),
            ));
        }
        for (key, name) in [
            ("pages.home", &self.pages.home),
            ("pages.sidebar", &self.pages.sidebar),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
            if name.contains(['/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a page name, not a path"
                )));
            }
        }
        if self.pages.home == self.pages.sidebar {
            return Err(ConfigError::Validation(
                "pages.home and pages.sidebar must differ".into(),
            ));
        }
        Ok(())
    }
}

/// Names of the generated index and sidebar pages (without `.md`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagesConfig {
    pub home: String,
    pub sidebar: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            home: "Home".to_string(),
            sidebar: "_Sidebar".to_string(),
        }
    }
}

impl PagesConfig {
    /// Whether a document slug would be written over the index or sidebar page.
    ///
    /// Case-insensitive, as wiki page names and some filesystems are.
    pub fn is_reserved(&self, slug: &str) -> bool {
        slug.eq_ignore_ascii_case(&self.home) || slug.eq_ignore_ascii_case(&self.sidebar)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SidebarConfig {
    /// Number of most recently modified pages listed in the sidebar.
    pub recent_limit: usize,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self { recent_limit: 5 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinksConfig {
    pub matching: LinkMatching,
}

/// How a link target that matches no known path exactly is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMatching {
    /// Suffix matches aligned on `/`: `../docs/guide` matches `docs/guide`,
    /// but `guide` never matches `user-guide`.
    #[default]
    Boundary,
    /// Either string containing the other counts as a match.
    Substring,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(WikiConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, arrays included.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<WikiConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: WikiConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit file path, defaults if it doesn't exist.
pub fn load_config_file(path: &Path) -> Result<WikiConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(path)?)
}

/// Load `wiki.toml` from the repository root.
pub fn load_config(root: &Path) -> Result<WikiConfig, ConfigError> {
    load_config_file(&root.join(CONFIG_FILE_NAME))
}

/// Returns a fully-commented stock `wiki.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docs-wiki Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Directories (relative to the repository root) scanned for markdown, in order.
# Missing directories are ignored; if none exist, nothing is generated.
source_dirs = ["docs", "notes", "Docs", "Notes"]

# Where the flattened wiki pages are written.
output_dir = "wiki"

# Markdown files whose name starts with one of these prefixes are skipped.
skip_prefixes = [".", "_"]

# ---------------------------------------------------------------------------
# Generated pages
# ---------------------------------------------------------------------------
[pages]
# Index page listing every document by directory.
home = "Home"

# Abbreviated navigation page.
sidebar = "_Sidebar"

# ---------------------------------------------------------------------------
# Sidebar
# ---------------------------------------------------------------------------
[sidebar]
# Most recently modified pages listed under "Recently Updated".
# Set to 0 to leave the list out.
recent_limit = 5

# ---------------------------------------------------------------------------
# Link rewriting
# ---------------------------------------------------------------------------
[links]
# How a link that matches no known document exactly is resolved:
#   "boundary"  - suffix match aligned on path separators (guide ~ docs/guide)
#   "substring" - either path containing the other (guide ~ user-guide too)
matching = "boundary"
"##
}
