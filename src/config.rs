//! Layered configuration for the class-map tool.
//!
//! Sources, later ones winning:
//! - built-in defaults
//! - `.classmap/settings.toml` (found by walking up from the current directory)
//! - environment variables
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `CLASSMAP_` and use double
//! underscores to separate nested levels:
//! - `CLASSMAP_SCAN__PARALLEL=false` sets `scan.parallel`
//! - `CLASSMAP_SCAN__CACHE_FILE=out/map.php` sets `scan.cache_file`
//! - `CLASSMAP_LOGGING__DEFAULT=debug` sets `logging.default`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::autoload::NamespaceEntry;
use crate::parsing::Dialect;

pub const CONFIG_DIR: &str = ".classmap";
pub const CONFIG_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "CLASSMAP_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory holding `.classmap`, detected when not set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub dialect: Dialect,

    /// Namespace prefix → directory records, in registration order
    #[serde(default)]
    pub namespaces: Vec<NamespaceEntry>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScanConfig {
    /// Directories or files to scan
    #[serde(default = "default_roots")]
    pub roots: Vec<PathBuf>,

    /// Where the generated map is written and read back from
    #[serde(default = "default_cache_file")]
    pub cache_file: PathBuf,

    /// Regex; matching file paths are skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blacklist: Option<String>,

    /// Keep only symbols starting with this prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_filter: Option<String>,

    /// Scan files on the rayon pool
    #[serde(default = "default_true")]
    pub parallel: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for all modules
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides, e.g. `classmap::autoload = "trace"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_version() -> u32 {
    1
}
fn default_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("src")]
}
fn default_cache_file() -> PathBuf {
    PathBuf::from(".classmap/classmap.php")
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            scan: ScanConfig::default(),
            dialect: Dialect::default(),
            namespaces: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            cache_file: default_cache_file(),
            blacklist: None,
            namespace_filter: None,
            parallel: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| Path::new(CONFIG_DIR).join(CONFIG_FILE));

        Self::figment(&config_path)
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref()).extract().map_err(Box::new)
    }

    fn figment(config_path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            // `__` separates nesting levels; single `_` stays inside field names
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    /// Find `.classmap/settings.toml` from the current directory upward
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Get the workspace root directory (where .classmap is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        find_config_root(&current)
    }

    /// Resolve a configured path against the workspace root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.workspace_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file under `dir`
    pub fn init_config_file(dir: &Path, force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = dir.join(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        Settings::default().save(&config_path)?;
        Ok(config_path)
    }
}

fn find_config_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
        .map(Path::to_path_buf)
}
