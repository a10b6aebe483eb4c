//! Configuration for lectern.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (LECTERN_CONTENT, LECTERN_PAGE_SIZE)
//! 2. Config file (.lectern/config.yaml)
//! 3. Defaults (./content)
//!
//! Config file discovery:
//! - Searches current directory and parents for .lectern/config.yaml
//! - Relative paths in the config file are resolved against the project root
//!   (the directory containing .lectern/)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const DEFAULT_DEBOUNCE_MS: u64 = 500;
const DEFAULT_PAGE_SIZE: i64 = 20;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub watch: Option<WatchConfig>,
    #[serde(default)]
    pub query: Option<QueryConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentConfig {
    /// Content directory (relative to project root, `~/` allowed)
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    pub default_page_size: Option<i64>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Directory holding topic content files
    pub content_dir: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Watcher debounce window
    pub debounce_ms: u64,
    /// Page size used by `list` when none is given
    pub default_page_size: i64,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".lectern").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn parse_config(content: &str) -> Result<ConfigFile> {
    Ok(serde_yaml::from_str(content)?)
}

/// Resolve a path that may be relative to `base` or start with `~/`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }

    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Overlay environment variables and a parsed config file onto the defaults
fn resolve(
    cwd: &Path,
    config_file: Option<(PathBuf, ConfigFile)>,
    env_content: Option<String>,
    env_page_size: Option<String>,
) -> Result<ResolvedConfig> {
    let mut resolved = ResolvedConfig {
        content_dir: cwd.join("content"),
        config_file: None,
        debounce_ms: DEFAULT_DEBOUNCE_MS,
        default_page_size: DEFAULT_PAGE_SIZE,
    };

    if let Some((path, config)) = config_file {
        // Project root is the parent of .lectern/ (i.e., grandparent of config.yaml)
        let base_dir = path
            .parent()
            .and_then(|p| p.parent())
            .unwrap_or(Path::new("."));

        if let Some(ref dir) = config.content.dir {
            resolved.content_dir = resolve_path(base_dir, dir);
        }
        if let Some(ms) = config.watch.as_ref().and_then(|w| w.debounce_ms) {
            resolved.debounce_ms = ms;
        }
        if let Some(size) = config.query.as_ref().and_then(|q| q.default_page_size) {
            resolved.default_page_size = size;
        }
        resolved.config_file = Some(path);
    }

    if let Some(dir) = env_content {
        resolved.content_dir = resolve_path(cwd, &dir);
    }
    if let Some(size) = env_page_size {
        resolved.default_page_size = size
            .parse()
            .with_context(|| format!("LECTERN_PAGE_SIZE is not an integer: {}", size))?;
    }

    if resolved.default_page_size <= 0 {
        anyhow::bail!(
            "default page size must be positive, got {}",
            resolved.default_page_size
        );
    }

    Ok(resolved)
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let config_file = match find_config_file() {
        Some(path) => {
            let parsed = load_config_file(&path)?;
            Some((path, parsed))
        }
        None => None,
    };

    resolve(
        &cwd,
        config_file,
        std::env::var("LECTERN_CONTENT").ok(),
        std::env::var("LECTERN_PAGE_SIZE").ok(),
    )
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Get the content directory
pub fn content_dir() -> Result<PathBuf> {
    Ok(config()?.content_dir.clone())
}
