//! Configuration file persistence for mdpress
//!
//! Loads the site configuration from an explicit file or from the
//! platform-specific config directory, falling back to defaults whenever
//! the file is missing or unreadable.

use crate::config::{ConfigFormat, SiteConfig};
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "mdpress";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Suffix of the temporary file used during atomic writes
const BACKUP_SUFFIX: &str = "bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// - **Windows**: `%APPDATA%\mdpress\`
/// - **macOS**: `~/Library/Application Support/mdpress/`
/// - **Linux**: `~/.config/mdpress/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the default configuration file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load configuration from `path`, or from the default location when `None`.
///
/// # Behavior
///
/// 1. A valid file is parsed (JSON, TOML or YAML by extension) and sanitized
/// 2. A missing or empty file yields the defaults
/// 3. A corrupted file logs a warning and yields the defaults
pub fn load_config(path: Option<&Path>) -> SiteConfig {
    let resolved = match path {
        Some(path) => Ok(path.to_path_buf()),
        None => get_config_file_path(),
    };
    resolved
        .and_then(|path| load_config_from(&path))
        .unwrap_or_warn_default(SiteConfig::default(), "Failed to load configuration")
}

/// Load configuration from a specific file, reporting failures.
pub fn load_config_from(config_path: &Path) -> Result<SiteConfig> {
    if !config_path.exists() {
        debug!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        return Ok(SiteConfig::default());
    }

    debug!("Loading config from: {}", config_path.display());

    let contents = fs::read_to_string(config_path).map_err(|e| Error::ConfigLoad {
        path: config_path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(SiteConfig::default());
    }

    let config = SiteConfig::parse_sanitized(&contents, ConfigFormat::from_path(config_path))
        .map_err(|e| {
            warn!(
                "Config file at {} is invalid: {}",
                config_path.display(),
                e
            );
            e
        })?;

    info!(
        "Configuration loaded successfully from {}",
        config_path.display()
    );
    Ok(config)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save configuration to `path`, or to the default location when `None`.
///
/// The file is written to a sibling backup first and then renamed over the
/// target, so a failed write never leaves a truncated config behind.
///
/// # Errors
///
/// - `Error::ConfigDirNotFound`: Config directory cannot be determined
/// - `Error::ConfigSave`: Failed to write the config file
pub fn save_config(config: &SiteConfig, path: Option<&Path>) -> Result<()> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => get_config_file_path()?,
    };

    if let Some(dir) = config_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        if !dir.exists() {
            debug!("Creating config directory: {}", dir.display());
            fs::create_dir_all(dir).map_err(|e| Error::ConfigSave {
                path: dir.to_path_buf(),
                source: Box::new(e),
            })?;
        }
    }

    debug!("Saving config to: {}", config_path.display());

    let text = config
        .to_string_in(ConfigFormat::from_path(&config_path))
        .map_err(|e| Error::ConfigSave {
            path: config_path.clone(),
            source: Box::new(e),
        })?;

    let mut backup_name = config_path.as_os_str().to_owned();
    backup_name.push(".");
    backup_name.push(BACKUP_SUFFIX);
    let backup_path = PathBuf::from(backup_name);

    fs::write(&backup_path, &text).map_err(|e| Error::ConfigSave {
        path: backup_path.clone(),
        source: Box::new(e),
    })?;

    fs::rename(&backup_path, &config_path).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    info!(
        "Configuration saved successfully to {}",
        config_path.display()
    );
    Ok(())
}

/// Write a default configuration to `path` (or the default location) and
/// return where it went.
///
/// An existing file is only replaced when `overwrite` is set.
pub fn init_config(path: Option<&Path>, overwrite: bool) -> Result<PathBuf> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => get_config_file_path()?,
    };
    if config_path.exists() && !overwrite {
        return Err(Error::Application(format!(
            "{} already exists (use --force to replace it)",
            config_path.display()
        )));
    }
    save_config(&SiteConfig::default(), Some(&config_path))?;
    Ok(config_path)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
