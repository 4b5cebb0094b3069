//! Where the viewer keeps its config, logs, simulated anchor store and local
//! annotation text.
//!
//! Debug builds use the working directory. Release builds use:
//! - Windows: `%APPDATA%\Anchornotes\`
//! - macOS: `~/Library/Application Support/Anchornotes/`
//! - Linux: `~/.config/anchornotes/` (config), `~/.local/share/anchornotes/` (data)

use std::path::PathBuf;

/// Debug builds and anything launched through cargo keep their files local.
pub fn is_dev_mode() -> bool {
    std::env::var("CARGO").is_ok() || cfg!(debug_assertions)
}

/// Platform-appropriate config directory.
///
/// - Dev mode: current directory
/// - Linux: `~/.config/anchornotes/`
/// - Windows/macOS: same as data_dir
pub fn config_dir() -> Option<PathBuf> {
    if is_dev_mode() {
        return Some(PathBuf::from("."));
    }

    #[cfg(target_os = "linux")]
    {
        dirs::config_dir().map(|p| p.join("anchornotes"))
    }

    #[cfg(not(target_os = "linux"))]
    {
        data_dir()
    }
}

/// Platform-appropriate data directory.
pub fn data_dir() -> Option<PathBuf> {
    if is_dev_mode() {
        return Some(PathBuf::from("."));
    }

    dirs::data_dir().map(|p| p.join("anchornotes"))
}

/// Path to the config file.
///
/// - Dev mode: `./config.json`
/// - Installed: `{config_dir}/config.json`
pub fn config_file() -> PathBuf {
    config_dir()
        .map(|p| p.join("config.json"))
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

/// Path to the simulated device anchor store.
pub fn anchor_store_file() -> PathBuf {
    data_dir()
        .map(|p| p.join("anchors.json"))
        .unwrap_or_else(|| PathBuf::from("anchors.json"))
}

/// Path to the local annotation text records used when no remote store is configured.
pub fn notes_file() -> PathBuf {
    data_dir()
        .map(|p| p.join("notes.json"))
        .unwrap_or_else(|| PathBuf::from("notes.json"))
}

/// Path to the logs directory.
///
/// - Dev mode: `./logs/`
/// - Installed: `{data_dir}/logs/`
pub fn logs_dir() -> PathBuf {
    data_dir()
        .map(|p| p.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Ensure all required directories exist.
///
/// Called early in startup to create config and data directories.
pub fn ensure_directories() -> std::io::Result<()> {
    if is_dev_mode() {
        // In dev mode, directories are local and typically exist
        return Ok(());
    }

    if let Some(config) = config_dir() {
        std::fs::create_dir_all(&config)?;
    }
    if let Some(data) = data_dir() {
        std::fs::create_dir_all(&data)?;
        std::fs::create_dir_all(data.join("logs"))?;
    }
    Ok(())
}
