use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_ANNOTATION_HEIGHT, DEFAULT_ANNOTATION_HIT_RADIUS, DEFAULT_ANNOTATION_SPACING,
    DEFAULT_MARKER_RADIUS, DEFAULT_RESTORE_SETTLE_SECS,
};

/// Viewer configuration persisted to disk
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Seconds between session start and the anchor restoration request
    pub restore_settle_secs: f32,

    /// HTTP endpoint serving the annotation text records; local file when unset
    pub text_store_url: Option<String>,

    /// Override for the simulated device anchor store
    pub anchor_store_file: Option<PathBuf>,

    /// Override for the local annotation text records
    pub notes_file: Option<PathBuf>,

    pub annotation_spacing: f32,
    pub annotation_height: f32,
    pub annotation_hit_radius: f32,
    pub marker_radius: f32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            restore_settle_secs: DEFAULT_RESTORE_SETTLE_SECS,
            text_store_url: None,
            anchor_store_file: None,
            notes_file: None,
            annotation_spacing: DEFAULT_ANNOTATION_SPACING,
            annotation_height: DEFAULT_ANNOTATION_HEIGHT,
            annotation_hit_radius: DEFAULT_ANNOTATION_HIT_RADIUS,
            marker_radius: DEFAULT_MARKER_RADIUS,
        }
    }
}

/// Where the settings were loaded from and will be saved to
#[derive(Resource, Debug, Clone)]
pub struct ConfigPath(pub PathBuf);

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Result of loading config from disk
#[derive(Debug, Clone)]
pub struct LoadConfigResult {
    pub settings: ViewerSettings,
    pub config_path: PathBuf,
    pub file_exists: bool,
    /// Error message if config was reset to defaults due to an error
    pub reset_reason: Option<String>,
}

/// Load configuration from `config_path`, falling back to defaults
pub fn load_config(config_path: PathBuf) -> LoadConfigResult {
    let file_exists = config_path.exists();

    let (settings, reset_reason) = if file_exists {
        match std::fs::read_to_string(&config_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    info!("Loaded config from {:?}", config_path);
                    (settings, None)
                }
                Err(e) => {
                    warn!("Failed to parse config file: {}", e);
                    (
                        ViewerSettings::default(),
                        Some(format!("Configuration file was corrupted: {}", e)),
                    )
                }
            },
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                (
                    ViewerSettings::default(),
                    Some(format!("Could not read configuration file: {}", e)),
                )
            }
        }
    } else {
        info!("No config file found, using defaults");
        (ViewerSettings::default(), None)
    };

    LoadConfigResult {
        settings,
        config_path,
        file_exists,
        reset_reason,
    }
}

/// Save configuration to disk
pub fn save_config(settings: &ViewerSettings, path: &std::path::Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to save config: {}", e))?;
    info!("Config saved to {:?}", path);
    Ok(())
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    settings: Res<ViewerSettings>,
    path: Res<ConfigPath>,
) {
    // Several requests in one frame still mean one write
    if events.read().count() == 0 {
        return;
    }
    if let Err(e) = save_config(&settings, &path.0) {
        error!("{}", e);
    }
}

/// Installs loaded settings and keeps them persisted.
///
/// A missing config file is written out with the defaults so it can be edited.
pub struct ConfigPlugin {
    pub loaded: LoadConfigResult,
}

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        let loaded = self.loaded.clone();

        let mut notification = ConfigResetNotification::default();
        if let Some(reason) = loaded.reset_reason {
            notification.show = true;
            notification.reason = Some(reason);
        }

        app.insert_resource(loaded.settings)
            .insert_resource(ConfigPath(loaded.config_path))
            .insert_resource(notification)
            .add_message::<SaveConfigRequest>()
            .add_systems(Update, save_config_system.run_if(on_message::<SaveConfigRequest>));

        if !loaded.file_exists {
            app.world_mut().write_message(SaveConfigRequest);
        }
    }
}
