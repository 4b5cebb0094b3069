use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use anchornotes::AnnotationViewerPlugin;
use anchornotes::collaborators::{
    AudioBackend, FileTextSource, HttpTextSource, TextStore, Tracker,
};
use anchornotes::config::{ConfigPlugin, load_config};
use anchornotes::constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use anchornotes::paths;
use anchornotes::render::RenderPlugin;
use anchornotes::sim::{FileAnchorTracker, LoggingAudio, SimPlugin};

/// Set up stdout and file logging for debug builds
#[cfg(debug_assertions)]
fn setup_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use std::fs::OpenOptions;
    use std::io::Write;
    use tracing_subscriber::prelude::*;

    let logs_dir = paths::logs_dir();
    if std::fs::create_dir_all(&logs_dir).is_err() {
        eprintln!("Failed to create logs directory");
        return None;
    }

    let log_file_path = logs_dir.join("anchornotes.log");

    // Append session separator to existing log file
    if let Ok(mut file) = OpenOptions::new().append(true).open(&log_file_path) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let separator = "=".repeat(80);
        let _ = writeln!(
            file,
            "\n\n{}\n=== New Session Started at {} ===\n{}\n",
            separator, timestamp, separator
        );
    }

    let file_appender = tracing_appender::rolling::never(&logs_dir, "anchornotes.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // No ANSI colors in the file
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_level(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,anchornotes=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Some(guard)
}

#[cfg(not(debug_assertions))]
fn setup_logging() -> Option<()> {
    None
}

fn main() -> AppExit {
    if let Err(e) = paths::ensure_directories() {
        eprintln!("Failed to create data directories: {}", e);
    }

    // Keep the guard alive for the duration of the program
    let log_guard = setup_logging();

    let loaded = load_config(paths::config_file());
    let settings = loaded.settings.clone();

    let text_store = match &settings.text_store_url {
        Some(url) => TextStore::new(HttpTextSource::new(url.clone())),
        None => TextStore::new(FileTextSource::new(
            settings.notes_file.clone().unwrap_or_else(paths::notes_file),
        )),
    };
    // Authored notes only go to a local store
    let notes_file = settings
        .text_store_url
        .is_none()
        .then(|| settings.notes_file.clone().unwrap_or_else(paths::notes_file));
    let anchor_store = settings
        .anchor_store_file
        .clone()
        .unwrap_or_else(paths::anchor_store_file);

    let mut default_plugins = DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Anchornotes".into(),
            resolution: (DEFAULT_WINDOW_WIDTH as u32, DEFAULT_WINDOW_HEIGHT as u32).into(),
            ..default()
        }),
        ..default()
    });
    // Our subscriber is already global; a second one would fail to install
    if log_guard.is_some() {
        default_plugins = default_plugins.disable::<LogPlugin>();
    }

    App::new()
        .add_plugins(default_plugins)
        .add_plugins(EguiPlugin::default())
        .add_plugins(ConfigPlugin { loaded })
        .insert_resource(Tracker::new(FileAnchorTracker::new(anchor_store)))
        .insert_resource(AudioBackend::new(LoggingAudio::default()))
        .insert_resource(text_store)
        .add_plugins(AnnotationViewerPlugin)
        .add_plugins(SimPlugin { notes_file })
        .add_plugins(RenderPlugin)
        .run()
}
