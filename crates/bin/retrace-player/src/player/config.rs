use std::path::{Path, PathBuf};

use serde::Deserialize;

use retrace_output::logger::LogSettings;

#[derive(Deserialize, Debug, Clone)]
pub struct InputSettings {
    pub replay_log: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlaybackSettings {
    /// Wall-clock tick cadence of the run loop, in milliseconds.
    pub tick_ms: u64,
    pub speed: f64,
    pub mapping: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct OutputSettings {
    /// Snapshot destination. Snapshots go to stdout when this is empty.
    #[serde(default)]
    pub snapshot_file: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlayerConfig {
    pub log_settings: LogSettings,
    pub input_settings: InputSettings,
    pub playback_settings: PlaybackSettings,
    pub output_settings: OutputSettings,
}

/// The configuration plus the directory it was read from. Relative paths in
/// the file resolve against that directory.
#[derive(Debug, Clone)]
pub struct PlayerContext {
    pub config: PlayerConfig,
    pub config_path: PathBuf,
}

impl PlayerContext {
    pub fn resolve(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_path.join(path)
        }
    }
}

pub(crate) fn read_config(file_name: &str) -> PlayerContext {
    let file_path = PathBuf::from(file_name);
    let input_toml = match std::fs::read_to_string(&file_path) {
        Ok(parsed_string) => parsed_string,
        Err(_) => panic!("Failed to read input TOML file"),
    };
    let config: PlayerConfig = match toml::from_str(&input_toml) {
        Ok(config) => config,
        Err(_) => panic!("Invalid toml file given"),
    };
    let config_path = file_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    PlayerContext {
        config,
        config_path,
    }
}
