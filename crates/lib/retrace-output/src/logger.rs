use std::fs;
use std::path::Path;

use chrono::Utc;
use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct LogSettings {
    pub log_path: String,
    pub log_level: String,
    pub log_file_name: String,
    pub log_overwrite: bool,
}

fn level_of(log_level: &str) -> LevelFilter {
    match log_level {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Sets up the file logger below the config directory. An existing log file
/// is either cleared or kept aside under a timestamped name, depending on
/// the overwrite flag.
pub fn initiate_logger(config_path: &Path, settings: &LogSettings) {
    let log_dir = config_path.join(&settings.log_path);
    if !log_dir.exists() {
        fs::create_dir_all(&log_dir).expect("Failed to create the log directory");
    }

    let mut log_file = log_dir.join(&settings.log_file_name);
    if log_file.exists() {
        if settings.log_overwrite {
            fs::remove_file(&log_file).expect("Failed to clear the old log file");
        } else {
            let stamp = Utc::now().format("_%d%m%Y_%H%M%S");
            let stem = log_file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("replay")
                .to_string();
            log_file = log_dir.join(format!("{}{}.log", stem, stamp));
        }
    }

    let appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y.%m.%d %H:%M:%S)} | {({l}):5.5} | {({f}:{L}):>35.35} — {m}{n}",
        )))
        .build(log_file)
        .expect("Failed to create the log file appender");

    let config = Config::builder()
        .appender(Appender::builder().build("replay", Box::new(appender)))
        .build(
            Root::builder()
                .appender("replay")
                .build(level_of(&settings.log_level)),
        )
        .expect("Failed to build the logger configuration");

    log4rs::init_config(config).expect("Failed to initialize the logger");
}
