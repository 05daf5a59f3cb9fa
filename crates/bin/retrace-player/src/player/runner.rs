use std::fs::File;
use std::io::{BufWriter, Write};
use std::thread;
use std::time::Duration;

use log::info;

use retrace_engine::controller::{Mode, PlaybackController};
use retrace_input::reader::LogReader;
use retrace_output::logger::initiate_logger;

use crate::player::config::PlayerContext;

/// Owns the playback controller and drives it from a wall-clock loop,
/// writing one JSON snapshot per tick until the replay pauses at the end.
pub struct ReplayRunner {
    context: PlayerContext,
    controller: PlaybackController,
}

impl ReplayRunner {
    pub fn new(context: PlayerContext) -> Self {
        Self {
            context,
            controller: PlaybackController::new(),
        }
    }

    pub fn run(&mut self) {
        let config = self.context.config.clone();
        initiate_logger(&self.context.config_path, &config.log_settings);

        let log_file = self.context.resolve(&config.input_settings.replay_log);
        info!("Loading replay log from {}", log_file.display());
        let dataset = LogReader::new(&log_file)
            .read()
            .expect("Failed to read the replay log");

        self.controller.init(dataset);
        self.controller.set_speed(config.playback_settings.speed);
        self.controller.set_mapping(&config.playback_settings.mapping);

        let mut sink = self.open_sink(&config.output_settings.snapshot_file);
        let cadence = Duration::from_millis(config.playback_settings.tick_ms);

        self.controller.play();
        self.emit(&mut sink);
        while self.controller.mode() == Mode::Play {
            thread::sleep(cadence);
            self.controller.tick();
            self.emit(&mut sink);
        }
        sink.flush().expect("Failed to flush the snapshot sink");
        info!(
            "Replay ended at event {} of {}, t={:.2}",
            self.controller.idx(),
            self.controller.counters().events_total,
            self.controller.time_sim()
        );
        self.controller.close();
    }

    fn open_sink(&self, snapshot_file: &str) -> Box<dyn Write> {
        if snapshot_file.is_empty() {
            return Box::new(std::io::stdout());
        }
        let path = self.context.resolve(snapshot_file);
        let file = File::create(&path).expect("Failed to create the snapshot file");
        info!("Writing snapshots to {}", path.display());
        Box::new(BufWriter::new(file))
    }

    fn emit(&mut self, sink: &mut Box<dyn Write>) {
        let snapshot = self.controller.snapshot();
        let line =
            serde_json::to_string(&snapshot).expect("Failed to serialize the snapshot");
        writeln!(sink, "{}", line).expect("Failed to write the snapshot");
    }
}
