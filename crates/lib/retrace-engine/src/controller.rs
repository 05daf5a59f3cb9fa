use std::fmt;
use std::time::Instant;

use hashbrown::HashMap;
use log::debug;

use retrace_core::dataset::Dataset;
use retrace_core::event::Event;
use retrace_core::node::NodeKind;
use retrace_models::mapping::{ColorMap, MapContext};
use retrace_models::space::GridIndex;
use retrace_models::stats::{compute_topology, TopologyStats};
use retrace_output::snapshot::{
    BoundingBox, FieldView, MappingChoice, MappingView, MetaView, NodeView, PacketView,
    PlaybackView, PointView, Snapshot,
};

/// Wall-clock seconds one message animation spans at speed 1.0.
pub const ANIM_MSG_DURATION: f64 = 0.8;

/// Lower clamp for the speed divisor. Smaller divisor means faster playback.
pub const MIN_SPEED: f64 = 0.05;

/// Statistics are recomputed at most this often (wall clock).
const STATS_THROTTLE_SEC: f64 = 0.5;

/// Accumulated elapsed time between discrete rewind steps, scaled by speed.
const BACK_STEP_INTERVAL: f64 = 0.2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    Play,
    #[default]
    Pause,
    Back,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Play => write!(f, "PLAY"),
            Mode::Pause => write!(f, "PAUSE"),
            Mode::Back => write!(f, "BACK"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    pub events_total: usize,
    pub moves_applied: u64,
    pub msgs_started: u64,
    pub msgs_completed: u64,
}

/// Time-driven state machine over one loaded dataset. Owns the dataset and
/// the live node positions; every operation is synchronous and bounded.
/// Without a dataset every operation is a no-op.
pub struct PlaybackController {
    data: Option<Dataset>,
    mode: Mode,
    idx: usize,
    speed: f64,
    time_sim: f64,
    anim_phase: f64,
    mapping: ColorMap,
    counters: Counters,
    last_tick: Instant,
    back_accum: f64,
    stats_cache: Option<TopologyStats>,
    stats_last_wall: Option<Instant>,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self {
            data: None,
            mode: Mode::Pause,
            idx: 0,
            speed: 1.0,
            time_sim: 0.0,
            anim_phase: 0.0,
            mapping: ColorMap::default(),
            counters: Counters::default(),
            last_tick: Instant::now(),
            back_accum: 0.0,
            stats_cache: None,
            stats_last_wall: None,
        }
    }
}

impl PlaybackController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts a freshly loaded dataset, resetting mode, clock, counters and
    /// caches. A previously held dataset is discarded.
    pub fn init(&mut self, dataset: Dataset) {
        debug!(
            "Adopting dataset with {} nodes and {} events",
            dataset.node_count(),
            dataset.event_count()
        );
        self.counters = Counters {
            events_total: dataset.event_count(),
            ..Counters::default()
        };
        self.data = Some(dataset);
        self.mode = Mode::Pause;
        self.idx = 0;
        self.speed = 1.0;
        self.time_sim = 0.0;
        self.anim_phase = 0.0;
        self.last_tick = Instant::now();
        self.back_accum = 0.0;
        self.stats_cache = None;
        self.stats_last_wall = None;
    }

    /// Discards the dataset and returns the controller to its pristine state.
    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn play(&mut self) {
        self.mode = Mode::Play;
    }

    pub fn pause(&mut self) {
        self.mode = Mode::Pause;
    }

    pub fn back(&mut self) {
        self.mode = Mode::Back;
        self.back_accum = 0.0;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn idx(&self) -> usize {
        self.idx
    }

    pub fn time_sim(&self) -> f64 {
        self.time_sim
    }

    pub fn anim_phase(&self) -> f64 {
        self.anim_phase
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    pub fn mapping_key(&self) -> &'static str {
        self.mapping.key()
    }

    /// Speed is a divisor of wall time: smaller means faster playback.
    /// Values below [`MIN_SPEED`] are clamped before being stored.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.max(MIN_SPEED);
    }

    /// Switches the active color mapping. Unknown keys keep the current
    /// selection; this mirrors the permissive boundary contract.
    pub fn set_mapping(&mut self, key: &str) {
        match ColorMap::from_key(key) {
            Some(mapping) => self.mapping = mapping,
            None => debug!("Ignoring unknown mapping key '{}'", key),
        }
    }

    /// The selectable mappings, for the command boundary to list.
    pub fn mappings(&self) -> Vec<MappingChoice> {
        ColorMap::all()
            .iter()
            .map(|mapping| MappingChoice {
                key: mapping.key().to_string(),
                label: mapping.label().to_string(),
            })
            .collect()
    }

    /// Pins the simulated clock to the current event and advances one event.
    /// At the last event the index stays clamped, mode falls back to pause
    /// and a message event is shown fully animated.
    pub fn step_forward(&mut self) {
        let Some(data) = &self.data else {
            return;
        };
        let events = data.events();
        if events.is_empty() {
            return;
        }
        self.time_sim = events[self.idx].time();
        if self.idx + 1 < events.len() {
            self.idx += 1;
            self.anim_phase = 0.0;
        } else {
            self.idx = events.len() - 1;
            self.mode = Mode::Pause;
            self.anim_phase = if events[self.idx].is_msg() { 1.0 } else { 0.0 };
        }
    }

    /// Steps one event back, flooring at the first. The simulated clock is
    /// left untouched.
    pub fn step_back(&mut self) {
        if self.data.is_none() {
            return;
        }
        self.idx = self.idx.saturating_sub(1);
        self.anim_phase = 0.0;
    }

    /// Wall-clock driven advance. The boundary calls this at a steady
    /// cadence; the controller measures elapsed time itself.
    pub fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick).as_secs_f64();
        self.last_tick = now;
        self.advance(elapsed);
    }

    /// Advances the engine by an explicit elapsed wall-clock duration in
    /// seconds. Zero elapsed time never mutates any state.
    pub fn advance(&mut self, elapsed: f64) {
        if self.data.is_none() || elapsed <= 0.0 || self.mode == Mode::Pause {
            return;
        }
        let speed_div = self.speed.max(MIN_SPEED);

        match self.mode {
            Mode::Back => {
                self.time_sim = (self.time_sim - elapsed / speed_div).max(0.0);
                self.back_accum += elapsed;
                if self.back_accum > BACK_STEP_INTERVAL / speed_div {
                    self.step_back();
                    self.back_accum = 0.0;
                }
            }
            Mode::Play => self.advance_play(elapsed / speed_div),
            Mode::Pause => unreachable!(),
        }

        if self.stats_due() {
            self.recompute_stats();
        }
    }

    fn advance_play(&mut self, scaled: f64) {
        self.time_sim += scaled;

        let data = self.data.as_mut().expect("advance_play without dataset");
        if data.events().is_empty() {
            self.mode = Mode::Pause;
            self.idx = 0;
            self.anim_phase = 0.0;
            return;
        }

        // Move batches are consumed in sequence until a message event (or
        // the end of the timeline) is reached.
        loop {
            let moves = match &data.events()[self.idx] {
                Event::Move(ev) => ev.moves.clone(),
                Event::Msg(_) => break,
            };
            for mv in &moves {
                data.apply_move(mv);
            }
            self.counters.moves_applied += moves.len() as u64;
            if self.idx + 1 < data.event_count() {
                self.idx += 1;
            } else {
                self.mode = Mode::Pause;
                return;
            }
        }

        if let Event::Msg(_) = &data.events()[self.idx] {
            // Exactly-zero phase marks the first tick of this animation.
            if self.anim_phase == 0.0 {
                self.counters.msgs_started += 1;
            }
            let crossed_before = self.anim_phase >= 1.0;
            self.anim_phase += scaled / ANIM_MSG_DURATION;
            if self.anim_phase >= 1.0 {
                if !crossed_before {
                    self.counters.msgs_completed += 1;
                }
                if self.idx + 1 < data.event_count() {
                    self.idx += 1;
                    self.anim_phase = 0.0;
                } else {
                    self.anim_phase = 1.0;
                    self.mode = Mode::Pause;
                }
            }
        }
    }

    fn stats_due(&self) -> bool {
        match self.stats_last_wall {
            Some(at) => at.elapsed().as_secs_f64() >= STATS_THROTTLE_SEC,
            None => true,
        }
    }

    fn recompute_stats(&mut self) {
        let stats = match &self.data {
            Some(data) => compute_topology(
                data.nodes(),
                data.radius_comm,
                self.counters.msgs_started,
                self.counters.msgs_completed,
                self.time_sim,
            ),
            None => compute_topology(
                &[],
                0.0,
                self.counters.msgs_started,
                self.counters.msgs_completed,
                self.time_sim,
            ),
        };
        self.stats_cache = Some(stats);
        self.stats_last_wall = Some(Instant::now());
    }

    /// Immutable projection of the current state for the rendering boundary.
    /// The only side effect is filling the statistics cache when empty.
    pub fn snapshot(&mut self) -> Snapshot {
        if self.stats_cache.is_none() {
            self.recompute_stats();
        }
        let stats = self.stats_cache.clone().unwrap_or_default();

        let Some(data) = &self.data else {
            return self.empty_snapshot(stats);
        };

        // One grid index serves both the degree coloring and the metadata
        // maximum, so every consumer sees the same degree values.
        let index = GridIndex::build(data.nodes(), data.radius_comm);
        let degree_list = index.degrees(data.nodes());
        let degree_max = degree_list.iter().copied().max().unwrap_or(0).max(1);
        let mut degrees = HashMap::new();
        for (node, degree) in data.nodes().iter().zip(degree_list.iter()) {
            degrees.insert(node.id, *degree);
        }
        let context = MapContext {
            radius_comm: data.radius_comm,
            max_degree: degree_max,
            degrees,
        };

        let nodes = data
            .nodes()
            .iter()
            .map(|node| {
                let track = match node.kind {
                    NodeKind::Uav | NodeKind::Intruder => node
                        .track
                        .iter()
                        .map(|p| PointView { x: p.x, y: p.y })
                        .collect(),
                    NodeKind::Regular => Vec::new(),
                };
                NodeView {
                    id: node.id.as_u64(),
                    x: node.x,
                    y: node.y,
                    kind: node.kind.to_string(),
                    mobile: node.is_mobile,
                    label: node.label.clone(),
                    color: self.mapping.color_of(node, &context).to_hex(),
                    track,
                }
            })
            .collect();

        let packet = match data.events().get(self.idx) {
            Some(Event::Msg(msg)) if self.mode == Mode::Play => Some(PacketView {
                source: msg.source.as_u64(),
                dests: msg.destinations.iter().map(|d| d.as_u64()).collect(),
                phase: self.anim_phase,
            }),
            _ => None,
        };

        let meta = Self::build_meta(data, degree_max);
        Snapshot {
            nodes,
            playback: PlaybackView {
                mode: self.mode.to_string(),
                idx: self.idx,
                total: data.event_count(),
                time: self.time_sim,
                speed: self.speed,
            },
            packet,
            meta,
            mapping: MappingView {
                key: self.mapping.key().to_string(),
                legend: self.mapping.legend(&context),
            },
            stats,
        }
    }

    fn build_meta(data: &Dataset, degree_max: usize) -> MetaView {
        let area = if data.width > 0 && data.height > 0 {
            Some(data.width as f64 * data.height as f64)
        } else {
            None
        };

        let bbox = if data.node_count() > 0 {
            let mut min_x = f64::INFINITY;
            let mut min_y = f64::INFINITY;
            let mut max_x = f64::NEG_INFINITY;
            let mut max_y = f64::NEG_INFINITY;
            for node in data.nodes() {
                min_x = min_x.min(node.x);
                min_y = min_y.min(node.y);
                max_x = max_x.max(node.x);
                max_y = max_y.max(node.y);
            }
            BoundingBox {
                min_x,
                min_y,
                width: (max_x - min_x).max(1.0),
                height: (max_y - min_y).max(1.0),
            }
        } else {
            BoundingBox {
                min_x: 0.0,
                min_y: 0.0,
                width: f64::from(data.width.max(1)),
                height: f64::from(data.height.max(1)),
            }
        };

        let density = area.map(|a| data.node_count() as f64 / a);
        MetaView {
            description: data.description.clone(),
            field: FieldView {
                width: data.width,
                height: data.height,
                area,
            },
            bbox,
            nodes_count: data.node_count(),
            events_count: data.event_count(),
            radius_comm: data.radius_comm,
            simtime_max: data.max_sim_time,
            density,
            degree_max,
        }
    }

    fn empty_snapshot(&self, stats: TopologyStats) -> Snapshot {
        Snapshot {
            nodes: Vec::new(),
            playback: PlaybackView {
                mode: self.mode.to_string(),
                idx: 0,
                total: 0,
                time: 0.0,
                speed: self.speed,
            },
            packet: None,
            meta: MetaView {
                description: String::new(),
                field: FieldView {
                    width: 0,
                    height: 0,
                    area: None,
                },
                bbox: BoundingBox {
                    min_x: 0.0,
                    min_y: 0.0,
                    width: 1.0,
                    height: 1.0,
                },
                nodes_count: 0,
                events_count: 0,
                radius_comm: 0.0,
                simtime_max: 0.0,
                density: None,
                degree_max: 1,
            },
            mapping: MappingView {
                key: self.mapping.key().to_string(),
                legend: self.mapping.legend(&MapContext::default()),
            },
            stats,
        }
    }
}
