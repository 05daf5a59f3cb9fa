//! Read-only projection of controller state for the rendering boundary.
//! Every type here is plain serializable data; nothing references back into
//! the live dataset.

use serde::Serialize;

use retrace_models::mapping::Legend;
use retrace_models::stats::TopologyStats;

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct PointView {
    pub x: f64,
    pub y: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NodeView {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub mobile: bool,
    pub label: String,
    /// Hex color string produced by the active mapping.
    pub color: String,
    /// Recent trajectory, emitted only for UAV/INTRUDER nodes.
    pub track: Vec<PointView>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PlaybackView {
    pub mode: String,
    pub idx: usize,
    pub total: usize,
    pub time: f64,
    pub speed: f64,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct FieldView {
    pub width: u32,
    pub height: u32,
    pub area: Option<f64>,
}

/// Live bounding box of the node set, with floor-1.0 extents so a
/// single-node dataset still spans something drawable.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MetaView {
    pub description: String,
    pub field: FieldView,
    pub bbox: BoundingBox,
    pub nodes_count: usize,
    pub events_count: usize,
    pub radius_comm: f64,
    pub simtime_max: f64,
    pub density: Option<f64>,
    pub degree_max: usize,
}

/// The message animation currently on screen. Present only while the
/// controller is playing a message event.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PacketView {
    pub source: u64,
    pub dests: Vec<u64>,
    pub phase: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MappingView {
    pub key: String,
    pub legend: Legend,
}

/// One selectable mapping, as listed to the command boundary.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MappingChoice {
    pub key: String,
    pub label: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub nodes: Vec<NodeView>,
    pub playback: PlaybackView,
    pub packet: Option<PacketView>,
    pub meta: MetaView,
    pub mapping: MappingView,
    pub stats: TopologyStats,
}
