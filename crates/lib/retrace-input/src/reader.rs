use std::error::Error;
use std::path::{Path, PathBuf};

use log::{debug, info};
use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;

use retrace_core::dataset::Dataset;
use retrace_core::node::{Node, NodeKind};
use retrace_core::timeline::{build_timeline, RawMoveRecord, RawTransmissionRecord};

/// Recorded logs store coordinates and the radius in source units; the
/// replay field is ten times larger.
const COORD_SCALE: f64 = 10.0;

/// Only transmissions declared at the physical layer are replayed.
const PHYSICAL_LAYER: &str = "physical";

#[derive(Debug, Default)]
struct PositionAcc {
    id: Option<u64>,
    x: f64,
    y: f64,
    node_type: String,
    is_mobile: bool,
}

#[derive(Debug, Default)]
struct EnqueueAcc {
    event_id: u64,
    receiver_id: i64,
    sender_id: u64,
    resolved_receiver_id: u64,
    time: f64,
    sender_layer: String,
}

/// Reads one recorded-simulation XML log into a [`Dataset`]. The reader is
/// permissive at the record level: entries it cannot resolve are dropped,
/// only file-level problems abort the load.
pub struct LogReader {
    file_path: PathBuf,
}

impl LogReader {
    pub fn new(file_path: &Path) -> Self {
        Self {
            file_path: PathBuf::from(file_path),
        }
    }

    pub fn read(&self) -> Result<Dataset, Box<dyn Error>> {
        let mut reader = Reader::from_file(&self.file_path)?;
        let mut dataset = Dataset::default();
        let mut transmissions: Vec<RawTransmissionRecord> = Vec::new();
        let mut moves: Vec<RawMoveRecord> = Vec::new();

        let mut path: Vec<String> = Vec::new();
        let mut position = PositionAcc::default();
        let mut enqueue = EnqueueAcc::default();
        let mut buffer = Vec::new();

        loop {
            match reader.read_event_into(&mut buffer)? {
                XmlEvent::Eof => break,
                XmlEvent::Start(tag) => {
                    let name = tag_name(&tag);
                    self.on_open(&tag, &name, &mut dataset, &mut position, &mut enqueue, &mut moves);
                    path.push(name);
                }
                XmlEvent::Empty(tag) => {
                    let name = tag_name(&tag);
                    self.on_open(&tag, &name, &mut dataset, &mut position, &mut enqueue, &mut moves);
                }
                XmlEvent::Text(text) => {
                    let value = text.unescape()?.trim().to_string();
                    if !value.is_empty() {
                        apply_text(&path, &value, &mut dataset, &mut position, &mut enqueue);
                    }
                }
                XmlEvent::End(_) => {
                    match path.pop().as_deref() {
                        Some("position") => finish_position(&mut dataset, &mut position),
                        Some("enqueue") => finish_enqueue(&mut transmissions, &mut enqueue),
                        _ => {}
                    }
                }
                _ => {}
            }
            buffer.clear();
        }

        info!(
            "Read {} nodes, {} transmission records, {} move records from {}",
            dataset.node_count(),
            transmissions.len(),
            moves.len(),
            self.file_path.display()
        );
        let events = build_timeline(&dataset, transmissions, moves);
        dataset.set_events(events);
        Ok(dataset)
    }

    fn on_open(
        &self,
        tag: &BytesStart,
        name: &str,
        dataset: &mut Dataset,
        position: &mut PositionAcc,
        enqueue: &mut EnqueueAcc,
        moves: &mut Vec<RawMoveRecord>,
    ) {
        match name {
            "position" => *position = PositionAcc::default(),
            "enqueue" => *enqueue = EnqueueAcc::default(),
            "description" => {
                if let Some(text) = attr_value(tag, b"write") {
                    dataset.description = text;
                }
            }
            "info" => {
                if let Some(node_type) = attr_value(tag, b"nodetype") {
                    position.node_type = node_type;
                }
            }
            "move" => {
                let node_id = attr_value(tag, b"id").and_then(|v| v.parse::<u64>().ok());
                let time = attr_value(tag, b"time").and_then(|v| v.parse::<f64>().ok());
                let x = attr_value(tag, b"x").and_then(|v| v.parse::<f64>().ok());
                let y = attr_value(tag, b"y").and_then(|v| v.parse::<f64>().ok());
                match (node_id, time, x, y) {
                    (Some(node_id), Some(time), Some(x), Some(y)) => {
                        moves.push(RawMoveRecord {
                            node_id,
                            time,
                            x: x * COORD_SCALE,
                            y: y * COORD_SCALE,
                        });
                    }
                    _ => debug!("Dropping move tag with missing attributes"),
                }
            }
            _ => {}
        }
    }
}

fn tag_name(tag: &BytesStart) -> String {
    String::from_utf8_lossy(tag.name().as_ref()).to_lowercase()
}

fn attr_value(tag: &BytesStart, name: &[u8]) -> Option<String> {
    tag.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .map(|attr| String::from_utf8_lossy(attr.value.as_ref()).into_owned())
}

fn apply_text(
    path: &[String],
    value: &str,
    dataset: &mut Dataset,
    position: &mut PositionAcc,
    enqueue: &mut EnqueueAcc,
) {
    let current = match path.last() {
        Some(name) => name.as_str(),
        None => return,
    };
    let parent = if path.len() >= 2 {
        path[path.len() - 2].as_str()
    } else {
        ""
    };

    match (parent, current) {
        ("field", "x") => dataset.width = scaled_dimension(value),
        ("field", "y") => dataset.height = scaled_dimension(value),
        ("configuration", "simulationtime") => {
            dataset.max_sim_time = value.parse().unwrap_or(0.0)
        }
        ("configuration", "communicationradius") => {
            dataset.radius_comm = value.parse::<f64>().unwrap_or(0.0) * COORD_SCALE
        }
        ("position", "id") => position.id = value.parse().ok(),
        ("position", "x") => position.x = value.parse::<f64>().unwrap_or(0.0) * COORD_SCALE,
        ("position", "y") => position.y = value.parse::<f64>().unwrap_or(0.0) * COORD_SCALE,
        ("position", "ismobile") => position.is_mobile = value.eq_ignore_ascii_case("true"),
        ("enqueue", "time") => enqueue.time = value.parse().unwrap_or(0.0),
        ("enqueue", "id") => enqueue.event_id = value.parse().unwrap_or(0),
        ("enqueue", "receiverid") => enqueue.receiver_id = value.parse().unwrap_or(0),
        ("tolayer", "senderlayer") => enqueue.sender_layer = value.to_lowercase(),
        ("tolayer", "senderid") => enqueue.sender_id = value.parse().unwrap_or(0),
        ("tolayer", "internreceiverid") => {
            enqueue.resolved_receiver_id = value.parse().unwrap_or(0)
        }
        _ => {}
    }
}

fn scaled_dimension(value: &str) -> u32 {
    (value.parse::<f64>().unwrap_or(0.0) * COORD_SCALE) as u32
}

fn finish_position(dataset: &mut Dataset, position: &mut PositionAcc) {
    let acc = std::mem::take(position);
    let Some(id) = acc.id else {
        debug!("Dropping position without an id");
        return;
    };
    dataset.add_node(
        Node::builder()
            .id(id.into())
            .x(acc.x)
            .y(acc.y)
            .radius_comm(dataset.radius_comm)
            .kind(NodeKind::from_label(&acc.node_type))
            .is_mobile(acc.is_mobile)
            .build(),
    );
}

fn finish_enqueue(transmissions: &mut Vec<RawTransmissionRecord>, enqueue: &mut EnqueueAcc) {
    let acc = std::mem::take(enqueue);
    if acc.sender_layer != PHYSICAL_LAYER {
        return;
    }
    transmissions.push(RawTransmissionRecord {
        event_id: acc.event_id,
        receiver_id: acc.receiver_id,
        sender_id: acc.sender_id,
        resolved_receiver_id: acc.resolved_receiver_id,
        time: acc.time,
    });
}
