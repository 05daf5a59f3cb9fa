use retrace_core::dataset::Dataset;
use retrace_core::ids::NodeId;
use retrace_core::node::{Node, NodeKind};
use retrace_core::timeline::{RawMoveRecord, RawTransmissionRecord};

pub fn make_node(id: u64, x: f64, y: f64, radius: f64) -> Node {
    Node::builder()
        .id(NodeId::from(id))
        .x(x)
        .y(y)
        .radius_comm(radius)
        .kind(NodeKind::Regular)
        .build()
}

/// Dataset with the given nodes positioned on a 1000x1000 field.
pub fn make_dataset(radius: f64, nodes: Vec<Node>) -> Dataset {
    let mut dataset = Dataset::builder()
        .width(1000)
        .height(1000)
        .max_sim_time(100.0)
        .radius_comm(radius)
        .build();
    for node in nodes {
        dataset.add_node(node);
    }
    dataset
}

pub fn tx_record(event_id: u64, receiver_id: i64, sender_id: u64, resolved: u64, time: f64) -> RawTransmissionRecord {
    RawTransmissionRecord::builder()
        .event_id(event_id)
        .receiver_id(receiver_id)
        .sender_id(sender_id)
        .resolved_receiver_id(resolved)
        .time(time)
        .build()
}

pub fn move_record(node_id: u64, time: f64, x: f64, y: f64) -> RawMoveRecord {
    RawMoveRecord::builder()
        .node_id(node_id)
        .time(time)
        .x(x)
        .y(y)
        .build()
}
