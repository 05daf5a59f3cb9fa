use log::debug;
use typed_builder::TypedBuilder;

use crate::dataset::Dataset;
use crate::event::{Event, EventMove, EventMsg, MoveEvent};
use crate::ids::NodeId;

/// Receiver id marking a broadcast transmission record.
pub const BROADCAST_RECEIVER: i64 = -1;

/// Flat per-destination transmission record handed in by the log reader.
/// Several records share an `event_id` when they describe one broadcast.
#[derive(Clone, Copy, Debug, TypedBuilder)]
pub struct RawTransmissionRecord {
    pub event_id: u64,
    pub receiver_id: i64,
    pub sender_id: u64,
    pub resolved_receiver_id: u64,
    pub time: f64,
}

/// Flat movement record handed in by the log reader.
#[derive(Clone, Copy, Debug, TypedBuilder)]
pub struct RawMoveRecord {
    pub node_id: u64,
    pub time: f64,
    pub x: f64,
    pub y: f64,
}

/// Merges raw transmission and movement records into one time-ordered
/// timeline. The builder is permissive: records naming unknown nodes shrink
/// destination sets or drop events, they never abort the load.
pub fn build_timeline(
    dataset: &Dataset,
    transmissions: Vec<RawTransmissionRecord>,
    moves: Vec<RawMoveRecord>,
) -> Vec<Event> {
    let mut events = build_message_events(dataset, transmissions);
    merge_move_events(dataset, moves, &mut events);
    debug!("Built timeline with {} events", events.len());
    events
}

fn build_message_events(
    dataset: &Dataset,
    mut transmissions: Vec<RawTransmissionRecord>,
) -> Vec<Event> {
    transmissions.sort_by(|a, b| {
        a.time
            .total_cmp(&b.time)
            .then(a.event_id.cmp(&b.event_id))
    });

    let mut events: Vec<Event> = Vec::new();
    let mut seq: u32 = 0;
    let mut i = 0;
    while i < transmissions.len() {
        let head = transmissions[i];
        let mut j = i + 1;
        while j < transmissions.len() && transmissions[j].event_id == head.event_id {
            j += 1;
        }
        // The sequence number counts groups, not emitted events, so a
        // dropped send still consumes its number.
        seq += 1;

        let mut destinations: Vec<NodeId> = Vec::new();
        if head.receiver_id == BROADCAST_RECEIVER {
            for record in &transmissions[i..j] {
                let dest = NodeId::from(record.resolved_receiver_id);
                if dataset.contains(dest) && !destinations.contains(&dest) {
                    destinations.push(dest);
                }
            }
        } else if head.receiver_id >= 0 {
            let dest = NodeId::from(head.receiver_id as u64);
            if dataset.contains(dest) {
                destinations.push(dest);
            }
        }

        let source = NodeId::from(head.sender_id);
        if dataset.contains(source) {
            events.push(Event::Msg(EventMsg {
                time: head.time,
                source,
                destinations,
                seq,
            }));
        } else {
            debug!("Dropping send {} with unknown source {}", head.event_id, source);
        }
        i = j;
    }
    events
}

fn merge_move_events(dataset: &Dataset, mut moves: Vec<RawMoveRecord>, events: &mut Vec<Event>) {
    moves.retain(|mv| {
        let known = dataset.contains(NodeId::from(mv.node_id));
        if !known {
            debug!("Dropping move for unknown node {}", mv.node_id);
        }
        known
    });
    // Stable sort keeps the record order within one timestamp. Batching is
    // on exact float equality: records must share the identical time.
    moves.sort_by(|a, b| a.time.total_cmp(&b.time));

    let mut i = 0;
    while i < moves.len() {
        let time = moves[i].time;
        let mut j = i + 1;
        while j < moves.len() && moves[j].time == time {
            j += 1;
        }
        let batch: Vec<MoveEvent> = moves[i..j]
            .iter()
            .map(|mv| MoveEvent {
                node: NodeId::from(mv.node_id),
                x: mv.x,
                y: mv.y,
            })
            .collect();
        // Move batches land before any same-time message event, keeping the
        // timeline non-decreasing with moves first on ties.
        let at = events.partition_point(|ev| ev.time() < time);
        events.insert(
            at,
            Event::Move(EventMove { time, moves: batch }),
        );
        i = j;
    }
}
