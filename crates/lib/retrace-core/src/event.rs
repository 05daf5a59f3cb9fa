use crate::ids::NodeId;

/// One node's instantaneous position change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveEvent {
    pub node: NodeId,
    pub x: f64,
    pub y: f64,
}

/// A batch of position changes sharing one timestamp, applied atomically.
#[derive(Clone, Debug, PartialEq)]
pub struct EventMove {
    pub time: f64,
    pub moves: Vec<MoveEvent>,
}

/// One logical send reaching a set of destinations at a point in simulated
/// time. `seq` is 1-based and counts record groups across the whole build.
#[derive(Clone, Debug, PartialEq)]
pub struct EventMsg {
    pub time: f64,
    pub source: NodeId,
    pub destinations: Vec<NodeId>,
    pub seq: u32,
}

/// Entry of the replay timeline. The timeline is ordered by non-decreasing
/// time, with move batches preceding same-time message events.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Move(EventMove),
    Msg(EventMsg),
}

impl Event {
    pub fn time(&self) -> f64 {
        match self {
            Event::Move(ev) => ev.time,
            Event::Msg(ev) => ev.time,
        }
    }

    pub fn is_msg(&self) -> bool {
        matches!(self, Event::Msg(_))
    }
}
