use hashbrown::HashMap;
use log::warn;
use typed_builder::TypedBuilder;

use crate::event::{Event, MoveEvent};
use crate::ids::NodeId;
use crate::node::Node;

/// Everything loaded from one replay log: field configuration, the live node
/// set and the built timeline. Owned exclusively by the playback controller
/// once adopted; created whole and discarded whole.
#[derive(Clone, Debug, Default, TypedBuilder)]
pub struct Dataset {
    pub width: u32,
    pub height: u32,
    pub max_sim_time: f64,
    pub radius_comm: f64,
    #[builder(default)]
    pub description: String,
    #[builder(default)]
    nodes: Vec<Node>,
    #[builder(default)]
    index: HashMap<NodeId, usize>,
    #[builder(default)]
    events: Vec<Event>,
}

impl Dataset {
    pub fn add_node(&mut self, node: Node) {
        if self.index.contains_key(&node.id) {
            warn!("Duplicate node id {} in dataset, record dropped", node.id);
            return;
        }
        self.index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|idx| &self.nodes[*idx])
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        match self.index.get(&id) {
            Some(idx) => Some(&mut self.nodes[*idx]),
            None => None,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn set_events(&mut self, events: Vec<Event>) {
        self.events = events;
    }

    /// Applies a single position change. Moves naming an unknown node were
    /// dropped at build time, so a miss here only happens with a hand-built
    /// timeline and is ignored.
    pub fn apply_move(&mut self, mv: &MoveEvent) {
        if let Some(node) = self.node_mut(mv.node) {
            node.move_to(mv.x, mv.y);
        }
    }
}
