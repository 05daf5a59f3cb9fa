use std::collections::VecDeque;
use std::fmt;

use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::ids::NodeId;

/// Upper bound on retained trajectory points per node. Matches the display
/// truncation limit, so the snapshot never has to slice.
pub const TRACK_CAP: usize = 80;

/// An immutable point in the simulation plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, TypedBuilder)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// The variety of a node. Replay logs tag every node with one of these;
/// anything unrecognized is treated as a regular node.
#[derive(Deserialize, Debug, Hash, Copy, Default, Clone, PartialEq, Eq)]
pub enum NodeKind {
    #[default]
    Regular,
    Uav,
    Intruder,
}

impl NodeKind {
    /// Case-insensitive parse with a Regular fallback. Log readers hand in
    /// free-text type labels, so this never fails.
    pub fn from_label(label: &str) -> Self {
        match label.to_uppercase().as_str() {
            "UAV" => NodeKind::Uav,
            "INTRUDER" => NodeKind::Intruder,
            _ => NodeKind::Regular,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Regular => write!(f, "REGULAR"),
            NodeKind::Uav => write!(f, "UAV"),
            NodeKind::Intruder => write!(f, "INTRUDER"),
        }
    }
}

/// Bounded trajectory history. Every applied move appends here and the
/// oldest point falls off once the ring is full.
#[derive(Clone, Debug, Default)]
pub struct Track {
    points: VecDeque<Position>,
}

impl Track {
    pub fn push(&mut self, position: Position) {
        if self.points.len() == TRACK_CAP {
            self.points.pop_front();
        }
        self.points.push_back(position);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.points.iter()
    }
}

/// A node of the replayed network. Position is mutable and changes only
/// through [`Node::move_to`], which also records the trajectory.
#[derive(Clone, Debug, TypedBuilder)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub radius_comm: f64,
    #[builder(default)]
    pub kind: NodeKind,
    #[builder(default = false)]
    pub is_mobile: bool,
    #[builder(default)]
    pub label: String,
    #[builder(default)]
    pub track: Track,
}

impl Node {
    pub fn position(&self) -> Position {
        Position {
            x: self.x,
            y: self.y,
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.track.push(Position { x, y });
    }

    pub fn distance_to(&self, other: &Node) -> f64 {
        self.position().distance_to(&other.position())
    }
}
