//! Immutable snapshots published to observers.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use algopiece_model::{AlgorithmId, GraphModel, NodeId};
use serde::{Deserialize, Serialize};

use crate::token::RunId;

/// Tentative shortest-path distance. `Infinite` sorts after every finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Distance {
    Finite(u64),
    Infinite,
}

impl Distance {
    /// Distance after following an edge of weight `weight`. Saturates at
    /// `u64::MAX`, which parsed weights cannot reach.
    pub fn extend(self, weight: u64) -> Self {
        match self {
            Distance::Finite(d) => Distance::Finite(d.saturating_add(weight)),
            Distance::Infinite => Distance::Infinite,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Distance::Finite(_))
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(d) => write!(f, "{d}"),
            Distance::Infinite => f.write_str("∞"),
        }
    }
}

/// Array state for the sorting and searching algorithms.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArrayView {
    pub values: Vec<i64>,
    /// Indices currently being compared or moved
    pub highlight: Vec<usize>,
    /// Indices in their final position
    pub resolved: BTreeSet<usize>,
    /// Where the search target was found
    pub found: Option<usize>,
    /// The value being searched for
    pub target: Option<i64>,
}

impl ArrayView {
    /// `values` before any step: nothing highlighted, resolved or found.
    pub fn idle(values: Vec<i64>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }
}

/// Traversal state for the graph algorithms.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphView {
    /// Node being expanded
    pub current: Option<NodeId>,
    /// Queue, stack or priority order of pending nodes
    pub frontier: Vec<NodeId>,
    /// Finalized nodes in visiting order
    pub visited: Vec<NodeId>,
    /// Dijkstra only
    pub distances: Option<BTreeMap<NodeId, Distance>>,
}

impl GraphView {
    /// `graph` before any step. With `distances`, every node starts infinite.
    pub fn idle(graph: &GraphModel, distances: bool) -> Self {
        Self {
            distances: distances
                .then(|| graph.node_ids().map(|id| (id, Distance::Infinite)).collect()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Array(ArrayView),
    Graph(GraphView),
}

impl View {
    pub fn as_array(&self) -> Option<&ArrayView> {
        match self {
            View::Array(view) => Some(view),
            View::Graph(_) => None,
        }
    }

    pub fn as_graph(&self) -> Option<&GraphView> {
        match self {
            View::Graph(view) => Some(view),
            View::Array(_) => None,
        }
    }
}

/// One emission of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub run: RunId,
    /// Position within the run, starting at 0
    pub step: u64,
    pub algorithm: AlgorithmId,
    pub view: View,
    pub description: String,
}
