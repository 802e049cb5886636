//! Undirected weighted graph model.
//!
//! Edges are undirected: every accepted edge contributes one adjacency entry
//! at each endpoint. A second edge between the same pair of nodes is dropped
//! (the first occurrence keeps its weight). Adjacency lists are kept sorted by
//! ascending neighbor id, which is the order the traversals expand them in.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;
use std::fmt;

/// Identifier of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node with its display position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub label: String,
}

impl Node {
    pub fn new(id: NodeId, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            label: id.to_string(),
        }
    }
}

/// An undirected weighted edge as written by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: u64,
}

impl Edge {
    pub const fn new(source: u64, target: u64, weight: u64) -> Self {
        Self {
            source: NodeId(source),
            target: NodeId(target),
            weight,
        }
    }

    /// Endpoints in ascending order, used to detect duplicate edges.
    fn key(&self) -> (NodeId, NodeId) {
        if self.source <= self.target {
            (self.source, self.target)
        } else {
            (self.target, self.source)
        }
    }
}

/// One adjacency entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neighbor {
    pub node: NodeId,
    pub weight: u64,
}

/// Nodes, edges and the adjacency projection built from the edges.
///
/// Deserializing reads only the nodes and edges and rebuilds the adjacency
/// through [`GraphModel::new`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "GraphParts"))]
pub struct GraphModel {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    adjacency: BTreeMap<NodeId, Vec<Neighbor>>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct GraphParts {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

#[cfg(feature = "serde")]
impl From<GraphParts> for GraphModel {
    fn from(parts: GraphParts) -> Self {
        GraphModel::new(parts.nodes, parts.edges)
    }
}

impl GraphModel {
    /// Build from explicit nodes and edges.
    ///
    /// Endpoints missing from `nodes` still get an (empty-positioned) adjacency
    /// list so traversals never see a dangling neighbor.
    pub fn new(nodes: Vec<Node>, edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut adjacency: BTreeMap<NodeId, Vec<Neighbor>> =
            nodes.iter().map(|n| (n.id, Vec::new())).collect();
        let mut seen = BTreeSet::new();
        let mut kept = Vec::new();

        for edge in edges {
            if !seen.insert(edge.key()) {
                continue;
            }
            kept.push(edge);

            let forward = adjacency.entry(edge.source).or_default();
            if !forward.iter().any(|n| n.node == edge.target) {
                forward.push(Neighbor {
                    node: edge.target,
                    weight: edge.weight,
                });
            }
            let backward = adjacency.entry(edge.target).or_default();
            if !backward.iter().any(|n| n.node == edge.source) {
                backward.push(Neighbor {
                    node: edge.source,
                    weight: edge.weight,
                });
            }
        }

        for list in adjacency.values_mut() {
            list.sort_by_key(|n| n.node);
        }

        Self {
            nodes,
            edges: kept,
            adjacency,
        }
    }

    /// Build from edges alone, laying the endpoints out on a circle.
    pub fn from_edges(edges: impl IntoIterator<Item = Edge>) -> Self {
        let edges: Vec<Edge> = edges.into_iter().collect();
        let ids: BTreeSet<NodeId> = edges.iter().flat_map(|e| [e.source, e.target]).collect();
        let ids: Vec<NodeId> = ids.into_iter().collect();
        Self::new(circle_layout(&ids), edges)
    }

    /// The built-in seven node tree shown before any custom graph is loaded.
    pub fn default_graph() -> Self {
        let positions = [
            (0, 250.0, 50.0),
            (1, 150.0, 150.0),
            (2, 350.0, 150.0),
            (3, 100.0, 250.0),
            (4, 200.0, 250.0),
            (5, 300.0, 250.0),
            (6, 400.0, 250.0),
        ];
        let nodes = positions
            .into_iter()
            .map(|(id, x, y)| Node::new(NodeId(id), x, y))
            .collect();
        let edges = [
            Edge::new(0, 1, 4),
            Edge::new(0, 2, 2),
            Edge::new(1, 3, 5),
            Edge::new(1, 4, 1),
            Edge::new(2, 5, 3),
            Edge::new(2, 6, 8),
        ];
        Self::new(nodes, edges)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// All node ids in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// Neighbors of `id` in ascending id order (empty for unknown nodes).
    pub fn neighbors(&self, id: NodeId) -> &[Neighbor] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Traversal start: node 0 when present, otherwise the lowest id.
    pub fn start_node(&self) -> Option<NodeId> {
        if self.contains(NodeId(0)) {
            Some(NodeId(0))
        } else {
            self.adjacency.keys().next().copied()
        }
    }
}

impl Default for GraphModel {
    fn default() -> Self {
        Self::default_graph()
    }
}

const LAYOUT_CENTER: (f64, f64) = (250.0, 150.0);
const LAYOUT_RADIUS: f64 = 100.0;

/// Place `ids` evenly on a circle, first id at the top, in the given order.
pub fn circle_layout(ids: &[NodeId]) -> Vec<Node> {
    let count = ids.len() as f64;
    ids.iter()
        .enumerate()
        .map(|(index, &id)| {
            let angle = (index as f64 / count) * 2.0 * PI - PI / 2.0;
            Node::new(
                id,
                LAYOUT_CENTER.0 + LAYOUT_RADIUS * angle.cos(),
                LAYOUT_CENTER.1 + LAYOUT_RADIUS * angle.sin(),
            )
        })
        .collect()
}
