//! AlgoPiece Models
//!
//! The inputs consumed by the playback engine's algorithm runners.
//!
//! # Contents
//!
//! - **Catalog**: the fixed set of algorithms with their teaching metadata
//! - **Sequence**: random arrays for the sorting and searching algorithms
//! - **Graph**: nodes, weighted undirected edges and the adjacency projection
//! - **Parsing**: the `0-1-4,1-2` custom edge-list format
//!
//! Nothing in this crate is asynchronous. The engine takes a working copy of
//! a model at run start and never writes back into it.

mod catalog;
mod graph;
mod parse;
mod sequence;

pub use catalog::{AlgorithmId, AlgorithmInfo, Category, Difficulty, UnknownAlgorithm};
pub use graph::{circle_layout, Edge, GraphModel, Neighbor, Node, NodeId};
pub use parse::{parse_edge_list, ParseError, DEFAULT_WEIGHT, MAX_WEIGHT};
pub use sequence::{random_sequence, SequenceConfig};
