//! Algorithm runners.
//!
//! Each runner owns a working copy of its input, drives the algorithm to
//! completion and publishes a snapshot through the [`Pacer`] after every
//! meaningful change. Runners return the final view, or [`Halted`] as soon as
//! their run is superseded.
//!
//! Quick sort and merge sort keep an explicit work stack instead of recursing,
//! visiting ranges in the same order the recursive formulation would.

mod array;
mod graph;

use std::sync::Arc;

use algopiece_model::{AlgorithmId, GraphModel};

use crate::delay::Halted;
use crate::pacer::Pacer;
use crate::snapshot::View;

/// Input for one run, copied out of the controller's model.
#[derive(Debug, Clone)]
pub(crate) struct Workload {
    pub(crate) values: Vec<i64>,
    /// Search target; `None` for sorts and for empty arrays
    pub(crate) target: Option<i64>,
    pub(crate) graph: Arc<GraphModel>,
}

pub(crate) async fn run(
    algorithm: AlgorithmId,
    workload: Workload,
    pacer: &mut Pacer,
) -> Result<View, Halted> {
    let Workload {
        values,
        target,
        graph: model,
    } = workload;

    match algorithm {
        AlgorithmId::BubbleSort => array::bubble_sort(values, pacer).await,
        AlgorithmId::InsertionSort => array::insertion_sort(values, pacer).await,
        AlgorithmId::QuickSort => array::quick_sort(values, pacer).await,
        AlgorithmId::MergeSort => array::merge_sort(values, pacer).await,
        AlgorithmId::LinearSearch => array::linear_search(values, target, pacer).await,
        AlgorithmId::BinarySearch => array::binary_search(values, target, pacer).await,
        AlgorithmId::Bfs => graph::bfs(&model, pacer).await,
        AlgorithmId::Dfs => graph::dfs(&model, pacer).await,
        AlgorithmId::Dijkstra => graph::dijkstra(&model, pacer).await,
    }
}
