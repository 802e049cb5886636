//! Graph traversal runners.
//!
//! All three start from [`GraphModel::start_node`] and expand neighbors in
//! ascending id order. Nodes unreachable from the start are never visited.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, VecDeque};

use algopiece_model::{GraphModel, NodeId};

use crate::config::Beat;
use crate::delay::Halted;
use crate::pacer::Pacer;
use crate::snapshot::{Distance, GraphView, View};

#[derive(Default)]
struct Trace {
    current: Option<NodeId>,
    frontier: Vec<NodeId>,
    visited: Vec<NodeId>,
    distances: Option<BTreeMap<NodeId, Distance>>,
}

impl Trace {
    fn view(&self) -> View {
        View::Graph(GraphView {
            current: self.current,
            frontier: self.frontier.clone(),
            visited: self.visited.clone(),
            distances: self.distances.clone(),
        })
    }

    fn into_view(self) -> View {
        View::Graph(GraphView {
            current: self.current,
            frontier: self.frontier,
            visited: self.visited,
            distances: self.distances,
        })
    }
}

pub(super) async fn bfs(graph: &GraphModel, pacer: &mut Pacer) -> Result<View, Halted> {
    let mut trace = Trace::default();
    let Some(start) = graph.start_node() else {
        return Ok(trace.into_view());
    };

    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    trace.frontier = vec![start];
    pacer
        .step(trace.view(), format!("Starting BFS from node {start}"), Beat::Full)
        .await?;

    while let Some(node) = queue.pop_front() {
        trace.current = Some(node);
        trace.visited.push(node);
        trace.frontier = queue.iter().copied().collect();
        pacer
            .step(trace.view(), format!("Visiting node {node}"), Beat::Full)
            .await?;

        for neighbor in graph.neighbors(node) {
            if !seen.insert(neighbor.node) {
                continue;
            }
            queue.push_back(neighbor.node);
            trace.frontier = queue.iter().copied().collect();
            pacer
                .step(
                    trace.view(),
                    format!("Queued node {} (neighbor of {node})", neighbor.node),
                    Beat::Half,
                )
                .await?;
        }
    }

    trace.current = None;
    pacer
        .step(trace.view(), "BFS traversal complete", Beat::Full)
        .await?;
    Ok(trace.into_view())
}

pub(super) async fn dfs(graph: &GraphModel, pacer: &mut Pacer) -> Result<View, Halted> {
    let mut trace = Trace::default();
    let Some(start) = graph.start_node() else {
        return Ok(trace.into_view());
    };

    let mut visited = BTreeSet::new();
    let mut stack = vec![start];
    trace.frontier = stack.clone();
    pacer
        .step(trace.view(), format!("Starting DFS from node {start}"), Beat::Full)
        .await?;

    while let Some(node) = stack.pop() {
        // A node can sit on the stack more than once; the first pop wins.
        if !visited.insert(node) {
            continue;
        }
        trace.current = Some(node);
        trace.visited.push(node);
        trace.frontier = stack.clone();
        pacer
            .step(trace.view(), format!("Visiting node {node}"), Beat::Full)
            .await?;

        // Descending push so the lowest id is popped next.
        for neighbor in graph.neighbors(node).iter().rev() {
            if visited.contains(&neighbor.node) {
                continue;
            }
            stack.push(neighbor.node);
            trace.frontier = stack.clone();
            pacer
                .step(
                    trace.view(),
                    format!("Pushed node {} (neighbor of {node})", neighbor.node),
                    Beat::Half,
                )
                .await?;
        }
    }

    trace.current = None;
    trace.frontier.clear();
    pacer
        .step(trace.view(), "DFS traversal complete", Beat::Full)
        .await?;
    Ok(trace.into_view())
}

/// Min-heap entry. The sequence number breaks ties in insertion order.
type Entry = Reverse<(u64, u64, NodeId)>;

fn frontier_of(heap: &BinaryHeap<Entry>, finalized: &BTreeSet<NodeId>) -> Vec<NodeId> {
    let mut pending: Vec<(u64, u64, NodeId)> = heap
        .iter()
        .map(|Reverse(entry)| *entry)
        .filter(|(_, _, node)| !finalized.contains(node))
        .collect();
    pending.sort_unstable();
    pending.into_iter().map(|(_, _, node)| node).collect()
}

pub(super) async fn dijkstra(graph: &GraphModel, pacer: &mut Pacer) -> Result<View, Halted> {
    let mut trace = Trace::default();
    let Some(source) = graph.start_node() else {
        return Ok(trace.into_view());
    };

    let mut dist: BTreeMap<NodeId, Distance> =
        graph.node_ids().map(|id| (id, Distance::Infinite)).collect();
    dist.insert(source, Distance::Finite(0));

    let mut finalized = BTreeSet::new();
    let mut heap: BinaryHeap<Entry> = BinaryHeap::new();
    let mut seq = 0u64;
    heap.push(Reverse((0, seq, source)));

    trace.frontier = vec![source];
    trace.distances = Some(dist.clone());
    pacer
        .step(
            trace.view(),
            format!("Starting Dijkstra from node {source}"),
            Beat::Full,
        )
        .await?;

    while let Some(Reverse((d, _, node))) = heap.pop() {
        if !finalized.insert(node) {
            continue;
        }
        trace.current = Some(node);
        trace.visited.push(node);
        trace.frontier = frontier_of(&heap, &finalized);
        pacer
            .step(
                trace.view(),
                format!("Visiting node {node} at distance {d}"),
                Beat::Full,
            )
            .await?;

        for neighbor in graph.neighbors(node) {
            let v = neighbor.node;
            if finalized.contains(&v) {
                continue;
            }
            let candidate = Distance::Finite(d).extend(neighbor.weight);
            let known = dist.get(&v).copied().unwrap_or(Distance::Infinite);
            if candidate >= known {
                continue;
            }
            dist.insert(v, candidate);
            seq += 1;
            if let Distance::Finite(c) = candidate {
                heap.push(Reverse((c, seq, v)));
            }

            trace.distances = Some(dist.clone());
            trace.frontier = frontier_of(&heap, &finalized);
            pacer
                .step(
                    trace.view(),
                    format!("Updated distance of node {v} to {candidate} via {node}"),
                    Beat::Full,
                )
                .await?;
        }
    }

    trace.current = None;
    trace.frontier.clear();
    pacer
        .step(trace.view(), "Dijkstra complete: shortest paths found", Beat::Full)
        .await?;
    Ok(trace.into_view())
}
