//! The fixed catalog of playable algorithms.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Broad family an algorithm belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Category {
    Searching,
    Sorting,
    Graph,
}

/// Teaching difficulty label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Identifier of one algorithm in the catalog.
///
/// The string form (`bubble-sort`, `bfs`, ...) is stable and is what the
/// control surface accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AlgorithmId {
    LinearSearch,
    BinarySearch,
    BubbleSort,
    InsertionSort,
    MergeSort,
    QuickSort,
    Bfs,
    Dfs,
    Dijkstra,
}

impl AlgorithmId {
    /// Every algorithm, grouped by category.
    pub const ALL: [AlgorithmId; 9] = [
        AlgorithmId::LinearSearch,
        AlgorithmId::BinarySearch,
        AlgorithmId::BubbleSort,
        AlgorithmId::InsertionSort,
        AlgorithmId::MergeSort,
        AlgorithmId::QuickSort,
        AlgorithmId::Bfs,
        AlgorithmId::Dfs,
        AlgorithmId::Dijkstra,
    ];

    /// Stable string id.
    pub const fn as_str(&self) -> &'static str {
        match self {
            AlgorithmId::LinearSearch => "linear-search",
            AlgorithmId::BinarySearch => "binary-search",
            AlgorithmId::BubbleSort => "bubble-sort",
            AlgorithmId::InsertionSort => "insertion-sort",
            AlgorithmId::MergeSort => "merge-sort",
            AlgorithmId::QuickSort => "quick-sort",
            AlgorithmId::Bfs => "bfs",
            AlgorithmId::Dfs => "dfs",
            AlgorithmId::Dijkstra => "dijkstra",
        }
    }

    /// Human-readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            AlgorithmId::LinearSearch => "Linear Search",
            AlgorithmId::BinarySearch => "Binary Search",
            AlgorithmId::BubbleSort => "Bubble Sort",
            AlgorithmId::InsertionSort => "Insertion Sort",
            AlgorithmId::MergeSort => "Merge Sort",
            AlgorithmId::QuickSort => "Quick Sort",
            AlgorithmId::Bfs => "Breadth First Search",
            AlgorithmId::Dfs => "Depth First Search",
            AlgorithmId::Dijkstra => "Dijkstra's Algorithm",
        }
    }

    pub const fn category(&self) -> Category {
        match self {
            AlgorithmId::LinearSearch | AlgorithmId::BinarySearch => Category::Searching,
            AlgorithmId::BubbleSort
            | AlgorithmId::InsertionSort
            | AlgorithmId::MergeSort
            | AlgorithmId::QuickSort => Category::Sorting,
            AlgorithmId::Bfs | AlgorithmId::Dfs | AlgorithmId::Dijkstra => Category::Graph,
        }
    }

    pub const fn difficulty(&self) -> Difficulty {
        match self {
            AlgorithmId::LinearSearch | AlgorithmId::BubbleSort | AlgorithmId::InsertionSort => {
                Difficulty::Easy
            }
            AlgorithmId::Dijkstra => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    pub const fn time_complexity(&self) -> &'static str {
        match self {
            AlgorithmId::LinearSearch => "O(n)",
            AlgorithmId::BinarySearch => "O(log n)",
            AlgorithmId::BubbleSort | AlgorithmId::InsertionSort => "O(n²)",
            AlgorithmId::MergeSort | AlgorithmId::QuickSort => "O(n log n)",
            AlgorithmId::Bfs | AlgorithmId::Dfs => "O(V + E)",
            AlgorithmId::Dijkstra => "O((V + E) log V)",
        }
    }

    pub const fn space_complexity(&self) -> &'static str {
        match self {
            AlgorithmId::LinearSearch
            | AlgorithmId::BinarySearch
            | AlgorithmId::BubbleSort
            | AlgorithmId::InsertionSort => "O(1)",
            AlgorithmId::MergeSort => "O(n)",
            AlgorithmId::QuickSort => "O(log n)",
            AlgorithmId::Bfs | AlgorithmId::Dfs | AlgorithmId::Dijkstra => "O(V)",
        }
    }

    pub const fn summary(&self) -> &'static str {
        match self {
            AlgorithmId::LinearSearch => "Check every element in order until the target turns up.",
            AlgorithmId::BinarySearch => {
                "Halve the search range of a sorted array on every comparison."
            }
            AlgorithmId::BubbleSort => "Swap adjacent out-of-order pairs until nothing moves.",
            AlgorithmId::InsertionSort => {
                "Grow a sorted prefix by sliding each new element into its slot."
            }
            AlgorithmId::MergeSort => "Split in halves, sort each half, merge the sorted halves.",
            AlgorithmId::QuickSort => {
                "Partition around a pivot, then sort both sides of the pivot."
            }
            AlgorithmId::Bfs => "Visit the graph level by level from the start node.",
            AlgorithmId::Dfs => "Follow each branch as deep as it goes before backtracking.",
            AlgorithmId::Dijkstra => "Grow shortest paths outward from the source by total weight.",
        }
    }

    /// Binary search only works on ascending input.
    pub const fn requires_sorted_input(&self) -> bool {
        matches!(self, AlgorithmId::BinarySearch)
    }

    pub const fn is_graph(&self) -> bool {
        matches!(self.category(), Category::Graph)
    }

    pub const fn is_search(&self) -> bool {
        matches!(self.category(), Category::Searching)
    }

    /// Metadata record for this algorithm.
    pub fn info(&self) -> AlgorithmInfo {
        AlgorithmInfo {
            id: *self,
            name: self.name(),
            category: self.category(),
            difficulty: self.difficulty(),
            time_complexity: self.time_complexity(),
            space_complexity: self.space_complexity(),
            summary: self.summary(),
        }
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a catalog algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for AlgorithmId {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AlgorithmId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

/// Catalog entry served to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AlgorithmInfo {
    pub id: AlgorithmId,
    pub name: &'static str,
    pub category: Category,
    pub difficulty: Difficulty,
    pub time_complexity: &'static str,
    pub space_complexity: &'static str,
    pub summary: &'static str,
}
