//! Sorting and searching runners.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::Beat;
use crate::delay::Halted;
use crate::pacer::Pacer;
use crate::snapshot::{ArrayView, View};

/// Working copy of the array plus its visual markers.
struct Tape {
    values: Vec<i64>,
    highlight: Vec<usize>,
    resolved: BTreeSet<usize>,
    found: Option<usize>,
    target: Option<i64>,
}

impl Tape {
    fn new(values: Vec<i64>, target: Option<i64>) -> Self {
        Self {
            values,
            highlight: Vec::new(),
            resolved: BTreeSet::new(),
            found: None,
            target,
        }
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn focus(&mut self, indices: &[usize]) {
        self.highlight.clear();
        self.highlight.extend_from_slice(indices);
    }

    fn unfocus(&mut self) {
        self.highlight.clear();
    }

    fn view(&self) -> View {
        View::Array(ArrayView {
            values: self.values.clone(),
            highlight: self.highlight.clone(),
            resolved: self.resolved.clone(),
            found: self.found,
            target: self.target,
        })
    }

    fn into_view(self) -> View {
        View::Array(ArrayView {
            values: self.values,
            highlight: self.highlight,
            resolved: self.resolved,
            found: self.found,
            target: self.target,
        })
    }
}

/// Mark everything sorted and publish the terminal snapshot.
async fn finish_sort(mut tape: Tape, pacer: &mut Pacer) -> Result<View, Halted> {
    tape.resolved.extend(0..tape.len());
    tape.unfocus();
    pacer.step(tape.view(), "Array is sorted", Beat::Full).await?;
    Ok(tape.into_view())
}

pub(super) async fn bubble_sort(values: Vec<i64>, pacer: &mut Pacer) -> Result<View, Halted> {
    let mut tape = Tape::new(values, None);
    let n = tape.len();
    if n == 0 {
        return Ok(tape.into_view());
    }

    for pass in 0..n - 1 {
        for j in 0..n - 1 - pass {
            let (left, right) = (tape.values[j], tape.values[j + 1]);
            tape.focus(&[j, j + 1]);
            pacer
                .step(tape.view(), format!("Comparing {left} and {right}"), Beat::Full)
                .await?;

            if left > right {
                tape.values.swap(j, j + 1);
                pacer
                    .step(tape.view(), format!("Swapped {left} and {right}"), Beat::Half)
                    .await?;
            }
        }
        tape.resolved.insert(n - 1 - pass);
    }

    finish_sort(tape, pacer).await
}

pub(super) async fn insertion_sort(values: Vec<i64>, pacer: &mut Pacer) -> Result<View, Halted> {
    let mut tape = Tape::new(values, None);
    let n = tape.len();
    if n == 0 {
        return Ok(tape.into_view());
    }

    for i in 1..n {
        let key = tape.values[i];
        tape.focus(&[i]);
        pacer
            .step(tape.view(), format!("Picked up {key} from index {i}"), Beat::Full)
            .await?;

        let mut gap = i;
        while gap > 0 && tape.values[gap - 1] > key {
            let moved = tape.values[gap - 1];
            tape.values[gap] = moved;
            tape.focus(&[gap - 1, gap]);
            pacer
                .step(tape.view(), format!("{moved} > {key}, shifting {moved} right"), Beat::Full)
                .await?;
            gap -= 1;
        }

        tape.values[gap] = key;
        tape.focus(&[gap]);
        pacer
            .step(tape.view(), format!("Inserted {key} at index {gap}"), Beat::Half)
            .await?;
    }

    finish_sort(tape, pacer).await
}

pub(super) async fn quick_sort(values: Vec<i64>, pacer: &mut Pacer) -> Result<View, Halted> {
    let mut tape = Tape::new(values, None);
    let n = tape.len();
    if n == 0 {
        return Ok(tape.into_view());
    }

    // Inclusive ranges. The left range is pushed last so it is sorted first.
    let mut pending = vec![(0, n - 1)];
    while let Some((low, high)) = pending.pop() {
        if low >= high {
            continue;
        }
        let pivot = partition(&mut tape, low, high, pacer).await?;
        if pivot + 1 < high {
            pending.push((pivot + 1, high));
        }
        if pivot > low + 1 {
            pending.push((low, pivot - 1));
        }
    }

    finish_sort(tape, pacer).await
}

/// Lomuto partition of `low..=high` around the last element.
async fn partition(
    tape: &mut Tape,
    low: usize,
    high: usize,
    pacer: &mut Pacer,
) -> Result<usize, Halted> {
    let pivot = tape.values[high];
    let mut store = low;

    for j in low..high {
        let value = tape.values[j];
        tape.focus(&[j, high]);
        pacer
            .step(tape.view(), format!("Comparing {value} with pivot {pivot}"), Beat::Full)
            .await?;

        if value <= pivot {
            tape.values.swap(store, j);
            store += 1;
            pacer
                .step(tape.view(), format!("{value} <= {pivot}, moved left of the pivot"), Beat::Half)
                .await?;
        }
    }

    tape.values.swap(store, high);
    tape.resolved.insert(store);
    tape.focus(&[store]);
    pacer
        .step(tape.view(), format!("Pivot {pivot} placed at index {store}"), Beat::Half)
        .await?;
    Ok(store)
}

enum MergeTask {
    Split { left: usize, right: usize },
    Merge { left: usize, mid: usize, right: usize },
}

pub(super) async fn merge_sort(values: Vec<i64>, pacer: &mut Pacer) -> Result<View, Halted> {
    let mut tape = Tape::new(values, None);
    let n = tape.len();
    if n == 0 {
        return Ok(tape.into_view());
    }

    let mut work = vec![MergeTask::Split { left: 0, right: n - 1 }];
    while let Some(task) = work.pop() {
        match task {
            MergeTask::Split { left, right } if left < right => {
                let mid = left + (right - left) / 2;
                work.push(MergeTask::Merge { left, mid, right });
                work.push(MergeTask::Split { left: mid + 1, right });
                work.push(MergeTask::Split { left, right: mid });
            }
            MergeTask::Split { .. } => {}
            MergeTask::Merge { left, mid, right } => {
                merge(&mut tape, left, mid, right, pacer).await?;
            }
        }
    }

    finish_sort(tape, pacer).await
}

/// Merge the sorted runs `left..=mid` and `mid+1..=right`. Ties take the left
/// element, which keeps the sort stable.
async fn merge(
    tape: &mut Tape,
    left: usize,
    mid: usize,
    right: usize,
    pacer: &mut Pacer,
) -> Result<(), Halted> {
    let lower = tape.values[left..=mid].to_vec();
    let upper = tape.values[mid + 1..=right].to_vec();
    let (mut i, mut j, mut k) = (0, 0, left);

    while i < lower.len() && j < upper.len() {
        let (a, b) = (lower[i], upper[j]);
        tape.focus(&[left + i, mid + 1 + j]);
        pacer
            .step(tape.view(), format!("Comparing {a} and {b}"), Beat::Full)
            .await?;

        let chosen = if a <= b {
            i += 1;
            a
        } else {
            j += 1;
            b
        };
        tape.values[k] = chosen;
        tape.focus(&[k]);
        pacer
            .step(tape.view(), format!("Wrote {chosen} to index {k}"), Beat::Half)
            .await?;
        k += 1;
    }

    if k <= right {
        for &value in lower[i..].iter().chain(&upper[j..]) {
            tape.values[k] = value;
            k += 1;
        }
        tape.unfocus();
        pacer
            .step(
                tape.view(),
                format!("Copied the remaining values into {left}..={right}"),
                Beat::Half,
            )
            .await?;
    }
    Ok(())
}

pub(super) async fn linear_search(
    values: Vec<i64>,
    target: Option<i64>,
    pacer: &mut Pacer,
) -> Result<View, Halted> {
    let mut tape = Tape::new(values, target);
    let Some(target) = target else {
        return Ok(tape.into_view());
    };
    if tape.len() == 0 {
        return Ok(tape.into_view());
    }

    for i in 0..tape.len() {
        let value = tape.values[i];
        tape.focus(&[i]);
        pacer
            .step(tape.view(), format!("Checking index {i}: is {value} equal to {target}?"), Beat::Full)
            .await?;

        if value == target {
            tape.found = Some(i);
            tape.unfocus();
            pacer
                .step(tape.view(), format!("Found {target} at index {i}"), Beat::Full)
                .await?;
            return Ok(tape.into_view());
        }
    }

    debug!(wanted = target, "linear search exhausted the array");
    tape.unfocus();
    pacer
        .step(tape.view(), format!("{target} is not in the array"), Beat::Full)
        .await?;
    Ok(tape.into_view())
}

/// Expects ascending input; the controller sorts the array for this mode.
pub(super) async fn binary_search(
    values: Vec<i64>,
    target: Option<i64>,
    pacer: &mut Pacer,
) -> Result<View, Halted> {
    let mut tape = Tape::new(values, target);
    let Some(target) = target else {
        return Ok(tape.into_view());
    };
    if tape.len() == 0 {
        return Ok(tape.into_view());
    }

    let mut low: isize = 0;
    let mut high: isize = tape.len() as isize - 1;
    while low <= high {
        let mid = ((low + high) / 2) as usize;
        let value = tape.values[mid];
        tape.focus(&[mid]);
        pacer
            .step(
                tape.view(),
                format!("Checking middle index {mid} of {low}..={high}: {value}"),
                Beat::Full,
            )
            .await?;

        if value == target {
            tape.found = Some(mid);
            tape.unfocus();
            pacer
                .step(tape.view(), format!("Found {target} at index {mid}"), Beat::Full)
                .await?;
            return Ok(tape.into_view());
        }
        if value < target {
            low = mid as isize + 1;
        } else {
            high = mid as isize - 1;
        }
    }

    tape.unfocus();
    pacer
        .step(tape.view(), format!("{target} is not in the array"), Beat::Full)
        .await?;
    Ok(tape.into_view())
}

#[cfg(test)]
mod tests {
    use crate::runner::testing::{run_blocking, run_instant};
    use crate::snapshot::{ArrayView, Snapshot, View};
    use algopiece_model::{AlgorithmId, GraphModel};
    use proptest::prelude::*;

    const SORTS: [AlgorithmId; 4] = [
        AlgorithmId::BubbleSort,
        AlgorithmId::InsertionSort,
        AlgorithmId::QuickSort,
        AlgorithmId::MergeSort,
    ];

    fn array(view: &View) -> &ArrayView {
        view.as_array().expect("array view")
    }

    async fn sort(algorithm: AlgorithmId, values: &[i64]) -> (ArrayView, Vec<Snapshot>) {
        let (view, snapshots) =
            run_instant(algorithm, values.to_vec(), None, GraphModel::default()).await;
        (array(&view).clone(), snapshots)
    }

    #[tokio::test]
    async fn bubble_sort_example() {
        let (view, snapshots) = sort(AlgorithmId::BubbleSort, &[5, 3, 8, 1, 9]).await;
        assert_eq!(view.values, vec![1, 3, 5, 8, 9]);
        assert_eq!(view.resolved.len(), 5);
        assert!(view.highlight.is_empty());
        assert_eq!(snapshots.last().map(|s| array(&s.view).values.clone()), Some(view.values));
    }

    #[tokio::test]
    async fn bubble_sort_highlights_adjacent_pairs() {
        let (_, snapshots) = sort(AlgorithmId::BubbleSort, &[3, 2, 1]).await;
        let comparisons: Vec<Vec<usize>> = snapshots
            .iter()
            .filter(|s| s.description.starts_with("Comparing"))
            .map(|s| array(&s.view).highlight.clone())
            .collect();
        assert_eq!(comparisons, vec![vec![0, 1], vec![1, 2], vec![0, 1]]);
    }

    #[tokio::test]
    async fn bubble_sort_does_not_swap_equal_values() {
        let (_, snapshots) = sort(AlgorithmId::BubbleSort, &[4, 4, 4]).await;
        assert!(snapshots.iter().all(|s| !s.description.starts_with("Swapped")));
    }

    #[tokio::test]
    async fn bubble_sort_resolves_from_the_right() {
        let (_, snapshots) = sort(AlgorithmId::BubbleSort, &[4, 3, 2, 1]).await;
        let mut previous = 0;
        for snapshot in &snapshots {
            let resolved = &array(&snapshot.view).resolved;
            assert!(resolved.len() >= previous, "resolved set shrank");
            previous = resolved.len();
        }
        let second_pass = snapshots
            .iter()
            .find(|s| array(&s.view).resolved.len() == 1)
            .unwrap();
        assert!(array(&second_pass.view).resolved.contains(&3));
    }

    #[tokio::test]
    async fn empty_input_emits_nothing() {
        for algorithm in SORTS {
            let (view, snapshots) = sort(algorithm, &[]).await;
            assert!(snapshots.is_empty(), "{algorithm} emitted on empty input");
            assert!(view.resolved.is_empty());
        }
    }

    #[tokio::test]
    async fn single_element_is_resolved_without_comparisons() {
        for algorithm in SORTS {
            let (view, snapshots) = sort(algorithm, &[42]).await;
            assert_eq!(view.resolved.len(), 1);
            assert_eq!(snapshots.len(), 1, "{algorithm}");
            assert!(array(&snapshots[0].view).highlight.is_empty());
        }
    }

    #[tokio::test]
    async fn insertion_sort_shifts_larger_predecessors() {
        let (view, snapshots) = sort(AlgorithmId::InsertionSort, &[3, 1, 2]).await;
        assert_eq!(view.values, vec![1, 2, 3]);
        let shifts = snapshots
            .iter()
            .filter(|s| s.description.contains("shifting"))
            .count();
        assert_eq!(shifts, 2);
        // Nothing is marked sorted until the end.
        let early = &snapshots[..snapshots.len() - 1];
        assert!(early.iter().all(|s| array(&s.view).resolved.is_empty()));
    }

    #[tokio::test]
    async fn quick_sort_compares_against_the_last_element() {
        let (view, snapshots) = sort(AlgorithmId::QuickSort, &[3, 7, 1, 5]).await;
        assert_eq!(view.values, vec![1, 3, 5, 7]);
        let first = array(&snapshots[0].view);
        assert_eq!(first.highlight, vec![0, 3]);
        assert!(snapshots[0].description.contains("pivot 5"));
    }

    #[tokio::test]
    async fn quick_sort_resolves_pivots_as_placed() {
        let (_, snapshots) = sort(AlgorithmId::QuickSort, &[3, 7, 1, 5]).await;
        let placed = snapshots
            .iter()
            .find(|s| s.description.starts_with("Pivot 5"))
            .unwrap();
        let view = array(&placed.view);
        assert_eq!(view.values[2], 5);
        assert!(view.resolved.contains(&2));
    }

    #[tokio::test]
    async fn merge_sort_is_stable_on_ties() {
        // Equal heads: the left element must be written first.
        let (_, snapshots) = sort(AlgorithmId::MergeSort, &[2, 2]).await;
        let write = snapshots
            .iter()
            .find(|s| s.description.starts_with("Wrote"))
            .unwrap();
        assert_eq!(array(&write.view).highlight, vec![0]);
    }

    #[tokio::test]
    async fn merge_sort_copies_leftovers_without_comparing() {
        let (view, snapshots) = sort(AlgorithmId::MergeSort, &[1, 2, 3, 4]).await;
        assert_eq!(view.values, vec![1, 2, 3, 4]);
        let comparisons = snapshots
            .iter()
            .filter(|s| s.description.starts_with("Comparing"))
            .count();
        // [1]|[2], [3]|[4], then [1,2]|[3,4] stops after two comparisons.
        assert_eq!(comparisons, 4);
    }

    #[tokio::test]
    async fn linear_search_stops_at_first_match() {
        let (view, snapshots) = run_instant(
            AlgorithmId::LinearSearch,
            vec![7, 3, 9, 3],
            Some(3),
            GraphModel::default(),
        )
        .await;
        let view = array(&view);
        assert_eq!(view.found, Some(1));
        assert_eq!(view.target, Some(3));
        let checks = snapshots
            .iter()
            .filter(|s| s.description.starts_with("Checking"))
            .count();
        assert_eq!(checks, 2);
    }

    #[tokio::test]
    async fn linear_search_miss_leaves_no_marker() {
        let (view, snapshots) = run_instant(
            AlgorithmId::LinearSearch,
            vec![1, 2, 3],
            Some(10),
            GraphModel::default(),
        )
        .await;
        assert_eq!(array(&view).found, None);
        assert_eq!(snapshots.len(), 4);
    }

    #[tokio::test]
    async fn binary_search_checks_midpoints() {
        let (view, snapshots) = run_instant(
            AlgorithmId::BinarySearch,
            vec![1, 3, 5, 7, 9, 11, 13],
            Some(11),
            GraphModel::default(),
        )
        .await;
        assert_eq!(array(&view).found, Some(5));
        let checked: Vec<Vec<usize>> = snapshots
            .iter()
            .filter(|s| s.description.starts_with("Checking"))
            .map(|s| array(&s.view).highlight.clone())
            .collect();
        assert_eq!(checked, vec![vec![3], vec![5]]);
    }

    #[tokio::test]
    async fn binary_search_miss_terminates() {
        let (view, _) = run_instant(
            AlgorithmId::BinarySearch,
            vec![1, 3, 5],
            Some(4),
            GraphModel::default(),
        )
        .await;
        assert_eq!(array(&view).found, None);
    }

    #[tokio::test]
    async fn searches_on_empty_arrays_emit_nothing() {
        for algorithm in [AlgorithmId::LinearSearch, AlgorithmId::BinarySearch] {
            let (_, snapshots) =
                run_instant(algorithm, Vec::new(), None, GraphModel::default()).await;
            assert!(snapshots.is_empty());
        }
    }

    /// Where the stream first reports the target, failing if the index ever
    /// changes or disappears afterwards.
    fn first_found(snapshots: &[Snapshot]) -> Result<Option<usize>, TestCaseError> {
        let mut first = None;
        for snapshot in snapshots {
            let now = array(&snapshot.view).found;
            match first {
                Some(index) => prop_assert_eq!(now, Some(index), "step {}", snapshot.step),
                None => first = now,
            }
        }
        Ok(first)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn every_sort_sorts_and_resolves_everything(
            values in prop::collection::vec(-50i64..50, 1..24)
        ) {
            let mut expected = values.clone();
            expected.sort();
            for algorithm in SORTS {
                let (view, snapshots) =
                    run_blocking(algorithm, values.clone(), None, GraphModel::default());
                let view = array(&view);
                prop_assert_eq!(&view.values, &expected);
                prop_assert_eq!(view.resolved.len(), values.len());
                for snapshot in &snapshots {
                    let state = array(&snapshot.view);
                    prop_assert_eq!(state.values.len(), values.len());
                    prop_assert!(state.highlight.len() <= 2);
                }
                for pair in snapshots.windows(2) {
                    let (before, after) = (array(&pair[0].view), array(&pair[1].view));
                    prop_assert!(
                        before.resolved.is_subset(&after.resolved),
                        "{} dropped a resolved index at step {}",
                        algorithm,
                        pair[1].step
                    );
                }
            }
        }

        #[test]
        fn searches_find_a_drawn_target(
            values in prop::collection::vec(0i64..40, 1..24),
            pick in any::<prop::sample::Index>(),
        ) {
            let target = values[pick.index(values.len())];
            let (view, snapshots) = run_blocking(
                AlgorithmId::LinearSearch,
                values.clone(),
                Some(target),
                GraphModel::default(),
            );
            let found = array(&view).found.unwrap();
            prop_assert_eq!(values[found], target);
            prop_assert_eq!(first_found(&snapshots)?, Some(found));

            let mut sorted = values.clone();
            sorted.sort();
            let (view, snapshots) = run_blocking(
                AlgorithmId::BinarySearch,
                sorted.clone(),
                Some(target),
                GraphModel::default(),
            );
            let found = array(&view).found.unwrap();
            prop_assert_eq!(sorted[found], target);
            prop_assert_eq!(first_found(&snapshots)?, Some(found));
        }

        #[test]
        fn searches_never_report_an_absent_target(
            values in prop::collection::vec(0i64..40, 0..24),
        ) {
            let mut sorted = values.clone();
            sorted.sort();
            for (algorithm, input) in [
                (AlgorithmId::LinearSearch, values.clone()),
                (AlgorithmId::BinarySearch, sorted),
            ] {
                let (view, snapshots) =
                    run_blocking(algorithm, input, Some(99), GraphModel::default());
                prop_assert_eq!(array(&view).found, None);
                prop_assert_eq!(first_found(&snapshots)?, None);
            }
        }
    }
}
