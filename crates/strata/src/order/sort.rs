use super::resolve_conflicts::SortEntry;
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortResult {
    pub vs: Vec<String>,
    pub barycenter: Option<f64>,
    pub weight: f64,
}

/// Orders entries by barycenter, keeping entries without one (and without a pinned
/// `fixorder`) at their original index.
///
/// Pinned entries keep the slots the barycenter sort gives them as a group but are laid out
/// across those slots by ascending `fixorder`. Ties fall back to the previous `order` when
/// `use_prev` is set, then to the original index, reversed when `bias_right` is set.
pub fn sort(entries: Vec<SortEntry>, bias_right: bool, use_prev: bool) -> SortResult {
    let (mut sortable, mut unsortable): (Vec<SortEntry>, Vec<SortEntry>) = entries
        .into_iter()
        .partition(|e| e.fixorder.is_some() || e.barycenter.is_some());
    unsortable.sort_by(|a, b| b.i.cmp(&a.i));
    insertion_sort(&mut sortable, bias_right, use_prev);
    place_pinned(&mut sortable);

    let mut vs = Vec::new();
    let mut sum = 0.0;
    let mut weight = 0.0;
    let mut index = consume_unsortable(&mut vs, &mut unsortable, 0);

    for entry in sortable {
        index += entry.vs.len();
        if let Some(b) = entry.barycenter {
            sum += b * entry.weight;
            weight += entry.weight;
        }
        vs.extend(entry.vs);
        index = consume_unsortable(&mut vs, &mut unsortable, index);
    }

    SortResult {
        vs,
        barycenter: (weight != 0.0).then(|| sum / weight),
        weight,
    }
}

fn consume_unsortable(vs: &mut Vec<String>, unsortable: &mut Vec<SortEntry>, mut index: usize) -> usize {
    while unsortable.last().is_some_and(|last| last.i <= index) {
        if let Some(last) = unsortable.pop() {
            vs.extend(last.vs);
            index += 1;
        }
    }
    index
}

/// Stable in-place sort that tolerates `compare` not being a total order, which `sort_by`
/// is allowed to reject.
fn insertion_sort(entries: &mut [SortEntry], bias_right: bool, use_prev: bool) {
    for i in 1..entries.len() {
        let mut j = i;
        while j > 0
            && compare(&entries[j - 1], &entries[j], bias_right, use_prev) == Ordering::Greater
        {
            entries.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// A pinned entry without a barycenter has nothing to compare on that axis, so it ties with
/// everything and falls through to the previous order and then the index.
fn compare(a: &SortEntry, b: &SortEntry, bias_right: bool, use_prev: bool) -> Ordering {
    let by_barycenter = match (a.barycenter, b.barycenter) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => Ordering::Equal,
    };
    let by_prev = match (a.order, b.order) {
        (Some(x), Some(y)) if use_prev => x.cmp(&y),
        _ => Ordering::Equal,
    };
    let by_index = if bias_right { b.i.cmp(&a.i) } else { a.i.cmp(&b.i) };
    by_barycenter.then(by_prev).then(by_index)
}

/// Rearranges pinned entries among the positions they occupy so they read in `fixorder`.
fn place_pinned(sorted: &mut [SortEntry]) {
    let slots: Vec<usize> = (0..sorted.len())
        .filter(|&i| sorted[i].fixorder.is_some())
        .collect();
    let mut pinned: Vec<SortEntry> = slots.iter().map(|&i| std::mem::take(&mut sorted[i])).collect();
    pinned.sort_by_key(|e| e.fixorder);
    for (slot, entry) in slots.into_iter().zip(pinned) {
        sorted[slot] = entry;
    }
}
