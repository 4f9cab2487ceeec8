//! Weighted crossing count between adjacent layers (Barth et al., "Bilayer Cross Counting").

use crate::model::LayoutGraph;
use rustc_hash::FxHashMap as HashMap;

pub fn cross_count(g: &LayoutGraph, layering: &[Vec<String>]) -> f64 {
    layering
        .windows(2)
        .map(|pair| two_layer_cross_count(g, &pair[0], &pair[1]))
        .sum()
}

fn two_layer_cross_count(g: &LayoutGraph, north: &[String], south: &[String]) -> f64 {
    if south.is_empty() {
        return 0.0;
    }
    let south_pos: HashMap<&str, usize> = south
        .iter()
        .enumerate()
        .map(|(i, v)| (v.as_str(), i))
        .collect();

    // Edges sorted by north position, then south position.
    let mut entries: Vec<(usize, f64)> = Vec::new();
    for v in north {
        let start = entries.len();
        for e in g.out_edges(v, None) {
            let Some(&pos) = south_pos.get(e.w.as_str()) else {
                continue;
            };
            entries.push((pos, g.edge_by_key(&e).map_or(0.0, |l| l.weight)));
        }
        entries[start..].sort_by_key(|(pos, _)| *pos);
    }

    // Accumulator tree over south positions.
    let mut first_index = 1;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let mut tree = vec![0.0; 2 * first_index - 1];
    first_index -= 1;

    let mut cc = 0.0;
    for (pos, weight) in entries {
        let mut index = pos + first_index;
        tree[index] += weight;
        let mut weight_sum = 0.0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += weight;
        }
        cc += weight * weight_sum;
    }
    cc
}
