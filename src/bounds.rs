//! Lower bounds on the weight of a minimum set cover.
//!
//! Each bound only reads the graph and the weights, so any instance can be
//! bounded, not just generated ones. Sets without elements are ignored and
//! elements that no set covers contribute nothing.

use crate::bigraph::BiGraph;
use ordered_float::OrderedFloat;

/// Weight per element of every set, `None` for empty sets.
fn unit_costs(g: &BiGraph, weight: &[f64]) -> Vec<Option<f64>> {
    (0..g.boundary())
        .map(|s| match g.degree(s) {
            0 => None,
            d => Some(weight[s] / d as f64),
        })
        .collect()
}

/// Cheapest way to pay for `h` element slots when sets can be bought
/// fractionally: any cover owns at least `h` slots, and set `s` sells its
/// slots at `weight[s] / |s|` each.
pub fn size_bound(g: &BiGraph, weight: &[f64]) -> f64 {
    let mut sets = unit_costs(g, weight)
        .into_iter()
        .enumerate()
        .filter_map(|(s, c)| c.map(|c| (OrderedFloat(c), g.degree(s))))
        .collect::<Vec<_>>();
    sets.sort_unstable();

    let mut needed = g.right.len();
    let mut bound = 0.0;
    for (cost, size) in sets {
        if needed == 0 {
            break;
        }
        let take = size.min(needed);
        bound += cost.0 * take as f64;
        needed -= take;
    }
    bound
}

/// Every set splits its weight evenly over its elements; every element then
/// pays the smallest share offered by the sets containing it.
pub fn split_bound(g: &BiGraph, weight: &[f64]) -> f64 {
    let costs = unit_costs(g, weight);
    g.right
        .iter()
        .filter_map(|e| {
            g.neighbors(e.index())
                .into_iter()
                .filter_map(|s| costs[s].map(OrderedFloat))
                .min()
        })
        .map(|c| c.0)
        .sum()
}

/// Greedy dual labelling. Elements, in ascending order of degree, take the
/// smallest residual weight among their sets as label, and that label is
/// charged to every one of those sets. No set is charged more than its
/// weight, so the label total is a feasible dual solution.
pub fn label_bound(g: &BiGraph, weight: &[f64]) -> f64 {
    let mut residual = weight.to_vec();
    let mut elements = g.right.iter().map(|e| e.index()).collect::<Vec<_>>();
    elements.sort_by_key(|&e| (g.degree(e), e));

    let mut bound = 0.0;
    for e in elements {
        let sets = g.neighbors(e);
        let Some(label) = sets.iter().map(|&s| OrderedFloat(residual[s])).min() else {
            continue;
        };
        for &s in &sets {
            residual[s] = (residual[s] - label.0).max(0.0);
        }
        bound += label.0;
    }
    bound
}

pub fn lower_bounds(g: &BiGraph, weight: &[f64]) -> [f64; 3] {
    [
        size_bound(g, weight),
        split_bound(g, weight),
        label_bound(g, weight),
    ]
}

/// Four sets over twelve elements, weights `[3, 7, 4, 8]`; the optimum is
/// sets 0, 1 and 2 with weight 14.
#[cfg(test)]
pub(crate) fn small_instance() -> (BiGraph, Vec<f64>) {
    let sets: [[usize; 5]; 4] = [
        [4, 7, 9, 12, 15],
        [5, 6, 8, 13, 14],
        [6, 10, 11, 12, 15],
        [5, 7, 10, 11, 14],
    ];
    let edges = sets
        .iter()
        .enumerate()
        .flat_map(|(s, es)| es.iter().map(move |&e| (s, e)))
        .collect::<Vec<_>>();
    (BiGraph::from_edges(4, 12, &edges), vec![3.0, 7.0, 4.0, 8.0])
}

#[test]
fn small_instance_bounds_test() {
    let (g, weight) = small_instance();
    assert!((size_bound(&g, &weight) - 9.8).abs() < 1e-9);
    assert!((split_bound(&g, &weight) - 11.0).abs() < 1e-9);
    assert_eq!(label_bound(&g, &weight), 14.0);

    for b in lower_bounds(&g, &weight) {
        assert!(b <= 14.0 + 1e-9);
    }
}

#[test]
fn empty_sets_are_ignored_test() {
    let g = BiGraph::from_edges(3, 2, &[(0, 3), (0, 4)]);
    let weight = vec![2.0, 0.5, 0.1];
    assert_eq!(size_bound(&g, &weight), 2.0);
    assert_eq!(split_bound(&g, &weight), 2.0);
    assert_eq!(label_bound(&g, &weight), 2.0);
}

#[test]
fn uncovered_elements_add_nothing_test() {
    let g = BiGraph::from_edges(1, 3, &[(0, 1)]);
    assert_eq!(split_bound(&g, &[5.0]), 5.0);
    assert_eq!(label_bound(&g, &[5.0]), 5.0);
}
