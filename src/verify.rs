use crate::bigraph::BiGraph;
use crate::error::CoverError;

/// Checks that `cover` is a set cover of `g` and returns its weight.
pub fn verify_cover(g: &BiGraph, weight: &[f64], cover: &[usize]) -> Result<f64, CoverError> {
    let mut chosen = vec![false; g.boundary()];
    let mut covered = vec![false; g.order()];
    let mut total = 0.0;

    for &s in cover {
        if !g.is_left(s) {
            return Err(CoverError::NotASet(s));
        }
        if chosen[s] {
            return Err(CoverError::DuplicateSet(s));
        }
        chosen[s] = true;
        total += weight[s];
        for e in g.neighbors(s) {
            covered[e] = true;
        }
    }

    match (g.boundary()..g.order()).find(|&e| !covered[e]) {
        Some(e) => Err(CoverError::Uncovered(e)),
        None => Ok(total),
    }
}

#[test]
fn verify_test() {
    let (g, weight) = crate::bounds::small_instance();

    assert_eq!(verify_cover(&g, &weight, &[0, 1, 2]), Ok(14.0));
    assert_eq!(verify_cover(&g, &weight, &[3, 1, 0]), Ok(18.0));
    assert_eq!(verify_cover(&g, &weight, &[0, 1]), Err(CoverError::Uncovered(10)));
    assert_eq!(verify_cover(&g, &weight, &[0, 1, 4]), Err(CoverError::NotASet(4)));
    assert_eq!(verify_cover(&g, &weight, &[0, 0]), Err(CoverError::DuplicateSet(0)));
}
