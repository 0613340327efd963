use crate::bigraph::{BiGraph, Side};
use crate::bounds;
use crate::error::{Result, SetCoverError};
use crate::params::Params;
use crate::weights::{self, WeightSource};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A weighted set cover instance with a planted cover.
#[derive(Debug, Clone)]
pub struct SetCoverInstance {
    /// Sets are vertices `0..k`, elements `k..k+h`.
    pub graph: BiGraph,
    /// Weight of every set, indexed by set vertex.
    pub weight: Vec<f64>,
    /// Size, split and label bounds, in that order.
    pub lower_bounds: [f64; 3],
    /// Weight of the planted cover.
    pub upper_bound: f64,
    /// Sets of the planted cover, ascending.
    pub secret: Vec<usize>,
}

/// On-disk form of an instance. The planted cover is left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub sets: usize,
    pub elements: usize,
    pub edges: Vec<(usize, usize)>,
    pub weight: Vec<f64>,
    pub lower_bounds: [f64; 3],
    pub upper_bound: f64,
}

impl SetCoverInstance {
    pub fn record(&self) -> InstanceRecord {
        InstanceRecord {
            sets: self.graph.boundary(),
            elements: self.graph.right.len(),
            edges: self.graph.edges(),
            weight: self.weight.clone(),
            lower_bounds: self.lower_bounds,
            upper_bound: self.upper_bound,
        }
    }
}

/// Generates a random instance with `k` sets over `h` elements in which
/// every element lies in `coverage` sets on average.
pub fn generate<R: Rng, W: WeightSource>(
    rng: &mut R,
    k: usize,
    h: usize,
    coverage: f64,
    source: &mut W,
) -> Result<SetCoverInstance> {
    let params = Params::derive(k, h, coverage)?;
    // weights come first so a bad source fails before any construction
    let drawn = weights::draw(rng, source, k)?;

    let secret = build_secret(rng, &params)?;
    let camo = build_camo(rng, &params);
    let combined = compose(&params, &secret, &camo);
    debug!(
        secret_edges = secret.edge_count(),
        camo_edges = camo.edge_count(),
        "composed subgraphs"
    );

    let assignment = weights::assign(rng, drawn, params.secret_width, params.camo_width, coverage);

    let (graph, weight, vp) = scramble(rng, &combined, &assignment.weight);
    let mut secret = vp[..params.secret_width].to_vec();
    secret.sort_unstable();

    let lower_bounds = bounds::lower_bounds(&graph, &weight);
    info!(
        k,
        h,
        coverage,
        edges = graph.edge_count(),
        ?lower_bounds,
        upper_bound = assignment.upper_bound,
        "generated set cover instance"
    );

    Ok(SetCoverInstance {
        graph,
        weight,
        lower_bounds,
        upper_bound: assignment.upper_bound,
        secret,
    })
}

/// Secret subgraph: every element lands in about `secret_coverage` of the
/// `secret_width` sets, and at least one of them.
pub fn build_secret<R: Rng>(rng: &mut R, params: &Params) -> Result<BiGraph> {
    let mut g = BiGraph::random(rng, params.secret_width, params.secret_degree(), params.elements);
    g.regularize(rng, Side::Right, params.secret_coverage, 1.0);
    g.regularize(rng, Side::Left, params.secret_degree(), params.size_regularity);
    check_secret(&g)?;
    Ok(g)
}

pub fn build_camo<R: Rng>(rng: &mut R, params: &Params) -> BiGraph {
    let mut g = BiGraph::random(rng, params.camo_width, params.camo_degree(), params.elements);
    g.regularize(rng, Side::Right, params.camo_coverage, params.camo_regularity);
    g.regularize(rng, Side::Left, params.camo_degree(), params.size_regularity);
    g
}

/// Fails when some element is in no secret set.
pub fn check_secret(secret: &BiGraph) -> Result<()> {
    match secret.right.iter().find(|e| secret.degree(e.index()) == 0) {
        Some(e) => Err(SetCoverError::CollaboratorContractViolation(format!(
            "element {} is not in any secret set",
            e.index() - secret.boundary()
        ))),
        None => Ok(()),
    }
}

/// Merges the subgraphs: secret sets become `0..secret_width`, camouflage
/// sets follow, and both share the element range `k..k+h`.
pub fn compose(params: &Params, secret: &BiGraph, camo: &BiGraph) -> BiGraph {
    let k = params.sets;
    let sw = params.secret_width;
    let cw = params.camo_width;

    let mut g = BiGraph::new(k, params.elements);
    for (s, e) in secret.edges() {
        g.join(s, e + (k - sw));
    }
    for (s, e) in camo.edges() {
        g.join(s + sw, e + sw);
    }
    debug_assert_eq!(cw + sw, k);
    g
}

/// Relabels the sets at random and carries the weights along. Returns the
/// new graph, the new weights and `vp` with `vp[old] = new`.
pub fn scramble<R: Rng>(rng: &mut R, g: &BiGraph, weight: &[f64]) -> (BiGraph, Vec<f64>, Vec<usize>) {
    let (mut graph, vp) = g.scramble(rng);
    graph.sort_adjacency();

    let mut scrambled = vec![0.0; weight.len()];
    for (old, &new) in vp.iter().enumerate() {
        scrambled[new] = weight[old];
    }
    (graph, scrambled, vp)
}

#[test]
fn compose_test() {
    let params = Params::derive(6, 18, 2.0).unwrap();
    let secret = BiGraph::from_edges(3, 18, &[(0, 3), (1, 20), (2, 11)]);
    let camo = BiGraph::from_edges(3, 18, &[(0, 3), (2, 20)]);

    let g = compose(&params, &secret, &camo);
    assert_eq!(g.boundary(), 6);
    assert_eq!(g.order(), 24);
    assert_eq!(
        g.edges(),
        vec![(0, 6), (1, 23), (2, 14), (3, 6), (5, 23)]
    );
}

#[test]
fn contract_violation_test() {
    let secret = BiGraph::from_edges(2, 3, &[(0, 2), (1, 3)]);
    let err = check_secret(&secret).unwrap_err();
    assert_eq!(
        err,
        SetCoverError::CollaboratorContractViolation("element 2 is not in any secret set".into())
    );
}

#[test]
fn scramble_carries_weights_test() {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(9);

    let (g, weight) = crate::bounds::small_instance();
    let (s, w, vp) = scramble(&mut rng, &g, &weight);
    for old in 0..4 {
        assert_eq!(w[vp[old]], weight[old]);
        assert_eq!(s.neighbors(vp[old]), g.neighbors(old));
    }
    for e in 4..16 {
        assert_eq!(s.degree(e), g.degree(e));
    }
}

#[test]
fn bad_weights_fail_before_construction_test() {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(4);

    let mut nan = || f64::NAN;
    let err = generate(&mut rng, 50, 200, 5.0, &mut nan).unwrap_err();
    assert!(err.is_parameter_error());
    assert_eq!(rng.get_word_pos(), 0);
}
