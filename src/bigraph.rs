use petgraph as px;
use px::graph::{NodeIndex, UnGraph};
use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

/// One side of the bipartition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Bipartite graph whose left vertices (sets) are numbered `0..left.len()`
/// and whose right vertices (elements) follow directly after them.
#[derive(Clone, Debug)]
pub struct BiGraph {
    pub graph: UnGraph<(), ()>,
    pub left: Vec<NodeIndex>,
    pub right: Vec<NodeIndex>,
}

impl BiGraph {
    pub fn new(left: usize, right: usize) -> Self {
        let mut graph: UnGraph<(), ()> = UnGraph::with_capacity(left + right, 0);
        let nodes = (0..left + right)
            .map(|_| graph.add_node(()))
            .collect::<Vec<_>>();
        let (left, right) = nodes.split_at(left);

        BiGraph {
            graph,
            left: left.to_vec(),
            right: right.to_vec(),
        }
    }

    /// Builds a graph from `(set, element)` pairs, inserted in sorted order.
    pub fn from_edges(left: usize, right: usize, edges: &[(usize, usize)]) -> Self {
        let mut g = BiGraph::new(left, right);
        let mut edges = edges.to_vec();
        edges.sort_unstable();
        for (s, e) in edges {
            g.join(s, e);
        }
        g
    }

    /// Random bigraph where every (set, element) pair is joined with
    /// probability `avg_degree / right`, so sets have `avg_degree`
    /// elements on average.
    ///
    /// Only set/element pairs are sampled, and the gaps between joined
    /// pairs are drawn geometrically, so the work is linear in the number
    /// of edges produced.
    pub fn random<R: Rng>(rng: &mut R, left: usize, avg_degree: f64, right: usize) -> Self {
        let mut g = BiGraph::new(left, right);
        let total = left * right;
        let p = if right == 0 {
            0.0
        } else {
            (avg_degree / right as f64).clamp(0.0, 1.0)
        };

        if total == 0 || p <= 0.0 {
            return g;
        }
        if p >= 1.0 {
            for s in 0..left {
                for e in left..left + right {
                    g.join(s, e);
                }
            }
            return g;
        }

        let lp = (1.0 - p).ln();
        let mut next = 0;
        while next < total {
            let r = rng.gen::<f64>();
            let skip = ((1.0 - r).ln() / lp).floor();
            if skip >= (total - next) as f64 {
                break;
            }
            next += skip as usize;
            g.join(next / right, left + next % right);
            next += 1;
        }
        g
    }

    /// Index of the first element vertex; also the number of sets.
    pub fn boundary(&self) -> usize {
        self.left.len()
    }

    pub fn order(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_left(&self, v: usize) -> bool {
        v < self.boundary()
    }

    pub fn vertices(&self, side: Side) -> &[NodeIndex] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn join(&mut self, set: usize, element: usize) {
        debug_assert!(self.is_left(set) && !self.is_left(element) && element < self.order());
        self.graph
            .add_edge(NodeIndex::new(set), NodeIndex::new(element), ());
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.graph
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .is_some()
    }

    pub fn degree(&self, v: usize) -> usize {
        self.graph.neighbors(NodeIndex::new(v)).count()
    }

    /// Neighbours of `v` in ascending order.
    pub fn neighbors(&self, v: usize) -> Vec<usize> {
        let mut out = self
            .graph
            .neighbors(NodeIndex::new(v))
            .map(|n| n.index())
            .collect::<Vec<_>>();
        out.sort_unstable();
        out
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All edges as `(set, element)` pairs in edge-index order.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| {
                let (a, b) = (a.index(), b.index());
                (a.min(b), a.max(b))
            })
            .collect()
    }

    /// Rebuilds edge storage so edge indices follow `(set, element)` order.
    pub fn sort_adjacency(&mut self) {
        let edges = self.edges();
        *self = BiGraph::from_edges(self.left.len(), self.right.len(), &edges);
    }

    /// Randomly relabels the left vertices. Right vertices are fixed points.
    /// Returns the relabelled graph and `vp` with `vp[old] = new`.
    pub fn scramble<R: Rng>(&self, rng: &mut R) -> (BiGraph, Vec<usize>) {
        let mut vp = (0..self.boundary()).collect::<Vec<_>>();
        vp.shuffle(rng);

        let edges = self
            .edges()
            .into_iter()
            .map(|(s, e)| (vp[s], e))
            .collect::<Vec<_>>();

        (
            BiGraph::from_edges(self.left.len(), self.right.len(), &edges),
            vp,
        )
    }

    /// Pushes the degree of every vertex on `side` into
    /// `[floor(target / irregularity), ceil(target * irregularity)]`.
    ///
    /// Edges are moved between vertices of `side`, which leaves the degree
    /// of the far endpoint unchanged. A vertex short of the lower limit that
    /// finds no donor gets a new edge to a random far vertex. A vertex over
    /// the upper limit that finds no receiver drops an edge, but only one
    /// whose far endpoint keeps another edge: a far vertex that was covered
    /// stays covered.
    pub fn regularize<R: Rng>(&mut self, rng: &mut R, side: Side, target: f64, irregularity: f64) {
        let irregularity = irregularity.max(1.0);
        let lo = (target / irregularity).floor().max(0.0) as usize;
        let hi = ((target * irregularity).ceil().max(0.0) as usize).max(lo);

        let near = self.vertices(side).to_vec();
        let far = match side {
            Side::Left => self.right.clone(),
            Side::Right => self.left.clone(),
        };
        let mut deg = DegreeIndex::new(&self.graph, &near);

        let mut moved = 0;
        let mut added = 0;
        let mut removed = 0;

        for &v in &near {
            while deg.get(v) < lo {
                if let Some((u, x)) = self.donor(rng, &deg, v, lo) {
                    self.move_edge(u, v, x);
                    deg.dec(u);
                    deg.inc(v);
                    moved += 1;
                    continue;
                }

                match self.free_neighbor(rng, v, deg.get(v), &far) {
                    Some(x) => {
                        self.graph.add_edge(v, x, ());
                        deg.inc(v);
                        deg.inc(x);
                        added += 1;
                    }
                    None => break,
                }
            }
        }

        for &u in &near {
            while deg.get(u) > hi {
                match self.receiver(rng, &deg, u, hi) {
                    Some((v, x)) => {
                        self.move_edge(u, v, x);
                        deg.dec(u);
                        deg.inc(v);
                        moved += 1;
                    }
                    None => {
                        let x = self
                            .graph
                            .neighbors(u)
                            .filter(|&x| deg.get(x) > 1)
                            .max_by_key(|&x| (deg.get(x), x.index()));
                        let Some(x) = x else { break };
                        if let Some(e) = self.graph.find_edge(u, x) {
                            self.graph.remove_edge(e);
                        }
                        deg.dec(u);
                        deg.dec(x);
                        removed += 1;
                    }
                }
            }
        }

        debug!(
            ?side,
            target_degree = target,
            irregularity,
            lo,
            hi,
            moved,
            added,
            removed,
            "regularized"
        );
    }

    /// Highest-degree vertex above `floor` that owns an edge `v` could take.
    fn donor<R: Rng>(
        &self,
        rng: &mut R,
        deg: &DegreeIndex,
        v: NodeIndex,
        floor: usize,
    ) -> Option<(NodeIndex, NodeIndex)> {
        deg.rank
            .iter()
            .rev()
            .take_while(|&&(d, _)| d > floor)
            .filter(|&&(_, u)| u != v)
            .find_map(|&(_, u)| {
                self.graph
                    .neighbors(u)
                    .filter(|&x| self.graph.find_edge(v, x).is_none())
                    .choose(rng)
                    .map(|x| (u, x))
            })
    }

    /// Lowest-degree vertex below `ceiling` that can take one of `u`'s edges.
    fn receiver<R: Rng>(
        &self,
        rng: &mut R,
        deg: &DegreeIndex,
        u: NodeIndex,
        ceiling: usize,
    ) -> Option<(NodeIndex, NodeIndex)> {
        deg.rank
            .iter()
            .take_while(|&&(d, _)| d < ceiling)
            .filter(|&&(_, v)| v != u)
            .find_map(|&(_, v)| {
                self.graph
                    .neighbors(u)
                    .filter(|&x| self.graph.find_edge(v, x).is_none())
                    .choose(rng)
                    .map(|x| (v, x))
            })
    }

    /// Random far vertex not yet adjacent to `v`. Guesses while most far
    /// vertices are free, scans otherwise.
    fn free_neighbor<R: Rng>(
        &self,
        rng: &mut R,
        v: NodeIndex,
        degree: usize,
        far: &[NodeIndex],
    ) -> Option<NodeIndex> {
        if degree * 2 < far.len() {
            loop {
                let &x = far.choose(rng)?;
                if self.graph.find_edge(v, x).is_none() {
                    return Some(x);
                }
            }
        }
        far.iter()
            .copied()
            .filter(|&x| self.graph.find_edge(v, x).is_none())
            .choose(rng)
    }

    fn move_edge(&mut self, from: NodeIndex, to: NodeIndex, x: NodeIndex) {
        if let Some(e) = self.graph.find_edge(from, x) {
            self.graph.remove_edge(e);
            self.graph.add_edge(to, x, ());
        }
    }
}

/// Degree of every vertex, with the regularized side also kept ordered
/// by `(degree, vertex)` so donors and receivers are found without a scan.
struct DegreeIndex {
    deg: Vec<usize>,
    rank: BTreeSet<(usize, NodeIndex)>,
}

impl DegreeIndex {
    fn new(graph: &UnGraph<(), ()>, near: &[NodeIndex]) -> Self {
        let deg = graph
            .node_indices()
            .map(|v| graph.neighbors(v).count())
            .collect::<Vec<_>>();
        let rank = near.iter().map(|&v| (deg[v.index()], v)).collect();
        DegreeIndex { deg, rank }
    }

    fn get(&self, v: NodeIndex) -> usize {
        self.deg[v.index()]
    }

    fn set(&mut self, v: NodeIndex, d: usize) {
        if self.rank.remove(&(self.deg[v.index()], v)) {
            self.rank.insert((d, v));
        }
        self.deg[v.index()] = d;
    }

    fn inc(&mut self, v: NodeIndex) {
        self.set(v, self.get(v) + 1);
    }

    fn dec(&mut self, v: NodeIndex) {
        self.set(v, self.get(v) - 1);
    }
}

#[cfg(test)]
fn degrees(g: &BiGraph, side: Side) -> Vec<usize> {
    g.vertices(side).iter().map(|v| g.degree(v.index())).collect()
}

#[test]
fn random_bigraph_test() {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);

    let g = BiGraph::random(&mut rng, 10, 4.0, 40);
    assert_eq!(g.boundary(), 10);
    assert_eq!(g.order(), 50);
    for (s, e) in g.edges() {
        assert!(g.is_left(s));
        assert!(!g.is_left(e));
        assert!(g.has_edge(e, s));
    }
    assert!(g.edge_count() > 0);
}

#[test]
fn random_bigraph_density_test() {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(13);

    assert_eq!(BiGraph::random(&mut rng, 5, 0.0, 20).edge_count(), 0);
    assert_eq!(BiGraph::random(&mut rng, 5, 20.0, 20).edge_count(), 100);
    assert_eq!(BiGraph::random(&mut rng, 0, 3.0, 20).edge_count(), 0);

    let g = BiGraph::random(&mut rng, 200, 10.0, 1000);
    let edges = g.edges();
    assert!((1800..2200).contains(&edges.len()));

    let mut unique = edges.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), edges.len());
}

#[test]
fn regularize_covers_side_test() {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(11);

    for _ in 0..20 {
        let mut g = BiGraph::random(&mut rng, 8, 3.0, 30);
        g.regularize(&mut rng, Side::Right, 1.0, 1.0);
        assert!(degrees(&g, Side::Right).iter().all(|&d| d >= 1));

        g.regularize(&mut rng, Side::Left, 30.0 / 8.0, 2.0);
        assert!(degrees(&g, Side::Right).iter().all(|&d| d >= 1));
        assert!(degrees(&g, Side::Left).iter().all(|&d| (1..=8).contains(&d)));
    }
}

#[test]
fn regularize_adds_edges_when_sparse_test() {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);

    let mut g = BiGraph::new(4, 12);
    g.regularize(&mut rng, Side::Right, 1.05, 1.0);
    assert_eq!(g.edge_count(), 12);
    assert!(degrees(&g, Side::Right).iter().all(|&d| d == 1));
}

#[test]
fn scramble_test() {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(5);

    let g = BiGraph::random(&mut rng, 12, 5.0, 30);
    let (s, vp) = g.scramble(&mut rng);

    let mut sorted = vp.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..12).collect::<Vec<_>>());

    assert_eq!(degrees(&s, Side::Right), degrees(&g, Side::Right));
    for old in 0..12 {
        assert_eq!(s.neighbors(vp[old]), g.neighbors(old));
    }

    let edges = s.edges();
    let mut canonical = edges.clone();
    canonical.sort_unstable();
    assert_eq!(edges, canonical);
}
