use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use set_cover_random::generate::{build_camo, build_secret, compose, scramble};
use set_cover_random::{generate, verify_cover, Params, RandomInteger, SetCoverError, UnitWeight};

const CASES: [(usize, usize, f64); 6] = [
    (6, 18, 2.0),
    (10, 40, 1.1),
    (20, 60, 1.5),
    (30, 90, 3.0),
    (50, 200, 5.0),
    (100, 2000, 5.0),
];

fn sorted_degrees(g: &set_cover_random::BiGraph, vs: std::ops::Range<usize>) -> Vec<usize> {
    let mut d = vs.map(|v| g.degree(v)).collect::<Vec<_>>();
    d.sort_unstable();
    d
}

#[test]
fn planted_cover_is_valid_test() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    for &(k, h, coverage) in &CASES {
        let params = Params::derive(k, h, coverage).unwrap();
        let mut source = RandomInteger::new(2, 15).unwrap();
        let inst = generate(&mut rng, k, h, coverage, &mut source).unwrap();

        assert_eq!(inst.graph.boundary(), k);
        assert_eq!(inst.graph.order(), k + h);
        assert_eq!(inst.weight.len(), k);
        assert!(inst.weight.iter().all(|&w| (2.0..=15.0).contains(&w)));
        assert!((k..k + h).all(|e| inst.graph.degree(e) >= 1));

        assert_eq!(inst.secret.len(), params.secret_width);
        assert_eq!(verify_cover(&inst.graph, &inst.weight, &inst.secret), Ok(inst.upper_bound));

        for b in inst.lower_bounds {
            assert!(b >= 0.0);
            assert!(b <= inst.upper_bound + 1e-9, "{:?} > {}", inst.lower_bounds, inst.upper_bound);
        }
    }
}

#[test]
fn unit_weights_test() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let inst = generate(&mut rng, 50, 200, 5.0, &mut UnitWeight).unwrap();
    assert_eq!(inst.upper_bound, inst.secret.len() as f64);
    assert!(inst.lower_bounds.iter().all(|&b| b <= inst.upper_bound + 1e-9));
}

#[test]
fn fixed_weights_test() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let fixed = [3.0, 7.0, 4.0, 8.0];

    for _ in 0..20 {
        let mut i = 0;
        let mut source = || {
            i += 1;
            fixed[i - 1]
        };
        let inst = generate(&mut rng, 4, 12, 3.0, &mut source).unwrap();

        assert_eq!(inst.graph.boundary(), 4);
        assert!((4..16).all(|e| inst.graph.degree(e) >= 1));

        let mut weight = inst.weight.clone();
        weight.sort_by(f64::total_cmp);
        assert_eq!(weight, vec![3.0, 4.0, 7.0, 8.0]);

        let planted = inst.secret.iter().map(|&s| inst.weight[s]).sum::<f64>();
        assert_eq!(inst.upper_bound, planted);
        assert!(fixed.contains(&inst.upper_bound));
    }
}

#[test]
fn deterministic_test() {
    for &(k, h, coverage) in &CASES[..5] {
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut source = RandomInteger::new(5, 99).unwrap();
            generate(&mut rng, k, h, coverage, &mut source).unwrap()
        };
        let (a, b) = (run(11), run(11));
        assert_eq!(a.record(), b.record());
        assert_eq!(a.secret, b.secret);
    }
}

#[test]
fn scrambling_preserves_structure_test() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for &(k, h, coverage) in &CASES[..5] {
        let params = Params::derive(k, h, coverage).unwrap();
        let secret = build_secret(&mut rng, &params).unwrap();
        let camo = build_camo(&mut rng, &params);
        let g = compose(&params, &secret, &camo);
        assert!((k..k + h).all(|e| g.degree(e) >= 1));

        let weight = (0..k).map(|s| s as f64).collect::<Vec<_>>();
        let (s, w, vp) = scramble(&mut rng, &g, &weight);

        assert_eq!(s.edge_count(), g.edge_count());
        assert_eq!(sorted_degrees(&s, 0..k), sorted_degrees(&g, 0..k));
        for e in k..k + h {
            assert_eq!(s.degree(e), g.degree(e));
        }
        for old in 0..k {
            assert_eq!(w[vp[old]], weight[old]);
        }

        let planted = vp[..params.secret_width].to_vec();
        assert!(verify_cover(&s, &w, &planted).is_ok());
    }
}

#[test]
fn minimal_coverage_test() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let params = Params::derive(10, 40, 1.1).unwrap();
    assert_eq!(params.secret_coverage, 1.0);
    assert_eq!(params.camo_width, 10 - params.secret_width);

    let inst = generate(&mut rng, 10, 40, 1.1, &mut UnitWeight).unwrap();
    assert!(verify_cover(&inst.graph, &inst.weight, &inst.secret).is_ok());
}

#[test]
fn invalid_parameters_test() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    for (k, h, coverage) in [(0, 10, 2.0), (10, 0, 2.0), (10, 10, -1.0), (10, 40, 1.0)] {
        let err = generate(&mut rng, k, h, coverage, &mut UnitWeight).unwrap_err();
        assert!(matches!(err, SetCoverError::InvalidParameters(_)));
    }
}

#[test]
fn large_universe_test() {
    use std::time::{Duration, Instant};
    let mut rng = ChaCha8Rng::seed_from_u64(31);

    let start = Instant::now();
    let mut source = RandomInteger::new(10, 999).unwrap();
    let inst = generate(&mut rng, 400, 20_000, 3.0, &mut source).unwrap();
    let elapsed = start.elapsed();

    assert!((400..20_400).all(|e| inst.graph.degree(e) >= 1));
    assert_eq!(verify_cover(&inst.graph, &inst.weight, &inst.secret), Ok(inst.upper_bound));
    // edges stay proportional to the requested coverage
    assert!(inst.graph.edge_count() < 4 * 20_000);
    assert!(elapsed < Duration::from_secs(60), "took {:?}", elapsed);
}
