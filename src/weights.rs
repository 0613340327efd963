use crate::error::{Result, SetCoverError};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Source of random set weights.
pub trait WeightSource {
    fn sample<R: Rng>(&mut self, rng: &mut R) -> f64;
}

/// Closures act as deterministic stand-ins and ignore the generator.
impl<F: FnMut() -> f64> WeightSource for F {
    fn sample<R: Rng>(&mut self, _rng: &mut R) -> f64 {
        self()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UnitWeight;

impl WeightSource for UnitWeight {
    fn sample<R: Rng>(&mut self, _rng: &mut R) -> f64 {
        1.0
    }
}

/// Uniform integer weight in `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomInteger {
    lo: u64,
    hi: u64,
}

impl RandomInteger {
    pub fn new(lo: u64, hi: u64) -> Result<Self> {
        if lo > hi {
            return Err(SetCoverError::invalid(format!(
                "empty weight range [{}, {}]",
                lo, hi
            )));
        }
        Ok(RandomInteger { lo, hi })
    }
}

impl WeightSource for RandomInteger {
    fn sample<R: Rng>(&mut self, rng: &mut R) -> f64 {
        rng.gen_range(self.lo..=self.hi) as f64
    }
}

/// Uniform real weight in `[lo, hi)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformWeight {
    lo: f64,
    hi: f64,
}

impl UniformWeight {
    pub fn new(lo: f64, hi: f64) -> Result<Self> {
        if !(lo.is_finite() && hi.is_finite()) || lo < 0.0 || lo > hi {
            return Err(SetCoverError::invalid(format!(
                "bad weight range [{}, {})",
                lo, hi
            )));
        }
        Ok(UniformWeight { lo, hi })
    }
}

impl WeightSource for UniformWeight {
    fn sample<R: Rng>(&mut self, rng: &mut R) -> f64 {
        if self.lo == self.hi {
            self.lo
        } else {
            rng.gen_range(self.lo..self.hi)
        }
    }
}

/// Serializable description of a weight source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WeightSpec {
    #[default]
    Unit,
    Integer { lo: u64, hi: u64 },
    Uniform { lo: f64, hi: f64 },
}

/// A validated `WeightSpec`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Weights {
    Unit(UnitWeight),
    Integer(RandomInteger),
    Uniform(UniformWeight),
}

impl TryFrom<WeightSpec> for Weights {
    type Error = SetCoverError;

    fn try_from(spec: WeightSpec) -> Result<Self> {
        Ok(match spec {
            WeightSpec::Unit => Weights::Unit(UnitWeight),
            WeightSpec::Integer { lo, hi } => Weights::Integer(RandomInteger::new(lo, hi)?),
            WeightSpec::Uniform { lo, hi } => Weights::Uniform(UniformWeight::new(lo, hi)?),
        })
    }
}

impl WeightSource for Weights {
    fn sample<R: Rng>(&mut self, rng: &mut R) -> f64 {
        match self {
            Weights::Unit(w) => w.sample(rng),
            Weights::Integer(w) => w.sample(rng),
            Weights::Uniform(w) => w.sample(rng),
        }
    }
}

/// Draws `k` weights, rejecting negative or non-finite samples.
pub fn draw<R: Rng, W: WeightSource>(rng: &mut R, source: &mut W, k: usize) -> Result<Vec<f64>> {
    (0..k)
        .map(|_| {
            let w = source.sample(rng);
            if w.is_finite() && w >= 0.0 {
                Ok(w)
            } else {
                Err(SetCoverError::invalid(format!("weight source produced {}", w)))
            }
        })
        .collect()
}

/// Weights split between the secret sets (slots `0..secret_width`) and the
/// camouflage sets (the remaining slots).
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub weight: Vec<f64>,
    pub upper_bound: f64,
}

/// Scans the weights in ascending order, handing each to the secret pool
/// with probability `min(1, sqrt(coverage) * sr / (sr + tr))` while secret
/// slots remain. Cheap weights lean towards the secret cover without it
/// simply receiving the smallest ones.
pub fn assign<R: Rng>(
    rng: &mut R,
    mut weights: Vec<f64>,
    secret_width: usize,
    camo_width: usize,
    coverage: f64,
) -> Assignment {
    debug_assert_eq!(weights.len(), secret_width + camo_width);
    weights.sort_by(f64::total_cmp);

    let boost = coverage.sqrt();
    let mut weight = vec![0.0; weights.len()];
    let mut upper_bound = 0.0;
    let (mut s, mut sr) = (0, secret_width);
    let (mut t, mut tr) = (secret_width, camo_width);

    for w in weights {
        let secret = sr > 0
            && (tr == 0 || rng.gen::<f64>() < (boost * sr as f64 / (sr + tr) as f64).min(1.0));
        if secret {
            weight[s] = w;
            s += 1;
            sr -= 1;
            upper_bound += w;
        } else {
            weight[t] = w;
            t += 1;
            tr -= 1;
        }
    }
    debug_assert!(sr == 0 && tr == 0);

    Assignment {
        weight,
        upper_bound,
    }
}

#[test]
fn fixed_weights_test() {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);

    for _ in 0..100 {
        let a = assign(&mut rng, vec![3.0, 7.0, 4.0, 8.0], 2, 2, 3.0);
        assert_eq!(a.weight.len(), 4);
        assert_eq!(a.upper_bound, a.weight[0] + a.weight[1]);

        let mut all = a.weight.clone();
        all.sort_by(f64::total_cmp);
        assert_eq!(all, vec![3.0, 4.0, 7.0, 8.0]);
        // both pools are filled in ascending order
        assert!(a.weight[0] <= a.weight[1]);
        assert!(a.weight[2] <= a.weight[3]);
    }
}

#[test]
fn secret_pool_is_cheaper_test() {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(2);
    let mut source = RandomInteger::new(10, 999).unwrap();

    let (mut secret, mut camo) = (0.0, 0.0);
    for _ in 0..50 {
        let weights = draw(&mut rng, &mut source, 50).unwrap();
        let a = assign(&mut rng, weights, 11, 39, 5.0);
        secret += a.upper_bound / 11.0;
        camo += a.weight[11..].iter().sum::<f64>() / 39.0;
    }
    assert!(secret < camo);
}

#[test]
fn closure_source_test() {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);

    let fixed = [3.0, 7.0, 4.0, 8.0];
    let mut i = 0;
    let mut source = || {
        i += 1;
        fixed[i - 1]
    };
    assert_eq!(draw(&mut rng, &mut source, 4).unwrap(), fixed.to_vec());

    let mut negative = || -1.0;
    assert!(draw(&mut rng, &mut negative, 1).is_err());
}

#[test]
fn weight_spec_test() {
    assert!(Weights::try_from(WeightSpec::Integer { lo: 5, hi: 2 }).is_err());
    assert!(Weights::try_from(WeightSpec::Uniform { lo: -1.0, hi: 2.0 }).is_err());

    let spec: WeightSpec = serde_json::from_str(r#"{"kind":"integer","lo":2,"hi":15}"#).unwrap();
    assert_eq!(spec, WeightSpec::Integer { lo: 2, hi: 15 });
}
