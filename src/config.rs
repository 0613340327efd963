use crate::error::Result;
use crate::generate::{generate, SetCoverInstance};
use crate::weights::{WeightSpec, Weights};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Everything needed to reproduce an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub sets: usize,
    pub elements: usize,
    pub coverage: f64,
    #[serde(default)]
    pub weight: WeightSpec,
    /// Seed for the generator; drawn from the OS when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    pub fn new(sets: usize, elements: usize, coverage: f64) -> Self {
        GeneratorConfig {
            sets,
            elements,
            coverage,
            weight: WeightSpec::Unit,
            seed: None,
        }
    }

    pub fn weight(mut self, weight: WeightSpec) -> Self {
        self.weight = weight;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn generate(&self) -> Result<SetCoverInstance> {
        let mut source = Weights::try_from(self.weight)?;
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        generate(&mut rng, self.sets, self.elements, self.coverage, &mut source)
    }
}

#[test]
fn config_test() {
    let config: GeneratorConfig =
        serde_json::from_str(r#"{"sets":6,"elements":18,"coverage":2.0,"seed":4}"#).unwrap();
    assert_eq!(config, GeneratorConfig::new(6, 18, 2.0).seed(4));

    let a = config.generate().unwrap();
    let b = config.generate().unwrap();
    assert_eq!(a.record(), b.record());
    assert!(a.weight.iter().all(|&w| w == 1.0));
    assert_eq!(a.upper_bound, 3.0);
}

#[test]
fn bad_weight_spec_test() {
    let config = GeneratorConfig::new(6, 18, 2.0).weight(WeightSpec::Integer { lo: 9, hi: 1 });
    assert!(config.generate().unwrap_err().is_parameter_error());
}
