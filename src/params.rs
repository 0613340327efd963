use crate::error::{Result, SetCoverError};
use tracing::debug;

/// Coverage at or below which the secret sets partition the elements.
const TIGHT_COVERAGE: f64 = 2.1;

/// Structural parameters splitting an instance into its secret and
/// camouflage parts.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub sets: usize,
    pub elements: usize,
    pub coverage: f64,
    /// Average number of elements per set.
    pub sub_size: f64,
    /// Times each element is covered by secret sets.
    pub secret_coverage: f64,
    /// Times each element is covered by camouflage sets.
    pub camo_coverage: f64,
    pub secret_width: usize,
    pub camo_width: usize,
    /// Irregularity allowed in camouflage element degrees.
    pub camo_regularity: f64,
    /// Irregularity allowed in set sizes, for both parts.
    pub size_regularity: f64,
}

impl Params {
    pub fn derive(k: usize, h: usize, coverage: f64) -> Result<Self> {
        if k == 0 {
            return Err(SetCoverError::invalid("number of sets must be positive"));
        }
        if h == 0 {
            return Err(SetCoverError::invalid("number of elements must be positive"));
        }
        if !coverage.is_finite() || coverage <= 0.0 {
            return Err(SetCoverError::invalid(format!(
                "coverage must be a positive number, got {}",
                coverage
            )));
        }

        let sub_size = coverage * h as f64 / k as f64;

        let secret_coverage = if coverage <= TIGHT_COVERAGE { 1.0 } else { 1.05 };
        let camo_coverage = coverage - secret_coverage;
        if camo_coverage < 0.0 {
            return Err(SetCoverError::invalid(format!(
                "coverage {} is below the {} needed by the secret cover",
                coverage, secret_coverage
            )));
        }

        let secret_width = (h as f64 * secret_coverage / sub_size).round() as usize;
        if secret_width < 1 || secret_width >= k {
            return Err(SetCoverError::invalid(format!(
                "secret cover would need {} of {} sets (k={}, h={}, coverage={})",
                secret_width, k, k, h, coverage
            )));
        }
        let camo_width = k - secret_width;

        let camo_regularity = 1f64.max(camo_coverage.log2());
        let size_regularity = 1f64.max(sub_size.log2());

        let params = Params {
            sets: k,
            elements: h,
            coverage,
            sub_size,
            secret_coverage,
            camo_coverage,
            secret_width,
            camo_width,
            camo_regularity,
            size_regularity,
        };
        debug!(?params, "derived parameters");
        Ok(params)
    }

    /// Average size of a secret set.
    pub fn secret_degree(&self) -> f64 {
        self.elements as f64 * self.secret_coverage / self.secret_width as f64
    }

    /// Average size of a camouflage set.
    pub fn camo_degree(&self) -> f64 {
        self.elements as f64 * self.camo_coverage / self.camo_width as f64
    }
}

#[test]
fn derive_test() {
    let p = Params::derive(50, 200, 5.0).unwrap();
    assert_eq!(p.sub_size, 20.0);
    assert_eq!(p.secret_coverage, 1.05);
    assert!((p.camo_coverage - 3.95).abs() < 1e-12);
    assert_eq!(p.secret_width, 11);
    assert_eq!(p.camo_width, 39);
    assert!((p.camo_regularity - 3.95f64.log2()).abs() < 1e-12);
    assert!((p.size_regularity - 20f64.log2()).abs() < 1e-12);
}

#[test]
fn tight_coverage_test() {
    let p = Params::derive(6, 18, 2.0).unwrap();
    assert_eq!(p.secret_coverage, 1.0);
    assert_eq!(p.camo_coverage, 1.0);
    assert_eq!(p.secret_width, 3);
    assert_eq!(p.camo_width, 3);
    assert_eq!(p.camo_regularity, 1.0);
    assert_eq!(p.secret_degree(), 6.0);
    assert_eq!(p.camo_degree(), 6.0);
}

#[test]
fn coverage_threshold_test() {
    let p = Params::derive(21, 63, 2.1).unwrap();
    assert_eq!(p.secret_coverage, 1.0);
    assert_eq!(p.secret_width, 10);
    assert_eq!(p.camo_width, 11);

    let p = Params::derive(21, 63, 2.1 + 1e-9).unwrap();
    assert_eq!(p.secret_coverage, 1.05);
    assert_eq!(p.secret_width, 10);

    let p = Params::derive(22, 66, 2.2).unwrap();
    assert_eq!(p.secret_coverage, 1.05);
    assert!((1..22).contains(&p.secret_width));
}

#[test]
fn minimal_coverage_test() {
    let p = Params::derive(10, 40, 1.1).unwrap();
    assert_eq!(p.secret_coverage, 1.0);
    assert!(p.camo_coverage < 0.11);
    assert_eq!(p.secret_width, 9);
    assert_eq!(p.camo_width, 1);
    assert_eq!(p.camo_regularity, 1.0);
}

#[test]
fn invalid_params_test() {
    assert!(Params::derive(0, 10, 2.0).is_err());
    assert!(Params::derive(10, 0, 2.0).is_err());
    assert!(Params::derive(10, 10, 0.0).is_err());
    assert!(Params::derive(10, 10, f64::NAN).is_err());
    // every set would be secret
    assert!(Params::derive(10, 40, 1.0).is_err());
    assert!(Params::derive(10, 40, 0.5).is_err());
    // fewer than one secret set
    let err = Params::derive(10, 4, 50.0).unwrap_err();
    assert!(err.is_parameter_error());
}
