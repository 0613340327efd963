//! Error types for instance generation and cover verification

use thiserror::Error;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, SetCoverError>;

/// Errors that abort the construction of an instance
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetCoverError {
    /// Caller supplied parameters that cannot produce a secret cover
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The subgraph builder broke its coverage guarantee
    #[error("Collaborator contract violation: {0}")]
    CollaboratorContractViolation(String),
}

impl SetCoverError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        SetCoverError::InvalidParameters(msg.into())
    }

    /// True when the caller can fix the problem by changing its arguments
    pub fn is_parameter_error(&self) -> bool {
        matches!(self, SetCoverError::InvalidParameters(_))
    }
}

/// Reasons a candidate cover is rejected by the verifier
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoverError {
    #[error("Vertex {0} is not a set")]
    NotASet(usize),

    #[error("Set {0} appears more than once")]
    DuplicateSet(usize),

    #[error("Element {0} is not covered")]
    Uncovered(usize),
}

#[test]
fn error_display_test() {
    let err = SetCoverError::invalid("k must be positive");
    assert_eq!(err.to_string(), "Invalid parameters: k must be positive");
    assert!(err.is_parameter_error());

    let err = SetCoverError::CollaboratorContractViolation("element 7".into());
    assert_eq!(
        err.to_string(),
        "Collaborator contract violation: element 7"
    );
    assert!(!err.is_parameter_error());

    assert_eq!(CoverError::Uncovered(12).to_string(), "Element 12 is not covered");
}
