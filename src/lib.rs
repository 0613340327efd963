//! Random weighted set cover instances with a planted cover.
//!
//! An instance is a bipartite graph of sets and elements plus a weight per
//! set. A secret subset of the sets covers every element; its weight is
//! published as an upper bound next to three lower bounds, so cover
//! heuristics can be scored against both.

pub mod bigraph;
pub mod bounds;
pub mod config;
pub mod error;
pub mod generate;
pub mod params;
pub mod verify;
pub mod weights;

pub use bigraph::{BiGraph, Side};
pub use config::GeneratorConfig;
pub use error::{CoverError, Result, SetCoverError};
pub use generate::{generate, InstanceRecord, SetCoverInstance};
pub use params::Params;
pub use verify::verify_cover;
pub use weights::{RandomInteger, UniformWeight, UnitWeight, WeightSource, WeightSpec, Weights};
