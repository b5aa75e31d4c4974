//! Errors raised while building or evaluating a model.
//!
//! Every fatal condition is reported through [`SmplError`]; evaluation either
//! fully succeeds or fails before producing any output.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmplError {
    /// A gender code other than the supported ones
    #[error("Wrong gender supplied: {0}")]
    GenderMismatch(String),

    /// An asset does not have the size the model expects
    #[error("Asset {asset} is incompatible with the model: expected {expected}, got {actual}")]
    AssetDimensionMismatch {
        asset: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The joint parent table is not a tree ordered parents-first
    #[error("Joint hierarchy is incompatible with the model: {0}")]
    HierarchyMismatch(String),

    /// Only 3D points are supported
    #[error("Unsupported spatial dimension {0}, the model only works in 3D")]
    UnsupportedDimension(usize),

    /// A parameter vector or jacobian request of the wrong length
    #[error("{name} has length {actual}, expected {expected}")]
    ParamLengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, SmplError>;
