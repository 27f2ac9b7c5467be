//! Ortho Stone - Givens-cascade orthonormal transforms with analytic gradients.
//!
//! An n×n orthonormal matrix is generated from n(n-1)/2 rotation angles and a
//! ±1 sign vector. [`OrthonormalTransform`] applies it (or its transpose) to a
//! batch of column vectors and back-propagates with a closed-form rule, one
//! partial-difference matrix per angle.

pub mod config;
pub mod error;
pub mod layers;
pub mod ops;

#[cfg(feature = "python")]
mod bindings;

pub use config::OrthonormalConfig;
pub use error::{Error, Result};
pub use layers::{Gradients, Mode, OrthonormalTransform, ReverseRule, SavedTensors};
pub use ops::{
    orthonormal_matrix, partial_difference_matrices, partial_difference_matrix, MusSpec,
    OrthonormalMatrixGenerator, Precision, Real, SignVector,
};
