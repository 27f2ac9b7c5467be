//! Hand-written reverse rules.
//!
//! A layer that implements [`ReverseRule`] does not need a tape to differentiate
//! through its forward computation. The tape only stores what the forward pass
//! saved and calls [`ReverseRule::reverse`] with the upstream gradient.

use crate::error::Result;
use crate::layers::mode::Mode;
use crate::ops::sign::SignVector;
use ndarray::{Array1, Array2, ArrayView2};

/// Tensors kept from one forward pass of an orthonormal transform.
#[derive(Debug, Clone)]
pub struct SavedTensors<T> {
    pub input: Array2<T>,
    pub matrix: Array2<T>,
    pub angles: Array1<T>,
    pub mus: SignVector<T>,
    pub mode: Mode,
}

/// Gradients w.r.t. the input and the learnable parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients<T> {
    pub input: Array2<T>,
    pub angles: Array1<T>,
}

pub trait ReverseRule<T> {
    fn reverse(&self, saved: &SavedTensors<T>, grad_output: &ArrayView2<T>)
        -> Result<Gradients<T>>;
}
