use ndarray::{Array2, ArrayView2, LinalgScalar, ScalarOperand, Zip};
use num_traits::{Float, FloatConst};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// Floating point precision of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precision {
    Single,
    Double,
}

/// Scalar type accepted by the generator and the transform (`f32` or `f64`).
pub trait Real:
    Float + FloatConst + LinalgScalar + ScalarOperand + Send + Sync + Debug + Display + 'static
{
    const PRECISION: Precision;

    fn from_f64(v: f64) -> Self;
    fn as_f64(self) -> f64;
}

impl Real for f32 {
    const PRECISION: Precision = Precision::Single;

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Real for f64 {
    const PRECISION: Precision = Precision::Double;

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}

/// Frobenius norm of a 2D array.
pub fn frobenius_norm<T: Real>(x: &ArrayView2<T>) -> T {
    x.iter().fold(T::zero(), |acc, &v| acc + v * v).sqrt()
}

/// Element-wise `|a - b| <= atol + rtol * |b|`, the same rule as `torch.allclose`.
pub fn all_close<T: Real>(a: &ArrayView2<T>, b: &ArrayView2<T>, rtol: T, atol: T) -> bool {
    if a.dim() != b.dim() {
        return false;
    }
    let mut ok = true;
    Zip::from(a).and(b).for_each(|&x, &y| {
        if (x - y).abs() > atol + rtol * y.abs() {
            ok = false;
        }
    });
    ok
}

/// Checks `M^T M = I` within the given tolerances.
pub fn is_orthonormal<T: Real>(m: &ArrayView2<T>, rtol: T, atol: T) -> bool {
    if m.nrows() != m.ncols() {
        return false;
    }
    let gram = m.t().dot(m);
    let eye = Array2::<T>::eye(m.nrows());
    all_close(&gram.view(), &eye.view(), rtol, atol)
}

/// Sum over every entry of `a ⊙ b`.
pub fn sum_product<T: Real>(a: &ArrayView2<T>, b: &ArrayView2<T>) -> T {
    Zip::from(a)
        .and(b)
        .fold(T::zero(), |acc, &x, &y| acc + x * y)
}
