//! Sign vector (`mus`) validation.
//!
//! A sign vector is the diagonal ±1 matrix applied on the left of the rotation
//! cascade. It can be given as one scalar (broadcast to every row) or as a
//! vector of length n.

use crate::error::{invalid_mus, Result};
use crate::ops::utils::Real;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Unvalidated sign specification, as it comes from a config or a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MusSpec {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Default for MusSpec {
    fn default() -> Self {
        MusSpec::Scalar(1.0)
    }
}

impl From<f64> for MusSpec {
    fn from(v: f64) -> Self {
        MusSpec::Scalar(v)
    }
}

impl From<i32> for MusSpec {
    fn from(v: i32) -> Self {
        MusSpec::Scalar(v as f64)
    }
}

impl From<Vec<f64>> for MusSpec {
    fn from(v: Vec<f64>) -> Self {
        MusSpec::Vector(v)
    }
}

impl From<Vec<i32>> for MusSpec {
    fn from(v: Vec<i32>) -> Self {
        MusSpec::Vector(v.into_iter().map(f64::from).collect())
    }
}

impl From<&[f64]> for MusSpec {
    fn from(v: &[f64]) -> Self {
        MusSpec::Vector(v.to_vec())
    }
}

/// Validated ±1 vector of length n.
#[derive(Debug, Clone, PartialEq)]
pub struct SignVector<T> {
    signs: Array1<T>,
}

fn check_sign(v: f64) -> Result<()> {
    if v == 1.0 || v == -1.0 {
        Ok(())
    } else {
        log::warn!("rejected sign value {}", v);
        Err(invalid_mus(&format!("{} is not +1 or -1", v)))
    }
}

impl<T: Real> SignVector<T> {
    pub fn ones(n: usize) -> Self {
        SignVector {
            signs: Array1::ones(n),
        }
    }

    /// Validates `spec` against dimension `n`.
    ///
    /// A scalar, or a vector of length one, is broadcast.
    pub fn from_spec(spec: &MusSpec, n: usize) -> Result<Self> {
        let values: Vec<f64> = match spec {
            MusSpec::Scalar(v) => {
                check_sign(*v)?;
                vec![*v; n]
            }
            MusSpec::Vector(v) if v.len() == 1 => {
                check_sign(v[0])?;
                vec![v[0]; n]
            }
            MusSpec::Vector(v) if v.len() == n => {
                for &x in v {
                    check_sign(x)?;
                }
                v.clone()
            }
            MusSpec::Vector(v) => {
                log::warn!("rejected sign vector of length {} for n = {}", v.len(), n);
                return Err(invalid_mus(&format!(
                    "length {} does not match n = {}",
                    v.len(),
                    n
                )));
            }
        };
        Ok(SignVector {
            signs: values.into_iter().map(T::from_f64).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.signs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.signs.iter().map(|&v| v.as_f64()).collect()
    }

    /// Product of all signs, i.e. the determinant of the generated matrix.
    pub fn parity(&self) -> T {
        self.signs.iter().fold(T::one(), |acc, &s| acc * s)
    }

    /// `m <- diag(signs) m`
    pub fn apply_rows(&self, m: &mut Array2<T>) {
        for (mut row, &s) in m.axis_iter_mut(Axis(0)).zip(self.signs.iter()) {
            if s != T::one() {
                row.mapv_inplace(|v| v * s);
            }
        }
    }
}
