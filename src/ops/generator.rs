//! # 직교 행렬 생성기
//!
//! 각도 벡터와 부호 벡터로부터 `R = diag(mus) · G_{K-1} ⋯ G_1 · G_0` 를 만듭니다.
//! 편미분 모드에서는 k번째 인자 하나만 도함수 인자로 바꿔서 ∂R/∂θ_k 를 만듭니다.
//! 각 인자는 서로 다른 각도에만 의존하므로 곱의 미분은 이 한 항이 전부입니다.

use crate::error::{Error, Result};
use crate::ops::givens::{cascade, GivensRotation};
use crate::ops::sign::{MusSpec, SignVector};
use crate::ops::utils::Real;
use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;

/// Generator configuration.
///
/// With `partial_difference` set, [`generate`](Self::generate) requires a target
/// angle index and returns the derivative of the matrix with respect to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrthonormalMatrixGenerator {
    pub partial_difference: bool,
}

impl OrthonormalMatrixGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partial_difference() -> Self {
        OrthonormalMatrixGenerator {
            partial_difference: true,
        }
    }

    pub fn generate<T: Real>(
        &self,
        angles: &ArrayView1<T>,
        mus: &MusSpec,
        index: Option<usize>,
    ) -> Result<Array2<T>> {
        let (n, rotations) = cascade(angles)?;
        let signs = SignVector::from_spec(mus, n)?;
        let target = match (self.partial_difference, index) {
            (false, _) => None,
            (true, Some(k)) => Some(k),
            (true, None) => {
                return Err(Error::AngleIndex {
                    index: usize::MAX,
                    count: rotations.len(),
                })
            }
        };
        build(n, &rotations, &signs, target)
    }
}

/// Multiplies the cascade onto the identity, right-most factor first.
pub(crate) fn build<T: Real>(
    n: usize,
    rotations: &[GivensRotation<T>],
    signs: &SignVector<T>,
    target: Option<usize>,
) -> Result<Array2<T>> {
    if let Some(k) = target {
        if k >= rotations.len() {
            return Err(Error::AngleIndex {
                index: k,
                count: rotations.len(),
            });
        }
    }
    let mut m = Array2::<T>::eye(n);
    for (i, g) in rotations.iter().enumerate() {
        if Some(i) == target {
            g.apply_derivative_left(&mut m);
        } else {
            g.apply_left(&mut m);
        }
    }
    signs.apply_rows(&mut m);
    Ok(m)
}

/// The orthonormal matrix R.
pub fn orthonormal_matrix<T: Real>(angles: &ArrayView1<T>, mus: &MusSpec) -> Result<Array2<T>> {
    OrthonormalMatrixGenerator::new().generate(angles, mus, None)
}

/// ∂R/∂θ_k.
pub fn partial_difference_matrix<T: Real>(
    angles: &ArrayView1<T>,
    mus: &MusSpec,
    index: usize,
) -> Result<Array2<T>> {
    OrthonormalMatrixGenerator::partial_difference().generate(angles, mus, Some(index))
}

/// Every ∂R/∂θ_k, computed in parallel. The k-th entry belongs to angle k.
pub fn partial_difference_matrices<T: Real>(
    angles: &ArrayView1<T>,
    mus: &MusSpec,
) -> Result<Vec<Array2<T>>> {
    let (n, rotations) = cascade(angles)?;
    let signs = SignVector::from_spec(mus, n)?;
    partial_difference_cascade(n, &rotations, &signs)
}

pub(crate) fn partial_difference_cascade<T: Real>(
    n: usize,
    rotations: &[GivensRotation<T>],
    signs: &SignVector<T>,
) -> Result<Vec<Array2<T>>> {
    (0..rotations.len())
        .into_par_iter()
        .map(|k| build(n, rotations, signs, Some(k)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::givens::{num_angles, planes};
    use crate::ops::utils::{all_close, is_orthonormal};
    use approx::assert_abs_diff_eq;
    use ndarray::{arr1, arr2, Array1};
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::PI;

    fn random_angles(count: usize, seed: u64) -> Array1<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        Array1::random_using(count, Uniform::new(0.0, 2.0 * PI), &mut rng)
    }

    /// Dense product written out factor by factor.
    fn dense_product(angles: &Array1<f64>, mus: &[f64], pd: Option<usize>) -> Array2<f64> {
        let n = mus.len();
        let mut r = Array2::<f64>::eye(n);
        for (k, plane) in planes(n).into_iter().enumerate() {
            let g = GivensRotation {
                plane,
                angle: angles[k],
            };
            let f = if Some(k) == pd {
                g.embed_derivative(n)
            } else {
                g.embed(n)
            };
            r = f.dot(&r);
        }
        Array2::from_diag(&Array1::from(mus.to_vec())).dot(&r)
    }

    #[test]
    fn test_2x2_is_plain_rotation() {
        let theta = PI / 4.0;
        let r = orthonormal_matrix(&arr1(&[theta]).view(), &MusSpec::default()).unwrap();
        let (s, c) = theta.sin_cos();
        assert_abs_diff_eq!(r, arr2(&[[c, -s], [s, c]]), epsilon = 1e-15);
    }

    #[test]
    fn test_2x2_with_mus() {
        let theta = PI / 4.0;
        let r = orthonormal_matrix(&arr1(&[theta]).view(), &MusSpec::from(vec![1, -1])).unwrap();
        let (s, c) = theta.sin_cos();
        assert_abs_diff_eq!(r, arr2(&[[c, -s], [-s, -c]]), epsilon = 1e-15);
    }

    #[test]
    fn test_4x4_matches_explicit_factor_order() {
        let angles = random_angles(6, 7);
        let mus = [-1.0, 1.0, -1.0, 1.0];
        let r = orthonormal_matrix(&angles.view(), &MusSpec::from(mus.to_vec())).unwrap();
        assert_abs_diff_eq!(r, dense_product(&angles, &mus, None), epsilon = 1e-12);
    }

    #[test]
    fn test_4x4_partial_difference_matches_explicit_product() {
        let angles = random_angles(6, 11);
        let mus = [1.0, 1.0, -1.0, -1.0];
        for k in 0..6 {
            let d = partial_difference_matrix(&angles.view(), &MusSpec::from(mus.to_vec()), k)
                .unwrap();
            assert_abs_diff_eq!(d, dense_product(&angles, &mus, Some(k)), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_orthonormal_and_determinant_sign() {
        for n in 1..=8 {
            let angles = random_angles(num_angles(n), n as u64);
            let mus: Vec<f64> = (0..n).map(|i| if i % 3 == 0 { -1.0 } else { 1.0 }).collect();
            let spec = MusSpec::from(mus.clone());
            let r = orthonormal_matrix(&angles.view(), &spec).unwrap();
            assert!(is_orthonormal(&r.view(), 1e-10, 1e-12), "n = {}", n);
            let parity: f64 = mus.iter().product();
            assert_abs_diff_eq!(determinant(&r), parity, epsilon = 1e-9);
        }
    }

    fn determinant(m: &Array2<f64>) -> f64 {
        let mut a = m.clone();
        let n = a.nrows();
        let mut det = 1.0;
        for col in 0..n {
            let pivot = (col..n)
                .max_by(|&i, &j| a[[i, col]].abs().partial_cmp(&a[[j, col]].abs()).unwrap())
                .unwrap();
            if pivot != col {
                for j in 0..n {
                    a.swap([col, j], [pivot, j]);
                }
                det = -det;
            }
            let p = a[[col, col]];
            det *= p;
            for i in (col + 1)..n {
                let f = a[[i, col]] / p;
                for j in col..n {
                    let v = a[[col, j]];
                    a[[i, j]] -= f * v;
                }
            }
        }
        det
    }

    #[test]
    fn test_partial_difference_converges_to_finite_difference() {
        let n = 5;
        let angles = random_angles(num_angles(n), 3);
        let spec = MusSpec::from(vec![1, -1, 1, -1, 1]);
        let delta = 1e-6;
        let all = partial_difference_matrices(&angles.view(), &spec).unwrap();
        assert_eq!(all.len(), num_angles(n));
        for (k, analytic) in all.iter().enumerate() {
            let mut plus = angles.clone();
            let mut minus = angles.clone();
            plus[k] += delta / 2.0;
            minus[k] -= delta / 2.0;
            let rp = orthonormal_matrix(&plus.view(), &spec).unwrap();
            let rm = orthonormal_matrix(&minus.view(), &spec).unwrap();
            let numeric = (rp - rm) / delta;
            assert!(
                all_close(&analytic.view(), &numeric.view(), 1e-4, 1e-7),
                "angle {}",
                k
            );
        }
    }

    #[test]
    fn test_zero_angles_give_identity() {
        let r = orthonormal_matrix(&Array1::<f32>::zeros(28).view(), &MusSpec::default()).unwrap();
        assert_eq!(r, Array2::<f32>::eye(8));
    }

    #[test]
    fn test_single_point_is_sign_only() {
        let r = orthonormal_matrix(&Array1::<f64>::zeros(0).view(), &MusSpec::from(-1)).unwrap();
        assert_eq!(r, arr2(&[[-1.0]]));
    }

    #[test]
    fn test_reduced_left_top() {
        // First n-1 angles zero: row/column 0 is untouched by the cascade.
        for n in [4, 8] {
            let mut angles = random_angles(num_angles(n), 5);
            for k in 0..(n - 1) {
                angles[k] = 0.0;
            }
            let r = orthonormal_matrix(&angles.view(), &MusSpec::default()).unwrap();
            assert_abs_diff_eq!(r[[0, 0]], 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_generator_errors() {
        let pd = OrthonormalMatrixGenerator::partial_difference();
        let angles = arr1(&[0.1_f64, 0.2, 0.3]);
        assert!(matches!(
            pd.generate(&angles.view(), &MusSpec::default(), None),
            Err(Error::AngleIndex { .. })
        ));
        assert_eq!(
            pd.generate(&angles.view(), &MusSpec::default(), Some(3)),
            Err(Error::AngleIndex { index: 3, count: 3 })
        );
        assert!(matches!(
            orthonormal_matrix(&angles.view(), &MusSpec::from(vec![1, 1])),
            Err(Error::InvalidMus(_))
        ));
        assert!(matches!(
            orthonormal_matrix(&arr1(&[0.0_f64, 0.0]).view(), &MusSpec::default()),
            Err(Error::AngleCount { .. })
        ));
    }
}
