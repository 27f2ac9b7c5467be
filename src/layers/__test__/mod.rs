//! `OrthonormalTransform` 통합 테스트

use crate::config::OrthonormalConfig;
use crate::layers::{Mode, OrthonormalTransform};
use crate::ops::utils::{all_close, Precision, Real};
use ndarray::{Array1, Array2, ArrayView2};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;


pub const MODES: [Mode; 2] = [Mode::Analysis, Mode::Synthesis];
pub const NCOLS: [usize; 3] = [1, 2, 4];

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn randn(rows: usize, cols: usize, rng: &mut StdRng) -> Array2<f64> {
    Array2::random_using((rows, cols), StandardNormal, rng)
}

pub fn to_real<T: Real>(m: &Array2<f64>) -> Array2<T> {
    m.mapv(T::from_f64)
}

pub fn to_real1<T: Real>(v: &Array1<f64>) -> Array1<T> {
    v.mapv(T::from_f64)
}

/// `(rtol, atol)` for comparisons against f64 references and for `R^T R = I`.
///
/// Single precision needs `atol = 1e-5`: off-diagonal Gram entries are compared
/// against zero and carry rounding error near `1e-7` per entry.
pub fn tolerance<T: Real>() -> (T, T) {
    match T::PRECISION {
        Precision::Single => (T::from_f64(1e-4), T::from_f64(1e-5)),
        Precision::Double => (T::from_f64(1e-9), T::from_f64(1e-11)),
    }
}

#[track_caller]
pub fn assert_close<T: Real>(actual: &ArrayView2<T>, expected: &ArrayView2<T>, rtol: T, atol: T) {
    assert!(
        all_close(actual, expected, rtol, atol),
        "\nactual   = {:?}\nexpected = {:?}",
        actual,
        expected
    );
}

#[track_caller]
pub fn assert_scalar_close<T: Real>(actual: T, expected: T, rtol: T, atol: T) {
    assert!(
        (actual - expected).abs() <= atol + rtol * expected.abs(),
        "actual = {}, expected = {}",
        actual,
        expected
    );
}

pub fn transform<T: Real>(n: usize, mode: Mode) -> OrthonormalTransform<T> {
    OrthonormalTransform::new(
        &OrthonormalConfig::default()
            .with_n(n)
            .with_mode(mode.to_string()),
    )
    .unwrap()
}

/// Expected `(dX, dθ)` for one angle given R and ∂R/∂θ.
pub fn expected_grads(
    r: &Array2<f64>,
    dr: &Array2<f64>,
    x: &Array2<f64>,
    dz: &Array2<f64>,
    mode: Mode,
) -> (Array2<f64>, f64) {
    match mode {
        Mode::Analysis => {
            let dx = r.t().dot(dz);
            let dw = (&dx * &dr.dot(x)).sum();
            (dx, dw)
        }
        Mode::Synthesis => {
            let dx = r.dot(dz);
            let dw = (&dx * &dr.t().dot(x)).sum();
            (dx, dw)
        }
    }
}

pub fn expected_output(r: &Array2<f64>, x: &Array2<f64>, mode: Mode) -> Array2<f64> {
    match mode {
        Mode::Analysis => r.dot(x),
        Mode::Synthesis => r.t().dot(x),
    }
}
