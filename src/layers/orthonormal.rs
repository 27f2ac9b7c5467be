//! # 직교 변환 레이어
//!
//! 회전 각도와 부호 벡터를 소유하고, 생성기로 만든 직교 행렬 R 을 입력 열벡터에
//! 적용합니다 (Analysis: `Z = R X`, Synthesis: `Z = R^T X`).
//!
//! 역전파는 자동 미분 대신 해석적 규칙을 씁니다.
//! - `dX = R^T dZ` (Analysis) 또는 `R dZ` (Synthesis)
//! - `dθ_k = Σ dX ⊙ (∂R/∂θ_k X)` (Synthesis 에서는 `(∂R/∂θ_k)^T X`)
//!
//! 부호 벡터는 구조 파라미터이므로 그래디언트를 받지 않습니다.

use crate::config::OrthonormalConfig;
use crate::error::{Error, Result};
use crate::layers::mode::Mode;
use crate::layers::reverse::{Gradients, ReverseRule, SavedTensors};
use crate::ops::generator::{build, partial_difference_cascade};
use crate::ops::givens::{cascade, num_angles, GivensRotation};
use crate::ops::sign::{MusSpec, SignVector};
use crate::ops::utils::{sum_product, Real};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use ndarray_rand::rand_distr::{StandardNormal, Uniform};
use ndarray_rand::RandomExt;
use rand::Rng;
use rayon::prelude::*;

/// Applies `matrix` (Analysis) or its transpose (Synthesis) to the columns of `x`.
pub fn apply_matrix<T: Real>(matrix: &ArrayView2<T>, x: &ArrayView2<T>, mode: Mode) -> Array2<T> {
    match mode {
        Mode::Analysis => matrix.dot(x),
        Mode::Synthesis => matrix.t().dot(x),
    }
}

fn check_rows<T>(x: &ArrayView2<T>, n: usize) -> Result<()> {
    if x.nrows() != n {
        return Err(Error::Dimension {
            expected: n,
            actual: x.nrows(),
        });
    }
    Ok(())
}

fn check_mus<T: Real>(mus: &SignVector<T>, n: usize) -> Result<()> {
    if mus.len() != n {
        return Err(Error::InvalidMus(format!(
            "length {} does not match n = {}",
            mus.len(),
            n
        )));
    }
    Ok(())
}

/// Stateless forward pass. Returns the output and the generated matrix.
pub fn orthonormal_transform_forward<T: Real>(
    x: &ArrayView2<T>,
    angles: &ArrayView1<T>,
    mus: &SignVector<T>,
    mode: Mode,
) -> Result<(Array2<T>, Array2<T>)> {
    let (n, rotations) = cascade(angles)?;
    check_mus(mus, n)?;
    check_rows(x, n)?;
    let matrix = build(n, &rotations, mus, None)?;
    let z = apply_matrix(&matrix.view(), x, mode);
    Ok((z, matrix))
}

/// Stateless backward pass for the forward pass above.
pub fn orthonormal_transform_backward<T: Real>(
    grad_output: &ArrayView2<T>,
    x: &ArrayView2<T>,
    angles: &ArrayView1<T>,
    mus: &SignVector<T>,
    mode: Mode,
) -> Result<Gradients<T>> {
    let (n, rotations) = cascade(angles)?;
    check_mus(mus, n)?;
    check_rows(x, n)?;
    if grad_output.dim() != x.dim() {
        return Err(Error::ShapeMismatch {
            expected: x.dim(),
            actual: grad_output.dim(),
        });
    }
    let matrix = build(n, &rotations, mus, None)?;
    reverse_cascade(grad_output, x, &matrix.view(), n, &rotations, mus, mode)
}

fn reverse_cascade<T: Real>(
    grad_output: &ArrayView2<T>,
    x: &ArrayView2<T>,
    matrix: &ArrayView2<T>,
    n: usize,
    rotations: &[GivensRotation<T>],
    mus: &SignVector<T>,
    mode: Mode,
) -> Result<Gradients<T>> {
    let grad_input = apply_matrix(matrix, grad_output, mode.adjoint());
    let partials = partial_difference_cascade(n, rotations, mus)?;
    let grad_angles: Vec<T> = partials
        .par_iter()
        .map(|d| {
            let dz = apply_matrix(&d.view(), x, mode);
            sum_product(&grad_input.view(), &dz.view())
        })
        .collect();
    Ok(Gradients {
        input: grad_input,
        angles: Array1::from(grad_angles),
    })
}

/// Orthonormal transform with learnable rotation angles.
///
/// One forward followed by one backward. The forward pass caches its input and
/// matrix; `backward` consumes the cache.
#[derive(Debug, Clone)]
pub struct OrthonormalTransform<T: Real> {
    n: usize,
    angles: Array1<T>,
    mus: SignVector<T>,
    mode: Mode,
    cache: Option<SavedTensors<T>>,
    grad: Option<Array1<T>>,
}

impl<T: Real> OrthonormalTransform<T> {
    pub fn new(config: &OrthonormalConfig) -> Result<Self> {
        let mode: Mode = config.mode.parse()?;
        if config.n == 0 {
            return Err(Error::Config("n must be at least 1".to_string()));
        }
        let mus = SignVector::from_spec(&config.mus, config.n)?;
        log::debug!(
            "orthonormal transform: n = {}, mode = {}, {} angles",
            config.n,
            mode,
            num_angles(config.n)
        );
        Ok(OrthonormalTransform {
            n: config.n,
            angles: Array1::zeros(num_angles(config.n)),
            mus,
            mode,
            cache: None,
            grad: None,
        })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn angles(&self) -> ArrayView1<'_, T> {
        self.angles.view()
    }

    pub fn mus(&self) -> &SignVector<T> {
        &self.mus
    }

    pub fn num_parameters(&self) -> usize {
        self.angles.len()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        log::debug!("mode {} -> {}", self.mode, mode);
        self.mode = mode;
    }

    /// Parses and sets the mode. The current mode is kept on error.
    pub fn set_mode_str(&mut self, mode: &str) -> Result<()> {
        let mode = mode.parse()?;
        self.set_mode(mode);
        Ok(())
    }

    /// Validates and sets the sign vector. The current signs are kept on error.
    pub fn set_mus(&mut self, mus: impl Into<MusSpec>) -> Result<()> {
        self.mus = SignVector::from_spec(&mus.into(), self.n)?;
        log::debug!("mus set to {:?}", self.mus.to_vec());
        Ok(())
    }

    pub fn set_angles(&mut self, angles: Array1<T>) -> Result<()> {
        let expected = num_angles(self.n);
        if angles.len() != expected {
            return Err(Error::AngleCount {
                expected,
                actual: angles.len(),
            });
        }
        self.angles = angles;
        Ok(())
    }

    pub fn fill_angles(&mut self, value: T) {
        self.angles.fill(value);
    }

    /// Draws every angle from `U(low, high)`. The range must be finite and non-empty.
    pub fn init_angles_uniform<R: Rng + ?Sized>(
        &mut self,
        low: f64,
        high: f64,
        rng: &mut R,
    ) -> Result<()> {
        if !(low < high) || !low.is_finite() || !high.is_finite() {
            return Err(Error::Config(format!(
                "empty angle range [{}, {})",
                low, high
            )));
        }
        self.angles =
            Array1::<f64>::random_using(self.angles.len(), Uniform::new(low, high), rng)
                .mapv(T::from_f64);
        Ok(())
    }

    /// Draws every angle from `N(0, 1)`.
    pub fn init_angles_normal<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.angles = Array1::<f64>::random_using(self.angles.len(), StandardNormal, rng)
            .mapv(T::from_f64);
    }

    /// The matrix the next forward pass will apply (before transposition).
    pub fn matrix(&self) -> Result<Array2<T>> {
        let (n, rotations) = cascade(&self.angles.view())?;
        build(n, &rotations, &self.mus, None)
    }

    pub fn forward(&mut self, x: &ArrayView2<T>) -> Result<Array2<T>> {
        let (z, matrix) = orthonormal_transform_forward(x, &self.angles.view(), &self.mus, self.mode)?;
        log::trace!("forward: {}x{} in {} mode", x.nrows(), x.ncols(), self.mode);
        self.cache = Some(SavedTensors {
            input: x.to_owned(),
            matrix,
            angles: self.angles.clone(),
            mus: self.mus.clone(),
            mode: self.mode,
        });
        Ok(z)
    }

    /// Forward pass without touching the cache.
    pub fn predict(&self, x: &ArrayView2<T>) -> Result<Array2<T>> {
        orthonormal_transform_forward(x, &self.angles.view(), &self.mus, self.mode).map(|(z, _)| z)
    }

    /// Consumes the cache of the last forward pass and accumulates the angle gradient.
    ///
    /// If `grad_output` has the wrong shape, the cache is kept and the call can be
    /// repeated with a corrected gradient.
    pub fn backward(&mut self, grad_output: &ArrayView2<T>) -> Result<Gradients<T>> {
        let saved = self.cache.take().ok_or(Error::MissingForwardCache)?;
        let grads = match self.reverse(&saved, grad_output) {
            Ok(g) => g,
            Err(e) => {
                self.cache = Some(saved);
                return Err(e);
            }
        };
        log::trace!("backward: {} angle gradients", grads.angles.len());
        self.grad = Some(match self.grad.take() {
            Some(acc) => acc + &grads.angles,
            None => grads.angles.clone(),
        });
        Ok(grads)
    }

    pub fn grad(&self) -> Option<&Array1<T>> {
        self.grad.as_ref()
    }

    pub fn zero_grad(&mut self) {
        self.grad = None;
    }

    /// Plain gradient-descent step on the angles using the accumulated gradient.
    pub fn apply_gradient(&mut self, learning_rate: T) {
        if let Some(g) = &self.grad {
            self.angles.scaled_add(-learning_rate, g);
        }
    }
}

impl<T: Real> ReverseRule<T> for OrthonormalTransform<T> {
    fn reverse(&self, saved: &SavedTensors<T>, grad_output: &ArrayView2<T>) -> Result<Gradients<T>> {
        if grad_output.dim() != saved.input.dim() {
            return Err(Error::ShapeMismatch {
                expected: saved.input.dim(),
                actual: grad_output.dim(),
            });
        }
        let (n, rotations) = cascade(&saved.angles.view())?;
        reverse_cascade(
            grad_output,
            &saved.input.view(),
            &saved.matrix.view(),
            n,
            &rotations,
            &saved.mus,
            saved.mode,
        )
    }
}
