//! # OrthonormalTransform 을 위한 Python 바인딩
//!
//! f64 변환 하나를 Python 클래스로 노출합니다. 잘못된 mode 나 mus 는
//! `ValueError` 로 올라갑니다.

use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::prelude::*;

use super::generator::extract_mus;
use crate::config::OrthonormalConfig;
use crate::layers::OrthonormalTransform;

#[pyclass(name = "OrthonormalTransform", module = "ortho_stone")]
pub struct PyOrthonormalTransform {
    inner: OrthonormalTransform<f64>,
}

#[pymethods]
impl PyOrthonormalTransform {
    #[new]
    #[pyo3(signature = (n=2, mode="Analysis", mus=None))]
    fn new(n: usize, mode: &str, mus: Option<&PyAny>) -> PyResult<Self> {
        let config = OrthonormalConfig::default()
            .with_n(n)
            .with_mode(mode)
            .with_mus(extract_mus(mus)?);
        Ok(PyOrthonormalTransform {
            inner: OrthonormalTransform::new(&config)?,
        })
    }

    #[staticmethod]
    fn from_json(config: &str) -> PyResult<Self> {
        let config = OrthonormalConfig::from_json(config)?;
        Ok(PyOrthonormalTransform {
            inner: OrthonormalTransform::new(&config)?,
        })
    }

    #[getter]
    fn n(&self) -> usize {
        self.inner.n()
    }

    #[getter]
    fn mode(&self) -> &'static str {
        self.inner.mode().as_str()
    }

    #[setter]
    fn set_mode(&mut self, mode: &str) -> PyResult<()> {
        Ok(self.inner.set_mode_str(mode)?)
    }

    #[getter]
    fn mus(&self) -> Vec<f64> {
        self.inner.mus().to_vec()
    }

    #[setter]
    fn set_mus(&mut self, mus: &PyAny) -> PyResult<()> {
        Ok(self.inner.set_mus(extract_mus(Some(mus))?)?)
    }

    #[getter]
    fn angles<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        self.inner.angles().to_owned().into_pyarray(py)
    }

    #[setter]
    fn set_angles(&mut self, angles: PyReadonlyArray1<f64>) -> PyResult<()> {
        Ok(self.inner.set_angles(angles.as_array().to_owned())?)
    }

    #[getter]
    fn grad<'py>(&self, py: Python<'py>) -> Option<&'py PyArray1<f64>> {
        self.inner.grad().map(|g| g.clone().into_pyarray(py))
    }

    fn num_parameters(&self) -> usize {
        self.inner.num_parameters()
    }

    fn matrix<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray2<f64>> {
        Ok(self.inner.matrix()?.into_pyarray(py))
    }

    fn forward<'py>(
        &mut self,
        py: Python<'py>,
        x: PyReadonlyArray2<'py, f64>,
    ) -> PyResult<&'py PyArray2<f64>> {
        let z = self.inner.forward(&x.as_array())?;
        Ok(z.into_pyarray(py))
    }

    fn __call__<'py>(
        &mut self,
        py: Python<'py>,
        x: PyReadonlyArray2<'py, f64>,
    ) -> PyResult<&'py PyArray2<f64>> {
        self.forward(py, x)
    }

    /// Returns `(grad_input, grad_angles)`.
    fn backward<'py>(
        &mut self,
        py: Python<'py>,
        grad_output: PyReadonlyArray2<'py, f64>,
    ) -> PyResult<(&'py PyArray2<f64>, &'py PyArray1<f64>)> {
        let grads = self.inner.backward(&grad_output.as_array())?;
        Ok((grads.input.into_pyarray(py), grads.angles.into_pyarray(py)))
    }

    fn zero_grad(&mut self) {
        self.inner.zero_grad();
    }

    fn step(&mut self, learning_rate: f64) {
        self.inner.apply_gradient(learning_rate);
    }

    fn __repr__(&self) -> String {
        format!(
            "OrthonormalTransform(n={}, mode='{}', mus={:?})",
            self.inner.n(),
            self.inner.mode(),
            self.inner.mus().to_vec()
        )
    }
}
