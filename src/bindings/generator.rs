//! # 직교 행렬 생성 함수 바인딩

use numpy::{IntoPyArray, PyArray2, PyReadonlyArray1};
use pyo3::prelude::*;
use pyo3::types::PyModule;

use crate::ops::generator;
use crate::ops::sign::MusSpec;

/// A Python float or a sequence of floats.
pub(crate) fn extract_mus(obj: Option<&PyAny>) -> PyResult<MusSpec> {
    match obj {
        None => Ok(MusSpec::default()),
        Some(v) => match v.extract::<f64>() {
            Ok(s) => Ok(MusSpec::Scalar(s)),
            Err(_) => Ok(MusSpec::Vector(v.extract::<Vec<f64>>()?)),
        },
    }
}

#[pyfunction]
#[pyo3(signature = (angles, mus=None))]
fn orthonormal_matrix<'py>(
    py: Python<'py>,
    angles: PyReadonlyArray1<f64>,
    mus: Option<&PyAny>,
) -> PyResult<&'py PyArray2<f64>> {
    let mus = extract_mus(mus)?;
    let r = generator::orthonormal_matrix(&angles.as_array(), &mus)?;
    Ok(r.into_pyarray(py))
}

#[pyfunction]
#[pyo3(signature = (angles, index, mus=None))]
fn partial_difference_matrix<'py>(
    py: Python<'py>,
    angles: PyReadonlyArray1<f64>,
    index: usize,
    mus: Option<&PyAny>,
) -> PyResult<&'py PyArray2<f64>> {
    let mus = extract_mus(mus)?;
    let d = generator::partial_difference_matrix(&angles.as_array(), &mus, index)?;
    Ok(d.into_pyarray(py))
}

#[pyfunction]
#[pyo3(signature = (angles, mus=None))]
fn partial_difference_matrices<'py>(
    py: Python<'py>,
    angles: PyReadonlyArray1<f64>,
    mus: Option<&PyAny>,
) -> PyResult<Vec<&'py PyArray2<f64>>> {
    let mus = extract_mus(mus)?;
    let ds = generator::partial_difference_matrices(&angles.as_array(), &mus)?;
    Ok(ds.into_iter().map(|d| d.into_pyarray(py)).collect())
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(orthonormal_matrix, m)?)?;
    m.add_function(wrap_pyfunction!(partial_difference_matrix, m)?)?;
    m.add_function(wrap_pyfunction!(partial_difference_matrices, m)?)?;
    Ok(())
}
