mod generator;
mod orthonormal;

use crate::error::Error;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyModule;

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        match err {
            Error::MissingForwardCache => PyRuntimeError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Ortho Stone - Givens-cascade orthonormal transforms in Rust
#[pymodule]
pub fn ortho_stone(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    generator::register(m)?;
    m.add_class::<orthonormal::PyOrthonormalTransform>()?;
    Ok(())
}
