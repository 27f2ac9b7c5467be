use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("InvalidMode: {0} (expected \"Analysis\" or \"Synthesis\")")]
    InvalidMode(String),
    #[error("InvalidMus: {0}")]
    InvalidMus(String),
    #[error("angle count {actual} is not n(n-1)/2 (expected {expected})")]
    AngleCount { expected: usize, actual: usize },
    #[error("angle index {index} out of range for {count} angles")]
    AngleIndex { index: usize, count: usize },
    #[error("input has {actual} rows but the transform is {expected}x{expected}")]
    Dimension { expected: usize, actual: usize },
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("backward called without a cached forward pass")]
    MissingForwardCache,
    #[error("config error: {0}")]
    Config(String),
}

pub fn invalid_mode(m: &str) -> Error {
    Error::InvalidMode(m.to_string())
}

pub fn invalid_mus(m: &str) -> Error {
    Error::InvalidMus(m.to_string())
}
