use crate::error::{Error, Result};
use crate::layers::mode::Mode;
use crate::ops::sign::MusSpec;
use serde::{Deserialize, Serialize};

/// Construction parameters of an [`OrthonormalTransform`](crate::OrthonormalTransform).
///
/// `mode` stays a string until the transform is built, so a bad value in a
/// config file is reported as `InvalidMode` at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrthonormalConfig {
    pub n: usize,
    pub mode: String,
    pub mus: MusSpec,
}

impl Default for OrthonormalConfig {
    fn default() -> Self {
        OrthonormalConfig {
            n: 2,
            mode: Mode::Analysis.to_string(),
            mus: MusSpec::default(),
        }
    }
}

impl OrthonormalConfig {
    pub fn with_n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn with_mus(mut self, mus: impl Into<MusSpec>) -> Self {
        self.mus = mus.into();
        self
    }

    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }
}
