use crate::error::{invalid_mode, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Analysis applies R, Synthesis applies R^T.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Analysis,
    Synthesis,
}

impl Mode {
    /// The mode whose forward map is the adjoint of this one.
    pub fn adjoint(self) -> Self {
        match self {
            Mode::Analysis => Mode::Synthesis,
            Mode::Synthesis => Mode::Analysis,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Analysis => "Analysis",
            Mode::Synthesis => "Synthesis",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Analysis" => Ok(Mode::Analysis),
            "Synthesis" => Ok(Mode::Synthesis),
            other => {
                log::warn!("rejected mode {:?}", other);
                Err(invalid_mode(other))
            }
        }
    }
}

impl TryFrom<&str> for Mode {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}
