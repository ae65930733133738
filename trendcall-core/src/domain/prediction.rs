//! Binary next-period direction produced by the classifier.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prediction {
    /// Label 0.
    Down,
    /// Label 1.
    Up,
}

impl Prediction {
    /// Map a raw classifier label. Anything other than 0 or 1 is rejected.
    pub fn from_label(label: i64) -> Option<Self> {
        match label {
            0 => Some(Prediction::Down),
            1 => Some(Prediction::Up),
            _ => None,
        }
    }

    pub fn label(self) -> i64 {
        match self {
            Prediction::Down => 0,
            Prediction::Up => 1,
        }
    }

    pub fn is_up(self) -> bool {
        self == Prediction::Up
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Prediction::Down => "down",
            Prediction::Up => "up",
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
