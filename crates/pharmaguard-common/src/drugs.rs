//! The closed vocabulary of drugs the analysis backend supports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Drug {
    Codeine,
    Warfarin,
    Clopidogrel,
    Simvastatin,
    Azathioprine,
    Fluorouracil,
}

/// Every supported drug, in the order the selection UI presents them.
pub const SUPPORTED_DRUGS: [Drug; 6] = [
    Drug::Codeine,
    Drug::Warfarin,
    Drug::Clopidogrel,
    Drug::Simvastatin,
    Drug::Azathioprine,
    Drug::Fluorouracil,
];

impl Drug {
    pub fn as_str(&self) -> &'static str {
        match self {
            Drug::Codeine      => "CODEINE",
            Drug::Warfarin     => "WARFARIN",
            Drug::Clopidogrel  => "CLOPIDOGREL",
            Drug::Simvastatin  => "SIMVASTATIN",
            Drug::Azathioprine => "AZATHIOPRINE",
            Drug::Fluorouracil => "FLUOROURACIL",
        }
    }

    /// Comma-separated list of every supported code, e.g. for error messages.
    pub fn supported_list() -> String {
        SUPPORTED_DRUGS
            .iter()
            .map(Drug::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Drug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported drug '{code}'. Supported drugs: {}", Drug::supported_list())]
pub struct ParseDrugError {
    /// The normalised (trimmed, uppercased) code that was rejected.
    pub code: String,
}

impl FromStr for Drug {
    type Err = ParseDrugError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        SUPPORTED_DRUGS
            .iter()
            .copied()
            .find(|d| d.as_str() == code)
            .ok_or(ParseDrugError { code })
    }
}
