//! Supported display languages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Languages a result record can be rendered in.
///
/// `En` is the source language of the record store; everything else is
/// produced by the translation overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Th,
}

impl Language {
    /// ISO 639-1 code, as sent to the translation provider.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Th => "th",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "th" => Ok(Language::Th),
            other => Err(Error::Config(format!("unsupported language: {other}"))),
        }
    }
}
