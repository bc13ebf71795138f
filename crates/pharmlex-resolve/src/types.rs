//! Resolution and result types.

use serde::{Deserialize, Serialize};

/// The result of matching a user query against the pattern index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionOutcome {
    /// Winning compound id, or None when nothing matched.
    pub resolved: Option<String>,
    /// Alternative candidates as display names, deduplicated by compound id.
    /// Empty on an exact match and on a no-match.
    pub suggestions: Vec<String>,
}

impl ResolutionOutcome {
    pub fn no_match() -> Self {
        Self {
            resolved: None,
            suggestions: Vec::new(),
        }
    }
}

/// Fully assembled source-language payload for one compound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: String,
    pub name: String,
    pub drug_class: String,
    pub indication: String,
    pub pharmacodynamics: String,
    pub mechanism: String,
    pub synonyms: Vec<String>,
    pub products: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Response payload: a found record or a not-found carrying suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Assembled {
    Found(ResultRecord),
    NotFound { suggestions: Vec<String> },
}
