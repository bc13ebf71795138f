//! Row types for the record store.

use serde::{Deserialize, Serialize};

/// One compound row. All free-text fields may be empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compound {
    pub id: String,
    pub drug_class: String,
    pub mechanism: String,
    pub indication: String,
    pub pharmacodynamics: String,
}

/// The single display name of a compound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalName {
    pub id: String,
    pub display_name: String,
}

/// Which table a name variant came from. Determines its match weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameKind {
    Canonical,
    Synonym,
    Product,
}

/// One name variant row from the bulk listing used to build the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameRow {
    pub id: String,
    pub text: String,
    pub kind: NameKind,
}

/// Import fixture shape: one compound with all of its names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundRecord {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub drug_class: String,
    #[serde(default)]
    pub mechanism: String,
    #[serde(default)]
    pub indication: String,
    #[serde(default)]
    pub pharmacodynamics: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
}
