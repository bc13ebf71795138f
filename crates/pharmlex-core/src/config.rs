//! Configuration for matching and translation.
//!
//! Every tunable that affects ranking (source weights, distance thresholds,
//! suggestion limit) or translation behavior lives here so deployments can
//! adjust behavior through the environment without a code change.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Weighting and distance thresholds for the pattern index and resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Weight of an exact canonical-name pattern.
    pub canonical_weight: u32,
    /// Weight of a synonym pattern.
    pub synonym_weight: u32,
    /// Weight of a marketed-product pattern.
    pub product_weight: u32,
    /// Maximum number of alternative candidates returned per query.
    pub suggestion_limit: usize,
    /// Inputs shorter than this many chars get `base_edit_distance`.
    pub short_input_chars: usize,
    /// One extra edit is allowed per this many chars beyond the short limit.
    pub chars_per_extra_edit: usize,
    /// Edit-distance budget for short inputs.
    pub base_edit_distance: u8,
    /// Hard cap on the edit-distance budget. DFA tables beyond distance 3
    /// are impractically large to build.
    pub edit_distance_cap: u8,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            canonical_weight: 3,
            synonym_weight: 2,
            product_weight: 1,
            suggestion_limit: 5,
            short_input_chars: 12,
            chars_per_extra_edit: 8,
            base_edit_distance: 2,
            edit_distance_cap: 3,
        }
    }
}

impl MatchConfig {
    /// Edit-distance budget for an input of `input_chars` characters.
    pub fn edit_budget(&self, input_chars: usize) -> u8 {
        let mut budget = self.base_edit_distance;
        if input_chars >= self.short_input_chars {
            let extra = (input_chars - self.short_input_chars) / self.chars_per_extra_edit + 1;
            budget = budget.saturating_add(extra.min(u8::MAX as usize) as u8);
        }
        budget.min(self.edit_distance_cap)
    }
}

/// Translation overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Translation API endpoint (LibreTranslate-compatible).
    pub endpoint: String,
    /// Optional API key sent with each request.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Strings shorter than this (after trimming) are assumed to be
    /// technical tokens and returned untranslated.
    pub min_chars: usize,
    /// The language the record store is written in.
    pub source_lang: Language,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://libretranslate.com/translate".to_string(),
            api_key: None,
            timeout_secs: 5,
            min_chars: 10,
            source_lang: Language::En,
        }
    }
}

/// Top-level PharmLex configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PharmLexConfig {
    /// Path to the SQLite record store.
    pub db_path: PathBuf,
    pub matching: MatchConfig,
    pub translation: TranslationConfig,
}

impl PharmLexConfig {
    /// Build configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let db_path = std::env::var("PHARMLEX_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/pharmlex.db"));

        let mut matching = MatchConfig::default();
        if let Some(v) = env_parse("PHARMLEX_CANONICAL_WEIGHT") {
            matching.canonical_weight = v;
        }
        if let Some(v) = env_parse("PHARMLEX_SYNONYM_WEIGHT") {
            matching.synonym_weight = v;
        }
        if let Some(v) = env_parse("PHARMLEX_PRODUCT_WEIGHT") {
            matching.product_weight = v;
        }
        if let Some(v) = env_parse("PHARMLEX_SUGGESTION_LIMIT") {
            matching.suggestion_limit = v;
        }
        if let Some(v) = env_parse("PHARMLEX_EDIT_DISTANCE") {
            matching.base_edit_distance = v;
        }

        let mut translation = TranslationConfig::default();
        if let Ok(v) = std::env::var("PHARMLEX_TRANSLATE_ENDPOINT") {
            translation.endpoint = v;
        }
        if let Ok(v) = std::env::var("PHARMLEX_TRANSLATE_API_KEY") {
            translation.api_key = Some(v);
        }
        if let Some(v) = env_parse("PHARMLEX_TRANSLATE_TIMEOUT_SECS") {
            translation.timeout_secs = v;
        }
        if let Some(v) = env_parse("PHARMLEX_TRANSLATE_MIN_CHARS") {
            translation.min_chars = v;
        }

        Self {
            db_path,
            matching,
            translation,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
