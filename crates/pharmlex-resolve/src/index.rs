//! Pattern index — normalized name variants mapped to compound ids.
//!
//! Built once from the record store's bulk name listing and immutable
//! afterwards, so concurrent readers need no locking. The index is a
//! derived cache of the store; rebuilding it is the only way it changes.

use std::collections::{BTreeMap, HashMap, HashSet};

use levenshtein_automata::{Distance, LevenshteinAutomatonBuilder, DFA};
use tracing::{debug, info};

use pharmlex_core::config::MatchConfig;
use pharmlex_core::text::normalize;
use pharmlex_store::{NameKind, NameRow};

/// One owner of a normalized match key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternEntry {
    pub id: String,
    pub weight: u32,
}

/// An approximate-lookup candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproxMatch {
    pub id: String,
    pub weight: u32,
    pub distance: u32,
}

/// Immutable mapping from normalized name variants to compound ids.
pub struct PatternIndex {
    /// Match key → all owners, ordered by descending weight then id.
    entries: HashMap<String, Vec<PatternEntry>>,
    /// All distinct keys, sorted, for deterministic approximate scans.
    keys: Vec<String>,
    /// Compound id → canonical display name, for suggestion lists.
    display_names: HashMap<String, String>,
    /// Precomputed DFA builders per edit-distance budget. Building one is
    /// far more expensive than walking a DFA, so they are made here rather
    /// than per query.
    builders: BTreeMap<u8, LevenshteinAutomatonBuilder>,
    config: MatchConfig,
}

impl PatternIndex {
    /// Build the index from every canonical name, synonym and product row.
    pub fn build(rows: &[NameRow], config: MatchConfig) -> Self {
        let mut entries: HashMap<String, Vec<PatternEntry>> = HashMap::new();
        let mut display_names: HashMap<String, String> = HashMap::new();

        for row in rows {
            let key = normalize(&row.text);
            if key.is_empty() {
                continue;
            }
            let weight = match row.kind {
                NameKind::Canonical => config.canonical_weight,
                NameKind::Synonym => config.synonym_weight,
                NameKind::Product => config.product_weight,
            };
            if row.kind == NameKind::Canonical {
                display_names.insert(row.id.clone(), row.text.clone());
            }

            // A key may be owned by several compounds (shared historical
            // synonyms); all owners are retained. The same compound under
            // the same key keeps its strongest source.
            let slot = entries.entry(key).or_default();
            match slot.iter_mut().find(|e| e.id == row.id) {
                Some(existing) => existing.weight = existing.weight.max(weight),
                None => slot.push(PatternEntry {
                    id: row.id.clone(),
                    weight,
                }),
            }
        }

        for slot in entries.values_mut() {
            slot.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.id.cmp(&b.id)));
        }

        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();

        let lo = config.base_edit_distance.clamp(1, config.edit_distance_cap.max(1));
        let hi = config.edit_distance_cap.max(lo);
        let mut builders = BTreeMap::new();
        for d in lo..=hi {
            builders.insert(d, LevenshteinAutomatonBuilder::new(d, false));
        }

        info!(
            "Pattern index built: {} keys, {} compounds",
            keys.len(),
            display_names.len()
        );

        Self {
            entries,
            keys,
            display_names,
            builders,
            config,
        }
    }

    /// All owners of an exactly matching key, strongest first.
    pub fn lookup_exact(&self, normalized: &str) -> &[PatternEntry] {
        self.entries
            .get(normalized)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Up to `limit` candidates whose key is close to the input: a
    /// substring relation in either direction, or within the edit-distance
    /// budget for the input's length. Ordered by ascending distance, then
    /// descending weight, then key, then id; one entry per compound.
    pub fn lookup_approx(&self, normalized: &str, limit: usize) -> Vec<ApproxMatch> {
        if normalized.is_empty() || limit == 0 {
            return Vec::new();
        }

        let input_chars = normalized.chars().count();
        let budget = self.config.edit_budget(input_chars);
        let dfa: Option<DFA> = self
            .builders
            .range(..=budget)
            .next_back()
            .map(|(_, b)| b.build_dfa(normalized));

        // (distance, weight, key, id)
        let mut candidates: Vec<(u32, u32, &str, &str)> = Vec::new();
        for key in &self.keys {
            let key_chars = key.chars().count();
            let distance = if key.contains(normalized) || normalized.contains(key.as_str()) {
                // Pure insertions in one direction or the other.
                key_chars.abs_diff(input_chars) as u32
            } else if let Some(dfa) = &dfa {
                let mut state = dfa.initial_state();
                for &byte in key.as_bytes() {
                    state = dfa.transition(state, byte);
                }
                match dfa.distance(state) {
                    Distance::Exact(d) => d as u32,
                    Distance::AtLeast(_) => continue,
                }
            } else {
                continue;
            };
            for entry in &self.entries[key] {
                candidates.push((distance, entry.weight, key.as_str(), entry.id.as_str()));
            }
        }

        candidates.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| b.1.cmp(&a.1))
                .then_with(|| a.2.cmp(b.2))
                .then_with(|| a.3.cmp(b.3))
        });

        let mut seen: HashSet<&str> = HashSet::new();
        let mut out = Vec::new();
        for (distance, weight, _key, id) in candidates {
            if seen.insert(id) {
                out.push(ApproxMatch {
                    id: id.to_string(),
                    weight,
                    distance,
                });
                if out.len() == limit {
                    break;
                }
            }
        }
        debug!(
            "Approximate lookup for {:?}: {} candidates (budget {})",
            normalized,
            out.len(),
            budget
        );
        out
    }

    /// Canonical display name of a compound, for suggestion lists.
    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.display_names.get(id).map(String::as_str)
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Number of distinct match keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
