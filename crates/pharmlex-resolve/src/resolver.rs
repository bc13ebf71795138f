//! Query resolver — raw user string to resolution outcome.

use tracing::debug;

use pharmlex_core::text::normalize;

use crate::index::PatternIndex;
use crate::types::ResolutionOutcome;

/// Resolve a raw search string against the pattern index.
///
/// Pure and synchronous: a function of the index snapshot only. Exact
/// matches win outright; otherwise the top approximate candidate resolves
/// and all candidates (top included) become the suggestion list. Ties on
/// an exact key break by weight, then lexicographically smallest id.
pub fn resolve(raw: &str, index: &PatternIndex) -> ResolutionOutcome {
    let normalized = normalize(raw);
    if normalized.is_empty() {
        return ResolutionOutcome::no_match();
    }

    let exact = index.lookup_exact(&normalized);
    if let Some(best) = exact.first() {
        debug!("Exact match {:?} -> {}", normalized, best.id);
        return ResolutionOutcome {
            resolved: Some(best.id.clone()),
            suggestions: Vec::new(),
        };
    }

    let candidates = index.lookup_approx(&normalized, index.config().suggestion_limit);
    if candidates.is_empty() {
        debug!("No match for {:?}", normalized);
        return ResolutionOutcome::no_match();
    }

    let resolved = candidates[0].id.clone();
    // lookup_approx returns one candidate per compound, so mapping to
    // display names keeps the list deduplicated by id.
    let suggestions = candidates
        .iter()
        .filter_map(|c| index.display_name(&c.id))
        .map(str::to_string)
        .collect();

    debug!(
        "Approximate match {:?} -> {} ({} suggestions)",
        normalized,
        resolved,
        candidates.len()
    );
    ResolutionOutcome {
        resolved: Some(resolved),
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmlex_core::config::MatchConfig;
    use pharmlex_store::{NameKind, NameRow};

    fn row(id: &str, text: &str, kind: NameKind) -> NameRow {
        NameRow {
            id: id.into(),
            text: text.into(),
            kind,
        }
    }

    fn aspirin_index() -> PatternIndex {
        let rows = vec![
            row("DB1", "Aspirin", NameKind::Canonical),
            row("DB1", "ASA", NameKind::Synonym),
        ];
        PatternIndex::build(&rows, MatchConfig::default())
    }

    #[test]
    fn test_exact_match_resolves_without_suggestions() {
        let index = aspirin_index();
        let outcome = resolve("aspirin", &index);
        assert_eq!(outcome.resolved.as_deref(), Some("DB1"));
        assert!(outcome.suggestions.is_empty());
    }

    #[test]
    fn test_input_is_normalized_before_lookup() {
        let index = aspirin_index();
        let outcome = resolve("  ASPIRIN  ", &index);
        assert_eq!(outcome.resolved.as_deref(), Some("DB1"));
    }

    #[test]
    fn test_typo_resolves_approximately_with_suggestions() {
        let index = aspirin_index();
        let outcome = resolve("aspirinn", &index);
        assert_eq!(outcome.resolved.as_deref(), Some("DB1"));
        assert_eq!(outcome.suggestions, vec!["Aspirin"]);
    }

    #[test]
    fn test_no_match_is_empty_outcome() {
        let index = aspirin_index();
        let outcome = resolve("ibuprofen", &index);
        assert!(outcome.resolved.is_none());
        assert!(outcome.suggestions.is_empty());
    }

    #[test]
    fn test_blank_input_is_no_match() {
        let index = aspirin_index();
        let outcome = resolve("   ", &index);
        assert!(outcome.resolved.is_none());
    }

    #[test]
    fn test_exact_beats_approximate() {
        // "asa" is an exact synonym of DB1 and one edit from canonical
        // "ana" of DB0; the exact hit must win.
        let rows = vec![
            row("DB0", "Ana", NameKind::Canonical),
            row("DB1", "Aspirin", NameKind::Canonical),
            row("DB1", "ASA", NameKind::Synonym),
        ];
        let index = PatternIndex::build(&rows, MatchConfig::default());
        let outcome = resolve("asa", &index);
        assert_eq!(outcome.resolved.as_deref(), Some("DB1"));
        assert!(outcome.suggestions.is_empty());
    }

    #[test]
    fn test_ambiguous_exact_tie_breaks_deterministically() {
        // Same synonym shared by two compounds at equal weight: smallest
        // id wins, every time.
        let rows = vec![
            row("DB9", "Ictus", NameKind::Synonym),
            row("DB2", "Ictus", NameKind::Synonym),
            row("DB9", "Nine", NameKind::Canonical),
            row("DB2", "Two", NameKind::Canonical),
        ];
        let index = PatternIndex::build(&rows, MatchConfig::default());
        for _ in 0..3 {
            let outcome = resolve("ictus", &index);
            assert_eq!(outcome.resolved.as_deref(), Some("DB2"));
        }
    }

    #[test]
    fn test_suggestions_respect_limit() {
        let mut rows = Vec::new();
        for i in 0..8 {
            rows.push(row(
                &format!("DB{i}"),
                &format!("metoprolol{i}"),
                NameKind::Canonical,
            ));
        }
        let index = PatternIndex::build(&rows, MatchConfig::default());
        let outcome = resolve("metoprolol", &index);
        assert!(outcome.resolved.is_some());
        assert_eq!(outcome.suggestions.len(), 5);
    }
}
