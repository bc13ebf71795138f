//! Result assembler — joins a resolution outcome against the record store.

use tracing::error;

use pharmlex_core::text::strip_tags;
use pharmlex_core::{Error, Result};
use pharmlex_store::RecordStore;

use crate::types::{Assembled, ResolutionOutcome, ResultRecord};

/// Produce the response payload for a resolution outcome.
///
/// A missing resolution yields a not-found payload carrying only the
/// suggestion list. A resolved id whose backing rows are gone is an
/// internal consistency fault, not a user-facing no-match: the index is
/// derived from the store and must never disagree with it.
pub fn assemble(outcome: &ResolutionOutcome, store: &RecordStore) -> Result<Assembled> {
    let Some(id) = outcome.resolved.as_deref() else {
        return Ok(Assembled::NotFound {
            suggestions: outcome.suggestions.clone(),
        });
    };

    let compound = store.get_compound(id)?;
    let canonical = store.get_canonical_name(id)?;
    let (Some(compound), Some(canonical)) = (compound, canonical) else {
        error!("Resolved id {} has no backing rows in the record store", id);
        return Err(Error::StoreInconsistency(id.to_string()));
    };

    let synonyms = dedup_preserving_order(store.list_synonyms(id)?);
    let products = dedup_preserving_order(store.list_products(id)?);

    Ok(Assembled::Found(ResultRecord {
        id: compound.id,
        name: canonical.display_name,
        drug_class: strip_tags(&compound.drug_class),
        indication: strip_tags(&compound.indication),
        pharmacodynamics: strip_tags(&compound.pharmacodynamics),
        mechanism: strip_tags(&compound.mechanism),
        synonyms,
        products,
        suggestions: outcome.suggestions.clone(),
    }))
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|s| seen.insert(s.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmlex_store::CompoundRecord;

    fn seeded_store() -> (RecordStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("pharmlex.db")).unwrap();
        store
            .insert_record(&CompoundRecord {
                id: "DB1".into(),
                display_name: "Aspirin".into(),
                drug_class: "<b>NSAID</b>".into(),
                mechanism: "Irreversible <i>COX</i> inhibition".into(),
                indication: "Pain and fever".into(),
                pharmacodynamics: "Reduces prostaglandin synthesis".into(),
                synonyms: vec!["ASA".into(), "ASA".into(), "Acetylsalicylic acid".into()],
                products: vec!["Aspro".into()],
            })
            .unwrap();
        (store, dir)
    }

    #[test]
    fn test_assemble_found_record() {
        let (store, _dir) = seeded_store();
        let outcome = ResolutionOutcome {
            resolved: Some("DB1".into()),
            suggestions: Vec::new(),
        };
        let Assembled::Found(record) = assemble(&outcome, &store).unwrap() else {
            panic!("expected found record");
        };
        assert_eq!(record.name, "Aspirin");
        assert_eq!(record.drug_class, "NSAID");
        assert_eq!(record.mechanism, "Irreversible COX inhibition");
        // Duplicates collapsed, insertion order kept
        assert_eq!(record.synonyms, vec!["ASA", "Acetylsalicylic acid"]);
        assert_eq!(record.products, vec!["Aspro"]);
    }

    #[test]
    fn test_assemble_not_found_carries_suggestions() {
        let (store, _dir) = seeded_store();
        let outcome = ResolutionOutcome {
            resolved: None,
            suggestions: vec!["Aspirin".into()],
        };
        let assembled = assemble(&outcome, &store).unwrap();
        assert_eq!(
            assembled,
            Assembled::NotFound {
                suggestions: vec!["Aspirin".into()]
            }
        );
    }

    #[test]
    fn test_dangling_id_is_inconsistency_not_no_match() {
        let (store, _dir) = seeded_store();
        let outcome = ResolutionOutcome {
            resolved: Some("DB404".into()),
            suggestions: Vec::new(),
        };
        let err = assemble(&outcome, &store).unwrap_err();
        assert!(matches!(err, Error::StoreInconsistency(id) if id == "DB404"));
    }
}
