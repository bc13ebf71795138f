//! Caching, fail-open overlay around a translation provider.

use dashmap::DashMap;
use serde::Serialize;
use tracing::warn;

use pharmlex_core::{Language, TranslationConfig};
use pharmlex_resolve::{Assembled, ResultRecord};

use crate::provider::TranslationProvider;

/// A result payload tagged with the language it is actually rendered in.
#[derive(Debug, Clone, Serialize)]
pub struct LocalizedResult {
    pub language: Language,
    #[serde(flatten)]
    pub payload: Assembled,
}

/// Wraps a translation provider with a process-lifetime cache.
///
/// The cache is keyed by (source text, target language) and never
/// invalidated: the underlying record text is immutable for the process
/// lifetime. Concurrent first-time requests for the same key may each call
/// the provider; the first insert wins and losing writers adopt its value,
/// so the map never holds more than one value per key.
pub struct TranslationOverlay<P> {
    provider: P,
    cache: DashMap<(String, Language), String>,
    min_chars: usize,
    source_lang: Language,
}

impl<P: TranslationProvider> TranslationOverlay<P> {
    pub fn new(provider: P, config: &TranslationConfig) -> Self {
        Self {
            provider,
            cache: DashMap::new(),
            min_chars: config.min_chars,
            source_lang: config.source_lang,
        }
    }

    /// Translate one text, or return it unchanged.
    ///
    /// Unchanged when the text is empty, the target is the source language,
    /// or the text is too short to be worth translating (short strings are
    /// assumed to be technical tokens). Provider failures degrade to the
    /// original text and are only logged; this is the one operation in the
    /// pipeline allowed to swallow its errors.
    pub async fn translate(&self, text: &str, target: Language) -> String {
        let trimmed = text.trim();
        if target == self.source_lang || trimmed.is_empty() || trimmed.chars().count() < self.min_chars
        {
            return text.to_string();
        }

        let key = (text.to_string(), target);
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }

        match self.provider.translate(text, self.source_lang, target).await {
            Ok(translated) => self.cache.entry(key).or_insert(translated).clone(),
            Err(e) => {
                warn!("Translation unavailable, returning source text: {}", e);
                text.to_string()
            }
        }
    }

    /// Render an assembled payload in the target language.
    ///
    /// Only the four free-text fields are translated; names, synonyms,
    /// products and suggestions stay in the source language. Not-found
    /// payloads and source-language requests pass through untouched.
    pub async fn present(&self, assembled: &Assembled, target: Language) -> LocalizedResult {
        if target == self.source_lang {
            return LocalizedResult {
                language: self.source_lang,
                payload: assembled.clone(),
            };
        }
        match assembled {
            Assembled::NotFound { .. } => LocalizedResult {
                language: self.source_lang,
                payload: assembled.clone(),
            },
            Assembled::Found(record) => {
                let (drug_class, indication, pharmacodynamics, mechanism) = tokio::join!(
                    self.translate(&record.drug_class, target),
                    self.translate(&record.indication, target),
                    self.translate(&record.pharmacodynamics, target),
                    self.translate(&record.mechanism, target),
                );
                LocalizedResult {
                    language: target,
                    payload: Assembled::Found(ResultRecord {
                        id: record.id.clone(),
                        name: record.name.clone(),
                        drug_class,
                        indication,
                        pharmacodynamics,
                        mechanism,
                        synonyms: record.synonyms.clone(),
                        products: record.products.clone(),
                        suggestions: record.suggestions.clone(),
                    }),
                }
            }
        }
    }

    /// Number of cached translations.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use pharmlex_core::Result;

    /// Appends a language marker so translated output is recognizable.
    struct MarkingProvider {
        calls: Arc<AtomicUsize>,
    }

    impl MarkingProvider {
        fn new() -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl TranslationProvider for MarkingProvider {
        async fn translate(&self, text: &str, _source: Language, target: Language) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("[{}] {}", target, text))
        }
    }

    struct FailingProvider;

    impl TranslationProvider for FailingProvider {
        async fn translate(&self, _text: &str, _s: Language, _t: Language) -> Result<String> {
            Err(pharmlex_core::Error::Translation("provider down".into()))
        }
    }

    fn overlay<P: TranslationProvider>(provider: P) -> TranslationOverlay<P> {
        TranslationOverlay::new(provider, &TranslationConfig::default())
    }

    fn aspirin_record() -> Assembled {
        Assembled::Found(ResultRecord {
            id: "DB1".into(),
            name: "Aspirin".into(),
            drug_class: "NSAID".into(),
            indication: "Pain, fever and inflammation".into(),
            pharmacodynamics: "Reduces prostaglandin synthesis".into(),
            mechanism: "Irreversible COX inhibition".into(),
            synonyms: vec!["ASA".into()],
            products: vec!["Aspro".into()],
            suggestions: Vec::new(),
        })
    }

    #[tokio::test]
    async fn test_short_text_returned_untranslated() {
        let ov = overlay(MarkingProvider::new());
        // "NSAID" is 5 chars, below the 10-char minimum
        assert_eq!(ov.translate("NSAID", Language::Th).await, "NSAID");
        assert_eq!(ov.cache_len(), 0);
    }

    #[tokio::test]
    async fn test_source_language_and_empty_skip_provider() {
        let provider = MarkingProvider::new();
        let calls = provider.calls.clone();
        let ov = overlay(provider);
        assert_eq!(
            ov.translate("Reduces prostaglandin synthesis", Language::En).await,
            "Reduces prostaglandin synthesis"
        );
        assert_eq!(ov.translate("", Language::Th).await, "");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_called_once_per_key() {
        let provider = MarkingProvider::new();
        let calls = provider.calls.clone();
        let ov = overlay(provider);

        let first = ov.translate("Irreversible COX inhibition", Language::Th).await;
        let second = ov.translate("Irreversible COX inhibition", Language::Th).await;
        assert_eq!(first, "[th] Irreversible COX inhibition");
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(ov.cache_len(), 1);
    }

    #[tokio::test]
    async fn test_failure_degrades_to_source_text() {
        let ov = overlay(FailingProvider);
        assert_eq!(
            ov.translate("Irreversible COX inhibition", Language::Th).await,
            "Irreversible COX inhibition"
        );
        // Failures are not cached; a later healthy call may still translate
        assert_eq!(ov.cache_len(), 0);
    }

    #[tokio::test]
    async fn test_present_with_failing_provider_is_identity() {
        let ov = overlay(FailingProvider);
        let record = aspirin_record();
        let localized = ov.present(&record, Language::Th).await;
        assert_eq!(localized.payload, record);
    }

    #[tokio::test]
    async fn test_present_translates_long_fields_only() {
        let ov = overlay(MarkingProvider::new());
        let localized = ov.present(&aspirin_record(), Language::Th).await;
        assert_eq!(localized.language, Language::Th);
        let Assembled::Found(record) = localized.payload else {
            panic!("expected found record");
        };
        // Long free-text fields are translated
        assert_eq!(record.indication, "[th] Pain, fever and inflammation");
        assert_eq!(record.mechanism, "[th] Irreversible COX inhibition");
        // Short technical token stays as-is
        assert_eq!(record.drug_class, "NSAID");
        // Names are never translated
        assert_eq!(record.name, "Aspirin");
        assert_eq!(record.synonyms, vec!["ASA"]);
    }

    #[tokio::test]
    async fn test_present_source_language_passthrough() {
        let provider = MarkingProvider::new();
        let calls = provider.calls.clone();
        let ov = overlay(provider);
        let record = aspirin_record();
        let localized = ov.present(&record, Language::En).await;
        assert_eq!(localized.payload, record);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_not_found_passes_through() {
        let ov = overlay(MarkingProvider::new());
        let not_found = Assembled::NotFound {
            suggestions: vec!["Aspirin".into()],
        };
        let localized = ov.present(&not_found, Language::Th).await;
        assert_eq!(localized.payload, not_found);
    }

    #[tokio::test]
    async fn test_concurrent_requests_converge() {
        let provider = MarkingProvider::new();
        let ov = Arc::new(overlay(provider));

        let a = {
            let ov = ov.clone();
            tokio::spawn(
                async move { ov.translate("Reduces prostaglandin synthesis", Language::Th).await },
            )
        };
        let b = {
            let ov = ov.clone();
            tokio::spawn(
                async move { ov.translate("Reduces prostaglandin synthesis", Language::Th).await },
            )
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert_eq!(a, b);
        assert_eq!(ov.cache_len(), 1);
    }
}
