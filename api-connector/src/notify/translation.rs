// api-connector/src/notify/translation.rs
// Translator cache keyed by language tag

use crate::error::ClientResult;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Namespace the feedback messages are looked up in
pub const NOTIFICATIONS_NAMESPACE: &str = "notifications";

/// Resolves a translation key to display text
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

/// Lookup table; unknown keys are shown as-is
impl Translator for HashMap<String, String> {
    fn translate(&self, key: &str) -> String {
        self.get(key).cloned().unwrap_or_else(|| key.to_string())
    }
}

/// Source of translators (translation files, remote bundles, ...)
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translator(&self, lang: &str, namespace: &str) -> ClientResult<Arc<dyn Translator>>;
}

/// In-memory translations, `lang -> key -> text`
#[derive(Debug, Clone, Default)]
pub struct StaticTranslations {
    tables: HashMap<String, HashMap<String, String>>,
}

impl StaticTranslations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, lang: impl Into<String>, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.tables
            .entry(lang.into())
            .or_default()
            .insert(key.into(), text.into());
        self
    }
}

#[async_trait]
impl TranslationProvider for StaticTranslations {
    async fn translator(&self, lang: &str, _namespace: &str) -> ClientResult<Arc<dyn Translator>> {
        Ok(Arc::new(self.tables.get(lang).cloned().unwrap_or_default()))
    }
}

/// Translators fetched so far, one per language
///
/// Entries are written once per language and live until [`clear`](Self::clear).
/// Two concurrent misses for the same language both fetch; the later write
/// wins and the values are equal.
pub struct TranslationCache {
    provider: Arc<dyn TranslationProvider>,
    translators: DashMap<String, Arc<dyn Translator>>,
}

impl std::fmt::Debug for TranslationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationCache")
            .field("languages", &self.translators.len())
            .finish()
    }
}

impl TranslationCache {
    pub fn new(provider: Arc<dyn TranslationProvider>) -> Self {
        Self {
            provider,
            translators: DashMap::new(),
        }
    }

    /// Cached translator for `lang`, fetched from the provider on first use
    pub async fn get_or_fetch(&self, lang: &str) -> ClientResult<Arc<dyn Translator>> {
        if let Some(translator) = self.translators.get(lang) {
            return Ok(translator.clone());
        }

        let translator = self
            .provider
            .translator(lang, NOTIFICATIONS_NAMESPACE)
            .await?;
        self.translators.insert(lang.to_string(), translator.clone());
        tracing::debug!(lang = %lang, "Translator cached");
        Ok(translator)
    }

    pub fn contains(&self, lang: &str) -> bool {
        self.translators.contains_key(lang)
    }

    pub fn len(&self) -> usize {
        self.translators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }

    /// Drop every cached translator
    pub fn clear(&self) {
        self.translators.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TranslationProvider for CountingProvider {
        async fn translator(&self, lang: &str, namespace: &str) -> ClientResult<Arc<dyn Translator>> {
            assert_eq!(namespace, NOTIFICATIONS_NAMESPACE);
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut table = HashMap::new();
            table.insert("saved".to_string(), format!("saved ({})", lang));
            Ok(Arc::new(table))
        }
    }

    #[tokio::test]
    async fn test_fetched_once_per_language() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let cache = TranslationCache::new(provider.clone());

        let first = cache.get_or_fetch("pl").await.unwrap();
        let second = cache.get_or_fetch("pl").await.unwrap();
        assert_eq!(first.translate("saved"), "saved (pl)");
        assert_eq!(second.translate("saved"), "saved (pl)");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        cache.get_or_fetch("en").await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(!cache.contains("pl"));
        cache.get_or_fetch("pl").await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_static_translations_fallback_to_key() {
        let provider = StaticTranslations::new().with("pl", "saved", "Zapisano");
        let translator = provider.translator("pl", NOTIFICATIONS_NAMESPACE).await.unwrap();
        assert_eq!(translator.translate("saved"), "Zapisano");
        assert_eq!(translator.translate("missing.key"), "missing.key");

        let other = provider.translator("de", NOTIFICATIONS_NAMESPACE).await.unwrap();
        assert_eq!(other.translate("saved"), "saved");
    }
}
