// Text normalization: raw item text in, clean keyword-ready tokens out.
//
// Order matters: URLs are stripped before punctuation (otherwise the URL
// would shatter into junk words), stopwords are dropped before lemmatization
// (matching the stopword list's surface forms), and entity tagging happens
// last so it sees the base form ("githubs" -> "github" -> TECH_GITHUB).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

use regex_lite::Regex;
use tracing::{debug, warn};

use super::resources::LanguageResources;
use crate::models::{Item, ProcessedDocument};

/// Prefix marking a token as a known technical entity.
pub const ENTITY_PREFIX: &str = "TECH_";

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("URL pattern is valid"));

static NON_ALPHA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z\s]+").expect("non-alpha pattern is valid"));

/// Turns raw text into a normalized token sequence.
pub struct TextNormalizer {
    resources: Arc<dyn LanguageResources>,
    /// Set once the tokenizer fallback has been reported in the current
    /// batch; cleared at the start of every `process` call.
    degraded_reported: AtomicBool,
}

impl TextNormalizer {
    pub fn new(resources: Arc<dyn LanguageResources>) -> Self {
        Self {
            resources,
            degraded_reported: AtomicBool::new(false),
        }
    }

    /// Normalize a single piece of text. Never fails; empty input gives an
    /// empty token list.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let lower = text.to_lowercase();
        let no_urls = URL_RE.replace_all(&lower, " ");
        let letters_only = NON_ALPHA_RE.replace_all(&no_urls, " ");

        let tokens = match self.resources.tokenize(&letters_only) {
            Ok(tokens) => tokens,
            Err(e) => {
                if !self.degraded_reported.swap(true, Ordering::Relaxed) {
                    warn!(error = %e, "Tokenizer unavailable, falling back to whitespace splitting");
                }
                letters_only
                    .split_whitespace()
                    .map(str::to_string)
                    .collect()
            }
        };

        tokens
            .into_iter()
            .filter(|t| t.len() > 2 && !self.resources.is_stopword(t))
            .map(|t| self.resources.lemmatize(&t))
            .map(|t| {
                if self.resources.is_entity(&t) {
                    format!("{ENTITY_PREFIX}{}", t.to_uppercase())
                } else {
                    t
                }
            })
            .collect()
    }

    /// Whether the tokenizer fell back to whitespace splitting since the
    /// last `process` call started.
    pub fn tokenizer_degraded(&self) -> bool {
        self.degraded_reported.load(Ordering::Relaxed)
    }

    /// Normalize every item's title, body and URL domain.
    pub fn process(&self, items: &[Item]) -> Vec<ProcessedDocument> {
        self.degraded_reported.store(false, Ordering::Relaxed);
        let docs: Vec<ProcessedDocument> = items
            .iter()
            .enumerate()
            .map(|(item_index, item)| ProcessedDocument {
                item_index,
                tokens: self.normalize(&item.combined_text()),
            })
            .collect();

        let empty = docs.iter().filter(|d| d.is_empty()).count();
        debug!(
            documents = docs.len(),
            empty,
            degraded = self.tokenizer_degraded(),
            "Normalized item batch"
        );
        docs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::resources::EnglishResources;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new(Arc::new(EnglishResources::load()))
    }

    #[test]
    fn empty_text_gives_no_tokens() {
        let n = normalizer();
        assert!(n.normalize("").is_empty());
        assert!(n.normalize("   ").is_empty());
    }

    #[test]
    fn urls_numbers_and_punctuation_stripped() {
        let n = normalizer();
        let tokens = n.normalize("Compilers 2024!! https://example.com/compilers?x=1");
        assert_eq!(tokens, vec!["compiler"]);
    }

    #[test]
    fn short_tokens_and_stopwords_dropped() {
        let n = normalizer();
        let tokens = n.normalize("The new compiler is an ok tool");
        assert!(tokens.contains(&"compiler".to_string()));
        assert!(!tokens.iter().any(|t| t == "the" || t == "new" || t == "ok" || t == "is"));
    }

    #[test]
    fn entities_tagged_after_lemmatizing() {
        let n = normalizer();
        let tokens = n.normalize("Rust compilers");
        assert_eq!(tokens, vec!["TECH_RUST", "compiler"]);
    }

    #[test]
    fn tokenizer_failure_falls_back_to_whitespace() {
        let n = TextNormalizer::new(Arc::new(EnglishResources::with_token_pattern("(")));
        let tokens = n.normalize("Rust compilers");
        assert_eq!(tokens, vec!["TECH_RUST", "compiler"]);
    }
}
