// Language resources: the stopword set, tokenizer, lemmatizer and entity
// list the normalizer depends on.
//
// These are injected at construction time rather than looked up globally:
// production wiring builds `EnglishResources` once at startup, tests hand
// the normalizer a tiny deterministic fixture.

use std::collections::HashSet;

use anyhow::Result;
use regex_lite::Regex;
use stop_words::{get, LANGUAGE};
use tracing::warn;

use super::lemma::Lemmatizer;

/// Generic technology filler that says nothing about what a story is about.
pub const TECH_STOP_WORDS: &[&str] = &[
    "use",
    "using",
    "used",
    "new",
    "data",
    "create",
    "like",
    "simple",
    "build",
    "building",
    "built",
    "tech",
    "technology",
];

/// Languages, companies and domain acronyms that get tagged in keyword output.
pub const TECH_ENTITIES: &[&str] = &[
    "javascript",
    "python",
    "java",
    "cpp",
    "rust",
    "golang",
    "go",
    "typescript",
    "react",
    "angular",
    "vue",
    "node",
    "nodejs",
    "django",
    "flask",
    "ai",
    "ml",
    "deeplearning",
    "machinelearning",
    "llm",
    "gpt",
    "openai",
    "github",
    "aws",
    "azure",
    "google",
    "microsoft",
    "apple",
    "facebook",
    "meta",
    "amazon",
    "blockchain",
    "crypto",
    "bitcoin",
    "ethereum",
    "nft",
    "web3",
    "frontend",
    "backend",
    "fullstack",
    "devops",
    "database",
    "api",
];

/// Default word pattern: runs of ASCII letters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"[a-z]+";

/// Everything the normalizer needs to know about a language.
pub trait LanguageResources: Send + Sync {
    /// Split cleaned text into word tokens. An error means the tokenizer is
    /// unavailable and the caller should fall back to whitespace splitting.
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;

    fn is_stopword(&self, token: &str) -> bool;

    /// Reduce a token to its dictionary base form.
    fn lemmatize(&self, token: &str) -> String;

    /// Whether a (lemmatized) token is a known technical entity.
    fn is_entity(&self, token: &str) -> bool;
}

/// English resources: the `stop-words` list plus tech filler, a regex word
/// tokenizer and the rule-based lemmatizer.
pub struct EnglishResources {
    stop_words: HashSet<String>,
    entities: HashSet<String>,
    tokenizer: Option<Regex>,
    lemmatizer: Lemmatizer,
}

impl EnglishResources {
    /// Load with the default tokenizer pattern.
    pub fn load() -> Self {
        Self::with_token_pattern(DEFAULT_TOKEN_PATTERN)
    }

    /// Load with a custom tokenizer pattern. An invalid pattern leaves the
    /// tokenizer unavailable, which the normalizer degrades around.
    pub fn with_token_pattern(pattern: &str) -> Self {
        let tokenizer = match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(pattern, error = %e, "Invalid token pattern, word tokenizer unavailable");
                None
            }
        };

        let mut stop_words: HashSet<String> = get(LANGUAGE::English).into_iter().collect();
        stop_words.extend(TECH_STOP_WORDS.iter().map(|w| w.to_string()));

        Self {
            stop_words,
            entities: TECH_ENTITIES.iter().map(|w| w.to_string()).collect(),
            tokenizer,
            lemmatizer: Lemmatizer::default(),
        }
    }
}

impl LanguageResources for EnglishResources {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let Some(re) = &self.tokenizer else {
            anyhow::bail!("word tokenizer unavailable");
        };
        Ok(re.find_iter(text).map(|m| m.as_str().to_string()).collect())
    }

    fn is_stopword(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    fn lemmatize(&self, token: &str) -> String {
        self.lemmatizer.lemmatize(token)
    }

    fn is_entity(&self, token: &str) -> bool {
        self.entities.contains(token)
    }
}
