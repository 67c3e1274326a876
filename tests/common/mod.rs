// Shared fixtures for integration tests.
//
// `FixtureResources` is a tiny deterministic stand-in for the English
// resources: whitespace tokenizer, a handful of stopwords, plural "s"
// stripping, and a configurable entity list.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;

use trendline::history::HistoricalStore;
use trendline::models::{Item, TopicDescriptor};
use trendline::pipeline::engine::{EngineConfig, TopicEngine};
use trendline::text::resources::LanguageResources;

pub struct FixtureResources {
    stop_words: HashSet<&'static str>,
    entities: HashSet<&'static str>,
    tokenizer_broken: bool,
}

impl FixtureResources {
    pub fn new() -> Self {
        Self {
            stop_words: ["the", "and", "for", "with", "how", "why", "what", "show", "ask"]
                .into_iter()
                .collect(),
            entities: HashSet::new(),
            tokenizer_broken: false,
        }
    }

    pub fn with_entities(mut self, entities: &[&'static str]) -> Self {
        self.entities = entities.iter().copied().collect();
        self
    }

    /// Resources whose tokenizer always fails.
    pub fn broken_tokenizer() -> Self {
        Self {
            tokenizer_broken: true,
            ..Self::new()
        }
    }
}

impl LanguageResources for FixtureResources {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        if self.tokenizer_broken {
            anyhow::bail!("fixture tokenizer disabled");
        }
        Ok(text.split_whitespace().map(str::to_string).collect())
    }

    fn is_stopword(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    fn lemmatize(&self, token: &str) -> String {
        match token.strip_suffix('s') {
            Some(stem) if stem.len() > 2 && !stem.ends_with('s') => stem.to_string(),
            _ => token.to_string(),
        }
    }

    fn is_entity(&self, token: &str) -> bool {
        self.entities.contains(token)
    }
}

pub fn engine(history: HistoricalStore) -> TopicEngine {
    TopicEngine::new(
        EngineConfig::default(),
        Arc::new(FixtureResources::new()),
        history,
    )
}

pub fn items(titles: &[&str]) -> Vec<Item> {
    titles
        .iter()
        .enumerate()
        .map(|(i, t)| Item::titled(i as u64 + 1, t))
        .collect()
}

pub fn topic(id: usize, keywords: &[(&str, f64)], size: usize) -> TopicDescriptor {
    TopicDescriptor {
        id,
        keywords: keywords.iter().map(|(t, w)| (t.to_string(), *w)).collect(),
        size,
    }
}
