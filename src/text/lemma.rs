// Rule-based English lemmatizer.
//
// Reduces plural nouns to their dictionary form ("libraries" -> "library",
// "patches" -> "patch", "sizes" -> "size") so keyword lists stay readable.
// "es" is only dropped after a sibilant that needs it (ch, sh, ss, x, zz);
// base forms the suffix rules would mangle live in the tables below.

use std::collections::{HashMap, HashSet};

/// Irregular plural -> singular forms that suffix rules would get wrong.
const IRREGULAR: &[(&str, &str)] = &[
    ("children", "child"),
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("theses", "thesis"),
    ("hypotheses", "hypothesis"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("lives", "life"),
    ("knives", "knife"),
    ("wives", "wife"),
    ("leaves", "leaf"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("wolves", "wolf"),
    ("quizzes", "quiz"),
    ("buses", "bus"),
    ("goes", "go"),
    ("heroes", "hero"),
    ("potatoes", "potato"),
    ("tomatoes", "tomato"),
    ("echoes", "echo"),
    ("vetoes", "veto"),
];

/// Base forms ending in "ie" or "che" whose plural only adds "s".
const PLAIN_S_NOUNS: &[&str] = &[
    "cookie",
    "movie",
    "zombie",
    "rookie",
    "selfie",
    "goalie",
    "hoodie",
    "genie",
    "calorie",
    "brownie",
    "smoothie",
    "freebie",
    "newbie",
    "techie",
    "foodie",
    "indie",
    "prairie",
    "cache",
    "headache",
    "niche",
    "avalanche",
    "cliche",
    "quiche",
    "mustache",
    "moustache",
    "psyche",
];

/// Words that end in "s" but are already in base form.
const INVARIANT: &[&str] = &[
    "news",
    "series",
    "species",
    "kubernetes",
    "always",
    "perhaps",
    "physics",
    "mathematics",
    "analytics",
    "graphics",
    "economics",
    "politics",
    "ethics",
    "robotics",
    "electronics",
    "logistics",
    "statistics",
    "diagnostics",
    "linguistics",
    "mars",
    "chaos",
    "canvas",
    "atlas",
    "alias",
    "bias",
    "gas",
    "yes",
    "thus",
    "bus",
    "plus",
    "ios",
    "macos",
    "redis",
    "postgres",
    "aws",
    "dns",
    "css",
    "lens",
];

/// Plural endings where the "es" belongs to the suffix, not the stem.
const SIBILANT_PLURALS: &[&str] = &["sses", "ches", "shes", "xes", "zzes"];

/// Noun lemmatizer with an irregular-form table and suffix rules.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    irregular: HashMap<&'static str, &'static str>,
    plain_s: HashSet<&'static str>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self {
            irregular: IRREGULAR.iter().copied().collect(),
            plain_s: PLAIN_S_NOUNS.iter().copied().collect(),
        }
    }
}

impl Lemmatizer {
    /// Return the base form of a lowercase token.
    pub fn lemmatize(&self, word: &str) -> String {
        if let Some(base) = self.irregular.get(word) {
            return (*base).to_string();
        }
        if word.len() <= 3 || INVARIANT.contains(&word) {
            return word.to_string();
        }

        if let Some(stem) = word.strip_suffix('s') {
            if self.plain_s.contains(stem) {
                return stem.to_string();
            }
        }

        if let Some(stem) = word.strip_suffix("ies") {
            if stem.len() >= 2 {
                return format!("{stem}y");
            }
        }
        if SIBILANT_PLURALS.iter().any(|suffix| word.ends_with(suffix)) {
            return word[..word.len() - 2].to_string();
        }
        if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
            return word.to_string();
        }
        if let Some(stem) = word.strip_suffix('s') {
            return stem.to_string();
        }

        word.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_plurals() {
        let l = Lemmatizer::default();
        assert_eq!(l.lemmatize("compilers"), "compiler");
        assert_eq!(l.lemmatize("libraries"), "library");
        assert_eq!(l.lemmatize("patches"), "patch");
        assert_eq!(l.lemmatize("boxes"), "box");
        assert_eq!(l.lemmatize("processes"), "process");
        assert_eq!(l.lemmatize("databases"), "database");
        assert_eq!(l.lemmatize("crashes"), "crash");
        assert_eq!(l.lemmatize("buzzes"), "buzz");
    }

    #[test]
    fn e_endings_are_kept() {
        let l = Lemmatizer::default();
        assert_eq!(l.lemmatize("sizes"), "size");
        assert_eq!(l.lemmatize("prizes"), "prize");
        assert_eq!(l.lemmatize("headaches"), "headache");
        assert_eq!(l.lemmatize("niches"), "niche");
        assert_eq!(l.lemmatize("rookies"), "rookie");
        assert_eq!(l.lemmatize("selfies"), "selfie");
        assert_eq!(l.lemmatize("cookies"), "cookie");
    }

    #[test]
    fn base_forms_unchanged() {
        let l = Lemmatizer::default();
        assert_eq!(l.lemmatize("class"), "class");
        assert_eq!(l.lemmatize("virus"), "virus");
        assert_eq!(l.lemmatize("analysis"), "analysis");
        assert_eq!(l.lemmatize("news"), "news");
        assert_eq!(l.lemmatize("kubernetes"), "kubernetes");
        assert_eq!(l.lemmatize("rust"), "rust");
        assert_eq!(l.lemmatize("gas"), "gas");
    }

    #[test]
    fn irregular_forms() {
        let l = Lemmatizer::default();
        assert_eq!(l.lemmatize("people"), "person");
        assert_eq!(l.lemmatize("indices"), "index");
        assert_eq!(l.lemmatize("caches"), "cache");
        assert_eq!(l.lemmatize("goes"), "go");
        assert_eq!(l.lemmatize("quizzes"), "quiz");
        assert_eq!(l.lemmatize("lens"), "lens");
    }
}
