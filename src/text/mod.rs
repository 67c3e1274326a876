// Text normalization: tokenizing, stopword removal, lemmatization and
// entity tagging for item titles and bodies.

pub mod lemma;
pub mod normalizer;
pub mod resources;
