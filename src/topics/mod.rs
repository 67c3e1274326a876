// Topic detection: TF-IDF vectorization, dimensionality reduction,
// adaptive clustering and keyword summarization.

pub mod cluster;
pub mod reduce;
pub mod summarize;
pub mod traits;
pub mod vectorizer;
