// Trend detection: keyword-overlap similarity and emerging / continuing /
// fading classification against the previous hour's topics.

pub mod classifier;
pub mod similarity;
