// Trendline: hourly topic and trend detection for link-aggregator items
//
// This is the library root. Each module corresponds to a stage of the
// analysis pipeline or a piece of the plumbing around it.

pub mod config;
pub mod history;
pub mod ingest;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod status;
pub mod text;
pub mod topics;
pub mod trends;
