//! Data model: segments, articles, and the session noun table.

pub mod article;
pub mod nouns;
pub mod segment;
