use serde::Serialize;

use super::nouns::{NounEvent, NounTable};
use super::segment::Segment;
use crate::core::render::{RenderError, StyleConfig};

/// A titled run of segments within an edition.
///
/// Articles never hold a reference to their edition; the noun table is
/// passed in whenever text is resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub headline: String,
    pub segments: Vec<Segment>,
}

impl Article {
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            segments: Vec::new(),
        }
    }

    /// Indices of the fillable segments, in segment order.
    pub fn fillable_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| segment.is_fillable())
            .map(|(index, _)| index)
    }

    /// Concatenated resolved text of every segment.
    pub fn full_text(
        &self,
        nouns: &NounTable,
        style: &StyleConfig,
        include_styling: bool,
    ) -> Result<String, RenderError> {
        let mut text = String::new();
        for segment in &self.segments {
            text.push_str(&segment.full_text(nouns, style, include_styling)?);
        }
        Ok(text)
    }

    /// Reset every segment, collecting the noun events to apply.
    pub fn reset(&mut self) -> Vec<NounEvent> {
        self.segments
            .iter_mut()
            .filter_map(Segment::reset)
            .collect()
    }
}
