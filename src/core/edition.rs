/// Compiled edition: articles, the fillable registry, and the
/// session noun table.

use rand::Rng;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

use super::compiler::{self, CompileError};
use super::graph;
use super::render::{RenderError, StyleConfig};
use super::scheduler::{self, ScheduleError};
use crate::schema::article::Article;
use crate::schema::nouns::{NounError, NounEvent, NounTable};
use crate::schema::segment::{FillableId, FillableSegment, Segment, SegmentError, SegmentId};

#[derive(Debug, Error)]
pub enum EditionError {
    #[error("no fillable segment with id {0:?}")]
    UnknownFillable(FillableId),
    #[error("no segment at {0:?}")]
    UnknownSegment(SegmentId),
    #[error("no article at index {0}")]
    UnknownArticle(usize),
    #[error("segment error: {0}")]
    Segment(#[from] SegmentError),
    #[error("noun error: {0}")]
    Noun(#[from] NounError),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Publication fields from the document header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditionHeader {
    pub name: String,
    pub issue_number: String,
    pub date: String,
}

/// One compiled newspaper document.
///
/// The parsed structure is fixed after compilation. Selections and the
/// noun table are per-session state, cleared by [`Edition::reset`] so the
/// same edition can be played again.
#[derive(Debug, Clone, Serialize)]
pub struct Edition {
    header: EditionHeader,
    articles: Vec<Article>,
    /// Every fillable segment, article order then segment order.
    fillables: Vec<SegmentId>,
    #[serde(skip)]
    nouns: NounTable,
    #[serde(skip)]
    style: StyleConfig,
}

impl Edition {
    /// Compile an edition from document text.
    pub fn compile(source: &str) -> Result<Edition, CompileError> {
        compiler::compile(source)
    }

    /// Compile an edition from a document file.
    pub fn load(path: &Path) -> Result<Edition, CompileError> {
        let contents = std::fs::read_to_string(path)?;
        Self::compile(&contents)
    }

    /// Validate noun bindings, build the fillable registry, and link
    /// dependents. Runs once per edition.
    pub(crate) fn assemble(
        header: EditionHeader,
        articles: Vec<Article>,
    ) -> Result<Edition, CompileError> {
        graph::check_bindings(&articles)?;

        let fillables: Vec<SegmentId> = articles
            .iter()
            .enumerate()
            .flat_map(|(article, a)| {
                a.fillable_indices()
                    .map(move |segment| SegmentId { article, segment })
            })
            .collect();

        let mut edition = Edition {
            header,
            articles,
            fillables,
            nouns: NounTable::new(),
            style: StyleConfig::default(),
        };

        let dependents = graph::build_dependents(&edition.fillable_segments());
        for (index, links) in dependents.into_iter().enumerate() {
            if let Some(fillable) = edition.fillable_slot(FillableId(index)) {
                fillable.set_dependents(links);
            }
        }

        tracing::debug!(
            name = %edition.header.name,
            articles = edition.articles.len(),
            fillables = edition.fillables.len(),
            "edition compiled"
        );
        Ok(edition)
    }

    pub fn header(&self) -> &EditionHeader {
        &self.header
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn issue_number(&self) -> &str {
        &self.header.issue_number
    }

    pub fn date(&self) -> &str {
        &self.header.date
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn nouns(&self) -> &NounTable {
        &self.nouns
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn set_style(&mut self, style: StyleConfig) {
        self.style = style;
    }

    pub fn fillable_count(&self) -> usize {
        self.fillables.len()
    }

    /// Registry ids in insertion order.
    pub fn fillable_ids(&self) -> impl Iterator<Item = FillableId> {
        (0..self.fillables.len()).map(FillableId)
    }

    pub fn location(&self, id: FillableId) -> Option<SegmentId> {
        self.fillables.get(id.0).copied()
    }

    pub fn segment(&self, at: SegmentId) -> Option<&Segment> {
        self.articles.get(at.article)?.segments.get(at.segment)
    }

    pub fn fillable(&self, id: FillableId) -> Option<&FillableSegment> {
        self.segment(self.location(id)?)?.as_fillable()
    }

    /// Fillable segments in registry order.
    pub fn fillable_segments(&self) -> Vec<&FillableSegment> {
        self.fillable_ids()
            .filter_map(|id| self.fillable(id))
            .collect()
    }

    /// The fillable segment whose blank binds `noun`.
    pub fn producer_of(&self, noun: &str) -> Option<FillableId> {
        graph::producers(&self.fillable_segments()).get(noun).copied()
    }

    fn fillable_slot(&mut self, id: FillableId) -> Option<&mut FillableSegment> {
        let at = self.location(id)?;
        self.articles
            .get_mut(at.article)?
            .segments
            .get_mut(at.segment)?
            .as_fillable_mut()
    }

    /// Choose an option for a blank and record its noun, if it binds one.
    /// The returned event is what was applied to the noun table.
    pub fn select_option(
        &mut self,
        id: FillableId,
        index: usize,
    ) -> Result<Option<NounEvent>, EditionError> {
        let fillable = self.fillable(id).ok_or(EditionError::UnknownFillable(id))?;
        if let Some(noun) = fillable.bound_noun() {
            if self.nouns.contains(noun) {
                return Err(NounError::DuplicateNoun(noun.to_string()).into());
            }
        }

        let fillable = self
            .fillable_slot(id)
            .ok_or(EditionError::UnknownFillable(id))?;
        let event = fillable.select(index)?;
        if let Some(event) = &event {
            self.nouns.apply(event)?;
        }
        Ok(event)
    }

    /// Clear a blank's selection and release its noun.
    pub fn reset_segment(&mut self, id: FillableId) -> Result<Option<NounEvent>, EditionError> {
        let fillable = self
            .fillable_slot(id)
            .ok_or(EditionError::UnknownFillable(id))?;
        let event = fillable.reset();
        if let Some(event) = &event {
            self.nouns.apply(event)?;
        }
        Ok(event)
    }

    /// Clear every selection and the noun table, keeping the parsed
    /// structure for the next session.
    pub fn reset(&mut self) {
        for article in &mut self.articles {
            article.reset();
        }
        self.nouns.clear();
    }

    /// True once every blank has a chosen option.
    pub fn is_complete(&self) -> bool {
        self.articles
            .iter()
            .flat_map(|article| article.segments.iter())
            .all(Segment::is_text_valid)
    }

    pub fn segment_text(&self, at: SegmentId, include_styling: bool) -> Result<String, EditionError> {
        let segment = self.segment(at).ok_or(EditionError::UnknownSegment(at))?;
        Ok(segment.full_text(&self.nouns, &self.style, include_styling)?)
    }

    pub fn fillable_text(&self, id: FillableId, include_styling: bool) -> Result<String, EditionError> {
        let at = self.location(id).ok_or(EditionError::UnknownFillable(id))?;
        self.segment_text(at, include_styling)
    }

    pub fn article_text(&self, index: usize, include_styling: bool) -> Result<String, EditionError> {
        let article = self
            .articles
            .get(index)
            .ok_or(EditionError::UnknownArticle(index))?;
        Ok(article.full_text(&self.nouns, &self.style, include_styling)?)
    }

    /// A fresh randomized fill order for one play session.
    pub fn random_fill_order<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<FillableId>, ScheduleError> {
        scheduler::random_fill_order(self, rng)
    }
}
