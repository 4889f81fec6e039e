/// Segment types: the plain and fillable units of article text.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use super::nouns::NounEvent;

/// Sentinel stored in a fillable segment's text where its blank sits.
/// Replaced at render time by the chosen option or the blank marker.
pub const PLACEHOLDER: &str = "\u{FFFC}";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SegmentError {
    #[error("option {index} is out of range for a blank with {len} options")]
    OptionOutOfRange { index: usize, len: usize },
}

/// Index of a fillable segment in its edition's fillable registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FillableId(pub usize);

/// Position of a segment inside an edition: article index, then segment
/// index within that article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SegmentId {
    pub article: usize,
    pub segment: usize,
}

/// A unit of article text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Segment {
    /// Static text, possibly with noun references.
    Plain(PlainSegment),
    /// Text containing exactly one blank with a fixed option list.
    Fillable(FillableSegment),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlainSegment {
    pub text: String,
    /// Nouns referenced by `text`, first-seen order, no duplicates.
    pub noun_dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillableSegment {
    /// Text with the blank replaced by [`PLACEHOLDER`].
    pub text: String,
    pub noun_dependencies: Vec<String>,
    pub options: Vec<String>,
    /// The noun this blank produces when an option is chosen.
    pub bound_noun: Option<String>,
    #[serde(skip)]
    selected: Option<usize>,
    /// Other fillable segments that reference `bound_noun`.
    dependents: Vec<FillableId>,
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(plain) => &plain.text,
            Self::Fillable(fillable) => &fillable.text,
        }
    }

    pub fn noun_dependencies(&self) -> &[String] {
        match self {
            Self::Plain(plain) => &plain.noun_dependencies,
            Self::Fillable(fillable) => &fillable.noun_dependencies,
        }
    }

    pub fn as_fillable(&self) -> Option<&FillableSegment> {
        match self {
            Self::Plain(_) => None,
            Self::Fillable(fillable) => Some(fillable),
        }
    }

    pub fn as_fillable_mut(&mut self) -> Option<&mut FillableSegment> {
        match self {
            Self::Plain(_) => None,
            Self::Fillable(fillable) => Some(fillable),
        }
    }

    pub fn is_fillable(&self) -> bool {
        matches!(self, Self::Fillable(_))
    }

    /// Plain text is always complete; a blank is complete once an option
    /// has been chosen.
    pub fn is_text_valid(&self) -> bool {
        match self {
            Self::Plain(_) => true,
            Self::Fillable(fillable) => fillable.selected.is_some(),
        }
    }

    /// Clear any per-session state, returning the noun event to apply.
    pub fn reset(&mut self) -> Option<NounEvent> {
        match self {
            Self::Plain(_) => None,
            Self::Fillable(fillable) => fillable.reset(),
        }
    }
}

impl PlainSegment {
    pub fn new(text: String, noun_dependencies: Vec<String>) -> Self {
        Self {
            text,
            noun_dependencies,
        }
    }
}

impl FillableSegment {
    pub fn new(
        text: String,
        noun_dependencies: Vec<String>,
        options: Vec<String>,
        bound_noun: Option<String>,
    ) -> Self {
        Self {
            text,
            noun_dependencies,
            options,
            bound_noun,
            selected: None,
            dependents: Vec::new(),
        }
    }

    pub fn bound_noun(&self) -> Option<&str> {
        self.bound_noun.as_deref()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The text of the chosen option, if any.
    pub fn selected_text(&self) -> Option<&str> {
        self.selected.map(|index| self.options[index].as_str())
    }

    pub fn dependents(&self) -> &[FillableId] {
        &self.dependents
    }

    pub(crate) fn set_dependents(&mut self, dependents: Vec<FillableId>) {
        self.dependents = dependents;
    }

    /// Choose an option. Returns the noun event the owner must apply when
    /// this blank binds a noun.
    pub fn select(&mut self, index: usize) -> Result<Option<NounEvent>, SegmentError> {
        if index >= self.options.len() {
            return Err(SegmentError::OptionOutOfRange {
                index,
                len: self.options.len(),
            });
        }
        self.selected = Some(index);
        Ok(self.bound_noun.as_ref().map(|noun| NounEvent::Set {
            noun: noun.clone(),
            value: self.options[index].clone(),
        }))
    }

    /// Clear the selection. Emits a reset only if a bound noun had been
    /// produced.
    pub fn reset(&mut self) -> Option<NounEvent> {
        let was_selected = self.selected.take().is_some();
        match &self.bound_noun {
            Some(noun) if was_selected => Some(NounEvent::Reset { noun: noun.clone() }),
            _ => None,
        }
    }

    /// Option indices in uniformly random order, for presenting choices.
    pub fn shuffled_options<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.options.len()).collect();
        order.shuffle(rng);
        order
    }
}
