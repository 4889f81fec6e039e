/// Play session: drives one run over a library of editions.
///
/// Editions are played in a random order; each edition's blanks are
/// presented in a freshly scheduled fill order. Every state change is
/// reported back as a [`SessionEvent`] value for the caller to react to.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use thiserror::Error;

use super::edition::{Edition, EditionError};
use super::library::EditionLibrary;
use super::scheduler::ScheduleError;
use crate::schema::nouns::NounEvent;
use crate::schema::segment::{FillableId, FillableSegment};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("edition error: {0}")]
    Edition(#[from] EditionError),
    #[error("the edition library is empty")]
    EmptyLibrary,
    #[error("no blank is waiting to be filled")]
    NothingToFill,
}

/// Something that happened during play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A noun was set or released in the current edition.
    Noun(NounEvent),
    /// The edition at this library index has every reachable blank filled.
    EditionCompleted { edition: usize },
    /// Some blanks of an edition sit on a noun cycle and will be skipped.
    Unschedulable {
        edition: usize,
        stuck: Vec<FillableId>,
    },
    /// No editions are left in this run.
    RunFinished,
}

pub struct PlaySession<R: Rng = StdRng> {
    library: EditionLibrary,
    rng: R,
    /// Editions still to play; the current one is last.
    remaining: Vec<usize>,
    completed: Vec<usize>,
    queue: VecDeque<FillableId>,
}

impl PlaySession<StdRng> {
    /// A session with a reproducible edition and fill order.
    pub fn with_seed(library: EditionLibrary, seed: u64) -> Self {
        Self::new(library, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PlaySession<R> {
    pub fn new(library: EditionLibrary, rng: R) -> Self {
        Self {
            library,
            rng,
            remaining: Vec::new(),
            completed: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    pub fn library(&self) -> &EditionLibrary {
        &self.library
    }

    /// Begin a new run, discarding any state from the previous one.
    pub fn start(&mut self) -> Result<Vec<SessionEvent>, SessionError> {
        if self.library.is_empty() {
            return Err(SessionError::EmptyLibrary);
        }
        self.reset();
        self.remaining = self.library.random_stack(&mut self.rng);
        tracing::info!(editions = self.remaining.len(), "run started");

        let mut events = Vec::new();
        self.prepare_current(&mut events);
        Ok(events)
    }

    /// Clear every edition's selections and the run's progress.
    pub fn reset(&mut self) {
        self.library.reset_all();
        self.remaining.clear();
        self.completed.clear();
        self.queue.clear();
    }

    pub fn current_edition_index(&self) -> Option<usize> {
        self.remaining.last().copied()
    }

    pub fn current_edition(&self) -> Option<&Edition> {
        self.library.get(self.current_edition_index()?)
    }

    pub fn current_segment(&self) -> Option<FillableId> {
        self.queue.front().copied()
    }

    pub fn current_fillable(&self) -> Option<&FillableSegment> {
        self.current_edition()?.fillable(self.current_segment()?)
    }

    /// Blanks left in the current edition, including the current one.
    pub fn blanks_left(&self) -> usize {
        self.queue.len()
    }

    pub fn editions_left(&self) -> usize {
        self.remaining.len()
    }

    /// Library indices of finished editions, in completion order.
    pub fn completed(&self) -> &[usize] {
        &self.completed
    }

    pub fn completed_editions(&self) -> impl Iterator<Item = &Edition> {
        self.completed.iter().filter_map(|&index| self.library.get(index))
    }

    pub fn is_finished(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Render the current blank as though `option` were chosen.
    pub fn preview(&self, option: Option<usize>, include_styling: bool) -> Result<String, SessionError> {
        let edition = self.current_edition().ok_or(SessionError::NothingToFill)?;
        let fillable = self.current_fillable().ok_or(SessionError::NothingToFill)?;
        let text = fillable
            .text_with_option(option, edition.nouns(), edition.style(), include_styling)
            .map_err(EditionError::from)?;
        Ok(text)
    }

    /// Fill the current blank with `option` and move on.
    pub fn select(&mut self, option: usize) -> Result<Vec<SessionEvent>, SessionError> {
        let edition_index = self.current_edition_index().ok_or(SessionError::NothingToFill)?;
        let id = self.current_segment().ok_or(SessionError::NothingToFill)?;
        let edition = self
            .library
            .get_mut(edition_index)
            .ok_or(SessionError::NothingToFill)?;

        let mut events = Vec::new();
        if let Some(event) = edition.select_option(id, option)? {
            events.push(SessionEvent::Noun(event));
        }
        self.queue.pop_front();

        if self.queue.is_empty() {
            self.finish_current(&mut events);
        }
        Ok(events)
    }

    /// Schedule the current edition, completing editions with nothing to
    /// fill until one has blanks or the run ends.
    fn prepare_current(&mut self, events: &mut Vec<SessionEvent>) {
        while let Some(index) = self.current_edition_index() {
            let Some(edition) = self.library.get(index) else {
                self.remaining.pop();
                continue;
            };
            let order = match edition.random_fill_order(&mut self.rng) {
                Ok(order) => order,
                Err(ScheduleError::CyclicDependency { scheduled, stuck }) => {
                    events.push(SessionEvent::Unschedulable {
                        edition: index,
                        stuck,
                    });
                    scheduled
                }
            };
            self.queue = order.into();
            if !self.queue.is_empty() {
                return;
            }
            self.complete(index, events);
        }
        events.push(SessionEvent::RunFinished);
        tracing::info!(completed = self.completed.len(), "run finished");
    }

    fn finish_current(&mut self, events: &mut Vec<SessionEvent>) {
        if let Some(index) = self.current_edition_index() {
            self.complete(index, events);
        }
        self.prepare_current(events);
    }

    fn complete(&mut self, index: usize, events: &mut Vec<SessionEvent>) {
        self.remaining.pop();
        self.completed.push(index);
        tracing::info!(edition = index, "edition completed");
        events.push(SessionEvent::EditionCompleted { edition: index });
    }
}
