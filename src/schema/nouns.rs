/// Noun table: the session-scoped values chosen for bound nouns.

use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NounError {
    #[error("noun '{0}' already has a value")]
    DuplicateNoun(String),
}

/// A change to the noun table, produced when a bound blank is filled or
/// cleared. The owner of the table applies it; segments never write to
/// the table themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NounEvent {
    Set { noun: String, value: String },
    Reset { noun: String },
}

impl NounEvent {
    /// The noun this event concerns.
    pub fn noun(&self) -> &str {
        match self {
            Self::Set { noun, .. } | Self::Reset { noun } => noun,
        }
    }
}

/// Mapping of noun name to chosen value.
///
/// A noun can only be set while it is absent. Unsetting an absent noun
/// does nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NounTable {
    values: FxHashMap<String, String>,
}

impl NounTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, noun: &str) -> Option<&str> {
        self.values.get(noun).map(String::as_str)
    }

    pub fn contains(&self, noun: &str) -> bool {
        self.values.contains_key(noun)
    }

    /// Set a noun's value. Fails if the noun already has one.
    pub fn set(&mut self, noun: &str, value: &str) -> Result<(), NounError> {
        if self.values.contains_key(noun) {
            return Err(NounError::DuplicateNoun(noun.to_string()));
        }
        self.values.insert(noun.to_string(), value.to_string());
        Ok(())
    }

    /// Remove a noun's value, returning it if there was one.
    pub fn unset(&mut self, noun: &str) -> Option<String> {
        self.values.remove(noun)
    }

    /// Apply a set/reset event to the table.
    pub fn apply(&mut self, event: &NounEvent) -> Result<(), NounError> {
        match event {
            NounEvent::Set { noun, value } => self.set(noun, value),
            NounEvent::Reset { noun } => {
                self.unset(noun);
                Ok(())
            }
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
