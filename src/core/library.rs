/// Edition library: the set of compiled editions available to play.

use rand::seq::SliceRandom;
use rand::Rng;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::compiler::CompileError;
use super::edition::Edition;
use super::render::StyleConfig;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to compile {path}: {source}")]
    Compile {
        path: PathBuf,
        #[source]
        source: CompileError,
    },
}

/// Compiled editions, in load order.
#[derive(Debug, Clone, Default)]
pub struct EditionLibrary {
    editions: Vec<Edition>,
}

impl EditionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every `.txt` document in `dir`, sorted by file name.
    pub fn load_dir(dir: &Path) -> Result<EditionLibrary, LibraryError> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("txt"))
            .collect();
        paths.sort();

        let mut library = EditionLibrary::new();
        for path in paths {
            let edition = Edition::load(&path).map_err(|source| LibraryError::Compile {
                path: path.clone(),
                source,
            })?;
            tracing::info!(path = %path.display(), name = %edition.name(), "edition loaded");
            library.push(edition);
        }
        Ok(library)
    }

    /// Compile in-memory documents.
    pub fn from_sources<'a, I>(sources: I) -> Result<EditionLibrary, CompileError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut library = EditionLibrary::new();
        for source in sources {
            library.push(Edition::compile(source)?);
        }
        Ok(library)
    }

    pub fn push(&mut self, edition: Edition) {
        self.editions.push(edition);
    }

    pub fn len(&self) -> usize {
        self.editions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editions.is_empty()
    }

    pub fn editions(&self) -> &[Edition] {
        &self.editions
    }

    pub fn get(&self, index: usize) -> Option<&Edition> {
        self.editions.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Edition> {
        self.editions.get_mut(index)
    }

    /// Apply one style to every edition.
    pub fn set_style(&mut self, style: &StyleConfig) {
        for edition in &mut self.editions {
            edition.set_style(style.clone());
        }
    }

    /// Edition indices in uniformly random order, next edition last so
    /// the stack can be consumed with `pop`.
    pub fn random_stack<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let mut stack: Vec<usize> = (0..self.editions.len()).collect();
        stack.shuffle(rng);
        stack
    }

    /// Reset per-session state on every edition.
    pub fn reset_all(&mut self) {
        for edition in &mut self.editions {
            edition.reset();
        }
    }
}
