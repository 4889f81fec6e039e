/// Text resolution: noun substitution, blank filling, and styling markup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::schema::nouns::NounTable;
use crate::schema::segment::{FillableSegment, Segment, PLACEHOLDER};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("noun '{0}' has no value yet")]
    MissingNoun(String),
}

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Markup applied to resolved text when styling is requested.
///
/// The engine never interprets these strings; they are handed through to
/// whatever renders the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Shown in place of a blank with no chosen option.
    pub blank_marker: String,
    pub filled_open: String,
    pub filled_close: String,
    pub blank_open: String,
    pub blank_close: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            blank_marker: "_________".to_string(),
            filled_open: "<font=\"Mynerve-Regular SDF\">".to_string(),
            filled_close: "</font>".to_string(),
            blank_open: "<font=\"LiberationSans SDF\">".to_string(),
            blank_close: "</font>".to_string(),
        }
    }
}

impl StyleConfig {
    /// Load a style from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<StyleConfig, StyleError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a style from a RON string. Missing fields take defaults.
    pub fn parse_ron(input: &str) -> Result<StyleConfig, StyleError> {
        Ok(ron::from_str(input)?)
    }

    fn filled(&self, text: &str, include_styling: bool) -> String {
        if include_styling {
            format!("{}{}{}", self.filled_open, text, self.filled_close)
        } else {
            text.to_string()
        }
    }

    fn blank(&self, include_styling: bool) -> String {
        if include_styling {
            format!("{}{}{}", self.blank_open, self.blank_marker, self.blank_close)
        } else {
            self.blank_marker.clone()
        }
    }
}

/// Replace every `__[noun]__` reference in `text` with its table value.
fn substitute_nouns(
    text: &str,
    dependencies: &[String],
    nouns: &NounTable,
    style: &StyleConfig,
    include_styling: bool,
) -> Result<String, RenderError> {
    let mut resolved = text.to_string();
    for noun in dependencies {
        let value = nouns
            .get(noun)
            .ok_or_else(|| RenderError::MissingNoun(noun.clone()))?;
        let marker = format!("__[{}]__", noun);
        resolved = resolved.replace(&marker, &style.filled(value, include_styling));
    }
    Ok(resolved)
}

impl Segment {
    /// Display text with noun references and the blank resolved.
    ///
    /// Every referenced noun must already be in `nouns`; resolution does
    /// not check ordering itself.
    pub fn full_text(
        &self,
        nouns: &NounTable,
        style: &StyleConfig,
        include_styling: bool,
    ) -> Result<String, RenderError> {
        match self {
            Self::Plain(plain) => substitute_nouns(
                &plain.text,
                &plain.noun_dependencies,
                nouns,
                style,
                include_styling,
            ),
            Self::Fillable(fillable) => {
                fillable.text_with_option(fillable.selected(), nouns, style, include_styling)
            }
        }
    }
}

impl FillableSegment {
    /// Render as though `option` were chosen. An absent or out-of-range
    /// option renders the blank marker.
    pub fn text_with_option(
        &self,
        option: Option<usize>,
        nouns: &NounTable,
        style: &StyleConfig,
        include_styling: bool,
    ) -> Result<String, RenderError> {
        let base = substitute_nouns(
            &self.text,
            &self.noun_dependencies,
            nouns,
            style,
            include_styling,
        )?;
        let fill = match option.and_then(|index| self.options.get(index)) {
            Some(choice) => style.filled(choice, include_styling),
            None => style.blank(include_styling),
        };
        Ok(base.replacen(PLACEHOLDER, &fill, 1))
    }
}
