/// Segment text analysis: noun references and blank extraction.
///
/// Syntax inside a segment:
/// - `__[name]__` → reference to the noun `name`
/// - `__(a,b,c)__` → blank with options `a`, `b`, `c`
/// - `__([name]a,b)__` or `__([name],a,b)__` → blank bound to noun `name`
/// - `__([a,b])__` → blank with a bracketed option list and no binding

use lazy_static::lazy_static;
use regex::Regex;

use super::compiler::CompileError;
use crate::schema::segment::{FillableSegment, PlainSegment, Segment, PLACEHOLDER};

lazy_static! {
    static ref NOUN_REFERENCE: Regex = Regex::new(r"__\[(\w+)\]__").unwrap();
    static ref BLANK: Regex = Regex::new(r"(?s)^(.*)__\((.*)\)__(.*)$").unwrap();
    static ref BOUND_BODY: Regex = Regex::new(r"(?s)^\[(\w+)\],?(.*)$").unwrap();
    static ref BRACKETED_OPTIONS: Regex = Regex::new(r"(?s)^\[(.*)\]$").unwrap();
}

const BLANK_OPEN: &str = "__(";

/// A blank pulled out of raw segment text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blank {
    pub left: String,
    pub right: String,
    pub bound_noun: Option<String>,
    pub options: Vec<String>,
}

/// Nouns referenced in `text`, in order of first appearance.
pub fn noun_references(text: &str) -> Vec<String> {
    let mut nouns: Vec<String> = Vec::new();
    for caps in NOUN_REFERENCE.captures_iter(text) {
        let noun = &caps[1];
        if !nouns.iter().any(|seen| seen == noun) {
            nouns.push(noun.to_string());
        }
    }
    nouns
}

/// Find the blank in raw segment text, if there is one.
pub fn parse_blank(raw: &str) -> Result<Option<Blank>, CompileError> {
    let Some(caps) = BLANK.captures(raw) else {
        if raw.contains(BLANK_OPEN) {
            return Err(malformed(raw, "unterminated blank"));
        }
        return Ok(None);
    };

    if caps[1].contains(BLANK_OPEN) || caps[3].contains(BLANK_OPEN) {
        return Err(malformed(raw, "more than one blank in a segment"));
    }

    let body = &caps[2];
    let (bound_noun, option_list) = if let Some(bound) = BOUND_BODY.captures(body) {
        (Some(bound[1].to_string()), bound.get(2).map_or("", |m| m.as_str()))
    } else if let Some(bracketed) = BRACKETED_OPTIONS.captures(body) {
        (None, bracketed.get(1).map_or("", |m| m.as_str()))
    } else {
        (None, body)
    };

    if option_list.is_empty() {
        return Err(malformed(raw, "blank has no options"));
    }

    Ok(Some(Blank {
        left: caps[1].to_string(),
        right: caps[3].to_string(),
        bound_noun,
        options: option_list.split(',').map(str::to_string).collect(),
    }))
}

/// Turn one finalized segment's raw text into a typed segment.
pub fn analyze(raw: &str) -> Result<Segment, CompileError> {
    let Some(blank) = parse_blank(raw)? else {
        return Ok(Segment::Plain(PlainSegment::new(
            raw.to_string(),
            noun_references(raw),
        )));
    };

    let text = format!("{}{}{}", blank.left, PLACEHOLDER, blank.right);
    let dependencies = noun_references(&text);
    if let Some(noun) = &blank.bound_noun {
        if dependencies.contains(noun) {
            return Err(malformed(
                raw,
                &format!("blank bound to '{}' also references it", noun),
            ));
        }
    }

    Ok(Segment::Fillable(FillableSegment::new(
        text,
        dependencies,
        blank.options,
        blank.bound_noun,
    )))
}

fn malformed(raw: &str, reason: &str) -> CompileError {
    CompileError::MalformedInput {
        text: raw.to_string(),
        reason: reason.to_string(),
    }
}
