/// Document compiler: turns a raw edition file into articles and segments.
///
/// Line syntax:
/// - `$$$Name$$$` → publication name
/// - `#Issue` → issue number
/// - `@Date` → date
/// - `$$ Headline $$` → start of a new article
/// - `$$$END$$$` → end of document; nothing after it is read
/// - anything else → segment content, `|` separating segments
///
/// Segments may span lines: the text after the last `|` on a line carries
/// over to the next content line.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::analyzer;
use super::edition::{Edition, EditionHeader};
use crate::schema::article::Article;

lazy_static! {
    static ref END_LINE: Regex = Regex::new(r"^\$\$\$\s*END\s*\$\$\$$").unwrap();
    static ref NAME_LINE: Regex = Regex::new(r"^\$\$\$(.+)\$\$\$$").unwrap();
    static ref ISSUE_LINE: Regex = Regex::new(r"^#(.+)$").unwrap();
    static ref DATE_LINE: Regex = Regex::new(r"^@(.+)$").unwrap();
    static ref ARTICLE_LINE: Regex = Regex::new(r"^\$\$\s?(.+?)\s?\$\$$").unwrap();
}

const SEGMENT_SEPARATOR: char = '|';

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("malformed input: {reason} in segment {text:?}")]
    MalformedInput { text: String, reason: String },
    #[error("noun '{noun}' is referenced but no blank binds it (in segment {text:?})")]
    UnknownNoun { noun: String, text: String },
    #[error("noun '{noun}' is bound by more than one blank")]
    DuplicateBinding { noun: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a single physical line means to the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    End,
    Name(&'a str),
    Issue(&'a str),
    Date(&'a str),
    ArticleStart(&'a str),
    Content(&'a str),
}

impl<'a> Line<'a> {
    /// Classify a line. Earlier patterns win: `$$$END$$$` would also match
    /// the name and headline patterns.
    fn classify(line: &'a str) -> Line<'a> {
        let capture = |re: &Regex| re.captures(line).and_then(|caps| caps.get(1)).map(|m| m.as_str());

        if END_LINE.is_match(line) {
            Line::End
        } else if let Some(name) = capture(&NAME_LINE) {
            Line::Name(name)
        } else if let Some(issue) = capture(&ISSUE_LINE) {
            Line::Issue(issue)
        } else if let Some(date) = capture(&DATE_LINE) {
            Line::Date(date)
        } else if let Some(headline) = capture(&ARTICLE_LINE) {
            Line::ArticleStart(headline)
        } else {
            Line::Content(line)
        }
    }
}

/// Line-by-line compiler state.
#[derive(Debug, Default)]
struct DocumentCompiler {
    header: EditionHeader,
    articles: Vec<Article>,
    buffer: String,
}

impl DocumentCompiler {
    /// Feed one line. Returns `false` once the end marker has been seen.
    fn feed(&mut self, line: &str) -> Result<bool, CompileError> {
        match Line::classify(line) {
            Line::End => {
                self.finish_segment()?;
                return Ok(false);
            }
            Line::Name(name) => self.header.name = name.to_string(),
            Line::Issue(issue) => self.header.issue_number = issue.to_string(),
            Line::Date(date) => self.header.date = date.to_string(),
            Line::ArticleStart(headline) => {
                self.finish_segment()?;
                tracing::debug!(headline, "article started");
                self.articles.push(Article::new(headline));
            }
            Line::Content(content) => {
                if self.articles.is_empty() {
                    return Ok(true);
                }
                let pieces: Vec<&str> = content.split(SEGMENT_SEPARATOR).collect();
                let last = pieces.len() - 1;
                for (i, piece) in pieces.into_iter().enumerate() {
                    self.buffer.push_str(piece);
                    self.buffer.push('\n');
                    if i != last {
                        self.finish_segment()?;
                    }
                }
            }
        }
        Ok(true)
    }

    /// Compile the buffered text into a segment on the open article.
    fn finish_segment(&mut self) -> Result<(), CompileError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let buffer = std::mem::take(&mut self.buffer);
        let Some(article) = self.articles.last_mut() else {
            return Ok(());
        };
        let raw = buffer.strip_suffix('\n').unwrap_or(&buffer);
        let segment = analyzer::analyze(raw)?;
        tracing::debug!(
            headline = %article.headline,
            fillable = segment.is_fillable(),
            "segment compiled"
        );
        article.segments.push(segment);
        Ok(())
    }
}

/// Compile a complete document into an edition with its fillable registry
/// and dependency graph in place.
pub fn compile(source: &str) -> Result<Edition, CompileError> {
    let mut compiler = DocumentCompiler::default();
    let mut ended = false;

    let mut lines: Vec<&str> = source.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }

    for raw_line in lines {
        let line = raw_line.replace('\r', "");
        if !compiler.feed(&line)? {
            ended = true;
            break;
        }
    }

    if !ended {
        tracing::warn!(
            name = %compiler.header.name,
            "document has no end marker; compiling to end of input"
        );
        compiler.finish_segment()?;
    }

    Edition::assemble(compiler.header, compiler.articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::segment::Segment;

    #[test]
    fn classify_lines() {
        assert_eq!(Line::classify("$$$END$$$"), Line::End);
        assert_eq!(Line::classify("$$$ END $$$"), Line::End);
        assert_eq!(Line::classify("$$$Daily Bugle$$$"), Line::Name("Daily Bugle"));
        assert_eq!(Line::classify("#42"), Line::Issue("42"));
        assert_eq!(Line::classify("@March 3"), Line::Date("March 3"));
        assert_eq!(Line::classify("$$ Big News $$"), Line::ArticleStart("Big News"));
        assert_eq!(Line::classify("$$Big News$$"), Line::ArticleStart("Big News"));
        assert_eq!(Line::classify("plain words"), Line::Content("plain words"));
        assert_eq!(Line::classify("#"), Line::Content("#"));
    }

    #[test]
    fn header_fields() {
        let edition = compile("$$$Paper$$$\n#12\n@Jan 1\n$$$END$$$").unwrap();
        assert_eq!(edition.name(), "Paper");
        assert_eq!(edition.issue_number(), "12");
        assert_eq!(edition.date(), "Jan 1");
        assert!(edition.articles().is_empty());
    }

    #[test]
    fn later_header_overwrites() {
        let edition = compile("#1\n#2\n$$$END$$$").unwrap();
        assert_eq!(edition.issue_number(), "2");
    }

    #[test]
    fn content_before_article_is_ignored() {
        let edition = compile("stray words\n$$A$$\nkept\n$$$END$$$").unwrap();
        assert_eq!(edition.articles().len(), 1);
        assert_eq!(edition.articles()[0].segments.len(), 1);
        assert_eq!(edition.articles()[0].segments[0].text(), "kept");
    }

    #[test]
    fn separator_splits_segments() {
        let edition = compile("$$A$$\none|two|three\n$$$END$$$").unwrap();
        let texts: Vec<&str> = edition.articles()[0]
            .segments
            .iter()
            .map(Segment::text)
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn segments_span_lines() {
        let edition = compile("$$A$$\nfirst\nsecond|third\n\n$$$END$$$").unwrap();
        let texts: Vec<&str> = edition.articles()[0]
            .segments
            .iter()
            .map(Segment::text)
            .collect();
        assert_eq!(texts, vec!["first\nsecond", "third\n"]);
    }

    #[test]
    fn article_start_finishes_previous_segment() {
        let edition = compile("$$A$$\nalpha\n$$B$$\nbeta\n$$$END$$$").unwrap();
        assert_eq!(edition.articles()[0].segments[0].text(), "alpha");
        assert_eq!(edition.articles()[1].headline, "B");
        assert_eq!(edition.articles()[1].segments[0].text(), "beta");
    }

    #[test]
    fn text_after_end_is_never_parsed() {
        let edition = compile("$$A$$\nalpha\n$$$END$$$\n$$B$$\n__()__\n").unwrap();
        assert_eq!(edition.articles().len(), 1);
    }

    #[test]
    fn carriage_returns_are_stripped() {
        let edition = compile("$$$Paper$$$\r\n$$A$$\r\nalpha\r\n$$$END$$$\r\n").unwrap();
        assert_eq!(edition.name(), "Paper");
        assert_eq!(edition.articles()[0].segments[0].text(), "alpha");
    }

    #[test]
    fn missing_end_marker_keeps_last_segment() {
        let edition = compile("$$A$$\nalpha").unwrap();
        assert_eq!(edition.articles()[0].segments[0].text(), "alpha");
    }

    #[test]
    fn missing_end_marker_ignores_final_newline() {
        let edition = compile("$$A$$\nalpha\n").unwrap();
        assert_eq!(edition.articles()[0].segments[0].text(), "alpha");

        let edition = compile("$$A$$\nalpha\n\n").unwrap();
        assert_eq!(edition.articles()[0].segments[0].text(), "alpha\n");
    }

    #[test]
    fn malformed_blank_aborts() {
        let err = compile("$$A$$\nfine|bad __()__ one\n$$$END$$$").unwrap_err();
        assert!(matches!(
            err,
            CompileError::MalformedInput { ref text, .. } if text == "bad __()__ one"
        ));
    }
}
