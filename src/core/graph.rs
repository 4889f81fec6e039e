/// Dependency graph builder: links each bound blank to the fillable
/// segments that reference its noun.
///
/// Edges are inferred from noun references rather than declared, and are
/// stored as `dependents` lists on the producing segment since traversal
/// only ever walks producer → consumer.

use rustc_hash::{FxHashMap, FxHashSet};

use super::compiler::CompileError;
use crate::schema::article::Article;
use crate::schema::segment::{FillableId, FillableSegment};

/// For each fillable segment, the segments whose noun dependencies include
/// its bound noun. Self-pairs are skipped.
pub fn build_dependents(fillables: &[&FillableSegment]) -> Vec<Vec<FillableId>> {
    fillables
        .iter()
        .enumerate()
        .map(|(producer_index, producer)| {
            let Some(noun) = producer.bound_noun() else {
                return Vec::new();
            };
            fillables
                .iter()
                .enumerate()
                .filter(|(consumer_index, consumer)| {
                    *consumer_index != producer_index
                        && consumer.noun_dependencies.iter().any(|dep| dep == noun)
                })
                .map(|(consumer_index, _)| FillableId(consumer_index))
                .collect()
        })
        .collect()
}

/// Check that every noun is bound by exactly one blank and that every
/// referenced noun is bound somewhere.
pub fn check_bindings(articles: &[Article]) -> Result<(), CompileError> {
    let mut bound: FxHashSet<&str> = FxHashSet::default();
    for fillable in articles
        .iter()
        .flat_map(|article| article.segments.iter())
        .filter_map(|segment| segment.as_fillable())
    {
        if let Some(noun) = fillable.bound_noun() {
            if !bound.insert(noun) {
                return Err(CompileError::DuplicateBinding {
                    noun: noun.to_string(),
                });
            }
        }
    }

    for segment in articles.iter().flat_map(|article| article.segments.iter()) {
        if let Some(noun) = segment
            .noun_dependencies()
            .iter()
            .find(|noun| !bound.contains(noun.as_str()))
        {
            return Err(CompileError::UnknownNoun {
                noun: noun.clone(),
                text: segment.text().to_string(),
            });
        }
    }
    Ok(())
}

/// Map each bound noun to the fillable segment that produces it.
pub fn producers(fillables: &[&FillableSegment]) -> FxHashMap<String, FillableId> {
    fillables
        .iter()
        .enumerate()
        .filter_map(|(index, fillable)| {
            fillable
                .bound_noun()
                .map(|noun| (noun.to_string(), FillableId(index)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::segment::{PlainSegment, Segment, PLACEHOLDER};

    fn blank(bound: Option<&str>, deps: &[&str]) -> FillableSegment {
        FillableSegment::new(
            PLACEHOLDER.to_string(),
            deps.iter().map(|d| d.to_string()).collect(),
            vec!["x".to_string()],
            bound.map(str::to_string),
        )
    }

    #[test]
    fn links_producer_to_consumers() {
        let a = blank(Some("city"), &[]);
        let b = blank(None, &["city"]);
        let c = blank(Some("mayor"), &["city"]);
        let d = blank(None, &["mayor", "city"]);
        let dependents = build_dependents(&[&a, &b, &c, &d]);
        assert_eq!(
            dependents[0],
            vec![FillableId(1), FillableId(2), FillableId(3)]
        );
        assert!(dependents[1].is_empty());
        assert_eq!(dependents[2], vec![FillableId(3)]);
        assert!(dependents[3].is_empty());
    }

    #[test]
    fn unbound_segments_have_no_dependents() {
        let a = blank(None, &[]);
        let b = blank(None, &[]);
        let dependents = build_dependents(&[&a, &b]);
        assert!(dependents.iter().all(Vec::is_empty));
    }

    #[test]
    fn self_pairs_are_skipped() {
        let a = blank(Some("x"), &["x"]);
        let dependents = build_dependents(&[&a]);
        assert!(dependents[0].is_empty());
    }

    #[test]
    fn producers_by_noun() {
        let a = blank(Some("city"), &[]);
        let b = blank(None, &[]);
        let c = blank(Some("mayor"), &[]);
        let map = producers(&[&a, &b, &c]);
        assert_eq!(map.len(), 2);
        assert_eq!(map["city"], FillableId(0));
        assert_eq!(map["mayor"], FillableId(2));
    }

    #[test]
    fn duplicate_binding_rejected() {
        let mut article = Article::new("A");
        article.segments.push(Segment::Fillable(blank(Some("x"), &[])));
        article.segments.push(Segment::Fillable(blank(Some("x"), &[])));
        assert!(matches!(
            check_bindings(&[article]),
            Err(CompileError::DuplicateBinding { ref noun }) if noun == "x"
        ));
    }

    #[test]
    fn unknown_noun_rejected_in_plain_text() {
        let mut article = Article::new("A");
        article.segments.push(Segment::Plain(PlainSegment::new(
            "__[ghost]__".to_string(),
            vec!["ghost".to_string()],
        )));
        assert!(matches!(
            check_bindings(&[article]),
            Err(CompileError::UnknownNoun { ref noun, .. }) if noun == "ghost"
        ));
    }

    #[test]
    fn bindings_across_articles() {
        let mut first = Article::new("A");
        first.segments.push(Segment::Fillable(blank(Some("x"), &[])));
        let mut second = Article::new("B");
        second.segments.push(Segment::Plain(PlainSegment::new(
            "__[x]__".to_string(),
            vec!["x".to_string()],
        )));
        assert!(check_bindings(&[first, second]).is_ok());
    }
}
