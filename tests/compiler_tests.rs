/// Compilation integration tests: documents in, editions out.

use edition_engine::core::compiler::CompileError;
use edition_engine::core::edition::{Edition, EditionError};
use edition_engine::core::render::{RenderError, StyleConfig};
use edition_engine::schema::segment::{FillableId, Segment, SegmentId};
use std::path::Path;

const PAPER: &str = "$$$Paper$$$\n#12\n@Jan 1\n$$Title$$\nHello __([red,blue])__ world\n$$$END$$$";

#[test]
fn single_blank_document() {
    let mut edition = Edition::compile(PAPER).unwrap();
    assert_eq!(edition.name(), "Paper");
    assert_eq!(edition.issue_number(), "12");
    assert_eq!(edition.date(), "Jan 1");
    assert_eq!(edition.articles().len(), 1);

    let article = &edition.articles()[0];
    assert_eq!(article.headline, "Title");
    assert_eq!(article.segments.len(), 1);

    let fillable = article.segments[0].as_fillable().unwrap();
    assert_eq!(fillable.options, vec!["red".to_string(), "blue".to_string()]);
    assert_eq!(fillable.bound_noun(), None);

    assert_eq!(edition.article_text(0, false).unwrap(), "Hello _________ world");
    edition.select_option(FillableId(0), 0).unwrap();
    assert_eq!(edition.article_text(0, false).unwrap(), "Hello red world");
}

#[test]
fn producer_and_consumer() {
    let source = "$$$Paper$$$\n$$Trip$$\nWe went to __([X]Paris,Rome)__.|Then __[X]__ happened.\n$$$END$$$";
    let mut edition = Edition::compile(source).unwrap();
    let consumer = SegmentId {
        article: 0,
        segment: 1,
    };

    assert!(matches!(
        edition.segment_text(consumer, false),
        Err(EditionError::Render(RenderError::MissingNoun(ref noun))) if noun == "X"
    ));

    edition.select_option(FillableId(0), 0).unwrap();
    assert_eq!(edition.segment_text(consumer, false).unwrap(), "Then Paris happened.");
}

#[test]
fn zero_option_blank_fails() {
    let err = Edition::load(Path::new("tests/fixtures/empty_blank.txt")).unwrap_err();
    match err {
        CompileError::MalformedInput { text, .. } => {
            assert_eq!(text, "This blank has __()__ nothing inside.");
        }
        other => panic!("Expected MalformedInput, got {:?}", other),
    }
}

#[test]
fn compilation_is_deterministic() {
    let source = std::fs::read_to_string("tests/fixtures/editions/01_morning_ledger.txt").unwrap();
    let first = Edition::compile(&source).unwrap();
    let second = Edition::compile(&source).unwrap();
    assert_eq!(first.header(), second.header());
    assert_eq!(first.articles(), second.articles());
}

#[test]
fn morning_ledger_structure() {
    let edition = Edition::load(Path::new("tests/fixtures/editions/01_morning_ledger.txt")).unwrap();
    assert_eq!(edition.name(), "The Morning Ledger");
    assert_eq!(edition.issue_number(), "112");
    assert_eq!(edition.date(), "Tuesday, April 9");

    let headlines: Vec<&str> = edition
        .articles()
        .iter()
        .map(|a| a.headline.as_str())
        .collect();
    assert_eq!(headlines, vec!["Mayor Opens New Bridge", "Weather"]);

    assert_eq!(edition.articles()[0].segments.len(), 4);
    assert_eq!(edition.articles()[1].segments.len(), 2);
    assert_eq!(edition.fillable_count(), 4);

    let mayor = edition.fillable(FillableId(0)).unwrap();
    assert_eq!(mayor.bound_noun(), Some("mayor"));
    assert_eq!(mayor.options.len(), 3);
    assert!(mayor.dependents().is_empty());

    let bridge = edition.fillable(FillableId(1)).unwrap();
    assert_eq!(bridge.bound_noun(), Some("bridge"));
    assert_eq!(bridge.dependents(), &[FillableId(3)]);
    assert_eq!(edition.producer_of("bridge"), Some(FillableId(1)));
    assert_eq!(edition.producer_of("weather"), None);

    assert!(matches!(
        edition.articles()[0].segments[2],
        Segment::Plain(ref plain) if plain.noun_dependencies == vec!["mayor".to_string()]
    ));
}

#[test]
fn filled_ledger_renders_everywhere() {
    let mut edition = Edition::load(Path::new("tests/fixtures/editions/01_morning_ledger.txt")).unwrap();
    edition.select_option(FillableId(0), 2).unwrap();
    edition.select_option(FillableId(1), 0).unwrap();
    edition.select_option(FillableId(2), 1).unwrap();
    edition.select_option(FillableId(3), 1).unwrap();
    assert!(edition.is_complete());

    let weather = edition.article_text(1, false).unwrap();
    assert_eq!(
        weather,
        "Expect heavy fog over the Harbor Bridge this afternoon.\nMayor Okafor recommends an umbrella."
    );

    let front = edition.article_text(0, false).unwrap();
    assert!(front.contains("Mayor Okafor cut the ribbon"));
    assert!(front.contains("said Okafor,"));
    assert!(front.contains("tripping over a cable."));
}

#[test]
fn styling_from_ron_config() {
    let style = StyleConfig::load_from_ron(Path::new("tests/fixtures/style.ron")).unwrap();
    let mut edition = Edition::compile(PAPER).unwrap();
    edition.set_style(style);
    assert_eq!(edition.article_text(0, true).unwrap(), "Hello [ ? ] world");
    edition.select_option(FillableId(0), 1).unwrap();
    assert_eq!(edition.article_text(0, true).unwrap(), "Hello *blue* world");
    assert_eq!(edition.article_text(0, false).unwrap(), "Hello blue world");
}

#[test]
fn select_then_reset_round_trip() {
    let mut edition = Edition::load(Path::new("tests/fixtures/editions/02_evening_crier.txt")).unwrap();
    let before = edition.fillable_text(FillableId(3), true).unwrap();
    edition.select_option(FillableId(3), 1).unwrap();
    assert_ne!(edition.fillable_text(FillableId(3), true).unwrap(), before);
    edition.reset_segment(FillableId(3)).unwrap();
    assert_eq!(edition.fillable_text(FillableId(3), true).unwrap(), before);
}

#[test]
fn malformed_documents_do_not_affect_others() {
    let good = Edition::compile(PAPER);
    let bad = Edition::compile("$$A$$\n__()__\n$$$END$$$");
    let good_again = Edition::compile(PAPER);
    assert!(good.is_ok());
    assert!(bad.is_err());
    assert_eq!(good.unwrap().articles(), good_again.unwrap().articles());
}
