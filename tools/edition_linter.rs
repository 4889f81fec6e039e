/// Edition Linter: compiles edition documents and reports problems.
///
/// Usage: edition_linter <file_or_dir> [--dump]
///
/// With `--dump`, each compiled edition is also printed as RON.

use edition_engine::core::edition::Edition;
use edition_engine::core::scheduler::ScheduleError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ron::ser::PrettyConfig;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("edition_engine=warn".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: edition_linter <file_or_dir> [--dump]");
        process::exit(0);
    }

    let dump = args[2..].iter().any(|arg| arg == "--dump");

    let target = Path::new(&args[1]);
    let files = if target.is_file() {
        vec![target.to_path_buf()]
    } else if target.is_dir() {
        collect_documents(target)
    } else {
        eprintln!("ERROR: Path '{}' does not exist", args[1]);
        process::exit(1);
    };

    println!("Checking {} document(s)", files.len());

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for path in &files {
        match Edition::load(path) {
            Ok(edition) => {
                print_stats(path, &edition);
                lint_edition(path, &edition, &mut errors, &mut warnings);
                if dump {
                    match ron::ser::to_string_pretty(&edition, PrettyConfig::default()) {
                        Ok(text) => println!("{}", text),
                        Err(e) => errors.push(format!("{}: failed to dump: {}", path.display(), e)),
                    }
                }
            }
            Err(e) => errors.push(format!("{}: {}", path.display(), e)),
        }
    }

    println!("\n=== Edition Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn collect_documents(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("txt"))
            .collect(),
        Err(e) => {
            eprintln!("ERROR: Failed to read '{}': {}", dir.display(), e);
            process::exit(1);
        }
    };
    files.sort();
    files
}

fn print_stats(path: &Path, edition: &Edition) {
    let segments: usize = edition.articles().iter().map(|a| a.segments.len()).sum();
    let mut nouns: Vec<&str> = edition
        .fillable_segments()
        .into_iter()
        .filter_map(|f| f.bound_noun())
        .collect();
    nouns.sort_unstable();

    println!("  {}: '{}' #{} {}", path.display(), edition.name(), edition.issue_number(), edition.date());
    println!(
        "    {} articles, {} segments, {} blanks",
        edition.articles().len(),
        segments,
        edition.fillable_count()
    );
    if !nouns.is_empty() {
        let listed: Vec<String> = nouns
            .iter()
            .map(|noun| match edition.producer_of(noun) {
                Some(id) => format!("{} (blank {})", noun, id.0),
                None => noun.to_string(),
            })
            .collect();
        println!("    nouns: {}", listed.join(", "));
    }
}

fn lint_edition(
    path: &Path,
    edition: &Edition,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let at = path.display();

    if edition.name().is_empty() {
        warnings.push(format!("{}: no publication name", at));
    }
    if edition.issue_number().is_empty() {
        warnings.push(format!("{}: no issue number", at));
    }
    if edition.date().is_empty() {
        warnings.push(format!("{}: no date", at));
    }
    if edition.articles().is_empty() {
        warnings.push(format!("{}: no articles", at));
    }

    for article in edition.articles() {
        if article.segments.is_empty() {
            warnings.push(format!("{}: article '{}' is empty", at, article.headline));
        }
    }

    for id in edition.fillable_ids() {
        let Some(fillable) = edition.fillable(id) else {
            continue;
        };
        if fillable.options.len() < 2 {
            warnings.push(format!(
                "{}: blank {} has only {} option(s)",
                at,
                id.0,
                fillable.options.len()
            ));
        }
        if fillable.options.iter().any(|option| option.trim().is_empty()) {
            warnings.push(format!("{}: blank {} has an empty option", at, id.0));
        }
    }

    let mut rng = StdRng::seed_from_u64(0);
    if let Err(ScheduleError::CyclicDependency { stuck, .. }) = edition.random_fill_order(&mut rng) {
        let ids: Vec<String> = stuck.iter().map(|id| id.0.to_string()).collect();
        errors.push(format!(
            "{}: blanks [{}] reference each other's nouns and can never be filled",
            at,
            ids.join(", ")
        ));
    }
}
