/// Play: terminal session over a directory of edition documents.
///
/// Usage: play --editions <dir> [--seed <n>] [--style <style.ron>]
///
/// Each prompt shows the sentence with its blank and the options in
/// shuffled order. Type an option's number to fill the blank, `skip` to
/// abandon the run, or `quit` to exit.

use edition_engine::core::edition::Edition;
use edition_engine::core::library::EditionLibrary;
use edition_engine::core::render::StyleConfig;
use edition_engine::core::session::{PlaySession, SessionEvent};
use edition_engine::schema::nouns::NounEvent;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use std::path::Path;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("edition_engine=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut editions_path = None;
    let mut style_path = None;
    let mut seed: u64 = 42;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--editions" if i + 1 < args.len() => {
                i += 1;
                editions_path = Some(args[i].clone());
            }
            "--style" if i + 1 < args.len() => {
                i += 1;
                style_path = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let Some(editions_path) = editions_path else {
        eprintln!("ERROR: --editions is required");
        print_usage();
        std::process::exit(1);
    };

    let mut library = match EditionLibrary::load_dir(Path::new(&editions_path)) {
        Ok(library) => library,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(ref path) = style_path {
        match StyleConfig::load_from_ron(Path::new(path)) {
            Ok(style) => library.set_style(&style),
            Err(e) => {
                eprintln!("ERROR: Failed to load style: {}", e);
                std::process::exit(1);
            }
        }
    }

    println!("Loaded {} editions", library.len());
    println!("Seed: {}\n", seed);

    let styled = style_path.is_some();
    let mut session = PlaySession::with_seed(library, seed);
    let mut shuffle_rng = StdRng::seed_from_u64(seed.wrapping_add(1));

    match session.start() {
        Ok(events) => report(&session, &events),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    while !session.is_finished() {
        let Some(fillable) = session.current_fillable() else {
            break;
        };
        let order = fillable.shuffled_options(&mut shuffle_rng);
        let options: Vec<String> = order
            .iter()
            .map(|&index| fillable.options[index].clone())
            .collect();

        if let Some(edition) = session.current_edition() {
            println!(
                "--- {} #{} ({} blanks left, {} edition(s) to go) ---",
                edition.name(),
                edition.issue_number(),
                session.blanks_left(),
                session.editions_left()
            );
        }
        match session.preview(None, styled) {
            Ok(text) => println!("{}\n", text.trim()),
            Err(e) => println!("(cannot show this blank: {})\n", e),
        }
        for (n, option) in options.iter().enumerate() {
            println!("  {}. {}", n + 1, option);
        }

        let choice = loop {
            print!("play> ");
            stdout.flush().ok();

            let mut line = String::new();
            if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
                println!("Goodbye.");
                return;
            }
            match line.trim() {
                "quit" | "exit" | "q" => {
                    println!("Goodbye.");
                    return;
                }
                "skip" => break None,
                input => match input.parse::<usize>() {
                    Ok(n) if (1..=order.len()).contains(&n) => break Some(order[n - 1]),
                    _ => println!("Enter a number between 1 and {}", order.len()),
                },
            }
        };

        let Some(option) = choice else {
            println!("Run abandoned.");
            session.reset();
            break;
        };

        match session.select(option) {
            Ok(events) => report(&session, &events),
            Err(e) => println!("ERROR: {}", e),
        }
    }

    println!("\n=== Finished: {} edition(s) ===", session.completed().len());
}

fn report(session: &PlaySession, events: &[SessionEvent]) {
    for event in events {
        match event {
            SessionEvent::Noun(NounEvent::Set { noun, value }) => {
                println!("  ({} is now '{}')", noun, value);
            }
            SessionEvent::Noun(NounEvent::Reset { noun }) => {
                println!("  ({} was cleared)", noun);
            }
            SessionEvent::Unschedulable { stuck, .. } => {
                println!("  ({} blank(s) in this edition cannot be filled and are skipped)", stuck.len());
            }
            SessionEvent::EditionCompleted { edition } => {
                if let Some(edition) = session.library().get(*edition) {
                    print_edition(edition);
                }
            }
            SessionEvent::RunFinished => {}
        }
    }
}

fn print_edition(edition: &Edition) {
    println!("\n==================================================");
    println!("{}", edition.name());
    println!("Issue #{}    {}", edition.issue_number(), edition.date());
    println!("==================================================\n");
    for (index, article) in edition.articles().iter().enumerate() {
        println!("{}\n", article.headline.to_uppercase());
        match edition.article_text(index, false) {
            Ok(text) => println!("{}\n", text.trim()),
            Err(e) => println!("(unfinished: {})\n", e),
        }
    }
}

fn print_usage() {
    println!("Usage: play --editions <dir> [--seed <n>] [--style <style.ron>]");
}
