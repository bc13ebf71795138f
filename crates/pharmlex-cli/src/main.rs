//! PharmLex — compound lookup from the command line.
//!
//! Stands in for the web presentation layer as the caller of the core
//! surface: store → index → resolve → assemble → present.

use std::path::PathBuf;

use anyhow::Context;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use pharmlex_core::{Language, PharmLexConfig};
use pharmlex_resolve::{assemble, resolve, PatternIndex};
use pharmlex_store::RecordStore;
use pharmlex_translate::{HttpTranslator, TranslationOverlay};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("import") => {
            if args.len() < 4 {
                eprintln!("Usage: pharmlex import <db> <fixture.json>");
                std::process::exit(1);
            }
            let store = RecordStore::open(&args[2])?;
            let json = std::fs::read_to_string(&args[3])
                .with_context(|| format!("reading fixture {}", args[3]))?;
            let count = store.import_json(&json)?;
            println!("Imported {} compound records into {}", count, args[2]);
            Ok(())
        }
        Some("search") => {
            if args.len() < 4 {
                eprintln!("Usage: pharmlex search <db> <query> [--lang <code>]");
                std::process::exit(1);
            }
            let lang = args
                .iter()
                .position(|a| a == "--lang")
                .and_then(|i| args.get(i + 1))
                .cloned();
            run_search(PathBuf::from(&args[2]), &args[3], lang).await
        }
        Some("--help" | "-h" | "help") | None => {
            println!("PharmLex — pharmaceutical compound lookup");
            println!();
            println!("Usage: pharmlex <command>");
            println!();
            println!("Commands:");
            println!("  import <db> <fixture.json>        Load a compound fixture into the store");
            println!("  search <db> <query> [--lang th]   Look up a compound by name");
            println!("  help                              Show this help message");
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown command: {}. Use 'pharmlex help' for usage.", other);
            std::process::exit(1);
        }
    }
}

async fn run_search(db_path: PathBuf, query: &str, lang: Option<String>) -> anyhow::Result<()> {
    let config = PharmLexConfig::from_env();

    let store = RecordStore::open(&db_path)?;
    let rows = store.list_name_rows()?;
    let index = PatternIndex::build(&rows, config.matching.clone());

    let outcome = resolve(query, &index);
    let assembled = assemble(&outcome, &store)?;

    // Unsupported language values fall back to the source-language record.
    let target = match lang {
        Some(code) => code.parse::<Language>().unwrap_or_else(|e| {
            warn!("{}; falling back to {}", e, config.translation.source_lang);
            config.translation.source_lang
        }),
        None => config.translation.source_lang,
    };

    let translator = HttpTranslator::new(&config.translation)?;
    let overlay = TranslationOverlay::new(translator, &config.translation);
    let localized = overlay.present(&assembled, target).await;

    println!("{}", serde_json::to_string_pretty(&localized)?);
    Ok(())
}
