use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use log::error;

mod cli;
mod libtangochou;

use crate::libtangochou::stats::{default_stats_path, StatsTracker};
use crate::libtangochou::store::{default_storage_path, DeckStore};

#[derive(Parser, Debug)]
#[command(name = "単語帳 (Tangochō)")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, default_value = "error")]
    log_level: String,
    #[arg(short, long, value_name = "FILE")]
    store: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List decks, 9 per page, optionally filtered by tag
    List {
        #[arg(short, long)]
        tag: Option<String>,
        #[arg(short, long, default_value = "1")]
        page: usize,
    },
    /// Create an empty deck
    New {
        name: String,
        #[arg(short, long, default_value = "")]
        tag: String,
    },
    Delete {
        name: String,
    },
    Rename {
        old: String,
        new: String,
    },
    /// Show the cards of a deck
    Cards {
        deck: String,
    },
    /// Append a card to a deck
    Add {
        deck: String,
        question: String,
        answer: String,
    },
    /// Rewrite a card (1-based index); omitted fields keep their value
    Edit {
        deck: String,
        index: usize,
        #[arg(short, long)]
        question: Option<String>,
        #[arg(short, long)]
        answer: Option<String>,
    },
    /// Remove a card (1-based index)
    Remove {
        deck: String,
        index: usize,
    },
    /// Quiz yourself on a deck
    Study {
        deck: String,
        #[arg(short, long)]
        shuffle: bool,
    },
    Stats,
    ResetStats,
    Import {
        file: PathBuf,
    },
    Export {
        deck: String,
        file: PathBuf,
    },
    ExportAll {
        file: PathBuf,
    },
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level)).init();

    let store_path = match args.store.or_else(default_storage_path) {
        Some(path) => path,
        None => {
            error!("{}", "Cannot determine a data directory for the deck store!".red());
            exit(1);
        }
    };
    let mut store = DeckStore::new(store_path);
    let report = match store.load() {
        Ok(report) => report,
        Err(err) => {
            error!(
                "{}",
                format!("Unable to load decks from {:?}: {}", store.path(), err).red()
            );
            exit(1);
        }
    };
    if report.skipped > 0 {
        println!(
            "{}",
            format!(
                "Skipped {} malformed deck entries in {:?}.",
                report.skipped,
                store.path()
            )
            .yellow()
        );
    }

    let stats = match default_stats_path() {
        Some(path) => StatsTracker::new(path),
        None => {
            error!("{}", "Cannot determine a config directory for statistics!".red());
            exit(1);
        }
    };

    let result = match args.command {
        Commands::List { tag, page } => cli::list_decks(&store, tag.as_deref(), page),
        Commands::New { name, tag } => cli::create_deck(&mut store, &stats, &name, &tag),
        Commands::Delete { name } => cli::delete_deck(&mut store, &name),
        Commands::Rename { old, new } => cli::rename_deck(&mut store, &old, &new),
        Commands::Cards { deck } => cli::list_cards(&store, &deck),
        Commands::Add {
            deck,
            question,
            answer,
        } => cli::add_card(&mut store, &stats, &deck, &question, &answer),
        Commands::Edit {
            deck,
            index,
            question,
            answer,
        } => cli::edit_card(
            &mut store,
            &deck,
            index,
            question.as_deref(),
            answer.as_deref(),
        ),
        Commands::Remove { deck, index } => cli::remove_card(&mut store, &deck, index),
        Commands::Study { deck, shuffle } => cli::study(&store, &stats, &deck, shuffle),
        Commands::Stats => {
            cli::show_stats(&stats);
            Ok(())
        }
        Commands::ResetStats => {
            cli::reset_stats(&stats);
            Ok(())
        }
        Commands::Import { file } => cli::import_deck(&mut store, &file),
        Commands::Export { deck, file } => cli::export_deck(&store, &deck, &file),
        Commands::ExportAll { file } => cli::export_all(&store, &file),
    };

    if let Err(err) = result {
        error!("{}", format!("{}", err).red());
        exit(1);
    }
}
