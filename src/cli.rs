use std::path::Path;

use colored::Colorize;
use log::debug;
use text_io::read;

use crate::libtangochou::deck::{Deck, Flashcard};
use crate::libtangochou::error::StoreError;
use crate::libtangochou::stats::StatsTracker;
use crate::libtangochou::store::DeckStore;
use crate::libtangochou::study::{answer_matches, StudySession};

pub const DECKS_PER_PAGE: usize = 9;

pub fn list_decks(store: &DeckStore, tag: Option<&str>, page: usize) -> Result<(), StoreError> {
    let names = filtered_deck_names(store, tag);
    if names.is_empty() {
        println!(
            "{}",
            "No decks found. Come back when you have created or imported some!".yellow()
        );
        return Ok(());
    }

    let total = names.len().div_ceil(DECKS_PER_PAGE);
    let page = page.clamp(1, total);
    for name in names.iter().skip((page - 1) * DECKS_PER_PAGE).take(DECKS_PER_PAGE) {
        // Names come from the store, the lookup cannot miss.
        if let Some(deck) = store.deck(name) {
            let detail = if deck.tag.is_empty() {
                format!("({} cards)", deck.len())
            } else {
                format!("[{}] ({} cards)", deck.tag, deck.len())
            };
            println!("{} {}", name.bold(), detail.cyan());
        }
    }
    println!("{}", format!("Page {} of {}", page, total).cyan());
    Ok(())
}

pub(crate) fn filtered_deck_names(store: &DeckStore, tag: Option<&str>) -> Vec<String> {
    let names = store.deck_names();
    match tag.map(str::trim) {
        None | Some("") => names,
        Some(tag) => names
            .into_iter()
            .filter(|name| store.deck(name).is_some_and(|deck| deck.tag == tag))
            .collect(),
    }
}

pub fn create_deck(
    store: &mut DeckStore,
    stats: &StatsTracker,
    name: &str,
    tag: &str,
) -> Result<(), StoreError> {
    let name = name.trim();
    if name.is_empty() {
        println!("{}", "Deck name cannot be empty.".red());
        return Ok(());
    }
    store.add_deck(Deck::new(name, tag.trim()))?;
    stats.track_deck_created();
    println!("{}", format!("Created deck '{}'.", name).green());
    Ok(())
}

pub fn delete_deck(store: &mut DeckStore, name: &str) -> Result<(), StoreError> {
    if store.remove_deck(name)? {
        println!("{}", format!("Deleted deck '{}'.", name).green());
    } else {
        println!("{}", format!("No deck named '{}'.", name).red());
    }
    Ok(())
}

pub fn rename_deck(store: &mut DeckStore, old: &str, new: &str) -> Result<(), StoreError> {
    let new = new.trim();
    if new.is_empty() {
        println!("{}", "Deck name cannot be empty.".red());
        return Ok(());
    }
    store.rename_deck(old, new)?;
    println!("{}", format!("Renamed deck '{}' to '{}'.", old, new).green());
    Ok(())
}

pub fn list_cards(store: &DeckStore, name: &str) -> Result<(), StoreError> {
    let deck = store
        .deck(name)
        .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
    if deck.is_empty() {
        println!("{}", "This deck has no cards yet.".yellow());
        return Ok(());
    }
    for (i, card) in deck.cards.iter().enumerate() {
        println!(
            "{} {} {} {}",
            format!("{}.", i + 1).bold(),
            card.question,
            "->".cyan(),
            card.answer
        );
    }
    Ok(())
}

pub fn add_card(
    store: &mut DeckStore,
    stats: &StatsTracker,
    name: &str,
    question: &str,
    answer: &str,
) -> Result<(), StoreError> {
    let mut deck = store
        .checkout(name)
        .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
    deck.add_card(Flashcard::new(question, answer));
    store.commit(deck)?;
    stats.track_card_created();
    println!("{}", format!("Added card to '{}'.", name).green());
    Ok(())
}

pub fn edit_card(
    store: &mut DeckStore,
    name: &str,
    index: usize,
    question: Option<&str>,
    answer: Option<&str>,
) -> Result<(), StoreError> {
    let mut deck = store
        .checkout(name)
        .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
    let Some(current) = index.checked_sub(1).and_then(|i| deck.card(i)).cloned() else {
        println!("{}", format!("No card {} in '{}'.", index, name).red());
        return Ok(());
    };
    let updated = Flashcard::new(
        question.unwrap_or(&current.question),
        answer.unwrap_or(&current.answer),
    );
    deck.update_card(index - 1, updated);
    store.commit(deck)?;
    println!("{}", format!("Updated card {} in '{}'.", index, name).green());
    Ok(())
}

pub fn remove_card(store: &mut DeckStore, name: &str, index: usize) -> Result<(), StoreError> {
    let mut deck = store
        .checkout(name)
        .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
    let removed = index.checked_sub(1).is_some_and(|i| deck.remove_card(i));
    if !removed {
        println!("{}", format!("No card {} in '{}'.", index, name).red());
        return Ok(());
    }
    store.commit(deck)?;
    println!("{}", format!("Removed card {} from '{}'.", index, name).green());
    Ok(())
}

pub fn study(
    store: &DeckStore,
    stats: &StatsTracker,
    name: &str,
    shuffle: bool,
) -> Result<(), StoreError> {
    let deck = store
        .deck(name)
        .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
    if deck.is_empty() {
        println!("{}", "No cards in this deck.".yellow());
        return Ok(());
    }

    let mut session = StudySession::new(deck, shuffle);
    println!(
        "{}",
        format!("==========> {} ({} cards) <==========", deck.name, session.len()).cyan()
    );

    let mut correct = 0usize;
    let mut reviewed = 0usize;
    while let Some(card) = session.current() {
        let leading = format!("{}/{}. ", session.position() + 1, session.len());
        println!(
            "{}{}",
            leading.cyan(),
            card.question.as_str().black().bold().on_white()
        );

        print!("{} ", "Answer (q to quit early):".cyan());
        let input: String = read!("{}\n");
        debug!("[Quiz] answer input: {:?}", input);
        if input.trim() == "q" {
            println!("{}", "Quitting Early!".cyan());
            break;
        }

        reviewed += 1;
        if answer_matches(card, &input) {
            println!("{}", "Correct!".bright_green());
            stats.track_correct_answer();
            correct += 1;
        } else {
            println!(
                "{}",
                format!("Incorrect! The answer was: {}", card.answer).bright_red()
            );
            stats.track_incorrect_answer();
        }
        stats.track_review();
        session.advance();
    }

    println!("{}", format!("Done! {}/{} correct.", correct, reviewed).cyan());
    Ok(())
}

pub fn show_stats(stats: &StatsTracker) {
    println!("{}", "Statistics".bold());
    println!("Total Decks: {}", stats.total_decks());
    println!("Total Cards: {}", stats.total_cards());
    println!("Total Reviews: {}", stats.total_reviews());
    println!("Correct: {}", stats.total_correct());
    println!("Incorrect: {}", stats.total_incorrect());
}

pub fn reset_stats(stats: &StatsTracker) {
    stats.reset();
    println!("{}", "All statistics reset.".green());
}

pub fn import_deck(store: &mut DeckStore, file: &Path) -> Result<(), StoreError> {
    let name = store.import_deck(file)?;
    println!("{}", format!("Imported deck '{}'.", name).green());
    Ok(())
}

pub fn export_deck(store: &DeckStore, name: &str, file: &Path) -> Result<(), StoreError> {
    store.export_deck(name, file)?;
    println!("{}", format!("Exported deck '{}' to {:?}.", name, file).green());
    Ok(())
}

pub fn export_all(store: &DeckStore, file: &Path) -> Result<(), StoreError> {
    store.export_all(file)?;
    println!(
        "{}",
        format!("Exported {} decks to {:?}.", store.len(), file).green()
    );
    Ok(())
}
