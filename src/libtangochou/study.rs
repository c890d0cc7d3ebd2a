use rand::rng;
use rand::seq::SliceRandom;

use crate::libtangochou::deck::{Deck, Flashcard};

/// One pass over a deck's cards, sequential unless shuffled up front.
#[derive(Debug)]
pub struct StudySession {
    cards: Vec<Flashcard>,
    position: usize,
}

impl StudySession {
    pub fn new(deck: &Deck, shuffle: bool) -> StudySession {
        let mut cards = deck.cards.clone();
        if shuffle {
            cards.shuffle(&mut rng());
        }
        StudySession { cards, position: 0 }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.position)
    }

    pub fn advance(&mut self) {
        self.position += 1;
    }
}

/// Trimmed, case-insensitive answer comparison.
pub fn answer_matches(card: &Flashcard, answer: &str) -> bool {
    card.answer.trim().to_lowercase() == answer.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_deck() -> Deck {
        let mut deck = Deck::new("Geo", "school");
        deck.add_card(Flashcard::new("Capital of France?", "Paris"));
        deck.add_card(Flashcard::new("Capital of Japan?", "Tokyo"));
        deck.add_card(Flashcard::new("Capital of Italy?", "Rome"));
        deck
    }

    #[test]
    fn session_walks_cards_in_order() {
        let deck = sample_deck();
        let mut session = StudySession::new(&deck, false);
        assert_eq!(session.len(), 3);

        let mut seen = Vec::new();
        while let Some(card) = session.current() {
            seen.push(card.question.clone());
            session.advance();
        }
        assert_eq!(
            seen,
            vec!["Capital of France?", "Capital of Japan?", "Capital of Italy?"]
        );
        assert!(session.current().is_none());
    }

    #[test]
    fn shuffled_session_keeps_every_card() {
        let deck = sample_deck();
        let mut session = StudySession::new(&deck, true);

        let mut answers = Vec::new();
        while let Some(card) = session.current() {
            answers.push(card.answer.clone());
            session.advance();
        }
        answers.sort();
        assert_eq!(answers, vec!["Paris", "Rome", "Tokyo"]);
    }

    #[test]
    fn empty_deck_yields_empty_session() {
        let session = StudySession::new(&Deck::default(), false);
        assert!(session.is_empty());
        assert!(session.current().is_none());
    }

    #[test]
    fn answer_matching_trims_and_ignores_case() {
        let card = Flashcard::new("Capital of France?", " Paris ");
        assert!(answer_matches(&card, "paris"));
        assert!(answer_matches(&card, "  PARIS\t"));
        assert!(!answer_matches(&card, "Lyon"));
        assert!(!answer_matches(&card, ""));
    }
}
