use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Flashcard {
        Flashcard {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A named, tagged, ordered collection of flashcards. Card indices are
/// positional and shift down on removal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub cards: Vec<Flashcard>,
}

impl Deck {
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Deck {
        Deck {
            name: name.into(),
            tag: tag.into(),
            cards: Vec::new(),
        }
    }

    pub fn add_card(&mut self, card: Flashcard) {
        self.cards.push(card);
    }

    pub fn card(&self, index: usize) -> Option<&Flashcard> {
        self.cards.get(index)
    }

    pub fn update_card(&mut self, index: usize, card: Flashcard) -> bool {
        match self.cards.get_mut(index) {
            Some(slot) => {
                *slot = card;
                true
            }
            None => false,
        }
    }

    pub fn remove_card(&mut self, index: usize) -> bool {
        if index >= self.cards.len() {
            return false;
        }
        self.cards.remove(index);
        true
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
