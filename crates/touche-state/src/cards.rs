//! # Penalty Cards
//!
//! Two card collections with different rules:
//!
//! - [`CardSet`]: per-competitor yellow/red cards in issue order. A yellow
//!   card toggles (a competitor holds at most one warning); red cards always
//!   append and are unbounded.
//! - [`PassivityLadder`]: the joint passivity call shared by both
//!   competitors. It escalates `PassivityYellow → PassivityRed`; red can only
//!   be given on top of yellow, and withdrawing yellow withdraws red with it.
//!
//! Both collections expose set-style operations (`has`, `add`,
//! `remove_with_dependents`) so the ladder rule lives in one place.

use serde::{Deserialize, Serialize};

/// A per-competitor penalty card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Card {
    /// Warning. Toggles on repeated application.
    Yellow,
    /// Penalty touch. Always appended.
    Red,
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yellow => f.write_str("yellow"),
            Self::Red => f.write_str("red"),
        }
    }
}

/// A step of the joint passivity ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassivityCard {
    /// First passivity call.
    #[serde(rename = "pYellow")]
    PassivityYellow,
    /// Second passivity call; requires an outstanding yellow.
    #[serde(rename = "pRed")]
    PassivityRed,
}

impl std::fmt::Display for PassivityCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PassivityYellow => f.write_str("passivity yellow"),
            Self::PassivityRed => f.write_str("passivity red"),
        }
    }
}

/// What a card operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardChange {
    /// The card was appended.
    Added,
    /// The card (and any dependents) was withdrawn.
    Removed,
    /// The operation was not permitted in the current state.
    Ignored,
}

// ─── CardSet ─────────────────────────────────────────────────────────

/// Ordered yellow/red cards held by one competitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardSet {
    cards: Vec<Card>,
}

impl CardSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether at least one `card` is held.
    pub fn has(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Number of `card`s held.
    pub fn count(&self, card: Card) -> usize {
        self.cards.iter().filter(|c| **c == card).count()
    }

    /// Append `card` unconditionally.
    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Withdraw every `card`.
    pub fn remove(&mut self, card: Card) {
        self.cards.retain(|c| *c != card);
    }

    /// Apply a card the way the referee issues it: yellow toggles, red
    /// appends.
    pub fn apply(&mut self, card: Card) -> CardChange {
        match card {
            Card::Yellow if self.has(Card::Yellow) => {
                self.remove(Card::Yellow);
                CardChange::Removed
            }
            Card::Yellow | Card::Red => {
                self.add(card);
                CardChange::Added
            }
        }
    }

    /// Withdraw all cards.
    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Cards in issue order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Cards in issue order.
    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Total number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether no card is held.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

// ─── PassivityLadder ─────────────────────────────────────────────────

/// Joint passivity penalties for the whole match.
///
/// Invariant: holds at most one `PassivityYellow` and at most one
/// `PassivityRed`, and `PassivityRed` is only held together with
/// `PassivityYellow`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassivityLadder {
    cards: Vec<PassivityCard>,
}

impl PassivityLadder {
    /// Empty ladder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `card` is outstanding.
    pub fn has(&self, card: PassivityCard) -> bool {
        self.cards.contains(&card)
    }

    /// Add `card` if the ladder permits it.
    pub fn add(&mut self, card: PassivityCard) -> CardChange {
        if self.has(card) {
            return CardChange::Ignored;
        }
        if card == PassivityCard::PassivityRed && !self.has(PassivityCard::PassivityYellow) {
            return CardChange::Ignored;
        }
        self.cards.push(card);
        CardChange::Added
    }

    /// Withdraw `card`; withdrawing yellow also withdraws red.
    pub fn remove_with_dependents(&mut self, card: PassivityCard) -> CardChange {
        if !self.has(card) {
            return CardChange::Ignored;
        }
        match card {
            PassivityCard::PassivityYellow => self.cards.clear(),
            PassivityCard::PassivityRed => {
                self.cards.retain(|c| *c != PassivityCard::PassivityRed)
            }
        }
        CardChange::Removed
    }

    /// Toggle `card`: withdraw it if outstanding, otherwise try to add it.
    pub fn toggle(&mut self, card: PassivityCard) -> CardChange {
        if self.has(card) {
            self.remove_with_dependents(card)
        } else {
            self.add(card)
        }
    }

    /// Withdraw everything.
    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Outstanding cards in issue order.
    pub fn as_slice(&self) -> &[PassivityCard] {
        &self.cards
    }

    /// Whether nothing is outstanding.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
