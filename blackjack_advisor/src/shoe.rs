use std::ops::Index;

use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

use crate::card::NUMBER_OF_RANKS;
use crate::{AdvisorError, Card, ConsistencyWarning, Rank};

pub const CARDS_PER_DECK: u16 = 52;

/// Snapshot of what is left in the shoe, along with the Hi-Lo count derived
/// from the cards seen so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckComposition {
    total_cards: u16,
    remaining_cards: [u16; NUMBER_OF_RANKS],
    card_percentages: [f64; NUMBER_OF_RANKS],
    running_count: i32,
    true_count: f64,
    decks_remaining: f64,
}

impl DeckComposition {
    /// Builds a composition from raw per-rank counts (indexed by `Rank::index`)
    /// and a running count. Every derived field is recomputed.
    pub fn from_counts(remaining_cards: [u16; NUMBER_OF_RANKS], running_count: i32) -> Self {
        let mut composition = DeckComposition {
            total_cards: 0,
            remaining_cards,
            card_percentages: [0.0; NUMBER_OF_RANKS],
            running_count,
            true_count: 0.0,
            decks_remaining: 0.0,
        };
        composition.propagate_counts();
        composition
    }

    pub fn with_number_of_decks(number_of_decks: u8) -> Self {
        Self::from_counts([number_of_decks as u16 * 4; NUMBER_OF_RANKS], 0)
    }

    pub fn total_cards(&self) -> u16 {
        self.total_cards
    }

    pub fn remaining(&self, rank: Rank) -> u16 {
        self.remaining_cards[rank.index()]
    }

    pub fn percentage(&self, rank: Rank) -> f64 {
        self.card_percentages[rank.index()]
    }

    pub fn running_count(&self) -> i32 {
        self.running_count
    }

    pub fn true_count(&self) -> f64 {
        self.true_count
    }

    pub fn decks_remaining(&self) -> f64 {
        self.decks_remaining
    }

    /// Remaining cards per rank, in `Rank` order.
    pub fn remaining_cards(&self) -> &[u16; NUMBER_OF_RANKS] {
        &self.remaining_cards
    }

    /// Remaining cards whose blackjack value is 10.
    pub fn ten_value_remaining(&self) -> u16 {
        Rank::iter()
            .filter(|rank| rank.is_ten_value())
            .map(|rank| self.remaining(rank))
            .sum()
    }

    /// Probability that the next card has the given blackjack value.
    /// Returns 0 for an empty shoe.
    pub fn value_proportion(&self, blackjack_value: u8) -> f64 {
        if self.total_cards == 0 {
            return 0.0;
        }
        let count: u16 = Rank::iter()
            .filter(|rank| rank.blackjack_value() == blackjack_value)
            .map(|rank| self.remaining(rank))
            .sum();
        count as f64 / self.total_cards as f64
    }

    /// Removes one card of the given rank. Returns false, leaving everything
    /// untouched, when no card of that rank remains.
    fn remove_card(&mut self, rank: Rank) -> bool {
        let count = &mut self.remaining_cards[rank.index()];
        if *count == 0 {
            return false;
        }
        *count -= 1;
        self.total_cards -= 1;
        self.running_count += rank.hi_lo_weight();
        true
    }

    fn propagate_counts(&mut self) {
        self.total_cards = self.remaining_cards.iter().sum();
        for i in 0..NUMBER_OF_RANKS {
            self.card_percentages[i] = if self.total_cards == 0 {
                0.0
            } else {
                self.remaining_cards[i] as f64 / self.total_cards as f64
            };
        }
        self.decks_remaining = self.total_cards as f64 / CARDS_PER_DECK as f64;
        self.true_count = if self.decks_remaining > 0.0 {
            self.running_count as f64 / self.decks_remaining
        } else {
            0.0
        };
    }
}

impl Index<Rank> for DeckComposition {
    type Output = u16;
    fn index(&self, rank: Rank) -> &Self::Output {
        &self.remaining_cards[rank.index()]
    }
}

/// Tracks the cards left in the shoe of one table. Cards only ever leave the
/// shoe, until `reset` puts all of them back.
#[derive(Debug, Clone)]
pub struct ShoeTracker {
    number_of_decks: u8,
    initial: DeckComposition,
    current: DeckComposition,
    version: u64,
}

impl ShoeTracker {
    pub fn initialize(number_of_decks: u8) -> Result<Self, AdvisorError> {
        if number_of_decks == 0 {
            return Err(AdvisorError::InvalidDeckCount(number_of_decks));
        }
        let initial = DeckComposition::with_number_of_decks(number_of_decks);
        Ok(ShoeTracker {
            number_of_decks,
            current: initial.clone(),
            initial,
            version: 0,
        })
    }

    /// Removes the dealt cards from the shoe in dealing order and updates the
    /// count. A card whose rank is already exhausted is skipped and reported.
    pub fn apply_dealt(&mut self, cards: &[Card]) -> Vec<ConsistencyWarning> {
        let mut warnings = Vec::new();
        for card in cards {
            if !self.current.remove_card(card.rank) {
                warn!(card = %card, "dealt card is not in the shoe, ignoring it");
                warnings.push(ConsistencyWarning::InvalidRankDepletion { rank: card.rank });
            }
        }
        self.current.propagate_counts();
        self.version += 1;
        debug!(
            dealt = cards.len(),
            remaining = self.current.total_cards,
            running_count = self.current.running_count,
            true_count = self.current.true_count,
            version = self.version,
            "applied dealt cards"
        );
        warnings
    }

    /// Puts every card back, as if the shoe had just been initialized.
    pub fn reset(&mut self) {
        self.current = self.initial.clone();
        self.version += 1;
        debug!(version = self.version, "shoe reset");
    }

    pub fn composition(&self) -> &DeckComposition {
        &self.current
    }

    pub fn number_of_decks(&self) -> u8 {
        self.number_of_decks
    }

    /// Identity of the current snapshot. Changes on every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Fraction of the shoe already dealt.
    pub fn deck_penetration(&self) -> f64 {
        let initial_total = self.initial.total_cards;
        if initial_total == 0 {
            return 0.0;
        }
        (initial_total - self.current.total_cards) as f64 / initial_total as f64
    }
}
