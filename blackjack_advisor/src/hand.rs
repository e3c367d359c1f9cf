use std::collections::BTreeSet;

use serde::Serialize;

use crate::{AdvisorError, Card, Rank};

/// Every total a set of cards can count as, Aces counting 1 or 11.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct HandTotals(BTreeSet<u8>);

impl HandTotals {
    pub fn new() -> Self {
        HandTotals(BTreeSet::from([0]))
    }

    /// Cross product of the current totals with the value set of `rank`.
    pub fn with_rank(&self, rank: Rank) -> Self {
        let mut totals = BTreeSet::new();
        for total in &self.0 {
            for value in rank.values() {
                totals.insert(total.saturating_add(*value));
            }
        }
        HandTotals(totals)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    pub fn all_bust(&self) -> bool {
        self.0.iter().all(|&total| total > 21)
    }

    /// Highest total that does not bust, if any.
    pub fn best(&self) -> Option<u8> {
        self.0.iter().rev().copied().find(|&total| total <= 21)
    }

    /// Lowest total, i.e. every Ace counted as 1.
    pub fn hard(&self) -> u8 {
        self.0.iter().next().copied().unwrap_or(0)
    }
}

impl Default for HandTotals {
    fn default() -> Self {
        Self::new()
    }
}

/// Compact identity of a hand for cache keys: two hands with the same
/// signature have the same totals and the same split option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandSignature {
    pub hard_total: u8,
    pub has_ace: bool,
    pub pair: Option<Rank>,
}

/// A player's cards in one betting spot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerHand {
    cards: Vec<Card>,
    totals: HandTotals,
}

impl PlayerHand {
    pub fn new(cards: &[Card]) -> Result<Self, AdvisorError> {
        if cards.is_empty() {
            return Err(AdvisorError::EmptyHand);
        }
        let totals = cards
            .iter()
            .fold(HandTotals::new(), |totals, card| totals.with_rank(card.rank));
        Ok(PlayerHand {
            cards: cards.to_vec(),
            totals,
        })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn possible_totals(&self) -> &HandTotals {
        &self.totals
    }

    pub fn best_total(&self) -> Option<u8> {
        self.totals.best()
    }

    pub fn is_busted(&self) -> bool {
        self.totals.all_bust()
    }

    /// True when an Ace is counted as 11 in the best total.
    pub fn is_soft(&self) -> bool {
        match self.best_total() {
            Some(best) => best != self.totals.hard(),
            None => false,
        }
    }

    /// The rank of the pair when the hand is exactly two cards of one rank.
    pub fn pair_rank(&self) -> Option<Rank> {
        match self.cards.as_slice() {
            [first, second] if first.rank == second.rank => Some(first.rank),
            _ => None,
        }
    }

    pub fn is_pair(&self) -> bool {
        self.pair_rank().is_some()
    }

    pub fn signature(&self) -> HandSignature {
        HandSignature {
            hard_total: self.totals.hard(),
            has_ace: self.cards.iter().any(|card| card.rank == Rank::Ace),
            pair: self.pair_rank(),
        }
    }
}
