use serde::Serialize;
use strum::IntoEnumIterator;

use crate::{DeckComposition, HandTotals, Rank};

/// Chance that the next card out of the shoe is a given rank, and what it
/// would do to the hand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawProbability {
    pub rank: Rank,
    pub probability: f64,
    pub remaining_count: u16,
    pub resulting_hand_totals: HandTotals,
    pub would_bust: bool,
}

impl DrawProbability {
    /// Best non-busting total after the draw.
    pub fn resulting_best_total(&self) -> Option<u8> {
        self.resulting_hand_totals.best()
    }
}

/// One entry per rank that still has cards in the shoe, in rank order.
/// An empty shoe yields no entries.
pub fn draw_probabilities(totals: &HandTotals, shoe: &DeckComposition) -> Vec<DrawProbability> {
    let total_cards = shoe.total_cards();
    if total_cards == 0 {
        return Vec::new();
    }

    Rank::iter()
        .filter(|&rank| shoe[rank] > 0)
        .map(|rank| {
            let resulting_hand_totals = totals.with_rank(rank);
            DrawProbability {
                rank,
                probability: shoe[rank] as f64 / total_cards as f64,
                remaining_count: shoe[rank],
                would_bust: resulting_hand_totals.all_bust(),
                resulting_hand_totals,
            }
        })
        .collect()
}

/// Probability that one more card busts the hand.
pub fn bust_probability(draws: &[DrawProbability]) -> f64 {
    draws
        .iter()
        .filter(|draw| draw.would_bust)
        .map(|draw| draw.probability)
        .sum()
}
