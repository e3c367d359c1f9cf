use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use serde::Serialize;
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use strum::IntoEnumIterator;
use tracing::debug;

use crate::cache::{DealerKey, StateCache};
use crate::card::NUMBER_OF_RANKS;
use crate::{DeckComposition, Rank, ShoeTracker};

/// Index 0 is bust, indices 1..=5 are final totals 17..=21.
type DealerProbs = [f64; 6];

const BUST: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum SimulationMode {
    /// Repeated random dealer hands drawn from the shoe.
    MonteCarlo,
    /// Full enumeration of every dealer draw sequence.
    Exact,
}

/// Distribution of the dealer's final hand for one up card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealerOutcomeProbabilities {
    pub bust_probability: f64,
    /// Keys are the final totals 17 to 21.
    pub final_total_probabilities: BTreeMap<u8, f64>,
    /// Probability-weighted final total. Busts count as 0.
    pub expected_value: f64,
    pub blackjack_probability: f64,
}

impl DealerOutcomeProbabilities {
    fn from_probs(probs: &DealerProbs, blackjack_probability: f64) -> Self {
        let final_total_probabilities: BTreeMap<u8, f64> =
            (17..=21).map(|total| (total, probs[(total - 16) as usize])).collect();
        let expected_value = final_total_probabilities
            .iter()
            .map(|(&total, &p)| total as f64 * p)
            .sum();
        Self {
            bust_probability: probs[BUST],
            final_total_probabilities,
            expected_value,
            blackjack_probability,
        }
    }

    /// Probability that the dealer finishes on exactly `total`.
    pub fn p_final(&self, total: u8) -> f64 {
        self.final_total_probabilities
            .get(&total)
            .copied()
            .unwrap_or(0.0)
    }

    /// Bust probability plus every final total.
    pub fn total_probability(&self) -> f64 {
        self.bust_probability + self.final_total_probabilities.values().sum::<f64>()
    }
}

/// Probability that the dealer's hole card completes a natural.
///
/// The up card has already been dealt out of the tracked shoe, so the hole
/// card comes from the `total_cards` that remain. Insurance uses the same
/// denominator.
pub fn natural_probability(up_card: Rank, shoe: &DeckComposition) -> f64 {
    let total = shoe.total_cards();
    if total == 0 {
        return 0.0;
    }
    let completing = if up_card == Rank::Ace {
        shoe.ten_value_remaining()
    } else if up_card.is_ten_value() {
        shoe[Rank::Ace]
    } else {
        0
    };
    completing as f64 / total as f64
}

fn add_to_hand(total: u8, is_soft: bool, card_value: u8) -> (u8, bool) {
    let (total, is_soft) = if card_value == 1 && total + 11 <= 21 {
        (total + 11, true)
    } else {
        (total + card_value, is_soft)
    };
    if total > 21 && is_soft {
        (total - 10, false)
    } else {
        (total, is_soft)
    }
}

fn must_stand(total: u8, is_soft: bool, hits_soft17: bool) -> bool {
    total >= 18 || (total == 17 && !(is_soft && hits_soft17))
}

/// Outcome slot of a dealer hand that cannot draw any more, either because it
/// stands or because the shoe ran dry. A dry shoe below 17 counts as a bust.
fn terminal_slot(total: u8) -> usize {
    match total {
        17..=21 => (total - 16) as usize,
        _ => BUST,
    }
}

fn play_one_trial<R: Rng + ?Sized>(
    up_value: u8,
    values: &[u8; NUMBER_OF_RANKS],
    counts: &mut [u16; NUMBER_OF_RANKS],
    mut remaining: u16,
    hits_soft17: bool,
    rng: &mut R,
) -> usize {
    let (mut total, mut is_soft) = add_to_hand(0, false, up_value);
    loop {
        if total > 21 {
            return BUST;
        }
        if must_stand(total, is_soft, hits_soft17) || remaining == 0 {
            return terminal_slot(total);
        }

        let mut pick = rng.gen_range(0..remaining);
        let mut index = 0;
        while pick >= counts[index] {
            pick -= counts[index];
            index += 1;
        }
        counts[index] -= 1;
        remaining -= 1;

        (total, is_soft) = add_to_hand(total, is_soft, values[index]);
    }
}

/// Plays `trials` dealer hands from the up card, drawing each hand's cards
/// without replacement from a private copy of the shoe.
pub fn simulate_dealer<R: Rng + ?Sized>(
    up_card: Rank,
    shoe: &DeckComposition,
    hits_soft17: bool,
    trials: u32,
    rng: &mut R,
) -> DealerOutcomeProbabilities {
    let mut values = [0u8; NUMBER_OF_RANKS];
    for rank in Rank::iter() {
        values[rank.index()] = rank.blackjack_value();
    }

    let mut outcome_counts = [0u32; 6];
    for _ in 0..trials {
        let mut counts = *shoe.remaining_cards();
        let slot = play_one_trial(
            up_card.blackjack_value(),
            &values,
            &mut counts,
            shoe.total_cards(),
            hits_soft17,
            rng,
        );
        outcome_counts[slot] += 1;
    }

    let mut probs: DealerProbs = [0.0; 6];
    if trials > 0 {
        for (p, count) in probs.iter_mut().zip(outcome_counts.iter()) {
            *p = *count as f64 / trials as f64;
        }
    }
    DealerOutcomeProbabilities::from_probs(&probs, natural_probability(up_card, shoe))
}

/// Card counts by blackjack value, index 0 for Ace through 9 for ten-value.
type ValueShoe = [u16; 10];

fn exact_dealer_probs(
    memo: &mut HashMap<(ValueShoe, u8, bool), DealerProbs>,
    shoe: ValueShoe,
    total: u8,
    is_soft: bool,
    hits_soft17: bool,
) -> DealerProbs {
    if let Some(cached) = memo.get(&(shoe, total, is_soft)) {
        return *cached;
    }

    let mut result: DealerProbs = [0.0; 6];
    let remaining: u16 = shoe.iter().sum();
    if total > 21 {
        result[BUST] = 1.0;
    } else if must_stand(total, is_soft, hits_soft17) || remaining == 0 {
        result[terminal_slot(total)] = 1.0;
    } else {
        for index in 0..shoe.len() {
            if shoe[index] == 0 {
                continue;
            }
            let p = shoe[index] as f64 / remaining as f64;
            let (next_total, next_soft) = add_to_hand(total, is_soft, (index + 1) as u8);
            let mut next_shoe = shoe;
            next_shoe[index] -= 1;
            let sub = exact_dealer_probs(memo, next_shoe, next_total, next_soft, hits_soft17);
            for (r, s) in result.iter_mut().zip(sub.iter()) {
                *r += p * s;
            }
        }
    }

    memo.insert((shoe, total, is_soft), result);
    result
}

/// Exact dealer distribution by enumerating every draw sequence.
pub fn exact_dealer(
    up_card: Rank,
    shoe: &DeckComposition,
    hits_soft17: bool,
) -> DealerOutcomeProbabilities {
    let mut value_shoe: ValueShoe = [0; 10];
    for rank in Rank::iter() {
        value_shoe[(rank.blackjack_value() - 1) as usize] += shoe[rank];
    }
    let (total, is_soft) = add_to_hand(0, false, up_card.blackjack_value());
    let mut memo = HashMap::new();
    let probs = exact_dealer_probs(&mut memo, value_shoe, total, is_soft, hits_soft17);
    DealerOutcomeProbabilities::from_probs(&probs, natural_probability(up_card, shoe))
}

/// Dealer outcome source with a per-instance cache keyed on the up card and
/// the shoe snapshot.
#[derive(Debug, Clone)]
pub struct DealerSimulator {
    mode: SimulationMode,
    trials: u32,
    cache: StateCache<DealerKey, DealerOutcomeProbabilities>,
}

impl DealerSimulator {
    pub fn new(mode: SimulationMode, trials: u32) -> Self {
        Self {
            mode,
            trials,
            cache: StateCache::new(),
        }
    }

    pub fn outcomes<R: Rng + ?Sized>(
        &mut self,
        up_card: Rank,
        tracker: &ShoeTracker,
        hits_soft17: bool,
        rng: &mut R,
    ) -> DealerOutcomeProbabilities {
        let shoe = tracker.composition();
        self.cache.sync_version(tracker.version());
        let key = DealerKey::new(up_card.blackjack_value(), shoe, hits_soft17);
        if let Some(cached) = self.cache.get(&key) {
            debug!(up = %up_card, "dealer outcome cache hit");
            return cached.clone();
        }

        let outcomes = match self.mode {
            SimulationMode::MonteCarlo => {
                simulate_dealer(up_card, shoe, hits_soft17, self.trials, rng)
            }
            SimulationMode::Exact => exact_dealer(up_card, shoe, hits_soft17),
        };
        debug!(
            up = %up_card,
            mode = %self.mode,
            trials = self.trials,
            bust = outcomes.bust_probability,
            "dealer outcomes computed"
        );
        self.cache.insert(key, outcomes.clone());
        outcomes
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> (u64, u64) {
        self.cache.stats()
    }
}
