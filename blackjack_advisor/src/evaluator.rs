use std::collections::HashMap;

use serde::Serialize;
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use tracing::trace;

use crate::draw::{bust_probability, draw_probabilities, DrawProbability};
use crate::{Decision, DealerOutcomeProbabilities, DeckComposition, GameRules, HandTotals, PlayerHand, Rank};

/// Two EVs closer than this are a tie.
pub const EV_EPSILON: f64 = 1e-9;

/// How a non-busting hit is valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum ContinuationModel {
    /// Fixed value by resulting total: 21 is 0.8, 17-20 is 0.5, below 17 is 0.2.
    Heuristic,
    /// Best of standing and hitting again, recursively, with the current shoe
    /// proportions held fixed for the rest of the hand.
    Recursive,
}

/// How a pair split is valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum SplitModel {
    /// Static EV per pair rank.
    LookupTable,
    /// Plays one post-split hand against the dealer distribution and counts it twice.
    PerHand,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BustProbabilities {
    pub after_hit: f64,
    pub after_double_down: f64,
}

/// EV of every action at one decision point. Unavailable actions are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerDecisionProbabilities {
    pub stand_ev: f64,
    pub hit_ev: f64,
    pub double_down_ev: f64,
    pub split_ev: Option<f64>,
    pub insurance_ev: Option<f64>,
    pub surrender_ev: Option<f64>,
    /// Insurance when it has positive EV, the primary decision otherwise.
    pub optimal_decision: Decision,
    /// Best action for the main bet, ignoring insurance.
    pub primary_decision: Decision,
    pub bust_probabilities: BustProbabilities,
}

/// Static split EVs. Ten-value pairs all share one entry.
pub fn split_table_ev(rank: Rank) -> f64 {
    match rank {
        Rank::Ace => 1.5,
        Rank::Eight => 0.8,
        Rank::Nine => 0.6,
        Rank::Seven => 0.4,
        Rank::Six => 0.2,
        Rank::Two | Rank::Three => 0.1,
        rank if rank.is_ten_value() => -0.5,
        _ => -0.2,
    }
}

fn heuristic_continuation(best_total: u8) -> f64 {
    match best_total {
        21..=u8::MAX => 0.8,
        17..=20 => 0.5,
        _ => 0.2,
    }
}

/// Picks the best of stand, hit, double and surrender. Candidates are
/// compared in that order and only a strictly larger EV (beyond
/// `EV_EPSILON`) displaces the current choice, so ties favour the earlier one.
pub fn get_max_expectation(stand: f64, hit: f64, double: f64, surrender: Option<f64>) -> (f64, Decision) {
    let (mut max_ex, mut decision) = (stand, Decision::Stand);
    if hit > max_ex + EV_EPSILON {
        (max_ex, decision) = (hit, Decision::Hit);
    }
    if double > max_ex + EV_EPSILON {
        (max_ex, decision) = (double, Decision::Double);
    }
    if let Some(surrender) = surrender {
        if surrender > max_ex + EV_EPSILON {
            (max_ex, decision) = (surrender, Decision::Surrender);
        }
    }
    (max_ex, decision)
}

/// Computes the EV of each player action against a given dealer distribution.
#[derive(Debug, Clone, Copy)]
pub struct DecisionEvaluator {
    rules: GameRules,
    continuation: ContinuationModel,
    split_model: SplitModel,
}

impl DecisionEvaluator {
    pub fn new(rules: GameRules, continuation: ContinuationModel, split_model: SplitModel) -> Self {
        Self {
            rules,
            continuation,
            split_model,
        }
    }

    /// EV of standing on `total`. `None` is a busted hand.
    pub fn stand_ev(&self, total: Option<u8>, dealer: &DealerOutcomeProbabilities) -> f64 {
        let total = match total {
            Some(total) => total,
            None => return -1.0,
        };
        let mut ev = dealer.bust_probability;
        for (&dealer_total, &p) in &dealer.final_total_probabilities {
            if total > dealer_total {
                ev += p;
            } else if total < dealer_total {
                ev -= p;
            }
        }
        ev
    }

    pub fn hit_ev(
        &self,
        draws: &[DrawProbability],
        shoe: &DeckComposition,
        dealer: &DealerOutcomeProbabilities,
    ) -> f64 {
        match self.continuation {
            ContinuationModel::Heuristic => draws
                .iter()
                .map(|draw| match draw.resulting_best_total() {
                    Some(best) if !draw.would_bust => draw.probability * heuristic_continuation(best),
                    _ => -draw.probability,
                })
                .sum(),
            ContinuationModel::Recursive => {
                let mut memo = HashMap::new();
                self.recursive_hit_value(draws, shoe, dealer, &mut memo)
            }
        }
    }

    /// Expected value of taking exactly one more card for a doubled bet.
    pub fn double_down_ev(&self, draws: &[DrawProbability], dealer: &DealerOutcomeProbabilities) -> f64 {
        draws
            .iter()
            .map(|draw| {
                if draw.would_bust {
                    -2.0 * draw.probability
                } else {
                    draw.probability * 2.0 * self.stand_ev(draw.resulting_best_total(), dealer)
                }
            })
            .sum()
    }

    /// Only defined for a pair, and only when the rules allow splitting.
    pub fn split_ev(
        &self,
        hand: &PlayerHand,
        shoe: &DeckComposition,
        dealer: &DealerOutcomeProbabilities,
    ) -> Option<f64> {
        let rank = hand.pair_rank()?;
        if self.rules.max_splits == 0 {
            return None;
        }
        let ev = match self.split_model {
            SplitModel::LookupTable => split_table_ev(rank),
            SplitModel::PerHand => 2.0 * self.post_split_hand_ev(rank, shoe, dealer),
        };
        Some(ev)
    }

    /// Only offered against an Ace. Pays 2:1 on a half-size side bet.
    pub fn insurance_ev(&self, up_card: Rank, shoe: &DeckComposition) -> Option<f64> {
        if up_card != Rank::Ace {
            return None;
        }
        let p_ten = if shoe.total_cards() == 0 {
            0.0
        } else {
            shoe.ten_value_remaining() as f64 / shoe.total_cards() as f64
        };
        Some(p_ten - 0.5 * (1.0 - p_ten))
    }

    pub fn surrender_ev(&self) -> Option<f64> {
        if self.rules.allow_late_surrender {
            Some(-0.5)
        } else {
            None
        }
    }

    pub fn evaluate(
        &self,
        hand: &PlayerHand,
        up_card: Rank,
        shoe: &DeckComposition,
        dealer: &DealerOutcomeProbabilities,
    ) -> PlayerDecisionProbabilities {
        let draws = draw_probabilities(hand.possible_totals(), shoe);
        let stand_ev = self.stand_ev(hand.best_total(), dealer);
        let hit_ev = self.hit_ev(&draws, shoe, dealer);
        let double_down_ev = self.double_down_ev(&draws, dealer);
        let split_ev = self.split_ev(hand, shoe, dealer);
        let insurance_ev = self.insurance_ev(up_card, shoe);
        let surrender_ev = self.surrender_ev();

        let (max_ex, mut primary_decision) =
            get_max_expectation(stand_ev, hit_ev, double_down_ev, surrender_ev);
        if let Some(split_ev) = split_ev {
            if split_ev > max_ex + EV_EPSILON {
                primary_decision = Decision::Split;
            }
        }
        let optimal_decision = match insurance_ev {
            Some(insurance_ev) if insurance_ev > 0.0 => Decision::Insurance,
            _ => primary_decision,
        };

        let bust = bust_probability(&draws);
        trace!(
            stand_ev,
            hit_ev,
            double_down_ev,
            ?split_ev,
            ?insurance_ev,
            ?surrender_ev,
            decision = %optimal_decision,
            "evaluated decision point"
        );

        PlayerDecisionProbabilities {
            stand_ev,
            hit_ev,
            double_down_ev,
            split_ev,
            insurance_ev,
            surrender_ev,
            optimal_decision,
            primary_decision,
            bust_probabilities: BustProbabilities {
                after_hit: bust,
                after_double_down: bust,
            },
        }
    }

    /// Value of a non-busted hand when the player keeps playing optimally
    /// between standing and hitting.
    fn recursive_hand_value(
        &self,
        totals: &HandTotals,
        shoe: &DeckComposition,
        dealer: &DealerOutcomeProbabilities,
        memo: &mut HashMap<(u8, Option<u8>), f64>,
    ) -> f64 {
        let key = (totals.hard(), totals.best());
        if let Some(value) = memo.get(&key) {
            return *value;
        }
        let stand = self.stand_ev(totals.best(), dealer);
        let value = if totals.best() == Some(21) {
            stand
        } else {
            let draws = draw_probabilities(totals, shoe);
            stand.max(self.recursive_hit_value(&draws, shoe, dealer, memo))
        };
        memo.insert(key, value);
        value
    }

    fn recursive_hit_value(
        &self,
        draws: &[DrawProbability],
        shoe: &DeckComposition,
        dealer: &DealerOutcomeProbabilities,
        memo: &mut HashMap<(u8, Option<u8>), f64>,
    ) -> f64 {
        draws
            .iter()
            .map(|draw| {
                if draw.would_bust {
                    -draw.probability
                } else {
                    draw.probability
                        * self.recursive_hand_value(&draw.resulting_hand_totals, shoe, dealer, memo)
                }
            })
            .sum()
    }

    /// EV of one hand started from a single split card. Split Aces get one
    /// card and stand.
    fn post_split_hand_ev(&self, rank: Rank, shoe: &DeckComposition, dealer: &DealerOutcomeProbabilities) -> f64 {
        let start = HandTotals::new().with_rank(rank);
        draw_probabilities(&start, shoe)
            .iter()
            .map(|draw| {
                let totals = &draw.resulting_hand_totals;
                let stand = self.stand_ev(totals.best(), dealer);
                let ev = if rank == Rank::Ace {
                    stand
                } else {
                    let next_draws = draw_probabilities(totals, shoe);
                    let mut ev = stand.max(self.hit_ev(&next_draws, shoe, dealer));
                    if self.rules.allow_das {
                        ev = ev.max(self.double_down_ev(&next_draws, dealer));
                    }
                    ev
                };
                draw.probability * ev
            })
            .sum()
    }
}
