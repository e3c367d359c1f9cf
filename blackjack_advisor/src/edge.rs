use serde::Serialize;

use crate::GameRules;

/// House edge of the reference game: 3:2 naturals, dealer stands on soft 17,
/// six decks, no double after split, no surrender.
pub const BASE_EDGE: f64 = 0.005;

/// Edge shift per point of true count. Negative moves the edge toward the player.
pub const EDGE_PER_TRUE_COUNT: f64 = -0.005;

const PAYOUT_EFFECTS: [(f64, f64); 4] = [(1.5, 0.0), (1.2, 0.0139), (1.0, 0.0227), (2.0, -0.0227)];

/// Edge cost per unit of payout below 3:2, for ratios outside the table.
const PAYOUT_SLOPE: f64 = 0.0454;

const DECK_EFFECTS: [(u8, f64); 8] = [
    (1, -0.0048),
    (2, -0.0019),
    (3, -0.0010),
    (4, -0.0006),
    (5, -0.0003),
    (6, 0.0),
    (7, 0.0001),
    (8, 0.0002),
];

const SOFT17_EFFECT: f64 = 0.0022;
const DAS_EFFECT: f64 = -0.0014;
const SURRENDER_EFFECT: f64 = -0.0008;

/// Every term that went into the edge, as fractions of the bet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeFactors {
    pub baseline: f64,
    pub blackjack_payout: f64,
    pub dealer_soft17: f64,
    pub deck_count: f64,
    pub double_after_split: f64,
    pub surrender: f64,
    pub true_count: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HouseEdgeInfo {
    pub base_house_edge: f64,
    pub current_house_edge: f64,
    pub edge_factors: EdgeFactors,
    pub deck_favors_player: bool,
}

impl HouseEdgeInfo {
    pub fn base_house_edge_percent(&self) -> f64 {
        self.base_house_edge * 100.0
    }

    pub fn current_house_edge_percent(&self) -> f64 {
        self.current_house_edge * 100.0
    }
}

pub fn blackjack_payout_effect(payout: f64) -> f64 {
    PAYOUT_EFFECTS
        .iter()
        .find(|(ratio, _)| (ratio - payout).abs() < 1e-9)
        .map(|(_, effect)| *effect)
        .unwrap_or((1.5 - payout) * PAYOUT_SLOPE)
}

pub fn dealer_soft17_effect(dealer_hit_on_soft17: bool) -> f64 {
    if dealer_hit_on_soft17 {
        SOFT17_EFFECT
    } else {
        0.0
    }
}

/// Shoes larger than the table clamp to the eight-deck entry.
pub fn deck_count_effect(number_of_decks: u8) -> f64 {
    let decks = number_of_decks.clamp(1, 8);
    DECK_EFFECTS
        .iter()
        .find(|(count, _)| *count == decks)
        .map(|(_, effect)| *effect)
        .unwrap_or(0.0)
}

/// (double after split, surrender) effects.
pub fn other_rules_effect(allow_das: bool, allow_late_surrender: bool) -> (f64, f64) {
    (
        if allow_das { DAS_EFFECT } else { 0.0 },
        if allow_late_surrender {
            SURRENDER_EFFECT
        } else {
            0.0
        },
    )
}

pub fn house_edge(rules: &GameRules, true_count: f64) -> HouseEdgeInfo {
    let (double_after_split, surrender) =
        other_rules_effect(rules.allow_das, rules.allow_late_surrender);
    let edge_factors = EdgeFactors {
        baseline: BASE_EDGE,
        blackjack_payout: blackjack_payout_effect(rules.payout_blackjack),
        dealer_soft17: dealer_soft17_effect(rules.dealer_hit_on_soft17),
        deck_count: deck_count_effect(rules.number_of_decks),
        double_after_split,
        surrender,
        true_count: EDGE_PER_TRUE_COUNT * true_count,
    };
    let base_house_edge = edge_factors.baseline
        + edge_factors.blackjack_payout
        + edge_factors.dealer_soft17
        + edge_factors.deck_count
        + (edge_factors.double_after_split + edge_factors.surrender);
    HouseEdgeInfo {
        base_house_edge,
        current_house_edge: base_house_edge + edge_factors.true_count,
        edge_factors,
        deck_favors_player: true_count > 0.0,
    }
}
