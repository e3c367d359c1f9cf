use serde::{Deserialize, Serialize};

use crate::AdvisorError;

/// Table rules the engine reads. Owned by the configuration layer, the engine
/// only keeps a copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    pub number_of_decks: u8,
    /// Payout of a natural, e.g. 1.5 for 3:2 and 1.2 for 6:5.
    pub payout_blackjack: f64,
    pub dealer_hit_on_soft17: bool,
    pub allow_das: bool,
    pub allow_late_surrender: bool,
    /// 0 disables splitting entirely.
    pub max_splits: u8,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            number_of_decks: 6,
            payout_blackjack: 1.5,
            dealer_hit_on_soft17: false,
            allow_das: true,
            allow_late_surrender: true,
            max_splits: 3,
        }
    }
}

impl GameRules {
    /// Rules with every optional player-friendly rule turned off. Its house edge
    /// is the 0.5% baseline.
    pub fn baseline() -> Self {
        Self {
            number_of_decks: 6,
            payout_blackjack: 1.5,
            dealer_hit_on_soft17: false,
            allow_das: false,
            allow_late_surrender: false,
            max_splits: 3,
        }
    }

    /// Single deck, dealer hits soft 17, 6:5 naturals.
    pub fn single_deck() -> Self {
        Self {
            number_of_decks: 1,
            payout_blackjack: 1.2,
            dealer_hit_on_soft17: true,
            allow_das: false,
            allow_late_surrender: false,
            max_splits: 1,
        }
    }

    pub fn validate(&self) -> Result<(), AdvisorError> {
        if self.number_of_decks == 0 {
            return Err(AdvisorError::InvalidDeckCount(self.number_of_decks));
        }
        if !self.payout_blackjack.is_finite() || self.payout_blackjack <= 0.0 {
            return Err(AdvisorError::InvalidPayout(self.payout_blackjack));
        }
        Ok(())
    }
}
