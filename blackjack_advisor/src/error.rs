use thiserror::Error;

use crate::Rank;

/// Errors raised at the configuration and input boundary. Nothing past that
/// boundary fails: the probability code works on validated inputs only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvisorError {
    #[error("number of decks must be at least 1, got {0}")]
    InvalidDeckCount(u8),
    #[error("blackjack payout must be a positive finite ratio, got {0}")]
    InvalidPayout(f64),
    #[error("number of dealer simulation trials must be at least 1")]
    InvalidTrialCount,
    #[error("invalid card: {0:?}")]
    InvalidCard(String),
    #[error("a hand needs at least one card")]
    EmptyHand,
}

/// Non-fatal data consistency problems reported back to the caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyWarning {
    /// A card of this rank was reported as dealt although none remained in the shoe.
    #[error("dealt a {rank} but none were left in the shoe")]
    InvalidRankDepletion { rank: Rank },
}
