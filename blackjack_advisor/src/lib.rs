pub mod cache;
mod card;
pub mod dealer;
pub mod draw;
pub mod edge;
pub mod engine;
mod error;
pub mod evaluator;
mod hand;
mod rules;
mod shoe;

use serde_enum_str::Serialize_enum_str;

pub use card::{Card, Rank, Suit, NUMBER_OF_RANKS};
pub use dealer::{DealerOutcomeProbabilities, SimulationMode};
pub use draw::DrawProbability;
pub use edge::HouseEdgeInfo;
pub use engine::{Advisor, EngineConfig};
pub use error::{AdvisorError, ConsistencyWarning};
pub use evaluator::{ContinuationModel, PlayerDecisionProbabilities, SplitModel};
pub use hand::{HandSignature, HandTotals, PlayerHand};
pub use rules::GameRules;
pub use shoe::{DeckComposition, ShoeTracker, CARDS_PER_DECK};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize_enum_str)]
pub enum Decision {
    Stand,
    Hit,
    Double,
    Surrender,
    Split,
    Insurance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decisions_print_by_name() {
        assert_eq!(Decision::Insurance.to_string(), "Insurance");
        assert_eq!(Decision::Double.to_string(), "Double");
    }
}
