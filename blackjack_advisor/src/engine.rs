use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::cache::{DecisionKey, StateCache};
use crate::dealer::{DealerOutcomeProbabilities, DealerSimulator, SimulationMode};
use crate::draw::{draw_probabilities, DrawProbability};
use crate::edge::{house_edge, HouseEdgeInfo};
use crate::evaluator::{ContinuationModel, DecisionEvaluator, PlayerDecisionProbabilities, SplitModel};
use crate::{AdvisorError, Card, ConsistencyWarning, DeckComposition, GameRules, PlayerHand, Rank, ShoeTracker};

pub const DEFAULT_TRIALS: u32 = 10_000;

/// Knobs of the engine itself, as opposed to the table rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub simulation_mode: SimulationMode,
    pub trials: u32,
    /// Fixed seed for reproducible simulations. Entropy when absent.
    pub seed: Option<u64>,
    pub continuation: ContinuationModel,
    pub split_model: SplitModel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            simulation_mode: SimulationMode::MonteCarlo,
            trials: DEFAULT_TRIALS,
            seed: None,
            continuation: ContinuationModel::Heuristic,
            split_model: SplitModel::LookupTable,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), AdvisorError> {
        if self.simulation_mode == SimulationMode::MonteCarlo && self.trials == 0 {
            return Err(AdvisorError::InvalidTrialCount);
        }
        Ok(())
    }
}

/// One table's advisory engine: the shoe it tracks, the rules it plays under
/// and the caches of everything derived from them.
///
/// Cards must be reported in dealing order, including the dealer's up card,
/// before asking for advice on the hand they belong to.
pub struct Advisor<R: Rng = StdRng> {
    rules: GameRules,
    config: EngineConfig,
    tracker: ShoeTracker,
    simulator: DealerSimulator,
    decisions: StateCache<DecisionKey, PlayerDecisionProbabilities>,
    rng: R,
}

impl Advisor<StdRng> {
    pub fn new(rules: GameRules, config: EngineConfig) -> Result<Self, AdvisorError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(rules, config, rng)
    }
}

impl<R: Rng> Advisor<R> {
    pub fn with_rng(rules: GameRules, config: EngineConfig, rng: R) -> Result<Self, AdvisorError> {
        rules.validate()?;
        config.validate()?;
        info!(
            decks = rules.number_of_decks,
            mode = %config.simulation_mode,
            trials = config.trials,
            "advisor initialized"
        );
        Ok(Self {
            rules,
            config,
            tracker: ShoeTracker::initialize(rules.number_of_decks)?,
            simulator: DealerSimulator::new(config.simulation_mode, config.trials),
            decisions: StateCache::new(),
            rng,
        })
    }

    /// Swaps in new rules. A different deck count starts a fresh shoe.
    pub fn set_rules(&mut self, rules: GameRules) -> Result<(), AdvisorError> {
        rules.validate()?;
        if rules.number_of_decks != self.rules.number_of_decks {
            info!(
                from = self.rules.number_of_decks,
                to = rules.number_of_decks,
                "deck count changed, starting a new shoe"
            );
            self.tracker = ShoeTracker::initialize(rules.number_of_decks)?;
        }
        self.rules = rules;
        self.simulator.clear_cache();
        self.decisions.clear();
        Ok(())
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tracker(&self) -> &ShoeTracker {
        &self.tracker
    }

    pub fn composition(&self) -> &DeckComposition {
        self.tracker.composition()
    }

    pub fn apply_dealt(&mut self, cards: &[Card]) -> Vec<ConsistencyWarning> {
        self.tracker.apply_dealt(cards)
    }

    /// New shoe after a reshuffle.
    pub fn reset(&mut self) {
        self.tracker.reset();
    }

    pub fn draw_probabilities(&self, hand: &PlayerHand) -> Vec<DrawProbability> {
        draw_probabilities(hand.possible_totals(), self.tracker.composition())
    }

    pub fn dealer_outcomes(&mut self, up_card: Rank) -> DealerOutcomeProbabilities {
        self.simulator.outcomes(
            up_card,
            &self.tracker,
            self.rules.dealer_hit_on_soft17,
            &mut self.rng,
        )
    }

    pub fn evaluate(&mut self, hand: &PlayerHand, up_card: Rank) -> PlayerDecisionProbabilities {
        let shoe_version = self.tracker.version();
        self.decisions.sync_version(shoe_version);
        let key = DecisionKey {
            hand: hand.signature(),
            dealer_up_value: up_card.blackjack_value(),
            shoe_version,
        };
        if let Some(cached) = self.decisions.get(&key) {
            debug!(up = %up_card, "decision cache hit");
            return cached.clone();
        }

        let dealer = self.dealer_outcomes(up_card);
        let evaluator =
            DecisionEvaluator::new(self.rules, self.config.continuation, self.config.split_model);
        let result = evaluator.evaluate(hand, up_card, self.tracker.composition(), &dealer);
        self.decisions.insert(key, result.clone());
        result
    }

    pub fn house_edge(&self) -> HouseEdgeInfo {
        house_edge(&self.rules, self.tracker.composition().true_count())
    }
}
