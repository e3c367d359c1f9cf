use anyhow::{Context, Result};
use blackjack_advisor::{EngineConfig, GameRules};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub rules: ConfigRule,
    #[serde(default)]
    pub engine: ConfigEngine,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRule {
    pub number_of_decks: u8,
    pub payout_blackjack: f64,
    pub dealer_hit_on_soft17: bool,
    pub allow_das: bool,
    pub allow_late_surrender: bool,
    pub max_splits: u8,
}

impl TryInto<GameRules> for ConfigRule {
    type Error = blackjack_advisor::AdvisorError;

    fn try_into(self) -> Result<GameRules, Self::Error> {
        let rules = GameRules {
            number_of_decks: self.number_of_decks,
            payout_blackjack: self.payout_blackjack,
            dealer_hit_on_soft17: self.dealer_hit_on_soft17,
            allow_das: self.allow_das,
            allow_late_surrender: self.allow_late_surrender,
            max_splits: self.max_splits,
        };
        rules.validate()?;

        Ok(rules)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigEngine {
    pub simulation_mode: String,
    pub trials: u32,
    pub seed: Option<u64>,
    pub continuation: String,
    pub split_model: String,
}

impl Default for ConfigEngine {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            simulation_mode: engine.simulation_mode.to_string(),
            trials: engine.trials,
            seed: engine.seed,
            continuation: engine.continuation.to_string(),
            split_model: engine.split_model.to_string(),
        }
    }
}

impl TryInto<EngineConfig> for ConfigEngine {
    type Error = serde::de::value::Error;

    fn try_into(self) -> Result<EngineConfig, Self::Error> {
        let engine = EngineConfig {
            simulation_mode: self.simulation_mode.parse()?,
            trials: self.trials,
            seed: self.seed,
            continuation: self.continuation.parse()?,
            split_model: self.split_model.parse()?,
        };

        Ok(engine)
    }
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &str) -> Result<Config> {
    let file_content =
        fs::read_to_string(filename).with_context(|| format!("reading config file {filename}"))?;
    serde_yaml::from_str(&file_content).with_context(|| format!("parsing config file {filename}"))
}

/// Installs a stderr subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack_advisor::{ContinuationModel, SimulationMode, SplitModel};

    fn get_typical_config_rule() -> ConfigRule {
        ConfigRule {
            number_of_decks: 8,
            payout_blackjack: 1.5,
            dealer_hit_on_soft17: true,
            allow_das: true,
            allow_late_surrender: false,
            max_splits: 3,
        }
    }

    fn get_typical_config_engine() -> ConfigEngine {
        ConfigEngine {
            simulation_mode: String::from("Exact"),
            trials: 500,
            seed: Some(7),
            continuation: String::from("Recursive"),
            split_model: String::from("PerHand"),
        }
    }

    #[test]
    fn can_convert_rule() {
        let config_rule = get_typical_config_rule();
        let converted_rule: GameRules = config_rule.try_into().unwrap();
        assert_eq!(converted_rule.number_of_decks, 8);
        assert_eq!(converted_rule.payout_blackjack, 1.5);
        assert!(converted_rule.dealer_hit_on_soft17);
        assert!(!converted_rule.allow_late_surrender);
    }

    #[test]
    fn should_return_error_when_converting_rule() {
        let mut config_rule = get_typical_config_rule();
        config_rule.payout_blackjack = 0.0;
        let convert_result: Result<GameRules, blackjack_advisor::AdvisorError> =
            config_rule.try_into();
        assert!(convert_result.is_err());
    }

    #[test]
    fn can_convert_engine() {
        let converted: EngineConfig = get_typical_config_engine().try_into().unwrap();
        assert_eq!(converted.simulation_mode, SimulationMode::Exact);
        assert_eq!(converted.continuation, ContinuationModel::Recursive);
        assert_eq!(converted.split_model, SplitModel::PerHand);
        assert_eq!(converted.seed, Some(7));
    }

    #[test]
    fn should_return_error_when_converting_engine() {
        let mut config_engine = get_typical_config_engine();
        config_engine.simulation_mode = String::from("Not a mode");
        let convert_result: Result<EngineConfig, serde::de::value::Error> =
            config_engine.try_into();
        assert!(convert_result.is_err());
    }

    #[test]
    fn engine_section_is_optional() {
        let yaml = "
rules:
  number_of_decks: 2
  payout_blackjack: 1.2
  dealer_hit_on_soft17: false
  allow_das: false
  allow_late_surrender: true
  max_splits: 1
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let engine: EngineConfig = config.engine.try_into().unwrap();
        assert_eq!(engine, EngineConfig::default());
        let rules: GameRules = config.rules.try_into().unwrap();
        assert_eq!(rules.number_of_decks, 2);
    }
}
