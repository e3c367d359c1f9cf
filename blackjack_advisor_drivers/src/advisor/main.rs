use anyhow::{bail, Context, Result};
use blackjack_advisor::{
    Advisor, Card, DealerOutcomeProbabilities, DeckComposition, DrawProbability, EngineConfig,
    GameRules, HouseEdgeInfo, PlayerDecisionProbabilities, PlayerHand,
};
use blackjack_advisor_drivers::{init_logging, parse_config_from_file};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

const DEFAULT_CONFIG_PATH: &str = "~/.blackjack_advisor.yml";

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// Cards already seen from this shoe, e.g. "5H,KS,TD"
    #[arg(short, long, value_delimiter = ',')]
    dealt: Vec<String>,

    /// The player's hand. Counted as dealt.
    #[arg(long, value_delimiter = ',')]
    hand: Vec<String>,

    /// The dealer's up card. Counted as dealt.
    #[arg(short, long)]
    up: Option<String>,

    /// Overrides the seed from the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Used when RUST_LOG is not set
    #[arg(long, default_value_t = String::from("warn"))]
    log_level: String,
}

#[derive(Debug, Serialize)]
struct Report {
    composition: DeckComposition,
    deck_penetration: f64,
    draws: Vec<DrawProbability>,
    dealer: Option<DealerOutcomeProbabilities>,
    decision: Option<PlayerDecisionProbabilities>,
    house_edge: HouseEdgeInfo,
}

fn parse_cards(texts: &[String]) -> Result<Vec<Card>> {
    texts
        .iter()
        .map(|text| text.trim().parse::<Card>().map_err(anyhow::Error::from))
        .collect()
}

fn resolve_config_path(config: String) -> Result<String> {
    if config != DEFAULT_CONFIG_PATH {
        return Ok(config);
    }
    let home_dir = home::home_dir().context("Cannot find home directory")?;
    let config_file_path = home_dir.join(".blackjack_advisor.yml");
    if !config_file_path.exists() {
        bail!("Config file {} does not exist", config_file_path.display());
    }
    if config_file_path.is_dir() {
        bail!("This should be a path rather than a directory");
    }
    Ok(config_file_path.to_string_lossy().into_owned())
}

fn main() -> Result<()> {
    let args = CommandLineArgs::parse();
    init_logging(&args.log_level);

    let config_path = resolve_config_path(args.config)?;
    let config = parse_config_from_file(&config_path)?;
    let rules: GameRules = config.rules.try_into()?;
    let mut engine: EngineConfig = config
        .engine
        .try_into()
        .context("invalid engine section")?;
    if args.seed.is_some() {
        engine.seed = args.seed;
    }
    info!(config = %config_path, "loaded config");

    let mut advisor = Advisor::new(rules, engine)?;
    let dealt = parse_cards(&args.dealt)?;
    let hand = parse_cards(&args.hand)?;
    let up = args.up.as_deref().map(str::parse::<Card>).transpose()?;

    let mut seen = dealt;
    seen.extend(hand.iter().copied());
    seen.extend(up);
    for warning in advisor.apply_dealt(&seen) {
        warn!("{}", warning);
    }

    let player_hand = if hand.is_empty() {
        None
    } else {
        Some(PlayerHand::new(&hand)?)
    };
    let draws = player_hand
        .as_ref()
        .map(|hand| advisor.draw_probabilities(hand))
        .unwrap_or_default();
    let dealer = up.map(|card| advisor.dealer_outcomes(card.rank));
    let decision = match (&player_hand, up) {
        (Some(hand), Some(card)) => Some(advisor.evaluate(hand, card.rank)),
        _ => None,
    };

    let report = Report {
        composition: advisor.composition().clone(),
        deck_penetration: advisor.tracker().deck_penetration(),
        draws,
        dealer,
        decision,
        house_edge: advisor.house_edge(),
    };
    print!("{}", serde_yaml::to_string(&report)?);

    Ok(())
}
