use blackjack_advisor::{
    Advisor, Card, Decision, EngineConfig, GameRules, PlayerHand, Rank, SimulationMode, Suit,
};
use strum::IntoEnumIterator;

fn card(text: &str) -> Card {
    text.parse().unwrap()
}

fn cards(texts: &[&str]) -> Vec<Card> {
    texts.iter().map(|text| card(text)).collect()
}

fn seeded_advisor(rules: GameRules) -> Advisor {
    let config = EngineConfig {
        seed: Some(20240601),
        ..EngineConfig::default()
    };
    Advisor::new(rules, config).unwrap()
}

#[test]
fn five_and_king_from_a_six_deck_shoe() {
    let mut advisor = seeded_advisor(GameRules::baseline());
    assert_eq!(advisor.composition().total_cards(), 312);
    let warnings = advisor.apply_dealt(&cards(&["5H", "KS"]));
    assert!(warnings.is_empty());

    let shoe = advisor.composition();
    assert_eq!(shoe.remaining(Rank::Five), 23);
    assert_eq!(shoe.remaining(Rank::King), 23);
    assert_eq!(shoe.total_cards(), 310);
    assert_eq!(shoe.running_count(), 0);
    assert_eq!(shoe.true_count(), 0.0);
}

#[test]
fn reset_matches_fresh_shoe() {
    let mut advisor = seeded_advisor(GameRules::default());
    advisor.apply_dealt(&cards(&["AS", "2C", "3D", "QH", "QH", "7S"]));
    advisor.reset();
    let fresh = seeded_advisor(GameRules::default());
    assert_eq!(advisor.composition(), fresh.composition());
}

#[test]
fn draining_the_shoe_keeps_everything_finite() {
    let mut advisor = seeded_advisor(GameRules::single_deck());
    let mut deck = Vec::new();
    for suit in Suit::iter() {
        for rank in Rank::iter() {
            deck.push(Card::new(rank, suit));
        }
    }
    assert!(advisor.apply_dealt(&deck).is_empty());
    let shoe = advisor.composition();
    assert_eq!(shoe.total_cards(), 0);
    assert_eq!(shoe.true_count(), 0.0);

    let hand = PlayerHand::new(&cards(&["TS", "6D"])).unwrap();
    assert!(advisor.draw_probabilities(&hand).is_empty());
    let result = advisor.evaluate(&hand, Rank::Nine);
    assert!(result.stand_ev.is_finite());
    assert!(result.hit_ev.is_finite());
    assert!(advisor.house_edge().current_house_edge.is_finite());

    let warnings = advisor.apply_dealt(&cards(&["AS"]));
    assert_eq!(warnings.len(), 1);
    assert_eq!(advisor.composition().total_cards(), 0);
}

#[test]
fn dealer_outcomes_sum_to_one_for_every_up_card() {
    let mut advisor = seeded_advisor(GameRules::default());
    advisor.apply_dealt(&cards(&["8C", "4H", "JD", "2S"]));
    for up in Rank::iter() {
        let outcomes = advisor.dealer_outcomes(up);
        let total = outcomes.total_probability();
        assert!((total - 1.0).abs() < 0.02, "up {}: {}", up, total);
    }
}

#[test]
fn aces_split_against_every_up_card() {
    let mut advisor = seeded_advisor(GameRules::default());
    let aces = PlayerHand::new(&cards(&["AS", "AH"])).unwrap();
    for up in Rank::iter() {
        let result = advisor.evaluate(&aces, up);
        assert_eq!(result.optimal_decision, Decision::Split, "up {}", up);
    }
}

#[test]
fn insurance_against_an_ace_from_one_deck() {
    let rules = GameRules {
        number_of_decks: 1,
        ..GameRules::baseline()
    };
    let mut advisor = seeded_advisor(rules);
    advisor.apply_dealt(&cards(&["AS"]));
    assert_eq!(advisor.composition().total_cards(), 51);
    assert_eq!(advisor.composition().ten_value_remaining(), 16);

    let hand = PlayerHand::new(&cards(&["9H", "9D"])).unwrap();
    let result = advisor.evaluate(&hand, Rank::Ace);
    let insurance = result.insurance_ev.unwrap();
    assert!((insurance - (16.0 / 51.0 - 0.5 * 35.0 / 51.0)).abs() < 1e-12);
    assert_ne!(result.optimal_decision, Decision::Insurance);

    let outcomes = advisor.dealer_outcomes(Rank::Ace);
    assert!((outcomes.blackjack_probability - 16.0 / 51.0).abs() < 1e-12);
}

#[test]
fn insurance_becomes_optimal_in_a_ten_rich_shoe() {
    let rules = GameRules {
        number_of_decks: 1,
        ..GameRules::baseline()
    };
    let mut advisor = seeded_advisor(rules);
    let mut small = Vec::new();
    for suit in Suit::iter() {
        for rank in [Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six] {
            small.push(Card::new(rank, suit));
        }
    }
    advisor.apply_dealt(&small);
    advisor.apply_dealt(&cards(&["AS"]));
    // 16 tens in 31 cards.
    let hand = PlayerHand::new(&cards(&["7H", "8D"])).unwrap();
    let result = advisor.evaluate(&hand, Rank::Ace);
    assert!(result.insurance_ev.unwrap() > 0.0);
    assert_eq!(result.optimal_decision, Decision::Insurance);
    assert_ne!(result.primary_decision, Decision::Insurance);
}

#[test]
fn surrender_only_when_allowed() {
    let hand = PlayerHand::new(&cards(&["TS", "6D"])).unwrap();
    let mut strict = seeded_advisor(GameRules::baseline());
    for up in Rank::iter() {
        assert_ne!(strict.evaluate(&hand, up).optimal_decision, Decision::Surrender);
    }
    let mut lenient = seeded_advisor(GameRules::default());
    assert_eq!(lenient.evaluate(&hand, Rank::Ten).surrender_ev, Some(-0.5));
}

#[test]
fn baseline_rules_have_half_a_percent_edge() {
    let advisor = seeded_advisor(GameRules::baseline());
    let info = advisor.house_edge();
    assert_eq!(info.base_house_edge, 0.005);
    assert_eq!(info.current_house_edge, 0.005);
    assert!(!info.deck_favors_player);
}

#[test]
fn exact_and_simulated_modes_agree() {
    let exact_config = EngineConfig {
        simulation_mode: SimulationMode::Exact,
        ..EngineConfig::default()
    };
    let mut exact = Advisor::new(GameRules::default(), exact_config).unwrap();
    let mut simulated = seeded_advisor(GameRules::default());
    for up in [Rank::Three, Rank::Eight, Rank::Queen] {
        let a = exact.dealer_outcomes(up);
        let b = simulated.dealer_outcomes(up);
        assert!((a.bust_probability - b.bust_probability).abs() < 0.02);
    }
}
