use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::AdvisorError;

pub const NUMBER_OF_RANKS: usize = 13;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize_enum_str, Deserialize_enum_str,
)]
pub enum Rank {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
}

impl Rank {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Rank> {
        Rank::iter().nth(index)
    }

    /// Blackjack value in [1, 10]. Ace is 1, all ten-value ranks are 10.
    pub fn blackjack_value(self) -> u8 {
        match self {
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            _ => self as u8 + 1,
        }
    }

    /// All the values this rank can count as. Only Ace has more than one.
    pub fn values(self) -> &'static [u8] {
        match self {
            Rank::Ace => &[1, 11],
            Rank::Two => &[2],
            Rank::Three => &[3],
            Rank::Four => &[4],
            Rank::Five => &[5],
            Rank::Six => &[6],
            Rank::Seven => &[7],
            Rank::Eight => &[8],
            Rank::Nine => &[9],
            _ => &[10],
        }
    }

    pub fn is_ten_value(self) -> bool {
        self.blackjack_value() == 10
    }

    /// Hi-Lo weight: 2-6 count +1, 7-9 count 0, tens and Aces count -1.
    pub fn hi_lo_weight(self) -> i32 {
        match self.blackjack_value() {
            2..=6 => 1,
            7..=9 => 0,
            _ => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum Suit {
    Diamond = 0,
    Club,
    Heart,
    Spade,
}

impl Suit {
    fn symbol(self) -> char {
        match self {
            Suit::Diamond => 'D',
            Suit::Club => 'C',
            Suit::Heart => 'H',
            Suit::Spade => 'S',
        }
    }
}

impl TryFrom<char> for Suit {
    type Error = AdvisorError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Suit::iter()
            .find(|suit| suit.symbol() == value.to_ascii_uppercase())
            .ok_or_else(|| AdvisorError::InvalidCard(value.to_string()))
    }
}

/// Represents a card in the real world with a suit and a rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    pub fn blackjack_value(&self) -> u8 {
        self.rank.blackjack_value()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit.symbol())
    }
}

/// Parses the compact form used by the drivers, e.g. `AS`, `10H`, `TD`, `kc`.
impl FromStr for Card {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || AdvisorError::InvalidCard(s.to_string());
        let suit_char = s.chars().last().ok_or_else(invalid)?;
        let rank_text = &s[..s.len() - suit_char.len_utf8()];
        let rank_text = match rank_text.to_ascii_uppercase().as_str() {
            "T" => String::from("10"),
            other => other.to_string(),
        };
        let rank: Rank = rank_text.parse().map_err(|_| invalid())?;
        let suit = Suit::try_from(suit_char).map_err(|_| invalid())?;
        Ok(Card { rank, suit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_in_fixed_order() {
        let ranks: Vec<Rank> = Rank::iter().collect();
        assert_eq!(ranks.len(), NUMBER_OF_RANKS);
        assert_eq!(ranks[0], Rank::Ace);
        assert_eq!(ranks[12], Rank::King);
        for (i, rank) in ranks.iter().enumerate() {
            assert_eq!(rank.index(), i);
            assert_eq!(Rank::from_index(i), Some(*rank));
        }
        assert_eq!(Rank::from_index(13), None);
    }

    #[test]
    fn value_sets() {
        assert_eq!(Rank::Ace.values(), &[1, 11]);
        assert_eq!(Rank::Seven.values(), &[7]);
        assert_eq!(Rank::Queen.values(), &[10]);
        assert_eq!(Rank::Ace.blackjack_value(), 1);
        assert_eq!(Rank::King.blackjack_value(), 10);
        assert!(Rank::Jack.is_ten_value());
        assert!(!Rank::Nine.is_ten_value());
    }

    #[test]
    fn hi_lo_weights_balance_over_a_deck() {
        let sum: i32 = Rank::iter().map(|rank| rank.hi_lo_weight()).sum();
        assert_eq!(sum, 0);
        assert_eq!(Rank::Five.hi_lo_weight(), 1);
        assert_eq!(Rank::Eight.hi_lo_weight(), 0);
        assert_eq!(Rank::Ace.hi_lo_weight(), -1);
        assert_eq!(Rank::King.hi_lo_weight(), -1);
    }

    #[test]
    fn parse_and_display_cards() {
        let card: Card = "AS".parse().unwrap();
        assert_eq!(card, Card::new(Rank::Ace, Suit::Spade));
        let card: Card = "10h".parse().unwrap();
        assert_eq!(card, Card::new(Rank::Ten, Suit::Heart));
        let card: Card = "TD".parse().unwrap();
        assert_eq!(card.rank, Rank::Ten);
        assert_eq!(Card::new(Rank::King, Suit::Club).to_string(), "KC");
        assert_eq!(Card::new(Rank::Ten, Suit::Diamond).to_string(), "10D");
    }

    #[test]
    fn invalid_cards_are_rejected() {
        assert!("".parse::<Card>().is_err());
        assert!("1S".parse::<Card>().is_err());
        assert!("AX".parse::<Card>().is_err());
        assert!("S".parse::<Card>().is_err());
    }
}
