use crate::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Bam,
    Crack,
    Dot,
}

impl Suit {
    pub const ALL: [Suit; 3] = [Suit::Bam, Suit::Crack, Suit::Dot];

    pub fn code(self) -> char {
        match self {
            Suit::Bam => 'b',
            Suit::Crack => 'c',
            Suit::Dot => 'o',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|suit| suit.code() == code)
    }
}

/// Rank of a numbered tile, always within `1..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(u8);

impl Rank {
    pub const MAX: u8 = 9;

    pub fn new(value: u8) -> Option<Self> {
        (1..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// The six suit rewrites, indexed by mutation number minus one.
pub const MUTATIONS: [(Suit, Suit); 6] = [
    (Suit::Bam, Suit::Crack),
    (Suit::Crack, Suit::Bam),
    (Suit::Bam, Suit::Dot),
    (Suit::Dot, Suit::Bam),
    (Suit::Crack, Suit::Dot),
    (Suit::Dot, Suit::Crack),
];

pub const FLOWER_COUNT: u8 = 4;
pub const SEASON_COUNT: u8 = 4;
pub const RABBIT_COUNT: u8 = 4;
pub const PHOENIX_COUNT: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Card {
    Number { suit: Suit, rank: Rank },
    Wind(Direction),
    Flower(u8),
    Season(u8),
    /// Dragon keyed to the suit its run follows.
    Dragon(Suit),
    Rabbit(u8),
    Phoenix(u8),
    Joker,
    Transport(Direction),
    /// Index into [`MUTATIONS`], `1..=6`.
    Mutation(u8),
    /// Placeholder used while a board is being dealt.
    Dummy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CardFamily {
    Numbered,
    Wind,
    Flower,
    Season,
    Dragon,
    Rabbit,
    Phoenix,
    Joker,
    Transport,
    Mutation,
    Dummy,
}

impl CardFamily {
    pub const ALL: [CardFamily; 11] = [
        CardFamily::Numbered,
        CardFamily::Wind,
        CardFamily::Flower,
        CardFamily::Season,
        CardFamily::Dragon,
        CardFamily::Rabbit,
        CardFamily::Phoenix,
        CardFamily::Joker,
        CardFamily::Transport,
        CardFamily::Mutation,
        CardFamily::Dummy,
    ];
}

impl Card {
    pub fn number(suit: Suit, rank: u8) -> Option<Self> {
        Rank::new(rank).map(|rank| Card::Number { suit, rank })
    }

    pub fn family(self) -> CardFamily {
        match self {
            Card::Number { .. } => CardFamily::Numbered,
            Card::Wind(_) => CardFamily::Wind,
            Card::Flower(_) => CardFamily::Flower,
            Card::Season(_) => CardFamily::Season,
            Card::Dragon(_) => CardFamily::Dragon,
            Card::Rabbit(_) => CardFamily::Rabbit,
            Card::Phoenix(_) => CardFamily::Phoenix,
            Card::Joker => CardFamily::Joker,
            Card::Transport(_) => CardFamily::Transport,
            Card::Mutation(_) => CardFamily::Mutation,
            Card::Dummy => CardFamily::Dummy,
        }
    }

    /// Suit carried by numbered tiles and dragons.
    pub fn suit(self) -> Option<Suit> {
        match self {
            Card::Number { suit, .. } | Card::Dragon(suit) => Some(suit),
            _ => None,
        }
    }

    pub fn rank(self) -> Option<u8> {
        match self {
            Card::Number { rank, .. } => Some(rank.get()),
            _ => None,
        }
    }

    pub fn mutation(self) -> Option<(Suit, Suit)> {
        match self {
            Card::Mutation(index) => MUTATIONS.get(usize::from(index).checked_sub(1)?).copied(),
            _ => None,
        }
    }

    /// Same card with its suit replaced; unsuited cards come back unchanged.
    pub fn with_suit(self, suit: Suit) -> Self {
        match self {
            Card::Number { rank, .. } => Card::Number { suit, rank },
            Card::Dragon(_) => Card::Dragon(suit),
            other => other,
        }
    }

    fn value_code(self) -> char {
        let digit = |value: u8| char::from(b'0' + value);
        match self {
            Card::Number { rank, .. } => digit(rank.get()),
            Card::Wind(dir) | Card::Transport(dir) => dir.code(),
            Card::Flower(n)
            | Card::Season(n)
            | Card::Rabbit(n)
            | Card::Phoenix(n)
            | Card::Mutation(n) => digit(n),
            Card::Dragon(suit) => suit.code(),
            Card::Joker => 'k',
            Card::Dummy => 'x',
        }
    }

    fn family_code(self) -> char {
        match self {
            Card::Number { suit, .. } => suit.code(),
            Card::Wind(_) => 'w',
            Card::Flower(_) => 'f',
            Card::Season(_) => 's',
            Card::Dragon(_) => 'd',
            Card::Rabbit(_) => 'r',
            Card::Phoenix(_) => 'p',
            Card::Joker => 'j',
            Card::Transport(_) => 't',
            Card::Mutation(_) => 'm',
            Card::Dummy => 'x',
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardParseError {
    #[error("card code must be two characters, got {0:?}")]
    Length(String),
    #[error("unknown card family {0:?}")]
    UnknownFamily(char),
    #[error("invalid value {value:?} for card family {family:?}")]
    Value { family: char, value: char },
    #[error("animal tiles are no longer supported: {0:?}")]
    LegacyAnimal(String),
}

fn small_index(value: char, count: u8) -> Option<u8> {
    let digit = u8::try_from(value.to_digit(10)?).ok()?;
    (1..=count).contains(&digit).then_some(digit)
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut chars = text.chars();
        let (Some(family), Some(value), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(CardParseError::Length(text.to_string()));
        };
        let invalid = || CardParseError::Value { family, value };
        let card = match family {
            'b' | 'c' | 'o' => {
                let suit = Suit::from_code(family).ok_or_else(invalid)?;
                let rank = small_index(value, Rank::MAX).ok_or_else(invalid)?;
                Card::number(suit, rank).ok_or_else(invalid)?
            }
            'w' => Card::Wind(Direction::from_code(value).ok_or_else(invalid)?),
            'f' => Card::Flower(small_index(value, FLOWER_COUNT).ok_or_else(invalid)?),
            's' => Card::Season(small_index(value, SEASON_COUNT).ok_or_else(invalid)?),
            'd' => Card::Dragon(Suit::from_code(value).ok_or_else(invalid)?),
            'r' => Card::Rabbit(small_index(value, RABBIT_COUNT).ok_or_else(invalid)?),
            'p' => Card::Phoenix(small_index(value, PHOENIX_COUNT).ok_or_else(invalid)?),
            'j' if value == 'k' => Card::Joker,
            't' => Card::Transport(Direction::from_code(value).ok_or_else(invalid)?),
            'm' => Card::Mutation(small_index(value, MUTATIONS.len() as u8).ok_or_else(invalid)?),
            'x' if value == 'x' => Card::Dummy,
            'j' | 'x' => return Err(invalid()),
            'a' => return Err(CardParseError::LegacyAnimal(text.to_string())),
            other => return Err(CardParseError::UnknownFamily(other)),
        };
        Ok(card)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.family_code(), self.value_code())
    }
}

impl TryFrom<String> for Card {
    type Error = CardParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    #[default]
    Bone,
    Ivory,
    Wood,
    Glass,
    Amber,
    Bronze,
    Jade,
    Diamond,
    Gold,
}

/// Freedom rule family, ordered from most to least permissive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FreedomClass {
    Unrestricted,
    Relaxed,
    Standard,
    Strict,
}

impl Material {
    pub const ALL: [Material; 9] = [
        Material::Bone,
        Material::Ivory,
        Material::Wood,
        Material::Glass,
        Material::Amber,
        Material::Bronze,
        Material::Jade,
        Material::Diamond,
        Material::Gold,
    ];

    pub fn freedom_class(self) -> FreedomClass {
        match self {
            Material::Jade | Material::Diamond => FreedomClass::Unrestricted,
            Material::Glass | Material::Wood | Material::Amber => FreedomClass::Relaxed,
            Material::Bone | Material::Ivory | Material::Bronze => FreedomClass::Standard,
            Material::Gold => FreedomClass::Strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_family() {
        let cases = [
            ("b1", Card::number(Suit::Bam, 1).expect("rank")),
            ("o9", Card::number(Suit::Dot, 9).expect("rank")),
            ("wn", Card::Wind(Direction::North)),
            ("f3", Card::Flower(3)),
            ("s4", Card::Season(4)),
            ("dc", Card::Dragon(Suit::Crack)),
            ("r2", Card::Rabbit(2)),
            ("p3", Card::Phoenix(3)),
            ("jk", Card::Joker),
            ("tw", Card::Transport(Direction::West)),
            ("m6", Card::Mutation(6)),
            ("xx", Card::Dummy),
        ];
        for (text, expected) in cases {
            let card: Card = text.parse().expect(text);
            assert_eq!(card, expected);
            assert_eq!(card.to_string(), text);
        }
    }

    #[test]
    fn rejects_malformed_codes() {
        assert_eq!(
            "b".parse::<Card>(),
            Err(CardParseError::Length("b".to_string()))
        );
        assert_eq!(
            "b10".parse::<Card>(),
            Err(CardParseError::Length("b10".to_string()))
        );
        assert_eq!(
            "b0".parse::<Card>(),
            Err(CardParseError::Value {
                family: 'b',
                value: '0'
            })
        );
        assert_eq!(
            "f5".parse::<Card>(),
            Err(CardParseError::Value {
                family: 'f',
                value: '5'
            })
        );
        assert_eq!("zz".parse::<Card>(), Err(CardParseError::UnknownFamily('z')));
        assert_eq!(
            "a1".parse::<Card>(),
            Err(CardParseError::LegacyAnimal("a1".to_string()))
        );
        assert!("jj".parse::<Card>().is_err());
        assert!("m7".parse::<Card>().is_err());
    }

    #[test]
    fn mutation_table_pairs_distinct_suits() {
        for index in 1..=6u8 {
            let (from, to) = Card::Mutation(index).mutation().expect("pair");
            assert_ne!(from, to);
        }
        assert_eq!(Card::Mutation(0).mutation(), None);
        assert_eq!(Card::Joker.mutation(), None);
    }

    #[test]
    fn with_suit_keeps_rank_and_leaves_honours_alone() {
        let c5 = Card::number(Suit::Crack, 5).expect("rank");
        assert_eq!(c5.with_suit(Suit::Dot).to_string(), "o5");
        assert_eq!(Card::Dragon(Suit::Bam).with_suit(Suit::Dot), Card::Dragon(Suit::Dot));
        assert_eq!(Card::Flower(1).with_suit(Suit::Dot), Card::Flower(1));
    }

    #[test]
    fn materials_map_to_freedom_classes() {
        assert_eq!(Material::Jade.freedom_class(), FreedomClass::Unrestricted);
        assert_eq!(Material::Wood.freedom_class(), FreedomClass::Relaxed);
        assert_eq!(Material::Bronze.freedom_class(), FreedomClass::Standard);
        assert_eq!(Material::Gold.freedom_class(), FreedomClass::Strict);
        assert!(FreedomClass::Relaxed < FreedomClass::Strict);
    }
}
