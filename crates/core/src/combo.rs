//! Multi-turn combo runs. Each family owns one `Option` slot on the game and
//! is advanced once per matched pair, looking only at its own slot.

use crate::{Card, Suit};
use serde::{Deserialize, Serialize};

/// Highest cursor a phoenix run can hold.
pub const PHOENIX_CEILING: u8 = 8;
const PHOENIX_STEP: i64 = 3;
const PHOENIX_CEILING_STEP: i64 = 1;
const RABBIT_STEP: i64 = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    Dragon,
    Phoenix,
    Rabbit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunTransition {
    Unchanged,
    Started,
    Advanced { combo: i64 },
    /// The old run ended and the same card opened a fresh one.
    Restarted { previous: i64 },
    Ended { combo: i64 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DragonRun {
    pub card: Card,
    pub suit: Suit,
    pub combo: i64,
}

impl DragonRun {
    pub fn new(card: Card, suit: Suit) -> Self {
        Self {
            card,
            suit,
            combo: 0,
        }
    }

    pub fn accepts(&self, card: Card) -> bool {
        match card {
            Card::Joker
            | Card::Flower(_)
            | Card::Season(_)
            | Card::Rabbit(_)
            | Card::Phoenix(_)
            | Card::Mutation(_) => true,
            other => other.suit() == Some(self.suit),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhoenixRun {
    pub card: Card,
    /// Rank of the last numbered step.
    pub number: u8,
    pub combo: i64,
}

impl PhoenixRun {
    pub fn new(card: Card) -> Self {
        Self {
            card,
            number: 0,
            combo: 0,
        }
    }

    /// Cursor after `card`, or `None` when the card breaks the run.
    pub fn next_number(&self, card: Card) -> Option<u8> {
        match card {
            Card::Joker | Card::Mutation(_) | Card::Dragon(_) => Some(self.number),
            Card::Rabbit(_) => Some(self.number + 1),
            Card::Number { rank, .. } if rank.get() == self.number + 1 => Some(rank.get()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RabbitRun {
    pub card: Card,
    pub combo: i64,
    /// Set once a non-rabbit lands; the run then pays out for that pair only.
    pub score: bool,
}

pub fn advance_dragon(slot: &mut Option<DragonRun>, card: Card) -> RunTransition {
    if let Some(run) = slot.as_mut() {
        if run.accepts(card) {
            run.combo += 1;
            return RunTransition::Advanced { combo: run.combo };
        }
    }
    let previous = slot.take();
    *slot = match card {
        Card::Dragon(suit) => Some(DragonRun::new(card, suit)),
        _ => None,
    };
    settle(previous.map(|run| run.combo), slot.is_some())
}

pub fn advance_phoenix(slot: &mut Option<PhoenixRun>, card: Card) -> RunTransition {
    if let Some(run) = slot.as_mut() {
        match run.next_number(card) {
            Some(next) if next <= PHOENIX_CEILING => {
                run.number = next;
                run.combo += if next == PHOENIX_CEILING {
                    PHOENIX_CEILING_STEP
                } else {
                    PHOENIX_STEP
                };
                return RunTransition::Advanced { combo: run.combo };
            }
            Some(_) => {
                let combo = run.combo;
                *slot = None;
                return RunTransition::Ended { combo };
            }
            None => {}
        }
    }
    let previous = slot.take();
    *slot = match card {
        Card::Phoenix(_) => Some(PhoenixRun::new(card)),
        _ => None,
    };
    settle(previous.map(|run| run.combo), slot.is_some())
}

pub fn advance_rabbit(slot: &mut Option<RabbitRun>, card: Card) -> RunTransition {
    let is_rabbit = matches!(card, Card::Rabbit(_));
    match slot.as_mut() {
        None if is_rabbit => {
            *slot = Some(RabbitRun {
                card,
                combo: RABBIT_STEP,
                score: false,
            });
            RunTransition::Started
        }
        None => RunTransition::Unchanged,
        Some(run) if run.score => {
            let combo = run.combo;
            *slot = None;
            RunTransition::Ended { combo }
        }
        Some(run) => {
            if is_rabbit {
                run.card = card;
                run.combo += RABBIT_STEP;
            } else {
                run.score = true;
            }
            RunTransition::Advanced { combo: run.combo }
        }
    }
}

fn settle(previous: Option<i64>, started: bool) -> RunTransition {
    match (previous, started) {
        (Some(previous), true) => RunTransition::Restarted { previous },
        (Some(combo), false) => RunTransition::Ended { combo },
        (None, true) => RunTransition::Started,
        (None, false) => RunTransition::Unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(code: &str) -> Card {
        code.parse().expect("card")
    }

    #[test]
    fn dragon_run_follows_its_suit_and_wildcards() {
        let mut slot = None;
        assert_eq!(advance_dragon(&mut slot, card("dc")), RunTransition::Started);
        assert_eq!(slot.map(|run| run.combo), Some(0));
        assert_eq!(
            advance_dragon(&mut slot, card("c1")),
            RunTransition::Advanced { combo: 1 }
        );
        for wild in ["jk", "f2", "s3", "r1", "p1", "m4", "dc"] {
            assert!(matches!(
                advance_dragon(&mut slot, card(wild)),
                RunTransition::Advanced { .. }
            ));
        }
        assert_eq!(slot.map(|run| run.combo), Some(8));
        assert_eq!(
            advance_dragon(&mut slot, card("b1")),
            RunTransition::Ended { combo: 8 }
        );
        assert_eq!(slot, None);
        assert_eq!(advance_dragon(&mut slot, card("b1")), RunTransition::Unchanged);
    }

    #[test]
    fn other_dragon_restarts_in_one_step() {
        let mut slot = None;
        advance_dragon(&mut slot, card("dc"));
        advance_dragon(&mut slot, card("c4"));
        assert_eq!(
            advance_dragon(&mut slot, card("db")),
            RunTransition::Restarted { previous: 1 }
        );
        assert_eq!(slot, Some(DragonRun::new(card("db"), Suit::Bam)));
    }

    #[test]
    fn winds_and_transports_break_a_dragon_run() {
        for breaker in ["wn", "te"] {
            let mut slot = None;
            advance_dragon(&mut slot, card("do"));
            assert_eq!(
                advance_dragon(&mut slot, card(breaker)),
                RunTransition::Ended { combo: 0 }
            );
        }
    }

    #[test]
    fn phoenix_climbs_by_three_then_one_at_the_ceiling() {
        let mut slot = None;
        assert_eq!(advance_phoenix(&mut slot, card("p1")), RunTransition::Started);
        for (code, combo) in [
            ("b1", 3),
            ("c2", 6),
            ("r1", 9),
            ("jk", 12),
            ("o4", 15),
            ("b5", 18),
            ("b6", 21),
            ("c7", 24),
            ("o8", 25),
            ("jk", 26),
        ] {
            assert_eq!(
                advance_phoenix(&mut slot, card(code)),
                RunTransition::Advanced { combo },
                "{code}"
            );
        }
        assert_eq!(slot.map(|run| run.number), Some(PHOENIX_CEILING));
    }

    #[test]
    fn phoenix_at_ceiling_is_destroyed_not_restarted() {
        for breaker in ["b9", "r2"] {
            let mut slot = Some(PhoenixRun {
                card: card("p2"),
                number: PHOENIX_CEILING,
                combo: 20,
            });
            assert_eq!(
                advance_phoenix(&mut slot, card(breaker)),
                RunTransition::Ended { combo: 20 }
            );
            assert_eq!(slot, None);
        }
    }

    #[test]
    fn phoenix_breaks_on_out_of_sequence_rank() {
        let mut slot = None;
        advance_phoenix(&mut slot, card("p1"));
        assert_eq!(
            advance_phoenix(&mut slot, card("b2")),
            RunTransition::Ended { combo: 0 }
        );
        advance_phoenix(&mut slot, card("p3"));
        assert_eq!(
            advance_phoenix(&mut slot, card("p1")),
            RunTransition::Restarted { previous: 0 }
        );
    }

    #[test]
    fn rabbit_run_builds_then_scores_once() {
        let mut slot = None;
        assert_eq!(advance_rabbit(&mut slot, card("b3")), RunTransition::Unchanged);
        assert_eq!(advance_rabbit(&mut slot, card("r1")), RunTransition::Started);
        assert_eq!(
            slot,
            Some(RabbitRun {
                card: card("r1"),
                combo: 2,
                score: false
            })
        );
        advance_rabbit(&mut slot, card("r4"));
        assert_eq!(slot.map(|run| (run.combo, run.score)), Some((4, false)));
        advance_rabbit(&mut slot, card("c2"));
        assert_eq!(slot.map(|run| (run.combo, run.score)), Some((4, true)));
        assert_eq!(
            advance_rabbit(&mut slot, card("r2")),
            RunTransition::Ended { combo: 4 }
        );
        assert_eq!(slot, None);
    }
}
