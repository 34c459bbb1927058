use pairfall_core::{
    get_points, select_tile, Card, EndCondition, Event, EventBus, Game, Material, MatchResult,
    PhoenixRun, Position, RngState, RunKind, Score, ScoreTables, SelectOutcome, Tile, TileId,
    TileRegistry, TurnContext, TurnError,
};
use std::cell::Cell;
use std::rc::Rc;

struct Table {
    registry: TileRegistry,
    game: Game,
    rng: RngState,
    tables: ScoreTables,
    events: EventBus,
    clock: u64,
}

fn card(code: &str) -> Card {
    code.parse().expect("card")
}

fn tile(id: u32, code: &str, pos: (i32, i32, i32)) -> Tile {
    Tile::new(
        TileId(id),
        card(code),
        Material::Bone,
        Position::new(pos.0, pos.1, pos.2),
    )
}

impl Table {
    fn new(tiles: Vec<Tile>) -> Self {
        Self {
            registry: TileRegistry::from_tiles(tiles),
            game: Game::new(),
            rng: RngState::from_seed(42),
            tables: ScoreTables::default(),
            events: EventBus::default(),
            clock: 0,
        }
    }

    /// Tiles spaced apart on one row so every one of them is free.
    fn row(codes: &[&str]) -> Self {
        let tiles = codes
            .iter()
            .enumerate()
            .map(|(idx, code)| tile(idx as u32 + 1, code, (idx as i32 * 4, 0, 0)))
            .collect();
        Self::new(tiles)
    }

    fn click(&mut self, id: u32) -> Result<SelectOutcome, TurnError> {
        self.clock += 1;
        let ctx = TurnContext {
            tables: &self.tables,
            emperors: &[],
            now_ms: self.clock,
        };
        select_tile(
            &mut self.registry,
            &mut self.game,
            TileId(id),
            &mut self.rng,
            ctx,
            &mut self.events,
        )
    }

    fn pair(&mut self, a: u32, b: u32) -> MatchResult {
        assert_eq!(self.click(a), Ok(SelectOutcome::Selected));
        match self.click(b) {
            Ok(SelectOutcome::Matched(result)) => result,
            other => panic!("expected a match, got {other:?}"),
        }
    }

    fn tile(&self, id: u32) -> &Tile {
        self.registry.get(TileId(id)).expect("tile")
    }

    fn events(&mut self) -> Vec<Event> {
        self.events.drain().collect()
    }
}

#[test]
fn dragon_run_scores_from_the_next_pair() {
    let mut table = Table::row(&["dc", "dc", "c1", "c1", "b5", "b5"]);
    let opened = table.pair(1, 2);
    assert_eq!(opened.total(), 0);
    let run = table.game.dragon_run.expect("dragon run");
    assert_eq!(run.card, card("dc"));
    assert_eq!(run.combo, 0);

    let tiles = [table.tile(3).clone(), table.tile(4).clone()];
    assert_eq!(
        get_points(&table.game, &tiles, &[], &table.tables),
        Score {
            points: 2,
            multiplier: 1
        }
    );

    let scored = table.pair(3, 4);
    assert_eq!(table.game.dragon_run.map(|run| run.combo), Some(1));
    assert_eq!((scored.points, scored.multiplier), (2, 2));
    assert_eq!(table.game.points, 4);
    assert_eq!(table.tile(4).points, Some(4));

    table.pair(5, 6);
    assert_eq!(table.game.dragon_run, None);
}

#[test]
fn dragon_replaces_dragon_in_one_step() {
    let mut table = Table::row(&["db", "db", "do", "do", "b1", "b1"]);
    table.pair(1, 2);
    table.events();
    table.pair(3, 4);
    assert_eq!(table.game.dragon_run.map(|run| run.card), Some(card("do")));
    assert_eq!(table.game.dragon_run.map(|run| run.combo), Some(0));
    let events = table.events();
    let ended = events.iter().position(|event| {
        matches!(
            event,
            Event::RunEnded {
                kind: RunKind::Dragon,
                combo: 0
            }
        )
    });
    let started = events.iter().position(|event| {
        matches!(
            event,
            Event::RunStarted {
                kind: RunKind::Dragon
            }
        )
    });
    assert!(ended.expect("ended") < started.expect("started"));
}

#[test]
fn phoenix_run_climbs_then_breaks_past_the_ceiling() {
    let mut table = Table::row(&["b8", "b8", "b9", "b9", "c1", "c1"]);
    table.game.phoenix_run = Some(PhoenixRun {
        card: card("p1"),
        number: 7,
        combo: 6,
    });
    table.pair(1, 2);
    let run = table.game.phoenix_run.expect("phoenix run");
    assert_eq!((run.number, run.combo), (8, 7));

    table.pair(3, 4);
    assert_eq!(table.game.phoenix_run, None);
}

#[test]
fn phoenix_run_adds_three_below_the_ceiling() {
    let mut table = Table::row(&["p2", "p2", "o1", "o1", "r3", "r3", "o3", "o3"]);
    table.pair(1, 2);
    assert_eq!(table.game.phoenix_run.map(|run| run.number), Some(0));
    table.pair(3, 4);
    table.pair(5, 6);
    let run = table.game.phoenix_run.expect("phoenix run");
    assert_eq!((run.number, run.combo), (2, 6));
    table.pair(7, 8);
    assert_eq!(table.game.phoenix_run.map(|run| run.combo), Some(9));
}

#[test]
fn rabbit_run_builds_pays_once_then_ends() {
    let mut table = Table::row(&["r1", "r1", "r2", "r2", "b1", "b1", "b2", "b2", "wn", "wn"]);
    let trajectory = |table: &Table| table.game.rabbit_run.map(|run| (run.combo, run.score));

    table.pair(1, 2);
    assert_eq!(trajectory(&table), Some((2, false)));
    table.pair(3, 4);
    assert_eq!(trajectory(&table), Some((4, false)));
    let paid = table.pair(5, 6);
    assert_eq!(trajectory(&table), Some((4, true)));
    assert_eq!((paid.points, paid.multiplier), (2, 5));
    assert_eq!(paid.coins, 40);
    let after = table.pair(7, 8);
    assert_eq!(trajectory(&table), None);
    assert_eq!(after.multiplier, 1);
}

#[test]
fn blocked_tile_clicks_change_nothing() {
    let mut table = Table::new(vec![
        tile(1, "b1", (0, 0, 0)),
        tile(2, "b2", (0, 0, 1)),
        tile(3, "b1", (4, 0, 0)),
    ]);
    let before = table.game.clone();
    assert_eq!(table.click(1), Ok(SelectOutcome::Ignored));
    assert_eq!(table.click(1), Ok(SelectOutcome::Ignored));
    assert_eq!(table.game, before);
    assert!(table.registry.iter().all(|tile| !tile.deleted && !tile.selected));
    assert!(table.events().is_empty());
}

#[test]
fn second_click_on_the_same_tile_cancels() {
    let mut table = Table::row(&["b1", "b1"]);
    assert_eq!(table.click(1), Ok(SelectOutcome::Selected));
    assert!(table.tile(1).selected);
    assert_eq!(table.click(1), Ok(SelectOutcome::Deselected));
    assert!(!table.tile(1).selected);
}

#[test]
fn mismatched_pair_is_a_clean_miss() {
    let mut table = Table::row(&["b1", "c2", "b1"]);
    table.click(1).expect("select");
    assert_eq!(
        table.click(2),
        Ok(SelectOutcome::Missed { other: TileId(1) })
    );
    assert!(table.registry.iter().all(|tile| !tile.selected && !tile.deleted));
    assert_eq!(table.game.points, 0);
    assert_eq!(table.game.matches, 0);
}

#[test]
fn unknown_tiles_fail_loudly() {
    let mut table = Table::row(&["b1", "b1"]);
    assert_eq!(table.click(99), Err(TurnError::UnknownTile(TileId(99))));
}

#[test]
fn game_over_is_stamped_and_final() {
    let mut table = Table::row(&["b1", "b1", "c2", "o3"]);
    let result = table.pair(1, 2);
    assert_eq!(result.end, Some(EndCondition::NoPairs));
    assert_eq!(table.game.end_condition, Some(EndCondition::NoPairs));
    assert_eq!(table.game.ended_at, Some(table.clock));
    assert_eq!(table.click(3), Err(TurnError::GameEnded));

    let mut cleared = Table::row(&["wn", "wn"]);
    let result = cleared.pair(1, 2);
    assert_eq!(result.end, Some(EndCondition::EmptyBoard));
    assert_eq!(cleared.game.points, 8);
}

#[test]
fn flower_loosens_freedom_for_one_turn() {
    // Tile 3 is boxed in on both sides: only the flower boost frees it.
    let mut table = Table::new(vec![
        tile(1, "f1", (0, 4, 0)),
        tile(2, "f4", (8, 4, 0)),
        tile(3, "b1", (2, 0, 0)),
        tile(4, "c7", (0, 0, 0)),
        tile(5, "c8", (4, 0, 0)),
        tile(6, "b1", (12, 4, 0)),
        tile(7, "c7", (16, 4, 0)),
        tile(8, "c8", (20, 4, 0)),
    ]);
    assert_eq!(table.click(3), Ok(SelectOutcome::Ignored));
    table.pair(1, 2);
    assert_eq!(table.game.flower_or_season, Some(card("f4")));
    table.pair(3, 6);
    assert_eq!(table.game.flower_or_season, None);
}

#[test]
fn transport_flag_lasts_until_the_next_match() {
    let mut table = Table::row(&["tn", "tn", "b1", "b1", "b2", "b2"]);
    table.pair(1, 2);
    assert_eq!(table.game.transport, Some(card("tn")));
    table.pair(3, 4);
    assert_eq!(table.game.transport, None);
}

#[test]
fn wind_blows_the_rest_of_the_board() {
    let mut table = Table::row(&["we", "we", "b1", "b1"]);
    table.pair(1, 2);
    assert_eq!(table.tile(4).position, Position::new(12, 0, 0));
    assert_eq!(table.tile(3).position, Position::new(10, 0, 0));
    assert!(table.events().contains(&Event::WindBlew {
        direction: pairfall_core::Direction::East,
        moved: 1
    }));
}

#[test]
fn mutation_rewrites_the_from_suit() {
    let mut table = Table::row(&["m1", "m1", "b3", "b3", "db", "db"]);
    table.pair(1, 2);
    assert_eq!(table.tile(3).card, card("c3"));
    assert_eq!(table.tile(4).card, card("c3"));
    assert_eq!(table.tile(5).card, card("dc"));
    table.pair(3, 4);
}

#[test]
fn joker_reshuffles_live_cards() {
    let mut table = Table::row(&["jk", "jk", "b1", "b1", "c2", "c2", "o3", "o3"]);
    table.pair(1, 2);
    let mut cards: Vec<Card> = table.registry.live().map(|tile| tile.card).collect();
    cards.sort();
    let mut expected: Vec<Card> = ["b1", "b1", "c2", "c2", "o3", "o3"]
        .iter()
        .map(|code| card(code))
        .collect();
    expected.sort();
    assert_eq!(cards, expected);
    assert!(table
        .events()
        .contains(&Event::TilesShuffled { count: 6 }));
}

#[test]
fn a_match_notifies_observers_once() {
    let mut table = Table::row(&["we", "we", "m1", "m1", "b1", "b1", "b2", "b2"]);
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    table
        .registry
        .subscribe(Box::new(move |_: &[TileId]| seen.set(seen.get() + 1)));
    table.click(1).expect("select");
    assert_eq!(calls.get(), 1);
    table.click(2).expect("match");
    assert_eq!(calls.get(), 2);
    table.pair(3, 4);
    assert_eq!(calls.get(), 4);
}
