//! `select_tile`: one click on the board, resolved as a single registry batch.

use crate::{
    advance_dragon, advance_phoenix, advance_rabbit, blow_wind, cards_match, game_over_condition,
    get_coins, get_points, is_free, mutate_suit, shuffle_live, Card, EmperorDef, EndCondition,
    Event, EventBus, Game, RngState, RunKind, RunTransition, ScoreTables, Tile, TileId,
    TileRegistry,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TurnError {
    #[error("unknown tile {0}")]
    UnknownTile(TileId),
    #[error("game has already ended")]
    GameEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub first: TileId,
    pub second: TileId,
    pub points: i64,
    pub multiplier: i64,
    pub coins: i64,
    pub end: Option<EndCondition>,
}

impl MatchResult {
    pub fn total(&self) -> i64 {
        self.points.saturating_mul(self.multiplier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The tile is not free; nothing changed.
    Ignored,
    Selected,
    Deselected,
    Missed { other: TileId },
    Matched(MatchResult),
}

/// Scoring inputs that stay fixed for a whole board.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    pub tables: &'a ScoreTables,
    pub emperors: &'a [EmperorDef],
    pub now_ms: u64,
}

pub fn select_tile(
    registry: &mut TileRegistry,
    game: &mut Game,
    id: TileId,
    rng: &mut RngState,
    ctx: TurnContext<'_>,
    events: &mut EventBus,
) -> Result<SelectOutcome, TurnError> {
    if game.is_over() {
        return Err(TurnError::GameEnded);
    }
    let tile = registry.get(id).cloned().ok_or(TurnError::UnknownTile(id))?;

    if !is_free(registry, &tile, game.freedom_boost()) {
        // A selected tile can lose its freedom to wind; the click releases it.
        if tile.selected && tile.is_live() {
            registry.update(id, |tile| tile.selected = false);
            events.push(Event::TileDeselected { id });
            return Ok(SelectOutcome::Deselected);
        }
        return Ok(SelectOutcome::Ignored);
    }
    game.start(ctx.now_ms);

    let previous = registry.selected().cloned();
    match previous {
        None => {
            registry.update(id, |tile| tile.selected = true);
            events.push(Event::TileSelected { id });
            Ok(SelectOutcome::Selected)
        }
        Some(previous) if previous.id == id => {
            registry.update(id, |tile| tile.selected = false);
            events.push(Event::TileDeselected { id });
            Ok(SelectOutcome::Deselected)
        }
        Some(previous) if !cards_match(previous.card, tile.card) => {
            registry.update(previous.id, |tile| tile.selected = false);
            debug!(first = %previous.id, second = %id, "pair missed");
            events.push(Event::PairMissed {
                first: previous.id,
                second: id,
            });
            Ok(SelectOutcome::Missed { other: previous.id })
        }
        Some(previous) => {
            let result = registry.batch(|registry| {
                resolve_match(registry, game, &previous, &tile, rng, ctx, events)
            });
            Ok(SelectOutcome::Matched(result))
        }
    }
}

fn resolve_match(
    registry: &mut TileRegistry,
    game: &mut Game,
    first: &Tile,
    second: &Tile,
    rng: &mut RngState,
    ctx: TurnContext<'_>,
    events: &mut EventBus,
) -> MatchResult {
    for id in [first.id, second.id] {
        registry.update(id, |tile| {
            tile.deleted = true;
            tile.selected = false;
        });
    }
    let card = second.card;

    if let Card::Wind(direction) = card {
        let moved = blow_wind(registry, direction);
        events.push(Event::WindBlew { direction, moved });
    }
    let dragon = advance_dragon(&mut game.dragon_run, card);
    push_run_event(events, RunKind::Dragon, dragon);
    let phoenix = advance_phoenix(&mut game.phoenix_run, card);
    push_run_event(events, RunKind::Phoenix, phoenix);
    game.flower_or_season = matches!(card, Card::Flower(_) | Card::Season(_)).then_some(card);
    game.transport = matches!(card, Card::Transport(_)).then_some(card);
    let rabbit = advance_rabbit(&mut game.rabbit_run, card);
    push_run_event(events, RunKind::Rabbit, rabbit);
    if let Some((from, to)) = card.mutation() {
        let count = mutate_suit(registry, from, to);
        events.push(Event::TilesMutated { from, to, count });
    }
    if card == Card::Joker {
        let count = shuffle_live(registry, rng);
        events.push(Event::TilesShuffled { count });
    }

    let tiles: Vec<Tile> = [first.id, second.id]
        .into_iter()
        .filter_map(|id| registry.get(id).cloned())
        .collect();
    let score = get_points(game, &tiles, ctx.emperors, ctx.tables);
    let coins = get_coins(game, &tiles, score, ctx.tables);
    registry.update(second.id, |tile| {
        tile.points = Some(score.total());
        tile.coins = Some(coins);
    });
    game.points += score.total();
    game.coins += coins;
    game.matches += 1;
    debug!(
        first = %first.id,
        second = %second.id,
        %card,
        points = score.points,
        multiplier = score.multiplier,
        coins,
        "pair matched"
    );
    events.push(Event::PairMatched {
        first: first.id,
        second: second.id,
        points: score.points,
        multiplier: score.multiplier,
        coins,
    });

    let end = game_over_condition(registry, game);
    if let Some(condition) = end {
        game.end(condition, ctx.now_ms);
        debug!(?condition, points = game.points, "game over");
        events.push(Event::GameEnded {
            condition,
            points: game.points,
        });
    }
    MatchResult {
        first: first.id,
        second: second.id,
        points: score.points,
        multiplier: score.multiplier,
        coins,
        end,
    }
}

fn push_run_event(events: &mut EventBus, kind: RunKind, transition: RunTransition) {
    match transition {
        RunTransition::Unchanged => {}
        RunTransition::Started => events.push(Event::RunStarted { kind }),
        RunTransition::Advanced { combo } => events.push(Event::RunAdvanced { kind, combo }),
        RunTransition::Restarted { previous } => {
            events.push(Event::RunEnded {
                kind,
                combo: previous,
            });
            events.push(Event::RunStarted { kind });
        }
        RunTransition::Ended { combo } => events.push(Event::RunEnded { kind, combo }),
    }
}
