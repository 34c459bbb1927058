use anyhow::{bail, Context};
use pairfall_core::{
    Deck, EndCondition, Event, EventBus, Material, SelectOutcome, Session, ShopItem,
    ShopItemKind,
};
use pairfall_data::{layout_path, load_catalogue, load_game_config, load_layout};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct CliOptions {
    assets: PathBuf,
    layout: String,
    seed: u64,
    emperors: Vec<String>,
    max_turns: u32,
    boards: u32,
}

fn parse_cli_options(args: &[String]) -> anyhow::Result<CliOptions> {
    let mut options = CliOptions {
        assets: PathBuf::from("assets"),
        layout: "pyramid".to_string(),
        seed: std::env::var("PAIRFALL_SEED")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(0),
        emperors: Vec::new(),
        max_turns: 1000,
        boards: 1,
    };
    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        let value = || {
            args.get(idx + 1)
                .cloned()
                .with_context(|| format!("{flag} needs a value"))
        };
        match flag {
            "--assets" => options.assets = PathBuf::from(value()?),
            "--layout" => options.layout = value()?,
            "--seed" => {
                options.seed = value()?.parse().context("--seed must be an integer")?;
            }
            "--emperor" => options.emperors.push(value()?),
            "--max-turns" => {
                options.max_turns = value()?.parse().context("--max-turns must be an integer")?;
            }
            "--boards" => {
                options.boards = value()?.parse().context("--boards must be an integer")?;
            }
            other => bail!("unknown argument {other}"),
        }
        idx += 2;
    }
    Ok(options)
}

fn init_tracing() {
    let filter = std::env::var("PAIRFALL_LOG")
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Serialize)]
struct BoardSummary {
    board: u32,
    points: i64,
    coins: i64,
    matches: u32,
    end: Option<EndCondition>,
    purchases: Vec<ShopItemKind>,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    layout: String,
    emperors: Vec<String>,
    boards: Vec<BoardSummary>,
    total_points: i64,
    coins: i64,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args)?;
    let summary = run_auto(&options)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_auto(options: &CliOptions) -> anyhow::Result<RunSummary> {
    let config = load_game_config(&options.assets)?;
    let layout = load_layout(&layout_path(&options.assets, &options.layout))?;
    let catalogue = load_catalogue(&options.assets)?;
    let mut emperors = Vec::new();
    for id in &options.emperors {
        let emperor = catalogue
            .emperor_by_id(id)
            .with_context(|| format!("unknown emperor {id}"))?;
        emperors.push(emperor.clone());
    }
    info!(
        layout = %layout.name,
        tiles = layout.slots.len(),
        seed = options.seed,
        "loaded assets"
    );

    let mut session = Session::new(config, layout.slots, Deck::standard(), emperors, options.seed)
        .context("start session")?
        .with_catalogue(catalogue);
    let mut events = EventBus::default();
    let clock = Instant::now();
    let mut boards = Vec::new();
    let mut total_points = 0;

    for board in 1..=options.boards.max(1) {
        if board > 1 {
            session.next_board(&mut events)?;
        }
        play_board(&mut session, &mut events, &clock, options.max_turns)?;
        total_points += session.game.points;
        let purchases = if board < options.boards {
            shop_greedily(&mut session, &mut events)?
        } else {
            Vec::new()
        };
        boards.push(BoardSummary {
            board,
            points: session.game.points,
            coins: session.game.coins,
            matches: session.game.matches,
            end: session.game.end_condition,
            purchases,
        });
    }

    Ok(RunSummary {
        seed: options.seed,
        layout: layout.name,
        emperors: session
            .inventory
            .emperors
            .iter()
            .map(|emperor| emperor.id.clone())
            .collect(),
        boards,
        total_points,
        coins: session.game.coins,
    })
}

fn play_board(
    session: &mut Session,
    events: &mut EventBus,
    clock: &Instant,
    max_turns: u32,
) -> anyhow::Result<()> {
    for _ in 0..max_turns {
        if session.is_over() {
            return Ok(());
        }
        let Some((first, second)) = session.hint() else {
            break;
        };
        let now = clock.elapsed().as_millis() as u64;
        session.select(first, now, events)?;
        match session.select(second, now, events)? {
            SelectOutcome::Matched(result) => {
                debug!(
                    first = %result.first,
                    second = %result.second,
                    total = result.total(),
                    "matched"
                );
            }
            other => warn!(?other, "hinted pair did not match"),
        }
        log_events(events);
    }
    if !session.is_over() {
        warn!(max_turns, "board left unfinished");
    }
    Ok(())
}

/// Buys whatever is affordable, cheapest first. Upgrades go to the first
/// deck pair that is still plain bone.
fn shop_greedily(
    session: &mut Session,
    events: &mut EventBus,
) -> anyhow::Result<Vec<ShopItemKind>> {
    if !session.is_over() {
        return Ok(Vec::new());
    }
    session.enter_shop(events)?;
    let mut bought = Vec::new();
    loop {
        let target = session
            .deck
            .pairs
            .iter()
            .position(|pair| pair.material == Material::Bone);
        let coins = session.game.coins;
        let Some(shop) = session.shop.as_ref() else {
            break;
        };
        let choice = shop
            .offers
            .iter()
            .enumerate()
            .filter(|(_, offer)| offer.price <= coins)
            .filter(|(_, offer)| {
                !matches!(offer.item, ShopItem::MaterialUpgrade(_)) || target.is_some()
            })
            .min_by_key(|(_, offer)| offer.price)
            .map(|(index, _)| index);
        let Some(index) = choice else {
            break;
        };
        match session.buy_offer(index, target, events) {
            Ok(item) => bought.push(item.kind()),
            Err(err) => {
                warn!(%err, "purchase refused");
                break;
            }
        }
    }
    log_events(events);
    session.leave_shop();
    Ok(bought)
}

fn log_events(events: &mut EventBus) {
    for event in events.drain() {
        match &event {
            Event::GameEnded { condition, points } => {
                info!(?condition, points, "board finished");
            }
            Event::ShopBought { item, cost, coins } => {
                info!(?item, cost, coins, "bought");
            }
            other => debug!(event = ?other, "event"),
        }
    }
}
