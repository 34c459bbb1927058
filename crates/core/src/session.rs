use crate::{
    available_pairs, game_over_condition, generate_board, select_tile, Catalogue, Deck, EmperorDef,
    EndCondition, Event, EventBus, Game, GameConfig, GenerateError, Inventory, InventoryError,
    RngState, ScoreTables, SelectOutcome, ShopError, ShopState, Slot, TileId, TileRegistry,
    TurnContext, TurnError,
};
use thiserror::Error;
use tracing::info;

mod shop;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("board generation failed: {0}")]
    Generate(#[from] GenerateError),
    #[error("turn rejected: {0}")]
    Turn(#[from] TurnError),
    #[error("shop error: {0}")]
    Shop(#[from] ShopError),
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),
    #[error("upgrade target {0:?} is not a deck pair")]
    UpgradeTarget(Option<usize>),
    #[error("board is still in play")]
    BoardInPlay,
}

/// One player's run: the live board plus everything that outlives it.
#[derive(Debug)]
pub struct Session {
    pub config: GameConfig,
    pub tables: ScoreTables,
    pub catalogue: Catalogue,
    pub inventory: Inventory,
    pub rng: RngState,
    pub deck: Deck,
    pub slots: Vec<Slot>,
    pub registry: TileRegistry,
    pub game: Game,
    pub boards: u32,
    pub shop: Option<ShopState>,
}

impl Session {
    pub fn new(
        config: GameConfig,
        slots: Vec<Slot>,
        deck: Deck,
        emperors: Vec<EmperorDef>,
        seed: u64,
    ) -> Result<Self, SessionError> {
        let mut rng = RngState::from_seed(seed);
        let registry = generate_board(&slots, &deck, &mut rng)?;
        let mut inventory = Inventory::with_slots(config.emperor_slots);
        for emperor in emperors {
            inventory.add_emperor(emperor)?;
        }
        let tables = ScoreTables::from_config(&config);
        info!(seed, tiles = registry.live_count(), "session started");
        Ok(Self {
            config,
            tables,
            catalogue: Catalogue::default(),
            inventory,
            rng,
            deck,
            slots,
            registry,
            game: Game::new(),
            boards: 1,
            shop: None,
        })
    }

    pub fn with_catalogue(mut self, catalogue: Catalogue) -> Self {
        self.catalogue = catalogue;
        self
    }

    pub fn select(
        &mut self,
        id: TileId,
        now_ms: u64,
        events: &mut EventBus,
    ) -> Result<SelectOutcome, TurnError> {
        let ctx = TurnContext {
            tables: &self.tables,
            emperors: &self.inventory.emperors,
            now_ms,
        };
        select_tile(
            &mut self.registry,
            &mut self.game,
            id,
            &mut self.rng,
            ctx,
            events,
        )
    }

    pub fn available_pairs(&self) -> Vec<(TileId, TileId)> {
        available_pairs(&self.registry, self.game.freedom_boost())
            .into_iter()
            .map(|(a, b)| (a.id, b.id))
            .collect()
    }

    pub fn hint(&self) -> Option<(TileId, TileId)> {
        self.available_pairs().into_iter().next()
    }

    pub fn end_condition(&self) -> Option<EndCondition> {
        self.game
            .end_condition
            .or_else(|| game_over_condition(&self.registry, &self.game))
    }

    pub fn is_over(&self) -> bool {
        self.game.is_over()
    }

    /// Deals a fresh board from the session deck once the current one ended.
    /// Coins carry over; points and runs start again.
    pub fn next_board(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        if !self.game.is_over() {
            return Err(SessionError::BoardInPlay);
        }
        self.registry = generate_board(&self.slots, &self.deck, &mut self.rng)?;
        self.game = Game {
            coins: self.game.coins,
            ..Game::new()
        };
        self.shop = None;
        self.boards += 1;
        events.push(Event::BoardDealt {
            tiles: self.registry.live_count(),
            seed: self.rng.seed(),
        });
        info!(board = self.boards, "next board dealt");
        Ok(())
    }
}
