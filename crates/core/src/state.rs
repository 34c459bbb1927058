use crate::{Card, DragonRun, EndCondition, FreedomClass, PhoenixRun, RabbitRun};
use serde::{Deserialize, Serialize};

/// Mutable state of one board session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub points: i64,
    #[serde(default)]
    pub coins: i64,
    #[serde(default)]
    pub matches: u32,
    #[serde(default)]
    pub started_at: Option<u64>,
    #[serde(default)]
    pub ended_at: Option<u64>,
    #[serde(default)]
    pub end_condition: Option<EndCondition>,
    #[serde(default)]
    pub dragon_run: Option<DragonRun>,
    #[serde(default)]
    pub phoenix_run: Option<PhoenixRun>,
    #[serde(default)]
    pub rabbit_run: Option<RabbitRun>,
    /// Last flower or season matched; loosens freedom until the next match.
    #[serde(default)]
    pub flower_or_season: Option<Card>,
    #[serde(default)]
    pub transport: Option<Card>,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now_ms: u64) {
        self.started_at.get_or_insert(now_ms);
    }

    pub fn is_over(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Stamps the end once; later calls keep the first condition.
    pub fn end(&mut self, condition: EndCondition, now_ms: u64) {
        if self.ended_at.is_none() {
            self.ended_at = Some(now_ms);
            self.end_condition = Some(condition);
        }
    }

    pub fn freedom_boost(&self) -> Option<FreedomClass> {
        self.flower_or_season.map(|_| FreedomClass::Relaxed)
    }

    pub fn dragon_combo(&self) -> i64 {
        self.dragon_run.map_or(0, |run| run.combo)
    }

    pub fn phoenix_combo(&self) -> i64 {
        self.phoenix_run.map_or(0, |run| run.combo)
    }

    /// Rabbit combo only counts while the run is paying out.
    pub fn rabbit_combo(&self) -> i64 {
        self.rabbit_run
            .filter(|run| run.score)
            .map_or(0, |run| run.combo)
    }
}
