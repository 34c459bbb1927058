//! Core game logic. Keep this crate free of IO and platform concerns.

pub mod board;
pub mod cards;
pub mod combo;
pub mod config;
pub mod content;
pub mod deck;
pub mod effects;
pub mod events;
pub mod generate;
pub mod inventory;
pub mod layout;
pub mod registry;
pub mod rng;
pub mod rules;
pub mod scoring;
pub mod session;
pub mod shop;
pub mod special;
pub mod state;
pub mod turn;

pub use board::*;
pub use cards::*;
pub use combo::*;
pub use config::*;
pub use content::*;
pub use deck::*;
pub use effects::*;
pub use events::*;
pub use generate::*;
pub use inventory::*;
pub use layout::*;
pub use registry::*;
pub use rng::*;
pub use rules::*;
pub use scoring::*;
pub use session::*;
pub use shop::*;
pub use special::*;
pub use state::*;
pub use turn::*;
