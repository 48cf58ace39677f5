// Decision core: multi-PV evaluation + human-like move selection
pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod humanize;

pub use error::BotError;
