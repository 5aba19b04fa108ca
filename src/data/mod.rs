//! Data loading and export
//!
//! SQLite fight history in, CSV standings/stats/training rows out.

pub mod database;
pub mod events;
pub mod export;

pub use database::Database;
pub use events::{prepare_events, RawEvent};
