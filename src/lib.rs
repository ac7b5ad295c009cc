//! Portfolio and real-estate simulation engine.
//!
//! Stock ledger with weighted-average cost basis, a property lifecycle with
//! seeded buyer/renter generation, and a single-writer session that replays
//! command scripts against both.

pub mod agents;
pub mod config;
pub mod error;
pub mod ledger;
pub mod parser;
pub mod property;
pub mod random;
pub mod risk;
pub mod session;
pub mod transactions;
pub mod types;
pub mod utils;

pub use error::{Result, SimError};
pub use random::{RandomSource, SeededRandom};
