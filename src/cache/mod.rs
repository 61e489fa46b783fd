pub mod flight;
pub mod key;
pub mod store;
pub mod sweeper;

use thiserror::Error;

pub use flight::{FlightRole, InFlight};
pub use key::KeyPolicy;
pub use store::{CacheEntry, CacheStore};
pub use sweeper::spawn_sweeper;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache capacity must be greater than 0")]
    ZeroCapacity,
}
