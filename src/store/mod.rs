//! Spot persistence

mod memory;
mod seed;

pub use memory::MemoryStore;
pub use seed::{sample_spots, seed_if_empty};

use uuid::Uuid;

use crate::error::Result;
use crate::types::Spot;

/// In-place change applied to a stored spot; an error leaves the spot unchanged
pub type SpotChange<'a> = Box<dyn FnOnce(&mut Spot) -> Result<()> + Send + 'a>;

/// Connection state reported by a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Disconnected,
    Connected,
    Connecting,
    Disconnecting,
}

impl StoreState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreState::Disconnected => "disconnected",
            StoreState::Connected => "connected",
            StoreState::Connecting => "connecting",
            StoreState::Disconnecting => "disconnecting",
        }
    }
}

/// Document store for spot records.
///
/// Implementations must be safe to share between request handlers.
pub trait SpotStore: Send + Sync {
    /// Stores a new spot and returns it as saved
    fn insert(&self, spot: Spot) -> Result<Spot>;

    fn get(&self, id: &Uuid) -> Result<Option<Spot>>;

    /// All spots, in no particular order
    fn list(&self) -> Result<Vec<Spot>>;

    /// Applies `change` to a stored spot atomically and returns the result.
    ///
    /// Returns `None` when the id is unknown. Concurrent changes to the same
    /// spot are applied one after the other, never to a stale copy.
    fn modify(&self, id: &Uuid, change: SpotChange<'_>) -> Result<Option<Spot>>;

    /// Removes a spot and returns it
    fn remove(&self, id: &Uuid) -> Result<Option<Spot>>;

    fn count(&self) -> Result<usize>;

    fn state(&self) -> StoreState;

    /// Short human readable description of the backend
    fn backend(&self) -> String;

    fn is_available(&self) -> bool {
        self.state() == StoreState::Connected
    }
}
