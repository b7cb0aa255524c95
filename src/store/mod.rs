//! The in-memory store: three insertion-order-stable collections, one
//! `parking_lot::RwLock` each, so unrelated readers never contend with
//! writers from other collections (spec §4.2, §5).

mod bets;
mod markets;
mod users;

pub use bets::{ListBetsArgs, ListBetsResult};
pub use markets::{ListMarketsArgs, ListMarketsResult};
pub use users::{ListUsersArgs, ListUsersResult, OrderBy};

use crate::models::{Bet, Market, User};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Plain-data mirror of the store's contents, used only for snapshotting.
/// Kept separate from `Store` itself because `parking_lot::RwLock` does not
/// implement `Serialize`/`Deserialize`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotData {
    pub users: Vec<User>,
    pub markets: Vec<Market>,
    pub bets: Vec<Bet>,
}

/// The store. Each collection is append-ordered; updates replace an entry
/// in place so that insertion order (and therefore name ordering for
/// newly-created UUIDs, which is what listing sorts by) is preserved.
pub struct Store {
    pub(crate) users: RwLock<Vec<User>>,
    pub(crate) markets: RwLock<Vec<Market>>,
    pub(crate) bets: RwLock<Vec<Bet>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            markets: RwLock::new(Vec::new()),
            bets: RwLock::new(Vec::new()),
        }
    }

    pub fn from_snapshot(data: SnapshotData) -> Self {
        Self {
            users: RwLock::new(data.users),
            markets: RwLock::new(data.markets),
            bets: RwLock::new(data.bets),
        }
    }

    /// Takes a consistent point-in-time copy of the whole store for persistence.
    ///
    /// Locks are acquired users → markets → bets, the same order used
    /// everywhere else in this module, so this can never deadlock against a
    /// concurrent mutator.
    pub fn snapshot(&self) -> SnapshotData {
        let users = self.users.read();
        let markets = self.markets.read();
        let bets = self.bets.read();
        SnapshotData {
            users: users.clone(),
            markets: markets.clone(),
            bets: bets.clone(),
        }
    }
}
