//! The bookmaker service: validates requests, enforces invariants, runs the
//! market state machine, computes payouts, and coordinates mutations under
//! the striped market-writer locks (spec §4.5, §5).

pub mod bets;
pub mod locks;
pub mod markets;
mod settlement;
pub mod users;

use crate::error::Result;
use crate::snapshot::SnapshotWriter;
use crate::store::Store;
use locks::MarketLocks;
use std::collections::HashMap;
use std::path::Path;

pub struct Bookmaker {
    store: Store,
    locks: MarketLocks,
    snapshot: Option<SnapshotWriter>,
}

impl Bookmaker {
    /// Loads (or creates) the store from the snapshot file at `path` and
    /// wires up a writer that persists after every successful mutation.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let snapshot = SnapshotWriter::new(path.as_ref());
        let data = snapshot.load_or_create()?;
        Ok(Self {
            store: Store::from_snapshot(data),
            locks: MarketLocks::new(),
            snapshot: Some(snapshot),
        })
    }

    /// A store with no backing file, for tests and for short-lived tooling.
    pub fn in_memory() -> Self {
        Self { store: Store::new(), locks: MarketLocks::new(), snapshot: None }
    }

    fn persist(&self) -> Result<()> {
        if let Some(snapshot) = &self.snapshot {
            let data = self.store.snapshot();
            snapshot.persist(&data)?;
        }
        Ok(())
    }

    /// Writes back a batch of settled/refunded bets and credits each
    /// affected user by the sum of their `settled_centipoints` in this
    /// batch. Each user's credit goes through `Store::credit_user`, which
    /// does its read-modify-write under a single acquisition of the users
    /// write lock — this market's stripe alone does not order a credit
    /// against a concurrent settlement/bet on a different market touching
    /// the same user (spec §5/§8 no-overdraft).
    fn apply_settlement(&self, settled_bets: &[crate::models::Bet]) -> Result<()> {
        let mut credits: HashMap<String, i64> = HashMap::new();
        for bet in settled_bets {
            *credits.entry(bet.user.clone()).or_insert(0) += bet.settled_centipoints;
        }
        for (user_name, credit) in credits {
            self.store.credit_user(&user_name, credit)?;
        }
        self.store.replace_bets(settled_bets.to_vec());
        Ok(())
    }
}
