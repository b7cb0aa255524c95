//! Entity types for the bookmaker domain.
//!
//! Mirrors the teacher's `models.rs` convention of plain `serde`-derived
//! structs with no behavior beyond small constructors, plus the state-machine
//! enum the spec's design notes (§9) call for on `Market`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_USERNAME_LEN: usize = 255;
pub const MAX_TITLE_LEN: usize = 1024;
pub const MAX_OPEN_MARKETS_PER_BOOK: usize = 25;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// A bettor within a book. `unsettled_centipoints` is always derived (§4.6);
/// callers never see a stored value for it, only the freshly hydrated one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub username: String,
    pub centipoints: i64,
    #[serde(default)]
    pub unsettled_centipoints: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle status of a market. Only forward transitions are legal; SETTLED
/// and CANCELED are terminal (spec §4.5 state machine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketStatus {
    Open,
    BetsLocked,
    Settled,
    Canceled,
}

/// An outcome within a pool market. `centipoints` is the sum of stakes placed
/// on this outcome; it only moves via `CreateBet` (up) until settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub name: String,
    pub title: String,
    pub centipoints: i64,
}

/// The market's type, modeled as an explicit variant per spec §9's design
/// note so that a future non-pool type is additive rather than a refactor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarketType {
    Pool {
        outcomes: Vec<Outcome>,
        /// Outcome name of the declared winner, set at settlement.
        #[serde(default)]
        winner: Option<String>,
    },
}

impl MarketType {
    pub fn outcomes(&self) -> &[Outcome] {
        match self {
            Self::Pool { outcomes, .. } => outcomes,
        }
    }

    pub fn outcomes_mut(&mut self) -> &mut Vec<Outcome> {
        match self {
            Self::Pool { outcomes, .. } => outcomes,
        }
    }

    pub fn winner(&self) -> Option<&str> {
        match self {
            Self::Pool { winner, .. } => winner.as_deref(),
        }
    }

    pub fn find_outcome(&self, outcome_name: &str) -> Option<&Outcome> {
        self.outcomes().iter().find(|o| o.name == outcome_name)
    }

    pub fn find_outcome_mut(&mut self, outcome_name: &str) -> Option<&mut Outcome> {
        self.outcomes_mut().iter_mut().find(|o| o.name == outcome_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    pub name: String,
    pub title: String,
    pub creator: String,
    pub status: MarketStatus,
    #[serde(rename = "type")]
    pub market_type: MarketType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Cosmetic scheduled-lock metadata (spec §9 open question (d)); never
    /// enforced by the core.
    #[serde(default)]
    pub lock_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub settled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bet {
    pub name: String,
    pub user: String,
    pub market: String,
    pub outcome: String,
    pub centipoints: i64,
    #[serde(default)]
    pub settled_centipoints: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub settled_at: Option<DateTime<Utc>>,
}

impl Bet {
    pub fn is_settled(&self) -> bool {
        self.settled_at.is_some()
    }
}

/// Validates a username per spec §3: alphanumeric plus `_`/`-`, length 1..255.
pub fn validate_username(username: &str) -> Result<(), crate::error::BookmakerError> {
    use crate::error::BookmakerError;
    if username.is_empty() || username.len() > MAX_USERNAME_LEN {
        return Err(BookmakerError::invalid_argument(format!(
            "username must be 1..{MAX_USERNAME_LEN} characters"
        )));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(BookmakerError::invalid_argument(
            "username must be alphanumeric plus '_'/'-'",
        ));
    }
    Ok(())
}

/// Validates a market/outcome title per spec §3: length 1..1024.
pub fn validate_title(title: &str) -> Result<(), crate::error::BookmakerError> {
    use crate::error::BookmakerError;
    if title.is_empty() || title.len() > MAX_TITLE_LEN {
        return Err(BookmakerError::invalid_argument(format!(
            "title must be 1..{MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_validation() {
        assert!(validate_username("a_b-C9").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(256)).is_err());
    }

    #[test]
    fn title_validation() {
        assert!(validate_title("Who wins?").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title(&"x".repeat(1025)).is_err());
    }

    #[test]
    fn market_type_outcome_lookup() {
        let mt = MarketType::Pool {
            outcomes: vec![
                Outcome { name: "o1".into(), title: "Yes".into(), centipoints: 0 },
                Outcome { name: "o2".into(), title: "No".into(), centipoints: 0 },
            ],
            winner: None,
        };
        assert!(mt.find_outcome("o1").is_some());
        assert!(mt.find_outcome("o3").is_none());
    }
}
