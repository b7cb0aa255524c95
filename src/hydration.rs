//! Derived fields that are never persisted, only recomputed on read (spec §4.6).

use crate::models::Bet;

/// Sum of stake on every bet the user has placed that has not yet settled.
/// A canceled market's bets settle back to zero stake when refunded, so this
/// only ever reflects genuinely outstanding exposure.
pub fn unsettled_centipoints(bets: &[Bet], user_name: &str) -> i64 {
    bets.iter()
        .filter(|b| b.user == user_name && !b.is_settled())
        .map(|b| b.centipoints)
        .sum()
}
