//! Pool settlement math (spec §4.7), the pariah-refund rule.

use crate::models::{Bet, Market};
use chrono::Utc;

/// Computes the post-settlement state of every bet on `market`, given the
/// declared `winner_outcome_name`. Returns clones with `settled_centipoints`
/// and `settled_at` populated; callers are responsible for writing them back
/// and crediting users.
pub fn settle(market: &Market, winner_outcome_name: &str, bets: &[Bet]) -> Vec<Bet> {
    let total: i64 = market.market_type.outcomes().iter().map(|o| o.centipoints).sum();
    let winner_stake = market
        .market_type
        .find_outcome(winner_outcome_name)
        .map(|o| o.centipoints)
        .unwrap_or(0);
    let now = Utc::now();

    if total == 0 {
        return bets
            .iter()
            .map(|b| {
                let mut b = b.clone();
                b.settled_centipoints = 0;
                b.settled_at = Some(now);
                b
            })
            .collect();
    }

    if winner_stake == 0 {
        // Pariah outcome: the winner had no backers. Refund every bet 1:1.
        return refund_all(bets);
    }

    let ratio = total as f64 / winner_stake as f64;
    bets.iter()
        .map(|b| {
            let mut b = b.clone();
            b.settled_centipoints = if b.outcome == winner_outcome_name {
                (b.centipoints as f64 * ratio).floor() as i64
            } else {
                0
            };
            b.settled_at = Some(now);
            b
        })
        .collect()
}

/// Refunds every bet on a market 1:1 — used both for the pariah-refund case
/// within `settle` and for `CancelMarket`.
pub fn refund_all(bets: &[Bet]) -> Vec<Bet> {
    let now = Utc::now();
    bets.iter()
        .map(|b| {
            let mut b = b.clone();
            b.settled_centipoints = b.centipoints;
            b.settled_at = Some(now);
            b
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MarketStatus, MarketType, Outcome};
    use uuid::Uuid;

    fn market(outcomes: Vec<(&str, i64)>) -> Market {
        let now = Utc::now();
        Market {
            name: "books/b1/markets/m1".into(),
            title: "t".into(),
            creator: "books/b1/users/creator".into(),
            status: MarketStatus::BetsLocked,
            market_type: MarketType::Pool {
                outcomes: outcomes
                    .into_iter()
                    .map(|(name, centipoints)| Outcome { name: name.into(), title: name.into(), centipoints })
                    .collect(),
                winner: None,
            },
            created_at: now,
            updated_at: now,
            lock_at: None,
            settled_at: None,
        }
    }

    fn bet(user: &str, outcome: &str, centipoints: i64) -> Bet {
        let now = Utc::now();
        Bet {
            name: format!("books/b1/bets/{}", Uuid::new_v4()),
            user: user.into(),
            market: "books/b1/markets/m1".into(),
            outcome: outcome.into(),
            centipoints,
            settled_centipoints: 0,
            created_at: now,
            updated_at: now,
            settled_at: None,
        }
    }

    #[test]
    fn winner_take_all_single_winner() {
        let m = market(vec![("Yes", 100), ("No", 100)]);
        let bets = vec![bet("a", "Yes", 100), bet("b", "No", 100)];
        let settled = settle(&m, "Yes", &bets);
        let a = settled.iter().find(|b| b.user == "a").unwrap();
        let b = settled.iter().find(|b| b.user == "b").unwrap();
        assert_eq!(a.settled_centipoints, 200);
        assert_eq!(b.settled_centipoints, 0);
    }

    #[test]
    fn pariah_refund_when_winner_has_no_backers() {
        let m = market(vec![("Yes", 0), ("No", 150)]);
        let bets = vec![bet("a", "No", 100), bet("b", "No", 50)];
        let settled = settle(&m, "Yes", &bets);
        let a = settled.iter().find(|b| b.user == "a").unwrap();
        let b = settled.iter().find(|b| b.user == "b").unwrap();
        assert_eq!(a.settled_centipoints, 100);
        assert_eq!(b.settled_centipoints, 50);
    }

    #[test]
    fn proportional_multi_backer() {
        let m = market(vec![("Yes", 100), ("No", 200)]);
        let bets = vec![bet("a", "Yes", 25), bet("b", "Yes", 75), bet("c", "No", 200)];
        let settled = settle(&m, "Yes", &bets);
        let a = settled.iter().find(|b| b.user == "a").unwrap();
        let b = settled.iter().find(|b| b.user == "b").unwrap();
        let c = settled.iter().find(|b| b.user == "c").unwrap();
        assert_eq!(a.settled_centipoints, 75);
        assert_eq!(b.settled_centipoints, 225);
        assert_eq!(c.settled_centipoints, 0);
    }

    #[test]
    fn no_bets_settles_with_no_payouts() {
        let m = market(vec![("Yes", 0), ("No", 0)]);
        let settled = settle(&m, "Yes", &[]);
        assert!(settled.is_empty());
    }

    #[test]
    fn cancel_refunds_every_bet_at_stake() {
        let bets = vec![bet("a", "Yes", 100), bet("b", "No", 250)];
        let refunded = refund_all(&bets);
        assert_eq!(refunded[0].settled_centipoints, 100);
        assert_eq!(refunded[1].settled_centipoints, 250);
    }
}
