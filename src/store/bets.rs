use super::Store;
use crate::error::BookmakerError;
use crate::models::Bet;

#[derive(Debug, Clone, Default)]
pub struct ListBetsArgs {
    pub book_id: String,
    pub greater_than_name: Option<String>,
    pub user: Option<String>,
    pub market: Option<String>,
    pub exclude_settled: bool,
    pub limit: usize,
}

pub struct ListBetsResult {
    pub bets: Vec<Bet>,
    pub has_more: bool,
}

impl Store {
    pub fn create_bet(&self, bet: Bet) -> Result<Bet, BookmakerError> {
        let mut bets = self.bets.write();
        if bets.iter().any(|b| b.name == bet.name) {
            return Err(BookmakerError::invalid_argument("bet with name already exists"));
        }
        bets.push(bet.clone());
        Ok(bet)
    }

    pub fn get_bet(&self, name: &str) -> Result<Bet, BookmakerError> {
        let bets = self.bets.read();
        bets.iter()
            .find(|b| b.name == name)
            .cloned()
            .ok_or_else(|| BookmakerError::not_found(format!("bet not found: {name}")))
    }

    /// All bets placed against a market, in insertion order. Used by
    /// settlement and cancellation to compute payouts/refunds.
    pub fn bets_for_market(&self, market_name: &str) -> Vec<Bet> {
        let bets = self.bets.read();
        bets.iter().filter(|b| b.market == market_name).cloned().collect()
    }

    /// Replaces a batch of bets transactionally under a single write lock,
    /// used when settlement/cancellation must update every bet on a market
    /// atomically with respect to concurrent readers.
    pub fn replace_bets(&self, updated: Vec<Bet>) {
        let mut bets = self.bets.write();
        for u in updated {
            if let Some(slot) = bets.iter_mut().find(|b| b.name == u.name) {
                *slot = u;
            }
        }
    }

    pub fn list_bets(&self, args: &ListBetsArgs) -> Result<ListBetsResult, BookmakerError> {
        crate::names::validate_book_id(&args.book_id)?;
        let bets = self.bets.read();
        let mut matching: Vec<&Bet> = bets
            .iter()
            .filter(|b| {
                crate::names::parse_bet_name(&b.name)
                    .map(|n| n.book_id == args.book_id)
                    .unwrap_or(false)
            })
            .filter(|b| args.user.as_deref().map(|u| u == b.user).unwrap_or(true))
            .filter(|b| args.market.as_deref().map(|m| m == b.market).unwrap_or(true))
            .filter(|b| !args.exclude_settled || !b.is_settled())
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));

        let start = match &args.greater_than_name {
            Some(cursor) => matching.partition_point(|b| b.name.as_str() <= cursor.as_str()),
            None => 0,
        };

        let mut page: Vec<Bet> = matching[start..]
            .iter()
            .take(args.limit + 1)
            .map(|b| (*b).clone())
            .collect();
        let has_more = page.len() > args.limit;
        page.truncate(args.limit);
        Ok(ListBetsResult { bets: page, has_more })
    }
}
