use super::Store;
use crate::error::BookmakerError;
use crate::models::{Market, MarketStatus};

#[derive(Debug, Clone, Default)]
pub struct ListMarketsArgs {
    pub book_id: String,
    pub greater_than_name: Option<String>,
    pub status: Option<MarketStatus>,
    pub limit: usize,
}

pub struct ListMarketsResult {
    pub markets: Vec<Market>,
    pub has_more: bool,
}

impl Store {
    pub fn create_market(&self, market: Market) -> Result<Market, BookmakerError> {
        let mut markets = self.markets.write();
        if markets.iter().any(|m| m.name == market.name) {
            return Err(BookmakerError::invalid_argument("market with name already exists"));
        }
        markets.push(market.clone());
        Ok(market)
    }

    pub fn get_market(&self, name: &str) -> Result<Market, BookmakerError> {
        let markets = self.markets.read();
        markets
            .iter()
            .find(|m| m.name == name)
            .cloned()
            .ok_or_else(|| BookmakerError::not_found(format!("market not found: {name}")))
    }

    pub fn update_market(&self, market: Market) -> Result<Market, BookmakerError> {
        let mut markets = self.markets.write();
        let slot = markets
            .iter_mut()
            .find(|m| m.name == market.name)
            .ok_or_else(|| BookmakerError::not_found(format!("market not found: {}", market.name)))?;
        *slot = market.clone();
        Ok(market)
    }

    /// Number of currently-OPEN markets in a book, used to enforce the
    /// per-book open-market cap (spec §4.5 invariant).
    pub fn count_open_markets(&self, book_id: &str) -> usize {
        let markets = self.markets.read();
        markets
            .iter()
            .filter(|m| {
                m.status == MarketStatus::Open
                    && crate::names::parse_market_name(&m.name)
                        .map(|n| n.book_id == book_id)
                        .unwrap_or(false)
            })
            .count()
    }

    pub fn list_markets(&self, args: &ListMarketsArgs) -> Result<ListMarketsResult, BookmakerError> {
        crate::names::validate_book_id(&args.book_id)?;
        let markets = self.markets.read();
        let mut matching: Vec<&Market> = markets
            .iter()
            .filter(|m| {
                crate::names::parse_market_name(&m.name)
                    .map(|n| n.book_id == args.book_id)
                    .unwrap_or(false)
            })
            .filter(|m| args.status.map(|s| s == m.status).unwrap_or(true))
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));

        let start = match &args.greater_than_name {
            Some(cursor) => matching.partition_point(|m| m.name.as_str() <= cursor.as_str()),
            None => 0,
        };

        let mut page: Vec<Market> = matching[start..]
            .iter()
            .take(args.limit + 1)
            .map(|m| (*m).clone())
            .collect();
        let has_more = page.len() > args.limit;
        page.truncate(args.limit);
        Ok(ListMarketsResult { markets: page, has_more })
    }
}
