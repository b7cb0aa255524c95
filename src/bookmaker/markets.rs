use super::Bookmaker;
use crate::error::{BookmakerError, Result};
use crate::models::{validate_title, Market, MarketStatus, MarketType, Outcome, MAX_OPEN_MARKETS_PER_BOOK};
use crate::names;
use crate::pagination;
use crate::store::{ListMarketsArgs, ListMarketsResult};
use chrono::Utc;

pub struct NewMarket {
    pub title: String,
    pub creator: String,
    pub outcome_titles: Vec<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default)]
pub struct ListMarketsRequest {
    pub book_id: String,
    pub status: Option<MarketStatus>,
}

pub struct ListMarketsPage {
    pub markets: Vec<Market>,
    pub next_page_token: Option<String>,
}

impl Bookmaker {
    pub fn create_market(&self, book_id: &str, new_market: NewMarket) -> Result<Market> {
        names::validate_book_id(book_id)?;
        validate_title(&new_market.title)?;

        if new_market.outcome_titles.len() < 2 {
            return Err(BookmakerError::invalid_argument("a pool market needs at least 2 outcomes"));
        }
        for title in &new_market.outcome_titles {
            validate_title(title)?;
        }
        let mut seen = std::collections::HashSet::new();
        for title in &new_market.outcome_titles {
            if !seen.insert(title) {
                return Err(BookmakerError::invalid_argument(format!(
                    "duplicate outcome title: {title}"
                )));
            }
        }

        let creator = self.store.get_user(&new_market.creator)?;
        let creator_book = names::parse_user_name(&creator.name)?.book_id;
        if creator_book != book_id {
            return Err(BookmakerError::invalid_argument("creator must reside in the same book"));
        }

        // The open-market-count check and the insert happen under the same
        // per-market stripe used by every other writer operation. A fresh
        // market has no prior writer, so we stripe on its not-yet-assigned
        // name's book instead — the cap is enforced per book, not per market,
        // so we use a book-scoped stripe key here.
        let _guard = self.locks.lock(&format!("book-cap/{book_id}"));

        if self.store.count_open_markets(book_id) >= MAX_OPEN_MARKETS_PER_BOOK {
            return Err(BookmakerError::invalid_argument(format!(
                "book already has {MAX_OPEN_MARKETS_PER_BOOK} open markets"
            )));
        }

        let market_id = uuid::Uuid::new_v4().to_string();
        let market_name = names::market_name(book_id, &market_id);
        let outcomes = new_market
            .outcome_titles
            .into_iter()
            .map(|title| Outcome {
                name: names::outcome_name(book_id, &market_id, &uuid::Uuid::new_v4().to_string()),
                title,
                centipoints: 0,
            })
            .collect();

        let now = Utc::now();
        let market = Market {
            name: market_name,
            title: new_market.title,
            creator: creator.name,
            status: MarketStatus::Open,
            market_type: MarketType::Pool { outcomes, winner: None },
            created_at: now,
            updated_at: now,
            lock_at: None,
            settled_at: None,
        };
        let created = self.store.create_market(market)?;
        self.persist()?;
        Ok(created)
    }

    pub fn get_market(&self, name: &str) -> Result<Market> {
        if name.is_empty() {
            return Err(BookmakerError::invalid_argument("name is required"));
        }
        names::parse_market_name(name)?;
        self.store.get_market(name)
    }

    pub fn list_markets(
        &self,
        request: ListMarketsRequest,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<ListMarketsPage> {
        names::validate_book_id(&request.book_id)?;
        let greater_than_name = match page_token {
            Some(token) => Some(pagination::decode(token, &request)?),
            None => None,
        };

        let args = ListMarketsArgs {
            book_id: request.book_id.clone(),
            greater_than_name,
            status: request.status,
            limit: page_size,
        };
        let ListMarketsResult { markets, has_more } = self.store.list_markets(&args)?;

        let next_page_token = if has_more {
            let last = markets.last().map(|m| m.name.clone()).unwrap_or_default();
            Some(pagination::encode(&last, &request)?)
        } else {
            None
        };
        Ok(ListMarketsPage { markets, next_page_token })
    }

    pub fn lock_market(&self, name: &str) -> Result<Market> {
        names::parse_market_name(name)?;
        let _guard = self.locks.lock(name);

        let mut market = self.store.get_market(name)?;
        if market.status != MarketStatus::Open {
            return Err(BookmakerError::invalid_argument("market must be OPEN to lock"));
        }
        market.status = MarketStatus::BetsLocked;
        market.updated_at = Utc::now();
        let updated = self.store.update_market(market)?;
        self.persist()?;
        Ok(updated)
    }

    pub fn settle_market(&self, name: &str, winner_outcome_name: &str) -> Result<Market> {
        names::parse_market_name(name)?;
        let _guard = self.locks.lock(name);

        let mut market = self.store.get_market(name)?;
        if market.status != MarketStatus::BetsLocked {
            return Err(BookmakerError::invalid_argument("market must be BETS_LOCKED to settle"));
        }
        if market.market_type.find_outcome(winner_outcome_name).is_none() {
            return Err(BookmakerError::invalid_argument("winner does not name an outcome of this market"));
        }

        let bets = self.store.bets_for_market(name);
        let settled_bets = super::settlement::settle(&market, winner_outcome_name, &bets);

        market.status = MarketStatus::Settled;
        market.settled_at = Some(Utc::now());
        market.updated_at = market.settled_at.unwrap();
        if let MarketType::Pool { winner, .. } = &mut market.market_type {
            *winner = Some(winner_outcome_name.to_string());
        }

        self.apply_settlement(&settled_bets)?;
        let updated = self.store.update_market(market)?;
        self.persist()?;
        Ok(updated)
    }

    pub fn cancel_market(&self, name: &str) -> Result<Market> {
        names::parse_market_name(name)?;
        let _guard = self.locks.lock(name);

        let mut market = self.store.get_market(name)?;
        if market.status == MarketStatus::Settled || market.status == MarketStatus::Canceled {
            return Err(BookmakerError::invalid_argument(
                "market must not be SETTLED or CANCELED to cancel",
            ));
        }

        let bets = self.store.bets_for_market(name);
        let refunded = super::settlement::refund_all(&bets);

        market.status = MarketStatus::Canceled;
        market.settled_at = Some(Utc::now());
        market.updated_at = market.settled_at.unwrap();

        self.apply_settlement(&refunded)?;
        let updated = self.store.update_market(market)?;
        self.persist()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmaker::users::NewUser;

    #[test]
    fn rejects_fewer_than_two_outcomes() {
        let bm = Bookmaker::in_memory();
        let user = bm.create_user("b1", NewUser { username: "alice".into(), centipoints: 1000 }).unwrap();
        let err = bm
            .create_market(
                "b1",
                NewMarket { title: "Who wins?".into(), creator: user.name, outcome_titles: vec!["Yes".into()] },
            )
            .unwrap_err();
        assert!(matches!(err, BookmakerError::InvalidArgument(_)));
    }

    #[test]
    fn rejects_creator_from_another_book() {
        let bm = Bookmaker::in_memory();
        let user = bm.create_user("b2", NewUser { username: "alice".into(), centipoints: 1000 }).unwrap();
        let err = bm
            .create_market(
                "b1",
                NewMarket {
                    title: "Who wins?".into(),
                    creator: user.name,
                    outcome_titles: vec!["Yes".into(), "No".into()],
                },
            )
            .unwrap_err();
        assert!(matches!(err, BookmakerError::InvalidArgument(_)));
    }

    #[test]
    fn enforces_open_market_cap_per_book() {
        let bm = Bookmaker::in_memory();
        let user = bm.create_user("b1", NewUser { username: "alice".into(), centipoints: 1000 }).unwrap();
        for _ in 0..MAX_OPEN_MARKETS_PER_BOOK {
            bm.create_market(
                "b1",
                NewMarket {
                    title: "Who wins?".into(),
                    creator: user.name.clone(),
                    outcome_titles: vec!["Yes".into(), "No".into()],
                },
            )
            .unwrap();
        }
        let err = bm
            .create_market(
                "b1",
                NewMarket {
                    title: "One too many".into(),
                    creator: user.name.clone(),
                    outcome_titles: vec!["Yes".into(), "No".into()],
                },
            )
            .unwrap_err();
        assert!(matches!(err, BookmakerError::InvalidArgument(_)));

        let other_book_user =
            bm.create_user("b2", NewUser { username: "bob".into(), centipoints: 1000 }).unwrap();
        assert!(bm
            .create_market(
                "b2",
                NewMarket {
                    title: "Different book".into(),
                    creator: other_book_user.name,
                    outcome_titles: vec!["Yes".into(), "No".into()],
                },
            )
            .is_ok());
    }

    #[test]
    fn lock_then_settle_happy_path() {
        let bm = Bookmaker::in_memory();
        let a = bm.create_user("b1", NewUser { username: "a".into(), centipoints: 1000 }).unwrap();
        let b = bm.create_user("b1", NewUser { username: "b".into(), centipoints: 1000 }).unwrap();
        let market = bm
            .create_market(
                "b1",
                NewMarket { title: "Who wins?".into(), creator: a.name.clone(), outcome_titles: vec!["Yes".into(), "No".into()] },
            )
            .unwrap();
        let yes = market.market_type.find_outcome("Yes").unwrap().name.clone();
        let no = market.market_type.find_outcome("No").unwrap().name.clone();

        bm.create_bet(
            "b1",
            crate::bookmaker::bets::NewBet { user: a.name.clone(), market: market.name.clone(), outcome: yes, centipoints: 100 },
        )
        .unwrap();
        bm.create_bet(
            "b1",
            crate::bookmaker::bets::NewBet { user: b.name.clone(), market: market.name.clone(), outcome: no, centipoints: 100 },
        )
        .unwrap();

        bm.lock_market(&market.name).unwrap();
        let settled = bm.settle_market(&market.name, market.market_type.find_outcome("Yes").unwrap().name.as_str());
        assert!(settled.is_ok());

        let a_after = bm.get_user(&a.name).unwrap();
        let b_after = bm.get_user(&b.name).unwrap();
        assert_eq!(a_after.centipoints, 1200);
        assert_eq!(b_after.centipoints, 1000);
    }
}
