use super::Bookmaker;
use crate::error::{BookmakerError, Result};
use crate::models::{Bet, MarketStatus};
use crate::names;
use crate::pagination;
use crate::store::{ListBetsArgs, ListBetsResult};
use chrono::Utc;

pub struct NewBet {
    pub user: String,
    pub market: String,
    pub outcome: String,
    pub centipoints: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default)]
pub struct ListBetsRequest {
    pub book_id: String,
    pub user: Option<String>,
    pub market: Option<String>,
    pub exclude_settled: bool,
}

pub struct ListBetsPage {
    pub bets: Vec<Bet>,
    pub next_page_token: Option<String>,
}

impl Bookmaker {
    pub fn create_bet(&self, book_id: &str, new_bet: NewBet) -> Result<Bet> {
        names::validate_book_id(book_id)?;
        if new_bet.centipoints <= 0 {
            return Err(BookmakerError::invalid_argument("bet centipoints must be > 0"));
        }

        let _guard = self.locks.lock(&new_bet.market);

        let user = self.store.get_user(&new_bet.user)?;
        let user_book = names::parse_user_name(&user.name)?.book_id;
        if user_book != book_id {
            return Err(BookmakerError::invalid_argument("user does not reside in this book"));
        }

        let mut market = self.store.get_market(&new_bet.market)?;
        let market_book = names::parse_market_name(&market.name)?.book_id;
        if market_book != book_id {
            return Err(BookmakerError::invalid_argument("market does not reside in this book"));
        }

        if market.status != MarketStatus::Open {
            return Err(BookmakerError::invalid_argument("bets may only be placed on an OPEN market"));
        }
        if market.market_type.find_outcome(&new_bet.outcome).is_none() {
            return Err(BookmakerError::invalid_argument("outcome does not belong to this market"));
        }

        // The market-writer stripe above only orders operations on *this*
        // market; a user's balance is shared across every market in their
        // book, so the balance check and debit must themselves be atomic
        // (spec §5/§8 no-overdraft) rather than a separate read-then-write
        // against the users collection.
        let debited_user = self.store.debit_user(&user.name, new_bet.centipoints)?;

        let now = Utc::now();
        let bet = Bet {
            name: names::bet_name(book_id, &uuid::Uuid::new_v4().to_string()),
            user: debited_user.name.clone(),
            market: market.name.clone(),
            outcome: new_bet.outcome.clone(),
            centipoints: new_bet.centipoints,
            settled_centipoints: 0,
            created_at: now,
            updated_at: now,
            settled_at: None,
        };

        market
            .market_type
            .find_outcome_mut(&new_bet.outcome)
            .expect("checked above")
            .centipoints += new_bet.centipoints;
        market.updated_at = now;

        self.store.update_market(market)?;
        let created = self.store.create_bet(bet)?;
        self.persist()?;
        Ok(created)
    }

    pub fn get_bet(&self, name: &str) -> Result<Bet> {
        if name.is_empty() {
            return Err(BookmakerError::invalid_argument("name is required"));
        }
        names::parse_bet_name(name)?;
        self.store.get_bet(name)
    }

    pub fn list_bets(
        &self,
        request: ListBetsRequest,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<ListBetsPage> {
        names::validate_book_id(&request.book_id)?;
        let greater_than_name = match page_token {
            Some(token) => Some(pagination::decode(token, &request)?),
            None => None,
        };

        let args = ListBetsArgs {
            book_id: request.book_id.clone(),
            greater_than_name,
            user: request.user.clone(),
            market: request.market.clone(),
            exclude_settled: request.exclude_settled,
            limit: page_size,
        };
        let ListBetsResult { bets, has_more } = self.store.list_bets(&args)?;

        let next_page_token = if has_more {
            let last = bets.last().map(|b| b.name.clone()).unwrap_or_default();
            Some(pagination::encode(&last, &request)?)
        } else {
            None
        };
        Ok(ListBetsPage { bets, next_page_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmaker::markets::NewMarket;
    use crate::bookmaker::users::NewUser;
    use crate::bookmaker::Bookmaker;

    #[test]
    fn rejects_bet_on_locked_market() {
        let bm = Bookmaker::in_memory();
        let user = bm.create_user("b1", NewUser { username: "a".into(), centipoints: 1000 }).unwrap();
        let market = bm
            .create_market(
                "b1",
                NewMarket { title: "t".into(), creator: user.name.clone(), outcome_titles: vec!["Yes".into(), "No".into()] },
            )
            .unwrap();
        bm.lock_market(&market.name).unwrap();
        let yes = market.market_type.find_outcome("Yes").unwrap().name.clone();
        let err = bm
            .create_bet("b1", NewBet { user: user.name, market: market.name, outcome: yes, centipoints: 10 })
            .unwrap_err();
        assert!(matches!(err, BookmakerError::InvalidArgument(_)));
    }

    #[test]
    fn rejects_cross_book_bet() {
        let bm = Bookmaker::in_memory();
        let user = bm.create_user("book-a", NewUser { username: "a".into(), centipoints: 1000 }).unwrap();
        let creator = bm.create_user("book-b", NewUser { username: "creator".into(), centipoints: 1000 }).unwrap();
        let market = bm
            .create_market(
                "book-b",
                NewMarket { title: "t".into(), creator: creator.name, outcome_titles: vec!["Yes".into(), "No".into()] },
            )
            .unwrap();
        let yes = market.market_type.find_outcome("Yes").unwrap().name.clone();
        let err = bm
            .create_bet("book-a", NewBet { user: user.name.clone(), market: market.name, outcome: yes, centipoints: 10 })
            .unwrap_err();
        assert!(matches!(err, BookmakerError::InvalidArgument(_)));
        let after = bm.get_user(&user.name).unwrap();
        assert_eq!(after.centipoints, 1000);
    }

    #[test]
    fn rejects_insufficient_balance() {
        let bm = Bookmaker::in_memory();
        let user = bm.create_user("b1", NewUser { username: "a".into(), centipoints: 50 }).unwrap();
        let market = bm
            .create_market(
                "b1",
                NewMarket { title: "t".into(), creator: user.name.clone(), outcome_titles: vec!["Yes".into(), "No".into()] },
            )
            .unwrap();
        let yes = market.market_type.find_outcome("Yes").unwrap().name.clone();
        let err = bm
            .create_bet("b1", NewBet { user: user.name, market: market.name, outcome: yes, centipoints: 100 })
            .unwrap_err();
        assert!(matches!(err, BookmakerError::InvalidArgument(_)));
    }

    #[test]
    fn debits_user_and_credits_outcome() {
        let bm = Bookmaker::in_memory();
        let user = bm.create_user("b1", NewUser { username: "a".into(), centipoints: 1000 }).unwrap();
        let market = bm
            .create_market(
                "b1",
                NewMarket { title: "t".into(), creator: user.name.clone(), outcome_titles: vec!["Yes".into(), "No".into()] },
            )
            .unwrap();
        let yes = market.market_type.find_outcome("Yes").unwrap().name.clone();
        bm.create_bet("b1", NewBet { user: user.name.clone(), market: market.name.clone(), outcome: yes, centipoints: 100 })
            .unwrap();

        let after_user = bm.get_user(&user.name).unwrap();
        assert_eq!(after_user.centipoints, 900);
        assert_eq!(after_user.unsettled_centipoints, 100);

        let after_market = bm.get_market(&market.name).unwrap();
        assert_eq!(after_market.market_type.find_outcome("Yes").unwrap().centipoints, 100);
    }
}
