//! Resource name encoding.
//!
//! Every entity in the system is addressed by a canonical resource name of the
//! form `books/{book_id}/users/{user_id}`, `books/{book_id}/markets/{market_id}`,
//! `books/{book_id}/markets/{market_id}/outcomes/{outcome_id}`, or
//! `books/{book_id}/bets/{bet_id}`. A name is the single source of truth for an
//! entity's book membership — callers never get to assert a book id that
//! disagrees with the name.

use crate::error::BookmakerError;

const BOOKS: &str = "books";
const USERS: &str = "users";
const MARKETS: &str = "markets";
const OUTCOMES: &str = "outcomes";
const BETS: &str = "bets";

const MAX_BOOK_ID_LEN: usize = 36;

/// Validates a bare book id (not a full resource name).
pub fn validate_book_id(book_id: &str) -> Result<(), BookmakerError> {
    if book_id.is_empty() {
        return Err(BookmakerError::invalid_argument("book is required"));
    }
    if book_id.len() > MAX_BOOK_ID_LEN {
        return Err(BookmakerError::invalid_argument(format!(
            "book id must be at most {MAX_BOOK_ID_LEN} characters"
        )));
    }
    if book_id.contains('/') {
        return Err(BookmakerError::invalid_argument("book id must not contain '/'"));
    }
    Ok(())
}

fn validate_segment(kind: &str, id: &str) -> Result<(), BookmakerError> {
    if id.is_empty() {
        return Err(BookmakerError::invalid_argument(format!("{kind} id must not be empty")));
    }
    if id.contains('/') {
        return Err(BookmakerError::invalid_argument(format!("{kind} id must not contain '/'")));
    }
    Ok(())
}

pub fn user_name(book_id: &str, user_id: &str) -> String {
    format!("{BOOKS}/{book_id}/{USERS}/{user_id}")
}

pub fn market_name(book_id: &str, market_id: &str) -> String {
    format!("{BOOKS}/{book_id}/{MARKETS}/{market_id}")
}

pub fn outcome_name(book_id: &str, market_id: &str, outcome_id: &str) -> String {
    format!("{BOOKS}/{book_id}/{MARKETS}/{market_id}/{OUTCOMES}/{outcome_id}")
}

pub fn bet_name(book_id: &str, bet_id: &str) -> String {
    format!("{BOOKS}/{book_id}/{BETS}/{bet_id}")
}

/// Splits a `/`-delimited resource name into its segments, rejecting empty segments.
fn segments(name: &str) -> Result<Vec<&str>, BookmakerError> {
    if name.is_empty() {
        return Err(BookmakerError::invalid_argument("name is required"));
    }
    let parts: Vec<&str> = name.split('/').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(BookmakerError::invalid_argument(format!("malformed resource name: {name}")));
    }
    Ok(parts)
}

/// The parsed components of a `books/{book_id}/users/{user_id}` name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName {
    pub book_id: String,
    pub user_id: String,
}

pub fn parse_user_name(name: &str) -> Result<UserName, BookmakerError> {
    let parts = segments(name)?;
    match parts.as_slice() {
        [BOOKS, book_id, USERS, user_id] => {
            validate_book_id(book_id)?;
            validate_segment("user", user_id)?;
            Ok(UserName {
                book_id: book_id.to_string(),
                user_id: user_id.to_string(),
            })
        }
        _ => Err(BookmakerError::invalid_argument(format!("not a user name: {name}"))),
    }
}

/// The parsed components of a `books/{book_id}/markets/{market_id}` name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketName {
    pub book_id: String,
    pub market_id: String,
}

pub fn parse_market_name(name: &str) -> Result<MarketName, BookmakerError> {
    let parts = segments(name)?;
    match parts.as_slice() {
        [BOOKS, book_id, MARKETS, market_id] => {
            validate_book_id(book_id)?;
            validate_segment("market", market_id)?;
            Ok(MarketName {
                book_id: book_id.to_string(),
                market_id: market_id.to_string(),
            })
        }
        _ => Err(BookmakerError::invalid_argument(format!("not a market name: {name}"))),
    }
}

/// The parsed components of a `.../markets/{market_id}/outcomes/{outcome_id}` name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeName {
    pub book_id: String,
    pub market_id: String,
    pub outcome_id: String,
}

pub fn parse_outcome_name(name: &str) -> Result<OutcomeName, BookmakerError> {
    let parts = segments(name)?;
    match parts.as_slice() {
        [BOOKS, book_id, MARKETS, market_id, OUTCOMES, outcome_id] => {
            validate_book_id(book_id)?;
            validate_segment("market", market_id)?;
            validate_segment("outcome", outcome_id)?;
            Ok(OutcomeName {
                book_id: book_id.to_string(),
                market_id: market_id.to_string(),
                outcome_id: outcome_id.to_string(),
            })
        }
        _ => Err(BookmakerError::invalid_argument(format!("not an outcome name: {name}"))),
    }
}

/// The parsed components of a `books/{book_id}/bets/{bet_id}` name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetName {
    pub book_id: String,
    pub bet_id: String,
}

pub fn parse_bet_name(name: &str) -> Result<BetName, BookmakerError> {
    let parts = segments(name)?;
    match parts.as_slice() {
        [BOOKS, book_id, BETS, bet_id] => {
            validate_book_id(book_id)?;
            validate_segment("bet", bet_id)?;
            Ok(BetName {
                book_id: book_id.to_string(),
                bet_id: bet_id.to_string(),
            })
        }
        _ => Err(BookmakerError::invalid_argument(format!("not a bet name: {name}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_and_parses_user_name() {
        let name = user_name("guild:1", "abc-123");
        assert_eq!(name, "books/guild:1/users/abc-123");
        let parsed = parse_user_name(&name).unwrap();
        assert_eq!(parsed.book_id, "guild:1");
        assert_eq!(parsed.user_id, "abc-123");
    }

    #[test]
    fn builds_and_parses_outcome_name() {
        let name = outcome_name("b1", "m1", "o1");
        assert_eq!(name, "books/b1/markets/m1/outcomes/o1");
        let parsed = parse_outcome_name(&name).unwrap();
        assert_eq!(parsed.book_id, "b1");
        assert_eq!(parsed.market_id, "m1");
        assert_eq!(parsed.outcome_id, "o1");
    }

    #[test]
    fn rejects_malformed_names() {
        assert!(parse_user_name("").is_err());
        assert!(parse_user_name("users/abc").is_err());
        assert!(parse_user_name("books/b1/users/").is_err());
        assert!(parse_market_name("books/b1/users/u1").is_err());
    }

    #[test]
    fn rejects_oversized_or_slashed_book_id() {
        let long_id = "x".repeat(37);
        assert!(validate_book_id(&long_id).is_err());
        assert!(validate_book_id("has/slash").is_err());
        assert!(validate_book_id("").is_err());
        assert!(validate_book_id("ok-book_1").is_ok());
    }
}
