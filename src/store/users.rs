use super::Store;
use crate::error::BookmakerError;
use crate::hydration;
use crate::models::User;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Ordering for `ListUsers`. `TotalCentipoints` does not support cursor
/// pagination (spec §4.2) — it always returns the top `limit` in one shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    #[default]
    Name,
    TotalCentipoints,
}

impl OrderBy {
    pub fn parse(s: &str) -> Result<Self, BookmakerError> {
        match s {
            "" | "name" => Ok(Self::Name),
            "total_centipoints" => Ok(Self::TotalCentipoints),
            other => Err(BookmakerError::invalid_argument(format!("unknown order_by: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListUsersArgs {
    pub book_id: String,
    pub greater_than_name: Option<String>,
    pub explicit_names: Vec<String>,
    pub order_by: OrderBy,
    pub limit: usize,
}

pub struct ListUsersResult {
    pub users: Vec<User>,
    pub has_more: bool,
}

impl Store {
    pub fn create_user(&self, user: User) -> Result<User, BookmakerError> {
        let mut users = self.users.write();
        if users.iter().any(|u| u.name == user.name) {
            return Err(BookmakerError::invalid_argument("user with name already exists"));
        }
        let book_id = crate::names::parse_user_name(&user.name)?.book_id;
        if users.iter().any(|u| {
            crate::names::parse_user_name(&u.name)
                .map(|n| n.book_id == book_id)
                .unwrap_or(false)
                && u.username == user.username
        }) {
            return Err(BookmakerError::invalid_argument(format!(
                "username already exists in book: {}",
                user.username
            )));
        }
        users.push(user.clone());
        Ok(user)
    }

    pub fn get_user(&self, name: &str) -> Result<User, BookmakerError> {
        let users = self.users.read();
        users
            .iter()
            .find(|u| u.name == name)
            .cloned()
            .ok_or_else(|| BookmakerError::not_found(format!("user not found: {name}")))
    }

    pub fn get_user_by_username(&self, book_id: &str, username: &str) -> Result<User, BookmakerError> {
        let users = self.users.read();
        users
            .iter()
            .find(|u| {
                u.username == username
                    && crate::names::parse_user_name(&u.name)
                        .map(|n| n.book_id == book_id)
                        .unwrap_or(false)
            })
            .cloned()
            .ok_or_else(|| BookmakerError::not_found(format!("user not found: {book_id}/{username}")))
    }

    /// Checks and debits a user's balance as one atomic read-modify-write
    /// under a single acquisition of the users write lock. A user's balance
    /// is shared across every market in their book, while the market-writer
    /// lock is striped per market — so the balance check and the mutation
    /// must be atomic here, not merely guarded by the caller's market stripe,
    /// or two concurrent bets on different markets can both observe
    /// sufficient balance and both debit (spec §5/§8 no-overdraft).
    pub fn debit_user(&self, name: &str, amount: i64) -> Result<User, BookmakerError> {
        let mut users = self.users.write();
        let slot = users
            .iter_mut()
            .find(|u| u.name == name)
            .ok_or_else(|| BookmakerError::not_found(format!("user not found: {name}")))?;
        if slot.centipoints < amount {
            return Err(BookmakerError::invalid_argument("insufficient balance"));
        }
        slot.centipoints -= amount;
        slot.updated_at = Utc::now();
        Ok(slot.clone())
    }

    /// Credits a user's balance as one atomic read-modify-write under a
    /// single acquisition of the users write lock, for the same reason
    /// `debit_user` is atomic: settlement/cancellation of two markets can
    /// credit the same user concurrently.
    pub fn credit_user(&self, name: &str, amount: i64) -> Result<User, BookmakerError> {
        let mut users = self.users.write();
        let slot = users
            .iter_mut()
            .find(|u| u.name == name)
            .ok_or_else(|| BookmakerError::not_found(format!("user not found: {name}")))?;
        slot.centipoints += amount;
        slot.updated_at = Utc::now();
        Ok(slot.clone())
    }

    /// Hydrates `unsettled_centipoints` on a single user from the bets collection.
    pub fn hydrate_user(&self, mut user: User) -> User {
        let bets = self.bets.read();
        user.unsettled_centipoints = hydration::unsettled_centipoints(&bets, &user.name);
        user
    }

    pub fn list_users(&self, args: &ListUsersArgs) -> Result<ListUsersResult, BookmakerError> {
        crate::names::validate_book_id(&args.book_id)?;

        match args.order_by {
            OrderBy::Name => {
                if args.explicit_names.is_empty() {
                    self.list_users_by_name(args)
                } else {
                    self.list_users_by_explicit_names(args)
                }
            }
            OrderBy::TotalCentipoints => {
                if args.greater_than_name.is_some() {
                    return Err(BookmakerError::invalid_argument(
                        "cursor pagination is not supported for order_by=total_centipoints",
                    ));
                }
                self.list_users_by_total_centipoints(args)
            }
        }
    }

    fn list_users_by_name(&self, args: &ListUsersArgs) -> Result<ListUsersResult, BookmakerError> {
        let users = self.users.read();
        let mut matching: Vec<&User> = users
            .iter()
            .filter(|u| {
                crate::names::parse_user_name(&u.name)
                    .map(|n| n.book_id == args.book_id)
                    .unwrap_or(false)
            })
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));

        let start = match &args.greater_than_name {
            Some(cursor) => matching.partition_point(|u| u.name.as_str() <= cursor.as_str()),
            None => 0,
        };

        let page: Vec<User> = matching[start..]
            .iter()
            .take(args.limit + 1)
            .map(|u| self.hydrate_user((*u).clone()))
            .collect();
        let has_more = page.len() > args.limit;
        let mut page = page;
        page.truncate(args.limit);
        Ok(ListUsersResult { users: page, has_more })
    }

    fn list_users_by_explicit_names(&self, args: &ListUsersArgs) -> Result<ListUsersResult, BookmakerError> {
        let users = self.users.read();
        let mut matching: Vec<User> = args
            .explicit_names
            .iter()
            .filter_map(|n| users.iter().find(|u| &u.name == n).cloned())
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        let hydrated: Vec<User> = matching.into_iter().map(|u| self.hydrate_user(u)).collect();
        Ok(ListUsersResult { users: hydrated, has_more: false })
    }

    fn list_users_by_total_centipoints(&self, args: &ListUsersArgs) -> Result<ListUsersResult, BookmakerError> {
        let users = self.users.read();
        let mut matching: Vec<User> = users
            .iter()
            .filter(|u| {
                crate::names::parse_user_name(&u.name)
                    .map(|n| n.book_id == args.book_id)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        drop(users);

        let mut hydrated: Vec<User> = matching.drain(..).map(|u| self.hydrate_user(u)).collect();
        hydrated.sort_by(|a, b| {
            let total_a = a.centipoints + a.unsettled_centipoints;
            let total_b = b.centipoints + b.unsettled_centipoints;
            total_b.cmp(&total_a).then_with(|| a.name.cmp(&b.name))
        });
        hydrated.truncate(args.limit);
        Ok(ListUsersResult { users: hydrated, has_more: false })
    }
}
