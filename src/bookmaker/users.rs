use super::Bookmaker;
use crate::error::{BookmakerError, Result};
use crate::models::{validate_username, User};
use crate::names;
use crate::pagination;
use crate::store::{ListUsersArgs, ListUsersResult, OrderBy};
use chrono::Utc;

/// Fields a caller supplies to create a user; server assigns `name` and
/// timestamps.
pub struct NewUser {
    pub username: String,
    pub centipoints: i64,
}

/// Request shape for `ListUsers`, stable across pages so a page token binds
/// against exactly this (pagination fields stripped before encoding).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default)]
pub struct ListUsersRequest {
    pub book_id: String,
    pub explicit_names: Vec<String>,
    pub order_by: String,
}

pub struct ListUsersPage {
    pub users: Vec<User>,
    pub next_page_token: Option<String>,
}

impl Bookmaker {
    pub fn create_user(&self, book_id: &str, new_user: NewUser) -> Result<User> {
        names::validate_book_id(book_id)?;
        validate_username(&new_user.username)?;
        if new_user.centipoints < 0 {
            return Err(BookmakerError::invalid_argument("initial centipoints must be >= 0"));
        }

        let now = Utc::now();
        let user = User {
            name: names::user_name(book_id, &uuid::Uuid::new_v4().to_string()),
            username: new_user.username,
            centipoints: new_user.centipoints,
            unsettled_centipoints: 0,
            created_at: now,
            updated_at: now,
        };
        let created = self.store.create_user(user)?;
        self.persist()?;
        Ok(self.store.hydrate_user(created))
    }

    pub fn get_user(&self, name: &str) -> Result<User> {
        if name.is_empty() {
            return Err(BookmakerError::invalid_argument("name is required"));
        }
        names::parse_user_name(name)?;
        let user = self.store.get_user(name)?;
        Ok(self.store.hydrate_user(user))
    }

    pub fn get_user_by_username(&self, book_id: &str, username: &str) -> Result<User> {
        names::validate_book_id(book_id)?;
        if username.is_empty() {
            return Err(BookmakerError::invalid_argument("username is required"));
        }
        let user = self.store.get_user_by_username(book_id, username)?;
        Ok(self.store.hydrate_user(user))
    }

    pub fn list_users(
        &self,
        request: ListUsersRequest,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<ListUsersPage> {
        let order_by = OrderBy::parse(&request.order_by)?;
        let greater_than_name = match page_token {
            Some(token) => Some(pagination::decode(token, &request)?),
            None => None,
        };

        let args = ListUsersArgs {
            book_id: request.book_id.clone(),
            greater_than_name,
            explicit_names: request.explicit_names.clone(),
            order_by,
            limit: page_size,
        };
        let ListUsersResult { users, has_more } = self.store.list_users(&args)?;

        let next_page_token = if has_more {
            let last = users.last().map(|u| u.name.clone()).unwrap_or_default();
            Some(pagination::encode(&last, &request)?)
        } else {
            None
        };
        Ok(ListUsersPage { users, next_page_token })
    }
}
