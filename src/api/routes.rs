use super::AppState;
use crate::bookmaker::bets::{ListBetsRequest, NewBet};
use crate::bookmaker::markets::{ListMarketsRequest, NewMarket};
use crate::bookmaker::users::{ListUsersRequest, NewUser};
use crate::error::BookmakerError;
use crate::models::{Bet, Market, MarketStatus, User};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/books/:book/users", post(create_user).get(list_users))
        .route("/v1/books/:book/users/:user_id", get(get_user))
        .route("/v1/books/:book/users/by-username/:username", get(get_user_by_username))
        .route("/v1/books/:book/markets", post(create_market).get(list_markets))
        .route("/v1/books/:book/markets/:market_id", get(get_market))
        .route("/v1/books/:book/markets/:market_id/lock", post(lock_market))
        .route("/v1/books/:book/markets/:market_id/settle", post(settle_market))
        .route("/v1/books/:book/markets/:market_id/cancel", post(cancel_market))
        .route("/v1/books/:book/bets", post(create_bet).get(list_bets))
        .route("/v1/books/:book/bets/:bet_id", get(get_bet))
}

#[derive(Deserialize)]
struct CreateUserBody {
    username: String,
    centipoints: i64,
}

async fn create_user(
    State(state): State<AppState>,
    Path(book): Path<String>,
    Json(body): Json<CreateUserBody>,
) -> Result<Json<User>, BookmakerError> {
    let user = state
        .bookmaker
        .create_user(&book, NewUser { username: body.username, centipoints: body.centipoints })?;
    Ok(Json(user))
}

async fn get_user(
    State(state): State<AppState>,
    Path((book, user_id)): Path<(String, String)>,
) -> Result<Json<User>, BookmakerError> {
    let name = crate::names::user_name(&book, &user_id);
    Ok(Json(state.bookmaker.get_user(&name)?))
}

async fn get_user_by_username(
    State(state): State<AppState>,
    Path((book, username)): Path<(String, String)>,
) -> Result<Json<User>, BookmakerError> {
    Ok(Json(state.bookmaker.get_user_by_username(&book, &username)?))
}

#[derive(Deserialize)]
struct ListQuery {
    page_size: Option<usize>,
    page_token: Option<String>,
    #[serde(default)]
    order_by: String,
    #[serde(default)]
    status: Option<MarketStatus>,
    user: Option<String>,
    market: Option<String>,
    #[serde(default)]
    exclude_settled: bool,
}

#[derive(Serialize)]
struct ListUsersResponse {
    users: Vec<User>,
    next_page_token: Option<String>,
}

async fn list_users(
    State(state): State<AppState>,
    Path(book): Path<String>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ListUsersResponse>, BookmakerError> {
    let page_size = state.config.clamp_page_size(q.page_size.unwrap_or(0));
    let page = state.bookmaker.list_users(
        ListUsersRequest { book_id: book, explicit_names: vec![], order_by: q.order_by },
        page_size,
        q.page_token.as_deref(),
    )?;
    Ok(Json(ListUsersResponse { users: page.users, next_page_token: page.next_page_token }))
}

#[derive(Deserialize)]
struct CreateMarketBody {
    title: String,
    creator: String,
    outcome_titles: Vec<String>,
}

async fn create_market(
    State(state): State<AppState>,
    Path(book): Path<String>,
    Json(body): Json<CreateMarketBody>,
) -> Result<Json<Market>, BookmakerError> {
    let market = state.bookmaker.create_market(
        &book,
        NewMarket { title: body.title, creator: body.creator, outcome_titles: body.outcome_titles },
    )?;
    Ok(Json(market))
}

async fn get_market(
    State(state): State<AppState>,
    Path((book, market_id)): Path<(String, String)>,
) -> Result<Json<Market>, BookmakerError> {
    let name = crate::names::market_name(&book, &market_id);
    Ok(Json(state.bookmaker.get_market(&name)?))
}

#[derive(Serialize)]
struct ListMarketsResponse {
    markets: Vec<Market>,
    next_page_token: Option<String>,
}

async fn list_markets(
    State(state): State<AppState>,
    Path(book): Path<String>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ListMarketsResponse>, BookmakerError> {
    let page_size = state.config.clamp_page_size(q.page_size.unwrap_or(0));
    let page = state.bookmaker.list_markets(
        ListMarketsRequest { book_id: book, status: q.status },
        page_size,
        q.page_token.as_deref(),
    )?;
    Ok(Json(ListMarketsResponse { markets: page.markets, next_page_token: page.next_page_token }))
}

async fn lock_market(
    State(state): State<AppState>,
    Path((book, market_id)): Path<(String, String)>,
) -> Result<Json<Market>, BookmakerError> {
    let name = crate::names::market_name(&book, &market_id);
    Ok(Json(state.bookmaker.lock_market(&name)?))
}

#[derive(Deserialize)]
struct SettleMarketBody {
    winner_outcome_name: String,
}

async fn settle_market(
    State(state): State<AppState>,
    Path((book, market_id)): Path<(String, String)>,
    Json(body): Json<SettleMarketBody>,
) -> Result<Json<Market>, BookmakerError> {
    let name = crate::names::market_name(&book, &market_id);
    Ok(Json(state.bookmaker.settle_market(&name, &body.winner_outcome_name)?))
}

async fn cancel_market(
    State(state): State<AppState>,
    Path((book, market_id)): Path<(String, String)>,
) -> Result<Json<Market>, BookmakerError> {
    let name = crate::names::market_name(&book, &market_id);
    Ok(Json(state.bookmaker.cancel_market(&name)?))
}

#[derive(Deserialize)]
struct CreateBetBody {
    user: String,
    market: String,
    outcome: String,
    centipoints: i64,
}

async fn create_bet(
    State(state): State<AppState>,
    Path(book): Path<String>,
    Json(body): Json<CreateBetBody>,
) -> Result<Json<Bet>, BookmakerError> {
    let bet = state.bookmaker.create_bet(
        &book,
        NewBet { user: body.user, market: body.market, outcome: body.outcome, centipoints: body.centipoints },
    )?;
    Ok(Json(bet))
}

async fn get_bet(
    State(state): State<AppState>,
    Path((book, bet_id)): Path<(String, String)>,
) -> Result<Json<Bet>, BookmakerError> {
    let name = crate::names::bet_name(&book, &bet_id);
    Ok(Json(state.bookmaker.get_bet(&name)?))
}

#[derive(Serialize)]
struct ListBetsResponse {
    bets: Vec<Bet>,
    next_page_token: Option<String>,
}

async fn list_bets(
    State(state): State<AppState>,
    Path(book): Path<String>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ListBetsResponse>, BookmakerError> {
    let page_size = state.config.clamp_page_size(q.page_size.unwrap_or(0));
    let page = state.bookmaker.list_bets(
        ListBetsRequest { book_id: book, user: q.user, market: q.market, exclude_settled: q.exclude_settled },
        page_size,
        q.page_token.as_deref(),
    )?;
    Ok(Json(ListBetsResponse { bets: page.bets, next_page_token: page.next_page_token }))
}
