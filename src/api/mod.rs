//! Thin JSON transport shim over the bookmaker core.
//!
//! Request/response framing is explicitly out of scope for the core (spec
//! §1); this module is the external collaborator that exposes it as HTTP.
//! No bookmaker semantics live here — every handler just deserializes,
//! calls straight into `Bookmaker`, and serializes the result.

mod routes;

use crate::bookmaker::Bookmaker;
use crate::config::Config;
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub bookmaker: Arc<Bookmaker>,
    pub config: Arc<Config>,
}

pub fn router(state: AppState) -> Router {
    routes::router()
        .layer(middleware::from_fn(crate::logging::request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
