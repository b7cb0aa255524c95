//! `bettor_core` — a multi-tenant pool-betting bookmaker.
//!
//! The [`bookmaker`] module is the service: it validates requests, enforces
//! per-book invariants, runs the market lifecycle state machine, and
//! computes pool settlement payouts. Everything else in this crate is
//! ambient plumbing around that core — storage, persistence, pagination,
//! error taxonomy, configuration, logging, and a thin HTTP transport shim.

pub mod api;
pub mod bookmaker;
pub mod config;
pub mod error;
pub mod hydration;
pub mod logging;
pub mod models;
pub mod names;
pub mod pagination;
pub mod snapshot;
pub mod store;
