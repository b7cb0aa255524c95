//! Environment- and CLI-driven configuration.
//!
//! Mirrors the teacher's `models::Config::from_env` (dotenv + `env::var` with
//! typed fallbacks) layered under a `clap::Parser` so every setting is also
//! overridable on the command line, the way the teacher's `bin/` tools do.

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "bettord", about = "Multi-tenant pool-betting bookmaker service")]
pub struct Config {
    /// Address the HTTP transport binds to.
    #[arg(long, env = "BETTOR_BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: String,

    /// Path to the snapshot file backing the store.
    #[arg(long, env = "BETTOR_SNAPSHOT_PATH", default_value = "bettor.snapshot")]
    pub snapshot_path: String,

    /// Default page size for list calls that do not specify one.
    #[arg(long, env = "BETTOR_DEFAULT_PAGE_SIZE", default_value_t = crate::models::DEFAULT_PAGE_SIZE)]
    pub default_page_size: usize,

    /// Upper bound on page size a caller may request.
    #[arg(long, env = "BETTOR_MAX_PAGE_SIZE", default_value_t = crate::models::MAX_PAGE_SIZE)]
    pub max_page_size: usize,

    /// `tracing-subscriber` env-filter directive, e.g. "bettor_core=debug".
    #[arg(long, env = "BETTOR_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Config {
    /// Loads a `.env` file if present, then parses from environment + argv,
    /// the same order the teacher's bootstrap follows.
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::parse()
    }

    pub fn clamp_page_size(&self, requested: usize) -> usize {
        if requested == 0 {
            self.default_page_size
        } else {
            requested.min(self.max_page_size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_max_page_size() {
        let cfg = Config {
            bind_addr: "0.0.0.0:8080".into(),
            snapshot_path: "x".into(),
            default_page_size: 10,
            max_page_size: 100,
            log_filter: "info".into(),
        };
        assert_eq!(cfg.clamp_page_size(0), 10);
        assert_eq!(cfg.clamp_page_size(500), 100);
        assert_eq!(cfg.clamp_page_size(20), 20);
    }
}
