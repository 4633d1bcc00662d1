//! Matchday - rate-limited, cached gateway for football data
//!
//! This crate fronts the API-Sports football REST API. Every upstream call
//! passes a dual-window (per minute, per day) call budget and a bounded
//! retry loop; results are reshaped into stable JSON documents and kept in
//! an in-memory TTL + LRU cache keyed by normalised query parameters.
//!
//! Callers see one seam, the [`SportsData`] trait, which never fails: every
//! outcome comes back as an [`Envelope`] carrying a correlation id.
//!
//! # Example
//!
//! ```rust,no_run
//! use matchday::{FixturesQuery, Matchday, SportsData};
//!
//! #[tokio::main]
//! async fn main() -> matchday::Result<()> {
//!     let gateway = Matchday::builder()
//!         .api_key("your-api-sports-key")
//!         .build()?;
//!
//!     let envelope = gateway
//!         .fixtures(FixturesQuery::default().league(39).season(2023).team(33))
//!         .await;
//!
//!     match envelope.data {
//!         Some(data) => println!("{} fixtures", data["count"]),
//!         None => eprintln!("{}", envelope.error.unwrap_or_default()),
//!     }
//!     println!("budget left: {:?}", gateway.remaining_budget());
//!
//!     gateway.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
mod convert;
pub mod error;
pub mod gateway;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod upstream;

// Re-export main types at crate root
pub use cache::{CacheCategory, CacheConfig, CacheStats, CacheStore, CacheTtls, ResponseCache};
pub use config::{Config, LogFormat, Secrets};
pub use error::{MatchdayError, Result};
pub use gateway::{Matchday, MatchdayBuilder, SportsGateway};
pub use traits::SportsData;
pub use upstream::{
    ApiResponse, ApiSportsClient, RateLimitConfig, RateLimiter, RemainingBudget, RetryConfig,
    UpstreamConfig, with_retry,
};

// Re-export all types
pub use types::{
    CacheStatus, Envelope, FixturesQuery, HeadToHeadQuery, LeaguesQuery, Operation, QueryParams,
    SportsQuery, StandingsQuery, TeamStatisticsQuery, TeamsQuery, Validate,
};
