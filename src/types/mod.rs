//! Public types for the matchday API.

mod envelope;
mod params;
mod query;
mod validation;

pub use envelope::{CacheStatus, Envelope};
pub use params::QueryParams;
pub use query::{
    FixturesQuery, HeadToHeadQuery, LeaguesQuery, Operation, SportsQuery, StandingsQuery,
    TeamStatisticsQuery, TeamsQuery,
};
pub use validation::Validate;
