//! Gateway implementation

mod builder;
mod service;

pub use builder::{Matchday, MatchdayBuilder};
pub use service::SportsGateway;
