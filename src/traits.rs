//! Core SportsData trait

use async_trait::async_trait;

use crate::cache::CacheStats;
use crate::types::{
    Envelope, FixturesQuery, HeadToHeadQuery, LeaguesQuery, SportsQuery, StandingsQuery,
    TeamStatisticsQuery, TeamsQuery,
};
use crate::upstream::RemainingBudget;

/// The seam between a tool/transport layer and the gateway core.
///
/// Implementations never fail: every error, local or upstream, comes back
/// as an error [`Envelope`] carrying the request's correlation id.
#[async_trait]
pub trait SportsData: Send + Sync {
    /// Run one resolved query.
    async fn execute(&self, query: &SportsQuery) -> Envelope;

    /// Remaining upstream call budget.
    fn remaining_budget(&self) -> RemainingBudget;

    /// Cache counters, or `None` when caching is disabled.
    fn cache_stats(&self) -> Option<CacheStats>;

    // ===== Per-operation helpers =====

    async fn teams(&self, query: TeamsQuery) -> Envelope {
        self.execute(&SportsQuery::Teams(query)).await
    }

    async fn fixtures(&self, query: FixturesQuery) -> Envelope {
        self.execute(&SportsQuery::Fixtures(query)).await
    }

    async fn team_statistics(&self, query: TeamStatisticsQuery) -> Envelope {
        self.execute(&SportsQuery::TeamStatistics(query)).await
    }

    async fn standings(&self, query: StandingsQuery) -> Envelope {
        self.execute(&SportsQuery::Standings(query)).await
    }

    async fn head_to_head(&self, query: HeadToHeadQuery) -> Envelope {
        self.execute(&SportsQuery::HeadToHead(query)).await
    }

    async fn fixture_statistics(&self, fixture: u32) -> Envelope {
        self.execute(&SportsQuery::FixtureStatistics { fixture }).await
    }

    async fn fixture_events(&self, fixture: u32) -> Envelope {
        self.execute(&SportsQuery::FixtureEvents { fixture }).await
    }

    async fn fixture_lineups(&self, fixture: u32) -> Envelope {
        self.execute(&SportsQuery::FixtureLineups { fixture }).await
    }

    async fn predictions(&self, fixture: u32) -> Envelope {
        self.execute(&SportsQuery::Predictions { fixture }).await
    }

    async fn leagues(&self, query: LeaguesQuery) -> Envelope {
        self.execute(&SportsQuery::Leagues(query)).await
    }

    async fn seasons(&self) -> Envelope {
        self.execute(&SportsQuery::Seasons).await
    }
}
