//! Typed queries for each supported operation.

use serde::{Deserialize, Serialize};

use super::params::QueryParams;

/// Operation categories exposed by the gateway.
///
/// The tag doubles as the cache key namespace, so distinct operations can
/// never collide on the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Teams,
    Fixtures,
    TeamStatistics,
    Standings,
    HeadToHead,
    FixtureStatistics,
    FixtureEvents,
    FixtureLineups,
    Predictions,
    Leagues,
    Seasons,
}

impl Operation {
    /// Stable namespace tag.
    pub fn tag(self) -> &'static str {
        match self {
            Operation::Teams => "teams",
            Operation::Fixtures => "fixtures",
            Operation::TeamStatistics => "statistics",
            Operation::Standings => "standings",
            Operation::HeadToHead => "head2head",
            Operation::FixtureStatistics => "fixture_stats",
            Operation::FixtureEvents => "fixture_events",
            Operation::FixtureLineups => "fixture_lineups",
            Operation::Predictions => "predictions",
            Operation::Leagues => "leagues",
            Operation::Seasons => "seasons",
        }
    }

    /// Upstream endpoint path.
    pub fn endpoint(self) -> &'static str {
        match self {
            Operation::Teams => "/teams",
            Operation::Fixtures => "/fixtures",
            Operation::TeamStatistics => "/teams/statistics",
            Operation::Standings => "/standings",
            Operation::HeadToHead => "/fixtures/headtohead",
            Operation::FixtureStatistics => "/fixtures/statistics",
            Operation::FixtureEvents => "/fixtures/events",
            Operation::FixtureLineups => "/fixtures/lineups",
            Operation::Predictions => "/predictions",
            Operation::Leagues => "/leagues",
            Operation::Seasons => "/leagues/seasons",
        }
    }

    /// Human description used in error envelopes ("Failed to ...").
    pub fn description(self) -> &'static str {
        match self {
            Operation::Teams => "search teams",
            Operation::Fixtures => "retrieve fixtures",
            Operation::TeamStatistics => "retrieve team statistics",
            Operation::Standings => "retrieve standings",
            Operation::HeadToHead => "retrieve head-to-head fixtures",
            Operation::FixtureStatistics => "retrieve fixture statistics",
            Operation::FixtureEvents => "retrieve fixture events",
            Operation::FixtureLineups => "retrieve fixture lineups",
            Operation::Predictions => "retrieve predictions",
            Operation::Leagues => "retrieve leagues",
            Operation::Seasons => "retrieve seasons",
        }
    }
}

/// Generates chainable `Option` setters for query structs.
macro_rules! option_setters {
    ($ty:ident { $($field:ident : $arg:ty),* $(,)? }) => {
        impl $ty {
            $(
                pub fn $field(mut self, value: $arg) -> Self {
                    self.$field = Some(value.into());
                    self
                }
            )*
        }
    };
}

/// Filters for `/teams`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamsQuery {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub league: Option<u32>,
    pub season: Option<u32>,
    pub country: Option<String>,
    /// Three-letter team code.
    pub code: Option<String>,
    pub venue: Option<u32>,
    /// Free-text search, at least three characters.
    pub search: Option<String>,
}

option_setters!(TeamsQuery {
    id: u32,
    name: impl Into<String>,
    league: u32,
    season: u32,
    country: impl Into<String>,
    code: impl Into<String>,
    venue: u32,
    search: impl Into<String>,
});

impl TeamsQuery {
    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("id", self.id)
            .with("name", self.name.as_deref())
            .with("league", self.league)
            .with("season", self.season)
            .with("country", self.country.as_deref())
            .with("code", self.code.as_deref())
            .with("venue", self.venue)
            .with("search", self.search.as_deref())
    }
}

/// Filters for `/fixtures`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixturesQuery {
    pub id: Option<u32>,
    /// Up to 20 fixture ids joined by `-`.
    pub ids: Option<String>,
    /// `"all"` or league ids joined by `-`. Live queries are never cached.
    pub live: Option<String>,
    pub date: Option<String>,
    pub league: Option<u32>,
    pub season: Option<u32>,
    pub team: Option<u32>,
    pub last: Option<u32>,
    pub next: Option<u32>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub round: Option<String>,
    pub status: Option<String>,
    pub venue: Option<u32>,
    pub timezone: Option<String>,
}

option_setters!(FixturesQuery {
    id: u32,
    ids: impl Into<String>,
    live: impl Into<String>,
    date: impl Into<String>,
    league: u32,
    season: u32,
    team: u32,
    last: u32,
    next: u32,
    from: impl Into<String>,
    to: impl Into<String>,
    round: impl Into<String>,
    status: impl Into<String>,
    venue: u32,
    timezone: impl Into<String>,
});

impl FixturesQuery {
    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("id", self.id)
            .with("ids", self.ids.as_deref())
            .with("live", self.live.as_deref())
            .with("date", self.date.as_deref())
            .with("league", self.league)
            .with("season", self.season)
            .with("team", self.team)
            .with("last", self.last)
            .with("next", self.next)
            .with("from", self.from.as_deref())
            .with("to", self.to.as_deref())
            .with("round", self.round.as_deref())
            .with("status", self.status.as_deref())
            .with("venue", self.venue)
            .with("timezone", self.timezone.as_deref())
    }

    /// Whether this query asks for in-play fixtures.
    pub fn is_live(&self) -> bool {
        self.live.as_deref().is_some_and(|l| !l.trim().is_empty())
    }
}

/// Parameters for `/teams/statistics`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStatisticsQuery {
    pub league: u32,
    pub season: u32,
    pub team: u32,
    /// Statistics up to this date (`YYYY-MM-DD`).
    pub date: Option<String>,
}

option_setters!(TeamStatisticsQuery { date: impl Into<String> });

impl TeamStatisticsQuery {
    pub fn new(league: u32, season: u32, team: u32) -> Self {
        Self {
            league,
            season,
            team,
            date: None,
        }
    }

    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("league", Some(self.league))
            .with("season", Some(self.season))
            .with("team", Some(self.team))
            .with("date", self.date.as_deref())
    }
}

/// Parameters for `/standings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsQuery {
    pub league: u32,
    pub season: u32,
    pub team: Option<u32>,
}

option_setters!(StandingsQuery { team: u32 });

impl StandingsQuery {
    pub fn new(league: u32, season: u32) -> Self {
        Self {
            league,
            season,
            team: None,
        }
    }

    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("league", Some(self.league))
            .with("season", Some(self.season))
            .with("team", self.team)
    }
}

/// Parameters for `/fixtures/headtohead`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHeadQuery {
    /// Two team ids joined by `-`, e.g. `"33-34"`.
    pub h2h: String,
    pub date: Option<String>,
    pub league: Option<u32>,
    pub season: Option<u32>,
    pub last: Option<u32>,
    pub next: Option<u32>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: Option<String>,
    pub venue: Option<u32>,
    pub timezone: Option<String>,
}

option_setters!(HeadToHeadQuery {
    date: impl Into<String>,
    league: u32,
    season: u32,
    last: u32,
    next: u32,
    from: impl Into<String>,
    to: impl Into<String>,
    status: impl Into<String>,
    venue: u32,
    timezone: impl Into<String>,
});

impl HeadToHeadQuery {
    pub fn new(h2h: impl Into<String>) -> Self {
        Self {
            h2h: h2h.into(),
            ..Self::default()
        }
    }

    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("h2h", Some(self.h2h.as_str()))
            .with("date", self.date.as_deref())
            .with("league", self.league)
            .with("season", self.season)
            .with("last", self.last)
            .with("next", self.next)
            .with("from", self.from.as_deref())
            .with("to", self.to.as_deref())
            .with("status", self.status.as_deref())
            .with("venue", self.venue)
            .with("timezone", self.timezone.as_deref())
    }

    /// The two team ids, when `h2h` is well formed.
    pub fn team_ids(&self) -> Option<(u32, u32)> {
        let (first, second) = self.h2h.trim().split_once('-')?;
        Some((first.trim().parse().ok()?, second.trim().parse().ok()?))
    }
}

/// Filters for `/leagues`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaguesQuery {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub country: Option<String>,
    /// Country code, e.g. `FR`, `GB-ENG`.
    pub code: Option<String>,
    pub season: Option<u32>,
    pub team: Option<u32>,
    /// `"league"` or `"cup"`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// `"true"` or `"false"`.
    pub current: Option<String>,
    pub search: Option<String>,
    pub last: Option<u32>,
}

option_setters!(LeaguesQuery {
    id: u32,
    name: impl Into<String>,
    country: impl Into<String>,
    code: impl Into<String>,
    season: u32,
    team: u32,
    kind: impl Into<String>,
    current: impl Into<String>,
    search: impl Into<String>,
    last: u32,
});

impl LeaguesQuery {
    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("id", self.id)
            .with("name", self.name.as_deref())
            .with("country", self.country.as_deref())
            .with("code", self.code.as_deref())
            .with("season", self.season)
            .with("team", self.team)
            .with("type", self.kind.as_deref())
            .with("current", self.current.as_deref())
            .with("search", self.search.as_deref())
            .with("last", self.last)
    }
}

/// One resolved request from the tool layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "params", rename_all = "snake_case")]
pub enum SportsQuery {
    Teams(TeamsQuery),
    Fixtures(FixturesQuery),
    TeamStatistics(TeamStatisticsQuery),
    Standings(StandingsQuery),
    HeadToHead(HeadToHeadQuery),
    FixtureStatistics { fixture: u32 },
    FixtureEvents { fixture: u32 },
    FixtureLineups { fixture: u32 },
    Predictions { fixture: u32 },
    Leagues(LeaguesQuery),
    Seasons,
}

impl SportsQuery {
    pub fn operation(&self) -> Operation {
        match self {
            SportsQuery::Teams(_) => Operation::Teams,
            SportsQuery::Fixtures(_) => Operation::Fixtures,
            SportsQuery::TeamStatistics(_) => Operation::TeamStatistics,
            SportsQuery::Standings(_) => Operation::Standings,
            SportsQuery::HeadToHead(_) => Operation::HeadToHead,
            SportsQuery::FixtureStatistics { .. } => Operation::FixtureStatistics,
            SportsQuery::FixtureEvents { .. } => Operation::FixtureEvents,
            SportsQuery::FixtureLineups { .. } => Operation::FixtureLineups,
            SportsQuery::Predictions { .. } => Operation::Predictions,
            SportsQuery::Leagues(_) => Operation::Leagues,
            SportsQuery::Seasons => Operation::Seasons,
        }
    }

    /// Normalised parameters sent upstream and hashed into the cache key.
    pub fn to_params(&self) -> QueryParams {
        match self {
            SportsQuery::Teams(q) => q.to_params(),
            SportsQuery::Fixtures(q) => q.to_params(),
            SportsQuery::TeamStatistics(q) => q.to_params(),
            SportsQuery::Standings(q) => q.to_params(),
            SportsQuery::HeadToHead(q) => q.to_params(),
            SportsQuery::FixtureStatistics { fixture }
            | SportsQuery::FixtureEvents { fixture }
            | SportsQuery::FixtureLineups { fixture }
            | SportsQuery::Predictions { fixture } => {
                QueryParams::new().with("fixture", Some(*fixture))
            }
            SportsQuery::Leagues(q) => q.to_params(),
            SportsQuery::Seasons => QueryParams::new(),
        }
    }

    /// Live fixture queries skip the cache on both read and write.
    pub fn bypasses_cache(&self) -> bool {
        matches!(self, SportsQuery::Fixtures(q) if q.is_live())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_fill_options() {
        let q = FixturesQuery::default().league(39).season(2023).live("all");
        assert_eq!(q.league, Some(39));
        assert_eq!(q.season, Some(2023));
        assert!(q.is_live());
    }

    #[test]
    fn from_and_to_use_upstream_names() {
        let q = FixturesQuery::default().from("2024-01-01").to("2024-01-31");
        let params = q.to_params();
        assert_eq!(params.get("from"), Some("2024-01-01"));
        assert_eq!(params.get("to"), Some("2024-01-31"));
    }

    #[test]
    fn leagues_kind_maps_to_type() {
        let params = LeaguesQuery::default().kind("cup").to_params();
        assert_eq!(params.get("type"), Some("cup"));
    }

    #[test]
    fn empty_live_is_not_live() {
        let q = FixturesQuery::default().live("");
        assert!(!q.is_live());
        assert!(!SportsQuery::Fixtures(q).bypasses_cache());
    }

    #[test]
    fn head_to_head_team_ids() {
        assert_eq!(HeadToHeadQuery::new("33-34").team_ids(), Some((33, 34)));
        assert_eq!(HeadToHeadQuery::new("33").team_ids(), None);
        assert_eq!(HeadToHeadQuery::new("a-b").team_ids(), None);
    }

    #[test]
    fn fixture_operations_share_param_shape() {
        let stats = SportsQuery::FixtureStatistics { fixture: 7 }.to_params();
        let events = SportsQuery::FixtureEvents { fixture: 7 }.to_params();
        assert_eq!(stats, events);
        assert_eq!(stats.get("fixture"), Some("7"));
    }

    #[test]
    fn seasons_has_no_params() {
        assert!(SportsQuery::Seasons.to_params().is_empty());
        assert_eq!(SportsQuery::Seasons.operation().endpoint(), "/leagues/seasons");
    }
}
