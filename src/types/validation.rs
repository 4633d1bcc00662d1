//! Local parameter validation.
//!
//! Runs before the cache and before any upstream call: a rejected query
//! costs nothing from the rate limit budget.

use chrono::NaiveDate;

use super::query::{
    FixturesQuery, HeadToHeadQuery, LeaguesQuery, SportsQuery, TeamStatisticsQuery, TeamsQuery,
};
use crate::{MatchdayError, Result};

const MIN_SEARCH_LEN: usize = 3;
const MAX_LAST_NEXT: u32 = 99;
const MAX_FIXTURE_IDS: usize = 20;

fn invalid(msg: impl Into<String>) -> MatchdayError {
    MatchdayError::InvalidInput(msg.into())
}

fn check_date(label: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if NaiveDate::parse_from_str(v, "%Y-%m-%d").is_err() => {
            Err(invalid(format!("{label} must be in YYYY-MM-DD format")))
        }
        _ => Ok(()),
    }
}

fn check_search(value: Option<&str>) -> Result<()> {
    match value {
        Some(s) if !s.is_empty() && s.chars().count() < MIN_SEARCH_LEN => Err(invalid(
            "Search parameter must be at least 3 characters long",
        )),
        _ => Ok(()),
    }
}

fn check_two_digits(label: &str, value: Option<u32>) -> Result<()> {
    match value {
        Some(n) if n > MAX_LAST_NEXT => {
            Err(invalid(format!("{label} parameter must be 2 digits or less")))
        }
        _ => Ok(()),
    }
}

fn check_fixture_ids(value: Option<&str>) -> Result<()> {
    let Some(ids) = value.filter(|s| !s.trim().is_empty()) else {
        return Ok(());
    };
    let parts: Vec<&str> = ids.split('-').collect();
    if parts.len() > MAX_FIXTURE_IDS {
        return Err(invalid(format!(
            "ids parameter accepts at most {MAX_FIXTURE_IDS} fixture ids"
        )));
    }
    if parts.iter().any(|p| p.trim().parse::<u32>().is_err()) {
        return Err(invalid(
            "ids parameter must be fixture ids separated by '-' (e.g. '215662-215663')",
        ));
    }
    Ok(())
}

/// Validation hook implemented by every query type.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

impl Validate for TeamsQuery {
    fn validate(&self) -> Result<()> {
        check_search(self.search.as_deref())
    }
}

impl Validate for FixturesQuery {
    fn validate(&self) -> Result<()> {
        if self.league.is_some() && self.season.is_none() {
            return Err(invalid(
                "When using 'league' parameter, 'season' is required",
            ));
        }
        if self.team.is_some() && self.season.is_none() {
            return Err(invalid("When using 'team' parameter, 'season' is required"));
        }
        check_two_digits("Last", self.last)?;
        check_two_digits("Next", self.next)?;
        check_date("Date", self.date.as_deref())?;
        check_date("From date", self.from.as_deref())?;
        check_date("To date", self.to.as_deref())?;
        check_fixture_ids(self.ids.as_deref())
    }
}

impl Validate for TeamStatisticsQuery {
    fn validate(&self) -> Result<()> {
        check_date("Date", self.date.as_deref())
    }
}

impl Validate for HeadToHeadQuery {
    fn validate(&self) -> Result<()> {
        if self.team_ids().is_none() {
            return Err(invalid(
                "h2h parameter must be in format 'team1-team2' (e.g., '33-34')",
            ));
        }
        check_two_digits("Last", self.last)?;
        check_two_digits("Next", self.next)?;
        check_date("date", self.date.as_deref())?;
        check_date("from_date", self.from.as_deref())?;
        check_date("to_date", self.to.as_deref())
    }
}

impl Validate for LeaguesQuery {
    fn validate(&self) -> Result<()> {
        check_search(self.search.as_deref())?;
        if let Some(kind) = self.kind.as_deref() {
            if kind != "league" && kind != "cup" {
                return Err(invalid("Type parameter must be 'league' or 'cup'"));
            }
        }
        if let Some(current) = self.current.as_deref() {
            if current != "true" && current != "false" {
                return Err(invalid("Current parameter must be 'true' or 'false'"));
            }
        }
        if let Some(last) = self.last {
            if !(1..=MAX_LAST_NEXT).contains(&last) {
                return Err(invalid("Last parameter must be between 1 and 99"));
            }
        }
        Ok(())
    }
}

impl Validate for SportsQuery {
    fn validate(&self) -> Result<()> {
        match self {
            SportsQuery::Teams(q) => q.validate(),
            SportsQuery::Fixtures(q) => q.validate(),
            SportsQuery::TeamStatistics(q) => q.validate(),
            SportsQuery::HeadToHead(q) => q.validate(),
            SportsQuery::Leagues(q) => q.validate(),
            SportsQuery::Standings(_)
            | SportsQuery::FixtureStatistics { .. }
            | SportsQuery::FixtureEvents { .. }
            | SportsQuery::FixtureLineups { .. }
            | SportsQuery::Predictions { .. }
            | SportsQuery::Seasons => Ok(()),
        }
    }
}
