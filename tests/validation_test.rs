//! Tests for local query validation.

use matchday::{
    FixturesQuery, HeadToHeadQuery, LeaguesQuery, MatchdayError, SportsQuery, StandingsQuery,
    TeamStatisticsQuery, TeamsQuery, Validate,
};

fn message(result: matchday::Result<()>) -> String {
    match result {
        Err(MatchdayError::InvalidInput(msg)) => msg,
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

fn h2h(pair: &str) -> HeadToHeadQuery {
    HeadToHeadQuery {
        h2h: pair.to_string(),
        ..Default::default()
    }
}

#[test]
fn short_team_search_rejected() {
    assert_eq!(
        message(TeamsQuery::default().search("ab").validate()),
        "Search parameter must be at least 3 characters long"
    );
    assert!(TeamsQuery::default().search("Ars").validate().is_ok());
    assert!(TeamsQuery::default().validate().is_ok());
}

#[test]
fn fixtures_league_and_team_require_season() {
    assert_eq!(
        message(FixturesQuery::default().league(39u32).validate()),
        "When using 'league' parameter, 'season' is required"
    );
    assert_eq!(
        message(FixturesQuery::default().team(33u32).validate()),
        "When using 'team' parameter, 'season' is required"
    );
    assert!(
        FixturesQuery::default()
            .league(39u32)
            .season(2023u32)
            .validate()
            .is_ok()
    );
}

#[test]
fn fixtures_last_and_next_limited_to_two_digits() {
    assert_eq!(
        message(FixturesQuery::default().last(100u32).validate()),
        "Last parameter must be 2 digits or less"
    );
    assert_eq!(
        message(FixturesQuery::default().next(150u32).validate()),
        "Next parameter must be 2 digits or less"
    );
    assert!(FixturesQuery::default().last(99u32).validate().is_ok());
}

#[test]
fn fixtures_dates_must_be_iso() {
    assert_eq!(
        message(FixturesQuery::default().date("01/03/2024").validate()),
        "Date must be in YYYY-MM-DD format"
    );
    assert_eq!(
        message(FixturesQuery::default().from("2024-13-01").validate()),
        "From date must be in YYYY-MM-DD format"
    );
    assert_eq!(
        message(FixturesQuery::default().to("yesterday").validate()),
        "To date must be in YYYY-MM-DD format"
    );
    assert!(
        FixturesQuery::default()
            .from("2024-02-29")
            .to("2024-03-31")
            .validate()
            .is_ok()
    );
}

#[test]
fn fixture_id_lists_checked() {
    assert!(FixturesQuery::default().ids("1-2-3").validate().is_ok());
    assert!(FixturesQuery::default().ids("1-x").validate().is_err());
    let too_many: Vec<String> = (1..=21).map(|n| n.to_string()).collect();
    assert!(
        FixturesQuery::default()
            .ids(too_many.join("-"))
            .validate()
            .is_err()
    );
}

#[test]
fn head_to_head_pair_format() {
    let expected = "h2h parameter must be in format 'team1-team2' (e.g., '33-34')";
    assert_eq!(message(h2h("33").validate()), expected);
    assert_eq!(message(h2h("33-").validate()), expected);
    assert_eq!(message(h2h("a-b").validate()), expected);
    assert_eq!(message(h2h("1-2-3").validate()), expected);
    assert!(h2h("33-34").validate().is_ok());
    assert_eq!(h2h("33-34").team_ids(), Some((33, 34)));
}

#[test]
fn head_to_head_dates_and_counts() {
    assert!(h2h("33-34").last(100u32).validate().is_err());
    assert!(h2h("33-34").date("2024/01/01").validate().is_err());
    assert!(h2h("33-34").from("2024-01-01").validate().is_ok());
}

#[test]
fn team_statistics_date_checked() {
    let query = TeamStatisticsQuery::new(39, 2023, 33).date("2024-1-1x");
    assert!(query.validate().is_err());
    assert!(
        TeamStatisticsQuery::new(39, 2023, 33)
            .date("2024-01-15")
            .validate()
            .is_ok()
    );
}

#[test]
fn leagues_filters_checked() {
    let mut query = LeaguesQuery::default();
    query.kind = Some("friendly".into());
    assert_eq!(
        message(query.validate()),
        "Type parameter must be 'league' or 'cup'"
    );

    let mut query = LeaguesQuery::default();
    query.current = Some("yes".into());
    assert_eq!(
        message(query.validate()),
        "Current parameter must be 'true' or 'false'"
    );

    let mut query = LeaguesQuery::default();
    query.last = Some(0);
    assert!(query.validate().is_err());

    let mut query = LeaguesQuery::default();
    query.kind = Some("cup".into());
    query.current = Some("true".into());
    assert!(query.validate().is_ok());
}

#[test]
fn operations_without_free_parameters_always_valid() {
    assert!(
        SportsQuery::Standings(StandingsQuery::new(39, 2023))
            .validate()
            .is_ok()
    );
    assert!(SportsQuery::Predictions { fixture: 1 }.validate().is_ok());
    assert!(SportsQuery::Seasons.validate().is_ok());
}
