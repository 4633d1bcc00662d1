//! Reshaping of upstream payloads into result documents.
//!
//! Internal: the gateway feeds every successful [`ApiResponse`] through
//! [`reshape()`] before caching, so cached values are the documents callers
//! see. Missing upstream fields become `null`; nothing here fails except
//! operations that require at least one result.

use std::cmp::Ordering;

use serde_json::{Map, Value, json};

use crate::types::SportsQuery;
use crate::upstream::ApiResponse;
use crate::{MatchdayError, Result};

/// Fixture statuses counted by the head-to-head tally.
const FINISHED_STATUSES: &[&str] = &["FT", "AET", "PEN"];

/// Build the result document for `query` from the upstream response.
pub(crate) fn reshape(query: &SportsQuery, resp: &ApiResponse) -> Result<Value> {
    let items = &resp.response;
    match query {
        SportsQuery::Teams(_) => {
            let teams: Vec<Value> = items.iter().map(team).collect();
            Ok(json!({ "count": teams.len(), "teams": teams }))
        }
        SportsQuery::Fixtures(_) => {
            let fixtures: Vec<Value> = items.iter().map(fixture).collect();
            Ok(json!({ "count": fixtures.len(), "fixtures": fixtures }))
        }
        SportsQuery::TeamStatistics(_) => team_statistics(items),
        SportsQuery::Standings(_) => standings(items),
        SportsQuery::HeadToHead(q) => {
            let fixtures: Vec<Value> = items.iter().map(fixture).collect();
            let tally = match q.team_ids() {
                Some((first, _)) => HeadToHeadTally::count(&fixtures, first),
                None => HeadToHeadTally::default(),
            };
            Ok(json!({
                "count": fixtures.len(),
                "fixtures": fixtures,
                "statistics": tally.to_value(),
            }))
        }
        SportsQuery::FixtureStatistics { fixture } => fixture_statistics(*fixture, items),
        SportsQuery::FixtureEvents { fixture } => Ok(fixture_events(*fixture, items)),
        SportsQuery::FixtureLineups { fixture } => fixture_lineups(*fixture, items),
        SportsQuery::Predictions { fixture } => predictions(*fixture, items),
        SportsQuery::Leagues(_) => Ok(json!({
            "leagues": items,
            "total_results": resp.results,
        })),
        SportsQuery::Seasons => Ok(json!({
            "seasons": items,
            "total_results": resp.results,
        })),
    }
}

fn field(value: &Value, key: &str) -> Value {
    value.get(key).cloned().unwrap_or(Value::Null)
}

/// Object holding only `keys` of `value`, absent keys as `null`.
fn pick(value: &Value, keys: &[&str]) -> Value {
    let map: Map<String, Value> = keys
        .iter()
        .map(|key| ((*key).to_string(), field(value, key)))
        .collect();
    Value::Object(map)
}

/// Like [`pick`], but `null` when the source object is missing or empty.
fn pick_present(value: &Value, key: &str, keys: &[&str]) -> Value {
    match value.get(key) {
        Some(inner @ Value::Object(obj)) if !obj.is_empty() => pick(inner, keys),
        _ => Value::Null,
    }
}

fn team(item: &Value) -> Value {
    let info = item.get("team").unwrap_or(&Value::Null);
    let mut out = pick(info, &["id", "name", "code", "country", "founded", "logo"]);
    out["national"] = info
        .get("national")
        .cloned()
        .unwrap_or(Value::Bool(false));
    out["venue"] = pick_present(
        item,
        "venue",
        &["id", "name", "address", "city", "capacity", "surface", "image"],
    );
    out
}

fn home_away(value: &Value, key: &str) -> Value {
    pick(value.get(key).unwrap_or(&Value::Null), &["home", "away"])
}

fn fixture(item: &Value) -> Value {
    let info = item.get("fixture").unwrap_or(&Value::Null);
    let teams = item.get("teams").unwrap_or(&Value::Null);
    let score = item.get("score").unwrap_or(&Value::Null);
    let side = |key: &str| {
        pick(
            teams.get(key).unwrap_or(&Value::Null),
            &["id", "name", "logo", "winner"],
        )
    };

    let mut out = pick(info, &["id", "referee", "timezone", "date", "timestamp"]);
    out["venue"] = pick_present(info, "venue", &["id", "name", "city"]);
    out["status"] = pick(
        info.get("status").unwrap_or(&Value::Null),
        &["long", "short", "elapsed"],
    );
    out["league"] = pick(
        item.get("league").unwrap_or(&Value::Null),
        &["id", "name", "country", "logo", "flag", "season", "round"],
    );
    out["teams"] = json!({ "home": side("home"), "away": side("away") });
    out["goals"] = home_away(item, "goals");
    out["score"] = json!({
        "halftime": home_away(score, "halftime"),
        "fulltime": home_away(score, "fulltime"),
        "extratime": pick_present(score, "extratime", &["home", "away"]),
        "penalty": pick_present(score, "penalty", &["home", "away"]),
    });
    out
}

fn team_statistics(items: &[Value]) -> Result<Value> {
    let Some(stats) = items.first() else {
        return Err(MatchdayError::NoData(
            "No statistics found for the specified parameters".to_string(),
        ));
    };
    let mut out = pick(
        stats,
        &[
            "form",
            "fixtures",
            "goals",
            "biggest",
            "clean_sheet",
            "failed_to_score",
            "penalty",
            "lineups",
            "cards",
        ],
    );
    out["league"] = pick(
        stats.get("league").unwrap_or(&Value::Null),
        &["id", "name", "country", "logo", "flag", "season"],
    );
    out["team"] = pick(stats.get("team").unwrap_or(&Value::Null), &["id", "name", "logo"]);
    Ok(json!({ "statistics": out }))
}

fn standings(items: &[Value]) -> Result<Value> {
    let league = items
        .first()
        .and_then(|item| item.get("league"))
        .filter(|league| league.as_object().is_some_and(|o| !o.is_empty()))
        .ok_or_else(|| {
            MatchdayError::NoData("No standings found for the specified parameters".to_string())
        })?;

    // Upstream nests one table per group; the first group is reported.
    let table = match league.get("standings").and_then(Value::as_array) {
        Some(groups) => match groups.first() {
            Some(Value::Array(first)) => first.clone(),
            _ => groups.clone(),
        },
        None => Vec::new(),
    };
    let rows: Vec<Value> = table
        .iter()
        .map(|row| {
            pick(
                row,
                &[
                    "rank",
                    "team",
                    "points",
                    "goalsDiff",
                    "group",
                    "form",
                    "status",
                    "description",
                    "all",
                    "home",
                    "away",
                    "update",
                ],
            )
        })
        .collect();

    Ok(json!({
        "league": pick(league, &["id", "name", "country", "logo", "flag", "season"]),
        "count": rows.len(),
        "standings": rows,
    }))
}

/// Wins and draws between two teams over finished fixtures.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct HeadToHeadTally {
    team1_wins: u32,
    team2_wins: u32,
    draws: u32,
}

impl HeadToHeadTally {
    /// Tally reshaped `fixtures` from the point of view of `team1`.
    fn count(fixtures: &[Value], team1: u32) -> Self {
        let mut tally = Self::default();
        for fx in fixtures {
            let finished = fx
                .pointer("/status/short")
                .and_then(Value::as_str)
                .is_some_and(|s| FINISHED_STATUSES.contains(&s));
            if !finished {
                continue;
            }
            let goals = |side: &str| fx.pointer(&format!("/goals/{side}")).and_then(Value::as_i64);
            let id = |side: &str| fx.pointer(&format!("/teams/{side}/id")).and_then(Value::as_u64);
            let (Some(home), Some(away)) = (goals("home"), goals("away")) else {
                continue;
            };
            let winner = match home.cmp(&away) {
                Ordering::Greater => id("home"),
                Ordering::Less => id("away"),
                Ordering::Equal => {
                    tally.draws += 1;
                    continue;
                }
            };
            if winner == Some(u64::from(team1)) {
                tally.team1_wins += 1;
            } else {
                tally.team2_wins += 1;
            }
        }
        tally
    }

    fn to_value(self) -> Value {
        json!({
            "team1_wins": self.team1_wins,
            "team2_wins": self.team2_wins,
            "draws": self.draws,
            "total_games": self.team1_wins + self.team2_wins + self.draws,
        })
    }
}

fn fixture_statistics(fixture_id: u32, items: &[Value]) -> Result<Value> {
    if items.is_empty() {
        return Err(MatchdayError::NoData(
            "No statistics found for this fixture".to_string(),
        ));
    }
    let teams: Vec<Value> = items
        .iter()
        .map(|entry| {
            let stats: Map<String, Value> = entry
                .get("statistics")
                .and_then(Value::as_array)
                .map(|list| {
                    list.iter()
                        .filter_map(|stat| {
                            let kind = stat.get("type")?.as_str()?;
                            Some((kind.to_string(), field(stat, "value")))
                        })
                        .collect()
                })
                .unwrap_or_default();
            json!({ "team": field(entry, "team"), "statistics": stats })
        })
        .collect();
    Ok(json!({ "fixture_id": fixture_id, "teams": teams }))
}

fn event_time(event: &Value) -> (i64, i64) {
    let part = |key: &str| {
        event
            .pointer(&format!("/time/{key}"))
            .and_then(Value::as_i64)
            .unwrap_or(0)
    };
    (part("elapsed"), part("extra"))
}

fn fixture_events(fixture_id: u32, items: &[Value]) -> Value {
    let mut events: Vec<Value> = items
        .iter()
        .map(|event| {
            pick(
                event,
                &["time", "team", "player", "assist", "type", "detail", "comments"],
            )
        })
        .collect();
    events.sort_by_key(event_time);
    json!({ "fixture_id": fixture_id, "count": events.len(), "events": events })
}

fn fixture_lineups(fixture_id: u32, items: &[Value]) -> Result<Value> {
    if items.is_empty() {
        return Err(MatchdayError::NoData(
            "No lineups found for this fixture".to_string(),
        ));
    }
    let players = |lineup: &Value, key: &str| -> Vec<Value> {
        lineup
            .get(key)
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .map(|p| json!({ "player": field(p, "player") }))
                    .collect()
            })
            .unwrap_or_default()
    };
    let lineups: Vec<Value> = items
        .iter()
        .map(|lineup| {
            json!({
                "team": field(lineup, "team"),
                "formation": field(lineup, "formation"),
                "coach": field(lineup, "coach"),
                "startingXI": players(lineup, "startXI"),
                "substitutes": players(lineup, "substitutes"),
            })
        })
        .collect();
    Ok(json!({ "fixture_id": fixture_id, "lineups": lineups }))
}

fn predictions(fixture_id: u32, items: &[Value]) -> Result<Value> {
    let prediction = items
        .first()
        .filter(|p| p.as_object().is_some_and(|o| !o.is_empty()))
        .ok_or_else(|| {
            MatchdayError::NoData("No predictions found for this fixture".to_string())
        })?;
    let inner = prediction.get("predictions").unwrap_or(&Value::Null);
    let mut out = pick(
        inner,
        &["winner", "win_or_draw", "under_over", "goals", "advice", "percent"],
    );
    for key in ["league", "teams", "comparison", "h2h"] {
        out[key] = field(prediction, key);
    }
    Ok(json!({ "fixture_id": fixture_id, "predictions": out }))
}
