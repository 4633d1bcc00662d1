//! Which [`CacheCategory`] a result is stored under.

use serde_json::Value;

use super::CacheCategory;
use crate::types::Operation;

/// Fixture status codes after which a fixture's data no longer changes:
/// full time, after extra time, penalties, postponed, cancelled,
/// abandoned, technical loss, walkover.
pub const COMPLETED_STATUSES: &[&str] = &["FT", "AET", "PEN", "PST", "CANC", "ABD", "AWD", "WO"];

fn fixture_status(item: &Value) -> Option<&str> {
    item.pointer("/fixture/status/short").and_then(Value::as_str)
}

/// Content-driven category for a batch of upstream fixture items.
///
/// `FixturesCompleted` only when every fixture carries a terminal status;
/// a missing status counts as not terminal. `None` for an empty batch,
/// which is not cached.
pub fn fixtures_category(items: &[Value]) -> Option<CacheCategory> {
    if items.is_empty() {
        return None;
    }
    let all_done = items
        .iter()
        .all(|item| fixture_status(item).is_some_and(|s| COMPLETED_STATUSES.contains(&s)));
    Some(if all_done {
        CacheCategory::FixturesCompleted
    } else {
        CacheCategory::FixturesUpcoming
    })
}

/// Category for `operation` given the raw upstream items, or `None` when
/// the result must not be cached.
///
/// Live fixture queries are filtered out by the caller before this point.
pub fn category_for(operation: Operation, items: &[Value]) -> Option<CacheCategory> {
    match operation {
        Operation::Fixtures | Operation::HeadToHead => fixtures_category(items),
        Operation::Teams => Some(CacheCategory::Teams),
        Operation::TeamStatistics => Some(CacheCategory::Statistics),
        Operation::Standings => Some(CacheCategory::Standings),
        Operation::FixtureStatistics | Operation::FixtureEvents => {
            Some(CacheCategory::FixturesCompleted)
        }
        Operation::FixtureLineups => Some(CacheCategory::FixturesUpcoming),
        Operation::Predictions => Some(CacheCategory::Predictions),
        Operation::Leagues | Operation::Seasons => Some(CacheCategory::Leagues),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture(short: &str) -> Value {
        json!({"fixture": {"id": 1, "status": {"short": short}}})
    }

    #[test]
    fn all_finished_is_completed() {
        let items = vec![fixture("FT"), fixture("PEN"), fixture("WO")];
        assert_eq!(
            fixtures_category(&items),
            Some(CacheCategory::FixturesCompleted)
        );
    }

    #[test]
    fn any_pending_is_upcoming() {
        let items = vec![fixture("FT"), fixture("NS")];
        assert_eq!(
            fixtures_category(&items),
            Some(CacheCategory::FixturesUpcoming)
        );
        assert_eq!(
            fixtures_category(&[fixture("1H")]),
            Some(CacheCategory::FixturesUpcoming)
        );
    }

    #[test]
    fn missing_status_is_upcoming() {
        let items = vec![json!({"fixture": {"id": 1}})];
        assert_eq!(
            fixtures_category(&items),
            Some(CacheCategory::FixturesUpcoming)
        );
    }

    #[test]
    fn empty_batch_not_cached() {
        assert_eq!(fixtures_category(&[]), None);
        assert_eq!(category_for(Operation::Fixtures, &[]), None);
    }

    #[test]
    fn fixed_categories() {
        assert_eq!(
            category_for(Operation::FixtureLineups, &[]),
            Some(CacheCategory::FixturesUpcoming)
        );
        assert_eq!(
            category_for(Operation::Seasons, &[]),
            Some(CacheCategory::Leagues)
        );
    }
}
