//! End-to-end tests for SportsGateway against a mocked upstream.

use std::time::Duration;

use matchday::cache::cache_key;
use matchday::{
    CacheStatus, FixturesQuery, HeadToHeadQuery, Matchday, RetryConfig, SportsData, SportsGateway,
    SportsQuery, StandingsQuery, TeamsQuery,
};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer) -> SportsGateway {
    Matchday::builder()
        .api_key("test_key")
        .base_url(server.uri())
        .retry(RetryConfig::new().backoff_unit(Duration::from_millis(5)))
        .build()
        .unwrap()
}

fn envelope(get: &str, items: Vec<Value>) -> Value {
    json!({
        "get": get,
        "parameters": {},
        "errors": [],
        "results": items.len(),
        "response": items,
    })
}

fn fixture_item(id: u32, short: &str) -> Value {
    json!({
        "fixture": {"id": id, "date": "2024-03-01T15:00:00+00:00", "status": {"long": "x", "short": short, "elapsed": null}},
        "league": {"id": 39, "name": "Premier League", "season": 2023},
        "teams": {
            "home": {"id": 33, "name": "Manchester United", "winner": true},
            "away": {"id": 34, "name": "Newcastle", "winner": false}
        },
        "goals": {"home": 2, "away": 1},
        "score": {"halftime": {"home": 1, "away": 0}, "fulltime": {"home": 2, "away": 1}}
    })
}

#[tokio::test]
async fn second_identical_query_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/teams"))
        .and(query_param("search", "Manchester"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "teams",
            vec![json!({
                "team": {"id": 33, "name": "Manchester United", "code": "MUN", "country": "England", "founded": 1878, "logo": "l"},
                "venue": {"id": 556, "name": "Old Trafford", "city": "Manchester", "capacity": 76212}
            })],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let first = gateway.teams(TeamsQuery::default().search("Manchester")).await;
    let second = gateway.teams(TeamsQuery::default().search("Manchester")).await;

    assert_eq!(first.cache, Some(CacheStatus::Miss));
    assert_eq!(second.cache, Some(CacheStatus::Hit));
    assert_eq!(first.data, second.data);
    assert_ne!(first.request_id, second.request_id);

    let data = first.data.unwrap();
    assert_eq!(data["count"], 1);
    assert_eq!(data["teams"][0]["name"], "Manchester United");
    assert_eq!(data["teams"][0]["venue"]["name"], "Old Trafford");
    assert_eq!(data["teams"][0]["national"], false);

    let stats = gateway.cache_stats().unwrap();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(gateway.remaining_budget().minute, 29);
    gateway.shutdown().await;
}

#[tokio::test]
async fn live_fixtures_bypass_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fixtures"))
        .and(query_param("live", "all"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope("fixtures", vec![fixture_item(1, "1H")])),
        )
        .expect(2)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let query = FixturesQuery::default().live("all");
    let first = gateway.fixtures(query.clone()).await;
    let second = gateway.fixtures(query).await;

    assert_eq!(first.cache, Some(CacheStatus::Bypass));
    assert_eq!(second.cache, Some(CacheStatus::Bypass));
    assert_eq!(gateway.cache().unwrap().len(), 0);
    gateway.shutdown().await;
}

#[tokio::test]
async fn finished_fixtures_cached_permanently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fixtures"))
        .and(query_param("id", "100"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope("fixtures", vec![fixture_item(100, "FT")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fixtures"))
        .and(query_param("id", "200"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope("fixtures", vec![fixture_item(200, "NS")])),
        )
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let done = SportsQuery::Fixtures(FixturesQuery::default().id(100u32));
    let upcoming = SportsQuery::Fixtures(FixturesQuery::default().id(200u32));
    assert!(!gateway.execute(&done).await.is_error());
    assert!(!gateway.execute(&upcoming).await.is_error());

    let cache = gateway.cache().unwrap();
    let done_key = cache_key(done.operation(), &done.to_params());
    let upcoming_key = cache_key(upcoming.operation(), &upcoming.to_params());
    assert_eq!(cache.peek_expiry(&done_key), Some(None));
    assert!(matches!(cache.peek_expiry(&upcoming_key), Some(Some(_))));
    gateway.shutdown().await;
}

#[tokio::test]
async fn empty_fixture_results_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fixtures"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("fixtures", vec![])))
        .expect(2)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let query = FixturesQuery::default().date("2024-03-01");
    let first = gateway.fixtures(query.clone()).await;
    let second = gateway.fixtures(query).await;

    assert_eq!(first.data.unwrap()["count"], 0);
    assert_eq!(second.cache, Some(CacheStatus::Miss));
    gateway.shutdown().await;
}

#[tokio::test]
async fn validation_failure_never_reaches_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("fixtures", vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let envelope = gateway
        .fixtures(FixturesQuery::default().league(39u32))
        .await;
    assert_eq!(
        envelope.error.as_deref(),
        Some("When using 'league' parameter, 'season' is required")
    );
    assert!(envelope.data.is_none());

    let envelope = gateway
        .head_to_head(HeadToHeadQuery {
            h2h: "33vs34".to_string(),
            ..Default::default()
        })
        .await;
    assert_eq!(
        envelope.error.as_deref(),
        Some("h2h parameter must be in format 'team1-team2' (e.g., '33-34')")
    );

    let envelope = gateway.teams(TeamsQuery::default().search("ab")).await;
    assert!(envelope.is_error());

    assert_eq!(gateway.remaining_budget().minute, 30);
    gateway.shutdown().await;
}

#[tokio::test]
async fn upstream_failure_prefixed_with_operation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/standings"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "Forbidden plan"})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let envelope = gateway.standings(StandingsQuery::new(39, 2023)).await;

    assert_eq!(
        envelope.error.as_deref(),
        Some("Failed to retrieve standings: API returned status 403: Forbidden plan")
    );
    assert!(envelope.cache.is_none());
    assert!(!envelope.request_id.is_empty());
    gateway.shutdown().await;
}

#[tokio::test]
async fn missing_data_reported_without_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/predictions"))
        .and(query_param("fixture", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("predictions", vec![])))
        .expect(2)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let first = gateway.predictions(42).await;
    let second = gateway.predictions(42).await;

    assert_eq!(
        first.error.as_deref(),
        Some("No predictions found for this fixture")
    );
    assert!(second.is_error(), "no-data results are not cached");
    gateway.shutdown().await;
}

#[tokio::test]
async fn head_to_head_tallies_finished_meetings() {
    let server = MockServer::start().await;
    let mut draw = fixture_item(3, "FT");
    draw["goals"] = json!({"home": 1, "away": 1});
    draw["teams"]["home"]["winner"] = Value::Null;
    draw["teams"]["away"]["winner"] = Value::Null;
    Mock::given(method("GET"))
        .and(path("/fixtures/headtohead"))
        .and(query_param("h2h", "33-34"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "fixtures/headtohead",
            vec![fixture_item(1, "FT"), draw, fixture_item(4, "NS")],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let envelope = gateway
        .head_to_head(HeadToHeadQuery {
            h2h: "33-34".to_string(),
            ..Default::default()
        })
        .await;

    let data = envelope.data.unwrap();
    assert_eq!(data["count"], 3);
    assert_eq!(data["statistics"]["total_games"], 2);
    assert_eq!(data["statistics"]["team1_wins"], 1);
    assert_eq!(data["statistics"]["draws"], 1);
    assert_eq!(data["statistics"]["team2_wins"], 0);
    gateway.shutdown().await;
}

#[tokio::test]
async fn disabled_cache_reports_bypass() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leagues/seasons"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope("leagues/seasons", vec![json!(2022), json!(2023)])),
        )
        .expect(2)
        .mount(&server)
        .await;

    let gateway = Matchday::builder()
        .api_key("test_key")
        .base_url(server.uri())
        .disable_cache()
        .build()
        .unwrap();
    let first = gateway.seasons().await;
    let second = gateway.seasons().await;

    assert_eq!(first.cache, Some(CacheStatus::Bypass));
    assert_eq!(second.cache, Some(CacheStatus::Bypass));
    assert_eq!(first.data.unwrap()["total_results"], 2);
    assert!(gateway.cache_stats().is_none());
    assert!(!gateway.has_sweeper());
    gateway.shutdown().await;
}

#[tokio::test]
async fn invalidation_forces_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/standings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "standings",
            vec![json!({"league": {"id": 39, "name": "Premier League", "season": 2023,
                "standings": [[{"rank": 1, "team": {"id": 50, "name": "Manchester City"}, "points": 89}]]}})],
        )))
        .expect(2)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let query = StandingsQuery::new(39, 2023);
    gateway.standings(query.clone()).await;
    assert_eq!(gateway.invalidate_cache(Some("standings:")), 1);
    let again = gateway.standings(query).await;
    assert_eq!(again.cache, Some(CacheStatus::Miss));
    gateway.shutdown().await;
}
