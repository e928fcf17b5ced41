use chrono::{TimeZone, Utc};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fixture_block_sync::football_data::{FixtureSource, FootballData};
use fixture_block_sync::SyncError;

fn load_sample() -> String {
    std::fs::read_to_string("tests/sample_matches.json").expect("failed to read sample_matches.json")
}

#[test]
fn parses_sample_matches_in_order() {
    let fixtures = FootballData::parse_matches(&load_sample()).expect("parse failed");
    assert_eq!(fixtures.len(), 3);

    let first = &fixtures[0];
    assert_eq!(first.id, "436181");
    assert_eq!(first.opponent, "CRY");
    assert_eq!(first.kickoff, Utc.with_ymd_and_hms(2024, 3, 2, 15, 0, 0).unwrap());
    assert_eq!(first.last_updated, Utc.with_ymd_and_hms(2024, 2, 28, 8, 20, 14).unwrap());

    let ids: Vec<&str> = fixtures.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["436181", "436200", "497411"]);
}

#[test]
fn null_tla_falls_back_to_short_name() {
    let fixtures = FootballData::parse_matches(&load_sample()).expect("parse failed");
    assert_eq!(fixtures[2].opponent, "Brighton Hove");
}

#[test]
fn missing_matches_is_malformed() {
    let err = FootballData::parse_matches(r#"{"errorCode": 403}"#).unwrap_err();
    assert!(matches!(err, SyncError::MalformedResponse(_)), "got {:?}", err);
}

#[test]
fn match_without_kickoff_is_malformed() {
    let body = r#"{"matches": [{"id": 1, "lastUpdated": "2024-02-28T08:20:14Z", "awayTeam": {"tla": "CRY"}}]}"#;
    let err = FootballData::parse_matches(body).unwrap_err();
    match err {
        SyncError::MalformedResponse(msg) => assert!(msg.contains("utcDate"), "message was: {}", msg),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn match_without_away_team_is_malformed() {
    let body = r#"{"matches": [{"id": 1, "utcDate": "2024-03-02T15:00:00Z", "lastUpdated": "2024-02-28T08:20:14Z"}]}"#;
    assert!(matches!(FootballData::parse_matches(body), Err(SyncError::MalformedResponse(_))));
}

#[test]
fn unparseable_timestamp_is_malformed() {
    let body = r#"{"matches": [{"id": 1, "utcDate": "next saturday", "lastUpdated": "2024-02-28T08:20:14Z", "awayTeam": {"tla": "CRY"}}]}"#;
    assert!(matches!(FootballData::parse_matches(body), Err(SyncError::MalformedResponse(_))));
}

#[test]
fn empty_listing_is_not_an_error() {
    let fixtures = FootballData::parse_matches(r#"{"matches": []}"#).expect("parse failed");
    assert!(fixtures.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_sends_token_and_home_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/teams/62/matches"))
        .and(query_param("status", "SCHEDULED"))
        .and(query_param("venue", "HOME"))
        .and(header("X-Auth-Token", "football-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_sample()))
        .expect(1)
        .mount(&server)
        .await;

    let source = FootballData::new(&server.uri(), "62", "football-secret");
    let fixtures = tokio::task::spawn_blocking(move || source.fetch())
        .await
        .expect("join failed")
        .expect("fetch failed");
    assert_eq!(fixtures.len(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_non_success_status_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/teams/62/matches"))
        .respond_with(ResponseTemplate::new(403).set_body_string(r#"{"message": "forbidden"}"#))
        .mount(&server)
        .await;

    let source = FootballData::new(&server.uri(), "62", "bad-token");
    let result = tokio::task::spawn_blocking(move || source.fetch()).await.expect("join failed");
    match result {
        Err(SyncError::Fetch(msg)) => assert!(msg.contains("403"), "message was: {}", msg),
        other => panic!("expected fetch error, got {:?}", other),
    }
}
