use std::fs;
use std::path::PathBuf;

use matchday::fixture::{Side, parse_fixtures_json};
use matchday::upstream::decode_fixtures;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_scheduled_fixture_file() {
    let raw = read_fixture("scheduled_fixtures.json");
    let fixtures = parse_fixtures_json(&raw).expect("fixture should parse");
    assert_eq!(fixtures.len(), 5);

    let first = &fixtures[0];
    assert_eq!(first.fixture.id, Some(1001));
    assert_eq!(first.league_name(), "Serie A");
    assert!(first.league.standings);
    assert!(first.is_full_time());
    assert_eq!(first.events.len(), 2);
    assert_eq!(first.events[0].kind.as_deref(), Some("Goal"));
    assert_eq!(first.events[1].assist.name, None);

    let friendly = &fixtures[2];
    assert!(!friendly.league.standings);
    assert!(friendly.is_not_started());
    assert_eq!(friendly.fixture.venue.name, None);
    assert!(friendly.events.is_empty());
}

#[test]
fn null_goals_fall_back_to_fulltime_score() {
    let raw = read_fixture("scheduled_fixtures.json");
    let fixtures = parse_fixtures_json(&raw).expect("fixture should parse");
    let bundesliga = fixtures
        .iter()
        .find(|f| f.fixture.id == Some(1004))
        .expect("bundesliga fixture");
    assert_eq!(bundesliga.score_for(Side::Home), Some(2));
    assert_eq!(bundesliga.score_for(Side::Away), Some(0));
    assert!(bundesliga.events.is_empty());
}

#[test]
fn parses_live_fixture_file() {
    let raw = read_fixture("live_fixtures.json");
    let fixtures = parse_fixtures_json(&raw).expect("fixture should parse");
    assert_eq!(fixtures.len(), 2);
    assert_eq!(fixtures[1].fixture.status.elapsed, Some(30));
    assert_eq!(fixtures[1].teams.home.name.as_deref(), Some("Liverpool"));
}

#[test]
fn proxy_error_body_surfaces_message() {
    let err = parse_fixtures_json(r#"{"error":"Failed to fetch live fixtures"}"#)
        .expect_err("error body should fail");
    assert_eq!(err.to_string(), "proxy error: Failed to fetch live fixtures");
}

#[test]
fn missing_response_array_is_an_error() {
    let err = parse_fixtures_json(r#"{"errors":{"token":"invalid"}}"#)
        .expect_err("no response array");
    assert!(err.to_string().contains("no response array"));

    assert!(parse_fixtures_json(r#"{"response":{"id":1}}"#).is_err());
    assert!(parse_fixtures_json("null").is_err());
    assert!(parse_fixtures_json("   ").is_err());
    assert!(parse_fixtures_json("<html>bad gateway</html>").is_err());
}

#[test]
fn empty_response_array_is_ok() {
    let fixtures = parse_fixtures_json(r#"{"response":[]}"#).expect("empty list parses");
    assert!(fixtures.is_empty());
}

#[test]
fn malformed_entries_are_skipped() {
    let raw = r#"{"response":[
        {"fixture":{"id":1},"league":{"name":"Serie A"}},
        "not a fixture",
        {"fixture":{"id":"two"}},
        {"fixture":{"id":3}}
    ]}"#;
    let fixtures = parse_fixtures_json(raw).expect("should parse");
    let ids: Vec<Option<u64>> = fixtures.iter().map(|f| f.fixture.id).collect();
    assert_eq!(ids, vec![Some(1), Some(3)]);
}

#[test]
fn decode_fixtures_reads_upstream_bodies() {
    let body: serde_json::Value =
        serde_json::from_str(&read_fixture("live_fixtures.json")).expect("valid json");
    assert_eq!(decode_fixtures(&body).len(), 2);
    assert!(decode_fixtures(&serde_json::json!({ "message": "rate limited" })).is_empty());
}
