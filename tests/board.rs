use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use matchday::board::{
    Board, CompetitionFilter, Feed, REFEREE_UNKNOWN, SCORE_PLACEHOLDER, VENUE_UNKNOWN, View,
    ViewState, build_board, competition_options, select_fixtures, sort_fixtures,
};
use matchday::fixture::{Fixture, parse_fixtures_json};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn live_feed() -> Feed {
    let raw = read_fixture("live_fixtures.json");
    Feed::ready(parse_fixtures_json(&raw).expect("live fixture should parse"))
}

fn scheduled_feed() -> Feed {
    let raw = read_fixture("scheduled_fixtures.json");
    Feed::ready(parse_fixtures_json(&raw).expect("scheduled fixture should parse"))
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 21, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn state(view: View) -> ViewState {
    ViewState {
        view,
        competition: CompetitionFilter::All,
    }
}

fn card_ids(board: &Board) -> Vec<u64> {
    board
        .cards()
        .iter()
        .map(|c| c.fixture_id.expect("fixture id"))
        .collect()
}

fn fixture(league: &str, standings: bool, id: u64) -> Fixture {
    let mut f = Fixture::default();
    f.fixture.id = Some(id);
    f.league.name = Some(league.to_string());
    f.league.standings = standings;
    f
}

#[test]
fn finished_view_keeps_started_matches_sorted_by_league() {
    let board = build_board(&state(View::Finished), &live_feed(), &scheduled_feed(), &now());
    assert_eq!(card_ids(&board), vec![1004, 1005, 1001]);

    let cards = board.cards();
    assert_eq!(cards[0].league.name, "Bundesliga");
    assert_eq!(cards[0].home.score, "2");
    assert_eq!(cards[0].away.score, "0");
    assert_eq!(cards[0].venue, "Allianz Arena - München");
    assert_eq!(cards[0].kickoff, "Thu 15 Oct 2026 18:30");

    assert_eq!(cards[1].status, "Second Half (67')");
    assert_eq!(cards[1].venue, "Philips Stadion");

    assert_eq!(cards[2].status, "Match Finished (90')");
    assert_eq!(cards[2].referee, "D. Orsato");
    assert_eq!(cards[2].league.round, "Regular Season - 8");
}

#[test]
fn events_only_show_for_full_time_outside_live_view() {
    let board = build_board(&state(View::Finished), &live_feed(), &scheduled_feed(), &now());
    let cards = board.cards();

    // 2H fixture carries an event but is not finished yet.
    assert!(cards[1].events.is_empty());

    let summaries: Vec<String> = cards[2].events.iter().map(|e| e.summary()).collect();
    assert_eq!(
        summaries,
        vec![
            "23' Goal - Normal Goal: R. Leao (Assist: C. Pulisic)".to_string(),
            "61' Card - Yellow Card: G. Mancini".to_string(),
        ]
    );
}

#[test]
fn live_view_shows_events_and_puts_friendlies_last() {
    let board = build_board(&state(View::Live), &live_feed(), &scheduled_feed(), &now());
    assert_eq!(card_ids(&board), vec![2001, 2002]);

    let first = &board.cards()[0];
    assert_eq!(first.home.name, "Liverpool");
    assert_eq!(first.status, "First Half (30')");
    assert_eq!(
        first.events[0].summary(),
        "17' Goal - Normal Goal: M. Salah (Assist: T. Alexander-Arnold)"
    );
    assert_eq!(board.cards()[1].referee, REFEREE_UNKNOWN);
}

#[test]
fn today_view_keeps_not_started_matches_for_the_local_day() {
    let board = build_board(&state(View::Today), &live_feed(), &scheduled_feed(), &now());
    assert_eq!(card_ids(&board), vec![1002, 1003]);

    let cards = board.cards();
    assert_eq!(cards[0].home.score, SCORE_PLACEHOLDER);
    assert_eq!(cards[0].away.score, SCORE_PLACEHOLDER);
    assert_eq!(cards[0].referee, REFEREE_UNKNOWN);
    assert!(cards[0].events.is_empty());
    assert_eq!(cards[1].venue, VENUE_UNKNOWN);
}

#[test]
fn today_view_follows_viewer_timezone() {
    let plus_five = FixedOffset::east_opt(5 * 3600).expect("valid offset");
    let local_now = now().with_timezone(&plus_five);
    let board = build_board(
        &state(View::Today),
        &live_feed(),
        &scheduled_feed(),
        &local_now,
    );
    // 20:45Z is already the 17th at +05:00; 15:00Z is still the 16th.
    assert_eq!(card_ids(&board), vec![1002]);
    assert_eq!(board.cards()[0].kickoff, "Sat 17 Oct 2026 01:45");
}

#[test]
fn competition_filter_narrows_selection() {
    let selection = ViewState {
        view: View::Finished,
        competition: CompetitionFilter::Named("Serie A".to_string()),
    };
    let board = build_board(&selection, &live_feed(), &scheduled_feed(), &now());
    assert_eq!(card_ids(&board), vec![1001]);

    let selection = ViewState {
        view: View::Finished,
        competition: CompetitionFilter::Named("Premier League".to_string()),
    };
    let board = build_board(&selection, &live_feed(), &scheduled_feed(), &now());
    assert_eq!(board, Board::NoMatches);
}

#[test]
fn competition_options_merge_both_collections() {
    let live = live_feed();
    let scheduled = scheduled_feed();
    let options = competition_options(live.fixtures.iter().chain(scheduled.fixtures.iter()));
    let labels: Vec<&str> = options.iter().map(|o| o.label()).collect();
    assert_eq!(
        labels,
        vec![
            "All competitions",
            "Bundesliga",
            "Eredivisie",
            "Friendlies Clubs",
            "Premier League",
            "Serie A",
        ]
    );
    assert_eq!(options[0], CompetitionFilter::All);
}

#[test]
fn competition_options_skip_missing_names() {
    let mut unnamed = Fixture::default();
    unnamed.league.name = None;
    let fixtures = vec![unnamed, fixture("Ligue 1", true, 1)];
    let options = competition_options(fixtures.iter());
    assert_eq!(
        options,
        vec![
            CompetitionFilter::All,
            CompetitionFilter::Named("Ligue 1".to_string()),
        ]
    );
    assert_eq!(competition_options(std::iter::empty::<&Fixture>()), vec![CompetitionFilter::All]);
}

#[test]
fn sort_is_stable_within_a_league() {
    let mut fixtures = vec![
        fixture("Serie A", true, 1),
        fixture("Club Friendlies", false, 2),
        fixture("Serie A", true, 3),
        fixture("allsvenskan", true, 4),
        fixture("Serie A", true, 5),
    ];
    sort_fixtures(&mut fixtures);
    let ids: Vec<u64> = fixtures.iter().filter_map(|f| f.fixture.id).collect();
    assert_eq!(ids, vec![4, 1, 3, 5, 2]);
}

#[test]
fn sort_orders_standings_before_name() {
    let mut fixtures = vec![
        fixture("Amistosos", false, 1),
        fixture("Zambia Super League", true, 2),
    ];
    sort_fixtures(&mut fixtures);
    assert!(fixtures[0].league.standings);
    assert!(!fixtures[1].league.standings);
}

#[test]
fn building_twice_gives_the_same_board() {
    let live = live_feed();
    let scheduled = scheduled_feed();
    for view in View::ALL {
        let first = build_board(&state(view), &live, &scheduled, &now());
        let second = build_board(&state(view), &live, &scheduled, &now());
        assert_eq!(first, second);
    }
}

#[test]
fn selection_borrows_from_inputs_without_reordering_them() {
    let scheduled = scheduled_feed();
    let before: Vec<Option<u64>> = scheduled.fixtures.iter().map(|f| f.fixture.id).collect();
    let selected = select_fixtures(&state(View::Finished), &[], &scheduled.fixtures, &now());
    assert_eq!(selected.len(), 3);
    let after: Vec<Option<u64>> = scheduled.fixtures.iter().map(|f| f.fixture.id).collect();
    assert_eq!(before, after);
}

#[test]
fn feed_never_loaded_shows_loading_or_unavailable() {
    let board = build_board(
        &state(View::Live),
        &Feed::default(),
        &scheduled_feed(),
        &now(),
    );
    assert_eq!(board, Board::Loading);
    assert_eq!(board.placeholder().as_deref(), Some("Loading fixtures..."));

    let board = build_board(
        &state(View::Finished),
        &live_feed(),
        &Feed::unavailable("upstream down"),
        &now(),
    );
    assert_eq!(board, Board::Unavailable("upstream down".to_string()));
    assert_eq!(
        board.placeholder().as_deref(),
        Some("Data unavailable: upstream down")
    );
}

#[test]
fn failed_refresh_keeps_previous_fixtures() {
    let mut scheduled = scheduled_feed();
    scheduled.mark_unavailable("timeout");
    let board = build_board(&state(View::Finished), &live_feed(), &scheduled, &now());
    assert_eq!(card_ids(&board), vec![1004, 1005, 1001]);
}

#[test]
fn empty_feed_shows_no_matches() {
    let board = build_board(
        &state(View::Live),
        &Feed::ready(Vec::new()),
        &scheduled_feed(),
        &now(),
    );
    assert_eq!(board, Board::NoMatches);
    assert_eq!(
        board.placeholder().as_deref(),
        Some("No matches found for this view.")
    );
}
