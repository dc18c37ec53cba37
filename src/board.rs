use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::Display;

use chrono::{DateTime, TimeZone};

use crate::fixture::{Fixture, MatchEvent, Side};

pub const SCORE_PLACEHOLDER: &str = "-";
pub const VENUE_UNKNOWN: &str = "Venue N/A";
pub const REFEREE_UNKNOWN: &str = "Referee N/A";
pub const DATE_UNKNOWN: &str = "Date N/A";
pub const NO_MATCHES: &str = "No matches found for this view.";
pub const LOADING: &str = "Loading fixtures...";
pub const ALL_COMPETITIONS: &str = "All competitions";

const KICKOFF_FORMAT: &str = "%a %d %b %Y %H:%M";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    #[default]
    Live,
    Finished,
    Today,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Live,
    Scheduled,
}

impl View {
    pub const ALL: [View; 3] = [View::Live, View::Finished, View::Today];

    pub fn source(self) -> FeedKind {
        match self {
            View::Live => FeedKind::Live,
            View::Finished | View::Today => FeedKind::Scheduled,
        }
    }

    pub fn depends_on(self, feed: FeedKind) -> bool {
        self.source() == feed
    }

    pub fn from_param(raw: &str) -> Option<View> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "live" => Some(View::Live),
            "finished" => Some(View::Finished),
            "today" => Some(View::Today),
            _ => None,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            View::Live => "live",
            View::Finished => "finished",
            View::Today => "today",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Live => "LIVE",
            View::Finished => "FINISHED",
            View::Today => "TODAY",
        }
    }
}

/// Competition selector value. `All` is the sentinel that disables filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CompetitionFilter {
    #[default]
    All,
    Named(String),
}

impl CompetitionFilter {
    pub fn from_param(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "all" {
            CompetitionFilter::All
        } else {
            CompetitionFilter::Named(trimmed.to_string())
        }
    }

    pub fn as_param(&self) -> &str {
        match self {
            CompetitionFilter::All => "all",
            CompetitionFilter::Named(name) => name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CompetitionFilter::All => ALL_COMPETITIONS,
            CompetitionFilter::Named(name) => name,
        }
    }

    pub fn matches(&self, fixture: &Fixture) -> bool {
        match self {
            CompetitionFilter::All => true,
            CompetitionFilter::Named(name) => fixture.league_name() == name,
        }
    }
}

/// What the viewer has selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub view: View,
    pub competition: CompetitionFilter,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FeedStatus {
    #[default]
    Pending,
    Ready,
    Unavailable(String),
}

/// One fetched collection plus how its last fetch went.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub fixtures: Vec<Fixture>,
    pub status: FeedStatus,
    pub loaded: bool,
}

impl Feed {
    pub fn ready(fixtures: Vec<Fixture>) -> Self {
        Self {
            fixtures,
            status: FeedStatus::Ready,
            loaded: true,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            fixtures: Vec::new(),
            status: FeedStatus::Unavailable(reason.into()),
            loaded: false,
        }
    }

    pub fn replace(&mut self, fixtures: Vec<Fixture>) {
        self.fixtures = fixtures;
        self.status = FeedStatus::Ready;
        self.loaded = true;
    }

    /// Keeps whatever was fetched before.
    pub fn mark_unavailable(&mut self, reason: impl Into<String>) {
        self.status = FeedStatus::Unavailable(reason.into());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueBadge {
    pub name: String,
    pub logo: Option<String>,
    pub round: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamLine {
    pub name: String,
    pub logo: Option<String>,
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLine {
    pub minute: String,
    pub kind: String,
    pub detail: String,
    pub player: Option<String>,
    pub assist: Option<String>,
}

impl EventLine {
    pub fn summary(&self) -> String {
        let mut line = String::new();
        if !self.minute.is_empty() {
            line.push_str(&self.minute);
            line.push(' ');
        }
        line.push_str(&format!("{} - {}", self.kind, self.detail));
        if let Some(player) = &self.player {
            line.push_str(&format!(": {player}"));
        }
        if let Some(assist) = &self.assist {
            line.push_str(&format!(" (Assist: {assist})"));
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCard {
    pub fixture_id: Option<u64>,
    pub league: LeagueBadge,
    pub home: TeamLine,
    pub away: TeamLine,
    pub kickoff: String,
    pub status: String,
    pub venue: String,
    pub referee: String,
    pub events: Vec<EventLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Board {
    Cards(Vec<MatchCard>),
    Loading,
    NoMatches,
    Unavailable(String),
}

impl Board {
    pub fn cards(&self) -> &[MatchCard] {
        match self {
            Board::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn placeholder(&self) -> Option<String> {
        match self {
            Board::Cards(_) => None,
            Board::Loading => Some(LOADING.to_string()),
            Board::NoMatches => Some(NO_MATCHES.to_string()),
            Board::Unavailable(reason) => Some(format!("Data unavailable: {reason}")),
        }
    }
}

/// Derives the board for the current selection.
///
/// A collection that has never been fetched successfully yields `Loading` or
/// `Unavailable`; once fetched, a later failure keeps showing the old
/// fixtures.
pub fn build_board<Tz>(
    state: &ViewState,
    live: &Feed,
    scheduled: &Feed,
    now: &DateTime<Tz>,
) -> Board
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let source = match state.view.source() {
        FeedKind::Live => live,
        FeedKind::Scheduled => scheduled,
    };
    if !source.loaded {
        return match &source.status {
            FeedStatus::Unavailable(reason) => Board::Unavailable(reason.clone()),
            _ => Board::Loading,
        };
    }

    let fixtures = select_fixtures(state, &live.fixtures, &scheduled.fixtures, now);
    if fixtures.is_empty() {
        return Board::NoMatches;
    }
    let tz = now.timezone();
    Board::Cards(
        fixtures
            .into_iter()
            .map(|f| build_card(f, state.view, &tz))
            .collect(),
    )
}

/// View filter, then competition filter, then sort.
pub fn select_fixtures<'a, Tz: TimeZone>(
    state: &ViewState,
    live: &'a [Fixture],
    scheduled: &'a [Fixture],
    now: &DateTime<Tz>,
) -> Vec<&'a Fixture> {
    let today = now.date_naive();
    let tz = now.timezone();
    let mut selected: Vec<&Fixture> = match state.view {
        View::Live => live.iter().collect(),
        View::Finished => scheduled.iter().filter(|f| !f.is_not_started()).collect(),
        View::Today => scheduled
            .iter()
            .filter(|f| f.is_on_day(today, &tz) && f.is_not_started())
            .collect(),
    };
    selected.retain(|f| state.competition.matches(f));
    sort_fixtures(&mut selected);
    selected
}

/// Standings competitions first, then by league name. Stable.
pub fn sort_fixtures<F: Borrow<Fixture>>(fixtures: &mut [F]) {
    fixtures.sort_by(|a, b| {
        let a: &Fixture = a.borrow();
        let b: &Fixture = b.borrow();
        let a_rank = if a.league.standings { 0 } else { 1 };
        let b_rank = if b.league.standings { 0 } else { 1 };
        a_rank
            .cmp(&b_rank)
            .then_with(|| locale_cmp(a.league_name(), b.league_name()))
    });
}

/// The `All` sentinel followed by every distinct league name, sorted.
pub fn competition_options<'a, I>(fixtures: I) -> Vec<CompetitionFilter>
where
    I: IntoIterator<Item = &'a Fixture>,
{
    let mut seen = HashSet::new();
    let mut names: Vec<&str> = Vec::new();
    for fixture in fixtures {
        let name = fixture.league_name();
        if !name.is_empty() && seen.insert(name) {
            names.push(name);
        }
    }
    names.sort_by(|a, b| locale_cmp(a, b));

    let mut options = Vec::with_capacity(names.len() + 1);
    options.push(CompetitionFilter::All);
    options.extend(
        names
            .into_iter()
            .map(|name| CompetitionFilter::Named(name.to_string())),
    );
    options
}

pub fn build_card<Tz>(fixture: &Fixture, view: View, tz: &Tz) -> MatchCard
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let info = &fixture.fixture;
    let show_events = view == View::Live || fixture.is_full_time();
    let events = if show_events {
        fixture.events.iter().map(event_line).collect()
    } else {
        Vec::new()
    };

    MatchCard {
        fixture_id: info.id,
        league: LeagueBadge {
            name: fixture.league_name().to_string(),
            logo: fixture.league.logo.clone(),
            round: fixture.league.round.clone().unwrap_or_default(),
        },
        home: team_line(fixture, Side::Home),
        away: team_line(fixture, Side::Away),
        kickoff: kickoff_label(fixture, tz),
        status: status_label(fixture),
        venue: venue_label(fixture),
        referee: non_empty(info.referee.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| REFEREE_UNKNOWN.to_string()),
        events,
    }
}

pub fn score_label(fixture: &Fixture, side: Side) -> String {
    fixture
        .score_for(side)
        .map(|goals| goals.to_string())
        .unwrap_or_else(|| SCORE_PLACEHOLDER.to_string())
}

pub fn status_label(fixture: &Fixture) -> String {
    let status = &fixture.fixture.status;
    let mut text = status
        .long
        .clone()
        .or_else(|| status.short.clone())
        .unwrap_or_default();
    if let Some(elapsed) = status.elapsed.filter(|m| *m > 0) {
        text.push_str(&format!(" ({elapsed}')"));
    }
    text
}

pub fn venue_label(fixture: &Fixture) -> String {
    let venue = &fixture.fixture.venue;
    match (non_empty(venue.name.as_deref()), non_empty(venue.city.as_deref())) {
        (Some(name), Some(city)) => format!("{name} - {city}"),
        (Some(name), None) => name.to_string(),
        _ => VENUE_UNKNOWN.to_string(),
    }
}

fn kickoff_label<Tz>(fixture: &Fixture, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match fixture.kickoff() {
        Some(dt) => dt.with_timezone(tz).format(KICKOFF_FORMAT).to_string(),
        None => non_empty(fixture.fixture.date.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| DATE_UNKNOWN.to_string()),
    }
}

fn team_line(fixture: &Fixture, side: Side) -> TeamLine {
    let team = match side {
        Side::Home => &fixture.teams.home,
        Side::Away => &fixture.teams.away,
    };
    TeamLine {
        name: team.name.clone().unwrap_or_default(),
        logo: team.logo.clone(),
        score: score_label(fixture, side),
    }
}

fn event_line(event: &MatchEvent) -> EventLine {
    EventLine {
        minute: event
            .time
            .elapsed
            .filter(|m| *m > 0)
            .map(|m| format!("{m}'"))
            .unwrap_or_default(),
        kind: event.kind.clone().unwrap_or_default(),
        detail: event.detail.clone().unwrap_or_default(),
        player: non_empty(event.player.name.as_deref()).map(str::to_string),
        assist: non_empty(event.assist.name.as_deref()).map(str::to_string),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Case- and accent-insensitive ordering, falling back to code points so the
/// order stays total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(strip_accent)
        .collect()
}

fn strip_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ğ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'ı' => 'i',
        'ł' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ř' => 'r',
        'ś' | 'š' | 'ş' => 's',
        'ť' | 'ţ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::{CompetitionFilter, View, locale_cmp};

    #[test]
    fn locale_cmp_ignores_case_and_accents() {
        assert_eq!(locale_cmp("bundesliga", "Copa"), Ordering::Less);
        assert_eq!(locale_cmp("Équipe", "Eredivisie"), Ordering::Less);
        assert_eq!(locale_cmp("Süper Lig", "Swiss Super League"), Ordering::Less);
        assert_eq!(locale_cmp("Serie A", "Serie A"), Ordering::Equal);
    }

    #[test]
    fn view_params_round_trip_through_labels() {
        for view in View::ALL {
            assert_eq!(View::from_param(view.as_param()), Some(view));
        }
        assert_eq!(View::from_param("LIVE"), Some(View::Live));
        assert_eq!(View::from_param("tomorrow"), None);
    }

    #[test]
    fn competition_param_all_is_sentinel() {
        assert_eq!(CompetitionFilter::from_param("all"), CompetitionFilter::All);
        assert_eq!(CompetitionFilter::from_param(""), CompetitionFilter::All);
        assert_eq!(
            CompetitionFilter::from_param("Serie A"),
            CompetitionFilter::Named("Serie A".to_string())
        );
    }
}
