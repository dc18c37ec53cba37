use std::collections::VecDeque;
use std::fmt::Display;

use chrono::{DateTime, TimeZone};

use crate::board::{
    Board, CompetitionFilter, Feed, FeedKind, FeedStatus, View, ViewState, build_board,
    competition_options,
};
use crate::fixture::Fixture;

#[derive(Debug, Clone)]
pub struct AppState {
    pub selection: ViewState,
    pub live: Feed,
    pub scheduled: Feed,
    pub competitions: Vec<CompetitionFilter>,
    // Bumped on every refresh; results tagged with an older value are dropped.
    pub generation: u64,
    pub selected: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            selection: ViewState::default(),
            live: Feed::default(),
            scheduled: Feed::default(),
            competitions: vec![CompetitionFilter::All],
            generation: 0,
            selected: 0,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn feed(&self, kind: FeedKind) -> &Feed {
        match kind {
            FeedKind::Live => &self.live,
            FeedKind::Scheduled => &self.scheduled,
        }
    }

    fn feed_mut(&mut self, kind: FeedKind) -> &mut Feed {
        match kind {
            FeedKind::Live => &mut self.live,
            FeedKind::Scheduled => &mut self.scheduled,
        }
    }

    pub fn board<Tz>(&self, now: &DateTime<Tz>) -> Board
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        build_board(&self.selection, &self.live, &self.scheduled, now)
    }

    /// Returns true when the view actually changed.
    pub fn set_view(&mut self, view: View) -> bool {
        if self.selection.view == view {
            return false;
        }
        self.selection.view = view;
        self.selected = 0;
        true
    }

    pub fn cycle_competition(&mut self, forward: bool) {
        let total = self.competitions.len();
        if total == 0 {
            self.selection.competition = CompetitionFilter::All;
            return;
        }
        let current = self
            .competitions
            .iter()
            .position(|c| *c == self.selection.competition)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % total
        } else {
            (current + total - 1) % total
        };
        self.selection.competition = self.competitions[next].clone();
        self.selected = 0;
    }

    pub fn reset_competition(&mut self) -> bool {
        if self.selection.competition == CompetitionFilter::All {
            return false;
        }
        self.selection.competition = CompetitionFilter::All;
        self.selected = 0;
        true
    }

    /// Starts a new fetch round and returns its generation.
    pub fn begin_refresh(&mut self) -> u64 {
        self.generation += 1;
        for feed in [&mut self.live, &mut self.scheduled] {
            feed.status = FeedStatus::Pending;
        }
        self.generation
    }

    /// Rebuilds the competition list from both collections. A selection that
    /// no longer exists falls back to `All`; returns true in that case.
    pub fn refresh_competitions(&mut self) -> bool {
        self.competitions =
            competition_options(self.live.fixtures.iter().chain(self.scheduled.fixtures.iter()));
        if self.competitions.contains(&self.selection.competition) {
            return false;
        }
        self.selection.competition = CompetitionFilter::All;
        self.selected = 0;
        true
    }

    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self, total: usize) {
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = if self.selected == 0 {
            total - 1
        } else {
            self.selected - 1
        };
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    FixturesLoaded {
        feed: FeedKind,
        generation: u64,
        fixtures: Vec<Fixture>,
    },
    FixturesFailed {
        feed: FeedKind,
        generation: u64,
        reason: String,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    Fetch { feed: FeedKind, generation: u64 },
}

/// Applies a provider result. Returns true when the board for the active
/// view has to be rebuilt.
pub fn apply_delta(state: &mut AppState, delta: Delta) -> bool {
    match delta {
        Delta::FixturesLoaded {
            feed,
            generation,
            fixtures,
        } => {
            if generation < state.generation {
                state.push_log(format!(
                    "[INFO] Dropped stale {} fixtures (round {generation})",
                    feed_label(feed)
                ));
                return false;
            }
            let count = fixtures.len();
            state.feed_mut(feed).replace(fixtures);
            state.push_log(format!("[INFO] {} fixtures: {count}", feed_label(feed)));
            let reset = state.refresh_competitions();
            if reset {
                state.push_log("[INFO] Selected competition gone, showing all");
            }
            reset || state.selection.view.depends_on(feed)
        }
        Delta::FixturesFailed {
            feed,
            generation,
            reason,
        } => {
            if generation < state.generation {
                return false;
            }
            state.push_log(format!(
                "[WARN] {} fetch error: {reason}",
                feed_label(feed)
            ));
            state.feed_mut(feed).mark_unavailable(reason);
            state.selection.view.depends_on(feed)
        }
        Delta::Log(msg) => {
            state.push_log(msg);
            false
        }
    }
}

pub fn feed_label(feed: FeedKind) -> &'static str {
    match feed {
        FeedKind::Live => "Live",
        FeedKind::Scheduled => "Scheduled",
    }
}

pub fn feed_status_label(feed: &Feed) -> String {
    match &feed.status {
        FeedStatus::Pending if feed.loaded => format!("{} (refreshing)", feed.fixtures.len()),
        FeedStatus::Pending => "loading".to_string(),
        FeedStatus::Ready => feed.fixtures.len().to_string(),
        FeedStatus::Unavailable(_) if feed.loaded => format!("{} (stale)", feed.fixtures.len()),
        FeedStatus::Unavailable(_) => "unavailable".to_string(),
    }
}
