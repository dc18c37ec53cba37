use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const STATUS_NOT_STARTED: &str = "NS";
pub const STATUS_FULL_TIME: &str = "FT";

/// A single match record as returned by the fixtures API.
///
/// Every field is optional on the wire; nested objects that arrive as `null`
/// deserialize to their defaults so one sparse record never fails a whole
/// payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Fixture {
    #[serde(deserialize_with = "null_default")]
    pub fixture: FixtureInfo,
    #[serde(deserialize_with = "null_default")]
    pub league: League,
    #[serde(deserialize_with = "null_default")]
    pub teams: Teams,
    #[serde(deserialize_with = "null_default")]
    pub goals: ScoreLine,
    #[serde(deserialize_with = "null_default")]
    pub score: Score,
    #[serde(deserialize_with = "null_default")]
    pub events: Vec<MatchEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FixtureInfo {
    pub id: Option<u64>,
    pub date: Option<String>,
    pub referee: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub venue: Venue,
    #[serde(deserialize_with = "null_default")]
    pub status: FixtureStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FixtureStatus {
    pub short: Option<String>,
    pub long: Option<String>,
    pub elapsed: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Venue {
    pub name: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct League {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub logo: Option<String>,
    pub round: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub standings: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Teams {
    #[serde(deserialize_with = "null_default")]
    pub home: Team,
    #[serde(deserialize_with = "null_default")]
    pub away: Team,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Team {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScoreLine {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Score {
    #[serde(deserialize_with = "null_default")]
    pub fulltime: ScoreLine,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchEvent {
    #[serde(deserialize_with = "null_default")]
    pub time: EventTime,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub detail: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub player: Person,
    #[serde(deserialize_with = "null_default")]
    pub assist: Person,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EventTime {
    pub elapsed: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Person {
    pub id: Option<u64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl Fixture {
    pub fn status_short(&self) -> &str {
        self.fixture.status.short.as_deref().unwrap_or("")
    }

    pub fn league_name(&self) -> &str {
        self.league.name.as_deref().unwrap_or("")
    }

    pub fn is_not_started(&self) -> bool {
        self.status_short() == STATUS_NOT_STARTED
    }

    pub fn is_full_time(&self) -> bool {
        self.status_short() == STATUS_FULL_TIME
    }

    /// Goals first, then the full-time score.
    pub fn score_for(&self, side: Side) -> Option<u32> {
        match side {
            Side::Home => self.goals.home.or(self.score.fulltime.home),
            Side::Away => self.goals.away.or(self.score.fulltime.away),
        }
    }

    pub fn kickoff(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.fixture.date.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw).ok()
    }

    /// True when the kickoff falls on `day` as seen from `tz`.
    pub fn is_on_day<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> bool {
        self.kickoff()
            .map(|dt| dt.with_timezone(tz).date_naive() == day)
            .unwrap_or(false)
    }
}

/// Parses a `{ "response": [...] }` body from the proxy.
///
/// A body without a `response` array is an error: the proxy's own
/// `{ "error": ... }` body surfaces its message, anything else is reported as
/// an unexpected shape. Array entries that are not fixture objects are
/// skipped.
pub fn parse_fixtures_json(raw: &str) -> Result<Vec<Fixture>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow::anyhow!("empty fixtures payload"));
    }

    let root: Value = serde_json::from_str(trimmed).context("invalid fixtures json")?;
    match root.get("response") {
        Some(Value::Array(items)) => Ok(fixtures_from_items(items)),
        _ => {
            if let Some(msg) = root.get("error").and_then(|v| v.as_str()) {
                return Err(anyhow::anyhow!("proxy error: {msg}"));
            }
            Err(anyhow::anyhow!("fixtures payload has no response array"))
        }
    }
}

/// Decodes every entry that looks like a fixture, skipping the rest.
pub fn fixtures_from_items(items: &[Value]) -> Vec<Fixture> {
    items
        .iter()
        .filter_map(|item| serde_json::from_value::<Fixture>(item.clone()).ok())
        .collect()
}

fn null_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
