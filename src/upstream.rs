//! Client for the upstream fixtures API, used by the proxy.
//!
//! The live body is handed back as the upstream bytes so the endpoint can
//! forward it untouched; only the scheduled endpoint reshapes anything.

use anyhow::Context;
use axum::body::Bytes;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::IgnoredAny;
use serde_json::{Value, json};
use thiserror::Error;

use crate::config::ProxyConfig;
use crate::fixture::{Fixture, fixtures_from_items};

pub const API_KEY_HEADER: &str = "x-apisports-key";
const USER_AGENT: &str = concat!("matchday/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("body from {url} is not valid json: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct FixturesApi {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl FixturesApi {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build upstream http client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(cfg: &ProxyConfig) -> anyhow::Result<Self> {
        Self::new(cfg.api_base.clone(), cfg.api_key.clone())
    }

    /// `fixtures?live=all`, decoded.
    pub async fn live_fixtures(&self) -> Result<Value, UpstreamError> {
        let url = self.live_url();
        let body = self.get_bytes(&url).await?;
        decode_json(&url, &body)
    }

    /// `fixtures?live=all` as the exact upstream bytes, once they are known
    /// to be JSON.
    pub async fn live_fixtures_raw(&self) -> Result<Bytes, UpstreamError> {
        let url = self.live_url();
        let body = self.get_bytes(&url).await?;
        serde_json::from_slice::<IgnoredAny>(&body).map_err(|source| UpstreamError::Decode {
            url: url.clone(),
            source,
        })?;
        Ok(body)
    }

    fn live_url(&self) -> String {
        format!("{}/fixtures?live=all", self.base_url)
    }

    pub async fn fixtures_on(&self, date: NaiveDate) -> Result<Value, UpstreamError> {
        let url = format!("{}/fixtures?date={}", self.base_url, format_date(date));
        let body = self.get_bytes(&url).await?;
        decode_json(&url, &body)
    }

    /// Fixtures for `today` followed by the day before, as one `{response}`
    /// payload. The two calls run one after the other; either failing fails
    /// the whole fetch.
    pub async fn scheduled_fixtures(&self, today: NaiveDate) -> Result<Value, UpstreamError> {
        let today_body = self.fixtures_on(today).await?;
        let yesterday_body = self.fixtures_on(previous_day(today)).await?;
        Ok(merge_responses(&today_body, &yesterday_body))
    }

    async fn get_bytes(&self, url: &str) -> Result<Bytes, UpstreamError> {
        tracing::debug!(%url, "upstream request");
        let mut req = self.client.get(url);
        if let Some(key) = self.api_key.as_deref() {
            req = req.header(API_KEY_HEADER, key);
        }
        let resp = req.send().await.map_err(|source| UpstreamError::Request {
            url: url.to_string(),
            source,
        })?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "upstream returned non-success status");
        }
        resp.bytes().await.map_err(|source| UpstreamError::Request {
            url: url.to_string(),
            source,
        })
    }
}

fn decode_json(url: &str, body: &[u8]) -> Result<Value, UpstreamError> {
    serde_json::from_slice(body).map_err(|source| UpstreamError::Decode {
        url: url.to_string(),
        source,
    })
}

/// `response` entries of an upstream body; anything missing or malformed is
/// treated as no entries.
pub fn response_items(payload: &Value) -> &[Value] {
    payload
        .get("response")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn merge_responses(first: &Value, second: &Value) -> Value {
    let merged: Vec<Value> = response_items(first)
        .iter()
        .chain(response_items(second))
        .cloned()
        .collect();
    json!({ "response": merged })
}

pub fn decode_fixtures(payload: &Value) -> Vec<Fixture> {
    fixtures_from_items(response_items(payload))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn previous_day(day: NaiveDate) -> NaiveDate {
    day.pred_opt().unwrap_or(day)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::{format_date, merge_responses, previous_day, response_items};

    #[test]
    fn merge_keeps_today_before_yesterday() {
        let today = json!({ "response": [{ "id": "A" }, { "id": "B" }] });
        let yesterday = json!({ "response": [{ "id": "C" }] });
        let merged = merge_responses(&today, &yesterday);
        assert_eq!(
            merged,
            json!({ "response": [{ "id": "A" }, { "id": "B" }, { "id": "C" }] })
        );
    }

    #[test]
    fn merge_treats_missing_or_malformed_response_as_empty() {
        let today = json!({ "errors": { "token": "bad" } });
        let yesterday = json!({ "response": "nope" });
        assert_eq!(merge_responses(&today, &yesterday), json!({ "response": [] }));

        let partial = json!({ "response": [1] });
        assert_eq!(merge_responses(&today, &partial), json!({ "response": [1] }));
        assert!(response_items(&json!(null)).is_empty());
    }

    #[test]
    fn dates_are_zero_padded() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date");
        assert_eq!(format_date(day), "2026-03-01");
        assert_eq!(format_date(previous_day(day)), "2026-02-28");
    }

    #[test]
    fn previous_day_crosses_year_boundary() {
        let day = NaiveDate::from_ymd_opt(2027, 1, 1).expect("valid date");
        assert_eq!(
            previous_day(day),
            NaiveDate::from_ymd_opt(2026, 12, 31).expect("valid date")
        );
    }
}
