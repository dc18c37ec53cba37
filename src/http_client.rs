use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const REQUEST_TIMEOUT_SECS: u64 = 10;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client for the terminal side; worker threads reuse its
/// connection pool.
pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// GETs `url` and returns the status together with the body text, whatever
/// the status; the proxy reports failures in a JSON body.
pub fn fetch_text(url: &str) -> Result<(reqwest::StatusCode, String)> {
    let client = http_client()?;
    let resp = client.get(url).send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    Ok((status, body))
}
