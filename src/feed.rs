use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use anyhow::Context;

use crate::board::FeedKind;
use crate::config::ClientConfig;
use crate::fixture::parse_fixtures_json;
use crate::http_client::fetch_text;
use crate::state::{Delta, ProviderCommand, feed_label};

/// Runs the provider loop on its own thread. Every fetch gets a worker thread
/// of its own, so live and scheduled requests overlap and finish in any
/// order.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>, cfg: ClientConfig) {
    thread::spawn(move || {
        for cmd in cmd_rx.iter() {
            match cmd {
                ProviderCommand::Fetch { feed, generation } => {
                    let url = match feed {
                        FeedKind::Live => cfg.live_url(),
                        FeedKind::Scheduled => cfg.scheduled_url(),
                    };
                    let tx = tx.clone();
                    thread::spawn(move || run_fetch(&tx, feed, generation, &url));
                }
            }
        }
    });
}

fn run_fetch(tx: &Sender<Delta>, feed: FeedKind, generation: u64, url: &str) {
    let result = fetch_text(url).and_then(|(status, body)| {
        if !status.is_success() {
            let _ = tx.send(Delta::Log(format!(
                "[WARN] {} fixtures: proxy returned http {status}",
                feed_label(feed)
            )));
        }
        parse_fixtures_json(&body).with_context(|| format!("http {status}"))
    });
    let delta = match result {
        Ok(fixtures) => Delta::FixturesLoaded {
            feed,
            generation,
            fixtures,
        },
        Err(err) => Delta::FixturesFailed {
            feed,
            generation,
            reason: format!("{err:#}"),
        },
    };
    let _ = tx.send(delta);
}
