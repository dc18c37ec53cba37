//! Fixtures proxy.
//!
//! Forwards the live and scheduled fixture queries to the upstream API with
//! the key attached, serves static assets and the HTML board.
//!
//! ```bash
//! FOOTBALL_API_KEY=... PORT=3000 proxy
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matchday::config::{ProxyConfig, load_dotenv};
use matchday::proxy;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matchday=info,proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ProxyConfig::from_env();
    proxy::serve(&cfg).await
}
