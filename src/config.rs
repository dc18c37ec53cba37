use std::env;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_API_BASE: &str = "https://v3.football.api-sports.io";
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3000";

/// Loads `.env.local` then `.env`; values already in the environment win.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
    pub api_base: String,
    pub static_dir: PathBuf,
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|val| val.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let host = env_string("BIND_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let api_key = env_string("FOOTBALL_API_KEY");
        let api_base = env_string("FOOTBALL_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let static_dir = env_string("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        Self {
            host,
            port,
            api_key,
            api_base,
            static_dir,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub proxy_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let proxy_url = env_string("PROXY_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_PROXY_URL.to_string());
        Self { proxy_url }
    }

    pub fn live_url(&self) -> String {
        format!("{}/api/live-fixtures", self.proxy_url)
    }

    pub fn scheduled_url(&self) -> String {
        format!("{}/api/scheduled-fixtures", self.proxy_url)
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
