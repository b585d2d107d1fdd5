use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

pub static DEFAULT_COUNTRIES_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse(
        "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies",
    )
    .expect("valid country directory URL")
});

pub static DEFAULT_RATES_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://open.er-api.com/v6/latest/USD").expect("valid exchange-rate URL")
});

/// Upstream endpoint configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Country directory endpoint.
    /// TOML: `upstream.countries_url`.
    #[serde(default = "default_countries_url")]
    pub countries_url: Url,

    /// Exchange-rate endpoint.
    /// TOML: `upstream.rates_url`.
    #[serde(default = "default_rates_url")]
    pub rates_url: Url,

    /// Per-request timeout applied to each of the two fetches.
    /// TOML: `upstream.timeout_secs`. Default: `15`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Skip TLS certificate verification (corporate MITM proxies only).
    /// TOML: `upstream.accept_invalid_certs`. Default: `false`.
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Optional upstream HTTP proxy.
    /// TOML: `upstream.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// User-Agent sent to both upstreams.
    /// TOML: `upstream.user_agent`.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Fully resolved settings handed to the gateway constructor.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub countries_url: Url,
    pub rates_url: Url,
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
    pub proxy: Option<Url>,
    pub user_agent: String,
    pub headers: HeaderMap,
}

impl UpstreamConfig {
    pub fn resolve(&self) -> GatewayConfig {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        GatewayConfig {
            countries_url: self.countries_url.clone(),
            rates_url: self.rates_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            accept_invalid_certs: self.accept_invalid_certs,
            proxy: self.proxy.clone(),
            user_agent: self.user_agent.clone(),
            headers,
        }
    }
}

impl GatewayConfig {
    /// Config pointing at explicit endpoints with default transport settings.
    pub fn new(countries_url: Url, rates_url: Url) -> Self {
        UpstreamConfig {
            countries_url,
            rates_url,
            ..UpstreamConfig::default()
        }
        .resolve()
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            countries_url: default_countries_url(),
            rates_url: default_rates_url(),
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: false,
            proxy: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_countries_url() -> Url {
    DEFAULT_COUNTRIES_URL.clone()
}

fn default_rates_url() -> Url {
    DEFAULT_RATES_URL.clone()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("countrydex/{}", env!("CARGO_PKG_VERSION"))
}
