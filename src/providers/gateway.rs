use super::{UPSTREAM_BODY_PREVIEW_CHARS, UpstreamSnapshot};
use crate::config::GatewayConfig;
use crate::error::CountrydexError;
use async_trait::async_trait;
use countrydex_schema::{ExchangeRateFeed, RestCountryEntry};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};
use url::Url;

/// Produces one consistent snapshot of both upstream datasets.
#[async_trait]
pub trait CountrySource: Send + Sync {
    /// Fails as a whole if either dataset cannot be fetched; no partial snapshot is returned.
    async fn fetch(&self) -> Result<UpstreamSnapshot, CountrydexError>;
}

/// HTTP implementation backed by a single `reqwest::Client`.
pub struct HttpGateway {
    client: reqwest::Client,
    countries_url: Url,
    rates_url: Url,
    timeout: Duration,
}

impl HttpGateway {
    pub fn new(cfg: GatewayConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .default_headers(cfg.headers.clone())
            .connect_timeout(cfg.timeout)
            .timeout(cfg.timeout)
            .danger_accept_invalid_certs(cfg.accept_invalid_certs);

        builder = match cfg.proxy.as_ref() {
            Some(proxy_url) => builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?),
            None => builder.no_proxy(),
        };

        Ok(Self {
            client: builder.build()?,
            countries_url: cfg.countries_url,
            rates_url: cfg.rates_url,
            timeout: cfg.timeout,
        })
    }

    async fn get_json<T>(&self, url: &Url) -> Result<T, CountrydexError>
    where
        T: DeserializeOwned,
    {
        let unavailable = |cause: String| CountrydexError::UpstreamUnavailable {
            endpoint: url.to_string(),
            cause,
        };

        let start = Instant::now();
        let resp = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, timeout = e.is_timeout(), error = %e, "Upstream request failed");
                unavailable(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body_preview = match resp.text().await {
                Ok(raw_body) => format!("{:.len$}", raw_body, len = UPSTREAM_BODY_PREVIEW_CHARS),
                Err(e) => format!("<failed to read body: {e}>"),
            };
            error!(url = %url, %status, body = %body_preview, "Upstream returned non-success status");
            return Err(unavailable(format!("upstream status {status}")));
        }

        let parsed = resp.json::<T>().await.map_err(|e| {
            error!(url = %url, error = %e, "Upstream payload could not be decoded");
            unavailable(e.to_string())
        })?;

        debug!(
            url = %url,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Upstream fetch complete"
        );
        Ok(parsed)
    }
}

#[async_trait]
impl CountrySource for HttpGateway {
    async fn fetch(&self) -> Result<UpstreamSnapshot, CountrydexError> {
        let (entries, feed) = tokio::try_join!(
            self.get_json::<Vec<RestCountryEntry>>(&self.countries_url),
            self.get_json::<ExchangeRateFeed>(&self.rates_url),
        )?;

        if !feed.is_success() {
            error!(
                url = %self.rates_url,
                result = feed.result.as_deref().unwrap_or("-"),
                "Exchange-rate feed reported failure"
            );
            return Err(CountrydexError::UpstreamUnavailable {
                endpoint: self.rates_url.to_string(),
                cause: format!(
                    "rate feed result {:?}",
                    feed.result.as_deref().unwrap_or_default()
                ),
            });
        }

        let base = feed.base_code.clone().unwrap_or_else(|| "-".to_string());
        let snapshot = UpstreamSnapshot::from_wire(entries, feed);
        if snapshot.rates.is_empty() {
            warn!(url = %self.rates_url, "Exchange-rate feed carried no rates");
        }
        debug!(
            countries = snapshot.countries.len(),
            rates = snapshot.rates.len(),
            base = %base,
            "Upstream snapshot fetched"
        );
        Ok(snapshot)
    }
}
