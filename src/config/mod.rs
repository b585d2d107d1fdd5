mod basic;
mod summary;
mod upstream;

pub use basic::BasicConfig;
pub use summary::SummaryConfig;
pub use upstream::{GatewayConfig, UpstreamConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::LazyLock};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Country directory and exchange-rate endpoints (see `upstream` table in config.toml).
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Summary image output (see `summary` table in config.toml).
    #[serde(default)]
    pub summary: SummaryConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "COUNTRYDEX_";

impl Config {
    /// Builds a Figment that merges defaults, an optional config TOML file and
    /// `COUNTRYDEX_`-prefixed environment variables (`__` separates tables).
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads configuration from all sources and validates it.
    pub fn load() -> Self {
        let cfg: Self = Self::figment().extract().unwrap_or_else(|err| {
            panic!("failed to extract configuration (defaults + {DEFAULT_CONFIG_FILE} + env): {err}")
        });
        if cfg.basic.database_url.trim().is_empty() {
            panic!("basic.database_url must be set and non-empty");
        }
        if cfg.upstream.timeout_secs == 0 {
            panic!("upstream.timeout_secs must be greater than zero");
        }
        cfg
    }

    pub fn gateway(&self) -> GatewayConfig {
        self.upstream.resolve()
    }
}

/// Global, lazily-initialized configuration instance.
pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::load);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_extract_cleanly() {
        let cfg: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .extract()
            .expect("defaults extract");
        assert_eq!(cfg.basic.listen_port, 3000);
        assert_eq!(cfg.upstream.timeout_secs, 15);
        assert!(!cfg.upstream.accept_invalid_certs);
        assert_eq!(cfg.summary.cache_dir, PathBuf::from("cache"));
    }

    #[test]
    fn toml_overrides_nested_tables() {
        let cfg: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                r#"
                [basic]
                listen_port = 8080

                [upstream]
                timeout_secs = 3
                rates_url = "http://127.0.0.1:9000/latest/EUR"
                "#,
            ))
            .extract()
            .expect("toml extracts");
        assert_eq!(cfg.basic.listen_port, 8080);
        assert_eq!(cfg.upstream.timeout_secs, 3);
        assert_eq!(
            cfg.upstream.rates_url.as_str(),
            "http://127.0.0.1:9000/latest/EUR"
        );
        assert_eq!(cfg.basic.loglevel, "info");
    }
}
