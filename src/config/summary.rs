use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Summary image configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SummaryConfig {
    /// Directory holding `summary.png`. Created on first render.
    /// TOML: `summary.cache_dir`. Default: `cache`.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Extra font directory loaded on top of the system fonts.
    /// TOML: `summary.font_dir`. Default: unset.
    #[serde(default)]
    pub font_dir: Option<PathBuf>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            font_dir: None,
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}
