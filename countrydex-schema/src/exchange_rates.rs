use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Exchange-rate feed (`/v6/latest/<BASE>`), keyed by ISO currency code.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExchangeRateFeed {
    /// `"success"` on a healthy response; absent on some mirrors.
    #[serde(default)]
    pub result: Option<String>,

    #[serde(default)]
    pub base_code: Option<String>,

    #[serde(default)]
    pub time_last_update_utc: Option<String>,

    #[serde(default)]
    pub rates: HashMap<String, f64>,
}

impl ExchangeRateFeed {
    /// A feed without a `result` field is accepted as long as it carries rates.
    pub fn is_success(&self) -> bool {
        self.result
            .as_deref()
            .is_none_or(|r| r.eq_ignore_ascii_case("success"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_rate_feed() {
        let feed: ExchangeRateFeed = serde_json::from_value(json!({
            "result": "success",
            "base_code": "USD",
            "rates": { "USD": 1, "NGN": 1600.5, "EUR": 0.92 }
        }))
        .expect("feed deserializes");
        assert!(feed.is_success());
        assert_eq!(feed.rates.get("USD").copied(), Some(1.0));
        assert_eq!(feed.rates.len(), 3);
    }

    #[test]
    fn error_result_is_not_success() {
        let feed: ExchangeRateFeed =
            serde_json::from_value(json!({ "result": "error", "error-type": "unsupported-code" }))
                .expect("feed deserializes");
        assert!(!feed.is_success());
        assert!(feed.rates.is_empty());
    }
}
