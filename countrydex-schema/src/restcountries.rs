use serde::{Deserialize, Serialize};

/// One entry of the country directory (`/v2/all?fields=...`).
///
/// Every field is optional on the wire; defaults are applied by the consumer.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RestCountryEntry {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub capital: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub population: Option<i64>,

    /// Flag image URL (SVG on the v2 API).
    #[serde(default)]
    pub flag: Option<String>,

    /// Declared currencies in upstream order. The first entry is authoritative.
    #[serde(default)]
    pub currencies: Option<Vec<RestCurrency>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RestCurrency {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl RestCountryEntry {
    /// Code of the first declared currency, if the upstream listed one.
    pub fn first_currency_code(&self) -> Option<&str> {
        self.currencies
            .as_deref()
            .and_then(<[RestCurrency]>::first)
            .and_then(|c| c.code.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tolerates_missing_fields() {
        let entry: RestCountryEntry =
            serde_json::from_value(json!({ "name": "Antarctica" })).expect("entry deserializes");
        assert_eq!(entry.name.as_deref(), Some("Antarctica"));
        assert!(entry.population.is_none());
        assert!(entry.first_currency_code().is_none());
    }

    #[test]
    fn first_currency_wins() {
        let entry: RestCountryEntry = serde_json::from_value(json!({
            "name": "Zimbabwe",
            "population": 14240168,
            "currencies": [
                { "code": "BWP", "name": "Botswana pula", "symbol": "P" },
                { "code": "GBP" },
                { "code": "USD" }
            ]
        }))
        .expect("entry deserializes");
        assert_eq!(entry.first_currency_code(), Some("BWP"));
    }
}
