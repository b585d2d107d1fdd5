use countrydex_schema::{ExchangeRateFeed, RestCountryEntry};
use std::collections::HashMap;
use tracing::warn;

/// Currency code -> units per base currency, as published by the rate feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable(HashMap<String, f64>);

impl RateTable {
    pub fn get(&self, code: &str) -> Option<f64> {
        self.0.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<ExchangeRateFeed> for RateTable {
    fn from(feed: ExchangeRateFeed) -> Self {
        Self(feed.rates)
    }
}

/// A country directory entry after boundary validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCountry {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    /// Never negative; absent upstream values become 0.
    pub population: i64,
    pub flag_url: Option<String>,
    /// First declared currency only.
    pub currency_code: Option<String>,
}

impl RawCountry {
    /// Applies the default-substitution rules. Returns `None` for entries without a usable name.
    pub fn from_entry(entry: RestCountryEntry) -> Option<Self> {
        let currency_code = non_blank(entry.first_currency_code().map(str::to_string));
        let name = non_blank(entry.name)?;

        Some(Self {
            name,
            capital: non_blank(entry.capital),
            region: non_blank(entry.region),
            population: entry.population.unwrap_or(0).max(0),
            flag_url: non_blank(entry.flag),
            currency_code,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Both upstream datasets, fetched together.
#[derive(Debug, Clone, Default)]
pub struct UpstreamSnapshot {
    pub countries: Vec<RawCountry>,
    pub rates: RateTable,
}

impl UpstreamSnapshot {
    pub fn from_wire(entries: Vec<RestCountryEntry>, feed: ExchangeRateFeed) -> Self {
        let total = entries.len();
        let countries: Vec<RawCountry> = entries
            .into_iter()
            .filter_map(RawCountry::from_entry)
            .collect();

        let dropped = total - countries.len();
        if dropped > 0 {
            warn!(dropped, total, "Country directory entries without a name were skipped");
        }

        Self {
            countries,
            rates: feed.into(),
        }
    }
}
