use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbCountry {
    pub id: i64,
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    /// `Some(0.0)` when the country declares no currency; `None` when no rate was resolvable.
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
    pub last_refreshed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One record written by a refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryUpsert {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
    pub last_refreshed_at: DateTime<Utc>,
}

/// A validated explicit create request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryCreate {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: String,
    pub flag_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListSort {
    /// Name ascending, case-sensitive ordinal.
    #[default]
    Name,
    /// Estimated GDP descending, unknown GDP last.
    GdpDesc,
}

impl ListSort {
    /// `"gdp_desc"` selects GDP ordering; any other value falls back to name ordering.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("gdp_desc") => Self::GdpDesc,
            _ => Self::Name,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub region: Option<String>,
    pub currency_code: Option<String>,
    pub sort: ListSort,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreStatus {
    pub total_countries: i64,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::ListSort;

    #[test]
    fn sort_parsing_falls_back_to_name() {
        assert_eq!(ListSort::parse(Some("gdp_desc")), ListSort::GdpDesc);
        assert_eq!(ListSort::parse(Some(" gdp_desc ")), ListSort::GdpDesc);
        assert_eq!(ListSort::parse(Some("GDP_DESC")), ListSort::Name);
        assert_eq!(ListSort::parse(Some("population")), ListSort::Name);
        assert_eq!(ListSort::parse(None), ListSort::Name);
    }
}
