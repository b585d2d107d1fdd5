use super::input::CreateCountryInput;
use crate::db::{CountryStore, DbCountry, ListFilter, ListSort, StoreStatus};
use crate::error::{CountrydexError, SUMMARY_NOT_FOUND};
use crate::estimator::MultiplierSource;
use crate::providers::CountrySource;
use crate::refresh::{RefreshHandle, RefreshOutcome, RefreshPipeline};
use crate::render::SummaryRenderer;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Listing projection: numeric fields never serialize as `null`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CountryListItem {
    pub id: i64,
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: f64,
    pub estimated_gdp: f64,
    pub flag_url: Option<String>,
    pub last_refreshed_at: DateTime<Utc>,
}

impl From<DbCountry> for CountryListItem {
    fn from(c: DbCountry) -> Self {
        Self {
            id: c.id,
            name: c.name,
            capital: c.capital,
            region: c.region,
            population: c.population.max(0),
            currency_code: c.currency_code,
            exchange_rate: c.exchange_rate.unwrap_or(0.0),
            estimated_gdp: c.estimated_gdp.unwrap_or(0.0),
            flag_url: c.flag_url,
            last_refreshed_at: c.last_refreshed_at,
        }
    }
}

/// Operations exposed to the HTTP layer.
#[derive(Clone)]
pub struct CountryService {
    store: CountryStore,
    refresh: RefreshHandle,
    renderer: SummaryRenderer,
}

impl CountryService {
    pub fn new(store: CountryStore, refresh: RefreshHandle, renderer: SummaryRenderer) -> Self {
        Self {
            store,
            refresh,
            renderer,
        }
    }

    /// Wires a refresh pipeline over `source` and spawns its actor.
    pub async fn spawn(
        store: CountryStore,
        source: Arc<dyn CountrySource>,
        renderer: SummaryRenderer,
        multiplier: Arc<dyn MultiplierSource>,
    ) -> Result<Self, CountrydexError> {
        let pipeline = RefreshPipeline::new(source, store.clone(), renderer.clone(), multiplier);
        let refresh = crate::refresh::spawn(pipeline).await?;
        Ok(Self::new(store, refresh, renderer))
    }

    pub fn store(&self) -> &CountryStore {
        &self.store
    }

    pub async fn create_country(
        &self,
        input: CreateCountryInput,
    ) -> Result<DbCountry, CountrydexError> {
        let create = input.validate()?;
        let row = self.store.create(create).await?;
        info!(id = row.id, name = %row.name, "Country created explicitly");
        Ok(row)
    }

    pub async fn refresh(&self) -> Result<RefreshOutcome, CountrydexError> {
        self.refresh.refresh().await
    }

    pub async fn list_countries(
        &self,
        region: Option<String>,
        currency_code: Option<String>,
        sort: Option<&str>,
    ) -> Result<Vec<CountryListItem>, CountrydexError> {
        let filter = ListFilter {
            region: region.filter(|r| !r.is_empty()),
            currency_code: currency_code.filter(|c| !c.is_empty()),
            sort: ListSort::parse(sort),
        };
        let rows = self.store.list(&filter).await?;
        Ok(rows.into_iter().map(CountryListItem::from).collect())
    }

    pub async fn get_country(&self, name: &str) -> Result<DbCountry, CountrydexError> {
        self.store
            .find_by_name(name)
            .await?
            .ok_or_else(CountrydexError::country_not_found)
    }

    pub async fn delete_country(&self, name: &str) -> Result<(), CountrydexError> {
        if self.store.delete_by_name(name).await? {
            info!(name, "Country deleted");
            Ok(())
        } else {
            Err(CountrydexError::country_not_found())
        }
    }

    pub async fn status(&self) -> Result<StoreStatus, CountrydexError> {
        self.store.status().await
    }

    pub async fn summary_artifact_path(&self) -> Result<PathBuf, CountrydexError> {
        self.renderer
            .existing_artifact()
            .await
            .ok_or(CountrydexError::NotFound(SUMMARY_NOT_FOUND))
    }
}
