use crate::db::{CountryStore, CountryUpsert};
use crate::error::CountrydexError;
use crate::estimator::{MultiplierSource, estimate};
use crate::providers::{CountrySource, UpstreamSnapshot};
use crate::render::SummaryRenderer;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Refresh state machine. Any failure before `Rendering` returns to `Idle` without
/// leaving partial writes behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    Fetching,
    Computing,
    Committing,
    Rendering,
    Done,
}

impl RefreshPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            RefreshPhase::Idle => "idle",
            RefreshPhase::Fetching => "fetching",
            RefreshPhase::Computing => "computing",
            RefreshPhase::Committing => "committing",
            RefreshPhase::Rendering => "rendering",
            RefreshPhase::Done => "done",
        }
    }
}

/// Result of one successful refresh. Serializes as `{"success":true,"last_refreshed_at":...}`.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    pub success: bool,
    /// Commit timestamp written to every refreshed record.
    pub last_refreshed_at: DateTime<Utc>,
    #[serde(skip)]
    pub countries_processed: usize,
    /// `false` when the summary image could not be regenerated.
    #[serde(skip)]
    pub summary_rendered: bool,
}

/// Country fields plus derived economics, awaiting a commit timestamp.
struct Computed {
    name: String,
    capital: Option<String>,
    region: Option<String>,
    population: i64,
    currency_code: Option<String>,
    exchange_rate: Option<f64>,
    estimated_gdp: Option<f64>,
    flag_url: Option<String>,
}

impl Computed {
    fn into_upsert(self, last_refreshed_at: DateTime<Utc>) -> CountryUpsert {
        CountryUpsert {
            name: self.name,
            capital: self.capital,
            region: self.region,
            population: self.population,
            currency_code: self.currency_code,
            exchange_rate: self.exchange_rate,
            estimated_gdp: self.estimated_gdp,
            flag_url: self.flag_url,
            last_refreshed_at,
        }
    }
}

pub struct RefreshPipeline {
    source: Arc<dyn CountrySource>,
    store: CountryStore,
    renderer: SummaryRenderer,
    multiplier: Arc<dyn MultiplierSource>,
}

impl RefreshPipeline {
    pub fn new(
        source: Arc<dyn CountrySource>,
        store: CountryStore,
        renderer: SummaryRenderer,
        multiplier: Arc<dyn MultiplierSource>,
    ) -> Self {
        Self {
            source,
            store,
            renderer,
            multiplier,
        }
    }

    /// Runs one full fetch -> compute -> commit -> render cycle.
    ///
    /// Success is decided by the commit; a render failure is logged and reported through
    /// `summary_rendered` only.
    pub async fn run(&self) -> Result<RefreshOutcome, CountrydexError> {
        let start = Instant::now();

        enter(RefreshPhase::Fetching);
        let snapshot = self.source.fetch().await.inspect_err(|e| {
            error!(error = %e, "Refresh aborted before any write");
            enter(RefreshPhase::Idle);
        })?;

        enter(RefreshPhase::Computing);
        let computed = self.compute(snapshot);
        let countries_processed = computed.len();

        enter(RefreshPhase::Committing);
        let last_refreshed_at = Utc::now();
        let records: Vec<CountryUpsert> = computed
            .into_iter()
            .map(|c| c.into_upsert(last_refreshed_at))
            .collect();

        if let Err(e) = self.commit(&records).await {
            error!(error = %e, count = records.len(), "Refresh commit failed, rolled back");
            enter(RefreshPhase::Idle);
            return Err(CountrydexError::RefreshFailed(e.to_string()));
        }

        enter(RefreshPhase::Rendering);
        let summary_rendered = match self.renderer.render(&self.store).await {
            Ok(_) => true,
            Err(e) => {
                warn!(
                    error = %e,
                    path = %self.renderer.artifact_path().display(),
                    "Summary image render failed; refresh still committed"
                );
                false
            }
        };

        enter(RefreshPhase::Done);
        info!(
            count = countries_processed,
            last_refreshed_at = %last_refreshed_at,
            summary_rendered,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Countries refreshed"
        );

        Ok(RefreshOutcome {
            success: true,
            last_refreshed_at,
            countries_processed,
            summary_rendered,
        })
    }

    fn compute(&self, snapshot: UpstreamSnapshot) -> Vec<Computed> {
        let UpstreamSnapshot { countries, rates } = snapshot;
        countries
            .into_iter()
            .map(|raw| {
                let est = estimate(
                    raw.population,
                    raw.currency_code.as_deref(),
                    &rates,
                    self.multiplier.as_ref(),
                );
                Computed {
                    name: raw.name,
                    capital: raw.capital,
                    region: raw.region,
                    population: raw.population,
                    currency_code: raw.currency_code,
                    exchange_rate: est.exchange_rate,
                    estimated_gdp: est.estimated_gdp,
                    flag_url: raw.flag_url,
                }
            })
            .collect()
    }

    /// Applies every upsert in fetch order inside one transaction.
    async fn commit(&self, records: &[CountryUpsert]) -> Result<(), CountrydexError> {
        let mut tx = self.store.begin().await?;

        for (idx, record) in records.iter().enumerate() {
            if let Err(e) = CountryStore::upsert(&mut tx, record).await {
                error!(idx, name = %record.name, error = %e, "Country upsert failed");
                if let Err(rb) = tx.rollback().await {
                    warn!(error = %rb, "Explicit rollback failed; connection drop will discard the transaction");
                }
                return Err(e);
            }
        }

        tx.commit().await?;
        debug!(count = records.len(), "Refresh transaction committed");
        Ok(())
    }
}

fn enter(phase: RefreshPhase) {
    debug!(phase = phase.as_str(), "Refresh phase");
}
