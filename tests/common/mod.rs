#![allow(dead_code)]

use async_trait::async_trait;
use countrydex::CountrydexError;
use countrydex::db::CountryStore;
use countrydex::estimator::MultiplierSource;
use countrydex::providers::{CountrySource, RateTable, RawCountry, UpstreamSnapshot};
use countrydex::render::SummaryRenderer;
use countrydex::service::CountryService;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

static SEQ: AtomicUsize = AtomicUsize::new(0);

/// Unique path under the OS temp dir.
pub fn temp_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "countrydex-{tag}-{}-{nanos}-{seq}",
        std::process::id()
    ))
}

pub async fn temp_store(tag: &str) -> CountryStore {
    let db_path = temp_path(tag).with_extension("sqlite");
    let database_url = format!("sqlite:{}", db_path.display());
    CountryStore::connect(&database_url)
        .await
        .expect("store connects")
}

pub fn renderer(tag: &str) -> SummaryRenderer {
    SummaryRenderer::new(temp_path(tag), None)
}

pub fn raw(name: &str, population: i64, currency: Option<&str>) -> RawCountry {
    RawCountry {
        name: name.to_string(),
        capital: Some(format!("{name} City")),
        region: Some("Testregion".to_string()),
        population,
        flag_url: Some(format!("https://flags.test/{}.svg", name.to_lowercase())),
        currency_code: currency.map(str::to_string),
    }
}

pub fn rates(pairs: &[(&str, f64)]) -> RateTable {
    pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
}

/// In-memory upstream whose data and availability can be changed between refreshes.
#[derive(Default)]
pub struct FakeSource {
    snapshot: Mutex<UpstreamSnapshot>,
    unavailable: AtomicBool,
    pub fetches: AtomicUsize,
}

impl FakeSource {
    pub fn new(countries: Vec<RawCountry>, rates: RateTable) -> Arc<Self> {
        let source = Self::default();
        source.set(countries, rates);
        Arc::new(source)
    }

    pub fn set(&self, countries: Vec<RawCountry>, rates: RateTable) {
        *self.snapshot.lock().expect("snapshot lock") = UpstreamSnapshot { countries, rates };
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl CountrySource for FakeSource {
    async fn fetch(&self) -> Result<UpstreamSnapshot, CountrydexError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CountrydexError::UpstreamUnavailable {
                endpoint: "http://countries.test/all".to_string(),
                cause: "connection refused".to_string(),
            });
        }
        Ok(self.snapshot.lock().expect("snapshot lock").clone())
    }
}

pub async fn service(
    store: CountryStore,
    source: Arc<FakeSource>,
    renderer: SummaryRenderer,
    multiplier: Arc<dyn MultiplierSource>,
) -> CountryService {
    CountryService::spawn(store, source, renderer, multiplier)
        .await
        .expect("service spawns")
}
