mod common;

use chrono::{Duration, Utc};
use countrydex::CountrydexError;
use countrydex::db::{CountryCreate, CountryStore, CountryUpsert, ListFilter, ListSort};

fn record(name: &str, region: &str, gdp: Option<f64>) -> CountryUpsert {
    CountryUpsert {
        name: name.to_string(),
        capital: None,
        region: Some(region.to_string()),
        population: 1_000,
        currency_code: Some("TST".to_string()),
        exchange_rate: gdp.map(|_| 1.0),
        estimated_gdp: gdp,
        flag_url: None,
        last_refreshed_at: Utc::now(),
    }
}

async fn write_all(store: &CountryStore, records: &[CountryUpsert]) {
    let mut tx = store.begin().await.expect("begin");
    for r in records {
        CountryStore::upsert(&mut tx, r).await.expect("upsert");
    }
    tx.commit().await.expect("commit");
}

#[tokio::test]
async fn upsert_updates_in_place() {
    let store = common::temp_store("store-upsert").await;

    let mut france = record("France", "Europe", Some(10.0));
    write_all(&store, &[france.clone()]).await;
    let first = store
        .find_by_name("France")
        .await
        .unwrap()
        .expect("row exists");

    france.population = 68_000_000;
    france.last_refreshed_at = Utc::now();
    write_all(&store, &[france.clone()]).await;
    write_all(&store, &[france]).await;

    assert_eq!(store.count().await.unwrap(), 1);
    let second = store
        .find_by_name("France")
        .await
        .unwrap()
        .expect("row exists");
    assert_eq!(second.id, first.id);
    assert_eq!(second.population, 68_000_000);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);
}

#[tokio::test]
async fn names_collapse_ignoring_case_and_keep_newest_casing() {
    let store = common::temp_store("store-case").await;

    write_all(
        &store,
        &[
            record("Testland", "Testregion", Some(1.0)),
            record("TESTLAND", "Testregion", Some(2.0)),
        ],
    )
    .await;

    assert_eq!(store.count().await.unwrap(), 1);
    let row = store
        .find_by_name("testland")
        .await
        .unwrap()
        .expect("row exists");
    assert_eq!(row.name, "TESTLAND");
    assert_eq!(row.estimated_gdp, Some(2.0));
}

#[tokio::test]
async fn find_by_name_ignores_case() {
    let store = common::temp_store("store-find").await;
    write_all(&store, &[record("France", "Europe", Some(10.0))]).await;

    let a = store.find_by_name("france").await.unwrap().expect("lower");
    let b = store.find_by_name("FRANCE").await.unwrap().expect("upper");
    let c = store.find_by_name("France").await.unwrap().expect("exact");
    assert_eq!(a, b);
    assert_eq!(b, c);

    assert!(store.find_by_name("Franc").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_reports_missing_rows() {
    let store = common::temp_store("store-delete").await;

    assert!(!store.delete_by_name("Nowhere").await.unwrap());

    write_all(&store, &[record("Nowhere", "Void", None)]).await;
    assert!(store.delete_by_name("NOWHERE").await.unwrap());
    assert!(!store.delete_by_name("Nowhere").await.unwrap());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn list_filters_region_and_sorts_by_gdp_with_nulls_last() {
    let store = common::temp_store("store-list").await;
    write_all(
        &store,
        &[
            record("Ghana", "Africa", Some(10.0)),
            record("Chad", "Africa", None),
            record("Nigeria", "Africa", Some(30.0)),
            record("Germany", "Europe", Some(50.0)),
        ],
    )
    .await;

    let rows = store
        .list(&ListFilter {
            region: Some("Africa".to_string()),
            sort: ListSort::GdpDesc,
            ..Default::default()
        })
        .await
        .unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Nigeria", "Ghana", "Chad"]);
    assert!(rows.iter().all(|r| r.region.as_deref() == Some("Africa")));
}

#[tokio::test]
async fn list_defaults_to_case_sensitive_name_order() {
    let store = common::temp_store("store-order").await;
    write_all(
        &store,
        &[
            record("alpha", "X", None),
            record("Beta", "X", None),
            record("Alpha Prime", "X", None),
        ],
    )
    .await;

    let rows = store.list(&ListFilter::default()).await.unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Alpha Prime", "Beta", "alpha"]);
}

#[tokio::test]
async fn list_filters_by_currency_code() {
    let store = common::temp_store("store-currency").await;
    let mut euro = record("Spain", "Europe", Some(3.0));
    euro.currency_code = Some("EUR".to_string());
    write_all(&store, &[euro, record("Testland", "Europe", Some(4.0))]).await;

    let rows = store
        .list(&ListFilter {
            currency_code: Some("EUR".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Spain");
}

#[tokio::test]
async fn status_reports_count_and_latest_refresh() {
    let store = common::temp_store("store-status").await;

    let empty = store.status().await.unwrap();
    assert_eq!(empty.total_countries, 0);
    assert_eq!(empty.last_refreshed_at, None);

    let older = Utc::now() - Duration::minutes(10);
    let newer = Utc::now();
    let mut a = record("A", "X", None);
    a.last_refreshed_at = older;
    let mut b = record("B", "X", None);
    b.last_refreshed_at = newer;
    write_all(&store, &[a, b]).await;

    let status = store.status().await.unwrap();
    assert_eq!(status.total_countries, 2);
    assert_eq!(status.last_refreshed_at, Some(newer));
}

#[tokio::test]
async fn last_refreshed_at_never_moves_backwards() {
    let store = common::temp_store("store-monotonic").await;
    let newer = Utc::now();
    let older = newer - Duration::hours(1);

    let mut r = record("Clockland", "X", Some(1.0));
    r.last_refreshed_at = newer;
    write_all(&store, &[r.clone()]).await;

    r.last_refreshed_at = older;
    r.population = 42;
    write_all(&store, &[r]).await;

    let row = store
        .find_by_name("Clockland")
        .await
        .unwrap()
        .expect("row exists");
    assert_eq!(row.last_refreshed_at, newer);
    assert_eq!(row.population, 42);
}

#[tokio::test]
async fn top_by_gdp_skips_unknown_values() {
    let store = common::temp_store("store-top").await;
    write_all(
        &store,
        &[
            record("A", "X", Some(1.0)),
            record("B", "X", None),
            record("C", "X", Some(3.0)),
            record("D", "X", Some(2.0)),
        ],
    )
    .await;

    let top = store.top_by_gdp(2).await.unwrap();
    let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["C", "D"]);
    assert_eq!(store.top_by_gdp(10).await.unwrap().len(), 3);
}

#[tokio::test]
async fn dropped_transaction_rolls_back() {
    let store = common::temp_store("store-rollback").await;
    {
        let mut tx = store.begin().await.unwrap();
        CountryStore::upsert(&mut tx, &record("Ghost", "X", None))
            .await
            .unwrap();
    }
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn create_rejects_existing_name_ignoring_case() {
    let store = common::temp_store("store-create").await;
    let create = CountryCreate {
        name: "Testland".to_string(),
        capital: Some("Test City".to_string()),
        region: None,
        population: 5,
        currency_code: "TST".to_string(),
        flag_url: None,
    };

    let row = store.create(create.clone()).await.unwrap();
    assert_eq!(row.name, "Testland");
    assert_eq!(row.exchange_rate, None);
    assert_eq!(row.estimated_gdp, None);
    assert_eq!(row.currency_code.as_deref(), Some("TST"));

    let err = store
        .create(CountryCreate {
            name: "TESTLAND".to_string(),
            ..create
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CountrydexError::Conflict(ref n) if n == "TESTLAND"));
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn non_ascii_names_match_ignoring_case() {
    let store = common::temp_store("store-unicode").await;
    write_all(
        &store,
        &[
            record("Réunion", "Africa", Some(1.0)),
            record("RÉUNION", "Africa", Some(2.0)),
            record("Åland Islands", "Europe", None),
        ],
    )
    .await;

    assert_eq!(store.count().await.unwrap(), 2);
    let reunion = store.find_by_name("réunion").await.unwrap().expect("found");
    assert_eq!(reunion.name, "RÉUNION");
    assert_eq!(reunion.estimated_gdp, Some(2.0));

    let aland = store.find_by_name("ÅLAND ISLANDS").await.unwrap().expect("found");
    assert_eq!(aland.name, "Åland Islands");

    assert!(store.delete_by_name("åland islands").await.unwrap());
    assert!(store.find_by_name("Åland Islands").await.unwrap().is_none());
    assert_eq!(store.count().await.unwrap(), 1);
}
