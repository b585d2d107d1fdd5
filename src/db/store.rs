use crate::db::models::{
    CountryCreate, CountryUpsert, DbCountry, ListFilter, ListSort, StoreStatus,
};
use crate::db::schema::{NAME_COLLATION, SQLITE_INIT};
use crate::error::CountrydexError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::{cmp::Ordering, str::FromStr, time::Duration};
use tracing::{debug, info};

const COUNTRY_COLUMNS: &str = "id, name, capital, region, population, currency_code, exchange_rate, \
     estimated_gdp, flag_url, last_refreshed_at, created_at, updated_at";

/// Owner of the `countries` table.
///
/// Reads and single-row writes go straight to the pool. Multi-row writes go through
/// [`CountryStore::begin`] and [`CountryStore::upsert`] so the caller controls the
/// transaction boundary; a dropped, uncommitted transaction rolls back.
#[derive(Clone)]
pub struct CountryStore {
    pool: SqlitePool,
}

impl CountryStore {
    /// Opens (or creates) the database and applies the schema.
    pub async fn connect(database_url: &str) -> Result<Self, CountrydexError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .collation(NAME_COLLATION, fold_case_cmp)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        apply_schema(&pool).await?;

        info!(database_url, "CountryStore initialized");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Starts the unit of work for a refresh.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, CountrydexError> {
        Ok(self.pool.begin().await?)
    }

    /// Inserts the record or overwrites the row whose name matches ignoring case.
    ///
    /// The newest casing of the name wins and `last_refreshed_at` never moves backwards.
    pub async fn upsert(
        conn: &mut SqliteConnection,
        record: &CountryUpsert,
    ) -> Result<(), CountrydexError> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO countries (
                name, capital, region, population, currency_code, exchange_rate,
                estimated_gdp, flag_url, last_refreshed_at, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                name = excluded.name,
                capital = excluded.capital,
                region = excluded.region,
                population = excluded.population,
                currency_code = excluded.currency_code,
                exchange_rate = excluded.exchange_rate,
                estimated_gdp = excluded.estimated_gdp,
                flag_url = excluded.flag_url,
                last_refreshed_at = MAX(countries.last_refreshed_at, excluded.last_refreshed_at),
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&record.name)
        .bind(&record.capital)
        .bind(&record.region)
        .bind(record.population)
        .bind(&record.currency_code)
        .bind(record.exchange_rate)
        .bind(record.estimated_gdp)
        .bind(&record.flag_url)
        .bind(record.last_refreshed_at)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Explicit single-record create. Fails with `Conflict` if the name already exists.
    pub async fn create(&self, create: CountryCreate) -> Result<DbCountry, CountrydexError> {
        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO countries (
                name, capital, region, population, currency_code, flag_url,
                last_refreshed_at, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {COUNTRY_COLUMNS}
            "#
        );

        let res = sqlx::query_as::<_, DbCountry>(&sql)
            .bind(&create.name)
            .bind(&create.capital)
            .bind(&create.region)
            .bind(create.population)
            .bind(&create.currency_code)
            .bind(&create.flag_url)
            .bind(now)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await;

        match res {
            Ok(row) => {
                debug!(id = row.id, name = %row.name, "Country created");
                Ok(row)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(CountrydexError::Conflict(create.name))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Case-insensitive exact match.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<DbCountry>, CountrydexError> {
        let sql = format!(
            "SELECT {COUNTRY_COLUMNS} FROM countries WHERE name = ? COLLATE {NAME_COLLATION}"
        );
        let row = sqlx::query_as::<_, DbCountry>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Case-insensitive; returns whether a row was removed.
    pub async fn delete_by_name(&self, name: &str) -> Result<bool, CountrydexError> {
        let sql = format!("DELETE FROM countries WHERE name = ? COLLATE {NAME_COLLATION}");
        let res = sqlx::query(&sql)
            .bind(name)
            .execute(&self.pool)
            .await?;

        let affected = res.rows_affected();
        debug!(name, affected, "Country delete applied");
        Ok(affected > 0)
    }

    pub async fn list(&self, filter: &ListFilter) -> Result<Vec<DbCountry>, CountrydexError> {
        let mut qb: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {COUNTRY_COLUMNS} FROM countries WHERE 1 = 1"));

        if let Some(region) = filter.region.as_deref() {
            qb.push(" AND region = ").push_bind(region);
        }
        if let Some(code) = filter.currency_code.as_deref() {
            qb.push(" AND currency_code = ").push_bind(code);
        }

        qb.push(match filter.sort {
            ListSort::GdpDesc => {
                " ORDER BY estimated_gdp IS NULL ASC, estimated_gdp DESC, name COLLATE BINARY ASC"
            }
            ListSort::Name => " ORDER BY name COLLATE BINARY ASC",
        });

        let rows = qb
            .build_query_as::<DbCountry>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Row count plus the newest `last_refreshed_at` (`None` when empty).
    pub async fn status(&self) -> Result<StoreStatus, CountrydexError> {
        let (total_countries, last_refreshed_at): (i64, Option<DateTime<Utc>>) =
            sqlx::query_as("SELECT COUNT(*), MAX(last_refreshed_at) FROM countries")
                .fetch_one(&self.pool)
                .await?;

        Ok(StoreStatus {
            total_countries,
            last_refreshed_at,
        })
    }

    pub async fn count(&self) -> Result<i64, CountrydexError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// The `limit` rows with a known GDP, highest first.
    pub async fn top_by_gdp(&self, limit: u32) -> Result<Vec<DbCountry>, CountrydexError> {
        let sql = format!(
            r#"
            SELECT {COUNTRY_COLUMNS}
            FROM countries
            WHERE estimated_gdp IS NOT NULL
            ORDER BY estimated_gdp DESC, name COLLATE BINARY ASC
            LIMIT ?
            "#
        );
        let rows = sqlx::query_as::<_, DbCountry>(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Orders names by their Unicode lowercase form, so "RÉUNION" equals "Réunion".
fn fold_case_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), CountrydexError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
