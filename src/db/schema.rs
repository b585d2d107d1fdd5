//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// Collation that compares names after Unicode lowercasing. Registered on every
/// connection by [`crate::db::CountryStore::connect`].
pub const NAME_COLLATION: &str = "UNICASE";

/// SQLite schema includes:
/// - `countries` table (one row per country, name unique ignoring case)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Country snapshots (latest refresh only)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS countries (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL COLLATE UNICASE UNIQUE,
    capital TEXT NULL,
    region TEXT NULL,
    population INTEGER NOT NULL DEFAULT 0 CHECK (population >= 0),
    currency_code TEXT NULL,
    exchange_rate REAL NULL,
    estimated_gdp REAL NULL,
    flag_url TEXT NULL,
    last_refreshed_at TEXT NOT NULL, -- RFC3339
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_countries_region ON countries(region);

CREATE INDEX IF NOT EXISTS idx_countries_currency_code ON countries(currency_code);
"#;
