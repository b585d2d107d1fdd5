//! Database module: the persisted country table.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and write payloads
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `store.rs`: `CountryStore`, the only owner of country rows

pub mod models;
pub mod schema;
pub mod store;

pub use models::{CountryCreate, CountryUpsert, DbCountry, ListFilter, ListSort, StoreStatus};
pub use schema::{NAME_COLLATION, SQLITE_INIT};
pub use store::CountryStore;
