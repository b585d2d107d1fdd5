//! Upstream data sources: the country directory and the exchange-rate feed.

pub mod gateway;
mod snapshot;

pub use gateway::{CountrySource, HttpGateway};
pub use snapshot::{RateTable, RawCountry, UpstreamSnapshot};

/// Max chars of an upstream body kept in error logs.
pub const UPSTREAM_BODY_PREVIEW_CHARS: usize = 256;
