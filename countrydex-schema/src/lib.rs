pub mod exchange_rates;
pub mod restcountries;

pub use exchange_rates::ExchangeRateFeed;
pub use restcountries::{RestCountryEntry, RestCurrency};
