mod countrydex;

pub use countrydex::{ApiErrorBody, COUNTRY_NOT_FOUND, CountrydexError, SUMMARY_NOT_FOUND};
