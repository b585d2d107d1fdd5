pub mod countries;
pub mod input;

pub use countries::{CountryListItem, CountryService};
pub use input::CreateCountryInput;
