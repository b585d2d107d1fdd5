use crate::db::CountryCreate;
use crate::error::CountrydexError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Raw body of an explicit create. Fields stay untyped until [`CreateCountryInput::validate`]
/// so every problem can be reported at once.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCountryInput {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub capital: Option<Value>,
    #[serde(default)]
    pub region: Option<Value>,
    #[serde(default)]
    pub population: Option<Value>,
    #[serde(default)]
    pub currency_code: Option<Value>,
    #[serde(default)]
    pub flag_url: Option<Value>,
}

const REQUIRED: &str = "is required";
const NOT_A_STRING: &str = "must be a string";

impl CreateCountryInput {
    pub fn validate(self) -> Result<CountryCreate, CountrydexError> {
        let mut errors = BTreeMap::new();

        let name = required_string(&mut errors, "name", self.name);
        let currency_code = required_string(&mut errors, "currency_code", self.currency_code);
        let capital = optional_string(&mut errors, "capital", self.capital);
        let region = optional_string(&mut errors, "region", self.region);
        let flag_url = optional_string(&mut errors, "flag_url", self.flag_url);

        let population = match self.population {
            None | Some(Value::Null) => {
                errors.insert("population".to_string(), REQUIRED.to_string());
                None
            }
            Some(v) => match v.as_i64().filter(|p| *p >= 0) {
                Some(p) => Some(p),
                None => {
                    errors.insert(
                        "population".to_string(),
                        "must be a non-negative integer".to_string(),
                    );
                    None
                }
            },
        };

        match (name, population, currency_code) {
            (Some(name), Some(population), Some(currency_code)) if errors.is_empty() => {
                Ok(CountryCreate {
                    name,
                    capital,
                    region,
                    population,
                    currency_code,
                    flag_url,
                })
            }
            _ => Err(CountrydexError::Validation(errors)),
        }
    }
}

fn required_string(
    errors: &mut BTreeMap<String, String>,
    field: &str,
    value: Option<Value>,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => {
            errors.insert(field.to_string(), REQUIRED.to_string());
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.insert(field.to_string(), "must not be empty".to_string());
            None
        }
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(_) => {
            errors.insert(field.to_string(), NOT_A_STRING.to_string());
            None
        }
    }
}

fn optional_string(
    errors: &mut BTreeMap<String, String>,
    field: &str,
    value: Option<Value>,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Some(_) => {
            errors.insert(field.to_string(), NOT_A_STRING.to_string());
            None
        }
    }
}
