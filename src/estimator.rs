//! Estimated GDP derivation.
//!
//! `estimated_gdp = population * multiplier / exchange_rate`, where the multiplier is a
//! placeholder economic factor drawn per country per refresh. Results are therefore not
//! reproducible across refreshes unless a [`FixedMultiplier`] is injected.

use crate::providers::RateTable;
use rand::Rng;
use std::ops::RangeInclusive;

/// Inclusive bounds of the GDP multiplier.
pub const MULTIPLIER_RANGE: RangeInclusive<u32> = 1000..=2000;

/// Source of the per-country GDP multiplier.
pub trait MultiplierSource: Send + Sync {
    fn draw(&self) -> u32;
}

/// Uniform draw from [`MULTIPLIER_RANGE`] using the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMultiplier;

impl MultiplierSource for RandomMultiplier {
    fn draw(&self) -> u32 {
        rand::rng().random_range(MULTIPLIER_RANGE)
    }
}

/// Always returns the same multiplier.
#[derive(Debug, Clone, Copy)]
pub struct FixedMultiplier(pub u32);

impl MultiplierSource for FixedMultiplier {
    fn draw(&self) -> u32 {
        self.0
    }
}

/// Derived economic fields for one country.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
}

impl Estimate {
    /// Country declares no currency at all.
    const NO_CURRENCY: Self = Self {
        exchange_rate: None,
        estimated_gdp: Some(0.0),
    };

    /// Currency declared but no usable rate.
    const UNRESOLVED: Self = Self {
        exchange_rate: None,
        estimated_gdp: None,
    };
}

pub fn estimate(
    population: i64,
    currency_code: Option<&str>,
    rates: &RateTable,
    multiplier: &dyn MultiplierSource,
) -> Estimate {
    let Some(code) = currency_code else {
        return Estimate::NO_CURRENCY;
    };

    let Some(rate) = rates.get(code).filter(|r| r.is_finite() && *r > 0.0) else {
        return Estimate::UNRESOLVED;
    };

    #[allow(clippy::cast_precision_loss)]
    let population = population.max(0) as f64;
    let factor = f64::from(multiplier.draw());

    Estimate {
        exchange_rate: Some(rate),
        estimated_gdp: Some(population * factor / rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates(pairs: &[(&str, f64)]) -> RateTable {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn no_currency_yields_zero_gdp() {
        let est = estimate(5_000, None, &rates(&[("USD", 1.0)]), &RandomMultiplier);
        assert_eq!(est.exchange_rate, None);
        assert_eq!(est.estimated_gdp, Some(0.0));
    }

    #[test]
    fn unknown_code_yields_unknown_gdp() {
        let est = estimate(5_000, Some("XYZ"), &rates(&[("USD", 1.0)]), &RandomMultiplier);
        assert_eq!(est, Estimate::UNRESOLVED);
    }

    #[test]
    fn zero_rate_is_never_divided_by() {
        let est = estimate(5_000, Some("ZRO"), &rates(&[("ZRO", 0.0)]), &RandomMultiplier);
        assert_eq!(est.exchange_rate, None);
        assert_eq!(est.estimated_gdp, None);
    }

    #[test]
    fn negative_and_non_finite_rates_are_rejected() {
        let table = rates(&[("NEG", -3.0), ("INF", f64::INFINITY), ("NAN", f64::NAN)]);
        for code in ["NEG", "INF", "NAN"] {
            assert_eq!(
                estimate(10, Some(code), &table, &RandomMultiplier),
                Estimate::UNRESOLVED,
                "{code}"
            );
        }
    }

    #[test]
    fn fixed_multiplier_is_exact() {
        let est = estimate(1_000_000, Some("TST"), &rates(&[("TST", 2.0)]), &FixedMultiplier(1500));
        assert_eq!(est.exchange_rate, Some(2.0));
        assert_eq!(est.estimated_gdp, Some(750_000_000.0));
    }

    #[test]
    fn random_multiplier_stays_in_range() {
        let table = rates(&[("TST", 2.0)]);
        for _ in 0..500 {
            let gdp = estimate(1_000_000, Some("TST"), &table, &RandomMultiplier)
                .estimated_gdp
                .expect("rate is usable");
            assert!((500_000_000.0..=1_000_000_000.0).contains(&gdp), "{gdp}");
        }
    }

    #[test]
    fn random_draws_cover_bounds_only() {
        for _ in 0..1_000 {
            assert!(MULTIPLIER_RANGE.contains(&RandomMultiplier.draw()));
        }
    }
}
