//! Fare calculation settings.

use super::{env_or, env_string};

/// Fare parameters, in minor currency units (paise)
#[derive(Clone, Debug)]
pub struct FareConfig {
    /// Minimum charged per seat
    pub base_fare_paise: i64,
    pub rate_per_km_paise: i64,
    pub currency: String,
    pub max_seats_per_booking: i64,
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            base_fare_paise: 3000,
            rate_per_km_paise: 100,
            currency: "INR".to_string(),
            max_seats_per_booking: 10,
        }
    }
}

impl FareConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base: f64 = env_or("FARE_BASE", defaults.base_fare_paise as f64 / 100.0);
        let rate: f64 = env_or("FARE_RATE_PER_KM", defaults.rate_per_km_paise as f64 / 100.0);

        Self {
            base_fare_paise: (base * 100.0).round() as i64,
            rate_per_km_paise: (rate * 100.0).round() as i64,
            currency: env_string("FARE_CURRENCY", &defaults.currency),
            max_seats_per_booking: env_or("FARE_MAX_SEATS", defaults.max_seats_per_booking),
        }
    }
}
