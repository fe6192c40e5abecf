use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use parkit_shared::{Ticket, VehicleCategory};
use std::collections::HashMap;

/// Visits shorter than this are free
pub const GRACE_PERIOD_MINUTES: f64 = 30.0;

/// Multiplier applied to the base fare of a recurring vehicle (5% off)
pub const RECURRING_DISCOUNT_FACTOR: f64 = 0.95;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareConfig {
    /// Hourly rate for cars
    #[serde(default = "default_car_rate")]
    pub car_rate_per_hour: f64,

    /// Hourly rate for bikes
    #[serde(default = "default_bike_rate")]
    pub bike_rate_per_hour: f64,
}

fn default_car_rate() -> f64 { 1.5 }
fn default_bike_rate() -> f64 { 1.0 }

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            car_rate_per_hour: default_car_rate(),
            bike_rate_per_hour: default_bike_rate(),
        }
    }
}

/// Computes the price of a parking visit
#[derive(Debug, Clone)]
pub struct FareCalculator {
    rates: HashMap<VehicleCategory, f64>,
}

impl FareCalculator {
    pub fn new(config: &FareConfig) -> Self {
        let mut rates = HashMap::new();
        rates.insert(VehicleCategory::Car, config.car_rate_per_hour);
        rates.insert(VehicleCategory::Bike, config.bike_rate_per_hour);
        Self { rates }
    }

    /// Build a calculator from an explicit rate table. Categories missing from
    /// the table are rejected at pricing time.
    pub fn with_rates(rates: HashMap<VehicleCategory, f64>) -> Self {
        Self { rates }
    }

    pub fn rate(&self, category: VehicleCategory) -> Result<f64, FareError> {
        self.rates
            .get(&category)
            .copied()
            .ok_or(FareError::UnsupportedCategory(category))
    }

    /// Price a visit from `in_time` to `out_time`.
    ///
    /// Under 30 minutes is free whatever the category or discount. Otherwise
    /// the fractional duration in hours is billed at the category's hourly
    /// rate, and a recurring vehicle gets 5% off that base fare. No currency
    /// rounding is performed here.
    pub fn price(
        &self,
        in_time: DateTime<Utc>,
        out_time: Option<DateTime<Utc>>,
        category: VehicleCategory,
        discount_eligible: bool,
    ) -> Result<f64, FareError> {
        let out_time = match out_time {
            Some(out) if out >= in_time => out,
            other => return Err(FareError::InvalidInterval { in_time, out_time: other }),
        };

        let duration_hours = (out_time - in_time).num_milliseconds() as f64 / MILLIS_PER_HOUR;

        if duration_hours * 60.0 < GRACE_PERIOD_MINUTES {
            return Ok(0.0);
        }

        let mut amount = duration_hours * self.rate(category)?;
        if discount_eligible {
            amount *= RECURRING_DISCOUNT_FACTOR;
        }

        Ok(amount)
    }

    pub fn price_ticket(&self, ticket: &Ticket) -> Result<f64, FareError> {
        self.price(
            ticket.in_time,
            ticket.out_time,
            ticket.spot.category,
            ticket.discount_applied,
        )
    }
}

impl Default for FareCalculator {
    fn default() -> Self {
        Self::new(&FareConfig::default())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FareError {
    #[error("Out time provided is incorrect: in {in_time}, out {out_time:?}")]
    InvalidInterval {
        in_time: DateTime<Utc>,
        out_time: Option<DateTime<Utc>>,
    },

    #[error("Unsupported vehicle category: {0}")]
    UnsupportedCategory(VehicleCategory),
}
