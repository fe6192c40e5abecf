use serde::Deserialize;
use std::env;
use parkit_fare::FareConfig;
use parkit_shared::{ParkingSpot, VehicleCategory};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub facility: FacilityConfig,
    #[serde(default)]
    pub fare: FareConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string; the in-memory store is used when unset
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FacilityConfig {
    pub car_spots: u32,
    pub bike_spots: u32,
}

impl FacilityConfig {
    /// The spot pool at start-up: cars take ids 1..=car_spots, bikes the ids
    /// that follow. Every spot starts available.
    pub fn provision(&self) -> Vec<ParkingSpot> {
        let cars = (1..=self.car_spots).map(|id| ParkingSpot::new(id, VehicleCategory::Car, true));
        let bikes = (1..=self.bike_spots)
            .map_while(|n| self.car_spots.checked_add(n))
            .map(|id| ParkingSpot::new(id, VehicleCategory::Bike, true));
        cars.chain(bikes).collect()
    }

    /// Spot ids are `i32` in the database, so the pool must fit below `i32::MAX`
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        match self.car_spots.checked_add(self.bike_spots) {
            Some(total) if total <= i32::MAX as u32 => Ok(()),
            _ => Err(config::ConfigError::Message(format!(
                "facility too large: {} car spots + {} bike spots",
                self.car_spots, self.bike_spots
            ))),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `PARKIT_FARE__CAR_RATE_PER_HOUR=2.0`
            .add_source(config::Environment::with_prefix("PARKIT").separator("__"))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.facility.validate()?;
        Ok(config)
    }

    /// Parse a configuration from TOML text alone, without files or environment
    pub fn from_toml(contents: &str) -> Result<Self, config::ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.facility.validate()?;
        Ok(config)
    }
}
