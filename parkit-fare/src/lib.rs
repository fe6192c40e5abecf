pub mod pricing;

pub use pricing::{FareCalculator, FareConfig, FareError};
