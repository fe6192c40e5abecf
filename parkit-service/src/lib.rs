pub mod workflow;

pub use workflow::{ParkingError, ParkingService};
