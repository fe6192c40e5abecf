pub mod models;

pub use models::{ParkingSpot, Ticket, VehicleCategory, MAX_REGISTRATION_LEN};
