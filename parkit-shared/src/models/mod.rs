pub mod spot;
pub mod ticket;

pub use spot::{ParkingSpot, UnsupportedCategory, VehicleCategory};
pub use ticket::{Ticket, MAX_REGISTRATION_LEN};
