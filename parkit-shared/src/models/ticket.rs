use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use super::spot::ParkingSpot;

/// Longest registration the ticket store accepts
pub const MAX_REGISTRATION_LEN: usize = 32;

/// The record of one parking visit, from entry to exit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    pub id: Uuid,
    pub vehicle_registration_id: String,
    pub spot: ParkingSpot,
    pub in_time: DateTime<Utc>,
    /// Absent while the vehicle is still parked
    pub out_time: Option<DateTime<Utc>>,
    pub price: f64,
    pub discount_applied: bool,
}

impl Ticket {
    pub fn new(vehicle_registration_id: String, spot: ParkingSpot, in_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_registration_id,
            spot,
            in_time,
            out_time: None,
            price: 0.0,
            discount_applied: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.out_time.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleCategory;

    #[test]
    fn test_new_ticket_is_open() {
        let spot = ParkingSpot::new(1, VehicleCategory::Car, false);
        let ticket = Ticket::new("ABCDEF".to_string(), spot.clone(), Utc::now());

        assert!(ticket.is_open());
        assert_eq!(ticket.price, 0.0);
        assert!(!ticket.discount_applied);
        assert_eq!(ticket.spot, spot);
    }

    #[test]
    fn test_ticket_json_shape() {
        let spot = ParkingSpot::new(2, VehicleCategory::Car, false);
        let ticket = Ticket::new("XYZ123".to_string(), spot, Utc::now());

        let value = serde_json::to_value(&ticket).unwrap();
        assert_eq!(value["vehicle_registration_id"], "XYZ123");
        assert_eq!(value["spot"]["category"], "CAR");
        assert!(value["out_time"].is_null());
    }
}
