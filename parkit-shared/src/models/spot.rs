use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vehicle category a spot is provisioned for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleCategory {
    Car,
    Bike,
}

impl VehicleCategory {
    /// Map an operator menu selection (1 = car, 2 = bike) to a category
    pub fn from_selection(selection: i32) -> Option<Self> {
        match selection {
            1 => Some(VehicleCategory::Car),
            2 => Some(VehicleCategory::Bike),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::Car => "CAR",
            VehicleCategory::Bike => "BIKE",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported vehicle category: {0}")]
pub struct UnsupportedCategory(pub String);

impl FromStr for VehicleCategory {
    type Err = UnsupportedCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CAR" => Ok(VehicleCategory::Car),
            "BIKE" => Ok(VehicleCategory::Bike),
            other => Err(UnsupportedCategory(other.to_string())),
        }
    }
}

/// A physical parking space. Its category is fixed at provisioning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParkingSpot {
    pub id: u32,
    pub category: VehicleCategory,
    pub is_available: bool,
}

impl ParkingSpot {
    pub fn new(id: u32, category: VehicleCategory, is_available: bool) -> Self {
        Self {
            id,
            category,
            is_available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_mapping() {
        assert_eq!(VehicleCategory::from_selection(1), Some(VehicleCategory::Car));
        assert_eq!(VehicleCategory::from_selection(2), Some(VehicleCategory::Bike));
        assert_eq!(VehicleCategory::from_selection(0), None);
        assert_eq!(VehicleCategory::from_selection(3), None);
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("CAR".parse::<VehicleCategory>().unwrap(), VehicleCategory::Car);
        assert_eq!("BIKE".parse::<VehicleCategory>().unwrap(), VehicleCategory::Bike);

        let err = "TRUCK".parse::<VehicleCategory>().unwrap_err();
        assert_eq!(err, UnsupportedCategory("TRUCK".to_string()));
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&VehicleCategory::Bike).unwrap();
        assert_eq!(json, "\"BIKE\"");

        let spot: ParkingSpot =
            serde_json::from_str(r#"{"id": 4, "category": "BIKE", "is_available": true}"#)
                .expect("Failed to deserialize");
        assert_eq!(spot, ParkingSpot::new(4, VehicleCategory::Bike, true));
    }
}
