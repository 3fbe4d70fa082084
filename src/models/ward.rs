//! Ward and bed records. Owned by the hospital system of record; this
//! crate only reads them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ward {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub ward_type: Option<String>,
    #[serde(default)]
    pub floor: Option<String>,
    pub capacity: u32,
    pub occupied_beds: u32,
    #[serde(default)]
    pub has_oxygen_supply: bool,
    #[serde(default)]
    pub has_isolation_room: bool,
    #[serde(default)]
    pub nurse_in_charge: Option<String>,
}

impl Ward {
    pub fn available_beds(&self) -> u32 {
        self.capacity.saturating_sub(self.occupied_beds)
    }

    /// Occupancy as a percentage of capacity; 0 for a zero-capacity ward.
    pub fn occupancy_percent(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        f64::from(self.occupied_beds) * 100.0 / f64::from(self.capacity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bed {
    pub id: u64,
    pub ward_id: u64,
    pub bed_number: String,
    #[serde(default)]
    pub is_occupied: bool,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub admission_id: Option<u64>,
    #[serde(default)]
    pub bed_type: Option<String>,
    #[serde(default)]
    pub has_monitor: bool,
    #[serde(default)]
    pub has_ventilator: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ward(capacity: u32, occupied: u32) -> Ward {
        Ward {
            id: 1,
            name: "Medical Ward A".into(),
            ward_type: None,
            floor: None,
            capacity,
            occupied_beds: occupied,
            has_oxygen_supply: true,
            has_isolation_room: false,
            nurse_in_charge: None,
        }
    }

    #[test]
    fn available_beds_never_negative() {
        assert_eq!(ward(20, 14).available_beds(), 6);
        assert_eq!(ward(10, 12).available_beds(), 0);
    }

    #[test]
    fn occupancy_of_empty_capacity_is_zero() {
        assert_eq!(ward(0, 0).occupancy_percent(), 0.0);
        assert_eq!(ward(20, 5).occupancy_percent(), 25.0);
    }
}
