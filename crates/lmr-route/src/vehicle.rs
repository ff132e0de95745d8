use serde::{Deserialize, Serialize};

use lmr_core::VehicleId;

/// The vehicle that executed a route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id:           VehicleId,
    /// Cargo capacity in cubic centimetres.
    pub capacity_cm3: f64,
}

impl Vehicle {
    pub fn new(id: impl Into<VehicleId>, capacity_cm3: f64) -> Self {
        Self { id: id.into(), capacity_cm3 }
    }
}
