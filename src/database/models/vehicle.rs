use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub vehicle_id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub dealership_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVehicle {
    pub make: String,
    pub model: String,
    pub year: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleChanges {
    pub make: String,
    pub model: String,
    pub year: i32,
}

/// Optional search terms: make/model match as substrings, year matches exactly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleCriteria {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
}

impl VehicleCriteria {
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.make.as_deref().map_or(true, |m| vehicle.make.contains(m))
            && self.model.as_deref().map_or(true, |m| vehicle.model.contains(m))
            && self.year.map_or(true, |y| vehicle.year == y)
    }
}
