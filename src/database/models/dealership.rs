use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Customer, Sale, Vehicle};

/// A node in the dealership tree. `parent_dealership_id == None` marks a root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Dealership {
    pub dealership_id: String,
    pub name: String,
    pub address: String,
    pub parent_dealership_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dealership {
    pub fn is_root(&self) -> bool {
        self.parent_dealership_id.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDealership {
    pub name: String,
    pub address: String,
    pub parent_dealership_id: Option<String>,
}

/// Replacement values for an existing dealership. A `None` parent keeps the current one.
#[derive(Debug, Clone, Deserialize)]
pub struct DealershipUpdate {
    pub name: String,
    pub address: String,
    pub parent_dealership_id: Option<String>,
}

/// Listing shape: a dealership with its direct children.
#[derive(Debug, Clone, Serialize)]
pub struct DealershipNode {
    #[serde(flatten)]
    pub dealership: Dealership,
    pub sub_dealerships: Vec<Dealership>,
}

/// Point-read shape: a single dealership with everything it owns.
#[derive(Debug, Clone, Serialize)]
pub struct DealershipDetail {
    #[serde(flatten)]
    pub dealership: Dealership,
    pub sub_dealerships: Vec<Dealership>,
    pub customers: Vec<Customer>,
    pub vehicles: Vec<Vehicle>,
    pub sales: Vec<Sale>,
}
