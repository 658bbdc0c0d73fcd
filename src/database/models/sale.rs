use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Record of a sale transaction. `vehicle_id`/`customer_id` are informational links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Sale {
    pub sale_id: String,
    pub date: DateTime<Utc>,
    pub purchase_net_amount: Decimal,
    pub vehicle_id: String,
    pub customer_id: String,
    pub dealership_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSale {
    pub date: DateTime<Utc>,
    pub purchase_net_amount: Decimal,
    pub vehicle_id: String,
    pub customer_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaleChanges {
    pub date: DateTime<Utc>,
    pub purchase_net_amount: Decimal,
    pub vehicle_id: String,
    pub customer_id: String,
}
