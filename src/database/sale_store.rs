use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewSale, Sale, SaleChanges};

/// Sale records keyed by `(sale_id, dealership_id)`.
#[async_trait]
pub trait SaleStore: Send + Sync {
    async fn create(&self, dealership_id: &str, input: NewSale) -> Result<Sale, DatabaseError>;

    async fn get(&self, sale_id: &str, dealership_id: &str) -> Result<Option<Sale>, DatabaseError>;

    async fn list_by_dealership(&self, dealership_id: &str) -> Result<Vec<Sale>, DatabaseError>;

    async fn update(
        &self,
        sale_id: &str,
        dealership_id: &str,
        changes: SaleChanges,
    ) -> Result<Option<Sale>, DatabaseError>;

    async fn delete(&self, sale_id: &str, dealership_id: &str) -> Result<Option<Sale>, DatabaseError>;
}

const COLUMNS: &str =
    "sale_id, date, purchase_net_amount, vehicle_id, customer_id, dealership_id, created_at, updated_at";

pub struct PgSaleStore {
    pool: PgPool,
}

impl PgSaleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SaleStore for PgSaleStore {
    async fn create(&self, dealership_id: &str, input: NewSale) -> Result<Sale, DatabaseError> {
        let sql = format!(
            "INSERT INTO sales (sale_id, date, purchase_net_amount, vehicle_id, customer_id, dealership_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Sale>(&sql)
            .bind(Uuid::new_v4().to_string())
            .bind(input.date)
            .bind(input.purchase_net_amount)
            .bind(&input.vehicle_id)
            .bind(&input.customer_id)
            .bind(dealership_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get(&self, sale_id: &str, dealership_id: &str) -> Result<Option<Sale>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM sales WHERE sale_id = $1 AND dealership_id = $2");
        let row = sqlx::query_as::<_, Sale>(&sql)
            .bind(sale_id)
            .bind(dealership_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_by_dealership(&self, dealership_id: &str) -> Result<Vec<Sale>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM sales WHERE dealership_id = $1 ORDER BY date DESC, sale_id");
        let rows = sqlx::query_as::<_, Sale>(&sql)
            .bind(dealership_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update(
        &self,
        sale_id: &str,
        dealership_id: &str,
        changes: SaleChanges,
    ) -> Result<Option<Sale>, DatabaseError> {
        let sql = format!(
            "UPDATE sales SET date = $3, purchase_net_amount = $4, vehicle_id = $5, customer_id = $6, updated_at = $7 \
             WHERE sale_id = $1 AND dealership_id = $2 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Sale>(&sql)
            .bind(sale_id)
            .bind(dealership_id)
            .bind(changes.date)
            .bind(changes.purchase_net_amount)
            .bind(&changes.vehicle_id)
            .bind(&changes.customer_id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, sale_id: &str, dealership_id: &str) -> Result<Option<Sale>, DatabaseError> {
        let sql = format!("DELETE FROM sales WHERE sale_id = $1 AND dealership_id = $2 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, Sale>(&sql)
            .bind(sale_id)
            .bind(dealership_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
