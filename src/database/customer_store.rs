use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Customer, CustomerChanges, NewCustomer};

/// Customer records keyed by `(customer_id, dealership_id)`.
///
/// A lookup with the wrong dealership behaves exactly like a missing id.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn create(&self, dealership_id: &str, input: NewCustomer) -> Result<Customer, DatabaseError>;

    async fn get(&self, customer_id: &str, dealership_id: &str) -> Result<Option<Customer>, DatabaseError>;

    /// Customers of one dealership, optionally narrowed to last names containing `last_name`.
    async fn search(
        &self,
        dealership_id: &str,
        last_name: Option<&str>,
    ) -> Result<Vec<Customer>, DatabaseError>;

    async fn update(
        &self,
        customer_id: &str,
        dealership_id: &str,
        changes: CustomerChanges,
    ) -> Result<Option<Customer>, DatabaseError>;

    async fn delete(&self, customer_id: &str, dealership_id: &str) -> Result<Option<Customer>, DatabaseError>;
}

const COLUMNS: &str = "customer_id, first_name, last_name, email, phone, dealership_id, created_at, updated_at";

pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn create(&self, dealership_id: &str, input: NewCustomer) -> Result<Customer, DatabaseError> {
        let sql = format!(
            "INSERT INTO customers (customer_id, first_name, last_name, email, phone, dealership_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Customer>(&sql)
            .bind(Uuid::new_v4().to_string())
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(dealership_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get(&self, customer_id: &str, dealership_id: &str) -> Result<Option<Customer>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM customers WHERE customer_id = $1 AND dealership_id = $2");
        let row = sqlx::query_as::<_, Customer>(&sql)
            .bind(customer_id)
            .bind(dealership_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn search(
        &self,
        dealership_id: &str,
        last_name: Option<&str>,
    ) -> Result<Vec<Customer>, DatabaseError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM customers \
             WHERE dealership_id = $1 AND ($2::TEXT IS NULL OR strpos(last_name, $2) > 0) \
             ORDER BY last_name, first_name, customer_id"
        );
        let rows = sqlx::query_as::<_, Customer>(&sql)
            .bind(dealership_id)
            .bind(last_name)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update(
        &self,
        customer_id: &str,
        dealership_id: &str,
        changes: CustomerChanges,
    ) -> Result<Option<Customer>, DatabaseError> {
        let sql = format!(
            "UPDATE customers SET first_name = $3, last_name = $4, email = $5, phone = $6, updated_at = $7 \
             WHERE customer_id = $1 AND dealership_id = $2 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Customer>(&sql)
            .bind(customer_id)
            .bind(dealership_id)
            .bind(&changes.first_name)
            .bind(&changes.last_name)
            .bind(&changes.email)
            .bind(&changes.phone)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, customer_id: &str, dealership_id: &str) -> Result<Option<Customer>, DatabaseError> {
        let sql = format!(
            "DELETE FROM customers WHERE customer_id = $1 AND dealership_id = $2 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Customer>(&sql)
            .bind(customer_id)
            .bind(dealership_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
