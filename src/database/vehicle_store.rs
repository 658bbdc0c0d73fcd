use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewVehicle, Vehicle, VehicleChanges, VehicleCriteria};

/// Vehicle records keyed by `(vehicle_id, dealership_id)`.
#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn create(&self, dealership_id: &str, input: NewVehicle) -> Result<Vehicle, DatabaseError>;

    async fn get(&self, vehicle_id: &str, dealership_id: &str) -> Result<Option<Vehicle>, DatabaseError>;

    async fn search(
        &self,
        dealership_id: &str,
        criteria: &VehicleCriteria,
    ) -> Result<Vec<Vehicle>, DatabaseError>;

    async fn update(
        &self,
        vehicle_id: &str,
        dealership_id: &str,
        changes: VehicleChanges,
    ) -> Result<Option<Vehicle>, DatabaseError>;

    async fn delete(&self, vehicle_id: &str, dealership_id: &str) -> Result<Option<Vehicle>, DatabaseError>;
}

const COLUMNS: &str = "vehicle_id, make, model, year, dealership_id, created_at, updated_at";

pub struct PgVehicleStore {
    pool: PgPool,
}

impl PgVehicleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleStore for PgVehicleStore {
    async fn create(&self, dealership_id: &str, input: NewVehicle) -> Result<Vehicle, DatabaseError> {
        let sql = format!(
            "INSERT INTO vehicles (vehicle_id, make, model, year, dealership_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(Uuid::new_v4().to_string())
            .bind(&input.make)
            .bind(&input.model)
            .bind(input.year)
            .bind(dealership_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get(&self, vehicle_id: &str, dealership_id: &str) -> Result<Option<Vehicle>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM vehicles WHERE vehicle_id = $1 AND dealership_id = $2");
        let row = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(vehicle_id)
            .bind(dealership_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn search(
        &self,
        dealership_id: &str,
        criteria: &VehicleCriteria,
    ) -> Result<Vec<Vehicle>, DatabaseError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM vehicles \
             WHERE dealership_id = $1 \
               AND ($2::TEXT IS NULL OR strpos(make, $2) > 0) \
               AND ($3::TEXT IS NULL OR strpos(model, $3) > 0) \
               AND ($4::INTEGER IS NULL OR year = $4) \
             ORDER BY make, model, year, vehicle_id"
        );
        let rows = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(dealership_id)
            .bind(criteria.make.as_deref())
            .bind(criteria.model.as_deref())
            .bind(criteria.year)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update(
        &self,
        vehicle_id: &str,
        dealership_id: &str,
        changes: VehicleChanges,
    ) -> Result<Option<Vehicle>, DatabaseError> {
        let sql = format!(
            "UPDATE vehicles SET make = $3, model = $4, year = $5, updated_at = $6 \
             WHERE vehicle_id = $1 AND dealership_id = $2 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(vehicle_id)
            .bind(dealership_id)
            .bind(&changes.make)
            .bind(&changes.model)
            .bind(changes.year)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, vehicle_id: &str, dealership_id: &str) -> Result<Option<Vehicle>, DatabaseError> {
        let sql = format!(
            "DELETE FROM vehicles WHERE vehicle_id = $1 AND dealership_id = $2 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(vehicle_id)
            .bind(dealership_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
