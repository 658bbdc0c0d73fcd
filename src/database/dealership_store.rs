use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Dealership, DealershipUpdate, NewDealership};

/// Persistent table of dealership nodes linked by parent pointers.
///
/// Traversals are unbounded in depth but never revisit a node, so they
/// terminate even when the stored parent links form a cycle.
#[async_trait]
pub trait DealershipStore: Send + Sync {
    async fn get_by_id(&self, dealership_id: &str) -> Result<Option<Dealership>, DatabaseError>;

    /// Direct children only.
    async fn get_children(&self, dealership_id: &str) -> Result<Vec<Dealership>, DatabaseError>;

    /// The node itself followed by each parent up to the root (or the first
    /// broken link). Empty when the node does not exist.
    async fn get_ancestor_chain(&self, dealership_id: &str) -> Result<Vec<Dealership>, DatabaseError>;

    /// Every node reachable through child links, including the start node.
    /// Empty when the node does not exist.
    async fn get_descendant_ids(&self, dealership_id: &str) -> Result<HashSet<String>, DatabaseError>;

    async fn list_by_ids(&self, ids: &[String]) -> Result<Vec<Dealership>, DatabaseError>;

    async fn create(&self, input: NewDealership) -> Result<Dealership, DatabaseError>;

    /// Returns `None` when the dealership does not exist.
    async fn update(
        &self,
        dealership_id: &str,
        input: DealershipUpdate,
    ) -> Result<Option<Dealership>, DatabaseError>;
}

const COLUMNS: &str = "dealership_id, name, address, parent_dealership_id, created_at, updated_at";

pub struct PgDealershipStore {
    pool: PgPool,
}

impl PgDealershipStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DealershipStore for PgDealershipStore {
    async fn get_by_id(&self, dealership_id: &str) -> Result<Option<Dealership>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM dealerships WHERE dealership_id = $1");
        let row = sqlx::query_as::<_, Dealership>(&sql)
            .bind(dealership_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_children(&self, dealership_id: &str) -> Result<Vec<Dealership>, DatabaseError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM dealerships WHERE parent_dealership_id = $1 ORDER BY name, dealership_id"
        );
        let rows = sqlx::query_as::<_, Dealership>(&sql)
            .bind(dealership_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_ancestor_chain(&self, dealership_id: &str) -> Result<Vec<Dealership>, DatabaseError> {
        let sql = r#"
            WITH RECURSIVE chain AS (
                SELECT d.dealership_id, d.name, d.address, d.parent_dealership_id,
                       d.created_at, d.updated_at,
                       0 AS depth, ARRAY[d.dealership_id]::TEXT[] AS path
                FROM dealerships d
                WHERE d.dealership_id = $1
                UNION ALL
                SELECT p.dealership_id, p.name, p.address, p.parent_dealership_id,
                       p.created_at, p.updated_at,
                       c.depth + 1, c.path || p.dealership_id
                FROM dealerships p
                INNER JOIN chain c ON p.dealership_id = c.parent_dealership_id
                WHERE NOT p.dealership_id = ANY(c.path)
            )
            SELECT dealership_id, name, address, parent_dealership_id, created_at, updated_at
            FROM chain
            ORDER BY depth
        "#;
        let rows = sqlx::query_as::<_, Dealership>(sql)
            .bind(dealership_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_descendant_ids(&self, dealership_id: &str) -> Result<HashSet<String>, DatabaseError> {
        let sql = r#"
            WITH RECURSIVE subtree AS (
                SELECT d.dealership_id, ARRAY[d.dealership_id]::TEXT[] AS path
                FROM dealerships d
                WHERE d.dealership_id = $1
                UNION ALL
                SELECT d.dealership_id, s.path || d.dealership_id
                FROM dealerships d
                INNER JOIN subtree s ON d.parent_dealership_id = s.dealership_id
                WHERE NOT d.dealership_id = ANY(s.path)
            )
            SELECT DISTINCT dealership_id FROM subtree
        "#;
        let ids: Vec<(String,)> = sqlx::query_as(sql)
            .bind(dealership_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    async fn list_by_ids(&self, ids: &[String]) -> Result<Vec<Dealership>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!(
            "SELECT {COLUMNS} FROM dealerships WHERE dealership_id = ANY($1) ORDER BY name, dealership_id"
        );
        let rows = sqlx::query_as::<_, Dealership>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create(&self, input: NewDealership) -> Result<Dealership, DatabaseError> {
        let sql = format!(
            "INSERT INTO dealerships (dealership_id, name, address, parent_dealership_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Dealership>(&sql)
            .bind(Uuid::new_v4().to_string())
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.parent_dealership_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(
        &self,
        dealership_id: &str,
        input: DealershipUpdate,
    ) -> Result<Option<Dealership>, DatabaseError> {
        let sql = format!(
            "UPDATE dealerships SET name = $2, address = $3, \
             parent_dealership_id = COALESCE($4, parent_dealership_id), updated_at = $5 \
             WHERE dealership_id = $1 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Dealership>(&sql)
            .bind(dealership_id)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.parent_dealership_id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
