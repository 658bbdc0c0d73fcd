//! Idempotent table definitions for the dealership database.
//!
//! Every resource table carries `dealership_id` as part of its lookup key.
//! The dealership table is a self-referencing adjacency list.

use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;

const SCHEMA: &[(&str, &str)] = &[
    (
        "dealerships",
        r#"
        CREATE TABLE IF NOT EXISTS dealerships (
            dealership_id        TEXT PRIMARY KEY,
            name                 TEXT NOT NULL,
            address              TEXT NOT NULL,
            parent_dealership_id TEXT NULL REFERENCES dealerships (dealership_id),
            created_at           TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at           TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "dealerships_parent_idx",
        "CREATE INDEX IF NOT EXISTS dealerships_parent_idx ON dealerships (parent_dealership_id)",
    ),
    (
        "customers",
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            customer_id   TEXT PRIMARY KEY,
            first_name    TEXT NOT NULL,
            last_name     TEXT NOT NULL,
            email         TEXT NOT NULL,
            phone         TEXT NOT NULL,
            dealership_id TEXT NOT NULL REFERENCES dealerships (dealership_id),
            created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "customers_scope_idx",
        "CREATE INDEX IF NOT EXISTS customers_scope_idx ON customers (customer_id, dealership_id)",
    ),
    (
        "vehicles",
        r#"
        CREATE TABLE IF NOT EXISTS vehicles (
            vehicle_id    TEXT PRIMARY KEY,
            make          TEXT NOT NULL,
            model         TEXT NOT NULL,
            year          INTEGER NOT NULL,
            dealership_id TEXT NOT NULL REFERENCES dealerships (dealership_id),
            created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "vehicles_scope_idx",
        "CREATE INDEX IF NOT EXISTS vehicles_scope_idx ON vehicles (vehicle_id, dealership_id)",
    ),
    (
        "sales",
        r#"
        CREATE TABLE IF NOT EXISTS sales (
            sale_id             TEXT PRIMARY KEY,
            date                TIMESTAMPTZ NOT NULL,
            purchase_net_amount NUMERIC(14, 2) NOT NULL,
            vehicle_id          TEXT NOT NULL REFERENCES vehicles (vehicle_id) ON DELETE CASCADE,
            customer_id         TEXT NOT NULL REFERENCES customers (customer_id) ON DELETE CASCADE,
            dealership_id       TEXT NOT NULL REFERENCES dealerships (dealership_id),
            created_at          TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at          TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "sales_scope_idx",
        "CREATE INDEX IF NOT EXISTS sales_scope_idx ON sales (sale_id, dealership_id)",
    ),
];

/// Create any missing tables and indexes.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    for (name, ddl) in SCHEMA {
        sqlx::query(ddl).execute(pool).await?;
        tracing::debug!("Ensured schema object: {}", name);
    }
    info!("Database schema ready ({} objects)", SCHEMA.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_precede_their_dependents() {
        let position = |name: &str| SCHEMA.iter().position(|(n, _)| *n == name).unwrap();
        assert!(position("dealerships") < position("customers"));
        assert!(position("customers") < position("sales"));
        assert!(position("vehicles") < position("sales"));
    }

    #[test]
    fn statements_are_idempotent() {
        for (name, ddl) in SCHEMA {
            assert!(ddl.contains("IF NOT EXISTS"), "{} is not idempotent", name);
        }
    }
}
