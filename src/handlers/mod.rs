// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth)      → /, /health, /auth/:dealership_id
// Protected (JWT auth)  → /api/*
pub mod protected;
pub mod public;

use serde::Deserialize;

/// `?dealership_id=` on protected routes. Absent means the caller's own dealership.
#[derive(Debug, Default, Deserialize)]
pub struct ScopeQuery {
    pub dealership_id: Option<String>,
}
