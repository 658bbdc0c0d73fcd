// handlers/public/mod.rs - Endpoints that do not require a bearer token

pub mod auth;
pub mod system;

pub use auth::token_get;
pub use system::{health, root};
