pub mod customer_service;
pub mod dealership_service;
pub mod sale_service;
pub mod vehicle_service;

pub use customer_service::CustomerService;
pub use dealership_service::DealershipService;
pub use sale_service::SaleService;
pub use vehicle_service::VehicleService;

use thiserror::Error;

use crate::access::AccessDenied;
use crate::database::manager::DatabaseError;

/// Failures surfaced by the resource services. Every variant is terminal for
/// the current request; none of them is retried.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller is neither the target dealership nor one of its ancestors.
    #[error(transparent)]
    Unauthorized(#[from] AccessDenied),

    /// Missing id, or an id that exists under a different dealership.
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    #[error("Invalid dealership hierarchy: {0}")]
    InvalidHierarchy(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ServiceError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            resource,
            id: id.into(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
