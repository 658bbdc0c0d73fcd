use sqlx::PgPool;
use std::sync::Arc;

use crate::access::AccessValidator;
use crate::auth::{AuthService, TokenIssuer};
use crate::config::AppConfig;
use crate::database::{
    CustomerStore, DatabaseError, DatabaseManager, DealershipStore, MemoryStore, PgCustomerStore,
    PgDealershipStore, PgSaleStore, PgVehicleStore, SaleStore, VehicleStore,
};
use crate::hierarchy::HierarchyResolver;
use crate::services::{CustomerService, DealershipService, SaleService, VehicleService};

/// The four store handles every service is built from, backed either by one
/// Postgres pool or by one shared in-memory state.
#[derive(Clone)]
pub struct Stores {
    pub dealerships: Arc<dyn DealershipStore>,
    pub customers: Arc<dyn CustomerStore>,
    pub vehicles: Arc<dyn VehicleStore>,
    pub sales: Arc<dyn SaleStore>,
    pool: Option<PgPool>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            dealerships: Arc::new(PgDealershipStore::new(pool.clone())),
            customers: Arc::new(PgCustomerStore::new(pool.clone())),
            vehicles: Arc::new(PgVehicleStore::new(pool.clone())),
            sales: Arc::new(PgSaleStore::new(pool.clone())),
            pool: Some(pool),
        }
    }

    pub fn memory(store: MemoryStore) -> Self {
        let shared = Arc::new(store);
        Self {
            dealerships: shared.clone(),
            customers: shared.clone(),
            vehicles: shared.clone(),
            sales: shared,
            pool: None,
        }
    }

    pub fn backend(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        match &self.pool {
            Some(pool) => DatabaseManager::health_check(pool).await,
            None => Ok(()),
        }
    }
}

/// Shared handler state. Cheap to clone: every field is an `Arc` or wraps one.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub dealerships: DealershipService,
    pub customers: CustomerService,
    pub vehicles: VehicleService,
    pub sales: SaleService,
    pub stores: Stores,
    pub enable_token_endpoint: bool,
}

impl AppState {
    pub fn new(stores: Stores, config: &AppConfig) -> Self {
        let resolver = HierarchyResolver::new(stores.dealerships.clone());
        let access = AccessValidator::new(resolver);
        let issuer = TokenIssuer::new(&config.security);

        Self {
            auth: AuthService::new(stores.dealerships.clone(), issuer),
            dealerships: DealershipService::new(
                stores.dealerships.clone(),
                stores.customers.clone(),
                stores.vehicles.clone(),
                stores.sales.clone(),
                access.clone(),
            ),
            customers: CustomerService::new(stores.customers.clone(), access.clone()),
            vehicles: VehicleService::new(stores.vehicles.clone(), access.clone()),
            sales: SaleService::new(stores.sales.clone(), access),
            enable_token_endpoint: config.security.enable_token_endpoint,
            stores,
        }
    }
}
