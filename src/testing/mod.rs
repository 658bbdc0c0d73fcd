//! Fixtures for unit tests: a fully wired service stack over the in-memory
//! store, with call counters on the stores whose traffic tests assert on.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::access::AccessValidator;
use crate::database::models::{
    Customer, CustomerChanges, Dealership, DealershipUpdate, NewCustomer, NewDealership, NewSale, NewVehicle,
};
use crate::database::{CustomerStore, DatabaseError, DealershipStore, MemoryStore};
use crate::hierarchy::HierarchyResolver;
use crate::services::{CustomerService, DealershipService, SaleService, VehicleService};

/// Dealership store that counts every call before delegating.
pub struct CountingDealershipStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingDealershipStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DealershipStore for CountingDealershipStore {
    async fn get_by_id(&self, dealership_id: &str) -> Result<Option<Dealership>, DatabaseError> {
        self.hit();
        self.inner.get_by_id(dealership_id).await
    }

    async fn get_children(&self, dealership_id: &str) -> Result<Vec<Dealership>, DatabaseError> {
        self.hit();
        self.inner.get_children(dealership_id).await
    }

    async fn get_ancestor_chain(&self, dealership_id: &str) -> Result<Vec<Dealership>, DatabaseError> {
        self.hit();
        self.inner.get_ancestor_chain(dealership_id).await
    }

    async fn get_descendant_ids(&self, dealership_id: &str) -> Result<HashSet<String>, DatabaseError> {
        self.hit();
        self.inner.get_descendant_ids(dealership_id).await
    }

    async fn list_by_ids(&self, ids: &[String]) -> Result<Vec<Dealership>, DatabaseError> {
        self.hit();
        self.inner.list_by_ids(ids).await
    }

    async fn create(&self, input: NewDealership) -> Result<Dealership, DatabaseError> {
        self.hit();
        DealershipStore::create(&self.inner, input).await
    }

    async fn update(&self, dealership_id: &str, input: DealershipUpdate) -> Result<Option<Dealership>, DatabaseError> {
        self.hit();
        DealershipStore::update(&self.inner, dealership_id, input).await
    }
}

/// Customer store that counts every call before delegating.
pub struct CountingCustomerStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingCustomerStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CustomerStore for CountingCustomerStore {
    async fn create(&self, dealership_id: &str, input: NewCustomer) -> Result<Customer, DatabaseError> {
        self.hit();
        CustomerStore::create(&self.inner, dealership_id, input).await
    }

    async fn get(&self, customer_id: &str, dealership_id: &str) -> Result<Option<Customer>, DatabaseError> {
        self.hit();
        CustomerStore::get(&self.inner, customer_id, dealership_id).await
    }

    async fn search(&self, dealership_id: &str, last_name: Option<&str>) -> Result<Vec<Customer>, DatabaseError> {
        self.hit();
        CustomerStore::search(&self.inner, dealership_id, last_name).await
    }

    async fn update(
        &self,
        customer_id: &str,
        dealership_id: &str,
        changes: CustomerChanges,
    ) -> Result<Option<Customer>, DatabaseError> {
        self.hit();
        CustomerStore::update(&self.inner, customer_id, dealership_id, changes).await
    }

    async fn delete(&self, customer_id: &str, dealership_id: &str) -> Result<Option<Customer>, DatabaseError> {
        self.hit();
        CustomerStore::delete(&self.inner, customer_id, dealership_id).await
    }
}

/// Services wired over one shared [`MemoryStore`].
pub struct TestContext {
    pub memory: MemoryStore,
    pub dealership_store: Arc<CountingDealershipStore>,
    pub customer_store: Arc<CountingCustomerStore>,
    pub dealerships: DealershipService,
    pub customers: CustomerService,
    pub vehicles: VehicleService,
    pub sales: SaleService,
    access: AccessValidator,
}

impl TestContext {
    pub fn new() -> Self {
        let memory = MemoryStore::new();
        let dealership_store = Arc::new(CountingDealershipStore::new(memory.clone()));
        let customer_store = Arc::new(CountingCustomerStore::new(memory.clone()));
        let access = AccessValidator::new(HierarchyResolver::new(dealership_store.clone()));
        let shared = Arc::new(memory.clone());

        Self {
            dealerships: DealershipService::new(
                dealership_store.clone(),
                customer_store.clone(),
                shared.clone(),
                shared.clone(),
                access.clone(),
            ),
            customers: CustomerService::new(customer_store.clone(), access.clone()),
            vehicles: VehicleService::new(shared.clone(), access.clone()),
            sales: SaleService::new(shared, access.clone()),
            memory,
            dealership_store,
            customer_store,
            access,
        }
    }

    pub fn validator(&self) -> AccessValidator {
        self.access.clone()
    }

    /// Insert a dealership directly, bypassing access checks and call counters.
    pub async fn add_dealership(&self, name: &str, parent: Option<&str>) -> String {
        DealershipStore::create(
            &self.memory,
            NewDealership {
                name: name.to_string(),
                address: format!("{} Main St", name.len()),
                parent_dealership_id: parent.map(str::to_string),
            },
        )
        .await
        .expect("seed dealership")
        .dealership_id
    }
}

pub fn new_customer(first_name: &str, last_name: &str) -> NewCustomer {
    NewCustomer {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!("{}.{}@example.com", first_name, last_name).to_lowercase(),
        phone: "555-0100".to_string(),
    }
}

pub fn new_vehicle(make: &str, model: &str, year: i32) -> NewVehicle {
    NewVehicle {
        make: make.to_string(),
        model: model.to_string(),
        year,
    }
}

pub fn new_sale(vehicle_id: &str, customer_id: &str) -> NewSale {
    NewSale {
        date: Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap(),
        purchase_net_amount: Decimal::new(2_499_900, 2),
        vehicle_id: vehicle_id.to_string(),
        customer_id: customer_id.to_string(),
    }
}
