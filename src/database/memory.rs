//! In-process implementation of every store trait.
//!
//! Used when no `DATABASE_URL` is configured and by the test suites. Referential
//! checks mirror the foreign keys of the Postgres schema so both backends
//! reject the same writes.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::customer_store::CustomerStore;
use crate::database::dealership_store::DealershipStore;
use crate::database::manager::DatabaseError;
use crate::database::models::{
    Customer, CustomerChanges, Dealership, DealershipUpdate, NewCustomer, NewDealership, NewSale, NewVehicle,
    Sale, SaleChanges, Vehicle, VehicleChanges, VehicleCriteria,
};
use crate::database::sale_store::SaleStore;
use crate::database::vehicle_store::VehicleStore;

#[derive(Default)]
struct MemoryState {
    dealerships: HashMap<String, Dealership>,
    customers: HashMap<String, Customer>,
    vehicles: HashMap<String, Vehicle>,
    sales: HashMap<String, Sale>,
}

impl MemoryState {
    fn require_dealership(&self, dealership_id: &str) -> Result<(), DatabaseError> {
        if self.dealerships.contains_key(dealership_id) {
            Ok(())
        } else {
            Err(DatabaseError::ForeignKeyViolation(format!(
                "dealership '{}' does not exist",
                dealership_id
            )))
        }
    }

    fn require_sale_links(&self, vehicle_id: &str, customer_id: &str) -> Result<(), DatabaseError> {
        if !self.vehicles.contains_key(vehicle_id) {
            return Err(DatabaseError::ForeignKeyViolation(format!(
                "vehicle '{}' does not exist",
                vehicle_id
            )));
        }
        if !self.customers.contains_key(customer_id) {
            return Err(DatabaseError::ForeignKeyViolation(format!(
                "customer '{}' does not exist",
                customer_id
            )));
        }
        Ok(())
    }
}

/// Shared in-memory backend. Clones share the same underlying tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a dealership exactly as given, skipping the parent check.
    /// Lets fixtures reproduce detached nodes left behind by external writers.
    pub async fn insert_unchecked(&self, dealership: Dealership) {
        let mut state = self.state.write().await;
        state.dealerships.insert(dealership.dealership_id.clone(), dealership);
    }

    pub async fn dealership_count(&self) -> usize {
        self.state.read().await.dealerships.len()
    }
}

fn sorted_by<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(|item| key(item));
    items
}

#[async_trait]
impl DealershipStore for MemoryStore {
    async fn get_by_id(&self, dealership_id: &str) -> Result<Option<Dealership>, DatabaseError> {
        Ok(self.state.read().await.dealerships.get(dealership_id).cloned())
    }

    async fn get_children(&self, dealership_id: &str) -> Result<Vec<Dealership>, DatabaseError> {
        let state = self.state.read().await;
        let children = state
            .dealerships
            .values()
            .filter(|d| d.parent_dealership_id.as_deref() == Some(dealership_id))
            .cloned()
            .collect();
        Ok(sorted_by(children, |d: &Dealership| (d.name.clone(), d.dealership_id.clone())))
    }

    async fn get_ancestor_chain(&self, dealership_id: &str) -> Result<Vec<Dealership>, DatabaseError> {
        let state = self.state.read().await;
        let mut chain: Vec<Dealership> = Vec::new();
        let mut seen = HashSet::new();
        let mut current = state.dealerships.get(dealership_id);

        while let Some(node) = current {
            if !seen.insert(node.dealership_id.as_str()) {
                break;
            }
            chain.push(node.clone());
            current = node
                .parent_dealership_id
                .as_deref()
                .and_then(|parent| state.dealerships.get(parent));
        }

        Ok(chain)
    }

    async fn get_descendant_ids(&self, dealership_id: &str) -> Result<HashSet<String>, DatabaseError> {
        let state = self.state.read().await;
        if !state.dealerships.contains_key(dealership_id) {
            return Ok(HashSet::new());
        }

        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for node in state.dealerships.values() {
            if let Some(parent) = node.parent_dealership_id.as_deref() {
                children.entry(parent).or_default().push(node.dealership_id.as_str());
            }
        }

        let mut found = HashSet::new();
        let mut queue = VecDeque::from([dealership_id]);
        found.insert(dealership_id.to_string());

        while let Some(id) = queue.pop_front() {
            for child in children.get(id).into_iter().flatten() {
                if found.insert(child.to_string()) {
                    queue.push_back(*child);
                }
            }
        }

        Ok(found)
    }

    async fn list_by_ids(&self, ids: &[String]) -> Result<Vec<Dealership>, DatabaseError> {
        let state = self.state.read().await;
        let found = ids
            .iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter_map(|id| state.dealerships.get(id).cloned())
            .collect();
        Ok(sorted_by(found, |d: &Dealership| (d.name.clone(), d.dealership_id.clone())))
    }

    async fn create(&self, input: NewDealership) -> Result<Dealership, DatabaseError> {
        let mut state = self.state.write().await;
        if let Some(parent) = input.parent_dealership_id.as_deref() {
            state.require_dealership(parent)?;
        }

        let now = Utc::now();
        let dealership = Dealership {
            dealership_id: Uuid::new_v4().to_string(),
            name: input.name,
            address: input.address,
            parent_dealership_id: input.parent_dealership_id,
            created_at: now,
            updated_at: now,
        };
        state
            .dealerships
            .insert(dealership.dealership_id.clone(), dealership.clone());
        Ok(dealership)
    }

    async fn update(
        &self,
        dealership_id: &str,
        input: DealershipUpdate,
    ) -> Result<Option<Dealership>, DatabaseError> {
        let mut state = self.state.write().await;
        if let Some(parent) = input.parent_dealership_id.as_deref() {
            state.require_dealership(parent)?;
        }

        let Some(existing) = state.dealerships.get_mut(dealership_id) else {
            return Ok(None);
        };
        existing.name = input.name;
        existing.address = input.address;
        if input.parent_dealership_id.is_some() {
            existing.parent_dealership_id = input.parent_dealership_id;
        }
        existing.updated_at = Utc::now();
        Ok(Some(existing.clone()))
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn create(&self, dealership_id: &str, input: NewCustomer) -> Result<Customer, DatabaseError> {
        let mut state = self.state.write().await;
        state.require_dealership(dealership_id)?;

        let now = Utc::now();
        let customer = Customer {
            customer_id: Uuid::new_v4().to_string(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            dealership_id: dealership_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.customers.insert(customer.customer_id.clone(), customer.clone());
        Ok(customer)
    }

    async fn get(&self, customer_id: &str, dealership_id: &str) -> Result<Option<Customer>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .customers
            .get(customer_id)
            .filter(|c| c.dealership_id == dealership_id)
            .cloned())
    }

    async fn search(
        &self,
        dealership_id: &str,
        last_name: Option<&str>,
    ) -> Result<Vec<Customer>, DatabaseError> {
        let state = self.state.read().await;
        let found = state
            .customers
            .values()
            .filter(|c| c.dealership_id == dealership_id)
            .filter(|c| last_name.map_or(true, |needle| c.last_name.contains(needle)))
            .cloned()
            .collect();
        Ok(sorted_by(found, |c: &Customer| {
            (c.last_name.clone(), c.first_name.clone(), c.customer_id.clone())
        }))
    }

    async fn update(
        &self,
        customer_id: &str,
        dealership_id: &str,
        changes: CustomerChanges,
    ) -> Result<Option<Customer>, DatabaseError> {
        let mut state = self.state.write().await;
        let Some(customer) = state
            .customers
            .get_mut(customer_id)
            .filter(|c| c.dealership_id == dealership_id)
        else {
            return Ok(None);
        };
        customer.first_name = changes.first_name;
        customer.last_name = changes.last_name;
        customer.email = changes.email;
        customer.phone = changes.phone;
        customer.updated_at = Utc::now();
        Ok(Some(customer.clone()))
    }

    async fn delete(&self, customer_id: &str, dealership_id: &str) -> Result<Option<Customer>, DatabaseError> {
        let mut state = self.state.write().await;
        let owned = state
            .customers
            .get(customer_id)
            .is_some_and(|c| c.dealership_id == dealership_id);
        if !owned {
            return Ok(None);
        }
        state.sales.retain(|_, sale| sale.customer_id != customer_id);
        Ok(state.customers.remove(customer_id))
    }
}

#[async_trait]
impl VehicleStore for MemoryStore {
    async fn create(&self, dealership_id: &str, input: NewVehicle) -> Result<Vehicle, DatabaseError> {
        let mut state = self.state.write().await;
        state.require_dealership(dealership_id)?;

        let now = Utc::now();
        let vehicle = Vehicle {
            vehicle_id: Uuid::new_v4().to_string(),
            make: input.make,
            model: input.model,
            year: input.year,
            dealership_id: dealership_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.vehicles.insert(vehicle.vehicle_id.clone(), vehicle.clone());
        Ok(vehicle)
    }

    async fn get(&self, vehicle_id: &str, dealership_id: &str) -> Result<Option<Vehicle>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .vehicles
            .get(vehicle_id)
            .filter(|v| v.dealership_id == dealership_id)
            .cloned())
    }

    async fn search(
        &self,
        dealership_id: &str,
        criteria: &VehicleCriteria,
    ) -> Result<Vec<Vehicle>, DatabaseError> {
        let state = self.state.read().await;
        let found = state
            .vehicles
            .values()
            .filter(|v| v.dealership_id == dealership_id && criteria.matches(v))
            .cloned()
            .collect();
        Ok(sorted_by(found, |v: &Vehicle| {
            (v.make.clone(), v.model.clone(), v.year, v.vehicle_id.clone())
        }))
    }

    async fn update(
        &self,
        vehicle_id: &str,
        dealership_id: &str,
        changes: VehicleChanges,
    ) -> Result<Option<Vehicle>, DatabaseError> {
        let mut state = self.state.write().await;
        let Some(vehicle) = state
            .vehicles
            .get_mut(vehicle_id)
            .filter(|v| v.dealership_id == dealership_id)
        else {
            return Ok(None);
        };
        vehicle.make = changes.make;
        vehicle.model = changes.model;
        vehicle.year = changes.year;
        vehicle.updated_at = Utc::now();
        Ok(Some(vehicle.clone()))
    }

    async fn delete(&self, vehicle_id: &str, dealership_id: &str) -> Result<Option<Vehicle>, DatabaseError> {
        let mut state = self.state.write().await;
        let owned = state
            .vehicles
            .get(vehicle_id)
            .is_some_and(|v| v.dealership_id == dealership_id);
        if !owned {
            return Ok(None);
        }
        state.sales.retain(|_, sale| sale.vehicle_id != vehicle_id);
        Ok(state.vehicles.remove(vehicle_id))
    }
}

#[async_trait]
impl SaleStore for MemoryStore {
    async fn create(&self, dealership_id: &str, input: NewSale) -> Result<Sale, DatabaseError> {
        let mut state = self.state.write().await;
        state.require_dealership(dealership_id)?;
        state.require_sale_links(&input.vehicle_id, &input.customer_id)?;

        let now = Utc::now();
        let sale = Sale {
            sale_id: Uuid::new_v4().to_string(),
            date: input.date,
            purchase_net_amount: input.purchase_net_amount,
            vehicle_id: input.vehicle_id,
            customer_id: input.customer_id,
            dealership_id: dealership_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.sales.insert(sale.sale_id.clone(), sale.clone());
        Ok(sale)
    }

    async fn get(&self, sale_id: &str, dealership_id: &str) -> Result<Option<Sale>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .sales
            .get(sale_id)
            .filter(|s| s.dealership_id == dealership_id)
            .cloned())
    }

    async fn list_by_dealership(&self, dealership_id: &str) -> Result<Vec<Sale>, DatabaseError> {
        let state = self.state.read().await;
        let mut found: Vec<Sale> = state
            .sales
            .values()
            .filter(|s| s.dealership_id == dealership_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.sale_id.cmp(&b.sale_id)));
        Ok(found)
    }

    async fn update(
        &self,
        sale_id: &str,
        dealership_id: &str,
        changes: SaleChanges,
    ) -> Result<Option<Sale>, DatabaseError> {
        let mut state = self.state.write().await;
        let owned = state
            .sales
            .get(sale_id)
            .is_some_and(|s| s.dealership_id == dealership_id);
        if !owned {
            return Ok(None);
        }
        state.require_sale_links(&changes.vehicle_id, &changes.customer_id)?;

        let Some(sale) = state.sales.get_mut(sale_id) else {
            return Ok(None);
        };
        sale.date = changes.date;
        sale.purchase_net_amount = changes.purchase_net_amount;
        sale.vehicle_id = changes.vehicle_id;
        sale.customer_id = changes.customer_id;
        sale.updated_at = Utc::now();
        Ok(Some(sale.clone()))
    }

    async fn delete(&self, sale_id: &str, dealership_id: &str) -> Result<Option<Sale>, DatabaseError> {
        let mut state = self.state.write().await;
        let owned = state
            .sales
            .get(sale_id)
            .is_some_and(|s| s.dealership_id == dealership_id);
        if !owned {
            return Ok(None);
        }
        Ok(state.sales.remove(sale_id))
    }
}
