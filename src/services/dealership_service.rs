use std::collections::HashMap;
use std::sync::Arc;

use crate::access::AccessValidator;
use crate::context::CallerContext;
use crate::database::models::{
    Dealership, DealershipDetail, DealershipNode, DealershipUpdate, NewDealership, VehicleCriteria,
};
use crate::database::{CustomerStore, DealershipStore, SaleStore, VehicleStore};
use crate::services::{ServiceError, ServiceResult};

#[derive(Clone)]
pub struct DealershipService {
    store: Arc<dyn DealershipStore>,
    customers: Arc<dyn CustomerStore>,
    vehicles: Arc<dyn VehicleStore>,
    sales: Arc<dyn SaleStore>,
    access: AccessValidator,
}

impl DealershipService {
    pub fn new(
        store: Arc<dyn DealershipStore>,
        customers: Arc<dyn CustomerStore>,
        vehicles: Arc<dyn VehicleStore>,
        sales: Arc<dyn SaleStore>,
        access: AccessValidator,
    ) -> Self {
        Self {
            store,
            customers,
            vehicles,
            sales,
            access,
        }
    }

    /// Every dealership in the subtree of the effective dealership, each with its direct children.
    pub async fn list_dealerships(
        &self,
        caller: &CallerContext,
        dealership_id: Option<&str>,
    ) -> ServiceResult<Vec<DealershipNode>> {
        tracing::info!(
            "Fetching dealerships for dealership ID: {}",
            dealership_id.unwrap_or(caller.dealership_id())
        );
        self.access
            .scoped(caller, dealership_id, |root| async move { self.subtree(&root).await })
            .await
    }

    /// A single dealership with its children and everything it owns.
    pub async fn get_dealership(&self, caller: &CallerContext, dealership_id: &str) -> ServiceResult<DealershipDetail> {
        tracing::info!("Fetching dealership with ID: {}", dealership_id);
        self.access.require_access(caller, dealership_id).await?;

        let dealership = self
            .store
            .get_by_id(dealership_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("dealership", dealership_id))?;

        let criteria = VehicleCriteria::default();
        let (sub_dealerships, customers, vehicles, sales) = futures::try_join!(
            self.store.get_children(dealership_id),
            self.customers.search(dealership_id, None),
            self.vehicles.search(dealership_id, &criteria),
            self.sales.list_by_dealership(dealership_id),
        )?;

        Ok(DealershipDetail {
            dealership,
            sub_dealerships,
            customers,
            vehicles,
            sales,
        })
    }

    /// Create a dealership under `input.parent_dealership_id`, or under the
    /// caller's own dealership when no parent is given.
    pub async fn create_dealership(&self, caller: &CallerContext, input: NewDealership) -> ServiceResult<Dealership> {
        tracing::info!(
            "Creating dealership with name: {}, parentDealershipId: {:?}",
            input.name,
            input.parent_dealership_id
        );
        let parent = self
            .access
            .effective_dealership(caller, input.parent_dealership_id.as_deref())
            .await?;

        self.create_unscoped(NewDealership {
            parent_dealership_id: Some(parent),
            ..input
        })
        .await
    }

    /// Update name/address and optionally move the dealership under a new parent.
    pub async fn update_dealership(
        &self,
        caller: &CallerContext,
        dealership_id: &str,
        input: DealershipUpdate,
    ) -> ServiceResult<Dealership> {
        tracing::info!(
            "Updating dealership with ID: {}, new name: {}, parentDealershipId: {:?}",
            dealership_id,
            input.name,
            input.parent_dealership_id
        );
        self.access.require_access(caller, dealership_id).await?;

        if let Some(new_parent) = input.parent_dealership_id.as_deref() {
            self.access.require_access(caller, new_parent).await?;
            self.check_reparent(dealership_id, new_parent).await?;
        }

        self.store
            .update(dealership_id, input)
            .await?
            .ok_or_else(|| ServiceError::not_found("dealership", dealership_id))
    }

    /// Create without a caller check. Used by operator tooling to seed roots.
    pub async fn create_unscoped(&self, input: NewDealership) -> ServiceResult<Dealership> {
        if let Some(parent) = input.parent_dealership_id.as_deref() {
            if self.store.get_by_id(parent).await?.is_none() {
                return Err(ServiceError::not_found("dealership", parent));
            }
        }
        Ok(self.store.create(input).await?)
    }

    /// Path from the root down to `dealership_id`, inclusive. Empty when the
    /// dealership does not exist.
    pub async fn ancestry(&self, dealership_id: &str) -> Vec<Dealership> {
        let mut chain = self.access.resolver().ancestor_chain(dealership_id).await;
        chain.reverse();
        chain
    }

    /// `root_id` and all its descendants, each paired with its direct children.
    pub async fn subtree(&self, root_id: &str) -> ServiceResult<Vec<DealershipNode>> {
        let ids: Vec<String> = self
            .access
            .resolver()
            .descendants_of(root_id)
            .await
            .into_iter()
            .collect();
        let dealerships = self.store.list_by_ids(&ids).await?;

        let mut children: HashMap<&str, Vec<Dealership>> = HashMap::new();
        for dealership in &dealerships {
            if let Some(parent) = dealership.parent_dealership_id.as_deref() {
                children.entry(parent).or_default().push(dealership.clone());
            }
        }

        Ok(dealerships
            .iter()
            .map(|dealership| DealershipNode {
                dealership: dealership.clone(),
                sub_dealerships: children
                    .get(dealership.dealership_id.as_str())
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect())
    }

    /// Reject moves that would put a dealership under itself or its own subtree.
    async fn check_reparent(&self, dealership_id: &str, new_parent: &str) -> ServiceResult<()> {
        if self.store.get_by_id(new_parent).await?.is_none() {
            return Err(ServiceError::not_found("dealership", new_parent));
        }

        if new_parent == dealership_id
            || self.access.resolver().is_ancestor(dealership_id, new_parent).await
        {
            tracing::warn!(
                "Rejected re-parenting of dealership {} under its own descendant {}",
                dealership_id,
                new_parent
            );
            return Err(ServiceError::InvalidHierarchy(format!(
                "dealership '{}' cannot be moved under its own subtree ('{}')",
                dealership_id, new_parent
            )));
        }
        Ok(())
    }
}
