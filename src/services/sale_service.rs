use std::sync::Arc;

use crate::access::AccessValidator;
use crate::context::CallerContext;
use crate::database::models::{NewSale, Sale, SaleChanges};
use crate::database::SaleStore;
use crate::services::{ServiceError, ServiceResult};

#[derive(Clone)]
pub struct SaleService {
    store: Arc<dyn SaleStore>,
    access: AccessValidator,
}

impl SaleService {
    pub fn new(store: Arc<dyn SaleStore>, access: AccessValidator) -> Self {
        Self { store, access }
    }

    pub async fn get_sale(
        &self,
        caller: &CallerContext,
        sale_id: &str,
        dealership_id: Option<&str>,
    ) -> ServiceResult<Sale> {
        tracing::info!("Fetching sale with ID: {}", sale_id);
        self.access
            .scoped(caller, dealership_id, |scope| async move {
                self.store
                    .get(sale_id, &scope)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("sale", sale_id))
            })
            .await
    }

    /// Sales of an explicitly named dealership. The target is always checked,
    /// even when it is the caller's own dealership.
    pub async fn sales_by_dealership(&self, caller: &CallerContext, dealership_id: &str) -> ServiceResult<Vec<Sale>> {
        tracing::info!("Fetching sales for dealership ID: {}", dealership_id);
        self.access
            .scoped(caller, Some(dealership_id), |scope| async move {
                Ok::<_, ServiceError>(self.store.list_by_dealership(&scope).await?)
            })
            .await
    }

    pub async fn create_sale(
        &self,
        caller: &CallerContext,
        input: NewSale,
        dealership_id: Option<&str>,
    ) -> ServiceResult<Sale> {
        tracing::info!(
            "Creating sale of vehicle {} to customer {}",
            input.vehicle_id,
            input.customer_id
        );
        self.access
            .scoped(caller, dealership_id, |scope| async move {
                let created = self.store.create(&scope, input).await?;
                self.store
                    .get(&created.sale_id, &scope)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("sale", created.sale_id.as_str()))
            })
            .await
    }

    pub async fn update_sale(
        &self,
        caller: &CallerContext,
        sale_id: &str,
        changes: SaleChanges,
        dealership_id: Option<&str>,
    ) -> ServiceResult<Sale> {
        tracing::info!("Updating sale with ID: {}", sale_id);
        self.access
            .scoped(caller, dealership_id, |scope| async move {
                self.store
                    .update(sale_id, &scope, changes)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("sale", sale_id))
            })
            .await
    }

    pub async fn delete_sale(
        &self,
        caller: &CallerContext,
        sale_id: &str,
        dealership_id: Option<&str>,
    ) -> ServiceResult<Sale> {
        tracing::info!("Deleting sale with ID: {}", sale_id);
        self.access
            .scoped(caller, dealership_id, |scope| async move {
                self.store
                    .delete(sale_id, &scope)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("sale", sale_id))
            })
            .await
    }
}
