use std::sync::Arc;

use crate::access::AccessValidator;
use crate::context::CallerContext;
use crate::database::models::{Customer, CustomerChanges, NewCustomer};
use crate::database::CustomerStore;
use crate::services::{ServiceError, ServiceResult};

/// Customer CRUD scoped to the caller's subtree. Every operation takes an
/// optional dealership id; `None` means the caller's own dealership.
#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
    access: AccessValidator,
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>, access: AccessValidator) -> Self {
        Self { store, access }
    }

    pub async fn get_customer(
        &self,
        caller: &CallerContext,
        customer_id: &str,
        dealership_id: Option<&str>,
    ) -> ServiceResult<Customer> {
        tracing::info!("Fetching customer with ID: {}", customer_id);
        self.access
            .scoped(caller, dealership_id, |scope| async move {
                self.store
                    .get(customer_id, &scope)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("customer", customer_id))
            })
            .await
    }

    /// All customers of the dealership, or those whose last name contains `last_name`.
    pub async fn customers_by_last_name(
        &self,
        caller: &CallerContext,
        last_name: Option<&str>,
        dealership_id: Option<&str>,
    ) -> ServiceResult<Vec<Customer>> {
        tracing::info!("Fetching customers with last name: {:?}", last_name);
        self.access
            .scoped(caller, dealership_id, |scope| async move {
                Ok::<_, ServiceError>(self.store.search(&scope, last_name).await?)
            })
            .await
    }

    pub async fn create_customer(
        &self,
        caller: &CallerContext,
        input: NewCustomer,
        dealership_id: Option<&str>,
    ) -> ServiceResult<Customer> {
        tracing::info!("Creating customer {} {}", input.first_name, input.last_name);
        self.access
            .scoped(caller, dealership_id, |scope| async move {
                let created = self.store.create(&scope, input).await?;
                self.store
                    .get(&created.customer_id, &scope)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("customer", created.customer_id.as_str()))
            })
            .await
    }

    pub async fn update_customer(
        &self,
        caller: &CallerContext,
        customer_id: &str,
        changes: CustomerChanges,
        dealership_id: Option<&str>,
    ) -> ServiceResult<Customer> {
        tracing::info!("Updating customer with ID: {}", customer_id);
        self.access
            .scoped(caller, dealership_id, |scope| async move {
                self.store
                    .update(customer_id, &scope, changes)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("customer", customer_id))
            })
            .await
    }

    pub async fn delete_customer(
        &self,
        caller: &CallerContext,
        customer_id: &str,
        dealership_id: Option<&str>,
    ) -> ServiceResult<Customer> {
        tracing::info!("Deleting customer with ID: {}", customer_id);
        self.access
            .scoped(caller, dealership_id, |scope| async move {
                self.store
                    .delete(customer_id, &scope)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("customer", customer_id))
            })
            .await
    }
}
