use std::sync::Arc;

use crate::access::AccessValidator;
use crate::context::CallerContext;
use crate::database::models::{NewVehicle, Vehicle, VehicleChanges, VehicleCriteria};
use crate::database::VehicleStore;
use crate::services::{ServiceError, ServiceResult};

#[derive(Clone)]
pub struct VehicleService {
    store: Arc<dyn VehicleStore>,
    access: AccessValidator,
}

impl VehicleService {
    pub fn new(store: Arc<dyn VehicleStore>, access: AccessValidator) -> Self {
        Self { store, access }
    }

    pub async fn get_vehicle(
        &self,
        caller: &CallerContext,
        vehicle_id: &str,
        dealership_id: Option<&str>,
    ) -> ServiceResult<Vehicle> {
        tracing::info!("Fetching vehicle with ID: {}", vehicle_id);
        self.access
            .scoped(caller, dealership_id, |scope| async move {
                self.store
                    .get(vehicle_id, &scope)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("vehicle", vehicle_id))
            })
            .await
    }

    /// Make/model match as substrings, year matches exactly. Unset criteria match everything.
    pub async fn vehicles_by_criteria(
        &self,
        caller: &CallerContext,
        criteria: &VehicleCriteria,
        dealership_id: Option<&str>,
    ) -> ServiceResult<Vec<Vehicle>> {
        tracing::info!("Fetching vehicles with criteria: {:?}", criteria);
        self.access
            .scoped(caller, dealership_id, |scope| async move {
                Ok::<_, ServiceError>(self.store.search(&scope, criteria).await?)
            })
            .await
    }

    pub async fn create_vehicle(
        &self,
        caller: &CallerContext,
        input: NewVehicle,
        dealership_id: Option<&str>,
    ) -> ServiceResult<Vehicle> {
        tracing::info!("Creating vehicle {} {} ({})", input.make, input.model, input.year);
        self.access
            .scoped(caller, dealership_id, |scope| async move {
                let created = self.store.create(&scope, input).await?;
                self.store
                    .get(&created.vehicle_id, &scope)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("vehicle", created.vehicle_id.as_str()))
            })
            .await
    }

    pub async fn update_vehicle(
        &self,
        caller: &CallerContext,
        vehicle_id: &str,
        changes: VehicleChanges,
        dealership_id: Option<&str>,
    ) -> ServiceResult<Vehicle> {
        tracing::info!("Updating vehicle with ID: {}", vehicle_id);
        self.access
            .scoped(caller, dealership_id, |scope| async move {
                self.store
                    .update(vehicle_id, &scope, changes)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("vehicle", vehicle_id))
            })
            .await
    }

    pub async fn delete_vehicle(
        &self,
        caller: &CallerContext,
        vehicle_id: &str,
        dealership_id: Option<&str>,
    ) -> ServiceResult<Vehicle> {
        tracing::info!("Deleting vehicle with ID: {}", vehicle_id);
        self.access
            .scoped(caller, dealership_id, |scope| async move {
                self.store
                    .delete(vehicle_id, &scope)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("vehicle", vehicle_id))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{new_vehicle, TestContext};

    #[tokio::test]
    async fn criteria_combine_substring_and_exact_year() {
        let ctx = TestContext::new();
        let root = ctx.add_dealership("root", None).await;
        let caller = CallerContext::new(root);

        for (make, model, year) in [
            ("Toyota", "Corolla", 2020),
            ("Toyota", "Camry", 2021),
            ("Honda", "Civic", 2020),
        ] {
            ctx.vehicles
                .create_vehicle(&caller, new_vehicle(make, model, year), None)
                .await
                .unwrap();
        }

        let toyotas = VehicleCriteria {
            make: Some("Toy".to_string()),
            ..Default::default()
        };
        assert_eq!(ctx.vehicles.vehicles_by_criteria(&caller, &toyotas, None).await.unwrap().len(), 2);

        let year_2020 = VehicleCriteria {
            year: Some(2020),
            ..Default::default()
        };
        assert_eq!(ctx.vehicles.vehicles_by_criteria(&caller, &year_2020, None).await.unwrap().len(), 2);

        let both = VehicleCriteria {
            make: Some("Toyota".to_string()),
            model: None,
            year: Some(2021),
        };
        let found = ctx.vehicles.vehicles_by_criteria(&caller, &both, None).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].model, "Camry");
    }

    #[tokio::test]
    async fn update_is_keyed_by_id_and_dealership() {
        let ctx = TestContext::new();
        let root = ctx.add_dealership("root", None).await;
        let shop = ctx.add_dealership("shop", Some(&root)).await;

        let vehicle = ctx
            .vehicles
            .create_vehicle(&CallerContext::new(shop.clone()), new_vehicle("Ford", "Focus", 2019), None)
            .await
            .unwrap();

        let changes = VehicleChanges {
            make: "Ford".to_string(),
            model: "Fiesta".to_string(),
            year: 2019,
        };

        let miss = ctx
            .vehicles
            .update_vehicle(&CallerContext::new(root.clone()), &vehicle.vehicle_id, changes.clone(), None)
            .await
            .unwrap_err();
        assert!(matches!(miss, ServiceError::NotFound { resource: "vehicle", .. }));

        let updated = ctx
            .vehicles
            .update_vehicle(&CallerContext::new(root), &vehicle.vehicle_id, changes, Some(&shop))
            .await
            .unwrap();
        assert_eq!(updated.model, "Fiesta");
        assert_eq!(updated.dealership_id, shop);
    }

    #[tokio::test]
    async fn child_cannot_delete_parent_vehicle() {
        let ctx = TestContext::new();
        let root = ctx.add_dealership("root", None).await;
        let child = ctx.add_dealership("child", Some(&root)).await;

        let vehicle = ctx
            .vehicles
            .create_vehicle(&CallerContext::new(root.clone()), new_vehicle("Kia", "Rio", 2022), None)
            .await
            .unwrap();

        let err = ctx
            .vehicles
            .delete_vehicle(&CallerContext::new(child), &vehicle.vehicle_id, Some(&root))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        let deleted = ctx
            .vehicles
            .delete_vehicle(&CallerContext::new(root.clone()), &vehicle.vehicle_id, None)
            .await
            .unwrap();
        assert_eq!(deleted.vehicle_id, vehicle.vehicle_id);
    }

    #[tokio::test]
    async fn create_without_target_skips_the_hierarchy() {
        let ctx = TestContext::new();
        let root = ctx.add_dealership("root", None).await;
        let before = ctx.dealership_store.calls();

        let vehicle = ctx
            .vehicles
            .create_vehicle(&CallerContext::new(root.clone()), new_vehicle("Audi", "A4", 2017), None)
            .await
            .unwrap();

        assert_eq!(vehicle.dealership_id, root);
        assert_eq!(ctx.dealership_store.calls(), before);
    }

    #[tokio::test]
    async fn permitted_scope_with_unknown_id_is_not_found() {
        let ctx = TestContext::new();
        let root = ctx.add_dealership("root", None).await;
        let shop = ctx.add_dealership("shop", Some(&root)).await;

        let err = ctx
            .vehicles
            .get_vehicle(&CallerContext::new(root), "no-such-vehicle", Some(&shop))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { resource: "vehicle", .. }));
    }
}
