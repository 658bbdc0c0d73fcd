pub mod customer;
pub mod dealership;
pub mod sale;
pub mod vehicle;

pub use customer::{Customer, CustomerChanges, NewCustomer};
pub use dealership::{Dealership, DealershipDetail, DealershipNode, DealershipUpdate, NewDealership};
pub use sale::{NewSale, Sale, SaleChanges};
pub use vehicle::{NewVehicle, Vehicle, VehicleChanges, VehicleCriteria};
