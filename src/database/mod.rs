pub mod customer_store;
pub mod dealership_store;
pub mod manager;
pub mod memory;
pub mod models;
pub mod sale_store;
pub mod schema;
pub mod vehicle_store;

pub use customer_store::{CustomerStore, PgCustomerStore};
pub use dealership_store::{DealershipStore, PgDealershipStore};
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use sale_store::{PgSaleStore, SaleStore};
pub use vehicle_store::{PgVehicleStore, VehicleStore};
