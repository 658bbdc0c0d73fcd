pub mod dealership;
pub mod schema;
pub mod token;
