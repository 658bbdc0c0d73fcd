// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler here receives the caller as an explicit `Extension<CallerContext>`
// inserted by `jwt_auth_middleware`, and passes it straight to the service layer.

pub mod customer;
pub mod dealership;
pub mod sale;
pub mod vehicle;
