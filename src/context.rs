use serde::Serialize;

/// Identity of the authenticated caller for one request.
///
/// Built once by the authentication middleware and passed explicitly to every
/// service call; nothing in the crate reads the caller from ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallerContext {
    dealership_id: String,
}

impl CallerContext {
    pub fn new(dealership_id: impl Into<String>) -> Self {
        Self {
            dealership_id: dealership_id.into(),
        }
    }

    pub fn dealership_id(&self) -> &str {
        &self.dealership_id
    }
}
