//! Viewer identity lookup
//!
//! Who is logged in, and with which privileges, is decided by the host
//! application. The service asks once per request.

use thiserror::Error;
use thread_model::Viewer;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Identity lookup failed: {0}")]
pub struct IdentityError(pub String);

/// Resolves the viewer of the current request
pub trait IdentityProvider: Send + Sync {
    fn current_viewer(&self) -> Result<Viewer, IdentityError>;
}

/// Always answers with the same viewer
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub Viewer);

impl IdentityProvider for StaticIdentity {
    fn current_viewer(&self) -> Result<Viewer, IdentityError> {
        Ok(self.0.clone())
    }
}
