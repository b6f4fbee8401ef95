use async_trait::async_trait;

use crate::{request::Request, validation::ValidationErrors, CoreResult};

/// Business logic for exactly one [`Request`] type.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    /// Constraint set checked before `handle` is entered.
    ///
    /// The registry wraps every handler so that a failure here short-circuits
    /// the invocation with `CoreError::ValidationFailed`.
    fn validate(&self, _request: &R) -> Result<(), ValidationErrors> {
        Ok(())
    }

    async fn handle(&self, request: R) -> CoreResult<R::Response>;
}
