pub mod events;
pub mod handler;
pub mod mediator;
pub mod outcome;
pub mod registry;
pub mod request;
pub mod validation;

pub use events::{publish, EventEnvelope, EventPublisher, InMemoryPublisher, IntegrationEvent};
pub use handler::RequestHandler;
pub use mediator::{Mediator, MediatorBuilder};
pub use outcome::{translate, ErrorKind, Failure};
pub use registry::{HandlerRegistry, RegistryError};
pub use request::Request;
pub use validation::{take, Presence, Validator, ValidationErrors, Violation};

/// Error type returned by repository and broker collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure taxonomy shared by every handler and the mediator itself.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("No handler registered for request type: {0}")]
    UnroutedRequest(&'static str),
    #[error("Validation failed: {0}")]
    ValidationFailed(ValidationErrors),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Internal service error: {0}")]
    Internal(#[source] BoxError),
}

impl CoreError {
    pub fn conflict(message: impl Into<String>) -> Self {
        CoreError::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        CoreError::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        CoreError::Unauthorized(message.into())
    }

    pub fn internal(error: impl Into<BoxError>) -> Self {
        CoreError::Internal(error.into())
    }

    /// Single-field validation failure.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        CoreError::ValidationFailed(ValidationErrors::single(field, message))
    }
}

impl From<BoxError> for CoreError {
    fn from(err: BoxError) -> Self {
        CoreError::Internal(err)
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::ValidationFailed(errors)
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Raised by repositories when a unique key is already taken.
#[derive(Debug, thiserror::Error)]
#[error("duplicate key: {0}")]
pub struct DuplicateKey(pub String);

/// Map a repository write error, turning [`DuplicateKey`] into `Conflict`.
pub fn conflict_on_duplicate(message: &'static str) -> impl FnOnce(BoxError) -> CoreError {
    move |err| {
        if err.is::<DuplicateKey>() {
            CoreError::conflict(message)
        } else {
            CoreError::Internal(err)
        }
    }
}
