use serde::Serialize;

use crate::{validation::Violation, CoreError};

/// Caller-visible classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnroutedRequest,
    ValidationFailed,
    Conflict,
    NotFound,
    Unauthorized,
    Internal,
}

/// Transport-agnostic failure, safe to serialize back to a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl Failure {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            violations: Vec::new(),
        }
    }
}

/// Translate a core failure into what the caller is allowed to see.
///
/// Routing and internal failures are logged here with their detail and
/// reach the caller only as a fixed message.
pub fn translate(error: &CoreError) -> Failure {
    match error {
        CoreError::UnroutedRequest(name) => {
            tracing::error!("Unrouted request: {}", name);
            Failure::new(ErrorKind::UnroutedRequest, "Request could not be routed")
        }
        CoreError::ValidationFailed(errors) => Failure {
            kind: ErrorKind::ValidationFailed,
            message: errors.to_string(),
            violations: errors.violations().to_vec(),
        },
        CoreError::Conflict(msg) => Failure::new(ErrorKind::Conflict, msg.clone()),
        CoreError::NotFound(msg) => Failure::new(ErrorKind::NotFound, msg.clone()),
        CoreError::Unauthorized(msg) => Failure::new(ErrorKind::Unauthorized, msg.clone()),
        CoreError::Internal(err) => {
            tracing::error!("Internal Server Error: {}", err);
            Failure::new(ErrorKind::Internal, "Internal Server Error")
        }
    }
}
