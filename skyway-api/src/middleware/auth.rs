use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use skyway_core::CoreError;
use skyway_shared::auth::{decode_token, TokenType};

use crate::{error::AppError, state::AppState};

/// The raw bearer token of an authenticated request.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

fn unauthenticated() -> AppError {
    AppError(CoreError::unauthorized("Please authenticate"))
}

// ============================================================================
// Access Token Middleware
// ============================================================================

/// Require a valid access JWT; inserts its `TokenClaims` and the
/// [`BearerToken`] into the request extensions.
pub async fn access_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(unauthenticated)?
        .to_string();

    let claims = decode_token(&state.auth.secret, &token).map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        unauthenticated()
    })?;
    if claims.token_type != TokenType::Access {
        return Err(unauthenticated());
    }

    req.extensions_mut().insert(claims);
    req.extensions_mut().insert(BearerToken(token));

    Ok(next.run(req).await)
}
