use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::convert::Infallible;

use crate::error::AppResult;
use crate::utils::jwt::{verify_token, Claims};
use crate::AppState;

/// Extract and validate JWT token from Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let claims = verify_token(auth.token(), &state.config.jwt_secret)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Claims of the caller when a valid bearer token was sent.
///
/// Never rejects: a missing, malformed or expired token reads as an
/// anonymous caller and the handler decides what that means.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<Claims>);

impl MaybeAuthUser {
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|claims| claims.sub)
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Ok(TypedHeader(auth)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await
        else {
            return Ok(Self(None));
        };

        match verify_token(auth.token(), &state.config.jwt_secret) {
            Ok(claims) => Ok(Self(Some(claims))),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring bearer token");
                Ok(Self(None))
            }
        }
    }
}
