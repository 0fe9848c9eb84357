//! Authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use common::{AppError, Claims};

use crate::state::AppState;

/// Staff member authenticated by the bearer token.
#[derive(Debug, Clone)]
pub struct StaffMember {
    pub subject: String,
}

impl From<Claims> for StaffMember {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
        }
    }
}

/// Authentication middleware that validates JWT tokens.
///
/// A missing header, a foreign signature and an expired token all end as
/// `401 UNAUTHORIZED`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::Unauthorized)?;

    let claims = state.keys.verify(bearer.token())?;
    tracing::debug!(subject = %claims.sub, "bearer token accepted");

    request.extensions_mut().insert(StaffMember::from(claims));

    Ok(next.run(request).await)
}
