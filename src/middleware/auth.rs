// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    services::session::SessionHandle,
};

/// Sessão resolvida a partir do token, disponível para os handlers protegidos.
#[derive(Clone)]
pub struct CurrentSession {
    pub id: Uuid,
    pub handle: SessionHandle,
}

// O middleware em si
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::InvalidToken)?;

    let (id, handle) = app_state.auth_service.resolve_session(bearer.token()).await?;

    request.extensions_mut().insert(CurrentSession { id, handle });
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}
