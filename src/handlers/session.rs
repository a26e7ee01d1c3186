// src/handlers/session.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentSession,
    models::{
        page::Page,
        permission::Capability,
        session::{AccessCheckResponse, NavigatePayload, NavigationOutcome, SessionView},
    },
};

// GET /api/session
#[utoipa::path(
    get,
    path = "/api/session",
    tag = "Session",
    responses(
        (status = 200, description = "Usuário, página atual e botões de ação visíveis", body = SessionView),
        (status = 401, description = "Sessão inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_session(session: CurrentSession) -> Json<SessionView> {
    let gate = session.handle.lock().await;
    Json(gate.view())
}

// POST /api/session/navigate
#[utoipa::path(
    post,
    path = "/api/session/navigate",
    tag = "Session",
    request_body = NavigatePayload,
    responses(
        (status = 200, description = "Página liberada ou tela de acesso negado", body = NavigationOutcome),
        (status = 404, description = "Página desconhecida")
    ),
    security(("api_jwt" = []))
)]
pub async fn navigate(
    session: CurrentSession,
    Json(payload): Json<NavigatePayload>,
) -> Result<Json<NavigationOutcome>, AppError> {
    let target: Page = payload.page.parse()?;
    let mut gate = session.handle.lock().await;
    Ok(Json(gate.on_navigate(target)))
}

// POST /api/session/permissions/reload
#[utoipa::path(
    post,
    path = "/api/session/permissions/reload",
    tag = "Session",
    responses(
        (status = 200, description = "Resultado da nova tentativa de carregar as permissões", body = NavigationOutcome)
    ),
    security(("api_jwt" = []))
)]
pub async fn reload_permissions(
    State(app_state): State<AppState>,
    session: CurrentSession,
) -> Json<NavigationOutcome> {
    Json(app_state.auth_service.retry_permissions(&session.handle).await)
}

// GET /api/session/pages/{page}/access
#[utoipa::path(
    get,
    path = "/api/session/pages/{page}/access",
    tag = "Session",
    params(("page" = String, Path, description = "Chave da página, ex: create-invoice")),
    responses(
        (status = 200, description = "Se a página pode ser aberta", body = AccessCheckResponse),
        (status = 404, description = "Página desconhecida")
    ),
    security(("api_jwt" = []))
)]
pub async fn page_access(
    session: CurrentSession,
    Path(page): Path<String>,
) -> Result<Json<AccessCheckResponse>, AppError> {
    let page: Page = page.parse()?;
    let gate = session.handle.lock().await;

    Ok(Json(AccessCheckResponse {
        page,
        capability: page.requirement().capability,
        allowed: gate.can_access_page(page),
    }))
}

// GET /api/session/pages/{page}/capabilities/{capability}
#[utoipa::path(
    get,
    path = "/api/session/pages/{page}/capabilities/{capability}",
    tag = "Session",
    params(
        ("page" = String, Path, description = "Chave da página"),
        ("capability" = String, Path, description = "view | create | edit | delete")
    ),
    responses(
        (status = 200, description = "Se a ação pode ser exibida", body = AccessCheckResponse),
        (status = 400, description = "Capacidade desconhecida"),
        (status = 404, description = "Página desconhecida")
    ),
    security(("api_jwt" = []))
)]
pub async fn page_capability(
    session: CurrentSession,
    Path((page, capability)): Path<(String, String)>,
) -> Result<Json<AccessCheckResponse>, AppError> {
    let page: Page = page.parse()?;
    let capability: Capability = capability.parse()?;
    let gate = session.handle.lock().await;

    Ok(Json(AccessCheckResponse {
        page,
        capability,
        allowed: gate.can_perform(page, capability),
    }))
}
