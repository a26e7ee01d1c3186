// src/handlers/permissions.rs
//
// Gestão da tabela role_permission. Aqui a checagem é feita no servidor:
// só passa quem tem a capacidade correspondente na página RolePermission.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentSession,
    models::{
        page::Page,
        permission::{Capability, PermissionRecord, UpsertPermissionPayload},
    },
};

// GET /api/permissions
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "Permissions",
    responses(
        (status = 200, description = "Todas as linhas de permissão", body = Vec<PermissionRecord>),
        (status = 403, description = "Sem acesso à página RolePermission"),
        (status = 503, description = "Armazenamento indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_permissions(
    State(app_state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<Vec<PermissionRecord>>, AppError> {
    session.handle.lock().await.require(Page::RolePermission, Capability::View)?;

    let rows = app_state.permission_store.list_all_permissions().await?;
    Ok(Json(rows))
}

// PUT /api/permissions
#[utoipa::path(
    put,
    path = "/api/permissions",
    tag = "Permissions",
    request_body = UpsertPermissionPayload,
    responses(
        (status = 200, description = "Linha criada ou atualizada", body = PermissionRecord),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Sem permissão para criar/editar"),
        (status = 422, description = "Cargo inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn upsert_permission(
    State(app_state): State<AppState>,
    session: CurrentSession,
    Json(payload): Json<UpsertPermissionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    session.handle.lock().await.require(Page::RolePermission, Capability::View)?;

    // Linha existente é edição; linha nova é criação
    let existing = app_state
        .permission_store
        .find_permission(&payload.role_name, &payload.module_path)
        .await?;
    let needed = if existing.is_some() { Capability::Edit } else { Capability::Create };
    session.handle.lock().await.require(Page::RolePermission, needed)?;

    let record = app_state.permission_store.upsert_permission(&payload).await?;
    tracing::info!(
        "Permissão ({}, {}) gravada",
        record.role_name,
        record.module_path
    );

    Ok((StatusCode::OK, Json(record)))
}

// DELETE /api/permissions/{id}
#[utoipa::path(
    delete,
    path = "/api/permissions/{id}",
    tag = "Permissions",
    params(("id" = Uuid, Path, description = "ID da linha de permissão")),
    responses(
        (status = 204, description = "Linha removida"),
        (status = 403, description = "Sem permissão para excluir"),
        (status = 404, description = "Permissão não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_permission(
    State(app_state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    session.handle.lock().await.require(Page::RolePermission, Capability::Delete)?;

    app_state.permission_store.delete_permission(id).await?;
    tracing::info!("Permissão {} removida", id);

    Ok(StatusCode::NO_CONTENT)
}
