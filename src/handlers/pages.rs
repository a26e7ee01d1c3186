// src/handlers/pages.rs

use axum::Json;

use crate::models::page::{Page, PageRequirement};

// GET /api/pages (Para a tela de permissões saber quais módulos existem)
#[utoipa::path(
    get,
    path = "/api/pages",
    tag = "Pages",
    responses(
        (status = 200, description = "Tabela página -> módulo -> capacidade exigida", body = Vec<PageRequirement>)
    )
)]
pub async fn list_pages() -> Json<Vec<PageRequirement>> {
    Json(Page::ALL.into_iter().map(Page::requirement).collect())
}
