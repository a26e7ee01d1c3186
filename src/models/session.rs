// src/models/session.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{auth::AuthenticatedUser, page::Page, permission::Capability};

/// Resultado de uma tentativa de navegação, como o frontend deve renderizar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum NavigationOutcome {
    /// Página liberada, vira a página atual.
    Render { page: Page },

    /// Tela "Acesso Negado": mostra o cargo e oferece voltar para `fallback`.
    AccessDenied {
        role: Option<String>,
        attempted: Page,
        fallback: Page,
    },

    /// As permissões não carregaram. Tudo fica negado até um `retry` dar certo.
    PermissionsUnavailable { role: String, retry: bool },
}

impl NavigationOutcome {
    pub fn is_render(&self) -> bool {
        matches!(self, NavigationOutcome::Render { .. })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NavigatePayload {
    #[schema(example = "create-invoice")]
    pub page: String,
}

// GET /api/session
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user: Option<AuthenticatedUser>,
    pub current_page: Page,
    pub permissions_loaded: bool,
    pub visible_actions: Vec<Capability>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessCheckResponse {
    pub page: Page,
    pub capability: Capability,
    pub allowed: bool,
}
