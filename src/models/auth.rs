// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::session::NavigationOutcome;

/// Cargo do usuário. `is_super_role` vem da tabela `roles`, definido no provisionamento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[schema(example = "Cashier")]
    pub name: String,
    pub is_super_role: bool,
}

#[cfg(test)]
impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_super_role: false,
        }
    }

    pub fn super_role(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_super_role: true,
        }
    }
}

// Linha de `users` junto com o cargo
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub password_hash: String,
    pub role_name: String,
    pub is_super_role: bool,
}

/// O usuário autenticado. O controle de acesso só lê o `role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: Uuid,
    #[schema(example = "maria")]
    pub username: String,
    #[schema(example = "Maria Souza")]
    pub full_name: String,
    pub role: Role,
}

impl From<UserRow> for AuthenticatedUser {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            role: Role {
                name: row.role_name,
                is_super_role: row.is_super_role,
            },
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(length(min = 1, message = "O usuário é obrigatório."))]
    #[schema(example = "maria")]
    pub username: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Resposta de login: token + primeira navegação
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthenticatedUser,
    pub navigation: NavigationOutcome,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub sid: Uuid,  // ID da sessão no SessionRegistry
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}
