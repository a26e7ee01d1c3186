use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Sessão não encontrada ou encerrada")]
    SessionNotFound,

    // O armazenamento de permissões não respondeu (rede, banco fora do ar, timeout).
    // A política é fail-closed: quem recebe este erro nega tudo exceto o login.
    #[error("Armazenamento de permissões indisponível: {0}")]
    StoreUnavailable(String),

    #[error("Nome de cargo inválido")]
    InvalidRoleName,

    #[error("Cargo desconhecido: {0}")]
    UnknownRole(String),

    #[error("Página desconhecida: {0}")]
    UnknownPage(String),

    #[error("Capacidade desconhecida: {0}")]
    UnknownCapability(String),

    #[error("Permissão não encontrada")]
    PermissionNotFound,

    #[error("Acesso negado à página '{page}' para o cargo '{role}'")]
    Forbidden { role: String, page: String },

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn store_unavailable(err: impl std::fmt::Display) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Forbidden { role, page } => {
                let body = Json(json!({
                    "error": "Acesso negado.",
                    "role": role,
                    "page": page,
                }));
                return (StatusCode::FORBIDDEN, body).into_response();
            }
            AppError::StoreUnavailable(ref reason) => {
                tracing::warn!("Permissões indisponíveis: {}", reason);
                let body = Json(json!({
                    "error": "Não foi possível carregar as permissões. Tente novamente.",
                    "retryAvailable": true,
                }));
                return (StatusCode::SERVICE_UNAVAILABLE, body).into_response();
            }
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Usuário ou senha inválidos.".to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente.".to_string()),
            AppError::SessionNotFound => (StatusCode::UNAUTHORIZED, "Sessão expirada. Faça login novamente.".to_string()),
            AppError::InvalidRoleName => (StatusCode::BAD_REQUEST, "O nome do cargo não pode ser vazio.".to_string()),
            AppError::UnknownRole(role) => (StatusCode::UNPROCESSABLE_ENTITY, format!("O cargo '{}' não existe.", role)),
            AppError::UnknownPage(page) => (StatusCode::NOT_FOUND, format!("Página '{}' não existe.", page)),
            AppError::UnknownCapability(cap) => (StatusCode::BAD_REQUEST, format!("Capacidade '{}' não existe.", cap)),
            AppError::PermissionNotFound => (StatusCode::NOT_FOUND, "Permissão não encontrada.".to_string()),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
