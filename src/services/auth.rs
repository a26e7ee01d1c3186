// src/services/auth.rs

use std::sync::Arc;

use bcrypt::verify;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PermissionStore, UserRepository},
    models::{
        auth::{AuthResponse, AuthenticatedUser, Claims},
        session::NavigationOutcome,
    },
    services::{
        gate::{GateConfig, SessionGate},
        session::{SessionHandle, SessionRegistry},
    },
};

// Validade do token e da sessão no registro
const SESSION_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    permission_store: Arc<dyn PermissionStore>,
    sessions: SessionRegistry,
    gate_config: GateConfig,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        permission_store: Arc<dyn PermissionStore>,
        sessions: SessionRegistry,
        gate_config: GateConfig,
        jwt_secret: String,
    ) -> Self {
        Self { user_repo, permission_store, sessions, gate_config, jwt_secret }
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        let row = self.user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = row.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?
        ?;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.start_session(AuthenticatedUser::from(row)).await
    }

    /// Abre a sessão de um usuário já autenticado: carrega as permissões e emite o token.
    pub async fn start_session(&self, user: AuthenticatedUser) -> Result<AuthResponse, AppError> {
        let mut gate = SessionGate::new(self.permission_store.clone(), self.gate_config);
        let navigation = gate.on_login_success(user.clone()).await;

        if !navigation.is_render() {
            tracing::warn!("Sessão de '{}' aberta sem acesso à página inicial", user.username);
        }

        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(SESSION_TTL_DAYS);
        let (session_id, _) = self.sessions.open(gate, expires_at).await;
        tracing::debug!("Sessões ativas: {}", self.sessions.len().await);
        let token = self.create_token(user.id, session_id, now, expires_at)?;

        Ok(AuthResponse { token, user, navigation })
    }

    /// Valida o token e devolve a sessão viva correspondente.
    pub async fn resolve_session(&self, token: &str) -> Result<(Uuid, SessionHandle), AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let session_id = token_data.claims.sid;
        let handle = self.sessions.get(session_id).await.ok_or(AppError::SessionNotFound)?;
        Ok((session_id, handle))
    }

    pub async fn logout(&self, session_id: Uuid) -> Result<(), AppError> {
        let handle = self.sessions.close(session_id).await.ok_or(AppError::SessionNotFound)?;
        // O cache é limpo antes de a sessão ser descartada
        handle.lock().await.on_logout();
        Ok(())
    }

    pub async fn retry_permissions(&self, handle: &SessionHandle) -> NavigationOutcome {
        handle.lock().await.retry_permission_load().await
    }

    fn create_token(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id,
            sid: session_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
