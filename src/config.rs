// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{PermissionRepository, PermissionStore, UserRepository},
    models::page::Page,
    services::{auth::AuthService, gate::GateConfig, session::SessionRegistry},
};

/// Configurações lidas do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub gate: GateConfig,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(value) => value.parse().context("DB_MAX_CONNECTIONS deve ser um número")?,
            Err(_) => 5,
        };

        let load_timeout = parse_load_timeout(env::var("PERMISSION_LOAD_TIMEOUT_SECS").ok())?;

        let landing_page = match env::var("LANDING_PAGE") {
            Ok(value) => value
                .parse::<Page>()
                .map_err(|e| anyhow::anyhow!("LANDING_PAGE inválida: {}", e))?,
            Err(_) => Page::Dashboard,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            db_max_connections,
            gate: GateConfig { landing_page, load_timeout },
        })
    }
}

// Zero faria todo login cair em "permissões indisponíveis"
fn parse_load_timeout(value: Option<String>) -> anyhow::Result<Duration> {
    let Some(value) = value else {
        return Ok(Duration::from_secs(5));
    };
    let secs: u64 = value
        .trim()
        .parse()
        .context("PERMISSION_LOAD_TIMEOUT_SECS deve ser um número")?;
    if secs == 0 {
        anyhow::bail!("PERMISSION_LOAD_TIMEOUT_SECS deve ser maior que zero");
    }
    Ok(Duration::from_secs(secs))
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub permission_store: Arc<dyn PermissionStore>,
    pub auth_service: AuthService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let permission_store: Arc<dyn PermissionStore> = Arc::new(PermissionRepository::new(db_pool.clone()));
        Ok(Self::from_parts(db_pool, permission_store, settings))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_parts(db_pool: PgPool, permission_store: Arc<dyn PermissionStore>, settings: &Settings) -> Self {
        let sessions = SessionRegistry::new();
        let user_repo = UserRepository::new(db_pool.clone());
        let auth_service = AuthService::new(
            user_repo,
            permission_store.clone(),
            sessions,
            settings.gate,
            settings.jwt_secret.clone(),
        );

        Self {
            db_pool,
            permission_store,
            auth_service,
        }
    }
}
