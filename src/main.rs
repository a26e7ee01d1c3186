//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Settings};
use crate::middleware::auth::auth_guard;
use crate::models::page::Page;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Tabela de páginas inconsistente impede o boot
    Page::validate_table()?;

    let settings = Settings::from_env()?;
    let app_state = AppState::new(&settings).await?;

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = build_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()));

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login));

    // Rotas protegidas pelo token + sessão
    let session_routes = Router::new()
        .route("/", get(handlers::session::get_session))
        .route("/navigate", post(handlers::session::navigate))
        .route("/permissions/reload", post(handlers::session::reload_permissions))
        .route("/pages/{page}/access", get(handlers::session::page_access))
        .route(
            "/pages/{page}/capabilities/{capability}",
            get(handlers::session::page_capability),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let logout_route = Router::new()
        .route("/logout", post(handlers::auth::logout))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let permission_routes = Router::new()
        .route(
            "/",
            get(handlers::permissions::list_permissions)
                .put(handlers::permissions::upsert_permission),
        )
        .route("/{id}", delete(handlers::permissions::delete_permission))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/pages", get(handlers::pages::list_pages))
        .nest("/api/auth", auth_routes.merge(logout_route))
        .nest("/api/session", session_routes)
        .nest("/api/permissions", permission_routes)
        .with_state(app_state)
}
