// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,

        // --- Session ---
        handlers::session::get_session,
        handlers::session::navigate,
        handlers::session::reload_permissions,
        handlers::session::page_access,
        handlers::session::page_capability,

        // --- Pages ---
        handlers::pages::list_pages,

        // --- Permissions ---
        handlers::permissions::list_permissions,
        handlers::permissions::upsert_permission,
        handlers::permissions::delete_permission,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::AuthenticatedUser,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Session ---
            models::session::NavigationOutcome,
            models::session::NavigatePayload,
            models::session::SessionView,
            models::session::AccessCheckResponse,

            // --- Pages / Permissions ---
            models::page::Page,
            models::page::PageRequirement,
            models::permission::Capability,
            models::permission::CapabilityFlags,
            models::permission::PermissionRecord,
            models::permission::UpsertPermissionPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login e Logout"),
        (name = "Session", description = "Navegação e checagem de acesso da sessão atual"),
        (name = "Pages", description = "Catálogo de páginas e capacidades exigidas"),
        (name = "Permissions", description = "Gestão das permissões por cargo")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
