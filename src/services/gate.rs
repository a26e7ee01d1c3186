// src/services/gate.rs

use std::{sync::Arc, time::Duration};

use crate::{
    common::error::AppError,
    db::PermissionStore,
    models::{
        auth::{AuthenticatedUser, Role},
        page::Page,
        permission::Capability,
        session::{NavigationOutcome, SessionView},
    },
    services::{permission_cache::PermissionCache, resolver},
};

#[derive(Debug, Clone, Copy)]
pub struct GateConfig {
    pub landing_page: Page,
    pub load_timeout: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            landing_page: Page::Dashboard,
            load_timeout: Duration::from_secs(5),
        }
    }
}

/// Porteiro de uma sessão: dono do cache, do usuário e da página atual.
pub struct SessionGate {
    config: GateConfig,
    cache: PermissionCache,
    user: Option<AuthenticatedUser>,
    current_page: Page,
}

impl SessionGate {
    pub fn new(store: Arc<dyn PermissionStore>, config: GateConfig) -> Self {
        Self {
            config,
            cache: PermissionCache::new(store),
            user: None,
            current_page: Page::Login,
        }
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.user.as_ref()
    }

    pub fn current_page(&self) -> Page {
        self.current_page
    }

    fn role(&self) -> Option<&Role> {
        self.user.as_ref().map(|user| &user.role)
    }

    pub fn permissions_loaded(&self) -> bool {
        self.role().is_some_and(|role| self.cache.is_loaded_for(&role.name))
    }

    /// Autentica -> espera o carregamento das permissões -> navega para a landing.
    pub async fn on_login_success(&mut self, user: AuthenticatedUser) -> NavigationOutcome {
        tracing::info!("Login de '{}' com o cargo '{}'", user.username, user.role.name);

        self.cache.clear();
        self.user = Some(user);
        self.current_page = Page::Login;

        self.load_and_land().await
    }

    /// Botão "tentar novamente" da tela de permissões indisponíveis.
    pub async fn retry_permission_load(&mut self) -> NavigationOutcome {
        if self.user.is_none() {
            return self.deny(self.config.landing_page);
        }
        self.load_and_land().await
    }

    async fn load_and_land(&mut self) -> NavigationOutcome {
        let role_name = match self.role() {
            Some(role) => role.name.clone(),
            None => return self.deny(self.config.landing_page),
        };

        if let Err(e) = self.load_with_timeout(&role_name).await {
            tracing::warn!("Permissões indisponíveis para '{}': {}", role_name, e);
            self.current_page = Page::Login;
            // Só falha de armazenamento se resolve tentando de novo
            let retry = matches!(e, AppError::StoreUnavailable(_));
            return NavigationOutcome::PermissionsUnavailable { role: role_name, retry };
        }

        self.on_navigate(self.config.landing_page)
    }

    async fn load_with_timeout(&mut self, role_name: &str) -> Result<(), AppError> {
        let timeout = self.config.load_timeout;
        let outcome = tokio::time::timeout(timeout, self.cache.load(role_name)).await;
        match outcome {
            Ok(result) => result,
            Err(_) => {
                // O future foi descartado no meio; garante o cache vazio
                self.cache.clear();
                Err(AppError::StoreUnavailable(format!(
                    "tempo esgotado após {:?}",
                    timeout
                )))
            }
        }
    }

    pub fn on_navigate(&mut self, target: Page) -> NavigationOutcome {
        if resolver::can_access_page(self.role(), target, &self.cache) {
            self.current_page = target;
            return NavigationOutcome::Render { page: target };
        }

        tracing::debug!(
            "Navegação negada para '{}' (cargo: {:?})",
            target,
            self.role().map(|r| r.name.as_str())
        );
        self.deny(target)
    }

    fn deny(&self, attempted: Page) -> NavigationOutcome {
        NavigationOutcome::AccessDenied {
            role: self.role().map(|role| role.name.clone()),
            attempted,
            fallback: self.safe_fallback(),
        }
    }

    // Landing se o cargo puder abri-la, senão a tela de login
    fn safe_fallback(&self) -> Page {
        let landing = self.config.landing_page;
        if resolver::can_access_page(self.role(), landing, &self.cache) {
            landing
        } else {
            Page::Login
        }
    }

    pub fn on_logout(&mut self) {
        self.cache.clear();
        if let Some(user) = self.user.take() {
            tracing::info!("Logout de '{}'", user.username);
        }
        self.current_page = Page::Login;
    }

    pub fn can_access_page(&self, page: Page) -> bool {
        resolver::can_access_page(self.role(), page, &self.cache)
    }

    pub fn can_perform(&self, page: Page, capability: Capability) -> bool {
        resolver::can_perform(self.role(), page, capability, &self.cache)
    }

    pub fn visible_actions(&self, page: Page) -> Vec<Capability> {
        resolver::visible_actions(self.role(), page, &self.cache)
    }

    /// Exige a capacidade na página, para os endpoints que alteram dados.
    pub fn require(&self, page: Page, capability: Capability) -> Result<(), AppError> {
        if self.can_perform(page, capability) {
            return Ok(());
        }
        Err(AppError::Forbidden {
            role: self.role().map(|r| r.name.clone()).unwrap_or_default(),
            page: page.key().to_string(),
        })
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            user: self.user().cloned(),
            current_page: self.current_page,
            permissions_loaded: self.permissions_loaded(),
            visible_actions: self.visible_actions(self.current_page),
        }
    }
}
