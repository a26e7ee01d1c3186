// src/services/resolver.rs

use crate::{
    models::{auth::Role, page::Page, permission::Capability},
    services::permission_cache::PermissionCache,
};

/// Decide se um cargo pode abrir uma página ou executar uma ação nela.
///
/// Ordem das regras:
/// 1. `login` está sempre liberado.
/// 2. Sem cargo (ninguém autenticado), nega.
/// 3. Cache não carregado para esse cargo, nega. Vale também para o super-cargo:
///    se as permissões falharam ao carregar, nem ele passa.
/// 4. Super-cargo (`is_super_role`) libera tudo sem consultar os módulos.
/// 5. Caso contrário, vale a flag da linha do módulo; linha ausente nega.
///
/// Isto esconde telas e botões. Não protege o banco: as regras de acesso do
/// armazenamento remoto precisam existir por conta própria.
pub fn can_access_page(role: Option<&Role>, page: Page, cache: &PermissionCache) -> bool {
    can_perform(role, page, page.requirement().capability, cache)
}

pub fn can_perform(role: Option<&Role>, page: Page, capability: Capability, cache: &PermissionCache) -> bool {
    if page == Page::Login {
        return capability == Capability::View;
    }

    let Some(role) = role else {
        return false;
    };

    if !cache.is_loaded_for(&role.name) {
        return false;
    }

    if role.is_super_role {
        return true;
    }

    cache
        .get(page.requirement().module_path)
        .is_some_and(|flags| flags.allows(capability))
}

/// Ações (criar/editar/excluir) cujos botões devem aparecer na página.
pub fn visible_actions(role: Option<&Role>, page: Page, cache: &PermissionCache) -> Vec<Capability> {
    Capability::ACTIONS
        .into_iter()
        .filter(|capability| can_perform(role, page, *capability, cache))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryPermissionStore;
    use std::sync::Arc;

    fn cashier() -> Role {
        Role::new("Cashier")
    }

    fn admin() -> Role {
        Role::super_role("Admin")
    }

    fn store() -> Arc<InMemoryPermissionStore> {
        Arc::new(
            InMemoryPermissionStore::new()
                .with_grant("Cashier", "create-invoice", true, true, false, false)
                .with_grant("Cashier", "invoices", true, false, true, false)
                .with_grant("Cashier", "customers-add", true, false, false, false)
                .with_grant("Viewer", "dashboard", true, false, false, false),
        )
    }

    async fn loaded(role: &str) -> PermissionCache {
        let mut cache = PermissionCache::new(store());
        cache.load(role).await.unwrap();
        cache
    }

    #[tokio::test]
    async fn scenario_a_cashier_creates_but_cannot_delete_invoices() {
        let cache = loaded("Cashier").await;
        let role = cashier();

        assert!(can_access_page(Some(&role), Page::CreateInvoice, &cache));
        assert!(can_perform(Some(&role), Page::CreateInvoice, Capability::Create, &cache));
        assert!(!can_perform(Some(&role), Page::CreateInvoice, Capability::Delete, &cache));
        assert!(!can_perform(Some(&role), Page::CreateInvoice, Capability::Edit, &cache));
    }

    #[tokio::test]
    async fn scenario_b_missing_row_denies() {
        let cache = loaded("Viewer").await;
        let role = Role::new("Viewer");

        assert!(!can_access_page(Some(&role), Page::UserManagement, &cache));
        assert!(can_access_page(Some(&role), Page::Dashboard, &cache));
    }

    #[tokio::test]
    async fn scenario_c_anonymous_only_reaches_login() {
        let cache = PermissionCache::new(store());

        assert!(!can_access_page(None, Page::Dashboard, &cache));
        assert!(can_access_page(None, Page::Login, &cache));
        for page in Page::ALL.into_iter().filter(|p| *p != Page::Login) {
            assert!(!can_access_page(None, page, &cache), "{page} should be denied");
        }
    }

    #[tokio::test]
    async fn scenario_d_super_role_is_denied_when_load_failed() {
        let store = store();
        store.set_unavailable(true);
        let mut cache = PermissionCache::new(store);
        assert!(cache.load("Admin").await.is_err());

        assert!(!can_access_page(Some(&admin()), Page::Dashboard, &cache));
        assert!(!can_perform(Some(&admin()), Page::Invoices, Capability::Delete, &cache));
        assert!(can_access_page(Some(&admin()), Page::Login, &cache));
    }

    #[tokio::test]
    async fn super_role_gets_everything_once_loaded() {
        // Admin não tem nenhuma linha em role_permission
        let cache = loaded("Admin").await;
        let role = admin();

        for page in Page::ALL.into_iter().filter(|p| *p != Page::Login) {
            for capability in Capability::ALL {
                assert!(can_perform(Some(&role), page, capability, &cache), "{page}/{capability}");
            }
        }
    }

    #[tokio::test]
    async fn super_flag_not_name_grants_the_bypass() {
        let cache = loaded("Admin").await;
        let impostor = Role::new("Admin");

        assert!(!can_access_page(Some(&impostor), Page::Dashboard, &cache));
    }

    #[tokio::test]
    async fn cache_of_another_role_is_never_consulted() {
        let cache = loaded("Cashier").await;
        let viewer = Role::new("Viewer");

        assert!(!can_access_page(Some(&viewer), Page::Invoices, &cache));
    }

    #[tokio::test]
    async fn every_page_without_a_row_is_denied() {
        let cache = loaded("Cashier").await;
        let role = cashier();

        for page in [Page::Dashboard, Page::Reports, Page::AuditTrail, Page::RolePermission] {
            assert!(!can_access_page(Some(&role), page, &cache));
        }
    }

    #[tokio::test]
    async fn creation_page_needs_create_not_just_view() {
        // customers-add só tem can_view para o Cashier
        let cache = loaded("Cashier").await;
        assert!(!can_access_page(Some(&cashier()), Page::CustomersAdd, &cache));
    }

    #[tokio::test]
    async fn cleared_cache_denies() {
        let mut cache = loaded("Cashier").await;
        cache.clear();
        assert!(!can_access_page(Some(&cashier()), Page::Invoices, &cache));
    }

    #[tokio::test]
    async fn visible_actions_follow_flags() {
        let cache = loaded("Cashier").await;
        let role = cashier();

        assert_eq!(visible_actions(Some(&role), Page::Invoices, &cache), vec![Capability::Edit]);
        assert_eq!(visible_actions(Some(&role), Page::CreateInvoice, &cache), vec![Capability::Create]);
        assert!(visible_actions(None, Page::Invoices, &cache).is_empty());
        assert_eq!(visible_actions(Some(&admin()), Page::Invoices, &cache), Vec::<Capability>::new());
    }

    #[tokio::test]
    async fn same_inputs_same_answer() {
        let cache = loaded("Cashier").await;
        let role = cashier();
        let first: Vec<bool> = Page::ALL.iter().map(|p| can_access_page(Some(&role), *p, &cache)).collect();
        let second: Vec<bool> = Page::ALL.iter().map(|p| can_access_page(Some(&role), *p, &cache)).collect();
        assert_eq!(first, second);
    }
}
