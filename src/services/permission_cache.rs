// src/services/permission_cache.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::PermissionStore,
    models::permission::{CapabilityFlags, PermissionSet},
};

/// Cache das permissões do cargo da sessão atual.
///
/// Só um cargo fica residente por vez. Enquanto nada foi carregado (ou depois de
/// `clear`), toda consulta devolve ausente e o resolver nega.
pub struct PermissionCache {
    store: Arc<dyn PermissionStore>,
    resident: Option<PermissionSet>,
}

impl PermissionCache {
    pub fn new(store: Arc<dyn PermissionStore>) -> Self {
        Self {
            store,
            resident: None,
        }
    }

    /// Busca as linhas do cargo e substitui o conteúdo inteiro do cache.
    ///
    /// O cache é esvaziado antes da busca: durante a ida ao banco e em caso de falha,
    /// nenhuma permissão antiga continua valendo.
    pub async fn load(&mut self, role_name: &str) -> Result<(), AppError> {
        self.resident = None;

        let records = match self.store.fetch_permissions(role_name).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Falha ao carregar permissões do cargo '{}': {}", role_name, e);
                return Err(e);
            }
        };

        let set = PermissionSet::from_records(role_name, records);
        if set.is_empty() {
            tracing::warn!("Cargo '{}' não tem nenhuma permissão configurada", role_name);
        }
        tracing::info!(
            "🔐 Permissões do cargo '{}' carregadas ({} módulos)",
            role_name,
            set.len()
        );
        self.resident = Some(set);
        Ok(())
    }

    pub fn get(&self, module_path: &str) -> Option<CapabilityFlags> {
        self.resident.as_ref().and_then(|set| set.get(module_path))
    }

    pub fn clear(&mut self) {
        if let Some(set) = self.resident.take() {
            tracing::debug!("Cache de permissões do cargo '{}' limpo", set.role_name());
        }
    }

    pub fn loaded_role(&self) -> Option<&str> {
        self.resident.as_ref().map(|set| set.role_name())
    }

    pub fn is_loaded_for(&self, role_name: &str) -> bool {
        self.loaded_role() == Some(role_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryPermissionStore;

    fn store() -> Arc<InMemoryPermissionStore> {
        Arc::new(
            InMemoryPermissionStore::new()
                .with_grant("Cashier", "create-invoice", true, true, false, false)
                .with_grant("Cashier", "invoices", true, false, true, false)
                .with_grant("Viewer", "dashboard", true, false, false, false),
        )
    }

    #[tokio::test]
    async fn get_before_load_is_absent() {
        let cache = PermissionCache::new(store());
        assert!(cache.get("create-invoice").is_none());
        assert_eq!(cache.loaded_role(), None);
    }

    #[tokio::test]
    async fn load_makes_role_resident() {
        let mut cache = PermissionCache::new(store());
        cache.load("Cashier").await.unwrap();

        assert!(cache.is_loaded_for("Cashier"));
        let flags = cache.get("create-invoice").unwrap();
        assert!(flags.can_create);
        assert!(!flags.can_delete);
    }

    #[tokio::test]
    async fn clear_empties_every_previously_loaded_entry() {
        let mut cache = PermissionCache::new(store());
        cache.load("Cashier").await.unwrap();
        cache.clear();

        assert!(cache.get("create-invoice").is_none());
        assert!(cache.get("invoices").is_none());
        assert_eq!(cache.loaded_role(), None);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let mut cache = PermissionCache::new(store());
        cache.load("Viewer").await.unwrap();
        cache.clear();
        cache.clear();

        assert!(cache.get("dashboard").is_none());
        assert_eq!(cache.loaded_role(), None);
    }

    #[tokio::test]
    async fn second_load_replaces_instead_of_merging() {
        let mut cache = PermissionCache::new(store());
        cache.load("Cashier").await.unwrap();
        cache.load("Viewer").await.unwrap();

        assert!(cache.is_loaded_for("Viewer"));
        assert!(!cache.is_loaded_for("Cashier"));
        assert!(cache.get("dashboard").is_some());
        assert!(cache.get("create-invoice").is_none());
        assert!(cache.get("invoices").is_none());
    }

    #[tokio::test]
    async fn role_without_rows_loads_as_empty_set() {
        let mut cache = PermissionCache::new(store());
        cache.load("Intern").await.unwrap();

        assert!(cache.is_loaded_for("Intern"));
        assert!(cache.get("dashboard").is_none());
    }

    #[tokio::test]
    async fn failed_load_leaves_cache_empty() {
        let store = store();
        let mut cache = PermissionCache::new(store.clone());
        cache.load("Cashier").await.unwrap();

        store.set_unavailable(true);
        let err = cache.load("Cashier").await.unwrap_err();

        assert!(matches!(err, AppError::StoreUnavailable(_)));
        assert_eq!(cache.loaded_role(), None);
        assert!(cache.get("create-invoice").is_none());
    }

    #[tokio::test]
    async fn blank_role_name_is_rejected() {
        let mut cache = PermissionCache::new(store());
        let err = cache.load("  ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRoleName));
    }

    #[tokio::test]
    async fn each_load_fetches_exactly_once() {
        let store = store();
        let mut cache = PermissionCache::new(store.clone());
        cache.load("Cashier").await.unwrap();
        let _ = cache.get("invoices");
        let _ = cache.get("create-invoice");
        assert_eq!(store.fetch_count(), 1);
    }
}
