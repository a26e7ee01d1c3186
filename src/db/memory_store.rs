// src/db/memory_store.rs
//
// PermissionStore em memória para os testes: sem banco, com falha e atraso injetáveis.

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::permission_repo::{validate_role_name, PermissionStore},
    models::permission::{PermissionRecord, UpsertPermissionPayload},
};

#[derive(Default)]
pub struct InMemoryPermissionStore {
    rows: Mutex<Vec<PermissionRecord>>,
    unavailable: AtomicBool,
    delay: Mutex<Option<Duration>>,
    fetches: AtomicUsize,
}

impl InMemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grant(self, role: &str, module: &str, view: bool, create: bool, edit: bool, delete: bool) -> Self {
        self.rows.lock().unwrap().push(PermissionRecord {
            id: Uuid::new_v4(),
            role_name: role.to_string(),
            module_path: module.to_string(),
            can_view: view,
            can_create: create,
            can_edit: edit,
            can_delete: delete,
        });
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PermissionStore for InMemoryPermissionStore {
    async fn fetch_permissions(&self, role_name: &str) -> Result<Vec<PermissionRecord>, AppError> {
        validate_role_name(role_name)?;
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_available()?;

        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.role_name == role_name)
            .cloned()
            .collect())
    }

    async fn list_all_permissions(&self) -> Result<Vec<PermissionRecord>, AppError> {
        self.check_available()?;
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_permission(
        &self,
        role_name: &str,
        module_path: &str,
    ) -> Result<Option<PermissionRecord>, AppError> {
        validate_role_name(role_name)?;
        self.check_available()?;

        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.role_name == role_name && row.module_path == module_path)
            .cloned())
    }

    async fn upsert_permission(&self, payload: &UpsertPermissionPayload) -> Result<PermissionRecord, AppError> {
        validate_role_name(&payload.role_name)?;
        self.check_available()?;

        let mut rows = self.rows.lock().unwrap();
        let existing = rows
            .iter_mut()
            .find(|row| row.role_name == payload.role_name && row.module_path == payload.module_path);

        let record = match existing {
            Some(row) => {
                row.can_view = payload.can_view;
                row.can_create = payload.can_create;
                row.can_edit = payload.can_edit;
                row.can_delete = payload.can_delete;
                row.clone()
            }
            None => {
                let row = PermissionRecord {
                    id: Uuid::new_v4(),
                    role_name: payload.role_name.clone(),
                    module_path: payload.module_path.clone(),
                    can_view: payload.can_view,
                    can_create: payload.can_create,
                    can_edit: payload.can_edit,
                    can_delete: payload.can_delete,
                };
                rows.push(row.clone());
                row
            }
        };
        Ok(record)
    }

    async fn delete_permission(&self, id: Uuid) -> Result<(), AppError> {
        self.check_available()?;

        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(AppError::PermissionNotFound);
        }
        Ok(())
    }
}
