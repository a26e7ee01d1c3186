// src/db/permission_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::permission::{PermissionRecord, UpsertPermissionPayload};

/// Acesso à tabela `role_permission` do armazenamento remoto.
///
/// Uma chamada = uma ida ao banco. Nenhuma implementação faz retry por conta própria;
/// quem chama decide o que fazer com `StoreUnavailable`.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Todas as linhas do cargo. Lista vazia não é erro: o cargo fica sem acesso.
    async fn fetch_permissions(&self, role_name: &str) -> Result<Vec<PermissionRecord>, AppError>;

    async fn list_all_permissions(&self) -> Result<Vec<PermissionRecord>, AppError>;

    /// A linha de um par (cargo, módulo), se existir.
    async fn find_permission(
        &self,
        role_name: &str,
        module_path: &str,
    ) -> Result<Option<PermissionRecord>, AppError>;

    async fn upsert_permission(&self, payload: &UpsertPermissionPayload) -> Result<PermissionRecord, AppError>;

    async fn delete_permission(&self, id: Uuid) -> Result<(), AppError>;
}

pub(crate) fn validate_role_name(role_name: &str) -> Result<(), AppError> {
    if role_name.trim().is_empty() {
        return Err(AppError::InvalidRoleName);
    }
    Ok(())
}

#[derive(Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PermissionRepository {
    async fn fetch_permissions(&self, role_name: &str) -> Result<Vec<PermissionRecord>, AppError> {
        validate_role_name(role_name)?;

        sqlx::query_as::<_, PermissionRecord>(
            r#"
            SELECT id, role_name, module_path, can_view, can_create, can_edit, can_delete
            FROM role_permission
            WHERE role_name = $1
            "#,
        )
            .bind(role_name)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::store_unavailable)
    }

    // Para o frontend montar a tela de gestão de permissões
    async fn list_all_permissions(&self) -> Result<Vec<PermissionRecord>, AppError> {
        sqlx::query_as::<_, PermissionRecord>(
            r#"
            SELECT id, role_name, module_path, can_view, can_create, can_edit, can_delete
            FROM role_permission
            ORDER BY role_name, module_path
            "#,
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::store_unavailable)
    }

    async fn find_permission(
        &self,
        role_name: &str,
        module_path: &str,
    ) -> Result<Option<PermissionRecord>, AppError> {
        validate_role_name(role_name)?;

        sqlx::query_as::<_, PermissionRecord>(
            r#"
            SELECT id, role_name, module_path, can_view, can_create, can_edit, can_delete
            FROM role_permission
            WHERE role_name = $1 AND module_path = $2
            "#,
        )
            .bind(role_name)
            .bind(module_path)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::store_unavailable)
    }

    async fn upsert_permission(&self, payload: &UpsertPermissionPayload) -> Result<PermissionRecord, AppError> {
        validate_role_name(&payload.role_name)?;

        // A constraint UNIQUE (role_name, module_path) garante uma linha autoritativa
        sqlx::query_as::<_, PermissionRecord>(
            r#"
            INSERT INTO role_permission (role_name, module_path, can_view, can_create, can_edit, can_delete)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (role_name, module_path) DO UPDATE SET
                can_view = EXCLUDED.can_view,
                can_create = EXCLUDED.can_create,
                can_edit = EXCLUDED.can_edit,
                can_delete = EXCLUDED.can_delete
            RETURNING id, role_name, module_path, can_view, can_create, can_edit, can_delete
            "#,
        )
            .bind(&payload.role_name)
            .bind(&payload.module_path)
            .bind(payload.can_view)
            .bind(payload.can_create)
            .bind(payload.can_edit)
            .bind(payload.can_delete)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::UnknownRole(payload.role_name.clone());
                    }
                }
                AppError::store_unavailable(e)
            })
    }

    async fn delete_permission(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM role_permission WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::store_unavailable)?;

        if result.rows_affected() == 0 {
            return Err(AppError::PermissionNotFound);
        }
        Ok(())
    }
}
