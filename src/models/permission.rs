// src/models/permission.rs

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    View,
    Create,
    Edit,
    Delete,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::View,
        Capability::Create,
        Capability::Edit,
        Capability::Delete,
    ];

    // Capacidades que viram botões de ação na tela
    pub const ACTIONS: [Capability; 3] = [Capability::Create, Capability::Edit, Capability::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Capability::View => "view",
            Capability::Create => "create",
            Capability::Edit => "edit",
            Capability::Delete => "delete",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|cap| cap.as_str() == s)
            .ok_or_else(|| AppError::UnknownCapability(s.to_string()))
    }
}

// O que sai do banco (Tabela role_permission)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRecord {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Cashier")]
    pub role_name: String,

    #[schema(example = "create-invoice")]
    pub module_path: String,

    pub can_view: bool,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl PermissionRecord {
    pub fn flags(&self) -> CapabilityFlags {
        CapabilityFlags {
            can_view: self.can_view,
            can_create: self.can_create,
            can_edit: self.can_edit,
            can_delete: self.can_delete,
        }
    }
}

/// As quatro capacidades de um módulo. Tudo `false` por padrão.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityFlags {
    pub can_view: bool,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl CapabilityFlags {
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => self.can_view,
            Capability::Create => self.can_create,
            Capability::Edit => self.can_edit,
            Capability::Delete => self.can_delete,
        }
    }

    pub fn intersect(self, other: CapabilityFlags) -> CapabilityFlags {
        CapabilityFlags {
            can_view: self.can_view && other.can_view,
            can_create: self.can_create && other.can_create,
            can_edit: self.can_edit && other.can_edit,
            can_delete: self.can_delete && other.can_delete,
        }
    }
}

/// Conjunto de permissões resolvido para um único cargo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionSet {
    role_name: String,
    modules: HashMap<String, CapabilityFlags>,
}

impl PermissionSet {
    /// Monta o conjunto a partir das linhas do banco.
    ///
    /// Linhas de outro cargo são descartadas. Linhas duplicadas para o mesmo módulo
    /// são combinadas por interseção: só sobrevive o que todas concedem.
    pub fn from_records(role_name: &str, records: Vec<PermissionRecord>) -> Self {
        let mut modules: HashMap<String, CapabilityFlags> = HashMap::new();

        for record in records {
            if record.role_name != role_name {
                tracing::warn!(
                    "Linha de permissão do cargo '{}' ignorada ao carregar '{}'",
                    record.role_name,
                    role_name
                );
                continue;
            }

            let flags = record.flags();
            match modules.get_mut(&record.module_path) {
                Some(existing) => {
                    tracing::warn!(
                        "Permissão duplicada para ({}, {}); aplicando interseção",
                        role_name,
                        record.module_path
                    );
                    *existing = existing.intersect(flags);
                }
                None => {
                    modules.insert(record.module_path, flags);
                }
            }
        }

        Self {
            role_name: role_name.to_string(),
            modules,
        }
    }

    pub fn role_name(&self) -> &str {
        &self.role_name
    }

    pub fn get(&self, module_path: &str) -> Option<CapabilityFlags> {
        self.modules.get(module_path).copied()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

// O Payload para criar/atualizar uma linha de permissão
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPermissionPayload {
    #[validate(length(min = 1, message = "O nome do cargo é obrigatório."))]
    #[schema(example = "Cashier")]
    pub role_name: String,

    #[validate(length(min = 1, message = "O módulo é obrigatório."))]
    #[schema(example = "create-invoice")]
    pub module_path: String,

    #[serde(default)]
    pub can_view: bool,
    #[serde(default)]
    pub can_create: bool,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_delete: bool,
}
