// src/models/page.rs

use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{common::error::AppError, models::permission::Capability};

/// Telas da aplicação, identificadas pela mesma chave usada no roteador do frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Page {
    #[serde(rename = "login")]
    Login,
    #[serde(rename = "dashboard")]
    Dashboard,
    #[serde(rename = "customers")]
    Customers,
    #[serde(rename = "customers-add")]
    CustomersAdd,
    #[serde(rename = "invoices")]
    Invoices,
    #[serde(rename = "create-invoice")]
    CreateInvoice,
    #[serde(rename = "receipts")]
    Receipts,
    #[serde(rename = "create-receipt")]
    CreateReceipt,
    #[serde(rename = "maintenance")]
    Maintenance,
    #[serde(rename = "client-profiles")]
    ClientProfiles,
    #[serde(rename = "client-profile-intake")]
    ClientProfileIntake,
    #[serde(rename = "audit-trail")]
    AuditTrail,
    #[serde(rename = "reports")]
    Reports,
    #[serde(rename = "UserManagement")]
    UserManagement,
    #[serde(rename = "RolePermission")]
    RolePermission,
}

/// O que uma página exige: qual capacidade, sobre qual linha de `role_permission`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageRequirement {
    pub page: Page,
    pub module_path: &'static str,
    pub capability: Capability,
}

impl Page {
    pub const ALL: [Page; 15] = [
        Page::Login,
        Page::Dashboard,
        Page::Customers,
        Page::CustomersAdd,
        Page::Invoices,
        Page::CreateInvoice,
        Page::Receipts,
        Page::CreateReceipt,
        Page::Maintenance,
        Page::ClientProfiles,
        Page::ClientProfileIntake,
        Page::AuditTrail,
        Page::Reports,
        Page::UserManagement,
        Page::RolePermission,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Page::Login => "login",
            Page::Dashboard => "dashboard",
            Page::Customers => "customers",
            Page::CustomersAdd => "customers-add",
            Page::Invoices => "invoices",
            Page::CreateInvoice => "create-invoice",
            Page::Receipts => "receipts",
            Page::CreateReceipt => "create-receipt",
            Page::Maintenance => "maintenance",
            Page::ClientProfiles => "client-profiles",
            Page::ClientProfileIntake => "client-profile-intake",
            Page::AuditTrail => "audit-trail",
            Page::Reports => "reports",
            Page::UserManagement => "UserManagement",
            Page::RolePermission => "RolePermission",
        }
    }

    // Tabela estática página -> capacidade exigida.
    // O `match` é exaustivo: uma página nova não compila sem entrar aqui.
    pub fn requirement(self) -> PageRequirement {
        let capability = match self {
            Page::CustomersAdd
            | Page::CreateInvoice
            | Page::CreateReceipt
            | Page::ClientProfileIntake => Capability::Create,

            Page::Login
            | Page::Dashboard
            | Page::Customers
            | Page::Invoices
            | Page::Receipts
            | Page::Maintenance
            | Page::ClientProfiles
            | Page::AuditTrail
            | Page::Reports
            | Page::UserManagement
            | Page::RolePermission => Capability::View,
        };

        PageRequirement {
            page: self,
            module_path: self.key(),
            capability,
        }
    }

    /// Checagem de inicialização: chaves únicas e módulos não vazios.
    pub fn validate_table() -> Result<(), AppError> {
        let mut seen = HashSet::new();
        for page in Page::ALL {
            let requirement = page.requirement();
            if requirement.module_path.trim().is_empty() {
                return Err(anyhow::anyhow!("Página {:?} sem módulo associado", page).into());
            }
            if !seen.insert(page.key()) {
                return Err(anyhow::anyhow!("Chave de página duplicada: {}", page.key()).into());
            }
        }
        Ok(())
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Page {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|page| page.key() == s)
            .ok_or_else(|| AppError::UnknownPage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_table_is_consistent() {
        assert!(Page::validate_table().is_ok());
    }

    #[test]
    fn parses_router_keys() {
        assert_eq!("create-invoice".parse::<Page>().unwrap(), Page::CreateInvoice);
        assert_eq!("UserManagement".parse::<Page>().unwrap(), Page::UserManagement);
    }

    #[test]
    fn unknown_key_is_rejected_instead_of_denied() {
        let err = "create-invoce".parse::<Page>().unwrap_err();
        assert!(matches!(err, AppError::UnknownPage(ref key) if key == "create-invoce"));
    }

    #[test]
    fn keys_are_case_sensitive() {
        assert!("usermanagement".parse::<Page>().is_err());
    }

    #[test]
    fn serde_uses_router_keys() {
        for page in Page::ALL {
            let json = serde_json::to_string(&page).unwrap();
            assert_eq!(json, format!("\"{}\"", page.key()));
        }
    }

    #[test]
    fn creation_pages_require_create() {
        let req = Page::CustomersAdd.requirement();
        assert_eq!(req.module_path, "customers-add");
        assert_eq!(req.capability, Capability::Create);
        assert_eq!(Page::Reports.requirement().capability, Capability::View);
    }
}
