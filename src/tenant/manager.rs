//! Tenant manager implementation.
//!
//! Provisions tenants with their ledgers and serves tenant lookups. Only
//! super administrators may create tenants; creation inserts the tenant
//! and its ledger in one transaction so no tenant ever exists without a
//! ledger.

use std::sync::Arc;

use super::errors::{TenantError, TenantResult};
use super::models::{CreateTenantRequest, NewTenant, Tenant, TenantId, TenantWithLedger};
use crate::auth::policy;
use crate::db::repository::{StoreError, TenantStore};
use crate::token::Claims;
use crate::validate;

/// Currency assigned to a tenant's ledger when none is requested.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Tenant manager
#[derive(Clone)]
pub struct TenantManager {
    tenants: Arc<dyn TenantStore>,
}

impl TenantManager {
    /// Create a new tenant manager
    pub fn new(tenants: Arc<dyn TenantStore>) -> Self {
        Self { tenants }
    }

    /// Create a tenant together with its ledger
    ///
    /// The code and contact email must be unique among non-deleted
    /// tenants; the pre-insert checks are backed by storage-level unique
    /// constraints, so a racing duplicate still surfaces as a conflict.
    ///
    /// # Errors
    ///
    /// * `TenantError::NotAuthorized` - Caller is not a super administrator
    /// * `TenantError::Validation` - A field failed validation
    /// * `TenantError::DuplicateCode` / `TenantError::DuplicateEmail`
    pub async fn create(
        &self,
        claims: &Claims,
        request: CreateTenantRequest,
    ) -> TenantResult<TenantWithLedger> {
        if !policy::can_create_tenant(claims) {
            return Err(TenantError::NotAuthorized);
        }

        validate::check_tenant_code(&request.code).map_err(|message| TenantError::Validation {
            field: "code",
            message,
        })?;
        validate::check_length("name", &request.name, 2, 200).map_err(|message| {
            TenantError::Validation {
                field: "name",
                message,
            }
        })?;
        let email = validate::normalize_email(&request.email);
        validate::check_email(&email).map_err(|message| TenantError::Validation {
            field: "email",
            message,
        })?;
        validate::check_optional_length("phone", request.phone.as_deref(), 64).map_err(
            |message| TenantError::Validation {
                field: "phone",
                message,
            },
        )?;
        validate::check_optional_length("country", request.country.as_deref(), 64).map_err(
            |message| TenantError::Validation {
                field: "country",
                message,
            },
        )?;
        validate::check_optional_length("address", request.address.as_deref(), 512).map_err(
            |message| TenantError::Validation {
                field: "address",
                message,
            },
        )?;

        let default_currency = request
            .default_currency
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        validate::check_currency(&default_currency).map_err(|message| {
            TenantError::Validation {
                field: "defaultCurrency",
                message,
            }
        })?;

        let minimum_balance = request.minimum_balance.unwrap_or(0);
        if minimum_balance < 0 {
            return Err(TenantError::Validation {
                field: "minimumBalance",
                message: "minimumBalance must not be negative".to_string(),
            });
        }

        if self.tenants.find_by_code(&request.code).await?.is_some() {
            return Err(TenantError::DuplicateCode);
        }
        if self.tenants.find_by_email(&email).await?.is_some() {
            return Err(TenantError::DuplicateEmail);
        }

        let inserted = self
            .tenants
            .insert_with_ledger(NewTenant {
                code: request.code,
                name: request.name,
                email,
                phone: request.phone,
                country: request.country,
                address: request.address,
                default_currency,
                minimum_balance,
            })
            .await;

        let (tenant, ledger) = match inserted {
            Ok(pair) => pair,
            Err(StoreError::Duplicate("code")) => return Err(TenantError::DuplicateCode),
            Err(StoreError::Duplicate("email")) => return Err(TenantError::DuplicateEmail),
            Err(err) => return Err(err.into()),
        };
        log::info!("Created tenant {} ({})", tenant.id, tenant.code);

        Ok(TenantWithLedger { tenant, ledger })
    }

    /// Fetch a tenant by id
    ///
    /// # Errors
    ///
    /// * `TenantError::NotFound` - No such tenant, or soft-deleted
    pub async fn get_by_id(&self, id: TenantId) -> TenantResult<Tenant> {
        self.tenants
            .find_by_id(id)
            .await?
            .ok_or(TenantError::NotFound)
    }

    /// Fetch a tenant by its unique code
    ///
    /// # Errors
    ///
    /// * `TenantError::NotFound` - No such tenant, or soft-deleted
    pub async fn get_by_code(&self, code: &str) -> TenantResult<Tenant> {
        self.tenants
            .find_by_code(code)
            .await?
            .ok_or(TenantError::NotFound)
    }

    /// Whether the tenant exists and is active
    ///
    /// # Errors
    ///
    /// * `TenantError::NotFound` - No such tenant, or soft-deleted
    pub async fn is_active(&self, id: TenantId) -> TenantResult<bool> {
        Ok(self.get_by_id(id).await?.is_active)
    }

    /// List tenants, newest first
    ///
    /// Soft-deleted tenants are never returned; inactive ones only when
    /// `include_inactive` is set.
    pub async fn list_all(&self, include_inactive: bool) -> TenantResult<Vec<Tenant>> {
        Ok(self.tenants.list(include_inactive).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::policy::{COMPANY_ADMIN, SUPER_ADMIN};
    use crate::db::MemoryStore;

    fn super_admin() -> Claims {
        Claims {
            user_id: 1,
            email: "root@example.test".to_string(),
            tenant_id: None,
            roles: vec![SUPER_ADMIN.to_string()],
        }
    }

    fn request(code: &str, email: &str) -> CreateTenantRequest {
        CreateTenantRequest {
            code: code.to_string(),
            name: "Acme Inc".to_string(),
            email: email.to_string(),
            phone: None,
            country: None,
            address: None,
            default_currency: None,
            minimum_balance: None,
        }
    }

    #[tokio::test]
    async fn creation_requires_super_admin() {
        let manager = TenantManager::new(Arc::new(MemoryStore::new()));
        let claims = Claims {
            user_id: 2,
            email: "admin@acme.test".to_string(),
            tenant_id: Some(1),
            roles: vec![COMPANY_ADMIN.to_string()],
        };
        let err = manager
            .create(&claims, request("ACME", "acme@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, TenantError::NotAuthorized));
    }

    #[tokio::test]
    async fn code_format_is_enforced() {
        let manager = TenantManager::new(Arc::new(MemoryStore::new()));
        for bad in ["ab", "lowercase", "HAS SPACE", "HAS-DASH"] {
            let err = manager
                .create(&super_admin(), request(bad, "acme@x.com"))
                .await
                .unwrap_err();
            assert!(
                matches!(err, TenantError::Validation { field: "code", .. }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn currency_and_balance_default_when_omitted() {
        let manager = TenantManager::new(Arc::new(MemoryStore::new()));
        let created = manager
            .create(&super_admin(), request("ACME", "acme@x.com"))
            .await
            .unwrap();
        assert_eq!(created.tenant.default_currency, DEFAULT_CURRENCY);
        assert_eq!(created.tenant.minimum_balance, 0);
        assert_eq!(created.ledger.currency, DEFAULT_CURRENCY);
        assert_eq!(created.ledger.tenant_id, created.tenant.id);
        assert!(created.tenant.is_active);
    }

    #[tokio::test]
    async fn contact_email_is_normalized_before_storage() {
        let store = Arc::new(MemoryStore::new());
        let manager = TenantManager::new(store);
        let created = manager
            .create(&super_admin(), request("ACME", "  Billing@Acme.COM "))
            .await
            .unwrap();
        assert_eq!(created.tenant.email, "billing@acme.com");
    }

    #[tokio::test]
    async fn duplicates_are_conflicts() {
        let manager = TenantManager::new(Arc::new(MemoryStore::new()));
        manager
            .create(&super_admin(), request("ACME", "acme@x.com"))
            .await
            .unwrap();

        let err = manager
            .create(&super_admin(), request("ACME", "other@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, TenantError::DuplicateCode));

        let err = manager
            .create(&super_admin(), request("OTHER", "acme@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, TenantError::DuplicateEmail));
    }

    #[tokio::test]
    async fn lookup_and_activity_projections() {
        let manager = TenantManager::new(Arc::new(MemoryStore::new()));
        let created = manager
            .create(&super_admin(), request("ACME", "acme@x.com"))
            .await
            .unwrap();

        let tenant = manager.get_by_id(created.tenant.id).await.unwrap();
        assert_eq!(tenant.code, "ACME");
        let tenant = manager.get_by_code("ACME").await.unwrap();
        assert_eq!(tenant.id, created.tenant.id);
        assert!(manager.is_active(created.tenant.id).await.unwrap());

        let err = manager.get_by_id(created.tenant.id + 1).await.unwrap_err();
        assert!(matches!(err, TenantError::NotFound));
    }
}
