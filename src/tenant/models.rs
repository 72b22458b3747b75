//! Tenant and ledger data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tenant ID type
pub type TenantId = i64;

/// Ledger ID type
pub type LedgerId = i64;

/// An isolated customer organization (company).
///
/// `code` is the short uppercase identifier operators type; both it and the
/// contact email are unique among non-deleted tenants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub code: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub default_currency: String,
    /// Minimum ledger balance in minor units, never negative.
    pub minimum_balance: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// The single balance-tracking record attached 1:1 to a tenant. Created in
/// the same transaction as its tenant, never on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub id: LedgerId,
    pub tenant_id: TenantId,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// Row pair to insert for a new tenant; the store assigns ids and
/// timestamps and creates both rows atomically.
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub code: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub default_currency: String,
    pub minimum_balance: i64,
}

/// Create-tenant command. Optional fields default: currency to `USD`,
/// minimum balance to 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenantRequest {
    pub code: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub default_currency: Option<String>,
    pub minimum_balance: Option<i64>,
}

/// Creation result: the tenant and the ledger born in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantWithLedger {
    pub tenant: Tenant,
    pub ledger: Ledger,
}
