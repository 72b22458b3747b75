//! Authorization policy: pure, stateless checks over verified claims.
//!
//! Role names are flat strings; the two canonical ones get constants. The
//! composite rules encode who may create tenants and users and who may set
//! a password. Workflows call these and turn `false` into a Forbidden
//! failure; no decision here touches storage.

use crate::tenant::models::TenantId;
use crate::token::Claims;

use super::models::User;

/// Role with unrestricted access across all tenants.
pub const SUPER_ADMIN: &str = "SUPER_ADMIN";

/// Tenant-scoped administrator role.
pub const COMPANY_ADMIN: &str = "COMPANY_ADMIN";

pub fn is_super_admin(claims: &Claims) -> bool {
    claims.roles.iter().any(|r| r == SUPER_ADMIN)
}

pub fn is_company_admin(claims: &Claims) -> bool {
    claims.roles.iter().any(|r| r == COMPANY_ADMIN)
}

/// Exact tenant membership. Claims without a tenant id belong to no
/// concrete tenant, super-admin or not.
pub fn belongs_to_tenant(claims: &Claims, tenant_id: TenantId) -> bool {
    claims.tenant_id == Some(tenant_id)
}

/// Tenant creation is reserved to super-admins.
pub fn can_create_tenant(claims: &Claims) -> bool {
    is_super_admin(claims)
}

/// A super-admin may create users anywhere; a company-admin only inside
/// their own tenant.
pub fn can_create_user(claims: &Claims, target_tenant: TenantId) -> bool {
    if is_super_admin(claims) {
        return true;
    }
    is_company_admin(claims) && belongs_to_tenant(claims, target_tenant)
}

/// A super-admin may set anyone's password; users may set their own; a
/// company-admin may set passwords inside their own tenant.
pub fn can_set_password(claims: &Claims, target: &User) -> bool {
    if is_super_admin(claims) || claims.user_id == target.id {
        return true;
    }
    match target.tenant_id {
        Some(tenant_id) => is_company_admin(claims) && belongs_to_tenant(claims, tenant_id),
        None => false,
    }
}
