//! In-memory store implementation.
//!
//! Implements [`UserStore`] and [`TenantStore`] over plain maps behind a
//! mutex. Exists for tests and for local development without a PostgreSQL
//! server; it mirrors the PostgreSQL implementation's behavior, including
//! non-deleted scoping, case-insensitive emails, duplicate detection, and
//! all-or-nothing combined inserts.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::repository::{StoreError, StoreResult, TenantStore, UserStore};
use crate::auth::lockout::LockoutState;
use crate::auth::models::{LoginAttempt, NewLoginAttempt, NewUser, Role, RoleId, User, UserId};
use crate::auth::policy::SUPER_ADMIN;
use crate::tenant::models::{Ledger, LedgerId, NewTenant, Tenant, TenantId};

#[derive(Default)]
struct Inner {
    users: HashMap<UserId, User>,
    roles: HashMap<RoleId, Role>,
    user_roles: Vec<(UserId, RoleId)>,
    tenants: HashMap<TenantId, Tenant>,
    ledgers: HashMap<LedgerId, Ledger>,
    attempts: Vec<LoginAttempt>,
    next_id: i64,
}

impl Inner {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn bump_past(&mut self, id: i64) {
        if id > self.next_id {
            self.next_id = id;
        }
    }
}

/// In-process store for tests and local development.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user row as-is (including lockout or deletion state).
    pub fn with_user(self, user: User) -> Self {
        {
            let mut inner = self.lock();
            inner.bump_past(user.id);
            inner.users.insert(user.id, user);
        }
        self
    }

    /// Seed a role row.
    pub fn with_role(self, role: Role) -> Self {
        {
            let mut inner = self.lock();
            inner.bump_past(role.id);
            inner.roles.insert(role.id, role);
        }
        self
    }

    /// Seed a role assignment.
    pub fn with_user_role(self, user_id: UserId, role_id: RoleId) -> Self {
        self.lock().user_roles.push((user_id, role_id));
        self
    }

    /// Seed a tenant row as-is.
    pub fn with_tenant(self, tenant: Tenant) -> Self {
        {
            let mut inner = self.lock();
            inner.bump_past(tenant.id);
            inner.tenants.insert(tenant.id, tenant);
        }
        self
    }

    /// Snapshot of the recorded login attempts, oldest first.
    pub fn login_attempts(&self) -> Vec<LoginAttempt> {
        self.lock().attempts.clone()
    }

    /// Number of ledger rows; creation tests assert all-or-nothing with it.
    pub fn ledger_count(&self) -> usize {
        self.lock().ledgers.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store mutex poisoned")
    }
}

fn same_email(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let inner = self.lock();
        Ok(inner
            .users
            .values()
            .find(|u| u.deleted_at.is_none() && same_email(&u.email, email))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        let inner = self.lock();
        Ok(inner
            .users
            .get(&id)
            .filter(|u| u.deleted_at.is_none())
            .cloned())
    }

    async fn insert_with_role(&self, user: NewUser, role_id: RoleId) -> StoreResult<User> {
        let mut inner = self.lock();
        if inner
            .users
            .values()
            .any(|u| u.deleted_at.is_none() && same_email(&u.email, &user.email))
        {
            return Err(StoreError::Duplicate("email"));
        }
        if !inner.roles.contains_key(&role_id) {
            // Same failure a foreign key would produce.
            return Err(StoreError::Database(sqlx::Error::RowNotFound));
        }
        let id = inner.allocate_id();
        let row = User {
            id,
            tenant_id: user.tenant_id,
            email: user.email,
            display_name: user.display_name,
            password_hash: user.password_hash,
            password_salt: None,
            is_active: user.is_active,
            is_locked: false,
            failed_login_attempts: 0,
            last_failed_login_at: None,
            last_login_at: None,
            created_at: Utc::now(),
            deleted_at: None,
        };
        inner.users.insert(id, row.clone());
        inner.user_roles.push((id, role_id));
        Ok(row)
    }

    async fn roles_for_user(&self, id: UserId) -> StoreResult<Vec<String>> {
        let inner = self.lock();
        Ok(inner
            .user_roles
            .iter()
            .filter(|(user_id, _)| *user_id == id)
            .filter_map(|(_, role_id)| inner.roles.get(role_id).map(|r| r.name.clone()))
            .collect())
    }

    async fn find_role_by_name(&self, name: &str) -> StoreResult<Option<Role>> {
        let inner = self.lock();
        Ok(inner.roles.values().find(|r| r.name == name).cloned())
    }

    async fn create_role(&self, name: &str) -> StoreResult<Role> {
        let mut inner = self.lock();
        if inner.roles.values().any(|r| r.name == name) {
            return Err(StoreError::Duplicate("role name"));
        }
        let id = inner.allocate_id();
        let role = Role {
            id,
            name: name.to_string(),
        };
        inner.roles.insert(id, role.clone());
        Ok(role)
    }

    async fn super_admin_exists(&self) -> StoreResult<bool> {
        let inner = self.lock();
        Ok(inner.user_roles.iter().any(|(user_id, role_id)| {
            inner
                .roles
                .get(role_id)
                .is_some_and(|r| r.name == SUPER_ADMIN)
                && inner
                    .users
                    .get(user_id)
                    .is_some_and(|u| u.deleted_at.is_none())
        }))
    }

    async fn save_lockout(&self, id: UserId, state: &LockoutState) -> StoreResult<()> {
        let mut inner = self.lock();
        if let Some(user) = inner.users.get_mut(&id) {
            user.failed_login_attempts = state.failed_attempts;
            user.is_locked = state.is_locked;
            user.last_failed_login_at = state.last_failed_login_at;
        }
        Ok(())
    }

    async fn set_password_and_unlock(&self, id: UserId, hash: &[u8]) -> StoreResult<()> {
        let mut inner = self.lock();
        if let Some(user) = inner.users.get_mut(&id) {
            user.password_hash = hash.to_vec();
            user.failed_login_attempts = 0;
            user.is_locked = false;
            user.last_failed_login_at = None;
        }
        Ok(())
    }

    async fn touch_last_login(&self, id: UserId) -> StoreResult<()> {
        let mut inner = self.lock();
        if let Some(user) = inner.users.get_mut(&id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn record_login_attempt(&self, attempt: NewLoginAttempt) -> StoreResult<()> {
        let mut inner = self.lock();
        let id = inner.allocate_id();
        inner.attempts.push(LoginAttempt {
            id,
            email: attempt.email,
            user_id: attempt.user_id,
            ip_address: attempt.ip_address,
            user_agent: attempt.user_agent,
            success: attempt.success,
            failure_reason: attempt.failure_reason,
            created_at: Utc::now(),
        });
        Ok(())
    }
}

#[async_trait]
impl TenantStore for MemoryStore {
    async fn find_by_id(&self, id: TenantId) -> StoreResult<Option<Tenant>> {
        let inner = self.lock();
        Ok(inner
            .tenants
            .get(&id)
            .filter(|t| t.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Tenant>> {
        let inner = self.lock();
        Ok(inner
            .tenants
            .values()
            .find(|t| t.deleted_at.is_none() && t.code == code)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Tenant>> {
        let inner = self.lock();
        Ok(inner
            .tenants
            .values()
            .find(|t| t.deleted_at.is_none() && same_email(&t.email, email))
            .cloned())
    }

    async fn insert_with_ledger(&self, tenant: NewTenant) -> StoreResult<(Tenant, Ledger)> {
        let mut inner = self.lock();
        if inner
            .tenants
            .values()
            .any(|t| t.deleted_at.is_none() && t.code == tenant.code)
        {
            return Err(StoreError::Duplicate("code"));
        }
        if inner
            .tenants
            .values()
            .any(|t| t.deleted_at.is_none() && same_email(&t.email, &tenant.email))
        {
            return Err(StoreError::Duplicate("email"));
        }
        let tenant_id = inner.allocate_id();
        let now = Utc::now();
        let row = Tenant {
            id: tenant_id,
            code: tenant.code,
            name: tenant.name,
            email: tenant.email,
            phone: tenant.phone,
            country: tenant.country,
            address: tenant.address,
            default_currency: tenant.default_currency.clone(),
            minimum_balance: tenant.minimum_balance,
            is_active: true,
            created_at: now,
            updated_at: None,
            deleted_at: None,
        };
        let ledger_id = inner.allocate_id();
        let ledger = Ledger {
            id: ledger_id,
            tenant_id,
            currency: tenant.default_currency,
            created_at: now,
        };
        inner.tenants.insert(tenant_id, row.clone());
        inner.ledgers.insert(ledger_id, ledger.clone());
        Ok((row, ledger))
    }

    async fn list(&self, include_inactive: bool) -> StoreResult<Vec<Tenant>> {
        let inner = self.lock();
        let mut tenants: Vec<Tenant> = inner
            .tenants
            .values()
            .filter(|t| t.deleted_at.is_none() && (include_inactive || t.is_active))
            .cloned()
            .collect();
        tenants.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(tenants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            tenant_id: Some(1),
            email: email.to_string(),
            display_name: "Test User".to_string(),
            password_hash: b"$2b$04$stub".to_vec(),
            is_active: true,
        }
    }

    fn new_tenant(code: &str, email: &str) -> NewTenant {
        NewTenant {
            code: code.to_string(),
            name: "Acme Inc".to_string(),
            email: email.to_string(),
            phone: None,
            country: None,
            address: None,
            default_currency: "USD".to_string(),
            minimum_balance: 0,
        }
    }

    async fn store_with_admin_role() -> (MemoryStore, Role) {
        let store = MemoryStore::new();
        let role = store.create_role("COMPANY_ADMIN").await.unwrap();
        (store, role)
    }

    #[tokio::test]
    async fn insert_assigns_user_and_role() {
        let (store, role) = store_with_admin_role().await;
        let user = store
            .insert_with_role(new_user("alice@acme.test"), role.id)
            .await
            .unwrap();
        assert_eq!(user.email, "alice@acme.test");
        assert!(!user.is_locked);
        let roles = store.roles_for_user(user.id).await.unwrap();
        assert_eq!(roles, vec!["COMPANY_ADMIN".to_string()]);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (store, role) = store_with_admin_role().await;
        store
            .insert_with_role(new_user("alice@acme.test"), role.id)
            .await
            .unwrap();
        let err = store
            .insert_with_role(new_user("ALICE@ACME.TEST"), role.id)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("email")));
    }

    #[tokio::test]
    async fn unknown_role_fails_like_a_foreign_key() {
        let store = MemoryStore::new();
        let err = store
            .insert_with_role(new_user("alice@acme.test"), 999)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
        assert!(UserStore::find_by_email(&store, "alice@acme.test")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn deleted_users_are_invisible() {
        let (store, role) = store_with_admin_role().await;
        let user = store
            .insert_with_role(new_user("gone@acme.test"), role.id)
            .await
            .unwrap();
        let mut deleted = user.clone();
        deleted.deleted_at = Some(Utc::now());
        let store = store.with_user(deleted);
        assert!(UserStore::find_by_email(&store, "gone@acme.test")
            .await
            .unwrap()
            .is_none());
        assert!(UserStore::find_by_id(&store, user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn super_admin_detection_skips_deleted_holders() {
        let store = MemoryStore::new();
        assert!(!store.super_admin_exists().await.unwrap());
        let role = store.create_role(SUPER_ADMIN).await.unwrap();
        let user = store
            .insert_with_role(
                NewUser {
                    tenant_id: None,
                    ..new_user("root@example.test")
                },
                role.id,
            )
            .await
            .unwrap();
        assert!(store.super_admin_exists().await.unwrap());

        let mut deleted = user.clone();
        deleted.deleted_at = Some(Utc::now());
        let store = store.with_user(deleted);
        assert!(!store.super_admin_exists().await.unwrap());
    }

    #[tokio::test]
    async fn lockout_state_persists_verbatim() {
        let (store, role) = store_with_admin_role().await;
        let user = store
            .insert_with_role(new_user("alice@acme.test"), role.id)
            .await
            .unwrap();
        let now = Utc::now();
        store
            .save_lockout(
                user.id,
                &LockoutState {
                    failed_attempts: 4,
                    is_locked: true,
                    last_failed_login_at: Some(now),
                },
            )
            .await
            .unwrap();
        let stored = UserStore::find_by_id(&store, user.id).await.unwrap().unwrap();
        assert_eq!(stored.failed_login_attempts, 4);
        assert!(stored.is_locked);
        assert_eq!(stored.last_failed_login_at, Some(now));

        store
            .set_password_and_unlock(user.id, b"$2b$04$new")
            .await
            .unwrap();
        let stored = UserStore::find_by_id(&store, user.id).await.unwrap().unwrap();
        assert_eq!(stored.failed_login_attempts, 0);
        assert!(!stored.is_locked);
        assert_eq!(stored.password_hash, b"$2b$04$new".to_vec());
    }

    #[tokio::test]
    async fn tenant_duplicates_leave_no_ledger_behind() {
        let store = MemoryStore::new();
        store
            .insert_with_ledger(new_tenant("ACME", "acme@x.com"))
            .await
            .unwrap();
        assert_eq!(store.ledger_count(), 1);

        let err = store
            .insert_with_ledger(new_tenant("ACME", "other@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("code")));
        let err = store
            .insert_with_ledger(new_tenant("OTHER", "acme@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("email")));
        assert_eq!(store.ledger_count(), 1);
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_scoped() {
        let store = MemoryStore::new();
        let (first, _) = store
            .insert_with_ledger(new_tenant("FIRST", "first@x.com"))
            .await
            .unwrap();
        let (second, _) = store
            .insert_with_ledger(new_tenant("SECOND", "second@x.com"))
            .await
            .unwrap();

        let mut inactive = first.clone();
        inactive.is_active = false;
        let store = store.with_tenant(inactive);

        let active_only = store.list(false).await.unwrap();
        assert_eq!(active_only.len(), 1);
        assert_eq!(active_only[0].id, second.id);

        let all = store.list(true).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
    }
}
