//! PostgreSQL store implementation.
//!
//! Implements [`UserStore`] and [`TenantStore`] on top of a shared
//! [`PgPool`]. All statements run under the deadlines from
//! [`super::timeouts`]; combined inserts run inside a single transaction
//! so a failure leaves no partial rows behind. Unique-index violations
//! are translated to [`StoreError::Duplicate`] so callers can report a
//! conflict instead of a server error when two requests race.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::repository::{StoreError, StoreResult, TenantStore, UserStore};
use super::timeouts::{with_query_timeout, with_transaction_timeout};
use crate::auth::lockout::LockoutState;
use crate::auth::models::{NewLoginAttempt, NewUser, Role, RoleId, User, UserId};
use crate::auth::policy::SUPER_ADMIN;
use crate::tenant::models::{Ledger, NewTenant, Tenant, TenantId};

const USER_COLUMNS: &str = "id, tenant_id, email, display_name, password_hash, password_salt,
            is_active, is_locked, failed_login_attempts, last_failed_login_at,
            last_login_at, created_at, deleted_at";

const TENANT_COLUMNS: &str = "id, code, name, email, phone, country, address,
            default_currency, minimum_balance, is_active, created_at, updated_at, deleted_at";

/// PostgreSQL-backed store.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(r: &PgRow) -> User {
    User {
        id: r.get("id"),
        tenant_id: r.get("tenant_id"),
        email: r.get("email"),
        display_name: r.get("display_name"),
        password_hash: r.get("password_hash"),
        password_salt: r.get("password_salt"),
        is_active: r.get("is_active"),
        is_locked: r.get("is_locked"),
        failed_login_attempts: r.get("failed_login_attempts"),
        last_failed_login_at: r
            .get::<Option<chrono::NaiveDateTime>, _>("last_failed_login_at")
            .map(|dt| dt.and_utc()),
        last_login_at: r
            .get::<Option<chrono::NaiveDateTime>, _>("last_login_at")
            .map(|dt| dt.and_utc()),
        created_at: r.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
        deleted_at: r
            .get::<Option<chrono::NaiveDateTime>, _>("deleted_at")
            .map(|dt| dt.and_utc()),
    }
}

fn tenant_from_row(r: &PgRow) -> Tenant {
    Tenant {
        id: r.get("id"),
        code: r.get("code"),
        name: r.get("name"),
        email: r.get("email"),
        phone: r.get("phone"),
        country: r.get("country"),
        address: r.get("address"),
        default_currency: r.get("default_currency"),
        minimum_balance: r.get("minimum_balance"),
        is_active: r.get("is_active"),
        created_at: r.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
        updated_at: r
            .get::<Option<chrono::NaiveDateTime>, _>("updated_at")
            .map(|dt| dt.and_utc()),
        deleted_at: r
            .get::<Option<chrono::NaiveDateTime>, _>("deleted_at")
            .map(|dt| dt.and_utc()),
    }
}

fn ledger_from_row(r: &PgRow) -> Ledger {
    Ledger {
        id: r.get("id"),
        tenant_id: r.get("tenant_id"),
        currency: r.get("currency"),
        created_at: r.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
    }
}

/// Name the unique index behind a 23505 error, if any.
fn unique_violation_field(err: &sqlx::Error) -> Option<&'static str> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    if !db_err.code().is_some_and(|code| code.as_ref() == "23505") {
        return None;
    }
    match db_err.constraint() {
        Some(name) if name.contains("code") => Some("code"),
        Some(name) if name.contains("email") => Some("email"),
        _ => Some("unique"),
    }
}

fn mark_duplicates(err: StoreError) -> StoreError {
    if let StoreError::Database(db) = &err {
        if let Some(field) = unique_violation_field(db) {
            return StoreError::Duplicate(field);
        }
    }
    err
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = with_query_timeout(
            sqlx::query(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = $1 AND deleted_at IS NULL"
            ))
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool),
        )
        .await?;
        Ok(row.map(|r| user_from_row(&r)))
    }

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        let row = with_query_timeout(
            sqlx::query(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
            ))
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await?;
        Ok(row.map(|r| user_from_row(&r)))
    }

    async fn insert_with_role(&self, user: NewUser, role_id: RoleId) -> StoreResult<User> {
        let row = with_transaction_timeout(async {
            let mut tx = self.pool.begin().await?;
            let row = sqlx::query(&format!(
                "INSERT INTO users (tenant_id, email, display_name, password_hash, is_active)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING {USER_COLUMNS}"
            ))
            .bind(user.tenant_id)
            .bind(&user.email)
            .bind(&user.display_name)
            .bind(&user.password_hash)
            .bind(user.is_active)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(row.get::<i64, _>("id"))
                .bind(role_id)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok(row)
        })
        .await
        .map_err(|err| mark_duplicates(err.into()))?;

        Ok(user_from_row(&row))
    }

    async fn roles_for_user(&self, id: UserId) -> StoreResult<Vec<String>> {
        let rows = with_query_timeout(
            sqlx::query(
                "SELECT r.name FROM roles r
                 JOIN user_roles ur ON ur.role_id = r.id
                 WHERE ur.user_id = $1
                 ORDER BY r.name",
            )
            .bind(id)
            .fetch_all(&self.pool),
        )
        .await?;
        Ok(rows.iter().map(|r| r.get("name")).collect())
    }

    async fn find_role_by_name(&self, name: &str) -> StoreResult<Option<Role>> {
        let row = with_query_timeout(
            sqlx::query("SELECT id, name FROM roles WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool),
        )
        .await?;
        Ok(row.map(|r| Role {
            id: r.get("id"),
            name: r.get("name"),
        }))
    }

    async fn create_role(&self, name: &str) -> StoreResult<Role> {
        let row = with_query_timeout(
            sqlx::query("INSERT INTO roles (name) VALUES ($1) RETURNING id, name")
                .bind(name)
                .fetch_one(&self.pool),
        )
        .await
        .map_err(|err| mark_duplicates(err.into()))?;
        Ok(Role {
            id: row.get("id"),
            name: row.get("name"),
        })
    }

    async fn super_admin_exists(&self) -> StoreResult<bool> {
        let row = with_query_timeout(
            sqlx::query(
                "SELECT EXISTS (
                     SELECT 1 FROM user_roles ur
                     JOIN roles r ON r.id = ur.role_id
                     JOIN users u ON u.id = ur.user_id
                     WHERE r.name = $1 AND u.deleted_at IS NULL
                 ) AS present",
            )
            .bind(SUPER_ADMIN)
            .fetch_one(&self.pool),
        )
        .await?;
        Ok(row.get("present"))
    }

    async fn save_lockout(&self, id: UserId, state: &LockoutState) -> StoreResult<()> {
        with_query_timeout(
            sqlx::query(
                "UPDATE users
                 SET failed_login_attempts = $1, is_locked = $2, last_failed_login_at = $3
                 WHERE id = $4",
            )
            .bind(state.failed_attempts)
            .bind(state.is_locked)
            .bind(state.last_failed_login_at.map(|dt| dt.naive_utc()))
            .bind(id)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn set_password_and_unlock(&self, id: UserId, hash: &[u8]) -> StoreResult<()> {
        with_query_timeout(
            sqlx::query(
                "UPDATE users
                 SET password_hash = $1, password_salt = NULL,
                     failed_login_attempts = 0, is_locked = FALSE, last_failed_login_at = NULL
                 WHERE id = $2",
            )
            .bind(hash)
            .bind(id)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn touch_last_login(&self, id: UserId) -> StoreResult<()> {
        with_query_timeout(
            sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn record_login_attempt(&self, attempt: NewLoginAttempt) -> StoreResult<()> {
        with_query_timeout(
            sqlx::query(
                "INSERT INTO login_attempts
                     (email, user_id, ip_address, user_agent, success, failure_reason)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&attempt.email)
            .bind(attempt.user_id)
            .bind(&attempt.ip_address)
            .bind(&attempt.user_agent)
            .bind(attempt.success)
            .bind(&attempt.failure_reason)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl TenantStore for PgStore {
    async fn find_by_id(&self, id: TenantId) -> StoreResult<Option<Tenant>> {
        let row = with_query_timeout(
            sqlx::query(&format!(
                "SELECT {TENANT_COLUMNS} FROM tenants WHERE id = $1 AND deleted_at IS NULL"
            ))
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await?;
        Ok(row.map(|r| tenant_from_row(&r)))
    }

    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Tenant>> {
        let row = with_query_timeout(
            sqlx::query(&format!(
                "SELECT {TENANT_COLUMNS} FROM tenants WHERE code = $1 AND deleted_at IS NULL"
            ))
            .bind(code)
            .fetch_optional(&self.pool),
        )
        .await?;
        Ok(row.map(|r| tenant_from_row(&r)))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Tenant>> {
        let row = with_query_timeout(
            sqlx::query(&format!(
                "SELECT {TENANT_COLUMNS} FROM tenants WHERE LOWER(email) = $1 AND deleted_at IS NULL"
            ))
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool),
        )
        .await?;
        Ok(row.map(|r| tenant_from_row(&r)))
    }

    async fn insert_with_ledger(&self, tenant: NewTenant) -> StoreResult<(Tenant, Ledger)> {
        let (tenant_row, ledger_row) = with_transaction_timeout(async {
            let mut tx = self.pool.begin().await?;
            let tenant_row = sqlx::query(&format!(
                "INSERT INTO tenants
                     (code, name, email, phone, country, address, default_currency, minimum_balance)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 RETURNING {TENANT_COLUMNS}"
            ))
            .bind(&tenant.code)
            .bind(&tenant.name)
            .bind(&tenant.email)
            .bind(&tenant.phone)
            .bind(&tenant.country)
            .bind(&tenant.address)
            .bind(&tenant.default_currency)
            .bind(tenant.minimum_balance)
            .fetch_one(&mut *tx)
            .await?;

            let ledger_row = sqlx::query(
                "INSERT INTO ledgers (tenant_id, currency)
                 VALUES ($1, $2)
                 RETURNING id, tenant_id, currency, created_at",
            )
            .bind(tenant_row.get::<i64, _>("id"))
            .bind(&tenant.default_currency)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok((tenant_row, ledger_row))
        })
        .await
        .map_err(|err| mark_duplicates(err.into()))?;

        Ok((tenant_from_row(&tenant_row), ledger_from_row(&ledger_row)))
    }

    async fn list(&self, include_inactive: bool) -> StoreResult<Vec<Tenant>> {
        let rows = with_query_timeout(
            sqlx::query(&format!(
                "SELECT {TENANT_COLUMNS} FROM tenants
                 WHERE deleted_at IS NULL AND (is_active = TRUE OR $1 = TRUE)
                 ORDER BY created_at DESC, id DESC"
            ))
            .bind(include_inactive)
            .fetch_all(&self.pool),
        )
        .await?;
        Ok(rows.iter().map(tenant_from_row).collect())
    }
}
