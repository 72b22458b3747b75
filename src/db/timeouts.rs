//! Query timeout helpers.
//!
//! Every store operation is bounded: a single query gets
//! [`DEFAULT_QUERY_TIMEOUT`], a combined-insert transaction gets
//! [`DEFAULT_TRANSACTION_TIMEOUT`]. Nothing in the core waits longer than
//! one bounded round trip to storage.

use std::time::Duration;

use tokio::time::timeout;

/// Timeout for single queries (5 seconds)
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for transactions (10 seconds)
pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for timed database operations
#[derive(Debug, thiserror::Error)]
pub enum TimeoutError {
    /// Operation exceeded its deadline
    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Run a database future with a deadline.
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> Result<T, TimeoutError>
where
    F: std::future::Future<Output = Result<T, sqlx::Error>>,
{
    match timeout(duration, future).await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(e)) => Err(TimeoutError::Database(e)),
        Err(_) => Err(TimeoutError::Timeout(duration)),
    }
}

/// Run a single query with the default query deadline.
pub async fn with_query_timeout<F, T>(future: F) -> Result<T, TimeoutError>
where
    F: std::future::Future<Output = Result<T, sqlx::Error>>,
{
    with_timeout(DEFAULT_QUERY_TIMEOUT, future).await
}

/// Run a transaction body with the transaction deadline.
pub async fn with_transaction_timeout<F, T>(future: F) -> Result<T, TimeoutError>
where
    F: std::future::Future<Output = Result<T, sqlx::Error>>,
{
    with_timeout(DEFAULT_TRANSACTION_TIMEOUT, future).await
}
