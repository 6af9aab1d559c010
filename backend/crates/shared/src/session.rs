//! Per-request transactional session
//!
//! A [`PgSession`] owns one PostgreSQL transaction. Every repository built
//! for a request holds a clone of the same session, so their writes are
//! visible to each other before commit. Dropping the last clone without
//! calling [`PgSession::commit`] rolls the transaction back.

use std::sync::Arc;

use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tokio::sync::{Mutex, MutexGuard};

use crate::error::store::{StoreError, StoreResult};

type Slot = Option<Transaction<'static, Postgres>>;

/// Shared handle to one open transaction
#[derive(Clone)]
pub struct PgSession {
    tx: Arc<Mutex<Slot>>,
}

impl PgSession {
    /// Open a new transaction on the pool
    pub async fn begin(pool: &PgPool) -> StoreResult<Self> {
        let tx = pool.begin().await?;
        Ok(Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        })
    }

    /// Lock the session for the duration of one statement
    pub async fn lock(&self) -> SessionGuard<'_> {
        SessionGuard(self.tx.lock().await)
    }

    /// Commit the transaction; later use of any clone fails with `SessionClosed`
    pub async fn commit(&self) -> StoreResult<()> {
        let tx = self.tx.lock().await.take().ok_or(StoreError::SessionClosed)?;
        tx.commit().await?;
        Ok(())
    }

    /// Roll the transaction back explicitly
    pub async fn rollback(&self) -> StoreResult<()> {
        let tx = self.tx.lock().await.take().ok_or(StoreError::SessionClosed)?;
        tx.rollback().await?;
        Ok(())
    }
}

/// Exclusive access to the session's connection
pub struct SessionGuard<'a>(MutexGuard<'a, Slot>);

impl SessionGuard<'_> {
    /// Connection to run a statement on
    pub fn conn(&mut self) -> StoreResult<&mut PgConnection> {
        self.0
            .as_mut()
            .map(|tx| &mut **tx)
            .ok_or(StoreError::SessionClosed)
    }
}

// ============================================================================
// Axum extractor (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
mod extract {
    use axum::extract::{FromRef, FromRequestParts};
    use http::request::Parts;
    use sqlx::PgPool;

    use super::PgSession;
    use crate::error::app_error::AppError;

    /// Opens the request's transaction from the router's pool
    impl<S> FromRequestParts<S> for PgSession
    where
        PgPool: FromRef<S>,
        S: Send + Sync,
    {
        type Rejection = AppError;

        async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
            let pool = PgPool::from_ref(state);
            PgSession::begin(&pool).await.map_err(AppError::from)
        }
    }
}
