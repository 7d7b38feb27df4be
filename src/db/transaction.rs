/*!
 * Transaction Helper Utilities
 *
 * Scoped transactions: the `DatabaseTransaction` handed to the closure is
 * committed when the closure returns `Ok` and rolled back on `Err` or when it
 * is dropped without commit.
 */

use metrics::counter;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionError, TransactionTrait};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};
use uuid::Uuid;

/// Type alias for boxed future used in transactions
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Execute a function within a database transaction
///
/// # Example
///
/// ```rust,ignore
/// use stockroom_api::db::with_transaction;
///
/// let product = with_transaction(&db, |txn| {
///     Box::pin(async move {
///         let product = new_product.insert(txn).await?;
///         new_inventory(product.id).insert(txn).await?;
///         Ok::<_, ServiceError>(product)
///     })
/// })
/// .await?;
/// ```
pub async fn with_transaction<F, T, E>(db: &DatabaseConnection, f: F) -> Result<T, E>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, Result<T, E>> + Send,
    T: Send,
    E: std::error::Error + From<DbErr> + Send,
{
    let transaction_id = Uuid::new_v4();
    debug!(transaction_id = %transaction_id, "Starting database transaction");

    let result = db.transaction::<_, T, E>(f).await;

    match &result {
        Ok(_) => {
            counter!("stockroom_db.transaction.committed", 1);
            debug!(transaction_id = %transaction_id, "Transaction committed");
        }
        Err(e) => {
            counter!("stockroom_db.transaction.rolled_back", 1);
            warn!(transaction_id = %transaction_id, error = %e, "Transaction rolled back");
        }
    }

    result.map_err(|e| match e {
        TransactionError::Connection(db_err) => E::from(db_err),
        TransactionError::Transaction(err) => err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ServiceError;
    use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbBackend, Statement};

    async fn scratch_db() -> DatabaseConnection {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1);
        let db = Database::connect(opt).await.unwrap();
        db.execute(Statement::from_string(
            DbBackend::Sqlite,
            "CREATE TABLE scratch (id INTEGER PRIMARY KEY, label TEXT NOT NULL)".to_string(),
        ))
        .await
        .unwrap();
        db
    }

    async fn row_count(db: &DatabaseConnection) -> i64 {
        let row = db
            .query_one(Statement::from_string(
                DbBackend::Sqlite,
                "SELECT COUNT(*) AS n FROM scratch".to_string(),
            ))
            .await
            .unwrap()
            .unwrap();
        row.try_get("", "n").unwrap()
    }

    #[tokio::test]
    async fn commits_on_success() {
        let db = scratch_db().await;

        let value = with_transaction(&db, |txn| {
            Box::pin(async move {
                txn.execute(Statement::from_string(
                    DbBackend::Sqlite,
                    "INSERT INTO scratch (label) VALUES ('kept')".to_string(),
                ))
                .await?;
                Ok::<_, ServiceError>(42)
            })
        })
        .await
        .unwrap();

        assert_eq!(value, 42);
        assert_eq!(row_count(&db).await, 1);
    }

    #[tokio::test]
    async fn rolls_back_and_preserves_error_type() {
        let db = scratch_db().await;

        let result: Result<(), ServiceError> = with_transaction(&db, |txn| {
            Box::pin(async move {
                txn.execute(Statement::from_string(
                    DbBackend::Sqlite,
                    "INSERT INTO scratch (label) VALUES ('discarded')".to_string(),
                ))
                .await?;
                Err(ServiceError::NotFound("missing".into()))
            })
        })
        .await;

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        assert_eq!(row_count(&db).await, 0);
    }
}
