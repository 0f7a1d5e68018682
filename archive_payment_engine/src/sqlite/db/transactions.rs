use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewTransaction, OrderId, Transaction},
    traits::PaymentGatewayError,
};

/// Returns the transaction recorded for the given provider order id, if any.
pub async fn fetch_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, sqlx::Error> {
    let transaction = sqlx::query_as("SELECT * FROM transactions WHERE provider_order_id = $1")
        .bind(order_id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(transaction)
}

/// Inserts a new transaction row.
///
/// The unique constraint on `provider_order_id` is the idempotency backstop; a violation is mapped to
/// [`PaymentGatewayError::TransactionAlreadyExists`] so the caller can resolve the race by re-querying.
pub(crate) async fn insert_transaction(
    transaction: NewTransaction,
    conn: &mut SqliteConnection,
) -> Result<Transaction, PaymentGatewayError> {
    let order_id = transaction.provider_order_id.clone();
    let result: Result<Transaction, sqlx::Error> = sqlx::query_as(
        r#"
            INSERT INTO transactions (
                provider_order_id,
                item_id,
                donor_id,
                fee,
                payment_status,
                payment_method,
                pickup
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *;
        "#,
    )
    .bind(transaction.provider_order_id)
    .bind(transaction.item_id)
    .bind(transaction.donor_id)
    .bind(transaction.fee)
    .bind(transaction.payment_status.to_string())
    .bind(transaction.payment_method)
    .bind(transaction.pickup)
    .fetch_one(conn)
    .await;
    match result {
        Ok(row) => {
            debug!("🗃️ Transaction #{} recorded for order {}", row.id, row.provider_order_id);
            Ok(row)
        },
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(PaymentGatewayError::TransactionAlreadyExists(order_id))
        },
        Err(e) => Err(e.into()),
    }
}

/// All transactions for the given donor, newest first.
pub async fn fetch_for_donor(donor_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Transaction>, sqlx::Error> {
    let transactions = sqlx::query_as("SELECT * FROM transactions WHERE donor_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(donor_id)
        .fetch_all(conn)
        .await?;
    Ok(transactions)
}
