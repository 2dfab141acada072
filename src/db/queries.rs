use sqlx::{PgPool, Postgres, Result, Transaction as SqlxTransaction};
use uuid::Uuid;

use crate::db::models::{Transaction, User};

// --- User queries ---

pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_user_by_credentials(
    pool: &PgPool,
    username: &str,
    password: &str,
) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1 AND password = $2")
        .bind(username)
        .bind(password)
        .fetch_optional(pool)
        .await
}

/// Shifts a user's running balance by `delta`. Only ever called inside an
/// open transaction, paired with the opposite shift on the counterparty.
pub async fn adjust_balance(
    executor: &mut SqlxTransaction<'_, Postgres>,
    user_id: Uuid,
    delta: f64,
) -> Result<()> {
    sqlx::query("UPDATE users SET balance = balance + $1 WHERE id = $2")
        .bind(delta)
        .bind(user_id)
        .execute(&mut **executor)
        .await?;

    Ok(())
}

// --- Transaction queries ---

pub async fn insert_transaction(
    executor: &mut SqlxTransaction<'_, Postgres>,
    tx: &Transaction,
) -> Result<Transaction> {
    sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (
            id, transaction_from, transaction_with, transaction_amount,
            transaction_status, transaction_date, reason, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(tx.id)
    .bind(tx.transaction_from)
    .bind(tx.transaction_with)
    .bind(tx.transaction_amount)
    .bind(&tx.transaction_status)
    .bind(tx.transaction_date)
    .bind(&tx.reason)
    .bind(tx.created_at)
    .fetch_one(&mut **executor)
    .await
}

pub async fn get_transaction(pool: &PgPool, id: Uuid) -> Result<Option<Transaction>> {
    sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn set_transaction_paid(
    executor: &mut SqlxTransaction<'_, Postgres>,
    id: Uuid,
) -> Result<()> {
    sqlx::query("UPDATE transactions SET transaction_status = 'paid' WHERE id = $1")
        .bind(id)
        .execute(&mut **executor)
        .await?;

    Ok(())
}

/// Transactions the user extended, in store order.
pub async fn lend_transactions(pool: &PgPool, user_id: Uuid) -> Result<Vec<Transaction>> {
    sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE transaction_from = $1 ORDER BY created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Transactions the user owes, in store order.
pub async fn borrow_transactions(pool: &PgPool, user_id: Uuid) -> Result<Vec<Transaction>> {
    sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE transaction_with = $1 ORDER BY created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
