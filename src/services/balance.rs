//! Applies a transaction's monetary effect to both participant balances.
//!
//! Both updates run against the caller's open database transaction: either
//! both balances move or neither does, and the two deltas always sum to zero.

use sqlx::{Postgres, Result, Transaction as SqlxTransaction};
use uuid::Uuid;

use crate::db::queries;

/// Creation-time effect of a lend recorded as already paid: the stored
/// lender is credited `amount`, the receiver debited the same.
pub async fn apply_paid_lend(
    executor: &mut SqlxTransaction<'_, Postgres>,
    from: Uuid,
    with: Uuid,
    amount: f64,
) -> Result<()> {
    queries::adjust_balance(executor, from, amount).await?;
    queries::adjust_balance(executor, with, -amount).await?;
    Ok(())
}

/// Settlement of a previously unpaid debt: the inverse-signed complement of
/// [`apply_paid_lend`] — the lender's receivable is cleared, the debtor's
/// balance restored.
pub async fn apply_repayment(
    executor: &mut SqlxTransaction<'_, Postgres>,
    from: Uuid,
    with: Uuid,
    amount: f64,
) -> Result<()> {
    queries::adjust_balance(executor, from, -amount).await?;
    queries::adjust_balance(executor, with, amount).await?;
    Ok(())
}
