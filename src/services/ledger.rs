use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::cache::HistoryCache;
use crate::db::models::{Transaction, User};
use crate::db::queries;
use crate::domain::{
    TransactionKind, TransactionStatus, TransactionView, parse_transaction_date,
};
use crate::error::AppError;
use crate::services::balance;

/// Raw creation request, exactly as it arrived on the wire. Field-level
/// validation happens here in the service, not at the HTTP boundary.
#[derive(Debug, Default)]
pub struct NewTransaction {
    pub from: Option<String>,
    pub with: Option<String>,
    pub amount: Option<f64>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug)]
struct ValidatedTransaction {
    from: String,
    with: String,
    amount: f64,
    kind: TransactionKind,
    status: TransactionStatus,
}

/// Each check is a distinct failure, in a fixed order: the first one that
/// trips is the one reported.
fn validate(req: &NewTransaction) -> Result<ValidatedTransaction, AppError> {
    let from = req.from.as_deref().unwrap_or("");
    if from.is_empty() {
        return Err(AppError::Validation("missing from id".to_string()));
    }

    let with = req.with.as_deref().unwrap_or("");
    if with.is_empty() {
        return Err(AppError::Validation("missing with id".to_string()));
    }

    let amount = req.amount.unwrap_or(0.0);
    if amount == 0.0 {
        return Err(AppError::Validation("missing amount".to_string()));
    }

    let kind = req.kind.as_deref().unwrap_or("");
    if kind.is_empty() {
        return Err(AppError::Validation("missing type".to_string()));
    }

    let status = req.status.as_deref().unwrap_or("");
    if status.is_empty() {
        return Err(AppError::Validation("missing status".to_string()));
    }

    if amount <= 0.0 {
        return Err(AppError::Validation("amount must be positive".to_string()));
    }

    Ok(ValidatedTransaction {
        from: from.to_string(),
        with: with.to_string(),
        amount,
        kind: TransactionKind::parse(kind),
        status: TransactionStatus::parse(status),
    })
}

#[derive(Clone)]
pub struct LedgerService {
    pool: PgPool,
    cache: Arc<dyn HistoryCache>,
}

impl LedgerService {
    pub fn new(pool: PgPool, cache: Arc<dyn HistoryCache>) -> Self {
        Self { pool, cache }
    }

    /// Records a transaction. Borrows are stored inverted so every row is a
    /// lend from the stored sender; a paid status applies the balance effect
    /// in the same database transaction as the insert.
    pub async fn add_transaction(&self, req: NewTransaction) -> Result<Uuid, AppError> {
        let validated = validate(&req)?;

        let from_user = self.resolve_user(&validated.from, "from user not found").await?;
        let with_user = self.resolve_user(&validated.with, "with user not found").await?;

        // Canonical storage: a borrow by A from B is the same row as a lend
        // by B to A.
        let (stored_from, stored_with) = match validated.kind {
            TransactionKind::Lend => (from_user.id, with_user.id),
            TransactionKind::Borrow => (with_user.id, from_user.id),
        };

        let record = Transaction::new(
            stored_from,
            stored_with,
            validated.amount,
            validated.status,
            parse_transaction_date(req.date.as_deref()),
            req.reason,
        );

        let mut tx = self.pool.begin().await?;
        let inserted = queries::insert_transaction(&mut tx, &record).await?;
        if validated.status.is_paid() {
            balance::apply_paid_lend(&mut tx, stored_from, stored_with, validated.amount).await?;
        }
        tx.commit().await?;

        self.cache.invalidate(&[stored_from, stored_with]).await;

        tracing::info!(
            transaction_id = %inserted.id,
            kind = validated.kind.as_str(),
            status = validated.status.as_str(),
            "transaction recorded"
        );

        Ok(inserted.id)
    }

    /// One-way unpaid -> paid transition. Settling twice would double-apply
    /// the balance effect, so an already paid transaction is left untouched.
    pub async fn mark_paid(&self, raw_id: &str) -> Result<Uuid, AppError> {
        if raw_id.is_empty() {
            return Err(AppError::Validation("missing transaction id".to_string()));
        }

        let id = Uuid::parse_str(raw_id)
            .map_err(|_| AppError::NotFound("transaction not found".to_string()))?;
        let record = queries::get_transaction(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("transaction not found".to_string()))?;

        if record.status().is_paid() {
            tracing::info!(transaction_id = %id, "transaction already settled");
            return Ok(id);
        }

        let mut tx = self.pool.begin().await?;
        queries::set_transaction_paid(&mut tx, id).await?;
        balance::apply_repayment(
            &mut tx,
            record.transaction_from,
            record.transaction_with,
            record.transaction_amount,
        )
        .await?;
        tx.commit().await?;

        self.cache
            .invalidate(&[record.transaction_from, record.transaction_with])
            .await;

        tracing::info!(transaction_id = %id, "transaction settled");

        Ok(id)
    }

    /// Full history as the user sees it: every lend they extended, then every
    /// debt they owe, each leg in store order.
    pub async fn list_transactions(&self, raw_user_id: &str) -> Result<Vec<TransactionView>, AppError> {
        if raw_user_id.is_empty() {
            return Err(AppError::Validation("missing user id".to_string()));
        }

        let Ok(user_id) = Uuid::parse_str(raw_user_id) else {
            return Err(AppError::NotFound("no transactions for user".to_string()));
        };

        let lends = self.lend_history(user_id).await?;
        let borrows = self.borrow_history(user_id).await?;

        let mut views: Vec<TransactionView> = lends.iter().map(TransactionView::lend).collect();
        views.extend(borrows.iter().map(TransactionView::borrow));

        if views.is_empty() {
            return Err(AppError::NotFound("no transactions for user".to_string()));
        }

        Ok(views)
    }

    pub async fn lend_history(&self, user_id: Uuid) -> Result<Vec<Transaction>, AppError> {
        self.history(TransactionKind::Lend, user_id).await
    }

    pub async fn borrow_history(&self, user_id: Uuid) -> Result<Vec<Transaction>, AppError> {
        self.history(TransactionKind::Borrow, user_id).await
    }

    async fn history(
        &self,
        kind: TransactionKind,
        user_id: Uuid,
    ) -> Result<Vec<Transaction>, AppError> {
        if let Some(rows) = self.cache.get(kind, user_id).await {
            return Ok(rows);
        }

        let rows = match kind {
            TransactionKind::Lend => queries::lend_transactions(&self.pool, user_id).await?,
            TransactionKind::Borrow => queries::borrow_transactions(&self.pool, user_id).await?,
        };
        self.cache.set(kind, user_id, &rows).await;

        Ok(rows)
    }

    async fn resolve_user(&self, raw_id: &str, missing: &str) -> Result<User, AppError> {
        let id =
            Uuid::parse_str(raw_id).map_err(|_| AppError::NotFound(missing.to_string()))?;
        queries::get_user(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(missing.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> NewTransaction {
        NewTransaction {
            from: Some("a6f1f9da-9f49-4bd9-9c1c-1d6290acadf0".to_string()),
            with: Some("5b4f8a9e-40f4-4b8e-8a47-2d5b20c4a1ce".to_string()),
            amount: Some(120.0),
            kind: Some("lend".to_string()),
            status: Some("unpaid".to_string()),
            date: Some("2024-01-31".to_string()),
            reason: None,
        }
    }

    fn message(result: Result<ValidatedTransaction, AppError>) -> String {
        match result {
            Err(AppError::Validation(message)) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_complete_request() {
        let validated = validate(&full_request()).unwrap();
        assert_eq!(validated.amount, 120.0);
        assert_eq!(validated.kind, TransactionKind::Lend);
        assert_eq!(validated.status, TransactionStatus::Unpaid);
    }

    #[test]
    fn rejects_fields_in_declaration_order() {
        let mut req = NewTransaction::default();
        assert_eq!(message(validate(&req)), "missing from id");

        req.from = full_request().from;
        assert_eq!(message(validate(&req)), "missing with id");

        req.with = full_request().with;
        assert_eq!(message(validate(&req)), "missing amount");

        req.amount = Some(120.0);
        assert_eq!(message(validate(&req)), "missing type");

        req.kind = Some("lend".to_string());
        assert_eq!(message(validate(&req)), "missing status");
    }

    #[test]
    fn zero_amount_reads_as_missing() {
        let mut req = full_request();
        req.amount = Some(0.0);
        assert_eq!(message(validate(&req)), "missing amount");
    }

    #[test]
    fn negative_amount_rejected_after_presence_checks() {
        let mut req = full_request();
        req.amount = Some(-50.0);
        assert_eq!(message(validate(&req)), "amount must be positive");

        // Presence failures still win over the sign check.
        req.status = None;
        assert_eq!(message(validate(&req)), "missing status");
    }

    #[test]
    fn unknown_kind_degrades_to_lend() {
        let mut req = full_request();
        req.kind = Some("wire".to_string());
        assert_eq!(validate(&req).unwrap().kind, TransactionKind::Lend);

        req.kind = Some("borrow".to_string());
        assert_eq!(validate(&req).unwrap().kind, TransactionKind::Borrow);
    }
}
