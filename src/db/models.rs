use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::TransactionStatus;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub password: String,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
}

/// A stored transaction is always a lend: money flowed from
/// `transaction_from` (the lender) to `transaction_with` (the receiver).
/// The borrow framing only exists as a per-viewer projection.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub transaction_from: Uuid,
    pub transaction_with: Uuid,
    pub transaction_amount: f64,
    pub transaction_status: String,
    pub transaction_date: DateTime<Utc>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        transaction_from: Uuid,
        transaction_with: Uuid,
        transaction_amount: f64,
        status: TransactionStatus,
        transaction_date: DateTime<Utc>,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_from,
            transaction_with,
            transaction_amount,
            transaction_status: status.as_str().to_string(),
            transaction_date,
            reason,
            created_at: Utc::now(),
        }
    }

    pub fn status(&self) -> TransactionStatus {
        TransactionStatus::parse(&self.transaction_status)
    }
}
