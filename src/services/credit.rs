//! Credit scoring over settled history.
//!
//! A user's score is the sum of two components: lending volume earns points,
//! borrowing volume costs them. Only paid transactions count. Each component
//! steps through closed 100-unit buckets, so the total stays within [0, 200].

use uuid::Uuid;

use crate::db::models::Transaction;
use crate::error::AppError;
use crate::services::ledger::LedgerService;

/// Upper bucket bounds with the component awarded at or below each bound.
/// Sums above the last bound clamp at the extreme.
const LEND_BUCKETS: &[(f64, u32)] = &[
    (1000.0, 0),
    (1100.0, 10),
    (1200.0, 20),
    (1300.0, 30),
    (1400.0, 40),
    (1500.0, 50),
    (1600.0, 60),
    (1700.0, 70),
    (1800.0, 80),
    (1900.0, 90),
    (2000.0, 100),
];

const BORROW_BUCKETS: &[(f64, u32)] = &[
    (100.0, 100),
    (200.0, 90),
    (300.0, 80),
    (400.0, 70),
    (500.0, 60),
    (600.0, 50),
    (700.0, 40),
    (800.0, 30),
    (900.0, 20),
    (1000.0, 10),
];

fn lend_score(lend_sum: f64) -> u32 {
    LEND_BUCKETS
        .iter()
        .find(|(bound, _)| lend_sum <= *bound)
        .map(|(_, score)| *score)
        .unwrap_or(100)
}

fn borrow_score(borrow_sum: f64) -> u32 {
    BORROW_BUCKETS
        .iter()
        .find(|(bound, _)| borrow_sum <= *bound)
        .map(|(_, score)| *score)
        .unwrap_or(0)
}

fn paid_sum(rows: &[Transaction]) -> f64 {
    rows.iter()
        .filter(|tx| tx.status().is_paid())
        .map(|tx| tx.transaction_amount)
        .sum()
}

#[derive(Clone)]
pub struct CreditService {
    ledger: LedgerService,
}

impl CreditService {
    pub fn new(ledger: LedgerService) -> Self {
        Self { ledger }
    }

    /// Total score for the user. A user with no settled history scores 100:
    /// 0 for lending, 100 for owing nothing.
    pub async fn score(&self, raw_user_id: &str) -> Result<u32, AppError> {
        if raw_user_id.is_empty() {
            return Err(AppError::Validation("missing user id".to_string()));
        }

        let Ok(user_id) = Uuid::parse_str(raw_user_id) else {
            return Ok(lend_score(0.0) + borrow_score(0.0));
        };

        let lend_sum = paid_sum(&self.ledger.lend_history(user_id).await?);
        let borrow_sum = paid_sum(&self.ledger.borrow_history(user_id).await?);

        let total = lend_score(lend_sum) + borrow_score(borrow_sum);

        tracing::info!(%user_id, lend_sum, borrow_sum, total, "credit score computed");

        Ok(total)
    }
}
