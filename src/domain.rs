//! Ledger domain types: transaction direction, settlement status, and the
//! viewer-relative projection of stored rows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::db::models::Transaction;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Lend,
    Borrow,
}

impl TransactionKind {
    /// Only the exact string "borrow" flips direction; any other non-empty
    /// value records a lend.
    pub fn parse(raw: &str) -> Self {
        if raw == "borrow" {
            TransactionKind::Borrow
        } else {
            TransactionKind::Lend
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Lend => "lend",
            TransactionKind::Borrow => "borrow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Unpaid,
    Paid,
}

impl TransactionStatus {
    /// Only the exact string "paid" settles; any other non-empty value is
    /// recorded as unpaid.
    pub fn parse(raw: &str) -> Self {
        if raw == "paid" {
            TransactionStatus::Paid
        } else {
            TransactionStatus::Unpaid
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Unpaid => "unpaid",
            TransactionStatus::Paid => "paid",
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, TransactionStatus::Paid)
    }
}

/// Calendar-day parse with a lenient fallback: an absent or unparseable date
/// becomes "now" rather than rejecting the request.
pub fn parse_transaction_date(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|value| NaiveDate::parse_from_str(value, DATE_FORMAT).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| DateTime::from_naive_utc_and_offset(datetime, Utc))
        .unwrap_or_else(Utc::now)
}

pub fn format_transaction_date(date: DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// A stored transaction as one of its participants sees it. The stored row is
/// always a lend from `transaction_from`; the receiver sees the same row with
/// the parties swapped and the kind inverted.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    pub transaction_id: String,
    pub transaction_date: String,
    pub transaction_from: String,
    pub transaction_with: String,
    pub transaction_status: String,
    pub transaction_amount: f64,
    pub transaction_type: String,
    pub reason: Option<String>,
}

impl TransactionView {
    /// The row as its stored `from` party sees it.
    pub fn lend(tx: &Transaction) -> Self {
        Self {
            transaction_id: tx.id.to_string(),
            transaction_date: format_transaction_date(tx.transaction_date),
            transaction_from: tx.transaction_from.to_string(),
            transaction_with: tx.transaction_with.to_string(),
            transaction_status: tx.transaction_status.clone(),
            transaction_amount: tx.transaction_amount,
            transaction_type: TransactionKind::Lend.as_str().to_string(),
            reason: tx.reason.clone(),
        }
    }

    /// The row as its stored `with` party sees it: parties swapped, kind
    /// inverted.
    pub fn borrow(tx: &Transaction) -> Self {
        Self {
            transaction_id: tx.id.to_string(),
            transaction_date: format_transaction_date(tx.transaction_date),
            transaction_from: tx.transaction_with.to_string(),
            transaction_with: tx.transaction_from.to_string(),
            transaction_status: tx.transaction_status.clone(),
            transaction_amount: tx.transaction_amount,
            transaction_type: TransactionKind::Borrow.as_str().to_string(),
            reason: tx.reason.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_transaction() -> Transaction {
        Transaction::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            250.0,
            TransactionStatus::Unpaid,
            parse_transaction_date(Some("2024-03-15")),
            Some("rent split".to_string()),
        )
    }

    #[test]
    fn kind_parses_borrow_exactly() {
        assert_eq!(TransactionKind::parse("borrow"), TransactionKind::Borrow);
        assert_eq!(TransactionKind::parse("lend"), TransactionKind::Lend);
        assert_eq!(TransactionKind::parse("Borrow"), TransactionKind::Lend);
        assert_eq!(TransactionKind::parse("gift"), TransactionKind::Lend);
    }

    #[test]
    fn status_parses_paid_exactly() {
        assert!(TransactionStatus::parse("paid").is_paid());
        assert!(!TransactionStatus::parse("unpaid").is_paid());
        assert!(!TransactionStatus::parse("PAID").is_paid());
        assert!(!TransactionStatus::parse("settled").is_paid());
    }

    #[test]
    fn parses_calendar_date() {
        let date = parse_transaction_date(Some("2024-03-15"));
        assert_eq!(format_transaction_date(date), "2024-03-15");
    }

    #[test]
    fn unparseable_date_falls_back_to_now() {
        let before = Utc::now();
        let date = parse_transaction_date(Some("15/03/2024"));
        assert!(date >= before);

        let absent = parse_transaction_date(None);
        assert!(absent >= before);
    }

    #[test]
    fn lend_view_keeps_stored_parties() {
        let tx = sample_transaction();
        let view = TransactionView::lend(&tx);

        assert_eq!(view.transaction_from, tx.transaction_from.to_string());
        assert_eq!(view.transaction_with, tx.transaction_with.to_string());
        assert_eq!(view.transaction_type, "lend");
        assert_eq!(view.transaction_date, "2024-03-15");
        assert_eq!(view.transaction_amount, 250.0);
    }

    #[test]
    fn borrow_view_swaps_parties_and_inverts_kind() {
        let tx = sample_transaction();
        let view = TransactionView::borrow(&tx);

        assert_eq!(view.transaction_from, tx.transaction_with.to_string());
        assert_eq!(view.transaction_with, tx.transaction_from.to_string());
        assert_eq!(view.transaction_type, "borrow");
        assert_eq!(view.reason.as_deref(), Some("rent split"));
    }
}
