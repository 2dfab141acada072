pub mod auth;
pub mod balance;
pub mod credit;
pub mod ledger;
