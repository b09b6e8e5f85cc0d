//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
pub mod money;
pub mod result;
mod state;
mod transaction;
mod user;

pub use account::Account;
pub use state::BankState;
pub use transaction::{Transaction, TransactionKind};
pub use user::{User, BIRTH_DATE_FORMAT};
