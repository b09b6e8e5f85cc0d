//! Transaction record domain model

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What moved the money
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    TransferOut,
    TransferIn,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::TransferOut => "transfer_out",
            TransactionKind::TransferIn => "transfer_in",
        }
    }

    /// Human-readable label for statements
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdrawal => "WITHDRAWAL",
            TransactionKind::TransferOut => "TRANSFER-SENT",
            TransactionKind::TransferIn => "TRANSFER-RECEIVED",
        }
    }

    /// True for kinds that take money out of the account
    pub fn is_debit(&self) -> bool {
        matches!(self, TransactionKind::Withdrawal | TransactionKind::TransferOut)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry in an account's history
///
/// The amount is signed: debits are stored negative, credits positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Create a record for a positive `amount`, applying the sign of `kind`
    pub fn new(kind: TransactionKind, amount: Decimal, timestamp: DateTime<Utc>) -> Self {
        let magnitude = amount.abs();
        Self {
            id: Uuid::new_v4(),
            kind,
            amount: if kind.is_debit() { -magnitude } else { magnitude },
            timestamp,
        }
    }

    /// Sign must agree with the kind
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.amount == Decimal::ZERO {
            return Err("transaction amount cannot be zero");
        }
        if self.kind.is_debit() != self.amount.is_sign_negative() {
            return Err("transaction amount sign does not match its kind");
        }
        Ok(())
    }
}
