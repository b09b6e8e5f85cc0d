//! Account domain model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::{ensure_positive, withdrawal_limit, BRANCH_CODE, MAX_WITHDRAWALS};
use super::result::{Error, Result};
use super::transaction::{Transaction, TransactionKind};

/// A bank account owned by a registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub number: u32,
    pub branch: String,
    pub pin: String,
    pub balance: Decimal,
    pub owner_tax_id: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Withdrawals performed since the process started; never persisted
    #[serde(skip)]
    pub withdrawals_this_session: u32,
}

impl Account {
    /// Open an account with a zero balance
    pub fn open(number: u32, owner_tax_id: impl Into<String>, pin: &str) -> Result<Self> {
        Self::validate_pin(pin)?;
        Ok(Self {
            number,
            branch: BRANCH_CODE.to_string(),
            pin: pin.to_string(),
            balance: Decimal::new(0, 2),
            owner_tax_id: owner_tax_id.into(),
            transactions: Vec::new(),
            withdrawals_this_session: 0,
        })
    }

    /// A PIN is exactly 4 ASCII digits
    pub fn validate_pin(pin: &str) -> Result<()> {
        if pin.len() != 4 || !pin.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::validation("PIN must contain exactly 4 digits"));
        }
        Ok(())
    }

    pub fn pin_matches(&self, pin: &str) -> bool {
        self.pin == pin
    }

    pub fn deposit(&mut self, amount: Decimal, at: DateTime<Utc>) -> Result<&Transaction> {
        ensure_positive(amount)?;
        self.record(TransactionKind::Deposit, amount, at)
    }

    /// Checks run in order: ceiling, session count, balance
    pub fn withdraw(&mut self, amount: Decimal, at: DateTime<Utc>) -> Result<&Transaction> {
        ensure_positive(amount)?;
        let limit = withdrawal_limit();
        if amount > limit {
            return Err(Error::WithdrawalLimitExceeded { limit });
        }
        if self.withdrawals_this_session >= MAX_WITHDRAWALS {
            return Err(Error::WithdrawalCountExceeded { max: MAX_WITHDRAWALS });
        }
        self.ensure_funds(amount)?;

        self.withdrawals_this_session += 1;
        self.record(TransactionKind::Withdrawal, amount, at)
    }

    /// Fails without side effects when the balance cannot cover `amount`
    pub fn ensure_funds(&self, amount: Decimal) -> Result<()> {
        if amount > self.balance {
            return Err(Error::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            });
        }
        Ok(())
    }

    /// Fails without side effects when crediting `amount` would overflow the balance
    pub fn ensure_can_receive(&self, amount: Decimal) -> Result<()> {
        self.balance_after(amount).map(|_| ())
    }

    fn balance_after(&self, signed_amount: Decimal) -> Result<Decimal> {
        self.balance
            .checked_add(signed_amount)
            .ok_or_else(|| Error::validation("amount exceeds the largest balance an account can hold"))
    }

    /// Append a record and apply it to the balance. Callers validate first.
    ///
    /// The balance is left untouched when the new total cannot be represented.
    pub(crate) fn record(
        &mut self,
        kind: TransactionKind,
        amount: Decimal,
        at: DateTime<Utc>,
    ) -> Result<&Transaction> {
        let tx = Transaction::new(kind, amount, at);
        self.balance = self.balance_after(tx.amount)?;
        self.transactions.push(tx);
        Ok(&self.transactions[self.transactions.len() - 1])
    }

    /// Sum of the signed history; `None` if it overflows
    pub fn history_total(&self) -> Option<Decimal> {
        self.transactions
            .iter()
            .try_fold(Decimal::ZERO, |total, t| total.checked_add(t.amount))
    }

    /// Check a loaded account for internal consistency
    pub fn validate(&self) -> Result<()> {
        Self::validate_pin(&self.pin)
            .map_err(|_| Error::storage(format!("account {} has a malformed PIN", self.number)))?;
        if self.number == 0 {
            return Err(Error::storage("account number 0 is not allowed"));
        }
        for tx in &self.transactions {
            tx.validate().map_err(|e| {
                Error::storage(format!("account {}: {}", self.number, e))
            })?;
        }
        if self.balance < Decimal::ZERO {
            return Err(Error::storage(format!("account {} has a negative balance", self.number)));
        }
        if self.history_total() != Some(self.balance) {
            return Err(Error::storage(format!(
                "account {} balance does not match its transaction history",
                self.number
            )));
        }
        Ok(())
    }
}
