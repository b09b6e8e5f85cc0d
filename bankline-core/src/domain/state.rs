//! Whole-bank state, the unit of persistence

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::result::{Error, Result};
use super::{Account, User};

/// Every user and account held by the bank, plus the account number counter
///
/// Users and accounts keep insertion order, which is also listing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankState {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Older files may omit this; `normalize` derives it
    #[serde(default)]
    pub next_account_number: u32,
}

impl Default for BankState {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            accounts: Vec::new(),
            next_account_number: 1,
        }
    }
}

impl BankState {
    pub fn user(&self, tax_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.tax_id == tax_id)
    }

    pub fn account(&self, number: u32) -> Option<&Account> {
        self.accounts.iter().find(|a| a.number == number)
    }

    pub fn account_mut(&mut self, number: u32) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.number == number)
    }

    pub(crate) fn account_index(&self, number: u32) -> Option<usize> {
        self.accounts.iter().position(|a| a.number == number)
    }

    /// Hand out the next account number
    pub(crate) fn allocate_account_number(&mut self) -> Result<u32> {
        let number = self.next_account_number;
        self.next_account_number = number
            .checked_add(1)
            .ok_or_else(|| Error::validation("no account numbers are left"))?;
        Ok(number)
    }

    /// Raise the counter above every existing account number
    pub fn normalize(&mut self) -> Result<()> {
        let highest = self.accounts.iter().map(|a| a.number).max().unwrap_or(0);
        let floor = highest.checked_add(1).ok_or_else(|| {
            Error::storage(format!("account number {} leaves no room for new accounts", highest))
        })?;
        if self.next_account_number < floor {
            self.next_account_number = floor;
        }
        Ok(())
    }

    /// Check a loaded state for consistency
    pub fn validate(&self) -> Result<()> {
        let mut tax_ids = HashSet::new();
        for user in &self.users {
            User::normalize_tax_id(&user.tax_id)
                .map_err(|_| Error::storage(format!("malformed tax ID: {}", user.tax_id)))?;
            if !tax_ids.insert(user.tax_id.as_str()) {
                return Err(Error::storage(format!("duplicate tax ID: {}", user.tax_id)));
            }
        }

        let mut numbers = HashSet::new();
        for account in &self.accounts {
            account.validate()?;
            if !numbers.insert(account.number) {
                return Err(Error::storage(format!("duplicate account number: {}", account.number)));
            }
            if !tax_ids.contains(account.owner_tax_id.as_str()) {
                return Err(Error::storage(format!(
                    "account {} belongs to an unknown user",
                    account.number
                )));
            }
        }

        Ok(())
    }
}
