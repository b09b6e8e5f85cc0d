//! Bank service - the banking operations behind the menu

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::money::ensure_positive;
use crate::domain::result::{Error, Result};
use crate::domain::{Account, BankState, Transaction, TransactionKind, User};

/// Bank service owning the in-memory state
pub struct BankService {
    state: BankState,
}

impl BankService {
    pub fn new(mut state: BankState) -> Result<Self> {
        state.normalize()?;
        Ok(Self { state })
    }

    pub fn state(&self) -> &BankState {
        &self.state
    }

    /// Register a new user; the tax ID must not be taken
    pub fn register_user(&mut self, user: User) -> Result<&User> {
        let tax_id = User::normalize_tax_id(&user.tax_id)?;
        if self.state.user(&tax_id).is_some() {
            return Err(Error::validation(format!("tax ID {} is already registered", tax_id)));
        }

        self.state.users.push(User { tax_id, ..user });
        Ok(&self.state.users[self.state.users.len() - 1])
    }

    /// Open an account with the next sequential number
    pub fn create_account(&mut self, owner_tax_id: &str, pin: &str) -> Result<AccountSummary> {
        let owner_tax_id = User::normalize_tax_id(owner_tax_id)?;
        if self.state.user(&owner_tax_id).is_none() {
            return Err(Error::not_found(format!(
                "no user with tax ID {}; register the user first",
                owner_tax_id
            )));
        }
        Account::validate_pin(pin)?;

        let number = self.state.allocate_account_number()?;
        let account = Account::open(number, owner_tax_id, pin)?;
        let summary = AccountSummary::from(&account);
        self.state.accounts.push(account);
        Ok(summary)
    }

    /// Look up an account and check its PIN
    ///
    /// Unknown numbers and wrong PINs return the same error.
    pub fn authenticate(&self, number: u32, pin: &str) -> Result<&Account> {
        match self.state.account(number) {
            Some(account) if account.pin_matches(pin) => Ok(account),
            _ => Err(Error::Authentication),
        }
    }

    pub fn deposit(&mut self, number: u32, pin: &str, amount: Decimal) -> Result<Receipt> {
        self.authenticate(number, pin)?;
        let account = self.account_mut(number)?;
        let transaction = account.deposit(amount, Utc::now())?.clone();
        Ok(Receipt {
            account_number: number,
            balance: account.balance,
            transaction,
        })
    }

    pub fn withdraw(&mut self, number: u32, pin: &str, amount: Decimal) -> Result<Receipt> {
        self.authenticate(number, pin)?;
        let account = self.account_mut(number)?;
        let transaction = account.withdraw(amount, Utc::now())?.clone();
        Ok(Receipt {
            account_number: number,
            balance: account.balance,
            transaction,
        })
    }

    /// Move money between two accounts
    ///
    /// Every check runs before either account is touched.
    pub fn transfer(
        &mut self,
        source: u32,
        pin: &str,
        destination: u32,
        amount: Decimal,
    ) -> Result<TransferReceipt> {
        self.authenticate(source, pin)?;
        let dest_idx = self
            .state
            .account_index(destination)
            .ok_or_else(|| Error::not_found(format!("destination account {} does not exist", destination)))?;
        if source == destination {
            return Err(Error::validation("source and destination accounts must differ"));
        }
        ensure_positive(amount)?;

        let src_idx = self.state.account_index(source).ok_or(Error::Authentication)?;
        self.state.accounts[src_idx].ensure_funds(amount)?;
        self.state.accounts[dest_idx].ensure_can_receive(amount)?;

        let now = Utc::now();
        let source_account = &mut self.state.accounts[src_idx];
        let sent = source_account.record(TransactionKind::TransferOut, amount, now)?.clone();
        let source_balance = source_account.balance;

        let destination_account = &mut self.state.accounts[dest_idx];
        destination_account.record(TransactionKind::TransferIn, amount, now)?;
        let destination_balance = destination_account.balance;

        Ok(TransferReceipt {
            source,
            destination,
            amount,
            source_balance,
            destination_balance,
            transaction: sent,
        })
    }

    pub fn statement(&self, number: u32, pin: &str) -> Result<Statement> {
        let account = self.authenticate(number, pin)?;
        Ok(Statement {
            account_number: account.number,
            branch: account.branch.clone(),
            owner_tax_id: account.owner_tax_id.clone(),
            transactions: account.transactions.clone(),
            balance: account.balance,
        })
    }

    /// All users and all accounts, in registration order
    pub fn list(&self) -> Listing {
        Listing {
            users: self.state.users.clone(),
            accounts: self.state.accounts.iter().map(AccountSummary::from).collect(),
        }
    }

    fn account_mut(&mut self, number: u32) -> Result<&mut Account> {
        self.state.account_mut(number).ok_or(Error::Authentication)
    }
}

/// Outcome of a deposit or withdrawal
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub account_number: u32,
    pub balance: Decimal,
    pub transaction: Transaction,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    pub source: u32,
    pub destination: u32,
    pub amount: Decimal,
    pub source_balance: Decimal,
    pub destination_balance: Decimal,
    /// The record appended to the source account
    pub transaction: Transaction,
}

#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub account_number: u32,
    pub branch: String,
    pub owner_tax_id: String,
    pub transactions: Vec<Transaction>,
    pub balance: Decimal,
}

/// Public view of an account (no PIN, no history)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    pub number: u32,
    pub branch: String,
    pub owner_tax_id: String,
    pub balance: Decimal,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            number: account.number,
            branch: account.branch.clone(),
            owner_tax_id: account.owner_tax_id.clone(),
            balance: account.balance,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub users: Vec<User>,
    pub accounts: Vec<AccountSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANA: &str = "12345678901";
    const BRUNO: &str = "98765432100";

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn service_with_accounts() -> BankService {
        let mut service = BankService::new(BankState::default()).unwrap();
        service
            .register_user(User::parse(ANA, "Ana", "17/05/1990", "Rua A, 10").unwrap())
            .unwrap();
        service
            .register_user(User::parse(BRUNO, "Bruno", "02/03/1985", "Rua B, 20").unwrap())
            .unwrap();
        service.create_account(ANA, "1234").unwrap();
        service.create_account(BRUNO, "4321").unwrap();
        service
    }

    #[test]
    fn test_register_rejects_duplicate_tax_id() {
        let mut service = service_with_accounts();
        let dup = User::parse("123.456.789-01", "Other", "01/01/2000", "Rua C").unwrap();
        assert!(matches!(service.register_user(dup), Err(Error::Validation(_))));
        assert_eq!(service.state().users.len(), 2);
    }

    #[test]
    fn test_create_account_numbers_are_sequential() {
        let mut service = service_with_accounts();
        let third = service.create_account(ANA, "0000").unwrap();
        assert_eq!(third.number, 3);
        assert_eq!(third.branch, "0001");
        assert_eq!(third.balance, Decimal::ZERO);
    }

    #[test]
    fn test_create_account_requires_known_user_and_valid_pin() {
        let mut service = service_with_accounts();
        assert!(matches!(service.create_account("11111111111", "1234"), Err(Error::NotFound(_))));
        assert!(matches!(service.create_account(ANA, "12"), Err(Error::Validation(_))));
        // Failed attempts do not consume account numbers
        assert_eq!(service.create_account(ANA, "1111").unwrap().number, 3);
    }

    #[test]
    fn test_worked_example() {
        let mut service = service_with_accounts();

        let receipt = service.deposit(1, "1234", dec(50000)).unwrap();
        assert_eq!(receipt.balance, dec(50000));
        assert_eq!(receipt.transaction.kind, TransactionKind::Deposit);

        let receipt = service.withdraw(1, "1234", dec(10000)).unwrap();
        assert_eq!(receipt.balance, dec(40000));

        let receipt = service.transfer(1, "1234", 2, dec(15000)).unwrap();
        assert_eq!(receipt.source_balance, dec(25000));
        assert_eq!(receipt.destination_balance, dec(15000));
        assert_eq!(receipt.transaction.amount, dec(-15000));

        let destination = service.statement(2, "4321").unwrap();
        assert_eq!(destination.transactions.len(), 1);
        assert_eq!(destination.transactions[0].kind, TransactionKind::TransferIn);
    }

    #[test]
    fn test_pin_mismatch_changes_nothing() {
        let mut service = service_with_accounts();
        service.deposit(1, "1234", dec(10000)).unwrap();
        let before = service.state().clone();

        assert!(matches!(service.deposit(1, "9999", dec(100)), Err(Error::Authentication)));
        assert!(matches!(service.withdraw(1, "9999", dec(100)), Err(Error::Authentication)));
        assert!(matches!(service.transfer(1, "9999", 2, dec(100)), Err(Error::Authentication)));
        assert!(matches!(service.statement(1, "9999"), Err(Error::Authentication)));
        assert!(matches!(service.deposit(42, "1234", dec(100)), Err(Error::Authentication)));

        assert_eq!(service.state(), &before);
    }

    #[test]
    fn test_fourth_withdrawal_rejected() {
        let mut service = service_with_accounts();
        service.deposit(1, "1234", dec(300000)).unwrap();
        for _ in 0..3 {
            service.withdraw(1, "1234", dec(100)).unwrap();
        }

        let err = service.withdraw(1, "1234", dec(1)).unwrap_err();
        assert!(matches!(err, Error::WithdrawalCountExceeded { .. }));
        assert_eq!(service.state().account(1).unwrap().balance, dec(299700));

        // The limit is per account
        service.deposit(2, "4321", dec(1000)).unwrap();
        assert!(service.withdraw(2, "4321", dec(100)).is_ok());
    }

    #[test]
    fn test_transfer_failures_are_atomic() {
        let mut service = service_with_accounts();
        service.deposit(1, "1234", dec(10000)).unwrap();
        let before = service.state().clone();

        assert!(matches!(service.transfer(1, "1234", 9, dec(100)), Err(Error::NotFound(_))));
        assert!(matches!(
            service.transfer(1, "1234", 2, dec(10001)),
            Err(Error::InsufficientFunds { .. })
        ));
        assert!(matches!(service.transfer(1, "1234", 1, dec(100)), Err(Error::Validation(_))));
        assert!(matches!(service.transfer(1, "1234", 2, dec(0)), Err(Error::Validation(_))));

        assert_eq!(service.state(), &before);
    }

    #[test]
    fn test_deposit_overflow_is_an_error() {
        let mut service = service_with_accounts();
        service.deposit(1, "1234", Decimal::MAX).unwrap();

        let err = service.deposit(1, "1234", dec(1)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(service.state().account(1).unwrap().balance, Decimal::MAX);
    }

    #[test]
    fn test_transfer_into_full_account_leaves_source_untouched() {
        let mut service = service_with_accounts();
        service.deposit(1, "1234", dec(10000)).unwrap();
        service.deposit(2, "4321", Decimal::MAX).unwrap();
        let before = service.state().clone();

        let err = service.transfer(1, "1234", 2, dec(100)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(service.state(), &before);
    }

    #[test]
    fn test_transfer_conserves_total() {
        let mut service = service_with_accounts();
        service.deposit(1, "1234", dec(70000)).unwrap();
        service.deposit(2, "4321", dec(3000)).unwrap();

        service.transfer(1, "1234", 2, dec(12345)).unwrap();

        let state = service.state();
        let total: Decimal = state.accounts.iter().map(|a| a.balance).sum();
        assert_eq!(total, dec(73000));
        for account in &state.accounts {
            assert_eq!(account.history_total(), Some(account.balance));
        }
    }

    #[test]
    fn test_transfer_does_not_count_as_withdrawal() {
        let mut service = service_with_accounts();
        service.deposit(1, "1234", dec(100000)).unwrap();
        for _ in 0..4 {
            service.transfer(1, "1234", 2, dec(100)).unwrap();
        }
        assert_eq!(service.state().account(1).unwrap().withdrawals_this_session, 0);
    }

    #[test]
    fn test_list_hides_pins() {
        let service = service_with_accounts();
        let listing = service.list();
        assert_eq!(listing.users.len(), 2);
        assert_eq!(listing.accounts.len(), 2);

        let json = serde_json::to_string(&listing).unwrap();
        assert!(!json.contains("\"pin\""));
    }
}
