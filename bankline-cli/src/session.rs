//! The interactive banking menu
//!
//! One `Session` runs the loop: print the menu, read a choice, run one
//! operation, report the outcome, repeat. Operation failures are printed and
//! the loop goes on; only exit, end of input or a broken terminal stop it.

use std::io::Write;

use anyhow::Result;
use chrono::Local;
use colored::Colorize;

use bankline_core::domain::money::parse_amount;
use bankline_core::services::Statement;
use bankline_core::{BanklineContext, Error, LogEvent, LoggingService, User};

use crate::output::{self, create_table, format_currency};
use crate::prompt::{InputClosed, Prompt};

/// Menu entries, numbered as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    RegisterUser,
    CreateAccount,
    Deposit,
    Withdraw,
    Transfer,
    Statement,
    List,
    Exit,
}

impl MenuChoice {
    const ALL: [MenuChoice; 8] = [
        MenuChoice::RegisterUser,
        MenuChoice::CreateAccount,
        MenuChoice::Deposit,
        MenuChoice::Withdraw,
        MenuChoice::Transfer,
        MenuChoice::Statement,
        MenuChoice::List,
        MenuChoice::Exit,
    ];

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::RegisterUser),
            "2" => Some(MenuChoice::CreateAccount),
            "3" => Some(MenuChoice::Deposit),
            "4" => Some(MenuChoice::Withdraw),
            "5" => Some(MenuChoice::Transfer),
            "6" => Some(MenuChoice::Statement),
            "7" => Some(MenuChoice::List),
            "0" => Some(MenuChoice::Exit),
            _ => None,
        }
    }

    fn key(&self) -> u8 {
        match self {
            MenuChoice::RegisterUser => 1,
            MenuChoice::CreateAccount => 2,
            MenuChoice::Deposit => 3,
            MenuChoice::Withdraw => 4,
            MenuChoice::Transfer => 5,
            MenuChoice::Statement => 6,
            MenuChoice::List => 7,
            MenuChoice::Exit => 0,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            MenuChoice::RegisterUser => "Register user",
            MenuChoice::CreateAccount => "Create account",
            MenuChoice::Deposit => "Deposit",
            MenuChoice::Withdraw => "Withdraw",
            MenuChoice::Transfer => "Transfer",
            MenuChoice::Statement => "Statement",
            MenuChoice::List => "List users/accounts",
            MenuChoice::Exit => "Exit",
        }
    }

    /// Commands that can appear in the event log; exiting is not one of them
    pub fn logged_commands() -> impl Iterator<Item = &'static str> {
        Self::ALL
            .into_iter()
            .filter(|choice| *choice != MenuChoice::Exit)
            .map(|choice| choice.command())
    }

    /// Command name used in the event log
    pub fn command(&self) -> &'static str {
        match self {
            MenuChoice::RegisterUser => "register_user",
            MenuChoice::CreateAccount => "create_account",
            MenuChoice::Deposit => "deposit",
            MenuChoice::Withdraw => "withdraw",
            MenuChoice::Transfer => "transfer",
            MenuChoice::Statement => "statement",
            MenuChoice::List => "list",
            MenuChoice::Exit => "exit",
        }
    }
}

fn parse_account_number(input: &str) -> Result<u32, Error> {
    match input.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::validation("account number must be a positive integer")),
    }
}

pub struct Session<P, W> {
    ctx: BanklineContext,
    prompt: P,
    out: W,
    logger: Option<LoggingService>,
}

impl<P: Prompt, W: Write> Session<P, W> {
    pub fn new(ctx: BanklineContext, prompt: P, out: W, logger: Option<LoggingService>) -> Self {
        Self {
            ctx,
            prompt,
            out,
            logger,
        }
    }

    /// Run until the user exits or input ends; the state is saved either way
    pub fn run(&mut self) -> Result<()> {
        self.log(LogEvent::new("session_started"));

        loop {
            self.print_menu()?;
            let choice = match self.prompt.text("Choose") {
                Ok(choice) => choice,
                Err(e) if e.is::<InputClosed>() => break,
                Err(e) => return self.abort(e),
            };

            let Some(choice) = MenuChoice::parse(&choice) else {
                output::error(&mut self.out, "Invalid option.")?;
                continue;
            };
            if choice == MenuChoice::Exit {
                break;
            }

            match self.dispatch(choice) {
                Ok(()) => self.log(
                    LogEvent::new(format!("{}_completed", choice.command())).with_command(choice.command()),
                ),
                Err(e) if e.is::<InputClosed>() => break,
                Err(e) => match e.downcast_ref::<Error>() {
                    Some(bank_error) => {
                        output::error(&mut self.out, &format!("Error: {}", bank_error))?;
                        self.log(
                            LogEvent::new(format!("{}_rejected", choice.command()))
                                .with_command(choice.command())
                                .with_error(bank_error.category()),
                        );
                    }
                    None => return self.abort(e),
                },
            }
        }

        self.exit()
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", "=== Bankline ===".bold())?;
        for choice in MenuChoice::ALL {
            writeln!(self.out, "[{}] {}", choice.key(), choice.title())?;
        }
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        match choice {
            MenuChoice::RegisterUser => self.register_user(),
            MenuChoice::CreateAccount => self.create_account(),
            MenuChoice::Deposit => self.deposit(),
            MenuChoice::Withdraw => self.withdraw(),
            MenuChoice::Transfer => self.transfer(),
            MenuChoice::Statement => self.statement(),
            MenuChoice::List => self.list(),
            MenuChoice::Exit => Ok(()),
        }
    }

    fn register_user(&mut self) -> Result<()> {
        let tax_id = self.prompt.text("Tax ID (digits only)")?;
        let name = self.prompt.text("Name")?;
        let birth_date = self.prompt.text("Birth date (DD/MM/YYYY)")?;
        let address = self.prompt.text("Address (street, number - district - city/state)")?;

        let user = User::parse(&tax_id, &name, &birth_date, &address)?;
        let user = self.ctx.bank_service.register_user(user)?;
        let msg = format!("User registered: {} (tax ID {})", user.name, user.tax_id);
        output::success(&mut self.out, &msg)?;
        Ok(())
    }

    fn create_account(&mut self) -> Result<()> {
        let tax_id = self.prompt.text("Owner tax ID")?;
        let pin = self.prompt.secret("Choose a 4-digit PIN")?;

        let account = self.ctx.bank_service.create_account(&tax_id, &pin)?;
        output::success(
            &mut self.out,
            &format!(
                "Account created: Branch {} | Number {} | Owner tax ID {}",
                account.branch, account.number, account.owner_tax_id
            ),
        )?;
        Ok(())
    }

    /// Ask for account number and PIN, and check them before anything else
    fn login(&mut self, label: &str) -> Result<(u32, String)> {
        let number = parse_account_number(&self.prompt.text(label)?)?;
        let pin = self.prompt.secret("PIN")?;
        self.ctx.bank_service.authenticate(number, &pin)?;
        Ok((number, pin))
    }

    fn deposit(&mut self) -> Result<()> {
        let (number, pin) = self.login("Account number")?;
        let amount = parse_amount(&self.prompt.text("Deposit amount (R$)")?)?;

        let receipt = self.ctx.bank_service.deposit(number, &pin, amount)?;
        output::success(
            &mut self.out,
            &format!("Deposit completed. Current balance: {}", format_currency(receipt.balance)),
        )?;
        Ok(())
    }

    fn withdraw(&mut self) -> Result<()> {
        let (number, pin) = self.login("Account number")?;
        let amount = parse_amount(&self.prompt.text("Withdrawal amount (R$)")?)?;

        let receipt = self.ctx.bank_service.withdraw(number, &pin, amount)?;
        output::success(
            &mut self.out,
            &format!("Withdrawal completed. Current balance: {}", format_currency(receipt.balance)),
        )?;
        Ok(())
    }

    fn transfer(&mut self) -> Result<()> {
        let (source, pin) = self.login("Source account number")?;
        let destination = parse_account_number(&self.prompt.text("Destination account number")?)?;
        if self.ctx.bank_service.state().account(destination).is_none() {
            return Err(Error::not_found(format!("destination account {} does not exist", destination)).into());
        }
        let amount = parse_amount(&self.prompt.text("Transfer amount (R$)")?)?;

        let receipt = self.ctx.bank_service.transfer(source, &pin, destination, amount)?;
        output::success(
            &mut self.out,
            &format!(
                "Transfer completed. Source balance: {} | Destination balance: {}",
                format_currency(receipt.source_balance),
                format_currency(receipt.destination_balance)
            ),
        )?;
        Ok(())
    }

    fn statement(&mut self) -> Result<()> {
        let (number, pin) = self.login("Account number")?;
        let statement = self.ctx.bank_service.statement(number, &pin)?;
        self.print_statement(&statement)
    }

    fn print_statement(&mut self, statement: &Statement) -> Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{}",
            format!("--- Statement: Branch {} | Account {} ---", statement.branch, statement.account_number).bold()
        )?;

        if statement.transactions.is_empty() {
            writeln!(self.out, "No transactions.")?;
        } else {
            let mut table = create_table();
            table.set_header(vec!["Date", "Type", "Amount"]);
            for tx in &statement.transactions {
                table.add_row(vec![
                    tx.timestamp.with_timezone(&Local).format("%d/%m/%Y %H:%M:%S").to_string(),
                    tx.kind.label().to_string(),
                    format_currency(tx.amount),
                ]);
            }
            writeln!(self.out, "{}", table)?;
        }

        writeln!(self.out, "Current balance: {}", format_currency(statement.balance))?;
        Ok(())
    }

    fn list(&mut self) -> Result<()> {
        let listing = self.ctx.bank_service.list();

        writeln!(self.out)?;
        writeln!(self.out, "{}", "--- Users ---".bold())?;
        if listing.users.is_empty() {
            writeln!(self.out, "No users registered.")?;
        } else {
            let mut table = create_table();
            table.set_header(vec!["Name", "Tax ID", "Birth date", "Address"]);
            for user in &listing.users {
                table.add_row(vec![
                    user.name.clone(),
                    user.tax_id.clone(),
                    user.birth_date_display(),
                    user.address.clone(),
                ]);
            }
            writeln!(self.out, "{}", table)?;
        }

        writeln!(self.out)?;
        writeln!(self.out, "{}", "--- Accounts ---".bold())?;
        if listing.accounts.is_empty() {
            writeln!(self.out, "No accounts opened.")?;
        } else {
            let mut table = create_table();
            table.set_header(vec!["Branch", "Number", "Owner tax ID", "Balance"]);
            for account in &listing.accounts {
                table.add_row(vec![
                    account.branch.clone(),
                    account.number.to_string(),
                    account.owner_tax_id.clone(),
                    format_currency(account.balance),
                ]);
            }
            writeln!(self.out, "{}", table)?;
        }
        Ok(())
    }

    fn exit(&mut self) -> Result<()> {
        match self.ctx.save() {
            Ok(Some(path)) => {
                let msg = format!("Data saved to: {}", path.display());
                output::info(&mut self.out, &msg)?;
            }
            Ok(None) => {}
            Err(e) => {
                self.log(LogEvent::new("save_failed").with_error(e.category()));
                output::error(&mut self.out, &format!("Could not save data: {}", e))?;
                return Err(e.into());
            }
        }
        self.log(LogEvent::new("session_ended"));
        writeln!(self.out, "Goodbye!")?;
        Ok(())
    }

    /// The terminal failed mid-session: keep the data, then report the failure
    fn abort(&mut self, err: anyhow::Error) -> Result<()> {
        self.log(LogEvent::new("session_aborted"));
        if let Some(path) = self.ctx.save()? {
            let msg = format!("Data saved to: {}", path.display());
            output::info(&mut self.out, &msg)?;
        }
        Err(err)
    }

    /// Logging must never break the session
    fn log(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            let _ = logger.log(event);
        }
    }
}
