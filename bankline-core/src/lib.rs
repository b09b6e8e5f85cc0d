//! Bankline Core - Business logic for the Bankline banking exercise
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (User, Account, Transaction, BankState)
//! - **ports**: Trait definitions for external dependencies (Repository)
//! - **services**: Banking operations and event logging
//! - **adapters**: Concrete implementations (JSON file, in-memory)

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod ports;
pub mod services;

use std::path::Path;

use adapters::json_file::JsonFileRepository;
use adapters::memory::MemoryRepository;
use config::Config;
use ports::Repository;
use services::BankService;

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{Account, BankState, Transaction, TransactionKind, User};
pub use services::{CommandStats, LogEntry, LogEvent, LogFilter, LoggingService};

/// Main context for Bankline operations
///
/// Owns the configuration, the persistence adapter and the bank state for one
/// interactive session.
pub struct BanklineContext {
    pub config: Config,
    pub bank_service: BankService,
    repository: Box<dyn Repository>,
}

impl BanklineContext {
    /// Create a context, loading the bank from the configured data file
    ///
    /// Fails if the data file is malformed or already in use.
    pub fn new(config: Config) -> Result<Self> {
        let repository: Box<dyn Repository> = match &config.data_file {
            Some(path) => Box::new(JsonFileRepository::open(path)?),
            None => Box::new(MemoryRepository::new()),
        };
        Self::with_repository(config, repository)
    }

    /// Create a context on top of an existing repository
    pub fn with_repository(config: Config, repository: Box<dyn Repository>) -> Result<Self> {
        let state = repository.load()?;
        Ok(Self {
            config,
            bank_service: BankService::new(state)?,
            repository,
        })
    }

    /// Persist the current state; returns where it was written, if anywhere
    pub fn save(&self) -> Result<Option<&Path>> {
        self.repository.save(self.bank_service.state())?;
        Ok(self.repository.location())
    }

    pub fn data_file(&self) -> Option<&Path> {
        self.repository.location()
    }
}
