//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod bank;
pub mod logging;

pub use bank::{AccountSummary, BankService, Listing, Receipt, Statement, TransferReceipt};
pub use logging::{CommandStats, LogEntry, LogEvent, LogFilter, LoggingService};
