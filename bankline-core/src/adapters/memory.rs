//! In-memory repository, used when no data file is configured

use std::cell::RefCell;
use std::path::Path;

use crate::domain::result::Result;
use crate::domain::BankState;
use crate::ports::Repository;

/// Keeps the last saved snapshot in memory; nothing outlives the process
#[derive(Default)]
pub struct MemoryRepository {
    saved: RefCell<Option<BankState>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for MemoryRepository {
    fn load(&self) -> Result<BankState> {
        Ok(self.saved.borrow().clone().unwrap_or_default())
    }

    fn save(&self, state: &BankState) -> Result<()> {
        *self.saved.borrow_mut() = Some(state.clone());
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        None
    }
}
