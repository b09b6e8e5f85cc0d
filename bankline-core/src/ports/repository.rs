//! Repository port - state persistence abstraction

use std::path::Path;

use crate::domain::result::Result;
use crate::domain::BankState;

/// Whole-state persistence
///
/// The bank is loaded once at startup and saved once at exit; there is no
/// incremental storage. Implementations (adapters) decide where it lives.
pub trait Repository {
    /// Load the saved state, or an empty one if nothing was saved yet
    fn load(&self) -> Result<BankState>;

    /// Replace the saved state
    fn save(&self, state: &BankState) -> Result<()>;

    /// Where the state is persisted, if anywhere outside the process
    fn location(&self) -> Option<&Path>;
}
