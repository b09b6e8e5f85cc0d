//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - JSON flat file for the Repository port
//! - Process memory for the Repository port when nothing is persisted

pub mod json_file;
pub mod memory;
