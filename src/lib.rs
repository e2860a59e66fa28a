//! Rename history for printer and filament presets.
//!
//! [`RenameHistoryStore`] keeps an append-only log of `old -> new` preset
//! renames in `user/rename_history.json` and resolves a stored name to the one
//! the preset carries now.

pub mod config;
pub mod error;
pub mod naming;
pub mod references;
pub mod resolver;
pub mod storage;
pub mod utils;

pub use error::HistoryError;
pub use resolver::Resolver;
pub use storage::LoadReport;
pub use storage::RenameHistoryStore;
pub use storage::data::ProfileType;
pub use storage::data::RenameRecord;
