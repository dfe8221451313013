//! redb table definitions for embedded mode.

use redb::TableDefinition;

/// Canonical paste rows keyed by hyphenated id (`Paste`, bincode-encoded).
pub const PASTES: TableDefinition<&str, &[u8]> = TableDefinition::new("pastes");
