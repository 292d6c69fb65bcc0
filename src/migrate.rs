//! Hooks into the migration engine's bookkeeping.
//!
//! The engine records applied migrations in a tracking table. Its location is
//! the only engine state configured from an environment.

pub const DEFAULT_TRACKING_TABLE: &str = "gorp_migrations";

/// Receiver for the tracking location of applied migrations.
pub trait MigrationTracker {
    fn set_table(&mut self, name: &str);
    fn set_schema(&mut self, name: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingTable {
    table: String,
    schema: Option<String>,
}

impl Default for TrackingTable {
    fn default() -> Self {
        Self {
            table: DEFAULT_TRACKING_TABLE.to_string(),
            schema: None,
        }
    }
}

impl TrackingTable {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }
}

impl MigrationTracker for TrackingTable {
    fn set_table(&mut self, name: &str) {
        self.table = name.to_string();
    }

    fn set_schema(&mut self, name: &str) {
        self.schema = Some(name.to_string());
    }
}
