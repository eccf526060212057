/*!
 * Unit-of-work models.
 *
 * These structures describe where an entity stands in the in-memory session
 * and what a flush did.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an entity in the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityState {
    /// Persisted in this unit of work, not flushed yet
    New,
    /// Tracked and in sync with storage as of the last flush
    Managed,
    /// Scheduled for deletion on the next flush
    Removed,
    /// Not known to the session
    Detached,
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityState::New => write!(f, "new"),
            EntityState::Managed => write!(f, "managed"),
            EntityState::Removed => write!(f, "removed"),
            EntityState::Detached => write!(f, "detached"),
        }
    }
}

impl std::str::FromStr for EntityState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(EntityState::New),
            "managed" => Ok(EntityState::Managed),
            "removed" => Ok(EntityState::Removed),
            "detached" => Ok(EntityState::Detached),
            _ => Err(anyhow::anyhow!("Invalid entity state: {}", s)),
        }
    }
}

/// Summary of one flush
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushReport {
    /// Records inserted
    pub inserted: usize,
    /// Records deleted
    pub removed: usize,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.removed == 0
    }
}

impl fmt::Display for FlushReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} inserted, {} removed", self.inserted, self.removed)
    }
}
