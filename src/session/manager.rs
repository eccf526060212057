/*!
 * In-memory object manager.
 *
 * This module handles:
 * - Tracking which records the session manages
 * - Scheduling insertions and deletions
 * - Flushing the schedules into a report
 */

use std::collections::HashSet;

use anyhow::Result;
use log::{debug, info};
use parking_lot::Mutex;

use crate::property::EntityRef;
use crate::translatable::ObjectManager;

use super::models::{EntityState, FlushReport};

/// Pending changes of the session
#[derive(Debug, Default)]
struct UnitOfWork {
    /// Records the session knows about
    managed: HashSet<EntityRef>,

    /// Records persisted since the last flush, in persist order
    insertions: Vec<EntityRef>,

    /// Records removed since the last flush, in remove order
    removals: Vec<EntityRef>,
}

/// Object manager keeping its unit of work in memory
#[derive(Debug, Default)]
pub struct InMemoryObjectManager {
    state: Mutex<UnitOfWork>,
}

impl InMemoryObjectManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a record that already exists in storage (e.g. a loaded one)
    pub fn register_loaded(&self, entity: &EntityRef) {
        self.state.lock().managed.insert(entity.clone());
    }

    pub fn state_of(&self, entity: &EntityRef) -> EntityState {
        let state = self.state.lock();
        if state.removals.contains(entity) {
            EntityState::Removed
        } else if state.insertions.contains(entity) {
            EntityState::New
        } else if state.managed.contains(entity) {
            EntityState::Managed
        } else {
            EntityState::Detached
        }
    }

    pub fn is_scheduled_for_insertion(&self, entity: &EntityRef) -> bool {
        self.state.lock().insertions.contains(entity)
    }

    pub fn is_scheduled_for_removal(&self, entity: &EntityRef) -> bool {
        self.state.lock().removals.contains(entity)
    }

    pub fn scheduled_insertions(&self) -> Vec<EntityRef> {
        self.state.lock().insertions.clone()
    }

    pub fn scheduled_removals(&self) -> Vec<EntityRef> {
        self.state.lock().removals.clone()
    }

    /// Apply the scheduled changes and clear the schedules
    pub fn flush(&self) -> FlushReport {
        let mut state = self.state.lock();
        let removals = std::mem::take(&mut state.removals);
        let insertions = std::mem::take(&mut state.insertions);

        for removed in &removals {
            state.managed.remove(removed);
        }

        let report = FlushReport {
            inserted: insertions.len(),
            removed: removals.len(),
        };
        if report.is_empty() {
            debug!("Flush with no pending changes");
        } else {
            info!("Flushed session: {}", report);
        }
        report
    }

    /// Forget every tracked record and pending change
    pub fn clear(&self) {
        *self.state.lock() = UnitOfWork::default();
        debug!("Session cleared");
    }
}

impl ObjectManager for InMemoryObjectManager {
    fn contains(&self, entity: &EntityRef) -> bool {
        let state = self.state.lock();
        state.managed.contains(entity) && !state.removals.contains(entity)
    }

    fn persist(&self, entity: &EntityRef) -> Result<()> {
        let mut state = self.state.lock();

        // persisting a removed record revives it
        if let Some(index) = state.removals.iter().position(|removed| removed == entity) {
            state.removals.remove(index);
            return Ok(());
        }

        if state.managed.insert(entity.clone()) {
            state.insertions.push(entity.clone());
        }
        Ok(())
    }

    fn remove(&self, entity: &EntityRef) -> Result<()> {
        let mut state = self.state.lock();

        // a record that was never flushed is simply forgotten
        if let Some(index) = state.insertions.iter().position(|inserted| inserted == entity) {
            state.insertions.remove(index);
            state.managed.remove(entity);
            return Ok(());
        }

        if state.managed.contains(entity) && !state.removals.contains(entity) {
            state.removals.push(entity.clone());
        }
        Ok(())
    }
}
