/*!
 * Session module for in-memory persistence.
 *
 * This module provides:
 * - An `ObjectManager` that keeps its unit of work in memory
 * - Entity lifecycle states and flush reports
 */

pub mod manager;
pub mod models;

// Re-export main types
pub use manager::InMemoryObjectManager;
pub use models::{EntityState, FlushReport};
