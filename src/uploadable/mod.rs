/*!
 * Uploadable behavior.
 *
 * This module provides the key-generation strategy for files attached to
 * entities. Storage backends are left to the host.
 */

pub mod keymaker;

// Re-export main types
pub use keymaker::{EntityKeymaker, Keymaker, DEFAULT_MAX_LENGTH, DEFAULT_PATTERN};
