/*!
 * Generic property access for entities.
 *
 * This module provides:
 * - `Value` and `Collection`, the dynamically typed property values
 * - `Entity`, `Reflect` and `EntityRef`, the entity model
 * - `PropertyAccessor`, named get/set that bypasses field visibility
 */

pub mod accessor;
pub mod entity;
pub mod value;

// Re-export main types
pub use accessor::PropertyAccessor;
pub use entity::{Entity, EntityRef, PropertyTable, PropertyTableBuilder, Reflect};
pub use value::{Collection, KindMismatch, Value};
