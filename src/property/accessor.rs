use log::trace;

use crate::errors::AccessError;
use super::entity::EntityRef;
use super::value::Value;

/// Uniform read/write access to named entity properties.
///
/// Each call takes the entity lock only for the duration of the access, so
/// callers never hold two entity locks at once.
#[derive(Debug, Default, Clone, Copy)]
pub struct PropertyAccessor;

impl PropertyAccessor {
    pub fn new() -> Self {
        Self
    }

    /// Read a property value
    pub fn get_property_value(&self, entity: &EntityRef, property: &str) -> Result<Value, AccessError> {
        entity.read().read_property(property)
    }

    /// Write a property value
    pub fn set_property_value(
        &self,
        entity: &EntityRef,
        property: &str,
        value: Value,
    ) -> Result<(), AccessError> {
        trace!("Setting {:?}.{} to {}", entity, property, value.kind_name());
        entity.write().write_property(property, value)
    }

    pub fn has_property(&self, entity: &EntityRef, property: &str) -> bool {
        entity.read().has_property(property)
    }
}
