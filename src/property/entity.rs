/*!
 * Entity handles and per-class property tables.
 *
 * Entity types describe their fields once, in a `PropertyTable` kept in a
 * `Lazy` static. The table holds a getter and a setter per field, so the
 * engine can read and write private state without the type exposing it.
 */

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::AccessError;
use super::value::{KindMismatch, Value};

/// Reads a field out of an entity
pub type Getter<T> = fn(&T) -> Value;

/// Stores a value into a field of an entity
pub type Setter<T> = fn(&mut T, Value) -> Result<(), KindMismatch>;

/// Accessor pair for a single field
struct PropertyEntry<T> {
    getter: Getter<T>,
    setter: Setter<T>,
}

/// Getter/setter lookup table for one entity class
pub struct PropertyTable<T> {
    /// Class name reported in errors
    class: &'static str,

    /// Accessors by property name
    entries: HashMap<&'static str, PropertyEntry<T>>,

    /// Property names in declaration order
    order: Vec<&'static str>,
}

impl<T> PropertyTable<T> {
    /// Start describing the properties of a class
    pub fn builder(class: &'static str) -> PropertyTableBuilder<T> {
        PropertyTableBuilder {
            table: PropertyTable {
                class,
                entries: HashMap::new(),
                order: Vec::new(),
            },
        }
    }

    pub fn class(&self) -> &'static str {
        self.class
    }

    pub fn has_property(&self, property: &str) -> bool {
        self.entries.contains_key(property)
    }

    /// Property names in declaration order
    pub fn property_names(&self) -> &[&'static str] {
        &self.order
    }

    pub fn get(&self, entity: &T, property: &str) -> Result<Value, AccessError> {
        let entry = self
            .entries
            .get(property)
            .ok_or_else(|| AccessError::unknown_property(self.class, property))?;
        Ok((entry.getter)(entity))
    }

    pub fn set(&self, entity: &mut T, property: &str, value: Value) -> Result<(), AccessError> {
        let entry = self
            .entries
            .get(property)
            .ok_or_else(|| AccessError::unknown_property(self.class, property))?;
        (entry.setter)(entity, value).map_err(|mismatch| AccessError::TypeMismatch {
            class: self.class.to_string(),
            property: property.to_string(),
            expected: mismatch.expected,
            found: mismatch.found,
        })
    }
}

/// Builder for [`PropertyTable`]
pub struct PropertyTableBuilder<T> {
    table: PropertyTable<T>,
}

impl<T> PropertyTableBuilder<T> {
    /// Register a field. Registering the same name twice replaces the accessors.
    pub fn field(mut self, name: &'static str, getter: Getter<T>, setter: Setter<T>) -> Self {
        if self
            .table
            .entries
            .insert(name, PropertyEntry { getter, setter })
            .is_none()
        {
            self.table.order.push(name);
        }
        self
    }

    pub fn build(self) -> PropertyTable<T> {
        self.table
    }
}

/// Entity type with a static property table
pub trait Entity: Sized + Send + Sync + 'static {
    /// Class name used in error messages and upload keys
    const CLASS: &'static str;

    /// The cached accessor table for this class
    fn properties() -> &'static PropertyTable<Self>;
}

/// Object-safe view of an entity used behind [`EntityRef`].
///
/// Implemented for every [`Entity`]; hosts with their own reflection can
/// implement it directly instead.
pub trait Reflect: Send + Sync + 'static {
    fn class_name(&self) -> &'static str;

    fn has_property(&self, property: &str) -> bool;

    fn read_property(&self, property: &str) -> Result<Value, AccessError>;

    fn write_property(&mut self, property: &str, value: Value) -> Result<(), AccessError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Entity> Reflect for T {
    fn class_name(&self) -> &'static str {
        T::CLASS
    }

    fn has_property(&self, property: &str) -> bool {
        T::properties().has_property(property)
    }

    fn read_property(&self, property: &str) -> Result<Value, AccessError> {
        T::properties().get(self, property)
    }

    fn write_property(&mut self, property: &str, value: Value) -> Result<(), AccessError> {
        T::properties().set(self, property, value)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Shared handle to an entity instance.
///
/// Equality and hashing follow instance identity, never field values.
#[derive(Clone)]
pub struct EntityRef(Arc<RwLock<dyn Reflect>>);

impl EntityRef {
    pub fn new<T: Reflect>(entity: T) -> Self {
        let inner: Arc<RwLock<dyn Reflect>> = Arc::new(RwLock::new(entity));
        Self(inner)
    }

    pub fn class_name(&self) -> &'static str {
        self.0.read().class_name()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, dyn Reflect> {
        self.0.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, dyn Reflect> {
        self.0.write()
    }

    /// Run `f` against the concrete entity, `None` when the type does not match
    pub fn with<T: 'static, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let guard = self.0.read();
        guard.as_any().downcast_ref::<T>().map(f)
    }

    /// Run `f` against the concrete entity mutably, `None` when the type does not match
    pub fn with_mut<T: 'static, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.0.write();
        guard.as_any_mut().downcast_mut::<T>().map(f)
    }

    pub fn ptr_eq(&self, other: &EntityRef) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }

    fn address(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for EntityRef {}

impl Hash for EntityRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_read() {
            Some(guard) => write!(f, "{}@{:#x}", guard.class_name(), self.address()),
            None => write!(f, "<locked>@{:#x}", self.address()),
        }
    }
}
