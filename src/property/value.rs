/*!
 * Dynamically typed property values and shared collections.
 *
 * A `Value` is what the property accessor hands out and accepts. Scalars
 * compare structurally; entities and collections compare by instance, the
 * same way an identity map would.
 */

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::errors::InputError;
use super::entity::EntityRef;

/// Raised by value conversions when a value has the wrong kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindMismatch {
    /// Kind the conversion expected
    pub expected: &'static str,
    /// Kind that was supplied
    pub found: &'static str,
}

/// A property value read from or written to an entity
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text
    Text(String),
    /// Reference to another entity
    Entity(EntityRef),
    /// Shared mutable collection
    Collection(Collection),
    /// Plain ordered sequence, not shared with anything
    List(Vec<Value>),
}

impl Value {
    /// Human readable name of the value kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Entity(_) => "entity",
            Value::Collection(_) => "collection",
            Value::List(_) => "list",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityRef> {
        match self {
            Value::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Value::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Number of elements for collections and lists, `None` for anything else
    pub fn cardinality(&self) -> Option<usize> {
        match self {
            Value::Collection(collection) => Some(collection.len()),
            Value::List(values) => Some(values.len()),
            _ => None,
        }
    }

    fn mismatch(&self, expected: &'static str) -> KindMismatch {
        KindMismatch {
            expected,
            found: self.kind_name(),
        }
    }

    pub fn into_opt_text(self) -> Result<Option<String>, KindMismatch> {
        match self {
            Value::Null => Ok(None),
            Value::Text(text) => Ok(Some(text)),
            other => Err(other.mismatch("text")),
        }
    }

    pub fn into_opt_int(self) -> Result<Option<i64>, KindMismatch> {
        match self {
            Value::Null => Ok(None),
            Value::Int(value) => Ok(Some(value)),
            other => Err(other.mismatch("int")),
        }
    }

    pub fn into_opt_bool(self) -> Result<Option<bool>, KindMismatch> {
        match self {
            Value::Null => Ok(None),
            Value::Bool(value) => Ok(Some(value)),
            other => Err(other.mismatch("bool")),
        }
    }

    pub fn into_opt_float(self) -> Result<Option<f64>, KindMismatch> {
        match self {
            Value::Null => Ok(None),
            Value::Float(value) => Ok(Some(value)),
            Value::Int(value) => Ok(Some(value as f64)),
            other => Err(other.mismatch("float")),
        }
    }

    pub fn into_opt_entity(self) -> Result<Option<EntityRef>, KindMismatch> {
        match self {
            Value::Null => Ok(None),
            Value::Entity(entity) => Ok(Some(entity)),
            other => Err(other.mismatch("entity")),
        }
    }

    /// Convert into a collection handle for storing in a collection field.
    ///
    /// A `List` is wrapped in a new collection; a `Collection` is stored as is.
    pub fn into_collection(self) -> Result<Collection, KindMismatch> {
        match self {
            Value::Collection(collection) => Ok(collection),
            Value::List(values) => Ok(Collection::from_values(values)),
            other => Err(other.mismatch("collection")),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<EntityRef> for Value {
    fn from(value: EntityRef) -> Self {
        Value::Entity(value)
    }
}

impl From<Collection> for Value {
    fn from(value: Collection) -> Self {
        Value::Collection(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::List(values)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Shared, mutable, ordered collection of values.
///
/// Cloning a `Collection` clones the handle: both handles see the same
/// elements. Use [`Collection::copied`] to get an independent container.
#[derive(Clone, Default)]
pub struct Collection(Arc<Mutex<Vec<Value>>>);

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: Vec<Value>) -> Self {
        Self(Arc::new(Mutex::new(values)))
    }

    pub fn from_entities<I>(entities: I) -> Self
    where
        I: IntoIterator<Item = EntityRef>,
    {
        Self::from_values(entities.into_iter().map(Value::Entity).collect())
    }

    /// Accept a collection or a plain list, reject everything else.
    ///
    /// An existing collection is returned as the same instance.
    pub fn coerce(value: Value) -> Result<Self, InputError> {
        match value {
            Value::Collection(collection) => Ok(collection),
            Value::List(values) => Ok(Self::from_values(values)),
            other => Err(InputError::NotACollection {
                found: other.kind_name(),
            }),
        }
    }

    /// New collection instance holding the same elements
    pub fn copied(&self) -> Self {
        Self::from_values(self.to_vec())
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.lock().iter().any(|element| element == value)
    }

    pub fn contains_entity(&self, entity: &EntityRef) -> bool {
        self.0
            .lock()
            .iter()
            .any(|element| element.as_entity() == Some(entity))
    }

    /// Append a value, duplicates allowed
    pub fn add(&self, value: Value) {
        self.0.lock().push(value);
    }

    /// Append a value unless it is already present; returns whether it was added
    pub fn add_unique(&self, value: Value) -> bool {
        let mut elements = self.0.lock();
        if elements.iter().any(|element| *element == value) {
            return false;
        }
        elements.push(value);
        true
    }

    /// Remove the first occurrence of a value; returns whether one was found
    pub fn remove_element(&self, value: &Value) -> bool {
        let mut elements = self.0.lock();
        match elements.iter().position(|element| element == value) {
            Some(index) => {
                elements.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }

    /// Snapshot of the elements
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.lock().clone()
    }

    /// Snapshot of the entity elements, skipping anything that is not an entity
    pub fn entities(&self) -> Vec<EntityRef> {
        self.0
            .lock()
            .iter()
            .filter_map(|element| element.as_entity().cloned())
            .collect()
    }

    /// Whether both handles point at the same container
    pub fn same_instance(&self, other: &Collection) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Whether both collections hold equal elements in the same order
    pub fn same_contents(&self, other: &Collection) -> bool {
        if self.same_instance(other) {
            return true;
        }
        self.to_vec() == other.to_vec()
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_lock() {
            Some(elements) => f.debug_list().entries(elements.iter()).finish(),
            None => write!(f, "Collection(<locked>)"),
        }
    }
}

impl FromIterator<Value> for Collection {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_values(iter.into_iter().collect())
    }
}
