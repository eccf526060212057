/*!
 * Translation metadata: field mappings, locale holder and relation descriptors.
 *
 * Metadata is built by the host (usually from its own mapping layer) and is
 * read-only once handed to a translation context.
 */

use std::collections::{BTreeMap, HashSet};

use crate::errors::MappingError;

/// Ordered, bijective mapping from translatable property to translation field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pairs: Vec<(String, String)>,
}

impl FieldMapping {
    /// Build a mapping, rejecting duplicate names on either side
    pub fn new<I, P, F>(pairs: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (P, F)>,
        P: Into<String>,
        F: Into<String>,
    {
        let mut sources = HashSet::new();
        let mut targets = HashSet::new();
        let mut collected = Vec::new();

        for (property, field) in pairs {
            let property = property.into();
            let field = field.into();

            if property.is_empty() || field.is_empty() {
                return Err(MappingError::EmptyFieldName);
            }
            if !sources.insert(property.clone()) {
                return Err(MappingError::DuplicateSource(property));
            }
            if !targets.insert(field.clone()) {
                return Err(MappingError::DuplicateTarget(field));
            }
            collected.push((property, field));
        }

        Ok(Self { pairs: collected })
    }

    /// `(property, translation field)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(property, field)| (property.as_str(), field.as_str()))
    }

    /// `(translation field, property)` pairs in declaration order
    pub fn flipped(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(property, field)| (field.as_str(), property.as_str()))
    }
}

/// Association between a translatable class and its translation class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationMetadata {
    /// Name of the translations association on the translatable entity
    association_name: String,

    /// Mapped translatable properties
    properties: FieldMapping,
}

impl AssociationMetadata {
    pub fn new(association_name: impl Into<String>, properties: FieldMapping) -> Self {
        Self {
            association_name: association_name.into(),
            properties,
        }
    }

    pub fn association_name(&self) -> &str {
        &self.association_name
    }

    pub fn properties(&self) -> &FieldMapping {
        &self.properties
    }
}

/// Translatable class metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatableMetadata {
    /// Property holding the entity's active locale
    pub locale_property: String,
}

impl TranslatableMetadata {
    pub fn new(locale_property: impl Into<String>) -> Self {
        Self {
            locale_property: locale_property.into(),
        }
    }
}

/// Cardinality of the inverse side of a collection-valued association.
///
/// `inverse` names the back-reference field on the related entity; `None`
/// means the relation is one-sided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    /// Related entities point back with a single reference (one-to-many)
    ToOne { inverse: Option<String> },
    /// Related entities hold a collection of translations (many-to-many)
    ToMany { inverse: Option<String> },
}

impl Relation {
    pub fn one_to_many(inverse: impl Into<String>) -> Self {
        Relation::ToOne {
            inverse: Some(inverse.into()),
        }
    }

    pub fn many_to_many(inverse: impl Into<String>) -> Self {
        Relation::ToMany {
            inverse: Some(inverse.into()),
        }
    }

    pub fn unidirectional_many_to_many() -> Self {
        Relation::ToMany { inverse: None }
    }

    pub fn inverse_field(&self) -> Option<&str> {
        match self {
            Relation::ToOne { inverse } | Relation::ToMany { inverse } => inverse.as_deref(),
        }
    }
}

/// Kind of a translation-record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Scalar value or single reference
    Scalar,
    /// Collection-valued association
    Collection(Relation),
}

/// Translation class metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationMetadata {
    /// Translation class name
    class: String,

    /// Known fields and their kinds
    fields: BTreeMap<String, FieldKind>,
}

impl TranslationMetadata {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Declare a scalar (or single reference) field
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into(), FieldKind::Scalar);
        self
    }

    /// Declare a collection-valued association field
    pub fn with_collection(mut self, field: impl Into<String>, relation: Relation) -> Self {
        self.fields.insert(field.into(), FieldKind::Collection(relation));
        self
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_collection_valued_association(&self, field: &str) -> bool {
        matches!(self.fields.get(field), Some(FieldKind::Collection(_)))
    }

    /// Relation descriptor of a collection-valued field
    pub fn association(&self, field: &str) -> Option<&Relation> {
        match self.fields.get(field) {
            Some(FieldKind::Collection(relation)) => Some(relation),
            _ => None,
        }
    }
}
