/*!
 * Error types for the ormext library.
 *
 * This module contains custom error types for the translatable and uploadable
 * behaviors, using the thiserror crate for ergonomic error definitions.
 * All of them describe programmer or configuration mistakes; none is transient.
 */

use thiserror::Error;

/// Errors raised when reading or writing a named property on an entity
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccessError {
    /// The property is not registered for the entity's class
    #[error("Property \"{property}\" does not exist on class \"{class}\"")]
    UnknownProperty {
        /// Class name of the target entity
        class: String,
        /// Requested property name
        property: String,
    },

    /// The value cannot be stored in the property
    #[error("Property \"{class}::{property}\" expects {expected}, got {found}")]
    TypeMismatch {
        /// Class name of the target entity
        class: String,
        /// Property name
        property: String,
        /// Expected value kind
        expected: &'static str,
        /// Kind of the value that was supplied
        found: &'static str,
    },
}

impl AccessError {
    pub fn unknown_property(class: &str, property: &str) -> Self {
        Self::UnknownProperty {
            class: class.to_string(),
            property: property.to_string(),
        }
    }
}

/// Errors raised for malformed input values handed to the engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// A collection was expected
    #[error("Expected a list or Collection, got \"{found}\" instead")]
    NotACollection {
        /// Kind of the value that was supplied
        found: &'static str,
    },

    /// A related entity was expected as collection element
    #[error("Expected an entity in association \"{field}\", got \"{found}\" instead")]
    NotAnEntity {
        /// Association field being reconciled
        field: String,
        /// Kind of the value that was supplied
        found: &'static str,
    },
}

/// Errors raised while building translation metadata
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    /// Two entries map from the same translatable property
    #[error("Translatable property \"{0}\" is mapped more than once")]
    DuplicateSource(String),

    /// Two entries map onto the same translation field
    #[error("Translation field \"{0}\" is the target of more than one property")]
    DuplicateTarget(String),

    /// A property or field name is empty
    #[error("Field mapping contains an empty name")]
    EmptyFieldName,

    /// The mapping names a field the translation metadata does not know
    #[error("Translation field \"{0}\" is not described by the translation metadata")]
    UnknownTranslationField(String),
}

/// Errors that can occur while synchronizing an entity with its translations
#[derive(Error, Debug)]
pub enum TranslatableError {
    /// Property access failed
    #[error("Property access error: {0}")]
    Access(#[from] AccessError),

    /// Invalid input value
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    /// Invalid metadata
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// The repository or the session failed
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] anyhow::Error),
}

/// Errors that can occur when creating upload keys
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UploadableError {
    /// The pattern is empty or produces an empty key
    #[error("Invalid key pattern: {0}")]
    InvalidPattern(String),

    /// The pattern references a placeholder the keymaker does not provide
    #[error("Unknown placeholder \"{{{0}}}\" in key pattern")]
    UnknownPlaceholder(String),

    /// No original file name was given
    #[error("Original file name must not be empty")]
    EmptyOriginalName,
}

/// Main error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the translatable behavior
    #[error("Translatable error: {0}")]
    Translatable(#[from] TranslatableError),

    /// Error from the uploadable behavior
    #[error("Uploadable error: {0}")]
    Uploadable(#[from] UploadableError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<AccessError> for AppError {
    fn from(error: AccessError) -> Self {
        Self::Translatable(TranslatableError::Access(error))
    }
}
