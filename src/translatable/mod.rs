/*!
 * Translatable behavior.
 *
 * This module provides:
 * - Translation metadata (field mappings, locale holder, relations)
 * - The translation context and its collaborator traits
 * - The synchronization engine (`TranslationHelper`)
 * - A repository resolving translations through the entity graph
 * - A lifecycle adapter for host session events
 */

pub mod context;
pub mod helper;
pub mod listener;
pub mod metadata;
pub mod repository;

// Re-export main types
pub use context::{ClassTranslationContext, ObjectManager, TranslationRepository};
pub use helper::{CollectionChanges, TranslationHelper};
pub use listener::TranslatableListener;
pub use metadata::{
    AssociationMetadata, FieldKind, FieldMapping, Relation, TranslatableMetadata,
    TranslationMetadata,
};
pub use repository::{EntityTranslationRepository, TranslationFactory};
