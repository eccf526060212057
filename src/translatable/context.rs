/*!
 * Translation context and the collaborators it hands to the engine.
 *
 * A context bundles everything the synchronization engine needs for one
 * translatable class: the field mapping, the locale holder, the translation
 * class metadata, the session and the translation repository.
 */

use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use crate::errors::MappingError;
use crate::property::{Collection, EntityRef};
use super::metadata::{AssociationMetadata, TranslatableMetadata, TranslationMetadata};

/// Lookup and creation of translation records
pub trait TranslationRepository: Send + Sync {
    /// Existing translation of `entity` in `locale`, if any
    fn find_translation(
        &self,
        entity: &EntityRef,
        locale: &str,
        association: &str,
    ) -> Result<Option<EntityRef>>;

    /// Translation of `entity` in `locale`, created when missing
    fn get_translation(&self, entity: &EntityRef, locale: &str, association: &str)
        -> Result<EntityRef>;

    /// All translations of `entity`, every locale
    fn get_translations(&self, entity: &EntityRef, association: &str) -> Result<Collection>;
}

/// The unit of work the records are scheduled into
pub trait ObjectManager: Send + Sync {
    /// Whether the record is already tracked
    fn contains(&self, entity: &EntityRef) -> bool;

    /// Schedule the record for insertion
    fn persist(&self, entity: &EntityRef) -> Result<()>;

    /// Schedule the record for deletion
    fn remove(&self, entity: &EntityRef) -> Result<()>;

    /// Persist the record unless it is already tracked; returns whether it was persisted
    fn ensure_managed(&self, entity: &EntityRef) -> Result<bool> {
        if self.contains(entity) {
            return Ok(false);
        }
        self.persist(entity)?;
        Ok(true)
    }
}

/// Everything needed to synchronize one translatable class
#[derive(Clone)]
pub struct ClassTranslationContext {
    association: AssociationMetadata,
    translatable: TranslatableMetadata,
    translation: TranslationMetadata,
    object_manager: Arc<dyn ObjectManager>,
    repository: Arc<dyn TranslationRepository>,
}

impl ClassTranslationContext {
    /// Create a context, checking that every mapped field exists on the translation class
    pub fn new(
        association: AssociationMetadata,
        translatable: TranslatableMetadata,
        translation: TranslationMetadata,
        object_manager: Arc<dyn ObjectManager>,
        repository: Arc<dyn TranslationRepository>,
    ) -> Result<Self, MappingError> {
        if translatable.locale_property.is_empty() {
            return Err(MappingError::EmptyFieldName);
        }

        if let Some((_, field)) = association
            .properties()
            .iter()
            .find(|(_, field)| !translation.has_field(field))
        {
            return Err(MappingError::UnknownTranslationField(field.to_string()));
        }

        Ok(Self {
            association,
            translatable,
            translation,
            object_manager,
            repository,
        })
    }

    pub fn association_metadata(&self) -> &AssociationMetadata {
        &self.association
    }

    pub fn translatable_metadata(&self) -> &TranslatableMetadata {
        &self.translatable
    }

    pub fn translation_metadata(&self) -> &TranslationMetadata {
        &self.translation
    }

    pub fn object_manager(&self) -> &dyn ObjectManager {
        self.object_manager.as_ref()
    }

    pub fn translatable_repository(&self) -> &dyn TranslationRepository {
        self.repository.as_ref()
    }
}

impl fmt::Debug for ClassTranslationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassTranslationContext")
            .field("association", &self.association)
            .field("translatable", &self.translatable)
            .field("translation", &self.translation)
            .finish_non_exhaustive()
    }
}
