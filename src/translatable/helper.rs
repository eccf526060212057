/*!
 * Translation synchronization engine.
 *
 * Moves values between a translatable entity and its translation records:
 * - loading a translation into the entity's working fields
 * - writing the working fields back into the translation for the active locale
 * - dropping translations that became empty
 * - reconciling collection-valued associations and their inverse sides
 */

use log::{debug, trace};

use crate::errors::{AccessError, InputError, TranslatableError};
use crate::property::{Collection, EntityRef, PropertyAccessor, Value};
use super::context::ClassTranslationContext;
use super::metadata::Relation;

/// Counts of elements touched by one collection reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionChanges {
    /// Elements detached and removed from the current collection
    pub removed: usize,
    /// Elements attached and added to the current collection
    pub added: usize,
}

impl CollectionChanges {
    pub fn is_unchanged(&self) -> bool {
        self.removed == 0 && self.added == 0
    }
}

/// Synchronizes translatable entities with their translation records
#[derive(Debug, Default, Clone, Copy)]
pub struct TranslationHelper {
    accessor: PropertyAccessor,
}

impl TranslationHelper {
    pub fn new() -> Self {
        Self {
            accessor: PropertyAccessor::new(),
        }
    }

    /// Copy the translated fields of `translation` into `entity` and mark it as `locale`.
    ///
    /// Collections are copied into new instances so the entity never shares one
    /// with the translation.
    pub fn copy_translation_properties(
        &self,
        context: &ClassTranslationContext,
        entity: &EntityRef,
        translation: &EntityRef,
        locale: &str,
    ) -> Result<(), TranslatableError> {
        let mapping = context.association_metadata().properties();
        for (source_field, target_field) in mapping.flipped() {
            let value = match self.accessor.get_property_value(translation, source_field)? {
                Value::Collection(collection) => Value::Collection(collection.copied()),
                other => other,
            };
            self.accessor.set_property_value(entity, target_field, value)?;
        }

        debug!("Loaded {} translation into {:?}", locale, entity);
        self.set_object_locale(context, entity, Some(locale))
    }

    /// Write the entity's translated fields into the translation for its locale.
    ///
    /// Uses `default_locale` when the entity has no locale. The translation is
    /// created and scheduled for persistence when it does not exist yet.
    pub fn copy_properties_to_translation(
        &self,
        context: &ClassTranslationContext,
        entity: &EntityRef,
        default_locale: &str,
    ) -> Result<(), TranslatableError> {
        let association = context.association_metadata();
        let locale = match self.get_object_locale(context, entity)? {
            Some(locale) if !locale.is_empty() => locale,
            _ => default_locale.to_string(),
        };

        let translation = context.translatable_repository().get_translation(
            entity,
            &locale,
            association.association_name(),
        )?;

        if context.object_manager().ensure_managed(&translation)? {
            debug!("Scheduled new {} translation {:?} for insertion", locale, translation);
        }

        let translation_meta = context.translation_metadata();
        for (source_field, target_field) in association.properties().iter() {
            let value = self.accessor.get_property_value(entity, source_field)?;
            match translation_meta.association(target_field) {
                Some(relation) => {
                    let changes =
                        self.handle_translations_collection(relation, &translation, target_field, value)?;
                    if !changes.is_unchanged() {
                        debug!(
                            "Reconciled {}.{}: {} removed, {} added",
                            translation_meta.class(),
                            target_field,
                            changes.removed,
                            changes.added
                        );
                    }
                }
                None => self.accessor.set_property_value(&translation, target_field, value)?,
            }
        }

        Ok(())
    }

    /// Remove the translation for the entity's locale when every translated field is empty
    pub fn remove_empty_translation(
        &self,
        context: &ClassTranslationContext,
        entity: &EntityRef,
    ) -> Result<(), TranslatableError> {
        if self.has_translated_properties(context, entity)? {
            return Ok(());
        }

        let locale = match self.get_object_locale(context, entity)? {
            Some(locale) if !locale.is_empty() => locale,
            _ => return Ok(()),
        };

        let association_name = context.association_metadata().association_name();
        let repository = context.translatable_repository();
        let Some(translation) = repository.find_translation(entity, &locale, association_name)? else {
            return Ok(());
        };

        context.object_manager().remove(&translation)?;
        debug!("Scheduled empty {} translation {:?} for removal", locale, translation);

        let translations = repository.get_translations(entity, association_name)?;
        let element = Value::Entity(translation);
        if translations.contains(&element) {
            translations.remove_element(&element);
        }

        Ok(())
    }

    /// Reset every translated field and the locale of the entity
    pub fn clear_translatable_properties(
        &self,
        context: &ClassTranslationContext,
        entity: &EntityRef,
    ) -> Result<(), TranslatableError> {
        let translation_meta = context.translation_metadata();
        for (property, translation_field) in context.association_metadata().properties().iter() {
            let clear_value = if translation_meta.is_collection_valued_association(translation_field) {
                Value::Collection(Collection::new())
            } else {
                Value::Null
            };
            self.accessor.set_property_value(entity, property, clear_value)?;
        }

        self.set_object_locale(context, entity, None)
    }

    /// Whether any translated field of the entity holds a value
    pub fn has_translated_properties(
        &self,
        context: &ClassTranslationContext,
        entity: &EntityRef,
    ) -> Result<bool, TranslatableError> {
        let translation_meta = context.translation_metadata();
        for (property, translation_field) in context.association_metadata().properties().iter() {
            let value = self.accessor.get_property_value(entity, property)?;
            let filled = if translation_meta.is_collection_valued_association(translation_field) {
                value.cardinality().unwrap_or(0) > 0
            } else {
                !value.is_null()
            };
            if filled {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Current value of the entity's locale property
    pub fn get_object_locale(
        &self,
        context: &ClassTranslationContext,
        entity: &EntityRef,
    ) -> Result<Option<String>, TranslatableError> {
        let property = &context.translatable_metadata().locale_property;
        let value = self.accessor.get_property_value(entity, property)?;
        value.into_opt_text().map_err(|mismatch| {
            AccessError::TypeMismatch {
                class: entity.class_name().to_string(),
                property: property.clone(),
                expected: mismatch.expected,
                found: mismatch.found,
            }
            .into()
        })
    }

    /// Make the translation's `collection_field` hold exactly the elements of `new_collection`.
    ///
    /// Removals run before additions, and every change is mirrored on the
    /// inverse side of `relation`.
    pub fn handle_translations_collection(
        &self,
        relation: &Relation,
        translation: &EntityRef,
        collection_field: &str,
        new_collection: Value,
    ) -> Result<CollectionChanges, TranslatableError> {
        let new_collection = Collection::coerce(new_collection)?;
        let current_collection = match self.accessor.get_property_value(translation, collection_field)? {
            Value::Collection(collection) => collection,
            Value::Null => {
                let collection = Collection::new();
                self.accessor.set_property_value(
                    translation,
                    collection_field,
                    Value::Collection(collection.clone()),
                )?;
                collection
            }
            other => {
                return Err(InputError::NotACollection {
                    found: other.kind_name(),
                }
                .into());
            }
        };

        let mut changes = CollectionChanges::default();

        for current_element in current_collection.to_vec() {
            if new_collection.contains(&current_element) {
                continue;
            }
            self.remove_from_relation(relation, translation, collection_field, &current_element)?;
            if current_collection.remove_element(&current_element) {
                changes.removed += 1;
            }
        }

        for new_element in new_collection.to_vec() {
            if current_collection.contains(&new_element) {
                continue;
            }
            self.add_to_relation(relation, translation, collection_field, &new_element)?;
            current_collection.add(new_element);
            changes.added += 1;
        }

        Ok(changes)
    }

    fn remove_from_relation(
        &self,
        relation: &Relation,
        translation: &EntityRef,
        collection_field: &str,
        element: &Value,
    ) -> Result<(), TranslatableError> {
        let Some(target_field) = relation.inverse_field() else {
            // one-sided relation
            return Ok(());
        };
        let related = Self::related_entity(collection_field, element)?;
        trace!("Detaching {:?} from {:?}.{}", translation, related, target_field);

        match relation {
            Relation::ToMany { .. } => {
                if let Some(inversed) = self.inverse_collection(related, target_field, false)? {
                    inversed.remove_element(&Value::Entity(translation.clone()));
                }
            }
            Relation::ToOne { .. } => {
                self.accessor.set_property_value(related, target_field, Value::Null)?;
            }
        }

        Ok(())
    }

    fn add_to_relation(
        &self,
        relation: &Relation,
        translation: &EntityRef,
        collection_field: &str,
        element: &Value,
    ) -> Result<(), TranslatableError> {
        let Some(target_field) = relation.inverse_field() else {
            return Ok(());
        };
        let related = Self::related_entity(collection_field, element)?;
        trace!("Attaching {:?} to {:?}.{}", translation, related, target_field);

        match relation {
            Relation::ToMany { .. } => {
                if let Some(inversed) = self.inverse_collection(related, target_field, true)? {
                    inversed.add_unique(Value::Entity(translation.clone()));
                }
            }
            Relation::ToOne { .. } => {
                self.accessor.set_property_value(
                    related,
                    target_field,
                    Value::Entity(translation.clone()),
                )?;
            }
        }

        Ok(())
    }

    /// Inverse collection on a related entity; a null field gets a new collection when `create` is set
    fn inverse_collection(
        &self,
        related: &EntityRef,
        target_field: &str,
        create: bool,
    ) -> Result<Option<Collection>, TranslatableError> {
        match self.accessor.get_property_value(related, target_field)? {
            Value::Collection(collection) => Ok(Some(collection)),
            Value::Null if create => {
                let collection = Collection::new();
                self.accessor.set_property_value(
                    related,
                    target_field,
                    Value::Collection(collection.clone()),
                )?;
                Ok(Some(collection))
            }
            Value::Null => Ok(None),
            other => Err(AccessError::TypeMismatch {
                class: related.class_name().to_string(),
                property: target_field.to_string(),
                expected: "collection",
                found: other.kind_name(),
            }
            .into()),
        }
    }

    fn related_entity<'a>(collection_field: &str, element: &'a Value) -> Result<&'a EntityRef, InputError> {
        element.as_entity().ok_or_else(|| InputError::NotAnEntity {
            field: collection_field.to_string(),
            found: element.kind_name(),
        })
    }

    pub(crate) fn set_object_locale(
        &self,
        context: &ClassTranslationContext,
        entity: &EntityRef,
        locale: Option<&str>,
    ) -> Result<(), TranslatableError> {
        let property = &context.translatable_metadata().locale_property;
        self.accessor.set_property_value(entity, property, Value::from(locale))?;
        Ok(())
    }
}
