/*!
 * Translation repository working directly on the entity graph.
 *
 * Translations are looked up in the owner's translations association, the
 * way an ORM repository does once the association is loaded. New records
 * come from a factory closure and are wired to their owner and locale.
 */

use std::fmt;

use anyhow::{anyhow, Result};
use log::debug;

use crate::property::{Collection, EntityRef, PropertyAccessor, Value};
use super::context::TranslationRepository;

/// Creates empty translation records
pub type TranslationFactory = Box<dyn Fn() -> EntityRef + Send + Sync>;

/// Repository resolving translations through the owner's association property
pub struct EntityTranslationRepository {
    accessor: PropertyAccessor,

    /// Locale property on translation records
    locale_field: String,

    /// Back-reference to the owner on translation records, if any
    owner_field: Option<String>,

    factory: TranslationFactory,
}

impl EntityTranslationRepository {
    pub fn new<F>(locale_field: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> EntityRef + Send + Sync + 'static,
    {
        Self {
            accessor: PropertyAccessor::new(),
            locale_field: locale_field.into(),
            owner_field: None,
            factory: Box::new(factory),
        }
    }

    /// Set the owner back-reference on records created by this repository
    pub fn with_owner_field(mut self, owner_field: impl Into<String>) -> Self {
        self.owner_field = Some(owner_field.into());
        self
    }

    fn translation_locale(&self, translation: &EntityRef) -> Result<Option<String>> {
        let value = self.accessor.get_property_value(translation, &self.locale_field)?;
        match value {
            Value::Null => Ok(None),
            Value::Text(locale) => Ok(Some(locale)),
            other => Err(anyhow!(
                "Locale field \"{}\" of {:?} holds {} instead of text",
                self.locale_field,
                translation,
                other.kind_name()
            )),
        }
    }
}

impl TranslationRepository for EntityTranslationRepository {
    fn find_translation(
        &self,
        entity: &EntityRef,
        locale: &str,
        association: &str,
    ) -> Result<Option<EntityRef>> {
        let translations = self.get_translations(entity, association)?;
        for translation in translations.entities() {
            if self.translation_locale(&translation)?.as_deref() == Some(locale) {
                return Ok(Some(translation));
            }
        }
        Ok(None)
    }

    fn get_translation(
        &self,
        entity: &EntityRef,
        locale: &str,
        association: &str,
    ) -> Result<EntityRef> {
        if let Some(translation) = self.find_translation(entity, locale, association)? {
            return Ok(translation);
        }

        let translation = (self.factory)();
        self.accessor
            .set_property_value(&translation, &self.locale_field, Value::from(locale))?;
        if let Some(owner_field) = &self.owner_field {
            self.accessor
                .set_property_value(&translation, owner_field, Value::Entity(entity.clone()))?;
        }

        self.get_translations(entity, association)?
            .add(Value::Entity(translation.clone()));
        debug!("Created {} translation {:?} for {:?}", locale, translation, entity);

        Ok(translation)
    }

    fn get_translations(&self, entity: &EntityRef, association: &str) -> Result<Collection> {
        match self.accessor.get_property_value(entity, association)? {
            Value::Collection(collection) => Ok(collection),
            Value::Null => {
                let collection = Collection::new();
                self.accessor.set_property_value(
                    entity,
                    association,
                    Value::Collection(collection.clone()),
                )?;
                Ok(collection)
            }
            other => Err(anyhow!(
                "Association \"{}\" of {:?} holds {} instead of a collection",
                association,
                entity,
                other.kind_name()
            )),
        }
    }
}

impl fmt::Debug for EntityTranslationRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityTranslationRepository")
            .field("locale_field", &self.locale_field)
            .field("owner_field", &self.owner_field)
            .finish_non_exhaustive()
    }
}
