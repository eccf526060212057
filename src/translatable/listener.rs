/*!
 * Lifecycle adapter for translatable entities.
 *
 * Hosts call these hooks from their session events: `post_load` after an
 * entity is hydrated, `pre_flush` before changes are written, and
 * `switch_locale` when the application changes the working locale.
 */

use log::{debug, warn};

use crate::app_config::ExtensionConfig;
use crate::errors::TranslatableError;
use crate::locale::is_blank;
use crate::property::EntityRef;
use super::context::ClassTranslationContext;
use super::helper::TranslationHelper;

/// Drives the translation helper from session lifecycle events
#[derive(Debug, Clone)]
pub struct TranslatableListener {
    helper: TranslationHelper,

    /// Locale used when an entity has none
    default_locale: String,

    /// Locale entities are loaded in
    current_locale: Option<String>,

    /// Load the default locale when the current one has no translation
    fallback: bool,
}

impl TranslatableListener {
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            helper: TranslationHelper::new(),
            default_locale: default_locale.into(),
            current_locale: None,
            fallback: true,
        }
    }

    /// Listener using the configured default locale and fallback
    pub fn from_config(config: &ExtensionConfig) -> Self {
        Self::new(config.default_locale.clone())
            .with_fallback(config.translatable.default_locale_fallback)
    }

    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Locale entities are loaded in, the default locale when none was set
    pub fn locale(&self) -> &str {
        self.current_locale.as_deref().unwrap_or(&self.default_locale)
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.current_locale = Some(locale.into());
    }

    pub fn helper(&self) -> &TranslationHelper {
        &self.helper
    }

    /// Load the translation matching the listener's locale into a freshly loaded entity.
    ///
    /// Returns the locale that was loaded, `None` when the entity has no usable
    /// translation and was cleared instead.
    pub fn post_load(
        &self,
        context: &ClassTranslationContext,
        entity: &EntityRef,
    ) -> Result<Option<String>, TranslatableError> {
        let repository = context.translatable_repository();
        let association_name = context.association_metadata().association_name();

        let mut candidates = vec![self.locale()];
        if self.fallback && self.locale() != self.default_locale {
            candidates.push(self.default_locale.as_str());
        }

        for locale in candidates {
            if let Some(translation) = repository.find_translation(entity, locale, association_name)? {
                self.helper
                    .copy_translation_properties(context, entity, &translation, locale)?;
                return Ok(Some(locale.to_string()));
            }
        }

        debug!("No translation of {:?} in {}, clearing", entity, self.locale());
        self.helper.clear_translatable_properties(context, entity)?;
        Ok(None)
    }

    /// Push the entity's working fields into its translation before flushing.
    ///
    /// An entity without a locale is written to the default locale and keeps it.
    pub fn pre_flush(
        &self,
        context: &ClassTranslationContext,
        entity: &EntityRef,
    ) -> Result<(), TranslatableError> {
        if self.helper.has_translated_properties(context, entity)? {
            self.helper
                .copy_properties_to_translation(context, entity, &self.default_locale)?;
            let locale = self.helper.get_object_locale(context, entity)?;
            if is_blank(locale.as_deref()) {
                self.helper
                    .set_object_locale(context, entity, Some(&self.default_locale))?;
            }
        }
        self.helper.remove_empty_translation(context, entity)
    }

    /// Change the working locale and reload the entity in it
    pub fn switch_locale(
        &mut self,
        context: &ClassTranslationContext,
        entity: &EntityRef,
        locale: &str,
    ) -> Result<Option<String>, TranslatableError> {
        if is_blank(Some(locale)) {
            warn!("Ignoring switch of {:?} to an empty locale", entity);
            return self.helper.get_object_locale(context, entity);
        }

        self.set_locale(locale);
        self.helper.clear_translatable_properties(context, entity)?;
        self.post_load(context, entity)
    }
}
