/*!
 * Tests for the translation synchronization engine
 */

use std::sync::Arc;

use ormext::errors::{AccessError, MappingError, TranslatableError};
use ormext::property::{Collection, Value};
use ormext::session::{EntityState, InMemoryObjectManager};
use ormext::translatable::{
    AssociationMetadata, ClassTranslationContext, FieldMapping, ObjectManager,
    TranslatableMetadata, TranslationRepository,
};

use crate::common::{self, TestWorld};

#[test]
fn test_copyPropertiesToTranslation_withNewLocale_shouldCreateAndPersistTranslation() {
    common::init_logging();
    let world = TestWorld::new();
    let article = common::article();
    common::set(&article, "locale", "pl");
    common::set(&article, "title", "Tytuł");
    common::set(&article, "contents", "Treść");

    world
        .helper
        .copy_properties_to_translation(&world.context, &article, "en")
        .unwrap();

    let translation = world.find(&article, "pl").expect("translation should exist");
    assert_eq!(common::text(&translation, "title").as_deref(), Some("Tytuł"));
    assert_eq!(common::text(&translation, "contents").as_deref(), Some("Treść"));
    assert_eq!(common::get(&translation, "article").as_entity(), Some(&article));
    assert!(world.manager.is_scheduled_for_insertion(&translation));
    assert!(world.find(&article, "en").is_none());
}

#[test]
fn test_copyPropertiesToTranslation_withExistingTranslation_shouldUpdateInPlace() {
    let world = TestWorld::new();
    let (article, translation) = world.stored_article("en", "Hello");

    common::set(&article, "title", "Hello again");
    world
        .helper
        .copy_properties_to_translation(&world.context, &article, "en")
        .unwrap();

    assert_eq!(world.find(&article, "en"), Some(translation.clone()));
    assert_eq!(common::text(&translation, "title").as_deref(), Some("Hello again"));
    assert_eq!(common::collection(&article, "translations").len(), 1);
    assert!(world.manager.scheduled_insertions().is_empty());
    assert_eq!(world.manager.state_of(&translation), EntityState::Managed);
}

#[test]
fn test_copyPropertiesToTranslation_withoutLocale_shouldUseDefaultLocale() {
    let world = TestWorld::new();
    let article = common::article();
    common::set(&article, "title", "Hello");

    world
        .helper
        .copy_properties_to_translation(&world.context, &article, "en")
        .unwrap();

    let translation = world.find(&article, "en").expect("default locale translation");
    assert_eq!(common::text(&translation, "title").as_deref(), Some("Hello"));
    assert_eq!(common::text(&translation, "locale").as_deref(), Some("en"));
    assert_eq!(world.helper.get_object_locale(&world.context, &article).unwrap(), None);
}

#[test]
fn test_copyPropertiesToTranslation_withEmptyLocale_shouldUseDefaultLocale() {
    let world = TestWorld::new();
    let article = common::article();
    common::set(&article, "locale", "");
    common::set(&article, "title", "Hello");

    world
        .helper
        .copy_properties_to_translation(&world.context, &article, "de")
        .unwrap();

    assert!(world.find(&article, "de").is_some());
    assert!(world.find(&article, "").is_none());
}

#[test]
fn test_copyTranslationProperties_shouldLoadFieldsAndLocale() {
    let world = TestWorld::new();
    let (_, translation) = world.stored_article("en", "Hello");
    let fresh = common::article();

    world
        .helper
        .copy_translation_properties(&world.context, &fresh, &translation, "en")
        .unwrap();

    assert_eq!(common::text(&fresh, "title").as_deref(), Some("Hello"));
    assert_eq!(common::text(&fresh, "contents"), None);
    assert_eq!(
        world.helper.get_object_locale(&world.context, &fresh).unwrap().as_deref(),
        Some("en")
    );
}

#[test]
fn test_copyTranslationProperties_shouldCopyCollectionsIntoNewInstances() {
    let world = TestWorld::new();
    let translation = common::article_translation("en");
    let tag = common::tag("rust");
    let tags = Collection::from_entities([tag.clone()]);
    common::set(&translation, "tags", tags.clone());
    let article = common::article();

    world
        .helper
        .copy_translation_properties(&world.context, &article, &translation, "en")
        .unwrap();

    let article_tags = common::collection(&article, "tags");
    assert!(!article_tags.same_instance(&tags));
    assert!(article_tags.same_contents(&tags));

    article_tags.clear();
    assert_eq!(tags.len(), 1);
}

#[test]
fn test_copyTranslationProperties_withAnyFilledField_shouldReportTranslatedProperties() {
    let world = TestWorld::new();

    let scalar_only = common::article_translation("en");
    common::set(&scalar_only, "contents", "Body");
    let article = common::article();
    world
        .helper
        .copy_translation_properties(&world.context, &article, &scalar_only, "en")
        .unwrap();
    assert!(world.helper.has_translated_properties(&world.context, &article).unwrap());

    let collection_only = common::article_translation("pl");
    common::set(&collection_only, "tags", Collection::from_entities([common::tag("orm")]));
    let article = common::article();
    world
        .helper
        .copy_translation_properties(&world.context, &article, &collection_only, "pl")
        .unwrap();
    assert!(world.helper.has_translated_properties(&world.context, &article).unwrap());
}

#[test]
fn test_roundTrip_shouldRestoreTranslatedFields() {
    let world = TestWorld::new();
    let article = common::article();
    let tag = common::tag("orm");
    common::set(&article, "locale", "en");
    common::set(&article, "title", "Hello");
    common::set(&article, "contents", "World");
    common::set(&article, "tags", Collection::from_entities([tag.clone()]));

    world
        .helper
        .copy_properties_to_translation(&world.context, &article, "en")
        .unwrap();
    world
        .helper
        .clear_translatable_properties(&world.context, &article)
        .unwrap();
    let translation = world.find(&article, "en").unwrap();
    world
        .helper
        .copy_translation_properties(&world.context, &article, &translation, "en")
        .unwrap();

    assert_eq!(common::text(&article, "title").as_deref(), Some("Hello"));
    assert_eq!(common::text(&article, "contents").as_deref(), Some("World"));
    assert_eq!(common::text(&article, "locale").as_deref(), Some("en"));
    assert!(common::collection(&article, "tags").contains_entity(&tag));
}

#[test]
fn test_removeEmptyTranslation_withEmptyFields_shouldScheduleRemoval() {
    let world = TestWorld::new();
    let (article, translation) = world.stored_article("en", "Hello");

    common::set(&article, "title", Value::Null);
    world
        .helper
        .remove_empty_translation(&world.context, &article)
        .unwrap();

    assert!(world.manager.is_scheduled_for_removal(&translation));
    assert!(!common::collection(&article, "translations").contains_entity(&translation));
    assert!(world.find(&article, "en").is_none());
}

#[test]
fn test_removeEmptyTranslation_calledTwice_shouldBeIdempotent() {
    let world = TestWorld::new();
    let (article, _) = world.stored_article("en", "Hello");
    common::set(&article, "title", Value::Null);

    world
        .helper
        .remove_empty_translation(&world.context, &article)
        .unwrap();
    world
        .helper
        .remove_empty_translation(&world.context, &article)
        .unwrap();

    assert_eq!(world.manager.scheduled_removals().len(), 1);
    let report = world.manager.flush();
    assert_eq!(report.removed, 1);
    assert_eq!(report.inserted, 0);
}

#[test]
fn test_removeEmptyTranslation_withUnflushedTranslation_shouldCancelInsertion() {
    let world = TestWorld::new();
    let article = common::article();
    common::set(&article, "locale", "en");
    common::set(&article, "title", "Draft");
    world
        .helper
        .copy_properties_to_translation(&world.context, &article, "en")
        .unwrap();
    let translation = world.find(&article, "en").unwrap();

    common::set(&article, "title", Value::Null);
    world
        .helper
        .remove_empty_translation(&world.context, &article)
        .unwrap();

    assert_eq!(world.manager.state_of(&translation), EntityState::Detached);
    assert!(world.manager.flush().is_empty());
}

#[test]
fn test_removeEmptyTranslation_withFilledField_shouldKeepTranslation() {
    let world = TestWorld::new();
    let (article, translation) = world.stored_article("en", "Hello");

    world
        .helper
        .remove_empty_translation(&world.context, &article)
        .unwrap();

    assert!(!world.manager.is_scheduled_for_removal(&translation));
    assert_eq!(world.find(&article, "en"), Some(translation));
}

#[test]
fn test_removeEmptyTranslation_withoutLocale_shouldDoNothing() {
    let world = TestWorld::new();
    let (article, translation) = world.stored_article("en", "Hello");
    common::set(&article, "title", Value::Null);
    common::set(&article, "locale", Value::Null);

    world
        .helper
        .remove_empty_translation(&world.context, &article)
        .unwrap();

    assert!(world.manager.scheduled_removals().is_empty());
    assert_eq!(world.find(&article, "en"), Some(translation));
}

#[test]
fn test_clearTranslatableProperties_shouldResetFieldsAndLocale() {
    let world = TestWorld::new();
    let article = common::article();
    let tags = Collection::from_entities([common::tag("a")]);
    common::set(&article, "locale", "en");
    common::set(&article, "title", "Hello");
    common::set(&article, "tags", tags.clone());

    world
        .helper
        .clear_translatable_properties(&world.context, &article)
        .unwrap();

    assert_eq!(common::text(&article, "title"), None);
    assert_eq!(common::text(&article, "locale"), None);
    let cleared = common::collection(&article, "tags");
    assert!(cleared.is_empty());
    assert!(!cleared.same_instance(&tags));
    assert_eq!(tags.len(), 1);
    assert!(!world.helper.has_translated_properties(&world.context, &article).unwrap());
}

#[test]
fn test_hasTranslatedProperties_shouldCheckScalarsAndCollections() {
    let world = TestWorld::new();
    let article = common::article();
    assert!(!world.helper.has_translated_properties(&world.context, &article).unwrap());

    common::set(&article, "locale", "en");
    assert!(!world.helper.has_translated_properties(&world.context, &article).unwrap());

    common::set(&article, "tags", Collection::from_entities([common::tag("a")]));
    assert!(world.helper.has_translated_properties(&world.context, &article).unwrap());

    common::set(&article, "tags", Collection::new());
    common::set(&article, "contents", "");
    assert!(world.helper.has_translated_properties(&world.context, &article).unwrap());
}

#[test]
fn test_copyPropertiesToTranslation_withUnknownEntityProperty_shouldFail() {
    let mapping = FieldMapping::new([("subtitle", "title")]).unwrap();
    let world = TestWorld::with_mapping(mapping);
    let article = common::article();

    let error = world
        .helper
        .copy_properties_to_translation(&world.context, &article, "en")
        .unwrap_err();

    match error {
        TranslatableError::Access(AccessError::UnknownProperty { class, property }) => {
            assert_eq!(class, "Article");
            assert_eq!(property, "subtitle");
        }
        other => panic!("Unexpected error: {:?}", other),
    }
}

#[test]
fn test_contextNew_withUnknownTranslationField_shouldFail() {
    let manager: Arc<dyn ObjectManager> = Arc::new(InMemoryObjectManager::new());
    let repository: Arc<dyn TranslationRepository> = Arc::new(common::translation_repository());
    let mapping = FieldMapping::new([("title", "summary")]).unwrap();

    let error = ClassTranslationContext::new(
        AssociationMetadata::new("translations", mapping),
        TranslatableMetadata::new("locale"),
        common::translation_metadata(),
        manager,
        repository,
    )
    .unwrap_err();

    assert_eq!(error, MappingError::UnknownTranslationField("summary".to_string()));
}

#[test]
fn test_contextNew_withEmptyLocaleProperty_shouldFail() {
    let manager: Arc<dyn ObjectManager> = Arc::new(InMemoryObjectManager::new());
    let repository: Arc<dyn TranslationRepository> = Arc::new(common::translation_repository());

    let error = ClassTranslationContext::new(
        AssociationMetadata::new("translations", common::article_mapping()),
        TranslatableMetadata::new(""),
        common::translation_metadata(),
        manager,
        repository,
    )
    .unwrap_err();

    assert_eq!(error, MappingError::EmptyFieldName);
}

#[test]
fn test_getObjectLocale_withNonTextLocale_shouldReportTypeMismatch() {
    let world = TestWorld::new();
    let translation = common::article_translation("en");

    // a translation record used as entity: its "article" field is an entity, not text
    let context = ClassTranslationContext::new(
        AssociationMetadata::new("translations", common::article_mapping()),
        TranslatableMetadata::new("article"),
        common::translation_metadata(),
        world.manager.clone(),
        world.repository.clone(),
    )
    .unwrap();
    common::set(&translation, "article", common::article());

    let error = world.helper.get_object_locale(&context, &translation).unwrap_err();
    assert!(matches!(
        error,
        TranslatableError::Access(AccessError::TypeMismatch { found: "entity", .. })
    ));
}
