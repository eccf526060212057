/*!
 * Tests for collection reconciliation and inverse-side maintenance
 */

use std::sync::Arc;

use parking_lot::Mutex;

use ormext::errors::{InputError, TranslatableError};
use ormext::property::{Collection, EntityRef, Value};
use ormext::translatable::{CollectionChanges, Relation, TranslationHelper};

use crate::common::{self, EventLog, TestWorld};

fn comments_relation() -> Relation {
    Relation::one_to_many("translation")
}

fn tags_relation() -> Relation {
    Relation::many_to_many("translations")
}

fn entities(items: &[&EntityRef]) -> Value {
    Value::List(items.iter().map(|item| Value::Entity((*item).clone())).collect())
}

#[test]
fn test_handleCollection_withOverlap_shouldDetachAndAttachOnlyDifferences() {
    common::init_logging();
    let helper = TranslationHelper::new();
    let translation = common::article_translation("en");
    let (a, b, c, d) = (
        common::comment("a"),
        common::comment("b"),
        common::comment("c"),
        common::comment("d"),
    );

    let changes = helper
        .handle_translations_collection(&comments_relation(), &translation, "comments", entities(&[&a, &b, &c]))
        .unwrap();
    assert_eq!(changes, CollectionChanges { removed: 0, added: 3 });

    let changes = helper
        .handle_translations_collection(
            &comments_relation(),
            &translation,
            "comments",
            Value::Collection(Collection::from_entities([b.clone(), c.clone(), d.clone()])),
        )
        .unwrap();
    assert_eq!(changes, CollectionChanges { removed: 1, added: 1 });

    let current = common::collection(&translation, "comments");
    assert_eq!(current.entities(), vec![b.clone(), c.clone(), d.clone()]);

    assert_eq!(common::comment_counters(&a), (1, 1));
    assert_eq!(common::comment_counters(&b), (1, 0));
    assert_eq!(common::comment_counters(&c), (1, 0));
    assert_eq!(common::comment_counters(&d), (1, 0));
    assert!(common::get(&a, "translation").is_null());
    assert_eq!(common::get(&d, "translation").as_entity(), Some(&translation));
}

#[test]
fn test_handleCollection_shouldRemoveBeforeAdding() {
    let helper = TranslationHelper::new();
    let translation = common::article_translation("en");
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let old = common::logged_comment("old", &log);
    let new = common::logged_comment("new", &log);

    helper
        .handle_translations_collection(&comments_relation(), &translation, "comments", entities(&[&old]))
        .unwrap();
    log.lock().clear();

    helper
        .handle_translations_collection(&comments_relation(), &translation, "comments", entities(&[&new]))
        .unwrap();

    assert_eq!(*log.lock(), vec!["detach:old".to_string(), "attach:new".to_string()]);
}

#[test]
fn test_handleCollection_withSameTarget_shouldBeNoOp() {
    let helper = TranslationHelper::new();
    let translation = common::article_translation("en");
    let comment = common::comment("only");

    helper
        .handle_translations_collection(&comments_relation(), &translation, "comments", entities(&[&comment]))
        .unwrap();
    let changes = helper
        .handle_translations_collection(&comments_relation(), &translation, "comments", entities(&[&comment]))
        .unwrap();

    assert!(changes.is_unchanged());
    assert_eq!(common::comment_counters(&comment), (1, 0));
}

#[test]
fn test_handleCollection_manyToMany_shouldMaintainInverseCollection() {
    let helper = TranslationHelper::new();
    let translation = common::article_translation("en");
    let rust = common::tag("rust");
    let orm = common::tag("orm");

    helper
        .handle_translations_collection(&tags_relation(), &translation, "tags", entities(&[&rust, &orm]))
        .unwrap();
    assert!(common::collection(&rust, "translations").contains_entity(&translation));
    assert!(common::collection(&orm, "translations").contains_entity(&translation));

    helper
        .handle_translations_collection(&tags_relation(), &translation, "tags", entities(&[&orm]))
        .unwrap();
    assert!(common::collection(&rust, "translations").is_empty());
    assert_eq!(common::collection(&orm, "translations").len(), 1);
}

#[test]
fn test_handleCollection_manyToMany_runTwice_shouldDetachOnce() {
    let helper = TranslationHelper::new();
    let translation = common::article_translation("en");
    let other = common::article_translation("pl");
    let tag = common::tag("rust");

    helper
        .handle_translations_collection(&tags_relation(), &translation, "tags", entities(&[&tag]))
        .unwrap();
    helper
        .handle_translations_collection(&tags_relation(), &other, "tags", entities(&[&tag]))
        .unwrap();

    for _ in 0..2 {
        helper
            .handle_translations_collection(&tags_relation(), &translation, "tags", Value::List(Vec::new()))
            .unwrap();
    }

    let inverse = common::collection(&tag, "translations");
    assert_eq!(inverse.entities(), vec![other.clone()]);
}

#[test]
fn test_handleCollection_manyToMany_withExistingInverseEntry_shouldNotDuplicate() {
    let helper = TranslationHelper::new();
    let translation = common::article_translation("en");
    let tag = common::tag("rust");
    common::collection(&tag, "translations").add(Value::Entity(translation.clone()));

    helper
        .handle_translations_collection(&tags_relation(), &translation, "tags", entities(&[&tag]))
        .unwrap();

    assert_eq!(common::collection(&tag, "translations").len(), 1);
}

#[test]
fn test_handleCollection_withoutInverseSide_shouldOnlyTouchCurrentCollection() {
    let helper = TranslationHelper::new();
    let translation = common::article_translation("en");
    let tag = common::tag("rust");

    let changes = helper
        .handle_translations_collection(
            &Relation::unidirectional_many_to_many(),
            &translation,
            "tags",
            entities(&[&tag]),
        )
        .unwrap();

    assert_eq!(changes.added, 1);
    assert!(common::collection(&translation, "tags").contains_entity(&tag));
    assert!(common::collection(&tag, "translations").is_empty());
}

#[test]
fn test_handleCollection_withScalar_shouldFailWithInputError() {
    let helper = TranslationHelper::new();
    let translation = common::article_translation("en");

    let error = helper
        .handle_translations_collection(&tags_relation(), &translation, "tags", Value::from("rust"))
        .unwrap_err();

    match error {
        TranslatableError::Input(InputError::NotACollection { found }) => assert_eq!(found, "text"),
        other => panic!("Unexpected error: {:?}", other),
    }
    assert!(common::collection(&translation, "tags").is_empty());
}

#[test]
fn test_handleCollection_withNonEntityElement_shouldFail() {
    let helper = TranslationHelper::new();
    let translation = common::article_translation("en");

    let error = helper
        .handle_translations_collection(&comments_relation(), &translation, "comments", Value::List(vec![Value::Int(7)]))
        .unwrap_err();

    assert!(matches!(
        error,
        TranslatableError::Input(InputError::NotAnEntity { ref field, found: "int" }) if field == "comments"
    ));
}

#[test]
fn test_copyPropertiesToTranslation_shouldReconcileTranslationCollections() {
    let world = TestWorld::new();
    let article = common::article();
    let first = common::comment("first");
    let second = common::comment("second");
    let rust = common::tag("rust");
    common::set(&article, "locale", "en");
    common::set(&article, "title", "Hello");
    common::set(&article, "comments", Collection::from_entities([first.clone(), second.clone()]));
    common::set(&article, "tags", Collection::from_entities([rust.clone()]));

    world
        .helper
        .copy_properties_to_translation(&world.context, &article, "en")
        .unwrap();
    let translation = world.find(&article, "en").unwrap();

    let translation_comments = common::collection(&translation, "comments");
    assert!(!translation_comments.same_instance(&common::collection(&article, "comments")));
    assert_eq!(translation_comments.entities(), vec![first.clone(), second.clone()]);
    assert_eq!(common::get(&first, "translation").as_entity(), Some(&translation));
    assert!(common::collection(&rust, "translations").contains_entity(&translation));

    common::set(&article, "comments", Collection::from_entities([second.clone()]));
    common::set(&article, "tags", Collection::new());
    world
        .helper
        .copy_properties_to_translation(&world.context, &article, "en")
        .unwrap();

    assert_eq!(common::collection(&translation, "comments").entities(), vec![second.clone()]);
    assert_eq!(common::comment_counters(&first), (1, 1));
    assert_eq!(common::comment_counters(&second), (1, 0));
    assert!(common::collection(&translation, "tags").is_empty());
    assert!(common::collection(&rust, "translations").is_empty());
}

#[test]
fn test_handleCollection_withSelfUnequalElement_shouldNotCountMissedRemoval() {
    let helper = TranslationHelper::new();
    let translation = common::article_translation("en");
    let relation = Relation::unidirectional_many_to_many();
    let not_a_number = || Value::List(vec![Value::Float(f64::NAN)]);

    let changes = helper
        .handle_translations_collection(&relation, &translation, "tags", not_a_number())
        .unwrap();
    assert_eq!(changes, CollectionChanges { removed: 0, added: 1 });

    let changes = helper
        .handle_translations_collection(&relation, &translation, "tags", not_a_number())
        .unwrap();
    assert_eq!(changes.removed, 0);
}
