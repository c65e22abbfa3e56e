use ctxsnap::{
    AttributeKind, AttributeValue, ContextError, ContextSnapshot, Describable, ManagedObjectContext, ObjectId,
    ObjectState, PersistenceContext,
};

#[derive(Describable, Clone)]
struct Book {
    title: String,
    pages: u32,
    subtitle: Option<String>,
}

#[derive(Describable, Clone)]
struct Shelf {
    label: String,
}

fn book(title: &str, pages: u32) -> Book {
    Book {
        title: title.to_string(),
        pages,
        subtitle: None,
    }
}

#[test]
fn objects_move_through_pending_states() {
    let mut context = ManagedObjectContext::new();
    assert!(context.is_empty());

    let id = context.insert(&book("Dune", 412)).unwrap();
    assert_eq!(context.get(&id).unwrap().state(), ObjectState::PendingInsert);
    assert!(context.get(&id).unwrap().committed().is_none());
    assert_eq!(context.inserted_objects().count(), 1);

    let summary = context.save();
    assert_eq!((summary.inserted, summary.updated, summary.deleted), (1, 0, 0));
    assert_eq!(summary.total(), 1);
    assert_eq!(context.get(&id).unwrap().state(), ObjectState::Clean);
    assert!(!context.has_changes());

    context.set_attribute(&id, "pages", 500u32).unwrap();
    assert_eq!(context.get(&id).unwrap().state(), ObjectState::PendingUpdate);
    assert_eq!(context.updated_objects().count(), 1);

    context.delete(&id).unwrap();
    assert_eq!(context.get(&id).unwrap().state(), ObjectState::PendingDelete);
    assert_eq!(context.updated_objects().count(), 0);
    assert_eq!(context.deleted_objects().count(), 1);
    assert!(context.is_empty());

    let summary = context.save();
    assert_eq!(summary.deleted, 1);
    assert!(context.get(&id).is_none());
}

#[test]
fn updating_a_pending_insert_keeps_it_an_insert() {
    let mut context = ManagedObjectContext::new();
    let id = context.insert(&book("Draft", 10)).unwrap();
    context.update(&id, &book("Final", 12)).unwrap();

    assert_eq!(context.updated_objects().count(), 0);
    let snapshot = ContextSnapshot::new(&context);
    assert_eq!(snapshot.insertions().len(), 1);
    assert_eq!(
        snapshot.insertions()[0].changed_attributes().get("title"),
        Some(&AttributeValue::from("Final"))
    );
}

#[test]
fn set_attribute_validates_against_descriptor() {
    let mut context = ManagedObjectContext::new();
    let id = context.insert(&book("Dune", 412)).unwrap();

    let err = context.set_attribute(&id, "pages", "many").unwrap_err();
    assert!(matches!(
        err,
        ContextError::AttributeKindMismatch {
            expected: AttributeKind::Integer,
            found: AttributeKind::Text,
            ..
        }
    ));

    let err = context.set_attribute(&id, "author", "Herbert").unwrap_err();
    assert!(matches!(err, ContextError::UnknownAttribute { .. }));

    let err = context.set_attribute(&id, "title", AttributeValue::Null).unwrap_err();
    assert!(matches!(err, ContextError::MissingAttribute { .. }));

    context.set_attribute(&id, "subtitle", Some("Book One")).unwrap();
    assert_eq!(
        context.get(&id).unwrap().value("subtitle"),
        Some(&AttributeValue::from("Book One"))
    );
    assert_eq!(context.descriptor("Book").map(|descriptor| descriptor.attributes.len()), Some(3));
}

#[test]
fn missing_and_deleted_objects_are_errors() {
    let mut context = ManagedObjectContext::new();
    let unknown = ObjectId::from("missing");
    assert!(matches!(
        context.delete(&unknown),
        Err(ContextError::ObjectNotFound { .. })
    ));

    let id = context.insert(&book("Dune", 412)).unwrap();
    context.save();
    context.delete(&id).unwrap();
    assert!(matches!(context.delete(&id), Err(ContextError::ObjectDeleted { .. })));
    assert!(matches!(
        context.set_attribute(&id, "pages", 1),
        Err(ContextError::ObjectDeleted { .. })
    ));
}

#[test]
fn update_with_another_entity_is_rejected() {
    let mut context = ManagedObjectContext::new();
    let id = context.insert(&book("Dune", 412)).unwrap();
    let err = context
        .update(
            &id,
            &Shelf {
                label: "sci-fi".to_string(),
            },
        )
        .unwrap_err();
    match err {
        ContextError::EntityMismatch { expected, found } => {
            assert_eq!(expected, "Book");
            assert_eq!(found, "Shelf");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rollback_restores_committed_values() {
    let mut context = ManagedObjectContext::new();
    let kept = context.insert(&book("Dune", 412)).unwrap();
    context.save();

    let fresh = context.insert(&book("Emma", 300)).unwrap();
    context.set_attribute(&kept, "pages", 1).unwrap();
    context.rollback();

    assert!(!context.has_changes());
    assert!(context.get(&fresh).is_none());
    let kept = context.get(&kept).unwrap();
    assert_eq!(kept.state(), ObjectState::Clean);
    assert_eq!(kept.value("pages"), Some(&AttributeValue::Integer(412)));
}

#[test]
fn wipe_all_data_forgets_objects_and_descriptors() {
    let mut context = ManagedObjectContext::new();
    context.insert(&book("Dune", 412)).unwrap();
    context.insert(&Shelf { label: "a".to_string() }).unwrap();
    assert_eq!(context.registry().entity_names(), ["Book", "Shelf"]);

    context.wipe_all_data();
    assert!(context.is_empty());
    assert!(!context.has_changes());
    assert!(context.registry().is_empty());
    assert!(ContextSnapshot::new(&context).is_empty());
}

#[derive(Describable, Clone)]
struct Counter {
    #[ctxsnap(json)]
    hits: u64,
    #[ctxsnap(json)]
    tags: Option<Vec<String>>,
}

#[test]
fn wide_unsigned_values_are_stored_as_json() {
    let mut context = ManagedObjectContext::new();
    let id = context
        .insert(&Counter {
            hits: u64::MAX,
            tags: None,
        })
        .unwrap();
    assert_eq!(
        context.get(&id).unwrap().value("hits"),
        Some(&AttributeValue::Json(serde_json::json!(u64::MAX)))
    );
}

#[test]
fn clearing_an_absent_json_attribute_is_not_a_change() {
    let mut context = ManagedObjectContext::new();
    let id = context.insert(&Counter { hits: 1, tags: None }).unwrap();
    assert_eq!(context.get(&id).unwrap().value("tags"), Some(&AttributeValue::Null));
    context.save();

    context.set_attribute(&id, "tags", AttributeValue::Null).unwrap();
    assert!(context.has_changes());
    assert!(ContextSnapshot::new(&context).changes().is_empty());

    context.set_attribute(&id, "tags", serde_json::json!(["new"])).unwrap();
    let snapshot = ContextSnapshot::new(&context);
    assert_eq!(snapshot.changes().len(), 1);
    assert_eq!(snapshot.changes()[0].changed_attribute_names(), ["tags"]);
}
