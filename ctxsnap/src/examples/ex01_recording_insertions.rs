use anyhow::Result;

use super::support;
use crate::{AttributeValue, ChangeType, ContextSnapshot, ManagedObjectContext};

/// Example 01 – new objects show up as insertions carrying every attribute
pub fn run() -> Result<()> {
    support::init_logging();
    let mut context = ManagedObjectContext::new();

    let empty = ContextSnapshot::new(&context);
    assert!(empty.is_empty(), "fresh context has nothing pending");

    let article_id = context.insert(&support::article("Getting Started"))?;
    let tag_id = context.insert(&support::tag("rust"))?;

    let snapshot = ContextSnapshot::new(&context);
    assert_eq!(snapshot.insertions().len(), 2);
    assert!(snapshot.changes().is_empty());
    assert!(snapshot.deletions().is_empty());

    let article = &snapshot.insertions()[0];
    assert_eq!(article.change_type(), ChangeType::Insertion);
    assert_eq!(article.object_id(), &article_id);
    assert_eq!(article.entity_name(), "Article");
    assert!(article.initial_attributes().is_empty());
    assert_eq!(
        article.changed_attributes().get("title"),
        Some(&AttributeValue::from("Getting Started"))
    );
    assert_eq!(article.changed_attributes().get("summary"), Some(&AttributeValue::Null));
    assert!(!article.changed_attributes().contains_key("rendered"));

    let tag = &snapshot.insertions()[1];
    assert_eq!(tag.object_id(), &tag_id);
    assert_eq!(tag.entity_name(), "Label");
    assert_eq!(tag.changed_attribute_names(), ["label", "weight"]);
    Ok(())
}
