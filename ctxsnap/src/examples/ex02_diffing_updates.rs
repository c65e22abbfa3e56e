use anyhow::Result;

use super::support;
use crate::{AttributeValue, ContextSnapshot, ManagedObjectContext};

/// Example 02 – updates list only the attributes whose values differ
pub fn run() -> Result<()> {
    support::init_logging();
    let mut context = ManagedObjectContext::new();

    let mut draft = support::article("Draft");
    let article_id = context.insert(&draft)?;
    context.save();

    draft.rating = 4;
    draft.summary = Some("A first look".to_string());
    context.update(&article_id, &draft)?;

    let snapshot = ContextSnapshot::new(&context);
    assert_eq!(snapshot.changes().len(), 1);
    let record = &snapshot.changes()[0];
    assert!(record.is_update());
    assert_eq!(record.changed_attribute_names(), ["rating", "summary"]);
    assert_eq!(record.initial_attributes().get("rating"), Some(&AttributeValue::Integer(0)));
    assert_eq!(record.changed_attributes().get("rating"), Some(&AttributeValue::Integer(4)));
    assert_eq!(record.initial_attributes().get("summary"), Some(&AttributeValue::Null));
    println!("    {record}");
    context.save();

    // Writing back identical values still marks the object updated, but there
    // is nothing to record.
    context.set_attribute(&article_id, "rating", 4)?;
    assert!(context.has_changes());
    let snapshot = ContextSnapshot::new(&context);
    assert!(snapshot.changes().is_empty());
    Ok(())
}
