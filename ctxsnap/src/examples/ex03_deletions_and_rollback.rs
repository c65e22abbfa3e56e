use anyhow::Result;

use super::support;
use crate::{AttributeValue, ContextSnapshot, ManagedObjectContext};

/// Example 03 – deletions carry the last committed values; rollback clears them
pub fn run() -> Result<()> {
    support::init_logging();
    let mut context = ManagedObjectContext::new();

    let tag_id = context.insert(&support::tag("archive"))?;
    context.save();

    // Unsaved edits are not what gets reported for a deletion.
    context.set_attribute(&tag_id, "weight", 9.5)?;
    context.delete(&tag_id)?;

    let snapshot = ContextSnapshot::new(&context);
    assert!(snapshot.changes().is_empty(), "deleted objects leave the update set");
    assert_eq!(snapshot.deletions().len(), 1);
    let record = &snapshot.deletions()[0];
    assert!(record.is_deletion());
    assert!(record.changed_attributes().is_empty());
    assert_eq!(record.initial_attributes().get("weight"), Some(&AttributeValue::Float(1.0)));

    context.rollback();
    assert!(ContextSnapshot::new(&context).is_empty());
    let restored = context.get(&tag_id).map(|object| object.attributes().clone());
    assert_eq!(
        restored.and_then(|attributes| attributes.get("weight").cloned()),
        Some(AttributeValue::Float(1.0))
    );

    // Deleting an unsaved insert simply forgets it.
    let scratch_id = context.insert(&support::tag("scratch"))?;
    context.delete(&scratch_id)?;
    assert!(ContextSnapshot::new(&context).is_empty());
    assert!(context.get(&scratch_id).is_none());
    Ok(())
}
