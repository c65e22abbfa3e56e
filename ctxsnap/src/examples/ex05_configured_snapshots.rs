use anyhow::Result;
use chrono::{Duration, Utc};

use super::support;
use crate::{ContextSnapshot, ManagedObjectContext, SnapshotConfig};

const CONFIG: &str = r#"
[snapshot]
ignored_attributes = ["^updated_at$"]
entities = ["Article"]
"#;

/// Example 05 – ignore bookkeeping attributes and filter entities via TOML
pub fn run() -> Result<()> {
    support::init_logging();
    let options = SnapshotConfig::from_toml_str(CONFIG)?.options()?;
    let mut context = ManagedObjectContext::new();

    let article_id = context.insert(&support::article("Changelog"))?;
    context.insert(&support::tag("meta"))?;
    let snapshot = ContextSnapshot::with_options(&context, &options);
    assert_eq!(snapshot.insertions().len(), 1, "tags are filtered out");
    context.save();

    // Only the timestamp moved: nothing worth recording.
    context.set_attribute(&article_id, "updated_at", Utc::now() + Duration::minutes(5))?;
    assert!(ContextSnapshot::with_options(&context, &options).is_empty());
    assert_eq!(ContextSnapshot::new(&context).changes().len(), 1);

    context.set_attribute(&article_id, "rating", 5)?;
    let snapshot = ContextSnapshot::with_options(&context, &options);
    assert_eq!(snapshot.changes().len(), 1);
    assert_eq!(snapshot.changes()[0].changed_attribute_names(), ["rating"]);
    Ok(())
}
