use anyhow::Result;
use serde_json::Value;

use super::support;
use crate::{ContextSnapshot, ManagedObjectContext};

/// Example 04 – snapshot before every save to build an audit trail
pub fn run() -> Result<()> {
    support::init_logging();
    let mut context = ManagedObjectContext::new();
    let mut trail: Vec<Value> = Vec::new();

    let mut article = support::article("Release notes");
    let article_id = context.insert(&article)?;
    let tag_id = context.insert(&support::tag("news"))?;
    trail.push(ContextSnapshot::new(&context).to_json()?);
    context.save();

    article.tags = vec!["news".to_string(), "release".to_string()];
    context.update(&article_id, &article)?;
    trail.push(ContextSnapshot::new(&context).to_json()?);
    context.save();

    context.delete(&tag_id)?;
    trail.push(ContextSnapshot::new(&context).to_json()?);
    let summary = context.save();
    assert_eq!(summary.deleted, 1);

    assert_eq!(trail.len(), 3);
    assert_eq!(trail[0]["insertions"].as_array().map(Vec::len), Some(2));
    assert_eq!(trail[1]["changes"][0]["change_type"], "update");
    assert_eq!(
        trail[1]["changes"][0]["changed_attributes"]["tags"]["value"],
        serde_json::json!(["news", "release"])
    );
    assert_eq!(trail[2]["deletions"][0]["entity_name"], "Label");
    assert!(context.len() == 1 && !context.has_changes());
    Ok(())
}
