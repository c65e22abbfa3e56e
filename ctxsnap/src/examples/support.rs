use chrono::{DateTime, Utc};

use crate::Describable;

/// Initialise `env_logger` once; repeated calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, Describable)]
pub struct Article {
    pub title: String,
    pub rating: i64,
    pub summary: Option<String>,
    #[ctxsnap(json)]
    pub tags: Vec<String>,
    pub cover: Vec<u8>,
    pub updated_at: DateTime<Utc>,
    #[ctxsnap(skip)]
    pub rendered: Option<String>,
}

#[derive(Debug, Clone, Describable)]
#[ctxsnap(entity = "Label")]
pub struct Tag {
    #[ctxsnap(rename = "label")]
    pub name: String,
    pub weight: f64,
}

pub fn article(title: &str) -> Article {
    Article {
        title: title.to_string(),
        rating: 0,
        summary: None,
        tags: Vec::new(),
        cover: Vec::new(),
        updated_at: Utc::now(),
        rendered: None,
    }
}

pub fn tag(name: &str) -> Tag {
    Tag {
        name: name.to_string(),
        weight: 1.0,
    }
}
