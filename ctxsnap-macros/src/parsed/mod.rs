mod entity;
mod field;
mod types;

pub(crate) use entity::ParsedEntity;
