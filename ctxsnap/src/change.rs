//! Immutable records describing one object's pending change.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::ManagedObject;
use crate::id::ObjectId;
use crate::value::{AttributeValue, Attributes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Insertion,
    Update,
    Deletion,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeType::Insertion => "insert",
            ChangeType::Update => "update",
            ChangeType::Deletion => "delete",
        };
        f.write_str(label)
    }
}

/// One object's insertion, update or deletion, captured at snapshot time.
///
/// Insertions carry no initial attributes and deletions no changed attributes.
/// Updates carry the same attribute names on both sides, limited to the
/// attributes whose values differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    timestamp: DateTime<Utc>,
    object_id: ObjectId,
    entity_name: String,
    change_type: ChangeType,
    initial_attributes: Attributes,
    changed_attributes: Attributes,
}

impl ChangeRecord {
    fn new<O: ManagedObject + ?Sized>(
        object: &O,
        change_type: ChangeType,
        initial_attributes: Attributes,
        changed_attributes: Attributes,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            object_id: object.object_id(),
            entity_name: object.entity_name().to_string(),
            change_type,
            initial_attributes,
            changed_attributes,
        }
    }

    pub(crate) fn insertion<O: ManagedObject + ?Sized>(object: &O) -> Self {
        let changed = object.current_attributes().into_owned();
        Self::new(object, ChangeType::Insertion, Attributes::new(), changed)
    }

    /// Falls back to the current values when the context never committed the object.
    pub(crate) fn deletion<O: ManagedObject + ?Sized>(object: &O) -> Self {
        let initial = match object.committed_attributes() {
            Some(committed) => committed.into_owned(),
            None => object.current_attributes().into_owned(),
        };
        Self::new(object, ChangeType::Deletion, initial, Attributes::new())
    }

    pub(crate) fn update<O: ManagedObject + ?Sized>(object: &O, initial: Attributes, changed: Attributes) -> Self {
        Self::new(object, ChangeType::Update, initial, changed)
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn object_id(&self) -> &ObjectId {
        &self.object_id
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn change_type(&self) -> ChangeType {
        self.change_type
    }

    pub fn initial_attributes(&self) -> &Attributes {
        &self.initial_attributes
    }

    pub fn changed_attributes(&self) -> &Attributes {
        &self.changed_attributes
    }

    pub fn is_insertion(&self) -> bool {
        self.change_type == ChangeType::Insertion
    }

    pub fn is_update(&self) -> bool {
        self.change_type == ChangeType::Update
    }

    pub fn is_deletion(&self) -> bool {
        self.change_type == ChangeType::Deletion
    }

    /// Names of every attribute the record mentions, sorted.
    pub fn changed_attribute_names(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self
            .initial_attributes
            .keys()
            .chain(self.changed_attributes.keys())
            .map(String::as_str)
            .collect();
        names.into_iter().collect()
    }

    /// Compares everything except the timestamp.
    pub fn same_change_as(&self, other: &ChangeRecord) -> bool {
        self.object_id == other.object_id
            && self.entity_name == other.entity_name
            && self.change_type == other.change_type
            && self.initial_attributes == other.initial_attributes
            && self.changed_attributes == other.changed_attributes
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}[{}]", self.change_type, self.entity_name, self.object_id)?;
        let mut separator = ": ";
        for name in self.changed_attribute_names() {
            let before = self.initial_attributes.get(name);
            let after = self.changed_attributes.get(name);
            f.write_str(separator)?;
            match (before, after) {
                (Some(before), Some(after)) => write!(f, "{name} {before} -> {after}")?,
                (None, Some(after)) => write!(f, "{name}={after}")?,
                (Some(before), None) => write!(f, "{name}={before}")?,
                (None, None) => write!(f, "{name}={}", AttributeValue::Null)?,
            }
            separator = ", ";
        }
        Ok(())
    }
}

/// Splits two attribute maps into the values that differ.
///
/// Names missing on one side compare as `Null`. Both returned maps share the
/// same key set.
pub(crate) fn diff_attributes(
    committed: &Attributes,
    current: &Attributes,
    ignored: impl Fn(&str) -> bool,
) -> (Attributes, Attributes) {
    let names: BTreeSet<&String> = committed.keys().chain(current.keys()).collect();
    let mut initial = Attributes::new();
    let mut changed = Attributes::new();

    for name in names {
        if ignored(name.as_str()) {
            continue;
        }
        let before = committed.get(name).cloned().unwrap_or_default();
        let after = current.get(name).cloned().unwrap_or_default();
        if before != after {
            initial.insert(name.clone(), before);
            changed.insert(name.clone(), after);
        }
    }

    (initial, changed)
}
