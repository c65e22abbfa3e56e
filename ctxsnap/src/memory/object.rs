use std::borrow::Cow;

use crate::context::ManagedObject;
use crate::id::ObjectId;
use crate::value::{AttributeValue, Attributes};

/// Where an object stands relative to the last save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    /// Matches the committed state.
    Clean,
    PendingInsert,
    PendingUpdate,
    PendingDelete,
}

/// An object tracked by [`ManagedObjectContext`](super::ManagedObjectContext).
#[derive(Debug, Clone)]
pub struct TrackedObject {
    pub(super) id: ObjectId,
    pub(super) entity_name: String,
    pub(super) committed: Option<Attributes>,
    pub(super) current: Attributes,
    pub(super) state: ObjectState,
}

impl TrackedObject {
    pub(super) fn inserted(id: ObjectId, entity_name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id,
            entity_name: entity_name.into(),
            committed: None,
            current: attributes,
            state: ObjectState::PendingInsert,
        }
    }

    pub(super) fn commit(&mut self) {
        self.committed = Some(self.current.clone());
        self.state = ObjectState::Clean;
    }

    pub(super) fn revert(&mut self) {
        self.current = self.committed.clone().unwrap_or_default();
        self.state = ObjectState::Clean;
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn state(&self) -> ObjectState {
        self.state
    }

    pub fn attributes(&self) -> &Attributes {
        &self.current
    }

    pub fn committed(&self) -> Option<&Attributes> {
        self.committed.as_ref()
    }

    pub fn value(&self, name: &str) -> Option<&AttributeValue> {
        self.current.get(name)
    }

    pub fn has_pending_changes(&self) -> bool {
        self.state != ObjectState::Clean
    }
}

impl ManagedObject for TrackedObject {
    fn object_id(&self) -> ObjectId {
        self.id.clone()
    }

    fn entity_name(&self) -> &str {
        &self.entity_name
    }

    fn current_attributes(&self) -> Cow<'_, Attributes> {
        Cow::Borrowed(&self.current)
    }

    fn committed_attributes(&self) -> Option<Cow<'_, Attributes>> {
        self.committed.as_ref().map(Cow::Borrowed)
    }
}
