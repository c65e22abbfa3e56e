//! The seam between a host persistence framework and the snapshot.
//!
//! A host exposes its pending changes through [`PersistenceContext`] and each
//! tracked object through [`ManagedObject`]. Contexts are confined to the
//! thread that created them; [`ExecutionContext`] records that thread so the
//! confinement rule can be checked.

use std::borrow::Cow;
use std::thread::{self, ThreadId};

use crate::id::ObjectId;
use crate::value::Attributes;

/// The execution context (thread) that owns a persistence context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExecutionContext {
    thread: ThreadId,
}

impl ExecutionContext {
    /// Captures the calling thread.
    pub fn current() -> Self {
        Self {
            thread: thread::current().id(),
        }
    }

    pub fn thread_id(&self) -> ThreadId {
        self.thread
    }

    /// Whether the caller is running on the owning thread.
    pub fn is_current(&self) -> bool {
        self.thread == thread::current().id()
    }
}

/// An object tracked by a persistence context.
pub trait ManagedObject {
    fn object_id(&self) -> ObjectId;

    fn entity_name(&self) -> &str;

    /// In-memory attribute values, including unsaved edits.
    fn current_attributes(&self) -> Cow<'_, Attributes>;

    /// Attribute values as of the last save, `None` if never saved.
    fn committed_attributes(&self) -> Option<Cow<'_, Attributes>>;
}

/// A persistence context whose pending changes can be snapshotted.
///
/// Each iterator yields objects in the order the context tracks them.
/// Implementations must not change state while being read.
pub trait PersistenceContext {
    type Object: ManagedObject;

    fn execution_context(&self) -> ExecutionContext;

    fn inserted_objects(&self) -> impl Iterator<Item = &Self::Object>;

    fn updated_objects(&self) -> impl Iterator<Item = &Self::Object>;

    fn deleted_objects(&self) -> impl Iterator<Item = &Self::Object>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_context_tracks_creating_thread() {
        let owner = ExecutionContext::current();
        assert!(owner.is_current());

        let seen_elsewhere = thread::spawn(move || owner.is_current()).join().unwrap();
        assert!(!seen_elsewhere);
    }
}
