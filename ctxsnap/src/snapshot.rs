use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use crate::change::{ChangeRecord, diff_attributes};
use crate::config::SnapshotOptions;
use crate::context::{ManagedObject, PersistenceContext};
use crate::errors::SnapshotError;
use crate::value::Attributes;

/// Point-in-time view of a persistence context's pending changes.
///
/// The snapshot borrows the context it was built from, so the context cannot
/// be saved or mutated until the snapshot is dropped. It must be built on the
/// thread that owns the context; [`ContextSnapshot::try_new`] checks this,
/// [`ContextSnapshot::new`] only asserts it in debug builds.
///
/// ```
/// use ctxsnap::{ContextSnapshot, Describable, ManagedObjectContext};
///
/// #[derive(Describable)]
/// struct Note {
///     text: String,
/// }
///
/// let mut context = ManagedObjectContext::new();
/// context.insert(&Note { text: "hello".into() }).unwrap();
///
/// let snapshot = ContextSnapshot::new(&context);
/// assert_eq!(snapshot.insertions().len(), 1);
/// assert!(snapshot.changes().is_empty());
/// ```
pub struct ContextSnapshot<'ctx, C: PersistenceContext> {
    context: &'ctx C,
    taken_at: DateTime<Utc>,
    insertions: Vec<ChangeRecord>,
    changes: Vec<ChangeRecord>,
    deletions: Vec<ChangeRecord>,
}

impl<'ctx, C: PersistenceContext> ContextSnapshot<'ctx, C> {
    /// Captures the context's pending changes with default options.
    ///
    /// Must be called on the thread that owns the context. Debug builds panic
    /// when it is not; use [`ContextSnapshot::try_new`] to get an error instead.
    pub fn new(context: &'ctx C) -> Self {
        Self::with_options(context, &SnapshotOptions::default())
    }

    /// Like [`ContextSnapshot::new`], applying `options`. Panics in debug
    /// builds when called off the owning thread.
    pub fn with_options(context: &'ctx C, options: &SnapshotOptions) -> Self {
        debug_assert!(
            context.execution_context().is_current(),
            "persistence context snapshotted outside its owning thread"
        );
        Self::capture(context, options)
    }

    pub fn try_new(context: &'ctx C) -> Result<Self, SnapshotError> {
        Self::try_with_options(context, &SnapshotOptions::default())
    }

    pub fn try_with_options(context: &'ctx C, options: &SnapshotOptions) -> Result<Self, SnapshotError> {
        let owner = context.execution_context();
        if !owner.is_current() {
            return Err(SnapshotError::ForeignExecutionContext {
                owner: owner.thread_id(),
                current: std::thread::current().id(),
            });
        }
        Ok(Self::capture(context, options))
    }

    fn capture(context: &'ctx C, options: &SnapshotOptions) -> Self {
        let taken_at = Utc::now();

        let insertions: Vec<ChangeRecord> = context
            .inserted_objects()
            .filter(|object| options.includes_entity(object.entity_name()))
            .map(ChangeRecord::insertion)
            .collect();

        let changes: Vec<ChangeRecord> = context
            .updated_objects()
            .filter(|object| options.includes_entity(object.entity_name()))
            .filter_map(|object| update_record(object, options))
            .collect();

        let deletions: Vec<ChangeRecord> = context
            .deleted_objects()
            .filter(|object| options.includes_entity(object.entity_name()))
            .map(ChangeRecord::deletion)
            .collect();

        log::debug!(
            "captured context snapshot: {} insertions, {} changes, {} deletions",
            insertions.len(),
            changes.len(),
            deletions.len()
        );

        Self {
            context,
            taken_at,
            insertions,
            changes,
            deletions,
        }
    }

    pub fn context(&self) -> &'ctx C {
        self.context
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub fn insertions(&self) -> &[ChangeRecord] {
        &self.insertions
    }

    pub fn changes(&self) -> &[ChangeRecord] {
        &self.changes
    }

    pub fn deletions(&self) -> &[ChangeRecord] {
        &self.deletions
    }

    /// Insertions, then changes, then deletions.
    pub fn records(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.insertions.iter().chain(&self.changes).chain(&self.deletions)
    }

    pub fn records_for<'a>(&'a self, entity_name: &'a str) -> impl Iterator<Item = &'a ChangeRecord> {
        self.records().filter(move |record| record.entity_name() == entity_name)
    }

    pub fn len(&self) -> usize {
        self.insertions.len() + self.changes.len() + self.deletions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether both snapshots hold the same records, ignoring timestamps.
    pub fn same_changes_as<D: PersistenceContext>(&self, other: &ContextSnapshot<'_, D>) -> bool {
        fn same(left: &[ChangeRecord], right: &[ChangeRecord]) -> bool {
            left.len() == right.len() && left.iter().zip(right).all(|(a, b)| a.same_change_as(b))
        }
        same(&self.insertions, &other.insertions)
            && same(&self.changes, &other.changes)
            && same(&self.deletions, &other.deletions)
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

fn update_record<O: ManagedObject>(object: &O, options: &SnapshotOptions) -> Option<ChangeRecord> {
    let current = object.current_attributes();
    let committed: Cow<'_, Attributes> = object.committed_attributes().unwrap_or_default();
    let (initial, changed) = diff_attributes(&committed, &current, |name| options.ignores_attribute(name));

    if changed.is_empty() && options.skips_unchanged_updates() {
        log::trace!(
            "skipping {}[{}]: no attribute differs from the committed state",
            object.entity_name(),
            object.object_id()
        );
        return None;
    }
    Some(ChangeRecord::update(object, initial, changed))
}

impl<C: PersistenceContext> Serialize for ContextSnapshot<'_, C> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ContextSnapshot", 4)?;
        state.serialize_field("taken_at", &self.taken_at)?;
        state.serialize_field("insertions", &self.insertions)?;
        state.serialize_field("changes", &self.changes)?;
        state.serialize_field("deletions", &self.deletions)?;
        state.end()
    }
}

impl<C: PersistenceContext> std::fmt::Debug for ContextSnapshot<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextSnapshot")
            .field("taken_at", &self.taken_at)
            .field("insertions", &self.insertions)
            .field("changes", &self.changes)
            .field("deletions", &self.deletions)
            .finish_non_exhaustive()
    }
}
