//! In-memory managed object context.
//!
//! Tracks described entities and their pending inserts, updates and deletes
//! the way a host persistence framework would, without storing anything.
//! Useful as a test double for code that snapshots a real context.

mod object;

use std::cell::Cell;
use std::collections::HashMap;
use std::marker::PhantomData;

pub use object::{ObjectState, TrackedObject};

use crate::context::{ExecutionContext, PersistenceContext};
use crate::errors::{ContextError, ContextResult};
use crate::id::ObjectId;
use crate::registry::DescriptorRegistry;
use crate::types::{EntityDescriptor, EntityMetadata};
use crate::value::AttributeValue;

/// Counts of objects written by [`ManagedObjectContext::save`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl SaveSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }
}

/// A persistence context confined to the thread that created it.
///
/// The context can be moved to another thread but not shared; snapshots taken
/// after a move fail the confinement check.
#[derive(Debug)]
pub struct ManagedObjectContext {
    owner: ExecutionContext,
    registry: DescriptorRegistry,
    objects: HashMap<ObjectId, TrackedObject>,
    inserted: Vec<ObjectId>,
    updated: Vec<ObjectId>,
    deleted: Vec<ObjectId>,
    _not_sync: PhantomData<Cell<()>>,
}

impl Default for ManagedObjectContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ManagedObjectContext {
    pub fn new() -> Self {
        Self {
            owner: ExecutionContext::current(),
            registry: DescriptorRegistry::new(),
            objects: HashMap::new(),
            inserted: Vec::new(),
            updated: Vec::new(),
            deleted: Vec::new(),
            _not_sync: PhantomData,
        }
    }

    /// Starts tracking a new object; it stays a pending insert until saved.
    pub fn insert<T: EntityMetadata>(&mut self, entity: &T) -> ContextResult<ObjectId> {
        let descriptor = T::entity_descriptor();
        let attributes = descriptor.describe(entity)?;
        self.registry.register(descriptor);

        let object_id = ObjectId::generate();
        self.objects
            .insert(object_id.clone(), TrackedObject::inserted(object_id.clone(), T::ENTITY_NAME, attributes));
        self.inserted.push(object_id.clone());
        log::debug!("inserted {}[{}]", T::ENTITY_NAME, object_id);
        Ok(object_id)
    }

    /// Replaces every attribute of a tracked object with the values of `entity`.
    ///
    /// The object counts as updated even when no value changes.
    pub fn update<T: EntityMetadata>(&mut self, object_id: &ObjectId, entity: &T) -> ContextResult<()> {
        let descriptor = T::entity_descriptor();
        let attributes = descriptor.describe(entity)?;

        let object = live_object_mut(&mut self.objects, object_id)?;
        if object.entity_name != T::ENTITY_NAME {
            return Err(ContextError::EntityMismatch {
                expected: object.entity_name.clone(),
                found: T::ENTITY_NAME.to_string(),
            });
        }
        object.current = attributes;
        self.registry.register(descriptor);
        self.mark_updated(object_id);
        Ok(())
    }

    /// Sets one attribute after checking it against the entity's descriptor.
    pub fn set_attribute(
        &mut self,
        object_id: &ObjectId,
        name: &str,
        value: impl Into<AttributeValue>,
    ) -> ContextResult<()> {
        let value = value.into();
        let object = live_object_mut(&mut self.objects, object_id)?;
        let descriptor = self
            .registry
            .get(&object.entity_name)
            .ok_or_else(|| ContextError::UnknownAttribute {
                entity: object.entity_name.clone(),
                attribute: name.to_string(),
            })?;
        descriptor.check(name, &value)?;
        object.current.insert(name.to_string(), value);
        self.mark_updated(object_id);
        Ok(())
    }

    /// Marks an object for deletion. Unsaved inserts are forgotten outright.
    pub fn delete(&mut self, object_id: &ObjectId) -> ContextResult<()> {
        let state = live_object_mut(&mut self.objects, object_id)?.state;
        match state {
            ObjectState::PendingInsert => {
                self.objects.remove(object_id);
                self.inserted.retain(|id| id != object_id);
            }
            ObjectState::Clean | ObjectState::PendingUpdate => {
                if let Some(object) = self.objects.get_mut(object_id) {
                    object.state = ObjectState::PendingDelete;
                }
                self.updated.retain(|id| id != object_id);
                self.deleted.push(object_id.clone());
            }
            ObjectState::PendingDelete => {
                return Err(ContextError::ObjectDeleted {
                    object_id: object_id.clone(),
                });
            }
        }
        log::debug!("deleted {object_id}");
        Ok(())
    }

    /// Commits every pending change and clears the dirty sets.
    pub fn save(&mut self) -> SaveSummary {
        let summary = SaveSummary {
            inserted: self.inserted.len(),
            updated: self.updated.len(),
            deleted: self.deleted.len(),
        };

        for object_id in self.inserted.drain(..).chain(self.updated.drain(..)) {
            if let Some(object) = self.objects.get_mut(&object_id) {
                object.commit();
            }
        }
        for object_id in self.deleted.drain(..) {
            self.objects.remove(&object_id);
        }

        log::debug!(
            "saved context: {} inserted, {} updated, {} deleted",
            summary.inserted,
            summary.updated,
            summary.deleted
        );
        summary
    }

    /// Discards every pending change, restoring committed values.
    pub fn rollback(&mut self) {
        for object_id in self.inserted.drain(..) {
            self.objects.remove(&object_id);
        }
        for object_id in self.updated.drain(..).chain(self.deleted.drain(..)) {
            if let Some(object) = self.objects.get_mut(&object_id) {
                object.revert();
            }
        }
        log::debug!("rolled back context");
    }

    /// Drops every object and registered descriptor.
    pub fn wipe_all_data(&mut self) {
        self.objects.clear();
        self.inserted.clear();
        self.updated.clear();
        self.deleted.clear();
        self.registry.clear();
        log::debug!("wiped context");
    }

    /// Looks up a tracked object, including ones pending deletion.
    pub fn get(&self, object_id: &ObjectId) -> Option<&TrackedObject> {
        self.objects.get(object_id)
    }

    pub fn descriptor(&self, entity_name: &str) -> Option<&EntityDescriptor> {
        self.registry.get(entity_name)
    }

    pub fn registry(&self) -> &DescriptorRegistry {
        &self.registry
    }

    /// Number of objects not pending deletion.
    pub fn len(&self) -> usize {
        self.objects
            .values()
            .filter(|object| object.state != ObjectState::PendingDelete)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_changes(&self) -> bool {
        !(self.inserted.is_empty() && self.updated.is_empty() && self.deleted.is_empty())
    }

    fn mark_updated(&mut self, object_id: &ObjectId) {
        if let Some(object) = self.objects.get_mut(object_id) {
            if object.state == ObjectState::Clean {
                object.state = ObjectState::PendingUpdate;
                self.updated.push(object_id.clone());
            }
        }
    }

    fn bucket<'a>(&'a self, ids: &'a [ObjectId]) -> impl Iterator<Item = &'a TrackedObject> {
        ids.iter().filter_map(|id| self.objects.get(id))
    }
}

fn live_object_mut<'a>(
    objects: &'a mut HashMap<ObjectId, TrackedObject>,
    object_id: &ObjectId,
) -> ContextResult<&'a mut TrackedObject> {
    let object = objects.get_mut(object_id).ok_or_else(|| ContextError::ObjectNotFound {
        object_id: object_id.clone(),
    })?;
    if object.state == ObjectState::PendingDelete {
        return Err(ContextError::ObjectDeleted {
            object_id: object_id.clone(),
        });
    }
    Ok(object)
}

impl PersistenceContext for ManagedObjectContext {
    type Object = TrackedObject;

    fn execution_context(&self) -> ExecutionContext {
        self.owner
    }

    fn inserted_objects(&self) -> impl Iterator<Item = &TrackedObject> {
        self.bucket(&self.inserted)
    }

    fn updated_objects(&self) -> impl Iterator<Item = &TrackedObject> {
        self.bucket(&self.updated)
    }

    fn deleted_objects(&self) -> impl Iterator<Item = &TrackedObject> {
        self.bucket(&self.deleted)
    }
}
