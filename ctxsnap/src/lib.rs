//! ctxsnap: point-in-time change snapshots of an object-graph persistence context.
//!
//! A [`ContextSnapshot`] reads a context's pending inserts, updates and deletes
//! and turns each object into an immutable [`ChangeRecord`]. Hosts plug in by
//! implementing [`PersistenceContext`]; [`ManagedObjectContext`] is an
//! in-memory implementation for tests and examples.

extern crate self as ctxsnap;

pub mod change;
pub mod config;
pub mod context;
pub mod errors;
pub mod examples;
pub mod id;
pub mod memory;
pub mod registry;
pub mod snapshot;
pub mod types;
pub mod value;

pub use change::{ChangeRecord, ChangeType};
pub use config::{SnapshotConfig, SnapshotOptions};
pub use context::{ExecutionContext, ManagedObject, PersistenceContext};
pub use ctxsnap_macros::Describable;
pub use errors::*;
pub use id::ObjectId;
pub use memory::{ManagedObjectContext, ObjectState, SaveSummary, TrackedObject};
pub use registry::DescriptorRegistry;
pub use snapshot::ContextSnapshot;
pub use types::{AttributeDescriptor, Describable, EntityDescriptor, EntityMetadata};
pub use value::{AttributeKind, AttributeValue, Attributes};
