//! Runnable walkthroughs of the snapshot API.
//!
//! Each example drives a [`ManagedObjectContext`](crate::ManagedObjectContext)
//! through a small scenario and checks the resulting change records.

pub mod support;

pub mod ex01_recording_insertions;
pub mod ex02_diffing_updates;
pub mod ex03_deletions_and_rollback;
pub mod ex04_audit_trail;
pub mod ex05_configured_snapshots;

use anyhow::Result;

/// Run all examples in sequence.
pub fn run_all() -> Result<()> {
    println!("=== Snapshot Examples ===\n");

    println!("01. Recording insertions...");
    ex01_recording_insertions::run()?;
    println!("    ✓ passed\n");

    println!("02. Diffing updates...");
    ex02_diffing_updates::run()?;
    println!("    ✓ passed\n");

    println!("03. Deletions and rollback...");
    ex03_deletions_and_rollback::run()?;
    println!("    ✓ passed\n");

    println!("04. Audit trail across saves...");
    ex04_audit_trail::run()?;
    println!("    ✓ passed\n");

    println!("05. Configured snapshots...");
    ex05_configured_snapshots::run()?;
    println!("    ✓ passed\n");

    println!("=== All Snapshot Examples Passed ===");
    Ok(())
}
