//! Incremental scanning of the citizen table and publication of its results.
//!
//! [`Scanner`] owns the write side: the classified citizens and building
//! accumulators of the pass in progress. [`SnapshotBuffer`] owns the read
//! side: the last complete [`Snapshot`], swapped in whole when a pass ends.

pub use self::{scanner::*, snapshot::*};

mod scanner;
mod snapshot;
