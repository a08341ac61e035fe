//! Core orchestration logic
//!
//! Selection resolution, plan finalization, plug-in ordering, and phase
//! sequencing. This module performs no I/O of its own; side effects happen
//! behind the collaborator traits it drives.

pub mod axes;
pub mod ordering;
pub mod plan;
pub mod report;
pub mod selection;
pub mod sequencer;
