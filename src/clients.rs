//! Integration layers for the external tools `changeflow` drives.
//!
//! - [`runner`]: spawns a command and normalises every outcome into a [`runner::CommandOutput`]
//! - [`git`]: one method per git invocation the workflow issues, built on top of the runner
//!
//! The runner is a trait so the workflow can be exercised without touching a
//! real repository.

pub mod git;
pub mod runner;
