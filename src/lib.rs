//! Read-only repository comparison engine
//!
//! Given a combined revision expression such as `main...feature` or `v1.0..HEAD`,
//! the engine resolves both endpoints, computes the merge base when the comparison
//! is ancestry-relative, enumerates the commits unique to the head side and
//! optionally enriches each one with diff statistics, changed paths and signature
//! verification.
//!
//! - `areas`: the on-disk repository (object database, refs, repository handle)
//! - `artifacts`: data structures and algorithms (objects, revisions, merge base,
//!   commit ranges, tree diffs, identities, signatures, the comparison engine)
//! - `commands`: the `compare` command rendering a comparison for the CLI

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod logging;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
