//! Git data structures and algorithms
//!
//! This module contains the core types and algorithms used by a comparison:
//!
//! - `branch`: Branch names and revision parsing
//! - `compare`: Comparison engine, commit enrichment and the aggregate result
//! - `database`: Database entry types
//! - `diff`: Tree diffing and line statistics
//! - `identity`: Account records and the request-scoped identity cache
//! - `log`: Commit graph arena and commit range enumeration
//! - `merge`: Merge base computation
//! - `objects`: Git object types (blob, tree, commit, tag)
//! - `signature`: Commit signature extraction and SSH signature verification

pub mod branch;
pub mod compare;
pub mod database;
pub mod diff;
pub mod identity;
pub mod log;
pub mod merge;
pub mod objects;
pub mod signature;

#[cfg(test)]
pub(crate) mod testing;
