//! Core repository components
//!
//! This module contains the on-disk parts of a Git repository the comparison
//! engine reads from:
//!
//! - `database`: Loose object database for blobs, trees, commits and tags
//! - `refs`: Reference lookup (HEAD, branches, tags, remotes, packed refs)
//! - `repository`: Ties the areas together and serves them to the engine

pub mod database;
pub mod refs;
pub mod repository;
