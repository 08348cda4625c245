//! Database entry types
//!
//! This module contains types used when reading trees from the database.
//! Database entries represent references to objects with their mode/type information.

pub mod database_entry;
