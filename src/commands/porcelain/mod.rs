//! Porcelain commands (user-facing operations)
//!
//! ## Commands
//!
//! - `compare`: Compare two revisions and print the commits unique to the head side

pub mod compare;
