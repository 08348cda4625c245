//! Author identity resolution
//!
//! - `account`: Account records and the directory that looks them up
//! - `identity_cache`: Request-scoped memoization of directory lookups

pub mod account;
pub mod identity_cache;
