//! Merge base computation
//!
//! - `bca_finder`: Best common ancestors of two commits

pub mod bca_finder;
