//! Command implementations
//!
//! - `porcelain`: User-facing commands built on the comparison engine

pub mod porcelain;
