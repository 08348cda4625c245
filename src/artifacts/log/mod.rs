//! Commit history traversal
//!
//! - `commit_graph`: Arena of commits loaded during one comparison
//! - `rev_list`: Commit range enumeration (`boundary..head`)
//!
//! ## Algorithm
//!
//! Everything reachable from the boundary is collected first. The walk from
//! head then stops at any member of that set, and the surviving commits are
//! emitted newest first in topological order.

pub mod commit_graph;
pub mod rev_list;
