//! Repository comparison
//!
//! - `cancel`: Cooperative cancellation of a running comparison
//! - `engine`: Orchestrates resolution, merge base, range and enrichment
//! - `enricher`: Per-commit statistics, paths and signature status
//! - `error`: Errors that abort a comparison
//! - `handle`: Read-only repository interface the engine runs against
//! - `refspec`: Parsing of `base...head` / `base..head` expressions
//! - `result`: The aggregate result and its serialized form
//!
//! ## Phases
//!
//! 1. Split the expression and resolve both sides to commits
//! 2. For `...` comparisons, compute the merge base of the two sides
//! 3. Enumerate the commits reachable from head but not from the boundary
//!    (the base commit, or every merge base)
//! 4. When the commit list is requested, enrich each commit concurrently
//!
//! An empty merge base is not an error: the range falls back to the whole
//! history of head and the result reports the histories as unrelated.

pub mod cancel;
pub mod engine;
pub mod enricher;
pub mod error;
pub mod handle;
pub mod refspec;
pub mod result;
