//! Logging initialization
//!
//! Events go to stderr so that stdout stays parseable when the comparison is
//! printed as JSON. The filter is read from `BIT_COMPARE_LOG` (same syntax as
//! `RUST_LOG`) and defaults to warnings only.

use std::sync::Once;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "BIT_COMPARE_LOG";

const DEFAULT_FILTER: &str = "bit_compare=warn";
const VERBOSE_FILTER: &str = "bit_compare=debug";

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber; later calls are no-ops
///
/// `verbose` raises the default level to `debug` when no filter is set in
/// the environment.
pub fn init(verbose: bool) {
    INIT_ONCE.call_once(|| {
        let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

        // another subscriber may already be installed by an embedding application
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .finish()
            .try_init();
    });
}
