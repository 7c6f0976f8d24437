//! Log output of the bridge
//!
//! The bridge only emits `tracing` events. [`init`] installs a formatting
//! subscriber for embedders that have none, filtered by `CHEMMISOL_LOG`.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

/// Filter directives of the installed subscriber
pub const LOG_ENV: &str = "CHEMMISOL_LOG";

const DEFAULT_FILTER: &str = "info";

static INIT: OnceCell<()> = OnceCell::new();

/// Install the bridge subscriber, once per process.
///
/// Does nothing when another global subscriber is already installed.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}
