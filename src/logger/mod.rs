//! Bootstraps a `tracing` subscriber at `info` and swaps in the configured
//! filter once settings are loaded.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
