//! Tracing subscriber setup for shells embedding the crate.

use crate::data::{DataError, DataResult};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Default filter: crate at info, everything else at warn
pub const DEFAULT_DIRECTIVES: &str = "warn,co2board=info";

/// Install a fmt subscriber filtered by `directives` (e.g. `"co2board=debug"`).
///
/// Returns `Ok(false)` if a global subscriber was already installed, so
/// calling this more than once is harmless.
pub fn init_logging(directives: &str) -> DataResult<bool> {
    let filter = EnvFilter::try_new(directives)
        .map_err(|e| DataError::Config(format!("invalid log directives '{directives}': {e}")))?;

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok();

    Ok(installed)
}
