//! Timing utilities.
//!
//! The load pipeline is timed unconditionally through [`ScopedTimer`]; query
//! hot paths are instrumented with [`profile_scope!`], which compiles to
//! nothing unless the `profiling` feature is enabled.
//!
//! ```ignore
//! use co2board::profile_scope;
//!
//! fn top_bottom(...) {
//!     profile_scope!("top_bottom");
//!     // ... work ...
//! }
//! ```

use std::time::Instant;
use tracing::{debug, warn};

/// Threshold used by [`profile_scope!`] when none is given
pub const PROFILING_THRESHOLD_MS: f64 = 1.0;

/// Time a scope with the given name. Zero-cost when profiling is disabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $crate::perf::PROFILING_THRESHOLD_MS);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
    ($name:expr, $threshold_ms:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $threshold_ms);
        #[cfg(not(feature = "profiling"))]
        let _ = ($name, $threshold_ms);
    };
}

/// RAII timer: logs the elapsed time of its scope when dropped.
///
/// Anything slower than `threshold_ms` is logged at warn level, the rest at
/// debug level.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
}

impl ScopedTimer {
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Elapsed time so far, without stopping the timer
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    pub fn is_over_threshold(&self) -> bool {
        self.elapsed_ms() > self.threshold_ms
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        if elapsed_ms > self.threshold_ms {
            warn!(
                operation = self.name,
                elapsed_ms = %format!("{elapsed_ms:.2}"),
                threshold_ms = self.threshold_ms,
                "Slow operation"
            );
        } else {
            debug!(
                operation = self.name,
                elapsed_ms = %format!("{elapsed_ms:.2}"),
                "Operation finished"
            );
        }
    }
}
