//! Data core of a per-capita CO₂ emissions dashboard.
//!
//! Loads the emissions dataset and a country roster once, classifies
//! entities into countries and regions, and answers the three chart queries
//! the dashboard views need. Rendering and UI controls live in the shell
//! that embeds this crate; it feeds [`selection::SelectionEvent`]s in and
//! receives chart payloads out.
//!
//! ```ignore
//! let config = DashboardConfig::load_or_default(&path)?;
//! let cache = Arc::new(DatasetCache::from_config(&config)?);
//! let mut view = TimeSeriesView::time_series(cache.clone(), &config)?;
//! let chart = view.load().await?;
//! ```

pub mod config;
pub mod constants;
pub mod data;
pub mod logging;
pub mod perf;
pub mod selection;
pub mod types;
pub mod views;

pub use config::DashboardConfig;
pub use data::{DataError, DataResult, DatasetCache};
pub use views::{RegionalComparisonView, TimeSeriesView, TopBottomView};
