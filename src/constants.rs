//! Crate-wide constants.
//!
//! Centralizes the dataset rules, selection caps and display values so the
//! parser, guard and query engine agree on them.

// ============================================================================
// Dataset Rules
// ============================================================================

/// Earliest year kept by the record parser
pub const MIN_YEAR: i32 = 1900;

/// Default header of the entity column
pub const ENTITY_COLUMN: &str = "Entity";

/// Default header of the year column
pub const YEAR_COLUMN: &str = "Year";

/// Default header of the per-capita emissions column
pub const EMISSIONS_COLUMN: &str = "Annual CO₂ emissions (per capita)";

/// Fallback fragment used to find the emissions column when the exact header is absent
pub const EMISSIONS_COLUMN_HINT: &str = "per capita";

// ============================================================================
// Sources
// ============================================================================

/// Default location of the emissions dataset
pub const DEFAULT_DATASET_LOCATION: &str = "assets/data/co2_emissions.csv";

/// Default location of the country roster
pub const DEFAULT_ROSTER_LOCATION: &str = "https://restcountries.com/v3.1/all";

/// Default HTTP timeout for both fetches
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Selection Limits
// ============================================================================

/// Maximum simultaneous entities in the time series view
pub const MAX_SERIES_ENTITIES: usize = 5;

/// Maximum combined countries + regions in the regional comparison view
pub const MAX_COMPARISON_ENTITIES: usize = 30;

// ============================================================================
// Query Limits
// ============================================================================

/// Hard cap on bars in a ranked snapshot, independent of the selection cap
pub const MAX_SNAPSHOT_BARS: usize = 30;

/// Size of each half of the top/bottom ranking
pub const TOP_BOTTOM_N: usize = 10;

/// At or below this many bars the comparison chart uses fixed-width bars
pub const FEW_BARS_THRESHOLD: usize = 10;

/// Fixed bar thickness in pixels for sparse comparison charts
pub const FIXED_BAR_THICKNESS: u32 = 60;

// ============================================================================
// View Defaults
// ============================================================================

/// Year selected when a year-based view opens
pub const DEFAULT_YEAR: i32 = 2020;

/// Entity selected when the time series view opens
pub const DEFAULT_SERIES_ENTITY: &str = "World";

// ============================================================================
// Colors
// ============================================================================

/// Saturation (percent) of derived series colors
pub const SERIES_SATURATION: u8 = 60;

/// Lightness (percent) of derived series colors
pub const SERIES_LIGHTNESS: u8 = 50;

/// Bar color for the highest emitters
pub const TOP_EMITTER_COLOR: &str = "#F87A63";

/// Bar color for the lowest emitters
pub const BOTTOM_EMITTER_COLOR: &str = "#03CF9E";

// ============================================================================
// Chart Titles
// ============================================================================

pub const TIME_SERIES_TITLE: &str = "Per Capita CO₂ Emissions Over Time";

pub const COMPARISON_TITLE: &str = "Regional CO₂ Emissions Per Capita";

pub const TOP_BOTTOM_TITLE: &str = "Top & Bottom CO₂ Emitters";

// ============================================================================
// Performance
// ============================================================================

/// Pipeline runs slower than this are logged at warn level
pub const SLOW_PIPELINE_MS: f64 = 2000.0;

/// Queries slower than this are logged at warn level
pub const SLOW_QUERY_MS: f64 = 16.0;
