//! Data loading and querying module
//!
//! This module turns the raw emissions CSV and the country roster into the
//! shared [`Dataset`](crate::types::Dataset), and slices that dataset into
//! chart payloads.
//!
//! ## Pipeline
//!
//! 1. [`DatasetSource`] fetches the dataset text and the roster concurrently
//! 2. [`parse_records_with`] cleans rows into records
//! 3. [`classify`] splits entities into countries and regions
//! 4. [`DatasetCache`] keeps the result for the rest of the process
//!
//! ## Error Handling
//!
//! All data operations return `DataResult<T>` which uses the `DataError` type.
//! Bad rows are not errors; they are skipped and counted in [`ParseReport`].

mod cache;
mod chart_engine;
mod classifier;
mod csv_parser;
mod error;
mod source;

pub use cache::*;
pub use chart_engine::*;
pub use classifier::*;
pub use csv_parser::*;
pub use error::*;
pub use source::*;
