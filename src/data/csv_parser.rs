//! CSV parsing for the emissions dataset
//!
//! Turns the raw dataset text into [`EmissionRecord`]s. Columns are located
//! by header name, so column order in the file does not matter.
//!
//! ## Cleaning Rules
//!
//! - Entity names are trimmed; rows with an empty entity are skipped
//! - Years must coerce to a whole number; rows that don't are skipped
//! - Rows before [`MIN_YEAR`] are dropped
//! - Blank or non-numeric emissions become `None`, never zero
//! - Blank lines are ignored and input order is preserved

use crate::config::ColumnMapping;
use crate::constants::{EMISSIONS_COLUMN_HINT, MIN_YEAR};
use crate::data::error::{DataError, DataResult};
use crate::types::EmissionRecord;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

/// Row counts collected while parsing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Rows turned into records
    pub kept: usize,
    /// Rows dropped for a year before [`MIN_YEAR`]
    pub before_min_year: usize,
    /// Rows skipped because the year or entity could not be read
    pub malformed: usize,
}

impl ParseReport {
    pub fn dropped(&self) -> usize {
        self.before_min_year + self.malformed
    }
}

/// Parsed records plus the report describing what was dropped
#[derive(Clone, Debug, Default)]
pub struct ParseOutcome {
    pub records: Vec<EmissionRecord>,
    pub report: ParseReport,
}

/// Parse dataset text using the default column names
pub fn parse_records(content: &str) -> DataResult<Vec<EmissionRecord>> {
    parse_records_with(content, &ColumnMapping::default()).map(|outcome| outcome.records)
}

/// Parse dataset text with an explicit column mapping
///
/// Fails only for problems with the whole input (no header, missing
/// column). Individual bad rows are skipped and counted in the report.
pub fn parse_records_with(content: &str, columns: &ColumnMapping) -> DataResult<ParseOutcome> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.trim().is_empty() {
        return Err(DataError::EmptyFile);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let layout = ColumnLayout::resolve(&headers, columns)?;

    let mut outcome = ParseOutcome::default();

    for (index, result) in reader.records().enumerate() {
        // Header is line 1
        let line = index + 2;
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                debug!(line, error = %err, "Skipping unreadable row");
                outcome.report.malformed += 1;
                continue;
            }
        };

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        match clean_row(&record, &layout) {
            RowOutcome::Kept(parsed) => {
                outcome.records.push(parsed);
                outcome.report.kept += 1;
            }
            RowOutcome::BeforeMinYear => outcome.report.before_min_year += 1,
            RowOutcome::Malformed(reason) => {
                debug!(line, reason, "Skipping malformed row");
                outcome.report.malformed += 1;
            }
        }
    }

    debug!(
        kept = outcome.report.kept,
        before_min_year = outcome.report.before_min_year,
        malformed = outcome.report.malformed,
        "Parsed emissions dataset"
    );

    Ok(outcome)
}

/// Resolved positions of the three columns the parser reads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ColumnLayout {
    entity: usize,
    year: usize,
    emissions: usize,
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord, columns: &ColumnMapping) -> DataResult<Self> {
        let names: Vec<&str> = headers.iter().map(str::trim).collect();

        let entity = find_column(&names, &columns.entity, None);
        let year = find_column(&names, &columns.year, None);
        let emissions = find_column(&names, &columns.emissions, Some(EMISSIONS_COLUMN_HINT));

        let missing = |column: &str| DataError::MissingColumn {
            column: column.to_string(),
            found: names.iter().map(|n| n.to_string()).collect(),
        };

        Ok(Self {
            entity: entity.ok_or_else(|| missing(columns.entity.as_str()))?,
            year: year.ok_or_else(|| missing(columns.year.as_str()))?,
            emissions: emissions.ok_or_else(|| missing(columns.emissions.as_str()))?,
        })
    }
}

/// Exact match first, then case-insensitive, then the optional substring hint
fn find_column(names: &[&str], wanted: &str, hint: Option<&str>) -> Option<usize> {
    let wanted = wanted.trim();
    names
        .iter()
        .position(|n| *n == wanted)
        .or_else(|| names.iter().position(|n| n.eq_ignore_ascii_case(wanted)))
        .or_else(|| {
            let hint = hint?.to_lowercase();
            names.iter().position(|n| n.to_lowercase().contains(&hint))
        })
}

enum RowOutcome {
    Kept(EmissionRecord),
    BeforeMinYear,
    Malformed(&'static str),
}

fn clean_row(record: &StringRecord, layout: &ColumnLayout) -> RowOutcome {
    let Some(year) = record.get(layout.year).and_then(parse_year) else {
        return RowOutcome::Malformed("year is not a whole number");
    };
    if year < MIN_YEAR {
        return RowOutcome::BeforeMinYear;
    }

    let entity = record.get(layout.entity).map(str::trim).unwrap_or_default();
    if entity.is_empty() {
        return RowOutcome::Malformed("entity is empty");
    }

    let emissions_per_capita = record.get(layout.emissions).and_then(parse_emissions);

    RowOutcome::Kept(EmissionRecord::new(entity, year, emissions_per_capita))
}

/// Coerce a year cell to an integer
///
/// Accepts `2020` and `2020.0`; rejects blanks, fractions and non-finite values.
fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(year) = s.parse::<i32>() {
        return Some(year);
    }
    let value = s.parse::<f64>().ok()?;
    if value.is_finite()
        && value.fract() == 0.0
        && value >= i32::MIN as f64
        && value <= i32::MAX as f64
    {
        Some(value as i32)
    } else {
        None
    }
}

/// Coerce an emissions cell; anything that isn't a finite number is missing
fn parse_emissions(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
