//! Core types for the emissions dashboard.
//!
//! This module defines the record and dataset model shared by every view,
//! plus the chart payloads the query engine hands to the rendering layer.

use crate::constants::{
    BOTTOM_EMITTER_COLOR, SERIES_LIGHTNESS, SERIES_SATURATION, TOP_EMITTER_COLOR,
};
use crate::data::classify;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

// ============================================================================
// Dataset Types
// ============================================================================

/// One cleaned row of the emissions dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    /// Trimmed, non-empty entity name
    pub entity: String,
    /// Year of the measurement, always >= 1900
    pub year: i32,
    /// Per-capita emissions in tonnes, `None` when the source cell is blank or non-numeric
    pub emissions_per_capita: Option<f64>,
}

impl EmissionRecord {
    pub fn new(entity: impl Into<String>, year: i32, emissions_per_capita: Option<f64>) -> Self {
        Self {
            entity: entity.into(),
            year,
            emissions_per_capita,
        }
    }
}

/// Authoritative set of country names used to classify entities.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityRoster {
    names: HashSet<String>,
}

impl EntityRoster {
    /// A roster with no countries; every entity classifies as a region.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a roster from raw names. Names are trimmed and blanks skipped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The parsed, classified dataset.
///
/// Built once by [`crate::data::DatasetCache`] and shared read-only behind an
/// `Arc`. Nothing mutates it after construction; a reload replaces it wholesale.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    records: Vec<EmissionRecord>,
    entities: BTreeSet<String>,
    countries: BTreeSet<String>,
    regions: BTreeSet<String>,
    years: Vec<i32>,
}

impl Dataset {
    /// Derive entity, classification and year sets from parsed records.
    pub fn from_records(records: Vec<EmissionRecord>, roster: &EntityRoster) -> Self {
        let entities: BTreeSet<String> = records.iter().map(|r| r.entity.clone()).collect();
        let classification = classify(&entities, roster);

        let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();

        Self {
            records,
            entities,
            countries: classification.countries,
            regions: classification.regions,
            years: years.into_iter().collect(),
        }
    }

    /// All records in input order
    pub fn records(&self) -> &[EmissionRecord] {
        &self.records
    }

    /// Records for a single year, in input order
    pub fn records_for_year(&self, year: i32) -> impl Iterator<Item = &EmissionRecord> {
        self.records.iter().filter(move |r| r.year == year)
    }

    /// Distinct entity names, sorted
    pub fn entities(&self) -> &BTreeSet<String> {
        &self.entities
    }

    pub fn countries(&self) -> &BTreeSet<String> {
        &self.countries
    }

    pub fn regions(&self) -> &BTreeSet<String> {
        &self.regions
    }

    /// Distinct years across the whole dataset, ascending
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn is_country(&self, entity: &str) -> bool {
        self.countries.contains(entity)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// Chart Payload Types
// ============================================================================

/// HSL color derived from an entity name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SeriesColor {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl SeriesColor {
    /// Sum of the name's code points, modulo 360, picks the hue.
    ///
    /// Stable for a given name; only meant to keep a line's color put while
    /// the user edits the selection.
    pub fn for_entity(name: &str) -> Self {
        let hash: u64 = name.chars().map(|c| c as u64).sum();
        Self {
            hue: (hash % 360) as u16,
            saturation: SERIES_SATURATION,
            lightness: SERIES_LIGHTNESS,
        }
    }

    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SeriesColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// A single point on a time series line
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub year: i32,
    /// `None` marks a gap the renderer bridges
    pub value: Option<f64>,
}

/// One line of the time series chart
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub color: SeriesColor,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/// Time series payload: a shared year axis and one series per entity.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub x_labels: Vec<i32>,
    pub series: Vec<Series>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Bar width hint for the renderer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarThickness {
    /// Fixed width in pixels
    Fixed(u32),
    #[default]
    Flex,
}

/// Bar-style payload: parallel labels and values.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ChartBars {
    pub title: String,
    /// Legend/tooltip label of the single dataset
    pub dataset_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub bar_thickness: BarThickness,
}

impl ChartBars {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Which half of the top/bottom ranking a bar belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankHalf {
    Top,
    Bottom,
}

impl RankHalf {
    pub fn color(&self) -> &'static str {
        match self {
            RankHalf::Top => TOP_EMITTER_COLOR,
            RankHalf::Bottom => BOTTOM_EMITTER_COLOR,
        }
    }
}

/// Top/bottom payload: bars plus a positional half tag per bar.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TopBottomBars {
    #[serde(flatten)]
    pub bars: ChartBars,
    pub halves: Vec<RankHalf>,
}

impl TopBottomBars {
    /// Per-bar display colors, parallel to `bars.labels`
    pub fn colors(&self) -> Vec<&'static str> {
        self.halves.iter().map(RankHalf::color).collect()
    }
}
