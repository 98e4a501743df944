//! Chart query engine
//!
//! Pure functions that slice the cached [`Dataset`] into the exact payload
//! each view renders. Nothing here mutates the dataset or caches output;
//! every call recomputes from scratch.

use crate::constants::{
    COMPARISON_TITLE, FEW_BARS_THRESHOLD, FIXED_BAR_THICKNESS, MAX_SNAPSHOT_BARS,
    TIME_SERIES_TITLE, TOP_BOTTOM_N, TOP_BOTTOM_TITLE,
};
use crate::profile_scope;
use crate::types::{
    BarThickness, ChartBars, ChartSeries, Dataset, EmissionRecord, RankHalf, Series, SeriesColor,
    SeriesPoint, TopBottomBars,
};
use std::collections::HashMap;

/// Time series for the selected entities.
///
/// The x-axis is every year in the dataset, not just the years the selected
/// entities cover, so all lines share one axis. Missing points are `None`.
/// If a year has several rows for an entity the first one wins.
pub fn time_series(dataset: &Dataset, entities: &[String]) -> ChartSeries {
    profile_scope!("time_series");

    let mut lookup: HashMap<(&str, i32), Option<f64>> = HashMap::new();
    for record in dataset.records() {
        if entities.iter().any(|e| *e == record.entity) {
            lookup
                .entry((record.entity.as_str(), record.year))
                .or_insert(record.emissions_per_capita);
        }
    }

    let x_labels = dataset.years().to_vec();
    let series = entities
        .iter()
        .map(|entity| Series {
            label: entity.clone(),
            color: SeriesColor::for_entity(entity),
            points: x_labels
                .iter()
                .map(|&year| SeriesPoint {
                    year,
                    value: lookup.get(&(entity.as_str(), year)).copied().flatten(),
                })
                .collect(),
        })
        .collect();

    ChartSeries {
        title: TIME_SERIES_TITLE.to_string(),
        x_labels,
        series,
    }
}

/// Selected countries and regions for one year, highest emitters first.
///
/// Selection order is countries then regions; at most
/// [`MAX_SNAPSHOT_BARS`] entities are considered and at most that many bars
/// returned. Rows without a value are left out rather than ranked.
pub fn ranked_snapshot(
    dataset: &Dataset,
    year: i32,
    countries: &[String],
    regions: &[String],
) -> ChartBars {
    profile_scope!("ranked_snapshot");

    let selected: Vec<&str> = countries
        .iter()
        .chain(regions.iter())
        .map(String::as_str)
        .take(MAX_SNAPSHOT_BARS)
        .collect();

    let mut rows: Vec<(&EmissionRecord, f64)> = dataset
        .records_for_year(year)
        .filter(|r| selected.contains(&r.entity.as_str()))
        .filter_map(|r| r.emissions_per_capita.map(|v| (r, v)))
        .collect();

    sort_descending(&mut rows);
    rows.truncate(MAX_SNAPSHOT_BARS);

    let bar_thickness = if rows.len() <= FEW_BARS_THRESHOLD {
        BarThickness::Fixed(FIXED_BAR_THICKNESS)
    } else {
        BarThickness::Flex
    };

    ChartBars {
        title: COMPARISON_TITLE.to_string(),
        dataset_label: format!("CO₂ emissions in {year}"),
        labels: rows.iter().map(|(r, _)| r.entity.clone()).collect(),
        values: rows.iter().map(|(_, v)| *v).collect(),
        bar_thickness,
    }
}

/// The [`TOP_BOTTOM_N`] highest emitters followed by the [`TOP_BOTTOM_N`] lowest.
///
/// The two halves are sliced from the same sorted list and concatenated
/// as-is: with fewer than `2 * TOP_BOTTOM_N` rows they overlap and an entity
/// appears twice. Halves are tagged by output position only.
pub fn top_bottom(dataset: &Dataset, year: i32) -> TopBottomBars {
    profile_scope!("top_bottom");

    let mut rows: Vec<(&EmissionRecord, f64)> = dataset
        .records_for_year(year)
        .filter_map(|r| r.emissions_per_capita.map(|v| (r, v)))
        .collect();
    sort_descending(&mut rows);

    let top = &rows[..rows.len().min(TOP_BOTTOM_N)];
    let bottom = &rows[rows.len().saturating_sub(TOP_BOTTOM_N)..];
    let combined: Vec<&(&EmissionRecord, f64)> = top.iter().chain(bottom.iter()).collect();

    let halves = (0..combined.len())
        .map(|i| {
            if i < TOP_BOTTOM_N {
                RankHalf::Top
            } else {
                RankHalf::Bottom
            }
        })
        .collect();

    TopBottomBars {
        bars: ChartBars {
            title: format!("{TOP_BOTTOM_TITLE} - {year}"),
            dataset_label: format!("Emissions in {year}"),
            labels: combined.iter().map(|(r, _)| r.entity.clone()).collect(),
            values: combined.iter().map(|(_, v)| *v).collect(),
            bar_thickness: BarThickness::Flex,
        },
        halves,
    }
}

/// Stable sort, highest value first
fn sort_descending(rows: &mut [(&EmissionRecord, f64)]) {
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
}
