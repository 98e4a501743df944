//! Unit tests for the chart query engine.

use crate::helpers::{TestDatasetBuilder, names};
use co2board::constants::{MAX_SNAPSHOT_BARS, TOP_BOTTOM_N};
use co2board::data::{ranked_snapshot, time_series, top_bottom};
use co2board::types::RankHalf;

#[test]
fn test_time_series_alignment_across_whole_dataset() {
    let ds = TestDatasetBuilder::new()
        .with_row("A", 1990, Some(1.0))
        .with_row("A", 2000, Some(1.5))
        .with_row("B", 2000, Some(2.0))
        .with_row("C", 1950, Some(0.2))
        .with_row("C", 2010, Some(0.4))
        .build();

    let chart = time_series(&ds, &names(&["A", "B"]));

    assert_eq!(chart.x_labels, vec![1950, 1990, 2000, 2010]);
    assert_eq!(chart.series.len(), 2);
    assert_eq!(chart.series[0].values(), vec![None, Some(1.0), Some(1.5), None]);
    assert_eq!(chart.series[1].values(), vec![None, None, Some(2.0), None]);
    for series in &chart.series {
        let years: Vec<i32> = series.points.iter().map(|p| p.year).collect();
        assert_eq!(years, chart.x_labels);
    }
}

#[test]
fn test_time_series_unknown_entity_is_all_gaps() {
    let ds = TestDatasetBuilder::new().with_row("A", 2000, Some(1.0)).build();
    let chart = time_series(&ds, &names(&["Atlantis"]));
    assert_eq!(chart.series[0].values(), vec![None]);
}

#[test]
fn test_top_bottom_extremes_with_twenty_or_more() {
    let ds = TestDatasetBuilder::new()
        .with_ranked_entities(2020, 25)
        .with_row("Other", 2019, Some(100.0))
        .build();

    let result = top_bottom(&ds, 2020);
    let bars = &result.bars;

    assert_eq!(bars.len(), 2 * TOP_BOTTOM_N);
    assert_eq!(bars.labels.first().map(String::as_str), Some("E24"));
    assert_eq!(bars.values.first().copied(), Some(24.0));
    assert_eq!(bars.labels.last().map(String::as_str), Some("E0"));
    assert_eq!(bars.values.last().copied(), Some(0.0));
    assert!(!bars.labels.contains(&"Other".to_string()));
}

#[test]
fn test_top_bottom_halves_are_positional() {
    let ds = TestDatasetBuilder::new().with_ranked_entities(2020, 30).build();
    let result = top_bottom(&ds, 2020);

    assert_eq!(result.halves.len(), 20);
    assert!(result.halves[..TOP_BOTTOM_N].iter().all(|h| *h == RankHalf::Top));
    assert!(result.halves[TOP_BOTTOM_N..].iter().all(|h| *h == RankHalf::Bottom));
}

#[test]
fn test_top_bottom_overlap_with_fifteen_rows() {
    let ds = TestDatasetBuilder::new().with_ranked_entities(2020, 15).build();
    let result = top_bottom(&ds, 2020);

    // Top 10 = E14..E5, bottom 10 = E9..E0; E5..E9 appear in both
    assert_eq!(result.bars.len(), 20);
    let e7 = result.bars.labels.iter().filter(|l| l.as_str() == "E7").count();
    assert_eq!(e7, 2);
    assert_eq!(result.halves[10], RankHalf::Bottom);
    assert_eq!(result.bars.labels[10], "E9");
}

#[test]
fn test_top_bottom_skips_null_values() {
    let ds = TestDatasetBuilder::new()
        .with_row("A", 2020, None)
        .with_row("B", 2020, Some(1.0))
        .build();
    let result = top_bottom(&ds, 2020);
    assert_eq!(result.bars.labels, names(&["B", "B"]));
}

#[test]
fn test_ranked_snapshot_orders_countries_before_regions_when_capping() {
    let mut builder = TestDatasetBuilder::new();
    let mut countries = Vec::new();
    for i in 0..MAX_SNAPSHOT_BARS {
        let name = format!("C{i}");
        builder = builder.with_country(&name, 2020, Some(1.0));
        countries.push(name);
    }
    let ds = builder.with_row("World", 2020, Some(99.0)).build();

    // Regions come after 30 countries, so World falls outside the selection cap
    let bars = ranked_snapshot(&ds, 2020, &countries, &names(&["World"]));
    assert_eq!(bars.len(), MAX_SNAPSHOT_BARS);
    assert!(!bars.labels.contains(&"World".to_string()));
}

#[test]
fn test_ranked_snapshot_ties_keep_input_order() {
    let ds = TestDatasetBuilder::new()
        .with_row("B", 2020, Some(2.0))
        .with_row("A", 2020, Some(2.0))
        .with_row("C", 2020, Some(3.0))
        .build();
    let bars = ranked_snapshot(&ds, 2020, &names(&["A", "B", "C"]), &[]);
    assert_eq!(bars.labels, names(&["C", "B", "A"]));
}

#[test]
fn test_ranked_snapshot_duplicates_counted_independently() {
    let ds = TestDatasetBuilder::new()
        .with_row("World", 2020, Some(4.5))
        .with_row("World", 2020, Some(4.0))
        .build();
    let bars = ranked_snapshot(&ds, 2020, &[], &names(&["World"]));
    assert_eq!(bars.values, vec![4.5, 4.0]);
}
