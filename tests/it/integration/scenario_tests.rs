//! End-to-end scenarios over the load pipeline and the query engine.

use crate::helpers::{TestDatasetBuilder, names, scenario_csv};
use co2board::data::{DatasetCache, StaticSource, ranked_snapshot, top_bottom};
use co2board::types::{EmissionRecord, EntityRoster};
use std::collections::BTreeSet;
use std::sync::Arc;

#[tokio::test]
async fn test_scenario_parse_and_classify_with_empty_roster() {
    let cache = DatasetCache::new(Arc::new(StaticSource::new(
        scenario_csv(),
        EntityRoster::empty(),
    )));
    let dataset = cache.load().await.unwrap();

    assert_eq!(
        dataset.records(),
        &[
            EmissionRecord::new("World", 2020, Some(4.5)),
            EmissionRecord::new("Africa", 2020, Some(1.1)),
        ]
    );
    assert!(dataset.countries().is_empty());
    let regions: BTreeSet<String> = names(&["World", "Africa"]).into_iter().collect();
    assert_eq!(dataset.regions(), &regions);
}

#[tokio::test]
async fn test_scenario_ranked_snapshot() {
    let cache = DatasetCache::new(Arc::new(StaticSource::new(
        scenario_csv(),
        EntityRoster::empty(),
    )));
    let dataset = cache.load().await.unwrap();

    let bars = ranked_snapshot(&dataset, 2020, &[], &names(&["World", "Africa"]));
    assert_eq!(bars.labels, names(&["World", "Africa"]));
    assert_eq!(bars.values, vec![4.5, 1.1]);
}

#[tokio::test]
async fn test_classification_partition_is_total() {
    let builder = TestDatasetBuilder::new()
        .with_country("France", 2000, Some(6.0))
        .with_country("Chad", 2000, Some(0.1))
        .with_row("World", 2000, Some(4.0))
        .with_row("High-income countries", 2000, Some(11.0))
        .with_row("france", 2000, Some(6.0));
    let cache = DatasetCache::new(Arc::new(StaticSource::new(builder.to_csv(), builder.roster())));
    let dataset = cache.load().await.unwrap();

    for entity in dataset.entities() {
        assert!(
            dataset.countries().contains(entity) ^ dataset.regions().contains(entity),
            "{entity} must be in exactly one set"
        );
    }
    assert_eq!(
        dataset.countries().len() + dataset.regions().len(),
        dataset.entities().len()
    );
    assert!(dataset.regions().contains("france"));
}

#[tokio::test]
async fn test_top_bottom_on_loaded_dataset() {
    let builder = TestDatasetBuilder::new().with_ranked_entities(2020, 22);
    let cache = DatasetCache::new(Arc::new(StaticSource::new(builder.to_csv(), builder.roster())));
    let dataset = cache.load().await.unwrap();

    let result = top_bottom(&dataset, 2020);
    let max = result.bars.values.iter().cloned().fold(f64::MIN, f64::max);
    let min = result.bars.values.iter().cloned().fold(f64::MAX, f64::min);
    assert_eq!(result.bars.values[0], max);
    assert_eq!(*result.bars.values.last().unwrap(), min);
}
