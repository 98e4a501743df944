//! Dataset cache lifecycle tests: single-flight, no negative caching,
//! degraded roster.

use crate::helpers::{CountingSource, TestDatasetBuilder, cache_over, scenario_csv};
use co2board::data::{CacheState, DataError, FetchTarget};
use co2board::types::EntityRoster;
use std::sync::Arc;
use std::time::Duration;

fn small_source() -> CountingSource {
    TestDatasetBuilder::new()
        .with_country("France", 2020, Some(4.3))
        .with_row("World", 2020, Some(4.5))
        .into_source()
}

#[tokio::test]
async fn test_repeated_loads_run_pipeline_once() {
    let (cache, source) = cache_over(small_source());

    let first = cache.load().await.unwrap();
    for _ in 0..9 {
        let again = cache.load().await.unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }

    assert_eq!(cache.pipeline_runs(), 1);
    assert_eq!(source.dataset_fetch_count(), 1);
    assert_eq!(source.roster_fetch_count(), 1);
}

#[tokio::test]
async fn test_overlapping_loads_share_one_run() {
    let (cache, source) = cache_over(small_source().with_delay(Duration::from_millis(20)));

    let (a, b, c) = tokio::join!(cache.load(), cache.load(), cache.load());
    let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());

    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&b, &c));
    assert_eq!(source.dataset_fetch_count(), 1);
    assert_eq!(cache.pipeline_runs(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_subscribers_across_tasks_share_one_run() {
    let (cache, source) = cache_over(small_source().with_delay(Duration::from_millis(20)));

    let handles: Vec<_> = (0..8).map(|_| tokio::spawn(cache.subscribe())).collect();
    let mut datasets = Vec::new();
    for handle in handles {
        datasets.push(handle.await.unwrap().unwrap());
    }

    assert!(datasets.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(source.dataset_fetch_count(), 1);
}

#[tokio::test]
async fn test_state_transitions() {
    let (cache, _source) = cache_over(small_source().with_delay(Duration::from_millis(50)));
    assert_eq!(cache.state(), CacheState::Uninitialized);

    let observe = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        cache.state()
    };
    let (loaded, during) = tokio::join!(cache.load(), observe);

    assert!(loaded.is_ok());
    assert_eq!(during, CacheState::Loading);
    assert_eq!(cache.state(), CacheState::Ready);
}

#[tokio::test]
async fn test_late_subscriber_gets_cached_dataset_without_io() {
    let (cache, source) = cache_over(small_source());
    let early = cache.load().await.unwrap();

    let late = cache.subscribe().await.unwrap();
    assert!(Arc::ptr_eq(&early, &late));
    assert!(Arc::ptr_eq(&early, &cache.current().unwrap()));
    assert_eq!(source.dataset_fetch_count(), 1);
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let (cache, source) = cache_over(small_source().failing_dataset(1));

    let err = cache.load().await.unwrap_err();
    assert!(matches!(
        err,
        DataError::Fetch {
            target: FetchTarget::Dataset,
            ..
        }
    ));
    assert_eq!(cache.state(), CacheState::Uninitialized);
    assert!(cache.current().is_none());

    let dataset = cache.load().await.unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(source.dataset_fetch_count(), 2);
    assert_eq!(cache.pipeline_runs(), 2);
}

#[tokio::test]
async fn test_overlapping_loads_share_one_failure() {
    let (cache, source) =
        cache_over(small_source().with_delay(Duration::from_millis(20)).failing_dataset(1));

    let (a, b, c) = tokio::join!(cache.load(), cache.load(), cache.load());
    for result in [&a, &b, &c] {
        assert!(matches!(
            result,
            Err(DataError::Fetch {
                target: FetchTarget::Dataset,
                ..
            })
        ));
    }
    assert_eq!(cache.pipeline_runs(), 1);
    assert_eq!(source.dataset_fetch_count(), 1);
    assert_eq!(cache.state(), CacheState::Uninitialized);

    // The next call starts a fresh run
    assert!(cache.load().await.is_ok());
    assert_eq!(cache.pipeline_runs(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_ready_state_always_has_dataset() {
    let (cache, _source) = cache_over(small_source().with_delay(Duration::from_millis(5)));

    let handles: Vec<_> = (0..4).map(|_| tokio::spawn(cache.subscribe())).collect();
    loop {
        match cache.state() {
            CacheState::Ready => {
                assert!(cache.current().is_some());
                break;
            }
            CacheState::Loading | CacheState::Uninitialized => {
                assert!(cache.current().is_none() || cache.state() == CacheState::Ready);
                tokio::task::yield_now().await;
            }
        }
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
}

#[tokio::test]
async fn test_roster_failure_still_yields_dataset() {
    let (cache, source) = cache_over(CountingSource::new(scenario_csv(), None));

    let dataset = cache.load().await.unwrap();
    assert!(dataset.countries().is_empty());
    assert!(dataset.regions().contains("World"));
    assert!(dataset.regions().contains("Africa"));
    assert_eq!(source.roster_fetch_count(), 1);
    assert_eq!(cache.state(), CacheState::Ready);
}

#[tokio::test]
async fn test_both_fetches_issued_together() {
    let source = CountingSource::new(scenario_csv(), Some(EntityRoster::empty()))
        .with_delay(Duration::from_millis(150));
    let (cache, source) = cache_over(source);

    let started = std::time::Instant::now();
    cache.load().await.unwrap();

    // Sequential fetches would take at least 300ms
    assert!(started.elapsed() < Duration::from_millis(280));
    assert_eq!(source.dataset_fetch_count(), 1);
    assert_eq!(source.roster_fetch_count(), 1);
}
