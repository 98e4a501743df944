//! View controllers.
//!
//! A [`ChartView`] ties one selection to the shared [`DatasetCache`]: events
//! go through the [`SelectionGuard`], accepted selections are re-queried, and
//! the last complete payload is kept for the renderer. The three dashboard
//! views are aliases over the selection type they use.

use crate::config::DashboardConfig;
use crate::constants::SLOW_QUERY_MS;
use crate::data::{DataError, DataResult, DatasetCache, ranked_snapshot, time_series, top_bottom};
use crate::perf::ScopedTimer;
use crate::selection::{
    ComparisonSelection, GuardDecision, GuardedSelection, SelectionEvent, SelectionGuard,
    SelectionRejection, TimeSeriesSelection, YearSelection,
};
use crate::types::{ChartBars, ChartSeries, Dataset, TopBottomBars};
use std::sync::Arc;
use tracing::debug;

/// A selection that knows which chart it produces
pub trait ViewQuery: GuardedSelection {
    type Payload: Clone;

    fn query(&self, dataset: &Dataset) -> Self::Payload;
}

impl ViewQuery for TimeSeriesSelection {
    type Payload = ChartSeries;

    fn query(&self, dataset: &Dataset) -> ChartSeries {
        time_series(dataset, &self.entities)
    }
}

impl ViewQuery for ComparisonSelection {
    type Payload = ChartBars;

    fn query(&self, dataset: &Dataset) -> ChartBars {
        ranked_snapshot(dataset, self.year, &self.countries, &self.regions)
    }
}

impl ViewQuery for YearSelection {
    type Payload = TopBottomBars;

    fn query(&self, dataset: &Dataset) -> TopBottomBars {
        top_bottom(dataset, self.year)
    }
}

/// What the shell should do after an event
#[derive(Clone, Debug, PartialEq)]
pub enum ViewUpdate<P> {
    /// Replace the chart with this payload
    Redraw(P),
    /// Write `restore` back into the control; the chart is unchanged
    Reverted(SelectionRejection),
    /// Selection accepted but the dataset is still loading
    Pending,
    /// The event is not for this view
    Ignored,
}

pub type TimeSeriesView = ChartView<TimeSeriesSelection>;
pub type RegionalComparisonView = ChartView<ComparisonSelection>;
pub type TopBottomView = ChartView<YearSelection>;

pub struct ChartView<S: ViewQuery> {
    cache: Arc<DatasetCache>,
    guard: SelectionGuard,
    selection: S,
    chart: Option<S::Payload>,
}

impl<S: ViewQuery> ChartView<S> {
    /// Create a view with an explicit initial selection.
    ///
    /// The selection goes through `guard` first; one over the caps is an
    /// error rather than a view that would query with it.
    pub fn new(cache: Arc<DatasetCache>, guard: SelectionGuard, selection: S) -> DataResult<Self> {
        let selection = guard
            .admit(&selection)
            .map_err(|rejection| DataError::Config(format!("initial selection: {rejection}")))?;
        Ok(Self {
            cache,
            guard,
            selection,
            chart: None,
        })
    }

    pub fn selection(&self) -> &S {
        &self.selection
    }

    /// Last complete payload, if any
    pub fn chart(&self) -> Option<&S::Payload> {
        self.chart.as_ref()
    }

    /// Wait for the dataset and render the current selection
    pub async fn load(&mut self) -> DataResult<S::Payload> {
        let dataset = self.cache.load().await?;
        Ok(self.render(&dataset))
    }

    /// Apply a selection event.
    ///
    /// Rejected and ignored events leave both the selection and the chart
    /// untouched.
    pub fn handle(&mut self, event: &SelectionEvent) -> ViewUpdate<S::Payload> {
        match self.guard.try_apply(&self.selection, event) {
            GuardDecision::Applied(selection) => {
                self.selection = selection;
                match self.cache.current() {
                    Some(dataset) => ViewUpdate::Redraw(self.render(&dataset)),
                    None => {
                        debug!("Selection changed before dataset was ready");
                        ViewUpdate::Pending
                    }
                }
            }
            GuardDecision::Reverted(rejection) => {
                debug!(
                    attempted = rejection.attempted,
                    limit = rejection.limit,
                    "Selection over limit, reverting control"
                );
                ViewUpdate::Reverted(rejection)
            }
            GuardDecision::Ignored => ViewUpdate::Ignored,
        }
    }

    /// Years for the year dropdown, ascending
    pub fn year_options(&self) -> Vec<i32> {
        self.with_dataset(|ds| ds.years().to_vec())
    }

    /// Every entity, sorted
    pub fn entity_options(&self) -> Vec<String> {
        self.with_dataset(|ds| ds.entities().iter().cloned().collect())
    }

    pub fn country_options(&self) -> Vec<String> {
        self.with_dataset(|ds| ds.countries().iter().cloned().collect())
    }

    pub fn region_options(&self) -> Vec<String> {
        self.with_dataset(|ds| ds.regions().iter().cloned().collect())
    }

    fn render(&mut self, dataset: &Dataset) -> S::Payload {
        let _timer = ScopedTimer::new("view_query", SLOW_QUERY_MS);
        let payload = self.selection.query(dataset);
        self.chart = Some(payload.clone());
        payload
    }

    fn with_dataset<T: Default>(&self, f: impl FnOnce(&Dataset) -> T) -> T {
        self.cache.current().map(|ds| f(&ds)).unwrap_or_default()
    }
}

impl TimeSeriesView {
    pub fn time_series(cache: Arc<DatasetCache>, config: &DashboardConfig) -> DataResult<Self> {
        config.validate()?;
        Self::new(
            cache,
            SelectionGuard::new(config.limits),
            TimeSeriesSelection::seeded(&config.defaults),
        )
    }
}

impl RegionalComparisonView {
    pub fn regional_comparison(
        cache: Arc<DatasetCache>,
        config: &DashboardConfig,
    ) -> DataResult<Self> {
        config.validate()?;
        Self::new(
            cache,
            SelectionGuard::new(config.limits),
            ComparisonSelection::seeded(&config.defaults),
        )
    }
}

impl TopBottomView {
    pub fn top_bottom(cache: Arc<DatasetCache>, config: &DashboardConfig) -> DataResult<Self> {
        config.validate()?;
        Self::new(
            cache,
            SelectionGuard::new(config.limits),
            YearSelection::seeded(&config.defaults),
        )
    }
}
