//! Per-view selection state and the guard that enforces selection caps.
//!
//! UI controls emit [`SelectionEvent`]s. The guard turns each event into a
//! new selection or a rejection carrying the value the control must be
//! restored to. An over-limit list is never truncated and never reaches the
//! query engine.

use crate::config::{SelectionLimits, ViewDefaults};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A change coming from one of the dashboard's selection controls.
///
/// Serialized as `{"type": "yearChanged", "value": 2020}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum SelectionEvent {
    YearChanged(i32),
    EntitiesChanged(Vec<String>),
    CountriesChanged(Vec<String>),
    RegionsChanged(Vec<String>),
}

/// The multi-select control a rejection applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionControl {
    Entities,
    Countries,
    Regions,
}

/// An over-limit selection attempt.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[error("{attempted} selected entities exceed the limit of {limit}")]
pub struct SelectionRejection {
    pub control: SelectionControl,
    /// Total the user tried to select
    pub attempted: usize,
    pub limit: usize,
    /// Value to write back into the control
    pub restore: Vec<String>,
}

/// Result of running an event through the guard
#[derive(Clone, Debug, PartialEq)]
pub enum GuardDecision<S> {
    /// The event is valid; this is the new selection
    Applied(S),
    /// The event exceeded a cap; the current selection stands
    Reverted(SelectionRejection),
    /// The event targets a control this view doesn't have
    Ignored,
}

impl<S> GuardDecision<S> {
    pub fn is_applied(&self) -> bool {
        matches!(self, GuardDecision::Applied(_))
    }
}

/// A selection type the guard knows how to update.
pub trait GuardedSelection: Clone + Default {
    fn try_apply(&self, limits: &SelectionLimits, event: &SelectionEvent) -> GuardDecision<Self>;

    /// Events that rebuild this selection from the empty default
    fn as_events(&self) -> Vec<SelectionEvent>;
}

/// Enforces [`SelectionLimits`] on every selection change.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelectionGuard {
    limits: SelectionLimits,
}

impl SelectionGuard {
    pub fn new(limits: SelectionLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &SelectionLimits {
        &self.limits
    }

    /// Validate `event` against `current` without mutating it
    pub fn try_apply<S: GuardedSelection>(
        &self,
        current: &S,
        event: &SelectionEvent,
    ) -> GuardDecision<S> {
        current.try_apply(&self.limits, event)
    }

    /// Replay `seed` onto an empty selection, so an initial selection obeys
    /// the same caps as one built from UI events.
    pub fn admit<S: GuardedSelection>(&self, seed: &S) -> Result<S, SelectionRejection> {
        let mut selection = S::default();
        for event in seed.as_events() {
            match self.try_apply(&selection, &event) {
                GuardDecision::Applied(next) => selection = next,
                GuardDecision::Reverted(rejection) => return Err(rejection),
                GuardDecision::Ignored => {}
            }
        }
        Ok(selection)
    }
}

// ============================================================================
// Time Series
// ============================================================================

/// Entities plotted in the time series view, in selection order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimeSeriesSelection {
    pub entities: Vec<String>,
}

impl TimeSeriesSelection {
    pub fn seeded(defaults: &ViewDefaults) -> Self {
        Self {
            entities: distinct(&defaults.series_entities),
        }
    }
}

impl GuardedSelection for TimeSeriesSelection {
    fn try_apply(&self, limits: &SelectionLimits, event: &SelectionEvent) -> GuardDecision<Self> {
        let SelectionEvent::EntitiesChanged(proposed) = event else {
            return GuardDecision::Ignored;
        };
        let entities = distinct(proposed);
        if entities.len() > limits.max_series_entities {
            return GuardDecision::Reverted(SelectionRejection {
                control: SelectionControl::Entities,
                attempted: entities.len(),
                limit: limits.max_series_entities,
                restore: self.entities.clone(),
            });
        }
        GuardDecision::Applied(Self { entities })
    }

    fn as_events(&self) -> Vec<SelectionEvent> {
        vec![SelectionEvent::EntitiesChanged(self.entities.clone())]
    }
}

// ============================================================================
// Regional Comparison
// ============================================================================

/// Year plus chosen countries and regions for the comparison view
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComparisonSelection {
    pub year: i32,
    pub countries: Vec<String>,
    pub regions: Vec<String>,
}

impl ComparisonSelection {
    pub fn seeded(defaults: &ViewDefaults) -> Self {
        Self {
            year: defaults.year,
            countries: Vec::new(),
            regions: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.countries.len() + self.regions.len()
    }
}

impl GuardedSelection for ComparisonSelection {
    fn try_apply(&self, limits: &SelectionLimits, event: &SelectionEvent) -> GuardDecision<Self> {
        let limit = limits.max_comparison_entities;
        match event {
            SelectionEvent::YearChanged(year) => GuardDecision::Applied(Self {
                year: *year,
                ..self.clone()
            }),
            SelectionEvent::CountriesChanged(proposed) => {
                let countries = distinct(proposed);
                let attempted = countries.len() + self.regions.len();
                if attempted > limit {
                    return GuardDecision::Reverted(SelectionRejection {
                        control: SelectionControl::Countries,
                        attempted,
                        limit,
                        restore: self.countries.clone(),
                    });
                }
                GuardDecision::Applied(Self {
                    countries,
                    ..self.clone()
                })
            }
            SelectionEvent::RegionsChanged(proposed) => {
                let regions = distinct(proposed);
                let attempted = self.countries.len() + regions.len();
                if attempted > limit {
                    return GuardDecision::Reverted(SelectionRejection {
                        control: SelectionControl::Regions,
                        attempted,
                        limit,
                        restore: self.regions.clone(),
                    });
                }
                GuardDecision::Applied(Self {
                    regions,
                    ..self.clone()
                })
            }
            SelectionEvent::EntitiesChanged(_) => GuardDecision::Ignored,
        }
    }

    fn as_events(&self) -> Vec<SelectionEvent> {
        vec![
            SelectionEvent::YearChanged(self.year),
            SelectionEvent::CountriesChanged(self.countries.clone()),
            SelectionEvent::RegionsChanged(self.regions.clone()),
        ]
    }
}

// ============================================================================
// Year Only
// ============================================================================

/// Single-year selection used by the top/bottom view
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct YearSelection {
    pub year: i32,
}

impl YearSelection {
    pub fn seeded(defaults: &ViewDefaults) -> Self {
        Self {
            year: defaults.year,
        }
    }
}

impl GuardedSelection for YearSelection {
    fn try_apply(&self, _limits: &SelectionLimits, event: &SelectionEvent) -> GuardDecision<Self> {
        match event {
            SelectionEvent::YearChanged(year) => GuardDecision::Applied(Self { year: *year }),
            _ => GuardDecision::Ignored,
        }
    }

    fn as_events(&self) -> Vec<SelectionEvent> {
        vec![SelectionEvent::YearChanged(self.year)]
    }
}

/// Drop repeated names, keeping the first occurrence
fn distinct(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}
