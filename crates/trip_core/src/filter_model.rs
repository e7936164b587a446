use anyhow::Result;
use shared::domain::{FilterKind, UpdateKind};
use tracing::debug;

use crate::observable::Observable;

/// Holds the active list filter and announces every change.
#[derive(Default)]
pub struct FilterModel {
    filter: FilterKind,
    observers: Observable<FilterKind>,
}

impl FilterModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> FilterKind {
        self.filter
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: FnMut(UpdateKind, Option<&FilterKind>) -> Result<()> + Send + 'static,
    {
        self.observers.subscribe(handler);
    }

    /// Stores `filter` and notifies subscribers, even when it is unchanged.
    pub fn set_filter(&mut self, kind: UpdateKind, filter: FilterKind) -> Result<()> {
        debug!(filter = filter.as_str(), ?kind, "filter changed");
        self.filter = filter;
        self.observers.notify(kind, Some(&filter))
    }
}

#[cfg(test)]
#[path = "tests/filter_model_tests.rs"]
mod tests;
