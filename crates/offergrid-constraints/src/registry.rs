//! Constraint registry — per-task filters and strategies.

use tracing::debug;

use offergrid_core::{Filter, FilterKind, Strategy};

use crate::error::{ConstraintError, ConstraintResult};
use crate::map::ConcurrentMap;

/// Kind name that carries a retention strategy instead of a filter.
const STRATEGY_KIND: &str = "strategy";

/// A validated attribute filter, as stored for a task.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub kind: FilterKind,
    pub values: Vec<String>,
}

/// One validated entry from an `add_filter` batch.
enum Entry {
    Filter(Constraint),
    Strategy(Strategy),
}

/// Per-task filter lists and strategies, keyed by task name.
#[derive(Default)]
pub struct ConstraintRegistry {
    filters: ConcurrentMap<String, Vec<Constraint>>,
    strategies: ConcurrentMap<String, Strategy>,
}

impl ConstraintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register filters for a task.
    ///
    /// Attribute kinds are appended to the task's filter list; a
    /// `strategy` entry sets the task's strategy from its first value.
    /// The whole batch is validated before anything is applied, so an
    /// invalid entry leaves the registry untouched.
    pub fn add_filter(&self, task: &str, filters: &[Filter]) -> ConstraintResult<()> {
        let entries = filters
            .iter()
            .map(|f| validate(task, f))
            .collect::<ConstraintResult<Vec<_>>>()?;

        let mut constraints = Vec::new();
        let mut strategy = None;
        for entry in entries {
            match entry {
                Entry::Filter(c) => constraints.push(c),
                // Later strategy entries overwrite earlier ones.
                Entry::Strategy(s) => strategy = Some(s),
            }
        }

        let added = constraints.len();
        if !constraints.is_empty() {
            self.filters.update(task.to_string(), |current| {
                let mut list = current.unwrap_or_default();
                list.extend(constraints);
                list
            });
        }
        if let Some(s) = strategy {
            self.strategies.set(task.to_string(), s);
        }

        debug!(task, filters = added, strategy = ?strategy, "registered task constraints");
        Ok(())
    }

    /// Remove every filter and the strategy for a task. Idempotent.
    pub fn clear_filters(&self, task: &str) {
        let had_filters = self.filters.delete(task);
        let had_strategy = self.strategies.delete(task);
        debug!(task, had_filters, had_strategy, "cleared task constraints");
    }

    /// Registered filters for a task, in registration order.
    pub fn filters(&self, task: &str) -> Option<Vec<Constraint>> {
        self.filters.get(task)
    }

    /// Registered strategy for a task, if any.
    pub fn strategy(&self, task: &str) -> Option<Strategy> {
        self.strategies.get(task)
    }

    /// Number of tasks holding a filter list or a strategy.
    pub fn task_count(&self) -> (usize, usize) {
        (self.filters.len(), self.strategies.len())
    }
}

fn validate(task: &str, filter: &Filter) -> ConstraintResult<Entry> {
    if filter.kind.eq_ignore_ascii_case(STRATEGY_KIND) {
        let value = filter
            .values
            .first()
            .ok_or_else(|| ConstraintError::MissingStrategy(task.to_string()))?;
        return Ok(Entry::Strategy(Strategy::parse(value)));
    }

    let kind = FilterKind::parse(&filter.kind)
        .ok_or_else(|| ConstraintError::InvalidKind(filter.kind.clone()))?;
    Ok(Entry::Filter(Constraint {
        kind,
        values: filter.values.clone(),
    }))
}
