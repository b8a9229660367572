//! Observability: slug lifecycle and lookup counters behind a sink boundary.
//!
//! Orchestration logic MUST NOT touch the counter state directly; all
//! instrumentation flows through [`SlugEvent`] and [`MetricsSink`]. This
//! module is the only bridge between orchestration and the global metrics
//! state.

use serde::{Deserialize, Serialize};
use std::{
    cell::RefCell,
    collections::BTreeMap,
    rc::Rc,
    time::{SystemTime, UNIX_EPOCH},
};

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// SlugEvent
///

#[derive(Clone, Copy, Debug)]
pub enum SlugEvent {
    RebuildStart { model_type: &'static str },
    RebuildCommitted { model_type: &'static str },
    RebuildSkipped { model_type: &'static str },
    ResolverEmpty { model_type: &'static str },
    Lookup { model_type: &'static str, tokens: u64 },
    LookupMiss { model_type: &'static str, unmatched: u64 },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: SlugEvent);
}

///
/// EventState
///
/// Ephemeral, in-memory counters for slug operations, overall and per
/// model type.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub models: BTreeMap<String, ModelCounters>,
    pub since_ms: u64,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: EventOps::default(),
            models: BTreeMap::new(),
            since_ms: now_millis(),
        }
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    pub rebuild_calls: u64,
    pub rebuild_commits: u64,
    pub rebuild_skips: u64,
    pub resolver_empty: u64,
    pub lookup_calls: u64,
    pub lookup_tokens: u64,
    pub lookup_misses: u64,
}

///
/// ModelCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ModelCounters {
    pub rebuild_calls: u64,
    pub rebuild_commits: u64,
    pub rebuild_skips: u64,
    pub resolver_empty: u64,
    pub lookup_calls: u64,
    pub lookup_misses: u64,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

///
/// GlobalMetricsSink
/// Default thread-local sink writing into the global counter state.
/// Acts as the concrete sink when no scoped override is installed.
///

struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: SlugEvent) {
        match event {
            SlugEvent::RebuildStart { model_type } => with_state_mut(|m| {
                m.ops.rebuild_calls = m.ops.rebuild_calls.saturating_add(1);
                let entry = m.models.entry(model_type.to_string()).or_default();
                entry.rebuild_calls = entry.rebuild_calls.saturating_add(1);
            }),

            SlugEvent::RebuildCommitted { model_type } => with_state_mut(|m| {
                m.ops.rebuild_commits = m.ops.rebuild_commits.saturating_add(1);
                let entry = m.models.entry(model_type.to_string()).or_default();
                entry.rebuild_commits = entry.rebuild_commits.saturating_add(1);
            }),

            SlugEvent::RebuildSkipped { model_type } => with_state_mut(|m| {
                m.ops.rebuild_skips = m.ops.rebuild_skips.saturating_add(1);
                let entry = m.models.entry(model_type.to_string()).or_default();
                entry.rebuild_skips = entry.rebuild_skips.saturating_add(1);
            }),

            SlugEvent::ResolverEmpty { model_type } => with_state_mut(|m| {
                m.ops.resolver_empty = m.ops.resolver_empty.saturating_add(1);
                let entry = m.models.entry(model_type.to_string()).or_default();
                entry.resolver_empty = entry.resolver_empty.saturating_add(1);
            }),

            SlugEvent::Lookup { model_type, tokens } => with_state_mut(|m| {
                m.ops.lookup_calls = m.ops.lookup_calls.saturating_add(1);
                m.ops.lookup_tokens = m.ops.lookup_tokens.saturating_add(tokens);
                let entry = m.models.entry(model_type.to_string()).or_default();
                entry.lookup_calls = entry.lookup_calls.saturating_add(1);
            }),

            SlugEvent::LookupMiss {
                model_type,
                unmatched,
            } => with_state_mut(|m| {
                m.ops.lookup_misses = m.ops.lookup_misses.saturating_add(unmatched);
                let entry = m.models.entry(model_type.to_string()).or_default();
                entry.lookup_misses = entry.lookup_misses.saturating_add(unmatched);
            }),
        }
    }
}

fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|cell| f(&mut cell.borrow_mut()))
}

pub(crate) fn record(event: SlugEvent) {
    let sink_override = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink_override {
        Some(sink) => sink.record(event),
        None => GlobalMetricsSink.record(event),
    }
}

/// Snapshot the current metrics state for endpoint/test plumbing.
#[must_use]
pub fn metrics_report() -> EventState {
    EVENT_STATE.with(|cell| cell.borrow().clone())
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Run a closure with a temporary metrics sink override.
///
/// The previous override is restored on all exits, including panics.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0.take();
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}
