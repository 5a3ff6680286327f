//! Request lifecycle for random quote fetches.
//!
//! [`FetchCoordinator`] owns a single request slot. Every [`submit`] gets a
//! fresh sequence number and makes all earlier ones stale; a pipeline only
//! writes the slot while its sequence number is still the newest, so a slow
//! old response can never overwrite a newer one. Nothing in flight is
//! cancelled.
//!
//! [`submit`]: FetchCoordinator::submit

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::QuoteApiError;
use crate::models::{Failure, Outcome, Query, RequestState};
use crate::source::QuoteSource;

/// Receives every state transition of the coordinator.
///
/// Called with the slot lock held, so calls arrive in transition order. Keep
/// it cheap and never call back into the coordinator from here. The same
/// state may be delivered more than once.
pub trait Renderer: Send + Sync {
    fn on_state_change(&self, state: &RequestState);
}

/// Forwards states to a channel, typically drained by a UI loop.
pub struct ChannelRenderer {
    tx: UnboundedSender<RequestState>,
}

impl ChannelRenderer {
    pub fn new(tx: UnboundedSender<RequestState>) -> Self {
        Self { tx }
    }
}

impl Renderer for ChannelRenderer {
    fn on_state_change(&self, state: &RequestState) {
        let _ = self.tx.send(state.clone());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Total attempts per query, including the first one.
    pub max_retries: u32,
    /// Fixed delay between attempts.
    pub backoff: Duration,
    /// Quiet period for search-driven submits.
    pub debounce: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_millis(1000),
            debounce: Duration::from_millis(300),
        }
    }
}

struct Slot {
    latest_seq: u64,
    state: RequestState,
    last_result: Option<Outcome>,
}

#[derive(Default)]
struct Debounce {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

struct Inner {
    source: Arc<dyn QuoteSource>,
    renderer: Arc<dyn Renderer>,
    settings: FetchSettings,
    slot: Mutex<Slot>,
    active: Mutex<Query>,
    debounce: Mutex<Debounce>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Inner {
    /// Apply `state` if `seq` is still the newest request.
    fn transition(&self, seq: u64, state: RequestState) -> bool {
        let mut slot = lock(&self.slot);
        if slot.latest_seq != seq {
            return false;
        }
        if let RequestState::Succeeded(outcome) = &state {
            slot.last_result = Some(outcome.clone());
        }
        slot.state = state;
        self.renderer.on_state_change(&slot.state);
        true
    }

    async fn run_pipeline(self: Arc<Self>, seq: u64, query: Query) {
        let max_attempts = self.settings.max_retries.max(1);
        let mut remaining = max_attempts;
        let mut attempt: u32 = 1;

        loop {
            debug!(seq, attempt, source = self.source.name(), "fetch attempt");
            let error = match self.source.retrieve(&query).await {
                Ok(quote) => {
                    self.resolve(seq, RequestState::Succeeded(Outcome::Found(quote)));
                    return;
                }
                Err(e) if e.is_no_results() => {
                    if let QuoteApiError::Decode(detail) = &e {
                        warn!(seq, %detail, "malformed response treated as no results");
                    }
                    self.resolve(seq, RequestState::Succeeded(Outcome::NoResults));
                    return;
                }
                Err(e) => e,
            };

            remaining -= 1;
            if remaining == 0 {
                warn!(seq, attempts = max_attempts, error = %error, "fetch failed, giving up");
                let failure = Failure {
                    kind: error.kind(),
                    message: format!("Could not load a quote after {max_attempts} attempts: {error}"),
                };
                self.resolve(seq, RequestState::Failed(failure));
                return;
            }

            warn!(
                seq,
                attempt,
                remaining,
                error = %error,
                "fetch failed, retrying in {:?}",
                self.settings.backoff
            );
            sleep(self.settings.backoff).await;
            attempt += 1;

            if !self.transition(seq, RequestState::Loading { seq, attempt }) {
                debug!(seq, "query superseded, abandoning retries");
                return;
            }
        }
    }

    fn resolve(&self, seq: u64, state: RequestState) {
        if self.transition(seq, state) {
            info!(seq, "request resolved");
        } else {
            debug!(seq, "discarding stale response");
        }
    }

    /// Claim the debounce slot for `generation`; false if it was restarted.
    fn debounce_fires(&self, generation: u64) -> bool {
        let mut debounce = lock(&self.debounce);
        if debounce.generation != generation {
            return false;
        }
        debounce.pending = None;
        true
    }
}

/// Turns queries into rendered outcomes with bounded retry and debouncing.
///
/// Must be used from within a Tokio runtime: pipelines and the debounce
/// timer are spawned tasks.
#[derive(Clone)]
pub struct FetchCoordinator {
    inner: Arc<Inner>,
}

impl FetchCoordinator {
    pub fn new(
        source: Arc<dyn QuoteSource>,
        renderer: Arc<dyn Renderer>,
        settings: FetchSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                renderer,
                settings,
                slot: Mutex::new(Slot {
                    latest_seq: 0,
                    state: RequestState::Idle,
                    last_result: None,
                }),
                active: Mutex::new(Query::default()),
                debounce: Mutex::new(Debounce::default()),
            }),
        }
    }

    /// Start a request for `query`, superseding any earlier one.
    ///
    /// Returns the request's sequence number.
    pub fn submit(&self, query: Query) -> u64 {
        *lock(&self.inner.active) = query.clone();

        let seq = {
            let mut slot = lock(&self.inner.slot);
            slot.latest_seq += 1;
            let seq = slot.latest_seq;
            slot.state = RequestState::Loading { seq, attempt: 1 };
            self.inner.renderer.on_state_change(&slot.state);
            seq
        };

        info!(
            seq,
            category = %query.category,
            search = %query.search_term,
            "query submitted"
        );
        tokio::spawn(Arc::clone(&self.inner).run_pipeline(seq, query));
        seq
    }

    /// Submit a search for `raw_input` once `delay` passes without another call.
    ///
    /// The category is read from the active query when the timer fires.
    pub fn debounced_submit(&self, raw_input: impl Into<String>, delay: Duration) {
        let input = raw_input.into();
        let mut debounce = lock(&self.inner.debounce);
        debounce.generation += 1;
        let generation = debounce.generation;
        if let Some(previous) = debounce.pending.take() {
            previous.abort();
        }

        let this = self.clone();
        debounce.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            if !this.inner.debounce_fires(generation) {
                return;
            }
            let category = this.active_query().category;
            this.submit(Query::new(category, input));
        }));
    }

    /// [`debounced_submit`](Self::debounced_submit) with the configured delay.
    pub fn debounced_search(&self, raw_input: impl Into<String>) {
        self.debounced_submit(raw_input, self.inner.settings.debounce);
    }

    /// Switch category, keeping the current search term.
    pub fn select_category(&self, category: impl Into<String>) -> u64 {
        let search = self.active_query().search_term;
        self.submit(Query::new(category, search))
    }

    /// Fetch another item for the active query.
    pub fn next_item(&self) -> u64 {
        self.submit(self.active_query())
    }

    /// The last successful outcome, kept while a newer request is loading.
    pub fn current_result(&self) -> Option<Outcome> {
        lock(&self.inner.slot).last_result.clone()
    }

    pub fn state(&self) -> RequestState {
        lock(&self.inner.slot).state.clone()
    }

    /// The query the most recent submit used.
    pub fn active_query(&self) -> Query {
        lock(&self.inner.active).clone()
    }

    pub fn categories(&self) -> Vec<String> {
        self.inner.source.categories()
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.inner.settings
    }
}
