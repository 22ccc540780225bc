use std::sync::Arc;

use futures::future::{join_all, FutureExt};
use log::{debug, info, trace, warn};
use tokio::task::JoinHandle;

use super::{state::LoadFuture, Wizard, WizardEvent};
use crate::{
    error::Result,
    models::{StepId, StepLoadState, StepPayload, WizardPhase},
};

impl Wizard {
    /// Seeds completion from the server report and loads the first step.
    ///
    /// Both requests run concurrently. A failed completeness report leaves
    /// the tracker empty; a failed step load counts as "no data yet".
    pub async fn initialize(&self) {
        let id = self.inner.id;
        let first = self.active_step();
        info!("Opening wizard for property {id}");

        let (report, ()) = tokio::join!(self.inner.api.completeness(id), self.ensure_loaded(first));

        let mut state = self.state();
        match report {
            Ok(report) => {
                state.completed.seed(&report);
            }
            Err(e) => {
                warn!("Failed to load completeness for property {id}: {e}");
                state.completed.seed(&Default::default());
            }
        }
        if state.phase == WizardPhase::LoadingInitial {
            state.phase = WizardPhase::Ready;
        }
    }

    /// Moves to the next step. A no-op on the last step.
    pub async fn go_next(&self) -> StepId {
        let current = self.active_step();
        match current.next() {
            Some(next) => self.navigate(current, next).await,
            None => current,
        }
    }

    /// Moves to the previous step. A no-op on the first step.
    pub async fn go_previous(&self) -> StepId {
        let current = self.active_step();
        match current.previous() {
            Some(previous) => self.navigate(current, previous).await,
            None => current,
        }
    }

    /// Jumps to `step`. Targeting the active step does nothing.
    pub async fn go_to(&self, step: StepId) -> StepId {
        let current = self.active_step();
        if current == step {
            trace!("Already on step {step}");
            return current;
        }
        self.navigate(current, step).await
    }

    async fn navigate(&self, from: StepId, to: StepId) -> StepId {
        // Saves started here are not awaited; the pointer moves right away.
        let started = self.flush_step(from);
        if !started.is_empty() {
            debug!("Flushed {} pending save(s) for step {from}", started.len());
        }

        self.state().active = to;
        debug!("Navigated from {from} to {to}");

        self.ensure_loaded(to).await;
        to
    }

    /// Invokes the flush callback registered for `step`, if any.
    ///
    /// Returns the handles of the saves it started. Panics outside a tokio
    /// runtime when the callback has saves to start.
    pub fn flush_step(&self, step: StepId) -> Vec<JoinHandle<()>> {
        // Clone the callback out so it runs without the state lock held.
        let flush = self.state().callbacks.get(step);
        flush.map(|flush| flush()).unwrap_or_default()
    }

    /// Flushes `step` and waits until every save it started has settled.
    pub async fn flush_step_and_wait(&self, step: StepId) {
        for outcome in join_all(self.flush_step(step)).await {
            if let Err(e) = outcome {
                debug!("Flushed save for step {step} did not complete: {e}");
            }
        }
    }

    /// Loads `step` unless it was loaded already.
    ///
    /// While a load of `step` is in flight every caller waits on that same
    /// load, so the data is in the store once this returns.
    pub async fn ensure_loaded(&self, step: StepId) {
        self.load_step(step, false).await;
    }

    /// Fetches `step` again even if it was loaded before. Joins a load that
    /// is already in flight instead of starting a second one.
    pub async fn refresh_step(&self, step: StepId) {
        self.load_step(step, true).await;
    }

    async fn load_step(&self, step: StepId, force: bool) {
        let load = {
            let mut state = self.state();
            if let Some(load) = state.loads.get(&step) {
                trace!("Step {step} is already loading; joining it");
                load.clone()
            } else if !force && state.load_state(step) == StepLoadState::Loaded {
                trace!("Step {step} is loaded; skipping load");
                return;
            } else {
                state.load_states.insert(step, StepLoadState::Loading);
                state.step_loading = Some(step);
                let load = self.start_load(step);
                state.loads.insert(step, load.clone());
                load
            }
        };
        load.await;
    }

    /// Builds the shared load of `step`. It holds a weak handle so a pending
    /// load never keeps the wizard alive.
    fn start_load(&self, step: StepId) -> LoadFuture {
        let api = Arc::clone(&self.inner.api);
        let cache = self.inner.cache.clone();
        let id = self.inner.id;
        let wizard = Arc::downgrade(&self.inner);

        async move {
            let fetched = if step.is_remote() {
                cache.fetch_step(&api, id, step).await
            } else {
                trace!("Step {step} is local-only; nothing to fetch");
                Ok(None)
            };
            if let Some(inner) = wizard.upgrade() {
                Wizard { inner }.apply_load(step, fetched);
            }
        }
        .boxed()
        .shared()
    }

    fn apply_load(&self, step: StepId, fetched: Result<Option<StepPayload>>) {
        let has_data = {
            let mut state = self.state();
            let has_data = match fetched {
                Ok(Some(mut payload)) => {
                    payload.normalize_selections(step);
                    let has_data = payload.has_data();
                    if has_data {
                        state.completed.mark_complete(step);
                    }
                    state.data.set(step, payload);
                    has_data
                }
                Ok(None) => {
                    debug!("No data yet for step {step}");
                    false
                }
                Err(e) => {
                    debug!("Loading step {step} failed, treating as empty: {e}");
                    false
                }
            };
            state.loads.remove(&step);
            state.load_states.insert(step, StepLoadState::Loaded);
            if state.step_loading == Some(step) {
                state.step_loading = None;
            }
            has_data
        };

        self.emit(WizardEvent::StepLoaded { step, has_data });
    }
}
