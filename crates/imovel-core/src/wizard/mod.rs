//! The property registration wizard shell.
//!
//! A [`Wizard`] drives one property through its thirteen steps. It owns the
//! active step pointer, the per-step load state, and the trackers from
//! [`state`]: the step data store, the completion ratchet, the unsaved-changes
//! set and the flush callback registry.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Step forms    │    │     Wizard      │    │   PropertyApi   │
//! │ (set_field,     │───▶│ (on_step_update,│───▶│ (GET/PUT step,  │
//! │  debounce)      │    │  go_to, ...)    │    │  completude)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Navigation invokes the outgoing step's flush callback without waiting for
//! the resulting save, moves the pointer, then lazily loads the destination.
//! Saves go through [`Wizard::on_step_update`]; a successful save merges the
//! sent fields into the store, marks the step complete and clears its
//! unsaved flag. Failures are reported as [`WizardEvent::Alert`] and leave
//! every tracker untouched.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use imovel_core::{api::HttpPropertyApi, models::StepId, StepForm, WizardBuilder};
//!
//! # async fn example() -> imovel_core::Result<()> {
//! let api = Arc::new(HttpPropertyApi::new("http://localhost:3000/api", None));
//! let wizard = WizardBuilder::new(42).with_api(api).open().await?;
//!
//! wizard.go_to(StepId::Medidas).await;
//! let form = StepForm::open(&wizard, StepId::Medidas);
//! form.set_field("areaConstruida", "120")?;
//! wizard.go_next().await; // flushes the pending save, moves to "preco"
//! # Ok(())
//! # }
//! ```

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use jiff::Timestamp;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::{
    api::PropertyApi,
    cache::SessionCache,
    config::AutosaveConfig,
    models::{PropertyId, StepId, StepLoadState, StepPayload, WizardPhase},
};

pub mod builder;
mod navigation;
pub mod state;
mod updates;

#[cfg(test)]
mod tests;

pub use builder::WizardBuilder;
pub use state::FlushFn;
use state::WizardState;

/// Notifications published by a wizard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum WizardEvent {
    /// A step's data finished loading (successfully or not)
    StepLoaded { step: StepId, has_data: bool },
    /// A step save was confirmed
    StepSaved { step: StepId },
    /// A user-facing error
    Alert {
        step: Option<StepId>,
        message: String,
    },
    /// The property was activated
    Finalized { id: PropertyId },
}

/// Render-ready view of one step in the step list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSummary {
    pub step: StepId,
    pub label: &'static str,
    pub icon: &'static str,
    pub completed: bool,
    pub active: bool,
    pub loading: bool,
    pub load_state: StepLoadState,
    /// "Dados já salvos": cached data present and no unsaved edits
    pub saved_badge: bool,
    pub saved_at: Option<Timestamp>,
}

pub(crate) struct WizardInner {
    pub id: PropertyId,
    pub api: Arc<dyn PropertyApi>,
    pub cache: SessionCache,
    pub autosave: AutosaveConfig,
    pub state: Mutex<WizardState>,
    pub events: broadcast::Sender<WizardEvent>,
    pub next_owner: AtomicU64,
}

/// Handle to one wizard instance. Cloning is cheap and shares the state.
#[derive(Clone)]
pub struct Wizard {
    pub(crate) inner: Arc<WizardInner>,
}

impl Wizard {
    pub(crate) fn state(&self) -> MutexGuard<'_, WizardState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn emit(&self, event: WizardEvent) {
        // Nobody listening is fine.
        let _ = self.inner.events.send(event);
    }

    pub fn property_id(&self) -> PropertyId {
        self.inner.id
    }

    pub fn api(&self) -> &Arc<dyn PropertyApi> {
        &self.inner.api
    }

    pub fn cache(&self) -> &SessionCache {
        &self.inner.cache
    }

    pub fn autosave(&self) -> AutosaveConfig {
        self.inner.autosave
    }

    /// Subscribes to wizard events (alerts, loads, saves).
    pub fn subscribe(&self) -> broadcast::Receiver<WizardEvent> {
        self.inner.events.subscribe()
    }

    /// The ordered step list.
    pub fn steps(&self) -> &'static [StepId] {
        &StepId::ALL
    }

    pub fn active_step(&self) -> StepId {
        self.state().active
    }

    pub fn phase(&self) -> WizardPhase {
        self.state().phase
    }

    /// The step whose data is currently being fetched by navigation.
    pub fn step_loading(&self) -> Option<StepId> {
        self.state().step_loading
    }

    pub fn load_state(&self, step: StepId) -> StepLoadState {
        self.state().load_state(step)
    }

    pub fn is_complete(&self, step: StepId) -> bool {
        self.state().completed.is_complete(step)
    }

    pub fn completed_steps(&self) -> Vec<StepId> {
        self.state().completed.completed()
    }

    pub fn has_unsaved(&self, step: StepId) -> bool {
        self.state().unsaved.has_unsaved(step)
    }

    /// Last-known server-confirmed payload of a step.
    pub fn step_data(&self, step: StepId) -> Option<StepPayload> {
        self.state().data.get(step).cloned()
    }

    pub fn has_data(&self, step: StepId) -> bool {
        self.state()
            .data
            .get(step)
            .is_some_and(StepPayload::has_data)
    }

    pub fn show_saved_badge(&self, step: StepId) -> bool {
        self.state().show_saved_badge(step)
    }

    /// When the last save of `step` was confirmed in this session.
    pub fn saved_at(&self, step: StepId) -> Option<Timestamp> {
        self.state().saved_at.get(&step).copied()
    }

    pub fn has_flush_callback(&self, step: StepId) -> bool {
        self.state().callbacks.has(step)
    }

    pub fn step_summaries(&self) -> Vec<StepSummary> {
        let state = self.state();
        StepId::ALL
            .iter()
            .map(|&step| StepSummary {
                step,
                label: step.label(),
                icon: step.icon(),
                completed: state.completed.is_complete(step),
                active: state.active == step,
                loading: state.step_loading == Some(step),
                load_state: state.load_state(step),
                saved_badge: state.show_saved_badge(step),
                saved_at: state.saved_at.get(&step).copied(),
            })
            .collect()
    }

    /// Records a local edit on `step`; called before any save is scheduled.
    pub fn mark_changed(&self, step: StepId) {
        self.state().unsaved.mark_changed(step);
    }

    /// Registers the flush callback of a step form. Returns the owner token
    /// when the registration took effect.
    pub(crate) fn register_flush(&self, step: StepId, flush: FlushFn) -> Option<u64> {
        let owner = self.inner.next_owner.fetch_add(1, Ordering::Relaxed);
        self.state()
            .callbacks
            .register(step, owner, flush)
            .then_some(owner)
    }

    pub(crate) fn unregister_flush(&self, step: StepId, owner: u64) {
        self.state().callbacks.unregister(step, owner);
    }
}
