//! Trackers owned by one wizard instance.
//!
//! All of these are plain single-owner structures; the wizard keeps them
//! together in [`WizardState`] behind one mutex.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use futures::future::{BoxFuture, Shared};
use jiff::Timestamp;
use log::warn;
use tokio::task::JoinHandle;

use crate::models::{Completeness, StepId, StepLoadState, StepPayload, WizardPhase};

/// "Persist pending edits now" callback registered by a step form.
///
/// Returns the handles of the saves it started; callers may ignore them.
pub type FlushFn = Arc<dyn Fn() -> Vec<JoinHandle<()>> + Send + Sync>;

/// An in-flight step load that every interested caller awaits.
pub type LoadFuture = Shared<BoxFuture<'static, ()>>;

/// Last-known server-confirmed payload per step.
#[derive(Debug, Default)]
pub struct StepDataStore {
    payloads: HashMap<StepId, StepPayload>,
}

impl StepDataStore {
    pub fn get(&self, step: StepId) -> Option<&StepPayload> {
        self.payloads.get(&step)
    }

    pub fn set(&mut self, step: StepId, payload: StepPayload) {
        self.payloads.insert(step, payload);
    }

    pub fn has(&self, step: StepId) -> bool {
        self.payloads.contains_key(&step)
    }

    /// Merges confirmed fields into the cached payload, creating it if needed.
    pub fn merge(&mut self, step: StepId, confirmed: &StepPayload) {
        self.payloads.entry(step).or_default().merge(confirmed);
    }
}

/// Set of steps considered complete. Entries are never removed.
#[derive(Debug, Default)]
pub struct CompletionTracker {
    completed: HashSet<StepId>,
    seeded: bool,
}

impl CompletionTracker {
    /// Seeds from the server's completeness report. Only the first call has
    /// an effect; returns whether it did.
    pub fn seed(&mut self, report: &Completeness) -> bool {
        if self.seeded {
            warn!("Completion tracker already seeded; ignoring report");
            return false;
        }
        self.seeded = true;
        self.completed.extend(report.completed());
        true
    }

    pub fn mark_complete(&mut self, step: StepId) {
        self.completed.insert(step);
    }

    pub fn is_complete(&self, step: StepId) -> bool {
        self.completed.contains(&step)
    }

    /// Completed steps in wizard order.
    pub fn completed(&self) -> Vec<StepId> {
        let mut steps: Vec<StepId> = self.completed.iter().copied().collect();
        steps.sort();
        steps
    }
}

/// Steps with local edits not yet confirmed by a save.
#[derive(Debug, Default)]
pub struct UnsavedTracker {
    changed: HashSet<StepId>,
}

impl UnsavedTracker {
    pub fn mark_changed(&mut self, step: StepId) {
        self.changed.insert(step);
    }

    pub fn clear_changed(&mut self, step: StepId) {
        self.changed.remove(&step);
    }

    pub fn has_unsaved(&self, step: StepId) -> bool {
        self.changed.contains(&step)
    }
}

/// Flush callback per step, owned by whichever form registered first.
#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: HashMap<StepId, (u64, FlushFn)>,
}

impl CallbackRegistry {
    /// Registers `flush` for `step` unless another owner already holds the
    /// slot. Returns whether the registration took effect.
    pub fn register(&mut self, step: StepId, owner: u64, flush: FlushFn) -> bool {
        if self.callbacks.contains_key(&step) {
            return false;
        }
        self.callbacks.insert(step, (owner, flush));
        true
    }

    /// Releases the slot if `owner` holds it.
    pub fn unregister(&mut self, step: StepId, owner: u64) -> bool {
        match self.callbacks.get(&step) {
            Some((current, _)) if *current == owner => {
                self.callbacks.remove(&step);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, step: StepId) -> Option<FlushFn> {
        self.callbacks.get(&step).map(|(_, flush)| Arc::clone(flush))
    }

    pub fn has(&self, step: StepId) -> bool {
        self.callbacks.contains_key(&step)
    }
}

/// Everything the wizard mutates, kept under one lock.
pub(crate) struct WizardState {
    pub active: StepId,
    pub phase: WizardPhase,
    pub step_loading: Option<StepId>,
    pub load_states: HashMap<StepId, StepLoadState>,
    pub loads: HashMap<StepId, LoadFuture>,
    pub data: StepDataStore,
    pub completed: CompletionTracker,
    pub unsaved: UnsavedTracker,
    pub callbacks: CallbackRegistry,
    pub saved_at: HashMap<StepId, Timestamp>,
}

impl WizardState {
    pub fn new(first: StepId) -> Self {
        Self {
            active: first,
            phase: WizardPhase::LoadingInitial,
            step_loading: None,
            load_states: HashMap::new(),
            loads: HashMap::new(),
            data: StepDataStore::default(),
            completed: CompletionTracker::default(),
            unsaved: UnsavedTracker::default(),
            callbacks: CallbackRegistry::default(),
            saved_at: HashMap::new(),
        }
    }

    pub fn load_state(&self, step: StepId) -> StepLoadState {
        self.load_states.get(&step).copied().unwrap_or_default()
    }

    /// Saved badge: cached data present and nothing unsaved.
    pub fn show_saved_badge(&self, step: StepId) -> bool {
        self.data.get(step).is_some_and(StepPayload::has_data) && !self.unsaved.has_unsaved(step)
    }
}
