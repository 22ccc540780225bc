//! Step forms: local form state with debounced autosave.
//!
//! A [`StepForm`] is the headless counterpart of one wizard step's screen. It
//! keeps the values being edited (keyed by the camelCase field keys of the
//! step's table), debounces saves per save group, and registers a flush
//! callback with the [`Wizard`] so navigating away never drops an edit that
//! is still waiting for its timer.
//!
//! Every step uses the same engine; the per-step modules only declare their
//! field table and, where needed, a few convenience operations (option
//! toggles, CEP lookup, video and image lists).

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use futures::future::join_all;
use log::{debug, trace};
use serde_json::{Map, Value};
use tokio::task::JoinHandle;

use crate::{
    debounce::Debouncer,
    error::{Result, WizardError},
    models::{StepId, StepPayload},
    wizard::{FlushFn, Wizard},
};

pub mod caracteristicas;
pub mod comodos;
pub mod complementos;
pub mod dados_privativos;
pub mod descricao;
pub mod fields;
pub mod imagens;
pub mod informacoes;
pub mod localizacao;
pub mod medidas;
pub mod preco;
pub mod proximidades;
pub mod publicacao;

pub use fields::{FieldKind, FieldSpec};

/// The field table of a step.
pub fn fields_for(step: StepId) -> &'static [FieldSpec] {
    match step {
        StepId::Informacoes => informacoes::FIELDS,
        StepId::Comodos => comodos::FIELDS,
        StepId::Medidas => medidas::FIELDS,
        StepId::Preco => preco::FIELDS,
        StepId::CaracteristicasImovel | StepId::CaracteristicasCondominio => {
            caracteristicas::FIELDS
        }
        StepId::Localizacao => localizacao::FIELDS,
        StepId::Proximidades => proximidades::FIELDS,
        StepId::Descricao => descricao::FIELDS,
        StepId::Complementos => complementos::FIELDS,
        StepId::DadosPrivativos => dados_privativos::FIELDS,
        StepId::Imagens => imagens::FIELDS,
        StepId::Publicacao => publicacao::FIELDS,
    }
}

#[derive(Default)]
struct FormState {
    /// Current values by field key
    values: Map<String, Value>,
    revision: u64,
    /// Latest unconfirmed revision per save group
    dirty: HashMap<&'static str, u64>,
    /// Revision currently being sent per save group
    inflight: HashMap<&'static str, u64>,
}

struct FormInner {
    step: StepId,
    wizard: Wizard,
    fields: &'static [FieldSpec],
    debouncer: Debouncer<&'static str>,
    owner: Option<u64>,
    state: Mutex<FormState>,
}

/// Editable form for one wizard step. Cloning shares the form.
#[derive(Clone)]
pub struct StepForm {
    inner: Arc<FormInner>,
}

impl StepForm {
    /// Opens the form for `step`, hydrated from the wizard's cached payload.
    ///
    /// The form registers itself as the step's flush callback. If another
    /// live form already holds that slot the first one keeps it.
    pub fn open(wizard: &Wizard, step: StepId) -> Self {
        let fields = fields_for(step);
        let values = hydrate(fields, wizard.step_data(step).as_ref());

        let inner = Arc::new_cyclic(|weak: &Weak<FormInner>| {
            let handle = Weak::clone(weak);
            let flush: FlushFn = Arc::new(move || {
                handle
                    .upgrade()
                    .map(|form| form.flush())
                    .unwrap_or_default()
            });
            let owner = wizard.register_flush(step, flush);
            if owner.is_none() {
                debug!("Step {step} already has a flush callback; keeping the first");
            }

            FormInner {
                step,
                wizard: wizard.clone(),
                fields,
                debouncer: Debouncer::new(),
                owner,
                state: Mutex::new(FormState {
                    values,
                    ..FormState::default()
                }),
            }
        });

        Self { inner }
    }

    pub fn step(&self) -> StepId {
        self.inner.step
    }

    pub fn wizard(&self) -> &Wizard {
        &self.inner.wizard
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.inner.fields
    }

    /// Current value of a field, if it was ever set or loaded.
    pub fn value(&self, key: &str) -> Option<Value> {
        self.inner.lock().values.get(key).cloned()
    }

    /// Snapshot of every field value by field key.
    pub fn values(&self) -> Map<String, Value> {
        self.inner.lock().values.clone()
    }

    /// Whether some save group has an edit the server has not confirmed.
    pub fn is_dirty(&self) -> bool {
        !self.inner.lock().dirty.is_empty()
    }

    /// Number of save groups waiting for their debounce timer.
    pub fn pending_saves(&self) -> usize {
        self.inner.debouncer.pending_count()
    }

    /// Applies an edit to a field and schedules its save.
    ///
    /// Returns `Ok(false)` when the value did not change, in which case
    /// nothing is scheduled.
    ///
    /// # Errors
    ///
    /// * `WizardError::UnknownField` if the step has no such field
    /// * `WizardError::InvalidInput` if the value cannot be coerced; the
    ///   previous value stays in place
    ///
    /// # Panics
    ///
    /// Panics when a changed value is set outside a tokio runtime.
    pub fn set_field(&self, key: &str, value: impl Into<Value>) -> Result<bool> {
        let spec = self.spec(key)?;
        let coerced = spec.coerce(&value.into())?;
        let group = spec.group_key();

        let (revision, payload) = {
            let mut state = self.inner.lock();
            if state.values.get(spec.key).unwrap_or(&Value::Null) == &coerced {
                trace!("Field {key} of step {} unchanged", self.inner.step);
                return Ok(false);
            }
            state.values.insert(spec.key.to_string(), coerced);
            state.revision += 1;
            let revision = state.revision;
            state.dirty.insert(group, revision);
            (revision, self.inner.group_payload(&state.values, group))
        };

        self.inner.wizard.mark_changed(self.inner.step);
        self.inner.schedule(group, revision, payload, spec.batch);
        Ok(true)
    }

    /// Applies several edits, stopping at the first error.
    ///
    /// Panics outside a tokio runtime, like [`StepForm::set_field`].
    pub fn set_fields<I, K, V>(&self, edits: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut changed = 0;
        for (key, value) in edits {
            if self.set_field(key.as_ref(), value)? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Sends pending edits now. See [`Wizard::flush_step`].
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime when there is something to send.
    pub fn flush(&self) -> Vec<JoinHandle<()>> {
        self.inner.flush()
    }

    /// Sends pending edits and waits until every save settled.
    pub async fn flush_and_wait(&self) {
        for outcome in join_all(self.flush()).await {
            if let Err(e) = outcome {
                debug!("Save task for step {} ended early: {e}", self.inner.step);
            }
        }
    }

    fn spec(&self, key: &str) -> Result<&'static FieldSpec> {
        self.inner
            .fields
            .iter()
            .find(|spec| spec.key == key)
            .ok_or_else(|| WizardError::UnknownField {
                step: self.inner.step,
                field: key.to_string(),
            })
    }
}

impl FormInner {
    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Body of one save group: every member with a value or a default.
    fn group_payload(&self, values: &Map<String, Value>, group: &str) -> StepPayload {
        let mut payload = StepPayload::new();
        for spec in self.fields.iter().filter(|spec| spec.group_key() == group) {
            match (values.get(spec.key), spec.default) {
                (Some(value), _) if !value.is_null() => {
                    payload.insert(spec.api_key, value.clone());
                }
                (_, Some(default)) => {
                    payload.insert(spec.api_key, Value::from(default));
                }
                (Some(_), None) => {
                    payload.insert(spec.api_key, Value::Null);
                }
                (None, None) => {}
            }
        }
        payload
    }

    fn schedule(
        self: &Arc<Self>,
        group: &'static str,
        revision: u64,
        payload: StepPayload,
        batch: bool,
    ) {
        let autosave = self.wizard.autosave();
        let delay = if batch {
            autosave.batch_delay()
        } else {
            autosave.field_delay()
        };
        trace!("Scheduling save of {group} on step {} in {delay:?}", self.step);

        let form = Arc::clone(self);
        self.debouncer.schedule(group, delay, move || async move {
            form.send(group, revision, payload).await;
        });
    }

    async fn send(&self, group: &'static str, revision: u64, payload: StepPayload) {
        {
            let mut state = self.lock();
            let current = state.dirty.get(group) == Some(&revision);
            let duplicate = state.inflight.get(group) == Some(&revision);
            if !current || duplicate {
                trace!("Skipping stale save of {group} (revision {revision})");
                return;
            }
            state.inflight.insert(group, revision);
        }

        // The wizard publishes the alert on failure.
        let saved = self
            .wizard
            .on_step_update(self.step, payload, true)
            .await
            .is_ok();

        let still_dirty = {
            let mut state = self.lock();
            if state.inflight.get(group) == Some(&revision) {
                state.inflight.remove(group);
            }
            if saved && state.dirty.get(group) == Some(&revision) {
                state.dirty.remove(group);
            }
            !state.dirty.is_empty()
        };
        if saved && still_dirty {
            self.wizard.mark_changed(self.step);
        }
    }

    /// Fires pending timers and re-sends groups whose last save failed.
    fn flush(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        let retries: Vec<(&'static str, u64, StepPayload)> = {
            let state = self.lock();
            state
                .dirty
                .iter()
                .filter(|(group, _)| {
                    !self.debouncer.is_pending(group) && !state.inflight.contains_key(*group)
                })
                .map(|(group, revision)| {
                    (*group, *revision, self.group_payload(&state.values, group))
                })
                .collect()
        };

        let mut handles = self.debouncer.flush_all();
        for (group, revision, payload) in retries {
            debug!("Retrying unsaved {group} on step {}", self.step);
            let form = Arc::clone(self);
            handles.push(tokio::spawn(async move {
                form.send(group, revision, payload).await;
            }));
        }
        handles
    }
}

impl Drop for FormInner {
    fn drop(&mut self) {
        if let Some(owner) = self.owner {
            self.wizard.unregister_flush(self.step, owner);
        }
    }
}

/// Maps a cached payload (API keys) onto field keys.
fn hydrate(fields: &[FieldSpec], payload: Option<&StepPayload>) -> Map<String, Value> {
    let mut values = Map::new();
    let Some(payload) = payload else {
        return values;
    };
    for spec in fields {
        if let Some(value) = payload.get(spec.api_key) {
            let value = match spec.kind {
                FieldKind::IdList => Value::from(crate::models::normalize_selection(value)),
                _ => value.clone(),
            };
            values.insert(spec.key.to_string(), value);
        }
    }
    values
}
