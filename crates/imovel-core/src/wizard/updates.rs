use jiff::Timestamp;
use log::{debug, info, trace, warn};

use super::{Wizard, WizardEvent};
use crate::{
    error::Result,
    models::{StepId, StepPayload, WizardPhase},
};

pub(crate) fn save_failure_message(step: StepId) -> String {
    format!("Erro ao salvar dados da etapa {}. Tente novamente", step.label())
}

const FINALIZE_FAILURE_MESSAGE: &str = "Erro ao finalizar o cadastro do imóvel. Tente novamente";

impl Wizard {
    /// Update contract between step forms and the shell.
    ///
    /// With `has_changes == false` this is a notification only and returns
    /// `Ok(false)` without touching the network. Otherwise `data` is sent to
    /// the step endpoint. On success the sent fields are merged into the
    /// store, the step is marked complete and its unsaved flag cleared.
    ///
    /// # Errors
    ///
    /// Returns the API error after publishing an alert. Trackers and the
    /// caller's local form state are left as they were.
    pub async fn on_step_update(
        &self,
        step: StepId,
        data: StepPayload,
        has_changes: bool,
    ) -> Result<bool> {
        if !has_changes {
            trace!("Step {step} reported no changes");
            return Ok(false);
        }

        let id = self.inner.id;
        if step.is_remote() {
            debug!("Saving {} field(s) of step {step} for property {id}", data.len());
            if let Err(e) = self.inner.api.update_step(id, step, &data).await {
                warn!("Failed to save step {step} for property {id}: {e}");
                self.emit(WizardEvent::Alert {
                    step: Some(step),
                    message: save_failure_message(step),
                });
                return Err(e);
            }
        } else {
            trace!("Step {step} is local-only; keeping {} field(s) in memory", data.len());
        }

        {
            let mut state = self.state();
            state.data.merge(step, &data);
            state.completed.mark_complete(step);
            state.unsaved.clear_changed(step);
            state.saved_at.insert(step, Timestamp::now());
        }
        self.emit(WizardEvent::StepSaved { step });
        Ok(true)
    }

    /// Activates the property.
    ///
    /// Pending edits on the active step are flushed and awaited first. Does
    /// not check that every step is complete. Calling it again while a
    /// finalize is running or after it succeeded does nothing.
    pub async fn finalize(&self) -> Result<()> {
        {
            let mut state = self.state();
            match state.phase {
                WizardPhase::SavingFinalize | WizardPhase::Finished => {
                    debug!("Finalize already {}", state.phase.as_str());
                    return Ok(());
                }
                _ => state.phase = WizardPhase::SavingFinalize,
            }
        }

        let id = self.inner.id;
        self.flush_step_and_wait(self.active_step()).await;

        match self.inner.api.activate(id).await {
            Ok(()) => {
                self.state().phase = WizardPhase::Finished;
                info!("Property {id} activated");
                self.emit(WizardEvent::Finalized { id });
                Ok(())
            }
            Err(e) => {
                self.state().phase = WizardPhase::Ready;
                warn!("Failed to activate property {id}: {e}");
                self.emit(WizardEvent::Alert {
                    step: None,
                    message: FINALIZE_FAILURE_MESSAGE.to_string(),
                });
                Err(e)
            }
        }
    }
}
