//! Wizard operations shared by the CLI commands and the MCP tools.
//!
//! Each operation opens a fresh wizard for the requested property, drives it
//! through the same navigation and autosave paths an interactive client
//! would use, and returns the outcome as markdown.

use std::{collections::BTreeSet, sync::Arc};

use imovel_core::{
    api::{HttpPropertyApi, ViaCepLookup},
    display::{OptionItems, StepSummaries, StepView},
    models::normalize_cep,
    AddressLookup, AutosaveConfig, Config, OperationStatus, OptionList, PropertyApi, PropertyId,
    Result, SessionCache, StepForm, StepId, Wizard, WizardBuilder, WizardEvent,
};
use log::{debug, info};
use serde_json::Value;
use tokio::sync::broadcast::Receiver;

/// Backend clients plus the option cache shared by every wizard opened in
/// this process.
#[derive(Clone)]
pub struct Session {
    api: Arc<dyn PropertyApi>,
    lookup: Arc<dyn AddressLookup>,
    cache: SessionCache,
    autosave: AutosaveConfig,
}

impl Session {
    pub fn new(
        api: Arc<dyn PropertyApi>,
        lookup: Arc<dyn AddressLookup>,
        autosave: AutosaveConfig,
    ) -> Self {
        Self {
            api,
            lookup,
            cache: SessionCache::new(),
            autosave,
        }
    }

    /// Creates the reqwest clients described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = HttpPropertyApi::from_config(&config.api)?;
        let lookup = ViaCepLookup::from_config(&config.api)?;
        debug!("Backend at {}", api.base_url());
        Ok(Self::new(Arc::new(api), Arc::new(lookup), config.autosave))
    }

    pub async fn open_wizard(&self, id: PropertyId) -> Result<Wizard> {
        WizardBuilder::new(id)
            .with_api(Arc::clone(&self.api))
            .with_cache(self.cache.clone())
            .with_autosave(self.autosave)
            .open()
            .await
    }

    /// Step list of a property with completion marks.
    pub async fn status(&self, id: PropertyId) -> Result<String> {
        let wizard = self.open_wizard(id).await?;
        Ok(format!(
            "# Imóvel {id}\n\n{}",
            StepSummaries(wizard.step_summaries())
        ))
    }

    pub async fn show_step(&self, id: PropertyId, step: StepId) -> Result<String> {
        let wizard = self.open_wizard(id).await?;
        wizard.go_to(step).await;
        Ok(StepView::from_wizard(&wizard, step).to_string())
    }

    /// Applies field edits through the step form and waits for every save.
    ///
    /// On the location step a `cep` edit goes through the address lookup, so
    /// the address fields are filled in and saved together.
    pub async fn update_step(
        &self,
        id: PropertyId,
        step: StepId,
        assignments: Vec<(String, Value)>,
    ) -> Result<String> {
        let wizard = self.open_wizard(id).await?;
        wizard.go_to(step).await;
        let events = wizard.subscribe();
        let form = StepForm::open(&wizard, step);

        let mut changed = 0;
        for (key, value) in assignments {
            if step == StepId::Localizacao && key == "cep" {
                let code = match value {
                    Value::String(code) => code,
                    other => other.to_string(),
                };
                form.apply_cep(self.lookup.as_ref(), &code).await?;
                changed += 1;
            } else if form.set_field(&key, value)? {
                changed += 1;
            }
        }
        info!("Saving {changed} change(s) to step {step} of property {id}");
        form.flush_and_wait().await;

        let mut output = StepView::from_form(&form).to_string();
        output.push('\n');
        if changed == 0 {
            output.push_str(&OperationStatus::success("Nenhuma alteração").to_string());
        }
        output.push_str(&drain_statuses(events));
        Ok(output)
    }

    pub async fn finalize(&self, id: PropertyId) -> Result<String> {
        let wizard = self.open_wizard(id).await?;
        let events = wizard.subscribe();
        wizard.finalize().await?;
        Ok(drain_statuses(events))
    }

    /// One reference option list; a failed load renders as an empty list.
    ///
    /// Lists are memoized for the life of the session. `refresh` drops the
    /// memoized copy and asks the backend again.
    pub async fn options(&self, list: OptionList, refresh: bool) -> String {
        let items = if refresh {
            self.cache.refresh_options(&self.api, list).await
        } else {
            self.cache.options(&self.api, list).await
        };
        let title = match list {
            OptionList::Caracteristicas(escopo) => format!("Características ({escopo})"),
            OptionList::Proximidades => "Proximidades".to_string(),
            OptionList::Usuarios => "Corretores".to_string(),
        };
        format!("# {title}\n\n{}", OptionItems::new(&items))
    }

    pub async fn lookup_cep(&self, code: &str) -> Result<String> {
        let cep = normalize_cep(code)?;
        let address = self.lookup.lookup(&cep).await?;
        Ok(format!("**CEP {cep}:** {address}\n"))
    }
}

/// Renders the save, alert and finalize events received so far, once each.
fn drain_statuses(mut events: Receiver<WizardEvent>) -> String {
    let mut seen = BTreeSet::new();
    let mut output = String::new();
    while let Ok(event) = events.try_recv() {
        if let Some(status) = OperationStatus::from_event(&event) {
            let line = status.to_string();
            if seen.insert(line.clone()) {
                output.push_str(&line);
            }
        }
    }
    output
}
