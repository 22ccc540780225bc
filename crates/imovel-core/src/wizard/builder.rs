//! Builder for creating and opening Wizard instances.

use std::sync::{atomic::AtomicU64, Arc, Mutex};

use tokio::sync::broadcast;

use super::{state::WizardState, Wizard, WizardInner};
use crate::{
    api::PropertyApi,
    cache::SessionCache,
    config::AutosaveConfig,
    error::{Result, WizardError},
    models::{PropertyId, StepId},
};

const EVENT_CAPACITY: usize = 64;

/// Builder for creating and configuring Wizard instances.
pub struct WizardBuilder {
    property_id: PropertyId,
    api: Option<Arc<dyn PropertyApi>>,
    cache: Option<SessionCache>,
    autosave: AutosaveConfig,
}

impl WizardBuilder {
    /// Creates a builder for an existing property.
    pub fn new(property_id: PropertyId) -> Self {
        Self {
            property_id,
            api: None,
            cache: None,
            autosave: AutosaveConfig::default(),
        }
    }

    /// Sets the backend client.
    pub fn with_api(mut self, api: Arc<dyn PropertyApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Shares an existing session cache. Without one, the wizard gets a
    /// private cache.
    pub fn with_cache(mut self, cache: SessionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_autosave(mut self, autosave: AutosaveConfig) -> Self {
        self.autosave = autosave;
        self
    }

    /// Builds the wizard without touching the network. The wizard stays in
    /// the `LoadingInitial` phase until [`Wizard::initialize`] runs.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::Configuration` if no API client was provided.
    pub fn build(self) -> Result<Wizard> {
        let api = self.api.ok_or_else(|| WizardError::Configuration {
            message: "No API client configured for the wizard".to_string(),
        })?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Wizard {
            inner: Arc::new(WizardInner {
                id: self.property_id,
                api,
                cache: self.cache.unwrap_or_default(),
                autosave: self.autosave,
                state: Mutex::new(WizardState::new(StepId::ALL[0])),
                events,
                next_owner: AtomicU64::new(1),
            }),
        })
    }

    /// Builds the wizard and loads the completeness report and first step.
    pub async fn open(self) -> Result<Wizard> {
        let wizard = self.build()?;
        wizard.initialize().await;
        Ok(wizard)
    }
}
