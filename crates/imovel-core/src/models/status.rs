//! Status enumerations for steps, the wizard and the property.

use serde::{Deserialize, Serialize};

/// Load lifecycle of a single step's server data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StepLoadState {
    /// Never fetched
    #[default]
    NotLoaded,

    /// A fetch is in flight
    Loading,

    /// Fetched, with or without data
    Loaded,
}

/// Global phase of a wizard instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WizardPhase {
    /// Fetching the completeness report and the first step
    #[default]
    LoadingInitial,

    /// Interactive
    Ready,

    /// The activate call is in flight
    SavingFinalize,

    /// The property was activated; the wizard is done
    Finished,
}

impl WizardPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardPhase::LoadingInitial => "loading-initial",
            WizardPhase::Ready => "ready",
            WizardPhase::SavingFinalize => "saving-finalize",
            WizardPhase::Finished => "finished",
        }
    }
}

/// Publication status of a property, as understood by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PropertyStatus {
    Rascunho,
    Ativo,
    Inativo,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Rascunho => "RASCUNHO",
            PropertyStatus::Ativo => "ATIVO",
            PropertyStatus::Inativo => "INATIVO",
        }
    }
}
