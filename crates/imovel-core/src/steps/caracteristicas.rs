//! "Características do imóvel" and "Características do condomínio".
//!
//! Both steps share one field table: the list of selected characteristic
//! ids. This module also carries the option toggling used by every
//! selection step, proximidades included.

use serde_json::Value;

use super::{FieldKind, FieldSpec, StepForm};
use crate::{
    error::{Result, WizardError},
    models::{normalize_selection, CaracteristicaEscopo, OptionItem, StepId},
};

pub const FIELDS: &[FieldSpec] =
    &[FieldSpec::new("caracteristicas", "caracteristicas", FieldKind::IdList).batched()];

/// The field holding the selection on a selection step.
fn selection_key(step: StepId) -> Option<&'static str> {
    match step {
        StepId::CaracteristicasImovel | StepId::CaracteristicasCondominio => {
            Some("caracteristicas")
        }
        StepId::Proximidades => Some(super::proximidades::SELECTION_KEY),
        _ => None,
    }
}

/// Which catalogue a characteristics step selects from.
pub fn escopo(step: StepId) -> Option<CaracteristicaEscopo> {
    match step {
        StepId::CaracteristicasImovel => Some(CaracteristicaEscopo::Imovel),
        StepId::CaracteristicasCondominio => Some(CaracteristicaEscopo::Condominio),
        _ => None,
    }
}

impl StepForm {
    fn require_selection(&self) -> Result<&'static str> {
        selection_key(self.step()).ok_or_else(|| WizardError::UnknownField {
            step: self.step(),
            field: "caracteristicas".to_string(),
        })
    }

    /// Ids currently selected on a selection step.
    pub fn selected_options(&self) -> Result<Vec<u64>> {
        let key = self.require_selection()?;
        Ok(self
            .value(key)
            .map(|value| normalize_selection(&value))
            .unwrap_or_default())
    }

    /// Selects `id` if it is not selected, deselects it otherwise.
    ///
    /// Returns whether the option is selected afterwards. The save uses the
    /// batch debounce delay. Panics outside a tokio runtime.
    pub fn toggle_option(&self, id: u64) -> Result<bool> {
        let key = self.require_selection()?;
        let mut ids = self.selected_options()?;
        let selected = match ids.iter().position(|current| *current == id) {
            Some(index) => {
                ids.remove(index);
                false
            }
            None => {
                ids.push(id);
                true
            }
        };
        self.set_field(key, Value::from(ids))?;
        Ok(selected)
    }

    /// Options the user can pick from, served from the session cache.
    ///
    /// A failed fetch yields an empty list.
    pub async fn options(&self) -> Result<Vec<OptionItem>> {
        self.require_selection()?;
        let wizard = self.wizard();
        let options = match escopo(self.step()) {
            Some(escopo) => wizard.cache().caracteristicas(wizard.api(), escopo).await,
            None => wizard.cache().proximidades(wizard.api()).await,
        };
        Ok(options)
    }
}
