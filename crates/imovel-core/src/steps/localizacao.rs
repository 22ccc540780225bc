//! "Localização": address, filled from the CEP when possible.

use log::debug;

use super::{FieldKind, FieldSpec, StepForm};
use crate::{
    api::AddressLookup,
    error::{Result, WizardError},
    models::{normalize_cep, Address, StepId},
};

/// CEP and the fields it resolves to are always saved together.
const ENDERECO: &str = "endereco";

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("cep", "cep", FieldKind::Cep).in_group(ENDERECO),
    FieldSpec::text("uf", "uf").in_group(ENDERECO),
    FieldSpec::text("cidade", "cidade").in_group(ENDERECO),
    FieldSpec::text("bairro", "bairro").in_group(ENDERECO),
    FieldSpec::text("logradouro", "logradouro").in_group(ENDERECO),
    FieldSpec::text("numero", "numero"),
    FieldSpec::text("complemento", "complemento"),
    FieldSpec::decimal("latitude", "latitude"),
    FieldSpec::decimal("longitude", "longitude"),
];

impl StepForm {
    /// Looks up `cep` and fills the address fields with the result.
    ///
    /// # Errors
    ///
    /// * `WizardError::UnknownField` outside the localização step
    /// * `WizardError::InvalidInput` if `cep` is not 8 digits
    /// * `WizardError::AddressNotFound` if the service does not know it;
    ///   the form is left untouched
    pub async fn apply_cep(&self, lookup: &dyn AddressLookup, cep: &str) -> Result<Address> {
        if self.step() != StepId::Localizacao {
            return Err(WizardError::UnknownField {
                step: self.step(),
                field: "cep".to_string(),
            });
        }
        let cep = normalize_cep(cep)?;
        let address = lookup.lookup(&cep).await?;
        debug!("CEP {cep} resolved to {}/{}", address.cidade, address.uf);

        self.set_fields([
            ("cep", cep.as_str()),
            ("uf", address.uf.as_str()),
            ("cidade", address.cidade.as_str()),
            ("bairro", address.bairro.as_str()),
            ("logradouro", address.logradouro.as_str()),
        ])?;
        Ok(address)
    }
}
