//! "Publicação": responsible broker and listing visibility.

use super::{FieldSpec, StepForm};
use crate::{
    error::Result,
    models::{OptionItem, StepId},
};

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::integer("corretorId", "corretor_id"),
    FieldSpec::yes_no("publicarSite", "publicar_site"),
    FieldSpec::yes_no("destaque", "destaque"),
    FieldSpec::yes_no("exibirEndereco", "exibir_endereco"),
];

impl StepForm {
    /// Users that can be picked as the responsible broker.
    pub async fn corretor_options(&self) -> Result<Vec<OptionItem>> {
        self.require_step(StepId::Publicacao, "corretorId")?;
        let wizard = self.wizard();
        Ok(wizard.cache().usuarios(wizard.api()).await)
    }
}
