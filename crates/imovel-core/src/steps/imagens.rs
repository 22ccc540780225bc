//! "Imagens": photo list.
//!
//! Images are uploaded out of band; this step keeps the list and the cover
//! choice in memory only and never calls the step endpoints.

use serde_json::Value;

use super::{complementos::string_list, FieldKind, FieldSpec, StepForm};
use crate::{
    error::{Result, WizardError},
    models::StepId,
};

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("imagens", "imagens", FieldKind::TextList).batched(),
    FieldSpec::text("imagemPrincipal", "imagem_principal"),
];

impl StepForm {
    pub fn images(&self) -> Vec<String> {
        string_list(self.value("imagens"))
    }

    /// Adds an image. Returns `false` if it was already listed. Panics outside
    /// a tokio runtime.
    pub fn add_image(&self, name: &str) -> Result<bool> {
        self.require_step(StepId::Imagens, "imagens")?;
        let name = name.trim();
        if name.is_empty() {
            return Err(WizardError::invalid_input("imagens").with_reason("empty image name"));
        }
        let mut images = self.images();
        if images.iter().any(|image| image == name) {
            return Ok(false);
        }
        images.push(name.to_string());
        self.set_field("imagens", Value::from(images))
    }

    /// Removes an image, clearing the cover if it pointed at it.
    pub fn remove_image(&self, name: &str) -> Result<bool> {
        self.require_step(StepId::Imagens, "imagens")?;
        let name = name.trim();
        let mut images = self.images();
        let before = images.len();
        images.retain(|image| image != name);
        if images.len() == before {
            return Ok(false);
        }
        if self.value("imagemPrincipal") == Some(Value::from(name)) {
            self.set_field("imagemPrincipal", Value::Null)?;
        }
        self.set_field("imagens", Value::from(images))
    }
}
