//! "Complementos": videos, virtual tour and notes.

use serde_json::Value;

use super::{FieldKind, FieldSpec, StepForm};
use crate::{
    error::{Result, WizardError},
    models::StepId,
};

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("videos", "videos", FieldKind::TextList).batched(),
    FieldSpec::text("tourVirtual", "tour_virtual"),
    FieldSpec::text("observacoes", "observacoes"),
];

impl StepForm {
    pub fn videos(&self) -> Vec<String> {
        string_list(self.value("videos"))
    }

    /// Appends a video URL. Returns `false` if it was already listed.
    ///
    /// Like every edit this schedules a save, so it panics outside a tokio
    /// runtime.
    pub fn add_video(&self, url: &str) -> Result<bool> {
        self.require_step(StepId::Complementos, "videos")?;
        let url = url.trim();
        if url.is_empty() {
            return Err(WizardError::invalid_input("videos").with_reason("empty video URL"));
        }
        let mut videos = self.videos();
        if videos.iter().any(|video| video == url) {
            return Ok(false);
        }
        videos.push(url.to_string());
        self.set_field("videos", Value::from(videos))
    }

    /// Removes a video URL. Returns `false` if it was not listed.
    pub fn remove_video(&self, url: &str) -> Result<bool> {
        self.require_step(StepId::Complementos, "videos")?;
        let mut videos = self.videos();
        let before = videos.len();
        videos.retain(|video| video != url.trim());
        if videos.len() == before {
            return Ok(false);
        }
        self.set_field("videos", Value::from(videos))
    }

    pub(crate) fn require_step(&self, step: StepId, field: &str) -> Result<()> {
        if self.step() == step {
            Ok(())
        } else {
            Err(WizardError::UnknownField {
                step: self.step(),
                field: field.to_string(),
            })
        }
    }
}

pub(crate) fn string_list(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
