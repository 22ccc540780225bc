//! Single-step views and `Display` for domain models.

use std::fmt;

use serde_json::{Map, Value};

use super::{LocalDateTime, SAVED_BADGE};
use crate::{
    models::{Address, StepId},
    steps::{fields_for, FieldSpec, StepForm},
    wizard::Wizard,
};

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}/{}",
            self.logradouro, self.bairro, self.cidade, self.uf
        )
    }
}

/// One step rendered as a field table.
pub struct StepView {
    step: StepId,
    fields: &'static [FieldSpec],
    values: Map<String, Value>,
    completed: bool,
    saved_badge: bool,
    unsaved: bool,
    saved_at: Option<jiff::Timestamp>,
}

impl StepView {
    /// View of the data the wizard has cached for `step`.
    pub fn from_wizard(wizard: &Wizard, step: StepId) -> Self {
        let fields = fields_for(step);
        let mut values = Map::new();
        if let Some(payload) = wizard.step_data(step) {
            for spec in fields {
                if let Some(value) = payload.get(spec.api_key) {
                    values.insert(spec.key.to_string(), value.clone());
                }
            }
        }
        Self::build(wizard, step, values)
    }

    /// View of a form's current (possibly unsaved) values.
    pub fn from_form(form: &StepForm) -> Self {
        Self::build(form.wizard(), form.step(), form.values())
    }

    fn build(wizard: &Wizard, step: StepId, values: Map<String, Value>) -> Self {
        Self {
            step,
            fields: fields_for(step),
            values,
            completed: wizard.is_complete(step),
            saved_badge: wizard.show_saved_badge(step),
            unsaved: wizard.has_unsaved(step),
            saved_at: wizard.saved_at(step),
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "—".to_string(),
        Value::Bool(true) => "sim".to_string(),
        Value::Bool(false) => "não".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.is_empty() => "—".to_string(),
        Value::Array(items) => items.iter().map(format_value).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

impl fmt::Display for StepView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.completed { "✓" } else { "○" };
        writeln!(f, "# {mark} {}", self.step.label())?;
        writeln!(f)?;
        writeln!(f, "**Etapa:** `{}`", self.step.api_name())?;
        if self.saved_badge {
            writeln!(f, "**{SAVED_BADGE}**")?;
        }
        if self.unsaved {
            writeln!(f, "**Alterações não salvas**")?;
        }
        if let Some(saved_at) = &self.saved_at {
            writeln!(f, "**Salvo em:** {}", LocalDateTime(saved_at))?;
        }
        writeln!(f)?;

        writeln!(f, "| Campo | Valor |")?;
        writeln!(f, "|-------|-------|")?;
        for spec in self.fields {
            let value = match (self.values.get(spec.key), spec.default) {
                (Some(value), _) if !value.is_null() => format_value(value),
                (_, Some(default)) => default.to_string(),
                (Some(value), None) => format_value(value),
                (None, None) => "—".to_string(),
            };
            writeln!(f, "| {} | {value} |", spec.key)?;
        }
        Ok(())
    }
}
