//! Success and failure messages.

use std::fmt;

use crate::wizard::WizardEvent;

/// Outcome line of a command or a wizard event.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }

    /// User-facing line for an event; loads are not reported.
    pub fn from_event(event: &WizardEvent) -> Option<Self> {
        match event {
            WizardEvent::StepLoaded { .. } => None,
            WizardEvent::StepSaved { step } => {
                Some(Self::success(format!("Etapa {} salva", step.label())))
            }
            WizardEvent::Alert { message, .. } => Some(Self::failure(message.clone())),
            WizardEvent::Finalized { id } => Some(Self::success(format!("Imóvel {id} ativado"))),
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.success { "✓" } else { "✗ Erro:" };
        writeln!(f, "{marker} {}", self.message)
    }
}
