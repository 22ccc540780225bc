//! Postal address returned by the CEP lookup collaborator.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WizardError};

/// Address fields resolved from a CEP.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub uf: String,
    pub cidade: String,
    pub bairro: String,
    pub logradouro: String,
}

/// Strips formatting from a CEP and checks it has exactly 8 digits.
pub fn normalize_cep(raw: &str) -> Result<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 8 {
        Ok(digits)
    } else {
        Err(WizardError::invalid_input("cep")
            .with_reason(format!("expected 8 digits, got '{raw}'")))
    }
}
