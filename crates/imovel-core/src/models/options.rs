//! Reference options (characteristics, proximities, users).

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WizardError;

/// One selectable reference option.
///
/// The user select endpoint answers with `{value, label}` while the option
/// endpoints use `{id, nome}`; both shapes deserialize into this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionItem {
    #[serde(alias = "value")]
    pub id: u64,
    #[serde(alias = "label", alias = "name")]
    pub nome: String,
}

/// Which characteristic catalogue to read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CaracteristicaEscopo {
    Imovel,
    Condominio,
}

impl CaracteristicaEscopo {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaracteristicaEscopo::Imovel => "imovel",
            CaracteristicaEscopo::Condominio => "condominio",
        }
    }
}

impl fmt::Display for CaracteristicaEscopo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaracteristicaEscopo {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "imovel" | "imóvel" => Ok(CaracteristicaEscopo::Imovel),
            "condominio" | "condomínio" => Ok(CaracteristicaEscopo::Condominio),
            _ => Err(WizardError::invalid_input("escopo")
                .with_reason(format!("expected 'imovel' or 'condominio', got '{s}'"))),
        }
    }
}

/// Extracts plain ids from a selection in any of the shapes the API uses.
///
/// Accepts an array of numbers, numeric strings, or objects carrying an `id`
/// (or `value`) key. A single scalar is treated as a one-element selection.
/// Anything unrecognizable is dropped; duplicates keep their first position.
pub fn normalize_selection(value: &Value) -> Vec<u64> {
    let mut ids: Vec<u64> = Vec::new();
    let mut push = |id: Option<u64>| {
        if let Some(id) = id {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    };

    match value {
        Value::Array(items) => items.iter().for_each(|item| push(selection_id(item))),
        Value::String(s) => s
            .split(',')
            .for_each(|part| push(part.trim().parse().ok())),
        other => push(selection_id(other)),
    }
    ids
}

fn selection_id(item: &Value) -> Option<u64> {
    match item {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(map) => map
            .get("id")
            .or_else(|| map.get("value"))
            .and_then(selection_id),
        _ => None,
    }
}
