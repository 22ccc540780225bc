//! Per-step payloads and the completeness report.

use std::collections::{BTreeMap, HashMap};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{options::normalize_selection, StepId};

/// The server's view of one step, as a JSON object keyed by API field names.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct StepPayload(pub Map<String, Value>);

impl StepPayload {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Whether at least one field carries a meaningful value.
    ///
    /// Nulls, empty strings, empty arrays and empty objects do not count.
    pub fn has_data(&self) -> bool {
        self.0.values().any(is_meaningful)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Overwrites this payload's fields with the fields of `other`.
    pub fn merge(&mut self, other: &StepPayload) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.0.iter()
    }

    /// Rewrites selection lists to plain id arrays.
    ///
    /// The characteristics and proximities endpoints return either raw ids or
    /// `{id, nome}` objects depending on the route.
    pub fn normalize_selections(&mut self, step: StepId) {
        let key = match step {
            StepId::CaracteristicasImovel | StepId::CaracteristicasCondominio => "caracteristicas",
            StepId::Proximidades => "proximidades",
            _ => return,
        };
        if let Some(value) = self.0.get_mut(key) {
            let ids = normalize_selection(value);
            *value = Value::Array(ids.into_iter().map(Value::from).collect());
        }
    }
}

impl From<Map<String, Value>> for StepPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for StepPayload {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
    }
}

fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Server-computed map of step to "has been filled in".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completeness(pub HashMap<StepId, bool>);

impl Completeness {
    /// Builds the report from the raw wire map, skipping unknown step names.
    pub fn from_wire(raw: BTreeMap<String, bool>) -> Self {
        let mut steps = HashMap::new();
        for (name, complete) in raw {
            match name.parse::<StepId>() {
                Ok(step) => {
                    steps.insert(step, complete);
                }
                Err(_) => debug!("Ignoring unknown step '{name}' in completeness report"),
            }
        }
        Self(steps)
    }

    pub fn is_complete(&self, step: StepId) -> bool {
        self.0.get(&step).copied().unwrap_or(false)
    }

    pub fn completed(&self) -> impl Iterator<Item = StepId> + '_ {
        self.0
            .iter()
            .filter(|(_, complete)| **complete)
            .map(|(step, _)| *step)
    }
}

impl<'de> Deserialize<'de> for Completeness {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        BTreeMap::<String, bool>::deserialize(deserializer).map(Completeness::from_wire)
    }
}
