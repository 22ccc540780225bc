//! Declarative field tables and value coercion.
//!
//! Every step form is described by a static table of [`FieldSpec`]s mapping
//! the camelCase key a user edits to the snake_case key the backend stores,
//! together with the coercion applied before saving.

use serde_json::{Number, Value};

use crate::{
    error::{Result, WizardError},
    models::{normalize_cep, normalize_selection},
};

/// How a raw input is turned into the JSON value sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text; blank input clears the field
    Text,
    /// Non-negative whole number
    Integer,
    /// Number accepting Brazilian formatting ("1.234,5")
    Decimal,
    /// Like `Decimal`, with an optional "R$" prefix
    Money,
    /// Boolean from sim/não style answers
    YesNo,
    /// Selection of option ids, as raw ids or `{id, nome}` objects
    IdList,
    /// List of strings (URLs, file names)
    TextList,
    /// Postal code, normalized to 8 digits
    Cep,
}

/// One editable field of a step form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key used by callers (camelCase)
    pub key: &'static str,
    /// Key used by the backend (snake_case)
    pub api_key: &'static str,
    pub kind: FieldKind,
    /// Save group; fields sharing a group are always sent together
    pub group: Option<&'static str>,
    /// Value sent when the field was never set
    pub default: Option<&'static str>,
    /// Uses the longer batch debounce delay
    pub batch: bool,
}

impl FieldSpec {
    pub const fn new(key: &'static str, api_key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            api_key,
            kind,
            group: None,
            default: None,
            batch: false,
        }
    }

    pub const fn text(key: &'static str, api_key: &'static str) -> Self {
        Self::new(key, api_key, FieldKind::Text)
    }

    pub const fn integer(key: &'static str, api_key: &'static str) -> Self {
        Self::new(key, api_key, FieldKind::Integer)
    }

    pub const fn decimal(key: &'static str, api_key: &'static str) -> Self {
        Self::new(key, api_key, FieldKind::Decimal)
    }

    pub const fn money(key: &'static str, api_key: &'static str) -> Self {
        Self::new(key, api_key, FieldKind::Money)
    }

    pub const fn yes_no(key: &'static str, api_key: &'static str) -> Self {
        Self::new(key, api_key, FieldKind::YesNo)
    }

    pub const fn in_group(mut self, group: &'static str) -> Self {
        self.group = Some(group);
        self
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn batched(mut self) -> Self {
        self.batch = true;
        self
    }

    /// Debounce key: the save group, or the field itself.
    pub fn group_key(&self) -> &'static str {
        self.group.unwrap_or(self.key)
    }

    /// Coerces a raw input into the value stored and sent for this field.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::InvalidInput` naming the field when the input
    /// cannot be represented.
    pub fn coerce(&self, raw: &Value) -> Result<Value> {
        self.kind.coerce(self.key, raw)
    }
}

impl FieldKind {
    pub fn coerce(&self, field: &str, raw: &Value) -> Result<Value> {
        match self {
            FieldKind::Text => coerce_text(field, raw),
            FieldKind::Integer => coerce_integer(field, raw),
            FieldKind::Decimal => coerce_decimal(field, raw, false),
            FieldKind::Money => coerce_decimal(field, raw, true),
            FieldKind::YesNo => coerce_yes_no(field, raw),
            FieldKind::IdList => Ok(Value::from(normalize_selection(raw))),
            FieldKind::TextList => coerce_text_list(field, raw),
            FieldKind::Cep => coerce_cep(field, raw),
        }
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> WizardError {
    WizardError::invalid_input(field).with_reason(reason)
}

fn coerce_text(field: &str, raw: &Value) -> Result<Value> {
    match raw {
        Value::Null => Ok(Value::Null),
        Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
        Value::String(s) => Ok(Value::String(s.trim().to_string())),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(invalid(field, "expected text")),
    }
}

fn coerce_integer(field: &str, raw: &Value) -> Result<Value> {
    let parsed = match raw {
        Value::Null => return Ok(Value::Null),
        Value::String(s) if s.trim().is_empty() => return Ok(Value::Null),
        Value::String(s) => {
            // Dots are thousands separators only in "1.500" form; "2.5" is a fraction.
            let text = s.trim();
            if is_thousands_grouped(text) {
                text.replace('.', "").parse::<i64>().ok()
            } else {
                text.parse::<i64>().ok()
            }
        }
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64)),
        _ => None,
    };
    match parsed {
        Some(value) if value < 0 => Err(invalid(field, "must not be negative")),
        Some(value) => Ok(Value::from(value)),
        None => Err(invalid(field, format!("'{}' is not a whole number", display(raw)))),
    }
}

fn coerce_decimal(field: &str, raw: &Value, money: bool) -> Result<Value> {
    let parsed = match raw {
        Value::Null => return Ok(Value::Null),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let mut text = s.trim();
            if money {
                text = text.trim_start_matches("R$").trim();
            }
            if text.is_empty() {
                return Ok(Value::Null);
            }
            parse_brazilian_number(text)
        }
        _ => None,
    };
    parsed
        .filter(|value| value.is_finite())
        .map(number_value)
        .ok_or_else(|| invalid(field, format!("'{}' is not a number", display(raw))))
}

/// Parses "1.234,56", "120,5", "1.500" and "99.90" style numbers.
fn parse_brazilian_number(text: &str) -> Option<f64> {
    let normalized = if text.contains(',') {
        text.replace('.', "").replace(',', ".")
    } else if is_thousands_grouped(text) {
        text.replace('.', "")
    } else {
        text.to_string()
    };
    normalized.parse::<f64>().ok()
}

fn is_thousands_grouped(text: &str) -> bool {
    let mut parts = text.split('.');
    let head = parts.next().unwrap_or_default();
    let tail: Vec<&str> = parts.collect();
    !head.is_empty()
        && !tail.is_empty()
        && tail
            .iter()
            .all(|part| part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
}

/// Whole values are emitted as JSON integers.
fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Value::from(value as i64)
    } else {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

fn coerce_yes_no(field: &str, raw: &Value) -> Result<Value> {
    match raw {
        Value::Null => Ok(Value::Null),
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::Number(n) if n.as_i64() == Some(1) => Ok(Value::Bool(true)),
        Value::Number(n) if n.as_i64() == Some(0) => Ok(Value::Bool(false)),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "" => Ok(Value::Null),
            "sim" | "s" | "true" | "yes" | "1" => Ok(Value::Bool(true)),
            "não" | "nao" | "n" | "false" | "no" | "0" => Ok(Value::Bool(false)),
            other => Err(invalid(field, format!("'{other}' is not sim/não"))),
        },
        _ => Err(invalid(field, "expected sim or não")),
    }
}

fn coerce_text_list(field: &str, raw: &Value) -> Result<Value> {
    let items: Vec<String> = match raw {
        Value::Null => Vec::new(),
        Value::String(s) => s
            .split([',', '\n'])
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(values) => values
            .iter()
            .filter_map(|value| match value {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                _ => None,
            })
            .collect(),
        _ => return Err(invalid(field, "expected a list of text values")),
    };
    Ok(Value::from(items))
}

fn coerce_cep(field: &str, raw: &Value) -> Result<Value> {
    match raw {
        Value::Null => Ok(Value::Null),
        Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
        Value::String(s) => normalize_cep(s)
            .map(Value::String)
            .map_err(|_| invalid(field, format!("'{s}' is not an 8-digit CEP"))),
        Value::Number(n) => normalize_cep(&format!("{:0>8}", n.to_string()))
            .map(Value::String)
            .map_err(|_| invalid(field, format!("'{n}' is not an 8-digit CEP"))),
        _ => Err(invalid(field, "expected a CEP")),
    }
}

fn display(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decimal_accepts_brazilian_formats() {
        let kind = FieldKind::Decimal;
        assert_eq!(kind.coerce("area", &json!("120")).unwrap(), json!(120));
        assert_eq!(kind.coerce("area", &json!("120,5")).unwrap(), json!(120.5));
        assert_eq!(kind.coerce("area", &json!("1.234,56")).unwrap(), json!(1234.56));
        assert_eq!(kind.coerce("area", &json!("1.500")).unwrap(), json!(1500));
        assert_eq!(kind.coerce("area", &json!("99.9")).unwrap(), json!(99.9));
        assert_eq!(kind.coerce("area", &json!(" ")).unwrap(), Value::Null);
        assert!(kind.coerce("area", &json!("doze")).is_err());
    }

    #[test]
    fn test_money_strips_currency() {
        let kind = FieldKind::Money;
        assert_eq!(kind.coerce("valor", &json!("R$ 450.000,00")).unwrap(), json!(450000));
        assert_eq!(kind.coerce("valor", &json!(1250.75)).unwrap(), json!(1250.75));
    }

    #[test]
    fn test_integer_rejects_fractions_and_negatives() {
        let kind = FieldKind::Integer;
        assert_eq!(kind.coerce("suites", &json!("3")).unwrap(), json!(3));
        assert_eq!(kind.coerce("suites", &json!(2.0)).unwrap(), json!(2));
        assert!(kind.coerce("suites", &json!("2,5")).is_err());
        assert!(kind.coerce("suites", &json!("2.5")).is_err());
        assert!(kind.coerce("suites", &json!("1.99")).is_err());
        assert!(kind.coerce("suites", &json!(2.5)).is_err());
        assert!(kind.coerce("suites", &json!(-1)).is_err());
        assert_eq!(kind.coerce("areaUtil", &json!("1.500")).unwrap(), json!(1500));
        assert_eq!(kind.coerce("areaUtil", &json!("12.345.678")).unwrap(), json!(12_345_678));
    }

    #[test]
    fn test_yes_no_answers() {
        let kind = FieldKind::YesNo;
        assert_eq!(kind.coerce("x", &json!("Sim")).unwrap(), json!(true));
        assert_eq!(kind.coerce("x", &json!("não")).unwrap(), json!(false));
        assert_eq!(kind.coerce("x", &json!(0)).unwrap(), json!(false));
        let err = kind.coerce("aceitaPermuta", &json!("talvez")).unwrap_err();
        assert!(err.to_string().contains("aceitaPermuta"));
    }

    #[test]
    fn test_lists_and_cep() {
        assert_eq!(
            FieldKind::IdList
                .coerce("caracteristicas", &json!([{"id": 3, "nome": "Piscina"}, 5, "3"]))
                .unwrap(),
            json!([3, 5])
        );
        assert_eq!(
            FieldKind::TextList
                .coerce("videos", &json!("https://a.example/1, https://a.example/2"))
                .unwrap(),
            json!(["https://a.example/1", "https://a.example/2"])
        );
        assert_eq!(
            FieldKind::Cep.coerce("cep", &json!("01310-100")).unwrap(),
            json!("01310100")
        );
        assert!(FieldKind::Cep.coerce("cep", &json!("123")).is_err());
    }

    #[test]
    fn test_group_key_defaults_to_field() {
        const AREA: FieldSpec = FieldSpec::decimal("areaTotal", "area_total").in_group("areaTotal");
        const UNIT: FieldSpec =
            FieldSpec::text("unidadeMedidaAreaTotal", "unidade_medida_area_total")
                .in_group("areaTotal")
                .with_default("m²");
        const SUITES: FieldSpec = FieldSpec::integer("suites", "suites");
        assert_eq!(AREA.group_key(), UNIT.group_key());
        assert_eq!(SUITES.group_key(), "suites");
        assert_eq!(UNIT.default, Some("m²"));
    }
}
