//! Request validation from per-entity field rule tables.

use crate::error::AppError;
use crate::sql::SqlValue;
use serde_json::{Map, Value};

/// How one submitted field is checked and typed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldRule {
    /// Non-blank text.
    RequiredString,
    /// Text or absent.
    OptionalString,
    /// Absent, or text containing `@`.
    OptionalEmail,
    /// Integer within `min..=max`.
    RequiredInteger { min: i64, max: i64 },
    /// Number no smaller than `min`.
    RequiredNumber { min: f64 },
    /// Absent, or the integer id of a related row.
    OptionalForeignKey,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rule: FieldRule,
}

impl FieldSpec {
    pub const fn new(name: &'static str, rule: FieldRule) -> Self {
        FieldSpec { name, rule }
    }
}

impl FieldRule {
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            FieldRule::RequiredString | FieldRule::RequiredInteger { .. } | FieldRule::RequiredNumber { .. }
        )
    }

    /// Check one value and convert it to its column type. Form bodies only carry
    /// strings, so numeric rules also accept numeric text; blank text counts as absent.
    pub fn coerce(&self, value: Option<&Value>) -> Option<SqlValue> {
        let value = match value {
            Some(Value::Null) | None => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(v) => Some(v),
        };
        match (self, value) {
            (FieldRule::RequiredString, Some(Value::String(s))) => Some(SqlValue::text(s.as_str())),
            (FieldRule::RequiredString, _) => None,
            (FieldRule::OptionalString, None) => Some(SqlValue::Text(None)),
            (FieldRule::OptionalString, Some(Value::String(s))) => Some(SqlValue::text(s.as_str())),
            (FieldRule::OptionalString, Some(_)) => None,
            (FieldRule::OptionalEmail, None) => Some(SqlValue::Text(None)),
            (FieldRule::OptionalEmail, Some(Value::String(s))) => {
                let s = s.trim();
                (s.contains('@') && s.len() >= 3).then(|| SqlValue::text(s))
            }
            (FieldRule::OptionalEmail, Some(_)) => None,
            (FieldRule::RequiredInteger { min, max }, Some(v)) => {
                as_integer(v).filter(|n| (*min..=*max).contains(n)).map(SqlValue::int)
            }
            (FieldRule::RequiredInteger { .. }, None) => None,
            (FieldRule::RequiredNumber { min }, Some(v)) => as_number(v)
                .filter(|n| n.is_finite() && n >= min)
                .map(|n| SqlValue::Float(Some(n))),
            (FieldRule::RequiredNumber { .. }, None) => None,
            (FieldRule::OptionalForeignKey, None) => Some(SqlValue::Int(None)),
            (FieldRule::OptionalForeignKey, Some(v)) => as_integer(v).map(SqlValue::int),
        }
    }

    fn message(&self, field: &str) -> String {
        if self.is_required() {
            format!("Invalid or missing {}", field)
        } else {
            format!("Invalid {}", field)
        }
    }
}

fn as_integer(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Every violation, in field declaration order. Empty means valid.
    pub fn validate(body: &Map<String, Value>, fields: &[FieldSpec]) -> Vec<String> {
        fields
            .iter()
            .filter(|f| f.rule.coerce(body.get(f.name)).is_none())
            .map(|f| f.rule.message(f.name))
            .collect()
    }

    /// Typed column values for every declared field, or all violations at once.
    pub fn normalize(
        body: &Map<String, Value>,
        fields: &[FieldSpec],
    ) -> Result<Vec<(&'static str, SqlValue)>, AppError> {
        let mut values = Vec::with_capacity(fields.len());
        let mut errors = Vec::new();
        for f in fields {
            match f.rule.coerce(body.get(f.name)) {
                Some(v) => values.push((f.name, v)),
                None => errors.push(f.rule.message(f.name)),
            }
        }
        if errors.is_empty() {
            Ok(values)
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::new("agence_id", FieldRule::OptionalForeignKey),
        FieldSpec::new("marque", FieldRule::RequiredString),
        FieldSpec::new("annee", FieldRule::RequiredInteger { min: 1886, max: 9999 }),
        FieldSpec::new("email", FieldRule::OptionalEmail),
        FieldSpec::new("prix_par_jour", FieldRule::RequiredNumber { min: 0.0 }),
    ];

    fn body(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_body_lists_every_required_field_in_order() {
        let errors = RequestValidator::validate(&Map::new(), FIELDS);
        assert_eq!(
            errors,
            vec![
                "Invalid or missing marque",
                "Invalid or missing annee",
                "Invalid or missing prix_par_jour",
            ]
        );
    }

    #[test]
    fn wrong_types_and_ranges_are_reported() {
        let b = body(json!({
            "agence_id": "north",
            "marque": 12,
            "annee": 1885,
            "email": "nobody",
            "prix_par_jour": -1
        }));
        assert_eq!(
            RequestValidator::validate(&b, FIELDS),
            vec![
                "Invalid agence_id",
                "Invalid or missing marque",
                "Invalid or missing annee",
                "Invalid email",
                "Invalid or missing prix_par_jour",
            ]
        );
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let b = body(json!({"marque": "   ", "annee": 2020, "prix_par_jour": 10}));
        assert_eq!(RequestValidator::validate(&b, FIELDS), vec!["Invalid or missing marque"]);
    }

    #[test]
    fn form_strings_are_coerced_to_column_types() {
        let b = body(json!({
            "agence_id": "3",
            "marque": "Peugeot",
            "annee": "2018",
            "email": "",
            "prix_par_jour": "32.5"
        }));
        let values = RequestValidator::normalize(&b, FIELDS).unwrap();
        assert_eq!(
            values,
            vec![
                ("agence_id", SqlValue::int(3)),
                ("marque", SqlValue::text("Peugeot")),
                ("annee", SqlValue::int(2018)),
                ("email", SqlValue::Text(None)),
                ("prix_par_jour", SqlValue::Float(Some(32.5))),
            ]
        );
    }

    #[test]
    fn fractional_year_is_rejected() {
        assert_eq!(FieldRule::RequiredInteger { min: 1886, max: 9999 }.coerce(Some(&json!(2020.5))), None);
    }

    #[test]
    fn integer_above_max_is_rejected() {
        let rule = FieldRule::RequiredInteger { min: 1886, max: i64::from(i32::MAX) };
        assert_eq!(rule.coerce(Some(&json!(3_000_000_000_i64))), None);
        assert_eq!(rule.coerce(Some(&json!("3000000000"))), None);
        assert_eq!(rule.coerce(Some(&json!(2147483647))), Some(SqlValue::int(2147483647)));
    }

    #[test]
    fn normalize_aggregates_violations() {
        let err = RequestValidator::normalize(&Map::new(), FIELDS).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid or missing marque, Invalid or missing annee, Invalid or missing prix_par_jour"
        );
    }
}
