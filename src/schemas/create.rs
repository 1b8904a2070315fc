use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;
use validator::Validate;

use super::base::{BASE_FIELD_RULES, UserFileBase, WireValue, field_order};
use crate::errors::{FieldViolation, ValidationError, violations_from};

/// Input contract for registering a file record.
///
/// Only obtainable through [`CreateUserFile::from_json`] or
/// [`CreateUserFile::from_value`], so holding one means the input passed
/// every base field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateUserFile {
    #[serde(flatten)]
    base: UserFileBase,
}

impl CreateUserFile {
    /// Validates any JSON value. Anything but an object is rejected as a whole.
    pub fn from_value(input: &Value) -> Result<Self, ValidationError> {
        match input {
            Value::Object(fields) => Self::from_json(fields),
            _ => {
                let err = ValidationError::new(vec![FieldViolation::new(
                    "body",
                    "type",
                    "Request body must be a JSON object",
                )]);
                log::debug!("rejected user file input: {}", err);
                Err(err)
            }
        }
    }

    /// Checks presence and type of every base field, normalizes the accepted
    /// values, then applies the semantic rules. All failures are collected
    /// before returning. Fields outside the base set, including `id` and
    /// `created_at`, are ignored.
    pub fn from_json(input: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut violations = Vec::new();
        let mut accepted: HashMap<&'static str, WireValue> = HashMap::new();

        for rule in BASE_FIELD_RULES {
            match rule.check(input.get(rule.name)) {
                Ok(Some(value)) => {
                    accepted.insert(rule.name, value);
                }
                Ok(None) => {}
                Err(violation) => violations.push(violation),
            }
        }

        // Fields whose placeholder value must not be judged by the semantic rules.
        let mut unchecked: HashSet<String> =
            violations.iter().map(|v| v.field.clone()).collect();

        let file_name = take_text(&mut accepted, "file_name").map(|name| name.trim().to_string());
        let mime_type = match take_text(&mut accepted, "mime_type") {
            Some(mime) => Some(mime.trim().to_ascii_lowercase()),
            None => match &file_name {
                Some(name) if !name.is_empty() => {
                    let guessed = guess_mime_type(name);
                    if guessed.is_none() {
                        violations.push(FieldViolation::new(
                            "mime_type",
                            "required",
                            "Field 'mime_type' is required when it cannot be inferred from 'file_name'",
                        ));
                        unchecked.insert("mime_type".to_string());
                    }
                    guessed
                }
                _ => {
                    unchecked.insert("mime_type".to_string());
                    None
                }
            },
        };

        let base = UserFileBase {
            file_name: file_name.unwrap_or_default(),
            file_path: take_text(&mut accepted, "file_path").unwrap_or_default(),
            size: match accepted.remove("size") {
                Some(WireValue::Integer(size)) => size,
                _ => 0,
            },
            mime_type: mime_type.unwrap_or_default(),
            user_id: match accepted.remove("user_id") {
                Some(WireValue::Uuid(id)) => id,
                _ => Uuid::nil(),
            },
        };

        if let Err(errors) = base.validate() {
            violations.extend(
                violations_from(&errors)
                    .into_iter()
                    .filter(|v| !unchecked.contains(&v.field)),
            );
        }

        if violations.is_empty() {
            return Ok(Self { base });
        }

        violations.sort_by_key(|v| field_order(&v.field));
        let err = ValidationError::new(violations);
        log::debug!("rejected user file input: {}", err);
        Err(err)
    }

    pub fn base(&self) -> &UserFileBase {
        &self.base
    }

    pub fn into_base(self) -> UserFileBase {
        self.base
    }
}

fn take_text(accepted: &mut HashMap<&'static str, WireValue>, field: &str) -> Option<String> {
    match accepted.remove(field) {
        Some(WireValue::Text(text)) => Some(text),
        _ => None,
    }
}

fn guess_mime_type(file_name: &str) -> Option<String> {
    mime_guess::from_path(file_name)
        .first_raw()
        .map(|mime| mime.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(fields) => fields,
            other => panic!("expected object, got {other}"),
        }
    }

    fn valid() -> Value {
        json!({
            "file_name": "report.pdf",
            "file_path": "uploads/7/report.pdf",
            "size": 1024,
            "mime_type": "application/pdf",
            "user_id": "2b0f8a4e-5f4e-4d8c-9d3e-6a1d2c3b4a59",
        })
    }

    #[test]
    fn valid_input_round_trips_every_field() {
        let create = CreateUserFile::from_value(&valid()).unwrap();
        assert_eq!(serde_json::to_value(&create).unwrap(), valid());

        let base = create.base();
        assert_eq!(base.file_name, "report.pdf");
        assert_eq!(base.size, 1024);
        assert_eq!(
            base.user_id,
            Uuid::parse_str("2b0f8a4e-5f4e-4d8c-9d3e-6a1d2c3b4a59").unwrap()
        );
    }

    #[test]
    fn each_missing_field_is_named() {
        for field in ["file_name", "file_path", "size", "user_id"] {
            let mut fields = input(valid());
            fields.remove(field);
            let err = CreateUserFile::from_json(&fields).unwrap_err();
            assert_eq!(err.fields(), vec![field], "removing {field}");
            assert_eq!(err.violations()[0].rule, "required");
        }
    }

    #[test]
    fn every_failure_is_reported_in_field_order() {
        let err = CreateUserFile::from_value(&json!({
            "file_path": "/abs/path.pdf",
            "size": "big",
            "mime_type": "image/png",
            "user_id": "not-a-uuid",
        }))
        .unwrap_err();

        assert_eq!(
            err.fields(),
            vec!["file_name", "file_path", "size", "mime_type", "user_id"]
        );
        let rules: Vec<&str> = err.violations().iter().map(|v| v.rule.as_str()).collect();
        assert_eq!(
            rules,
            vec!["required", "file_path_format", "type", "mime_type_allowed", "uuid"]
        );
    }

    #[test]
    fn values_are_normalized() {
        let mut fields = input(valid());
        fields.insert("file_name".into(), json!("  report.pdf  "));
        fields.insert("mime_type".into(), json!(" Application/PDF "));

        let create = CreateUserFile::from_json(&fields).unwrap();
        assert_eq!(create.base().file_name, "report.pdf");
        assert_eq!(create.base().mime_type, "application/pdf");
    }

    #[test]
    fn mime_type_is_inferred_from_name() {
        let mut fields = input(valid());
        fields.remove("mime_type");
        let create = CreateUserFile::from_json(&fields).unwrap();
        assert_eq!(create.base().mime_type, "application/pdf");

        fields.insert("file_name".into(), json!("README"));
        let err = CreateUserFile::from_json(&fields).unwrap_err();
        assert_eq!(err.fields(), vec!["mime_type"]);
        assert_eq!(err.violations()[0].rule, "required");
    }

    #[test]
    fn inferred_type_must_still_be_allowed() {
        let mut fields = input(valid());
        fields.remove("mime_type");
        fields.insert("file_name".into(), json!("photo.png"));
        let err = CreateUserFile::from_json(&fields).unwrap_err();
        assert_eq!(err.fields(), vec!["mime_type"]);
        assert_eq!(err.violations()[0].rule, "mime_type_allowed");
    }

    #[test]
    fn bad_name_does_not_cascade_into_mime_type() {
        let mut fields = input(valid());
        fields.remove("mime_type");
        fields.insert("file_name".into(), json!(42));
        let err = CreateUserFile::from_json(&fields).unwrap_err();
        assert_eq!(err.fields(), vec!["file_name"]);
    }

    #[test]
    fn blank_name_reports_only_the_name() {
        let mut fields = input(valid());
        fields.remove("mime_type");
        fields.insert("file_name".into(), json!("   "));
        let err = CreateUserFile::from_json(&fields).unwrap_err();
        assert_eq!(err.fields(), vec!["file_name"]);
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].rule, "length");
    }

    #[test]
    fn size_bounds() {
        let mut fields = input(valid());
        fields.insert("size".into(), json!(0));
        let err = CreateUserFile::from_json(&fields).unwrap_err();
        assert_eq!(err.violations()[0].rule, "range");

        fields.insert("size".into(), json!(35 * 1024 * 1024));
        assert!(CreateUserFile::from_json(&fields).is_err());

        fields.insert("size".into(), json!(35 * 1024 * 1024 - 1));
        assert!(CreateUserFile::from_json(&fields).is_ok());
    }

    #[test]
    fn client_assigned_identity_is_ignored() {
        let mut fields = input(valid());
        fields.insert("id".into(), json!("00000000-0000-0000-0000-000000000001"));
        fields.insert("created_at".into(), json!("2020-01-01T00:00:00Z"));
        let create = CreateUserFile::from_json(&fields).unwrap();
        let out = serde_json::to_value(&create).unwrap();
        assert!(out.get("id").is_none());
        assert!(out.get("created_at").is_none());
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        for body in [json!([]), json!("report.pdf"), json!(null)] {
            let err = CreateUserFile::from_value(&body).unwrap_err();
            assert_eq!(err.fields(), vec!["body"]);
        }
    }

    #[test]
    fn construction_is_idempotent() {
        assert_eq!(
            CreateUserFile::from_value(&valid()).unwrap(),
            CreateUserFile::from_value(&valid()).unwrap()
        );

        let bad = json!({ "size": -1 });
        assert_eq!(
            CreateUserFile::from_value(&bad).unwrap_err(),
            CreateUserFile::from_value(&bad).unwrap_err()
        );
    }
}
