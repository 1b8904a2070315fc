use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError as RuleError};

use crate::errors::FieldViolation;

pub const MAX_FILE_NAME_CHARS: u64 = 255;
pub const MAX_FILE_PATH_CHARS: u64 = 1024;
/// Uploads must stay strictly below 35 MiB.
pub const MAX_FILE_SIZE_BYTES: i64 = 35 * 1024 * 1024;
pub const ALLOWED_MIME_TYPES: &[&str] = &["application/pdf"];

/// Fields shared by every user file shape.
///
/// Create and read shapes embed this by value; the semantic rules below are
/// the single source of truth for what a well-formed file record looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UserFileBase {
    #[validate(length(min = 1, max = MAX_FILE_NAME_CHARS), custom(function = "validate_file_name"))]
    pub file_name: String,
    #[validate(length(min = 1, max = MAX_FILE_PATH_CHARS), custom(function = "validate_file_path"))]
    pub file_path: String,
    #[validate(range(min = 1, exclusive_max = MAX_FILE_SIZE_BYTES))]
    pub size: i64,
    #[validate(custom(function = "validate_mime_type"))]
    pub mime_type: String,
    pub user_id: Uuid,
}

/// JSON type a field must arrive as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireKind {
    Text,
    Integer,
    Uuid,
}

/// A value that passed its presence and type check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireValue {
    Text(String),
    Integer(i64),
    Uuid(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: WireKind,
    pub required: bool,
}

pub const BASE_FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        name: "file_name",
        kind: WireKind::Text,
        required: true,
    },
    FieldRule {
        name: "file_path",
        kind: WireKind::Text,
        required: true,
    },
    FieldRule {
        name: "size",
        kind: WireKind::Integer,
        required: true,
    },
    // Inferred from the file name when absent.
    FieldRule {
        name: "mime_type",
        kind: WireKind::Text,
        required: false,
    },
    FieldRule {
        name: "user_id",
        kind: WireKind::Uuid,
        required: true,
    },
];

/// Position of a field in [`BASE_FIELD_RULES`], used to order violations.
pub fn field_order(field: &str) -> usize {
    BASE_FIELD_RULES
        .iter()
        .position(|rule| rule.name == field)
        .unwrap_or(BASE_FIELD_RULES.len())
}

impl FieldRule {
    /// Presence and wire-type check. `Ok(None)` means an optional field was
    /// left out; JSON `null` counts as absent.
    pub fn check(&self, value: Option<&Value>) -> Result<Option<WireValue>, FieldViolation> {
        let value = match value {
            None | Some(Value::Null) if self.required => {
                return Err(FieldViolation::required(self.name));
            }
            None | Some(Value::Null) => return Ok(None),
            Some(value) => value,
        };

        let accepted = match self.kind {
            WireKind::Text => value
                .as_str()
                .map(|s| WireValue::Text(s.to_string()))
                .ok_or_else(|| self.wrong_type("a string")),
            WireKind::Integer => value
                .as_i64()
                .map(WireValue::Integer)
                .ok_or_else(|| self.wrong_type("an integer")),
            WireKind::Uuid => {
                let text = value.as_str().ok_or_else(|| self.wrong_type("a UUID string"))?;
                Uuid::parse_str(text).map(WireValue::Uuid).map_err(|_| {
                    FieldViolation::new(
                        self.name,
                        "uuid",
                        format!("Field '{}' must be a valid UUID", self.name),
                    )
                })
            }
        };
        accepted.map(Some)
    }

    fn wrong_type(&self, expected: &str) -> FieldViolation {
        FieldViolation::new(
            self.name,
            "type",
            format!("Field '{}' must be {}", self.name, expected),
        )
    }
}

fn rule_error(code: &'static str, message: &'static str) -> RuleError {
    RuleError::new(code).with_message(Cow::Borrowed(message))
}

/// The whitespace rule only matters for bases built or deserialized directly;
/// `CreateUserFile` trims the name before validating.
fn validate_file_name(name: &str) -> Result<(), RuleError> {
    if name.trim() != name {
        return Err(rule_error(
            "file_name_format",
            "must not start or end with whitespace",
        ));
    }
    if name == "." || name == ".." {
        return Err(rule_error("file_name_format", "must not be a relative directory"));
    }
    if name.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
        return Err(rule_error(
            "file_name_format",
            "must not contain path separators or control characters",
        ));
    }
    Ok(())
}

fn validate_file_path(path: &str) -> Result<(), RuleError> {
    if path.starts_with('/') || path.starts_with('\\') {
        return Err(rule_error("file_path_format", "must be a relative path"));
    }
    if path.contains('\0') {
        return Err(rule_error("file_path_format", "must not contain NUL bytes"));
    }
    if path.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(rule_error(
            "file_path_format",
            "must not traverse to a parent directory",
        ));
    }
    Ok(())
}

fn validate_mime_type(mime_type: &str) -> Result<(), RuleError> {
    if ALLOWED_MIME_TYPES.contains(&mime_type) {
        Ok(())
    } else {
        Err(rule_error("mime_type_allowed", "must be application/pdf"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> UserFileBase {
        UserFileBase {
            file_name: "report.pdf".to_string(),
            file_path: "uploads/2024/report.pdf".to_string(),
            size: 2048,
            mime_type: "application/pdf".to_string(),
            user_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn well_formed_base_passes() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn limits_agree_with_declared_rules() {
        let mut file = base();
        file.size = MAX_FILE_SIZE_BYTES - 1;
        assert!(file.validate().is_ok());
        file.size = MAX_FILE_SIZE_BYTES;
        assert!(file.validate().is_err());

        file = base();
        file.file_name = format!("{}.pdf", "a".repeat(MAX_FILE_NAME_CHARS as usize - 4));
        assert!(file.validate().is_ok());
        file.file_name.push('x');
        assert!(file.validate().is_err());

        file = base();
        file.file_path = "p".repeat(MAX_FILE_PATH_CHARS as usize);
        assert!(file.validate().is_ok());
        file.file_path.push('p');
        assert!(file.validate().is_err());
    }

    #[test]
    fn deserialized_base_with_padded_name_is_invalid() {
        let mut file: UserFileBase =
            serde_json::from_value(serde_json::to_value(base()).unwrap()).unwrap();
        file.file_name = " report.pdf".to_string();
        let errors = file.validate().unwrap_err();
        let codes: Vec<String> = errors.field_errors()["file_name"]
            .iter()
            .map(|e| e.code.to_string())
            .collect();
        assert_eq!(codes, vec!["file_name_format"]);
    }

    #[test]
    fn path_rules() {
        assert!(validate_file_path("a/b/c.pdf").is_ok());
        assert!(validate_file_path("/etc/passwd").is_err());
        assert!(validate_file_path("a/../../b").is_err());
        assert!(validate_file_path("a\\..\\b").is_err());
        assert!(validate_file_path("a\0b").is_err());
        assert!(validate_file_path("a/..b/c").is_ok());
    }

    #[test]
    fn name_rules() {
        assert!(validate_file_name("notes v2.pdf").is_ok());
        assert!(validate_file_name("dir/notes.pdf").is_err());
        assert!(validate_file_name(" notes.pdf").is_err());
        assert!(validate_file_name("..").is_err());
        assert!(validate_file_name("bad\nname.pdf").is_err());
    }

    #[test]
    fn rule_check_distinguishes_missing_and_mistyped() {
        let size = BASE_FIELD_RULES[field_order("size")];
        assert_eq!(size.check(Some(&json!(12))).unwrap(), Some(WireValue::Integer(12)));
        assert_eq!(size.check(None).unwrap_err().rule, "required");
        assert_eq!(size.check(Some(&Value::Null)).unwrap_err().rule, "required");
        assert_eq!(size.check(Some(&json!("12"))).unwrap_err().rule, "type");
        assert_eq!(size.check(Some(&json!(1.5))).unwrap_err().rule, "type");

        let mime = BASE_FIELD_RULES[field_order("mime_type")];
        assert_eq!(mime.check(None).unwrap(), None);

        let owner = BASE_FIELD_RULES[field_order("user_id")];
        assert_eq!(owner.check(Some(&json!("nope"))).unwrap_err().rule, "uuid");
        assert_eq!(owner.check(Some(&json!(7))).unwrap_err().rule, "type");
    }
}
