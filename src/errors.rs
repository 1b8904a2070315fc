use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

/// One failed rule on one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub rule: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, "required", format!("Field '{}' is required", field))
    }
}

/// Rejected client input. Carries every violation found, never just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("validation failed: {}", summarize(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }

    /// Field names that failed, in reporting order, without duplicates.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for violation in &self.violations {
            if !fields.contains(&violation.field.as_str()) {
                fields.push(&violation.field);
            }
        }
        fields
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl From<ValidationErrors> for ValidationError {
    fn from(errors: ValidationErrors) -> Self {
        Self::new(violations_from(&errors))
    }
}

/// Flattens `validator` output into violations, sorted by field name so the
/// result does not depend on hash map iteration order.
pub(crate) fn violations_from(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            let field = field.to_string();
            field_errors
                .iter()
                .map(move |error| {
                    FieldViolation::new(
                        field.clone(),
                        error.code.to_string(),
                        describe(&field, error),
                    )
                })
                .collect::<Vec<_>>()
        })
        .collect();
    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}

fn describe(field: &str, error: &validator::ValidationError) -> String {
    if let Some(message) = &error.message {
        return format!("Field '{}' {}", field, message);
    }

    let param = |key: &str| error.params.get(key).and_then(|v| v.as_f64());

    match error.code.as_ref() {
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!(
                "Field '{}' must be between {} and {} characters long",
                field, min, max
            ),
            (Some(min), None) => format!("Field '{}' must be at least {} characters long", field, min),
            (None, Some(max)) => format!("Field '{}' must be at most {} characters long", field, max),
            _ => format!("Field '{}' has invalid length", field),
        },
        "range" => match (param("min"), param("max"), param("exclusive_max")) {
            (Some(min), _, Some(max)) => {
                format!("Field '{}' must be at least {} and below {}", field, min, max)
            }
            (Some(min), Some(max), None) => {
                format!("Field '{}' must be between {} and {}", field, min, max)
            }
            (Some(min), None, None) => format!("Field '{}' must be at least {}", field, min),
            (None, Some(max), _) => format!("Field '{}' must be at most {}", field, max),
            _ => format!("Field '{}' is out of range", field),
        },
        code => format!("Field '{}' failed validation: {}", field, code),
    }
}

/// A stored row lacks columns the read shape requires. Points at schema drift
/// between the store and this crate, never at bad client input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stored user file {id} is missing required columns: {}", .missing.join(", "))]
pub struct ShapeMismatch {
    pub id: Uuid,
    pub missing: Vec<&'static str>,
}

/// A query window that cannot describe a page: more rows than the page size,
/// or more rows than the reported total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("page window of {rows} rows does not fit page size {size} with total {total}")]
pub struct PageWindowError {
    pub rows: usize,
    pub size: u64,
    pub total: u64,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    ShapeMismatch(#[from] ShapeMismatch),
    #[error(transparent)]
    PageWindow(#[from] PageWindowError),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: Cow<'a, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    violations: Option<&'a [FieldViolation]>,
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorBody {
        error: Cow::Borrowed("internal server error"),
        violations: None,
    })
}

impl ResponseError for ValidationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: Cow::Borrowed("validation failed"),
            violations: Some(&self.violations),
        })
    }
}

impl ResponseError for ShapeMismatch {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        internal_error()
    }
}

impl ResponseError for PageWindowError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        internal_error()
    }
}

impl ResponseError for SchemaError {
    fn status_code(&self) -> StatusCode {
        match self {
            SchemaError::Validation(e) => e.status_code(),
            SchemaError::ShapeMismatch(e) => e.status_code(),
            SchemaError::PageWindow(e) => e.status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            SchemaError::Validation(e) => e.error_response(),
            SchemaError::ShapeMismatch(e) => e.error_response(),
            SchemaError::PageWindow(e) => e.error_response(),
        }
    }
}
