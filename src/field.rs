//! Field-scoped validation errors, modelled after apimachinery's `field.ErrorList`.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error as TError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    Invalid,
    NotSupported,
    Required,
    Duplicate,
    Forbidden,
}

impl ErrorType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Invalid => "Invalid value",
            ErrorType::NotSupported => "Unsupported value",
            ErrorType::Required => "Required value",
            ErrorType::Duplicate => "Duplicate value",
            ErrorType::Forbidden => "Forbidden",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
    Key(String),
}

/// Structured path to a field, rendered as `spec.rules[0].host`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: fields
                .into_iter()
                .map(|f| Segment::Field(f.into()))
                .collect(),
        }
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.segments.push(Segment::Field(name.into()));
        path
    }

    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.segments.push(Segment::Index(index));
        path
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.segments.push(Segment::Key(key.into()));
        path
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => write!(f, "{name}")?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::Key(key) => write!(f, "[{key}]")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub error_type: ErrorType,
    pub field: FieldPath,
    pub bad_value: Value,
    pub detail: String,
}

impl FieldError {
    fn build(
        error_type: ErrorType,
        field: FieldPath,
        value: impl Serialize,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            error_type,
            field,
            bad_value: serde_json::to_value(value).unwrap_or(Value::Null),
            detail: detail.into(),
        }
    }

    pub fn invalid(field: FieldPath, value: impl Serialize, detail: impl Into<String>) -> Self {
        Self::build(ErrorType::Invalid, field, value, detail)
    }

    pub fn not_supported(
        field: FieldPath,
        value: impl Serialize,
        detail: impl Into<String>,
    ) -> Self {
        Self::build(ErrorType::NotSupported, field, value, detail)
    }

    pub fn required(field: FieldPath, detail: impl Into<String>) -> Self {
        Self::build(ErrorType::Required, field, Value::Null, detail)
    }

    pub fn duplicate(field: FieldPath, value: impl Serialize) -> Self {
        Self::build(ErrorType::Duplicate, field, value, "")
    }

    pub fn forbidden(field: FieldPath, detail: impl Into<String>) -> Self {
        Self::build(ErrorType::Forbidden, field, Value::Null, detail)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error_type.as_str())?;

        match self.error_type {
            ErrorType::Required | ErrorType::Forbidden => {}
            _ => write!(f, ": {}", self.bad_value)?,
        }

        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }

        Ok(())
    }
}

impl std::error::Error for FieldError {}

/// Errors in discovery order. No deduplication.
#[derive(Debug, Clone, Default, PartialEq, TError)]
#[error("{}", render(.0))]
pub struct ErrorList(Vec<FieldError>);

fn render(errors: &[FieldError]) -> String {
    match errors {
        [single] => single.to_string(),
        errors => format!(
            "[{}]",
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn extend(&mut self, other: ErrorList) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }
}

impl From<FieldError> for ErrorList {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl From<Vec<FieldError>> for ErrorList {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl IntoIterator for ErrorList {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
