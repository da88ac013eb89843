//! Validation error types and the problem report

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Boundary result for the validation entry points
pub type ValidateResult<T> = Result<T, ValidateError>;

/// Why a single rule rejected a value.
///
/// The `Display` form is the reason phrase only; it reads as a predicate of
/// the field name (`"is required"`, `"length should be 10"`), so a
/// [`Problem`] renders as `"<field> <reason>"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Reason {
    #[error("is required")]
    Required,

    #[error("cannot be empty")]
    Empty,

    #[error("cannot be zero")]
    Zero,

    #[error("should be a string")]
    NotString,

    #[error("is not a valid email address")]
    InvalidEmail,

    #[error("has bad rule format `{rule}`")]
    BadRuleFormat { rule: String },

    #[error("cannot have a length")]
    NotMeasurable,

    #[error("length should {}", .op.describe(.expected))]
    Length { op: LengthOp, expected: usize },

    #[error("references unknown rule `{rule}`")]
    UnknownRule { rule: String },

    #[error("should be {expected}")]
    TypeMismatch { expected: &'static str },

    #[error("{0}")]
    Custom(String),
}

impl Reason {
    /// Create a reason carrying a caller-supplied message
    pub fn custom(message: impl Into<String>) -> Self {
        Reason::Custom(message.into())
    }

    /// Stable machine-readable code for this reason category
    pub fn code(&self) -> &'static str {
        match self {
            Reason::Required => "required",
            Reason::Empty => "empty",
            Reason::Zero => "zero",
            Reason::NotString => "not_string",
            Reason::InvalidEmail => "invalid_email",
            Reason::BadRuleFormat { .. } => "bad_rule_format",
            Reason::NotMeasurable => "not_measurable",
            Reason::Length { .. } => "length",
            Reason::UnknownRule { .. } => "unknown_rule",
            Reason::TypeMismatch { .. } => "type_mismatch",
            Reason::Custom(_) => "custom",
        }
    }
}

/// Comparison operator of a `len` rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl LengthOp {
    /// Whether `actual` satisfies `actual <op> expected`
    pub fn holds(self, actual: usize, expected: usize) -> bool {
        match self {
            LengthOp::Eq => actual == expected,
            LengthOp::Ne => actual != expected,
            LengthOp::Gt => actual > expected,
            LengthOp::Lt => actual < expected,
            LengthOp::Ge => actual >= expected,
            LengthOp::Le => actual <= expected,
        }
    }

    fn describe(&self, expected: &usize) -> String {
        match self {
            LengthOp::Eq => format!("be {}", expected),
            LengthOp::Ne => format!("not be {}", expected),
            LengthOp::Gt => format!("be greater than {}", expected),
            LengthOp::Lt => format!("be less than {}", expected),
            LengthOp::Ge => format!("be greater than or equal to {}", expected),
            LengthOp::Le => format!("be less than or equal to {}", expected),
        }
    }
}

/// The single recorded failure of one field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct Problem {
    /// Reported field path (external name, dotted for nested records)
    pub field: String,
    /// Underlying failure
    #[source]
    pub reason: Reason,
}

impl Problem {
    pub fn new(field: impl Into<String>, reason: Reason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

/// Report of every failing field, at most one problem per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Problems {
    problems: HashMap<String, Problem>,
}

impl Problems {
    /// Create an empty report
    pub fn new() -> Self {
        Self {
            problems: HashMap::new(),
        }
    }

    /// Record a problem; an earlier problem for the same field is kept
    pub fn add(&mut self, problem: Problem) {
        self.problems
            .entry(problem.field.clone())
            .or_insert(problem);
    }

    /// Record a reason against a field
    pub fn add_reason(&mut self, field: impl Into<String>, reason: Reason) {
        self.add(Problem::new(field, reason));
    }

    /// Check if there are any problems
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Number of failing fields
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    /// Problem recorded for a field path
    pub fn get(&self, field: &str) -> Option<&Problem> {
        self.problems.get(field)
    }

    /// Check if a field path has a problem
    pub fn contains(&self, field: &str) -> bool {
        self.problems.contains_key(field)
    }

    /// Iterate over recorded problems in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.problems.values()
    }

    /// Field paths with problems, sorted
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.problems.keys().map(String::as_str).collect();
        fields.sort_unstable();
        fields
    }

    /// Merge another report into this one, keeping existing entries
    pub fn merge(&mut self, other: Problems) {
        for (_, problem) in other.problems {
            self.add(problem);
        }
    }

    /// Convert to a JSON-serializable format for API responses
    pub fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .problems
            .iter()
            .map(|(field, problem)| {
                (
                    field.clone(),
                    serde_json::json!({
                        "code": problem.reason.code(),
                        "message": problem.to_string(),
                    }),
                )
            })
            .collect();

        serde_json::json!({
            "error": {
                "code": "validation_failed",
                "fields": fields,
            }
        })
    }
}

impl fmt::Display for Problems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.problems.is_empty() {
            return write!(f, "No problems");
        }
        write!(f, "{} field(s) failed validation:", self.problems.len())?;
        for field in self.fields() {
            write!(f, "\n  {}", self.problems[field])?;
        }
        Ok(())
    }
}

impl IntoIterator for Problems {
    type Item = Problem;
    type IntoIter = std::collections::hash_map::IntoValues<String, Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.problems.into_values()
    }
}

/// Caller-side misuse of an entry point; never raised for rule failures
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("target must be a present record")]
    InvalidTarget,

    #[error("decode source must be a JSON object, got {found}")]
    InvalidSource { found: &'static str },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_display_prefixes_field() {
        let problem = Problem::new("Username", Reason::Required);
        assert_eq!(problem.to_string(), "Username is required");

        let problem = Problem::new("Email", Reason::InvalidEmail);
        assert_eq!(problem.to_string(), "Email is not a valid email address");
    }

    #[test]
    fn test_length_messages() {
        let cases = [
            (LengthOp::Eq, "length should be 10"),
            (LengthOp::Ne, "length should not be 10"),
            (LengthOp::Gt, "length should be greater than 10"),
            (LengthOp::Lt, "length should be less than 10"),
            (LengthOp::Ge, "length should be greater than or equal to 10"),
            (LengthOp::Le, "length should be less than or equal to 10"),
        ];
        for (op, message) in cases {
            assert_eq!(Reason::Length { op, expected: 10 }.to_string(), message);
        }
    }

    #[test]
    fn test_first_problem_per_field_wins() {
        let mut problems = Problems::new();
        problems.add_reason("name", Reason::Required);
        problems.add_reason("name", Reason::NotString);
        problems.add_reason("age", Reason::Zero);

        assert_eq!(problems.len(), 2);
        assert_eq!(problems.get("name").unwrap().reason, Reason::Required);
        assert!(problems.contains("age"));
        assert!(!problems.contains("email"));
        assert_eq!(problems.fields(), vec!["age", "name"]);
    }

    #[test]
    fn test_problems_merge() {
        let mut left = Problems::new();
        left.add_reason("a", Reason::Required);

        let mut right = Problems::new();
        right.add_reason("a", Reason::Empty);
        right.add_reason("b", Reason::InvalidEmail);

        left.merge(right);
        assert_eq!(left.len(), 2);
        assert_eq!(left.get("a").unwrap().reason, Reason::Required);
    }

    #[test]
    fn test_problems_to_json() {
        let mut problems = Problems::new();
        problems.add_reason("email", Reason::InvalidEmail);

        let json = problems.to_json();
        assert_eq!(json["error"]["code"], "validation_failed");
        assert_eq!(json["error"]["fields"]["email"]["code"], "invalid_email");
        assert_eq!(
            json["error"]["fields"]["email"]["message"],
            "email is not a valid email address"
        );
    }

    #[test]
    fn test_reason_is_problem_source() {
        use std::error::Error as _;

        let problem = Problem::new("code", Reason::Zero);
        let source = problem.source().unwrap();
        assert_eq!(source.to_string(), "cannot be zero");
    }
}
