//! # fieldcheck
//!
//! Declarative field validation: annotate a struct's fields with short rule
//! names and get back one problem per failing field.
//!
//! ```
//! use fieldcheck::Record;
//!
//! #[derive(Record)]
//! struct Signup {
//!     #[is("required,lower")]
//!     username: String,
//!     #[is("required,email")]
//!     email: String,
//! }
//!
//! let mut signup = Signup {
//!     username: "MatRyer".to_string(),
//!     email: "test@test".to_string(),
//! };
//!
//! let problems = fieldcheck::validate(&mut signup).unwrap();
//! assert_eq!(signup.username, "matryer");
//! assert_eq!(
//!     problems.get("email").unwrap().to_string(),
//!     "email is not a valid email address"
//! );
//! ```
//!
//! Built-in rules: `required`, `nonzero`, `email`, `lower` and `len<op><n>`
//! (`len==10`, `len!=10`, `len >10`, `len <10`, `len>=10`, `len<=10`).
//! Custom rules are registered on a [`Validator`].

// Lets the derive macro's `::fieldcheck::` paths resolve inside this crate.
extern crate self as fieldcheck;

pub mod config;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod record;
pub mod registry;
pub mod validator;
pub mod value;

pub use config::{ConfigError, EmptyEmail, ValidatorConfig};
pub use error::{LengthOp, Problem, Problems, Reason, ValidateError, ValidateResult};
pub use handler::{check, CheckHandler, Context, Handler, Mode};
pub use record::{Field, Record, Slot};
pub use registry::{Registry, Resolved};
pub use validator::{Validator, ValidatorBuilder};
pub use value::FieldValue;

#[cfg(feature = "derive")]
pub use fieldcheck_derive::Record;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

static DEFAULT_VALIDATOR: Lazy<Validator> = Lazy::new(Validator::new);

/// The process-wide validator used by the free functions
pub fn default_validator() -> &'static Validator {
    &DEFAULT_VALIDATOR
}

/// Validate a record in place with the default validator
pub fn validate<R>(record: &mut R) -> ValidateResult<Problems>
where
    R: Record + ?Sized,
{
    DEFAULT_VALIDATOR.validate(record)
}

/// Decode a mapping onto a record with the default validator
pub fn decode<R>(source: &Map<String, Value>, record: &mut R) -> ValidateResult<Problems>
where
    R: Record + ?Sized,
{
    DEFAULT_VALIDATOR.decode(source, record)
}

/// Decode JSON text onto a record with the default validator
pub fn decode_json<R>(json: &str, record: &mut R) -> ValidateResult<Problems>
where
    R: Record + ?Sized,
{
    DEFAULT_VALIDATOR.decode_json(json, record)
}

/// Decode JSON from a reader onto a record with the default validator
pub fn decode_reader<R, I>(reader: I, record: &mut R) -> ValidateResult<Problems>
where
    R: Record + ?Sized,
    I: std::io::Read,
{
    DEFAULT_VALIDATOR.decode_reader(reader, record)
}

/// Run one rule expression against a value with the default validator
pub fn resolve_rule(rule: &str, value: Value) -> Result<Value, Reason> {
    DEFAULT_VALIDATOR.resolve_rule(rule, value)
}
