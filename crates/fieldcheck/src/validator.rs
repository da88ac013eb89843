//! Validation engine: walks a record and runs each field's rules

use crate::config::ValidatorConfig;
use crate::error::{Problems, Reason, ValidateError, ValidateResult};
use crate::handler::{Context, Handler, Mode};
use crate::record::{Field, Record, Slot};
use crate::registry::Registry;
use crate::value::{kind_of, FieldValue};
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::io::Read;

/// Where field values come from during a walk
#[derive(Clone, Copy)]
enum Source<'s> {
    /// The record's own fields, always present
    Record,
    /// A sparse mapping keyed by external field names
    Mapping(&'s Map<String, Value>),
}

impl Source<'_> {
    fn mode(&self) -> Mode {
        match self {
            Source::Record => Mode::Record,
            Source::Mapping(_) => Mode::Decode,
        }
    }
}

/// Validates records against a frozen rule registry.
///
/// A `Validator` is `Send + Sync`; share it between threads freely.
/// Registering rules needs `&mut self`, so it cannot race with validation.
#[derive(Debug, Clone)]
pub struct Validator {
    registry: Registry,
    config: ValidatorConfig,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Validator with the built-in rules and default configuration
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// Validator with the built-in rules and the given configuration
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            registry: Registry::builtin(&config),
            config,
        }
    }

    /// Start building a validator
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Add or replace a rule
    pub fn register<H>(&mut self, name: impl Into<String>, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        self.registry.register(name, handler);
        self
    }

    /// Add or replace a parameterized rule matched by prefix
    pub fn register_prefix<H>(&mut self, prefix: impl Into<String>, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        self.registry.register_prefix(prefix, handler);
        self
    }

    /// Validate a record in place.
    ///
    /// Every field counts as present. Transforming rules (`lower`) write
    /// their result back to the field. An empty string fails `email` unless
    /// [`ValidatorConfig::record_empty_email`] says otherwise.
    pub fn validate<R>(&self, record: &mut R) -> ValidateResult<Problems>
    where
        R: Record + ?Sized,
    {
        if record.is_absent() {
            return Err(ValidateError::InvalidTarget);
        }
        let mut problems = Problems::new();
        self.walk(record, Source::Record, "", &mut problems);
        finish(problems)
    }

    /// Validate a sparse mapping and copy the values that pass onto a record.
    ///
    /// Keys are external field names. A missing key is "absent" to the rules,
    /// and its field is left untouched. A field is written only when all of its
    /// rules pass. An empty string is skipped by `email` unless
    /// [`ValidatorConfig::decode_empty_email`] says otherwise. Nested
    /// records read from the nested object under their own key.
    ///
    /// The mapping is borrowed for the whole call and values are cloned into
    /// the record, so the caller's map is never aliased.
    pub fn decode<R>(&self, source: &Map<String, Value>, record: &mut R) -> ValidateResult<Problems>
    where
        R: Record + ?Sized,
    {
        if record.is_absent() {
            return Err(ValidateError::InvalidTarget);
        }
        let mut problems = Problems::new();
        self.walk(record, Source::Mapping(source), "", &mut problems);
        finish(problems)
    }

    /// Decode a JSON value, which must be an object
    pub fn decode_value<R>(&self, source: &Value, record: &mut R) -> ValidateResult<Problems>
    where
        R: Record + ?Sized,
    {
        match source {
            Value::Object(map) => self.decode(map, record),
            other => Err(ValidateError::InvalidSource {
                found: kind_of(other),
            }),
        }
    }

    /// Parse JSON text and decode it
    pub fn decode_json<R>(&self, json: &str, record: &mut R) -> ValidateResult<Problems>
    where
        R: Record + ?Sized,
    {
        let source: Value = serde_json::from_str(json)?;
        self.decode_value(&source, record)
    }

    /// Read JSON from a reader and decode it
    pub fn decode_reader<R, I>(&self, reader: I, record: &mut R) -> ValidateResult<Problems>
    where
        R: Record + ?Sized,
        I: Read,
    {
        let source: Value = serde_json::from_reader(reader)?;
        self.decode_value(&source, record)
    }

    /// Run a single rule expression against a value, as if on a present
    /// record field
    pub fn resolve_rule(&self, rule: &str, value: Value) -> Result<Value, Reason> {
        let resolved = self.registry.resolve(rule)?;
        resolved
            .handler
            .handle(&Context::new(rule, true, Mode::Record), value)
    }

    fn walk<R>(&self, record: &mut R, source: Source<'_>, prefix: &str, problems: &mut Problems)
    where
        R: Record + ?Sized,
    {
        for field in record.describe() {
            let key = field.key();
            let path = qualify(prefix, key);
            let Field {
                name, rules, slot, ..
            } = field;

            match slot {
                Slot::ReadOnly => {
                    tracing::trace!("Skipping read-only field '{}'", name);
                }
                Slot::Nested(nested) => {
                    let nested_source = match source {
                        Source::Record => Source::Record,
                        Source::Mapping(map) => match map.get(key) {
                            Some(Value::Object(inner)) => Source::Mapping(inner),
                            None | Some(Value::Null) => Source::Mapping(empty_map()),
                            Some(other) => {
                                tracing::debug!(
                                    "Nested field '{}' expects an object, got {}",
                                    path,
                                    kind_of(other)
                                );
                                problems.add_reason(
                                    path,
                                    Reason::TypeMismatch {
                                        expected: "an object",
                                    },
                                );
                                continue;
                            }
                        },
                    };

                    if self.config.merge_nested {
                        self.walk(nested, nested_source, &path, problems);
                    } else {
                        let mut discarded = Problems::new();
                        self.walk(nested, nested_source, &path, &mut discarded);
                    }
                }
                Slot::Value(value) => {
                    // Rule-less fields still take their decoded value.
                    if rules.is_empty() && source.mode() == Mode::Record {
                        continue;
                    }
                    if let Err(reason) = self.run_rules(&path, key, rules, value, source) {
                        problems.add_reason(path, reason);
                    }
                }
            }
        }
    }

    /// Run a field's rules in order, stopping at the first failure
    fn run_rules(
        &self,
        path: &str,
        key: &str,
        rules: &[&str],
        slot: &mut dyn FieldValue,
        source: Source<'_>,
    ) -> Result<(), Reason> {
        let mode = source.mode();
        let (mut current, present) = match source {
            Source::Record => (slot.to_value(), true),
            Source::Mapping(map) => match map.get(key) {
                Some(value) => (value.clone(), true),
                None => (Value::Null, false),
            },
        };

        for &rule in rules {
            let resolved = self.registry.resolve(rule).map_err(|reason| {
                tracing::debug!("Field '{}' references unknown rule '{}'", path, rule);
                reason
            })?;

            tracing::trace!("Running rule '{}' on field '{}'", resolved.key, path);
            let cx = Context::new(rule, present, mode);
            let next = resolved.handler.handle(&cx, current.clone())?;

            if mode == Mode::Record && next != current {
                write_back(path, slot, next.clone())?;
            }
            current = next;
        }

        if mode == Mode::Decode && present {
            if current.is_null() {
                // A null only clears fields that can hold one.
                if slot.set_value(Value::Null).is_err() {
                    tracing::trace!("Skipping null for field '{}'", path);
                }
            } else {
                write_back(path, slot, current)?;
            }
        }
        Ok(())
    }
}

fn write_back(path: &str, slot: &mut dyn FieldValue, value: Value) -> Result<(), Reason> {
    slot.set_value(value).map_err(|reason| {
        tracing::debug!("Could not write value back to field '{}': {}", path, reason);
        reason
    })
}

fn finish(problems: Problems) -> ValidateResult<Problems> {
    if !problems.is_empty() {
        tracing::debug!("Validation found {} problem(s)", problems.len());
    }
    Ok(problems)
}

fn qualify(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn empty_map() -> &'static Map<String, Value> {
    static EMPTY: Lazy<Map<String, Value>> = Lazy::new(Map::new);
    &EMPTY
}

/// Collects configuration and custom rules, then produces a [`Validator`]
#[derive(Debug, Default)]
pub struct ValidatorBuilder {
    config: ValidatorConfig,
    custom: Registry,
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this configuration for the built-in rules
    pub fn config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Add or replace a rule
    pub fn rule<H>(mut self, name: impl Into<String>, handler: H) -> Self
    where
        H: Handler + 'static,
    {
        self.custom.register(name, handler);
        self
    }

    /// Add or replace a parameterized rule matched by prefix
    pub fn prefix_rule<H>(mut self, prefix: impl Into<String>, handler: H) -> Self
    where
        H: Handler + 'static,
    {
        self.custom.register_prefix(prefix, handler);
        self
    }

    /// Build the validator; custom rules override built-ins of the same name
    pub fn build(self) -> Validator {
        let mut registry = Registry::builtin(&self.config);
        registry.extend(self.custom);
        Validator {
            registry,
            config: self.config,
        }
    }
}
