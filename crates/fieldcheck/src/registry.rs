//! Lookup table from rule names and rule-name prefixes to handlers

use crate::config::ValidatorConfig;
use crate::error::Reason;
use crate::handler::{Handler, SharedHandler};
use crate::handlers::{self, Email, Length, Lower, NonZero, Required};
use std::collections::HashMap;
use std::sync::Arc;

/// A handler found for a rule expression
#[derive(Clone)]
pub struct Resolved<'r> {
    pub handler: &'r dyn Handler,
    /// The registry key that matched
    pub key: &'r str,
}

impl std::fmt::Debug for Resolved<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolved").field("key", &self.key).finish()
    }
}

/// Rule registry.
///
/// Exact keys (`required`) match the whole rule expression; prefix keys
/// (`len`) match any expression that starts with them, so the handler can
/// read its parameters from the rest. Cloning copies the table, sharing the
/// handlers themselves.
#[derive(Clone, Default)]
pub struct Registry {
    exact: HashMap<String, SharedHandler>,
    prefixes: HashMap<String, SharedHandler>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("rules", &self.rule_names())
            .field("prefixes", &self.prefix_names())
            .finish()
    }
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in rules
    pub fn builtin(config: &ValidatorConfig) -> Self {
        let mut registry = Self::new();
        registry.register("required", Required);
        registry.register("nonzero", NonZero);
        registry.register(
            "email",
            Email::new(config.record_empty_email, config.decode_empty_email),
        );
        registry.register("lower", Lower);
        registry.register_prefix(handlers::length::PREFIX, Length);
        registry
    }

    /// Add or replace the handler for an exact rule name
    pub fn register<H>(&mut self, name: impl Into<String>, handler: H)
    where
        H: Handler + 'static,
    {
        self.exact.insert(name.into(), Arc::new(handler));
    }

    /// Add or replace the handler for every rule starting with `prefix`
    pub fn register_prefix<H>(&mut self, prefix: impl Into<String>, handler: H)
    where
        H: Handler + 'static,
    {
        self.prefixes.insert(prefix.into(), Arc::new(handler));
    }

    /// Copy every entry of `other` into this registry, replacing entries
    /// with the same key
    pub fn extend(&mut self, other: Registry) {
        self.exact.extend(other.exact);
        self.prefixes.extend(other.prefixes);
    }

    /// Find the handler for a rule expression
    pub fn resolve<'r>(&'r self, rule: &str) -> Result<Resolved<'r>, Reason> {
        if let Some((key, handler)) = self.exact.get_key_value(rule) {
            return Ok(Resolved {
                handler: handler.as_ref(),
                key,
            });
        }

        self.prefixes
            .iter()
            .filter(|(prefix, _)| rule.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(key, handler)| Resolved {
                handler: handler.as_ref(),
                key,
            })
            .ok_or_else(|| Reason::UnknownRule {
                rule: rule.to_string(),
            })
    }

    /// Check whether a rule expression would resolve
    pub fn contains(&self, rule: &str) -> bool {
        self.resolve(rule).is_ok()
    }

    /// Registered exact rule names, sorted
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.exact.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered prefixes, sorted
    pub fn prefix_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.prefixes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{check, Context, Mode};
    use serde_json::{json, Value};

    #[test]
    fn test_builtin_rules() {
        let registry = Registry::builtin(&ValidatorConfig::default());
        assert_eq!(
            registry.rule_names(),
            vec!["email", "lower", "nonzero", "required"]
        );
        assert_eq!(registry.prefix_names(), vec!["len"]);
    }

    #[test]
    fn test_resolve_exact_and_prefix() {
        let registry = Registry::builtin(&ValidatorConfig::default());

        assert_eq!(registry.resolve("required").unwrap().key, "required");
        assert_eq!(registry.resolve("len>=10").unwrap().key, "len");
        assert_eq!(registry.resolve("len >3").unwrap().key, "len");
    }

    #[test]
    fn test_exact_names_do_not_match_as_prefix() {
        let registry = Registry::builtin(&ValidatorConfig::default());

        let err = registry.resolve("requiredish").unwrap_err();
        assert_eq!(
            err,
            Reason::UnknownRule {
                rule: "requiredish".to_string()
            }
        );
        assert!(!registry.contains("upper"));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut registry = Registry::new();
        registry.register_prefix("len", |_: &Context<'_>, _: Value| -> Result<Value, Reason> {
            Ok(json!("short"))
        });
        registry.register_prefix("lenient", |_: &Context<'_>, _: Value| -> Result<Value, Reason> {
            Ok(json!("long"))
        });

        let resolved = registry.resolve("lenient:3").unwrap();
        assert_eq!(resolved.key, "lenient");

        let cx = Context::new("lenient:3", true, Mode::Record);
        assert_eq!(resolved.handler.handle(&cx, Value::Null).unwrap(), json!("long"));
    }

    #[test]
    fn test_extend_overrides_matching_keys() {
        let mut registry = Registry::builtin(&ValidatorConfig::default());
        let mut custom = Registry::new();
        custom.register("required", check(|_, _| Ok(())));
        custom.register_prefix("max", check(|_, _| Ok(())));

        registry.extend(custom);

        let cx = Context::new("required", false, Mode::Decode);
        assert!(registry
            .resolve("required")
            .unwrap()
            .handler
            .handle(&cx, Value::Null)
            .is_ok());
        assert_eq!(registry.prefix_names(), vec!["len", "max"]);
        assert!(registry.contains("email"));
    }

    #[test]
    fn test_register_overwrites_and_clone_is_independent() {
        let mut registry = Registry::builtin(&ValidatorConfig::default());
        let original = registry.clone();

        registry.register("required", check(|_, _| Ok(())));
        registry.register("even", check(|value, _| match value.as_i64() {
            Some(n) if n % 2 == 0 => Ok(()),
            _ => Err(Reason::custom("must be even")),
        }));

        let cx = Context::new("required", true, Mode::Record);
        assert!(registry
            .resolve("required")
            .unwrap()
            .handler
            .handle(&cx, Value::Null)
            .is_ok());
        assert!(original
            .resolve("required")
            .unwrap()
            .handler
            .handle(&cx, Value::Null)
            .is_err());

        assert!(registry.contains("even"));
        assert!(!original.contains("even"));
    }
}
