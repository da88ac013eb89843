//! Handler protocol every rule implements

use crate::error::Reason;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Which entry point is driving validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Validating a native record in place; every field is present
    Record,
    /// Decoding a sparse mapping onto a record
    Decode,
}

/// What a handler knows about the current invocation besides the value
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// The full rule expression as declared, e.g. `len>=10`
    pub rule: &'a str,
    /// Whether the field had a value in the source
    pub present: bool,
    pub mode: Mode,
}

impl<'a> Context<'a> {
    pub fn new(rule: &'a str, present: bool, mode: Mode) -> Self {
        Self {
            rule,
            present,
            mode,
        }
    }
}

/// Executable implementation of one rule.
///
/// A handler receives the field's current value and returns the value to
/// continue with, which is written back to the field. Rejecting returns the
/// [`Reason`] that becomes the field's problem.
pub trait Handler: Send + Sync {
    fn handle(&self, cx: &Context<'_>, value: Value) -> Result<Value, Reason>;
}

impl<F> Handler for F
where
    F: Fn(&Context<'_>, Value) -> Result<Value, Reason> + Send + Sync,
{
    fn handle(&self, cx: &Context<'_>, value: Value) -> Result<Value, Reason> {
        self(cx, value)
    }
}

/// Type alias for shared handlers
pub type SharedHandler = Arc<dyn Handler>;

/// Handler built from a check that only looks at the value and its presence
/// and never transforms it.
#[derive(Clone)]
pub struct CheckHandler {
    check: Arc<dyn Fn(&Value, bool) -> Result<(), Reason> + Send + Sync>,
}

impl fmt::Debug for CheckHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckHandler").finish_non_exhaustive()
    }
}

impl Handler for CheckHandler {
    fn handle(&self, cx: &Context<'_>, value: Value) -> Result<Value, Reason> {
        (self.check)(&value, cx.present)?;
        Ok(value)
    }
}

/// Wrap a value-and-presence check as a [`Handler`]
pub fn check<F>(check: F) -> CheckHandler
where
    F: Fn(&Value, bool) -> Result<(), Reason> + Send + Sync + 'static,
{
    CheckHandler {
        check: Arc::new(check),
    }
}
