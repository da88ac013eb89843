//! `nonzero`: strings must be non-empty, numbers non-zero

use crate::error::Reason;
use crate::handler::{Context, Handler};
use serde_json::Value;

/// Passes only a non-empty string or a non-zero number; everything else,
/// including absent values, fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonZero;

impl Handler for NonZero {
    fn handle(&self, cx: &Context<'_>, value: Value) -> Result<Value, Reason> {
        if !cx.present {
            return Err(Reason::Zero);
        }
        match &value {
            Value::String(s) if s.is_empty() => Err(Reason::Empty),
            Value::String(_) => Ok(value),
            Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Ok(value),
            _ => Err(Reason::Zero),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Mode;
    use serde_json::json;

    fn run(value: Value) -> Result<Value, Reason> {
        NonZero.handle(&Context::new("nonzero", true, Mode::Record), value)
    }

    #[test]
    fn test_nonzero_strings() {
        assert_eq!(run(json!("")), Err(Reason::Empty));
        assert_eq!(run(json!("x")), Ok(json!("x")));
    }

    #[test]
    fn test_nonzero_numbers() {
        assert_eq!(run(json!(0)), Err(Reason::Zero));
        assert_eq!(run(json!(0.0)), Err(Reason::Zero));
        assert!(run(json!(-3)).is_ok());
        assert!(run(json!(1234.5)).is_ok());
        assert!(run(json!(u64::MAX)).is_ok());
    }

    #[test]
    fn test_nonzero_rejects_non_scalars() {
        assert_eq!(run(Value::Null), Err(Reason::Zero));
        assert_eq!(run(json!(true)), Err(Reason::Zero));
        assert_eq!(run(json!([1])), Err(Reason::Zero));
        assert_eq!(run(json!({"a": 1})), Err(Reason::Zero));
    }

    #[test]
    fn test_nonzero_rejects_absent() {
        let absent = Context::new("nonzero", false, Mode::Decode);
        assert_eq!(NonZero.handle(&absent, Value::Null), Err(Reason::Zero));
    }
}
