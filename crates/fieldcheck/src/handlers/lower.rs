//! `lower`: lowercase a string in place

use crate::error::Reason;
use crate::handler::{Context, Handler};
use serde_json::Value;

/// Replaces a string with its lowercase form
#[derive(Debug, Clone, Copy, Default)]
pub struct Lower;

impl Handler for Lower {
    fn handle(&self, _cx: &Context<'_>, value: Value) -> Result<Value, Reason> {
        match value {
            Value::String(s) => Ok(Value::String(s.to_lowercase())),
            _ => Err(Reason::NotString),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Mode;
    use serde_json::json;

    #[test]
    fn test_lower() {
        let cx = Context::new("lower", true, Mode::Record);
        assert_eq!(Lower.handle(&cx, json!("MonKEY")), Ok(json!("monkey")));
        assert_eq!(Lower.handle(&cx, json!(12)), Err(Reason::NotString));
        assert_eq!(Lower.handle(&cx, Value::Null), Err(Reason::NotString));
    }
}
