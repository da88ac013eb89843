//! `required`: the field must be present and non-empty

use crate::error::Reason;
use crate::handler::{Context, Handler};
use serde_json::Value;

/// Fails unless the value is present, non-null and, for strings, non-empty
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Handler for Required {
    fn handle(&self, cx: &Context<'_>, value: Value) -> Result<Value, Reason> {
        let missing = match &value {
            _ if !cx.present => true,
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        };

        if missing {
            Err(Reason::Required)
        } else {
            Ok(value)
        }
    }
}
