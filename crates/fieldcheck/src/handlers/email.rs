//! `email`: quick structural email check

use crate::config::EmptyEmail;
use crate::error::Reason;
use crate::handler::{Context, Handler, Mode};
use serde_json::Value;

/// Email syntax check.
///
/// Accepts a string with an `@` that is neither first nor last, followed
/// later by a `.` that is not the last character. The treatment of the empty
/// string depends on the entry point: see [`EmptyEmail`].
#[derive(Debug, Clone, Copy)]
pub struct Email {
    /// Policy for `""` when validating a native record
    pub on_record: EmptyEmail,
    /// Policy for `""` when decoding a mapping
    pub on_decode: EmptyEmail,
}

impl Email {
    pub fn new(on_record: EmptyEmail, on_decode: EmptyEmail) -> Self {
        Self {
            on_record,
            on_decode,
        }
    }

    fn empty_policy(&self, mode: Mode) -> EmptyEmail {
        match mode {
            Mode::Record => self.on_record,
            Mode::Decode => self.on_decode,
        }
    }
}

impl Default for Email {
    fn default() -> Self {
        Self::new(EmptyEmail::Reject, EmptyEmail::Skip)
    }
}

/// Whether `email` has the `local@domain.tld` shape
pub fn is_email(email: &str) -> bool {
    let Some(at) = email.find('@') else {
        return false;
    };
    if at == 0 || at == email.len() - 1 {
        return false;
    }
    match email.rfind('.') {
        Some(dot) => dot > at && dot < email.len() - 1,
        None => false,
    }
}

impl Handler for Email {
    fn handle(&self, cx: &Context<'_>, value: Value) -> Result<Value, Reason> {
        let Value::String(email) = &value else {
            return Err(Reason::NotString);
        };

        if email.is_empty() && self.empty_policy(cx.mode) == EmptyEmail::Skip {
            return Ok(value);
        }

        if is_email(email) {
            Ok(value)
        } else {
            Err(Reason::InvalidEmail)
        }
    }
}
