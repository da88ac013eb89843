//! Bridge between native field types and the dynamic values handlers see

use crate::error::Reason;
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashMap};

/// A field whose value can be read as, and written from, a [`Value`].
///
/// `set_value` is the write-back half used for transforming rules and for
/// decoding a mapping onto a record. It must leave the field untouched when
/// the value does not fit.
pub trait FieldValue {
    fn to_value(&self) -> Value;

    fn set_value(&mut self, value: Value) -> Result<(), Reason>;
}

/// Name of the JSON kind of a value, for error messages
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn set_value(&mut self, value: Value) -> Result<(), Reason> {
        match value {
            Value::String(s) => {
                *self = s;
                Ok(())
            }
            _ => Err(Reason::TypeMismatch {
                expected: "a string",
            }),
        }
    }
}

impl FieldValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn set_value(&mut self, value: Value) -> Result<(), Reason> {
        match value {
            Value::Bool(b) => {
                *self = b;
                Ok(())
            }
            _ => Err(Reason::TypeMismatch {
                expected: "a boolean",
            }),
        }
    }
}

macro_rules! signed_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Number(Number::from(*self))
                }

                fn set_value(&mut self, value: Value) -> Result<(), Reason> {
                    let parsed = value
                        .as_i64()
                        .and_then(|n| <$ty>::try_from(n).ok())
                        .ok_or(Reason::TypeMismatch { expected: "an integer" })?;
                    *self = parsed;
                    Ok(())
                }
            }
        )*
    };
}

macro_rules! unsigned_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Number(Number::from(*self))
                }

                fn set_value(&mut self, value: Value) -> Result<(), Reason> {
                    let parsed = value
                        .as_u64()
                        .and_then(|n| <$ty>::try_from(n).ok())
                        .ok_or(Reason::TypeMismatch { expected: "a non-negative integer" })?;
                    *self = parsed;
                    Ok(())
                }
            }
        )*
    };
}

signed_field_value!(i8, i16, i32, i64, isize);
unsigned_field_value!(u8, u16, u32, u64, usize);

/// Floats JSON numbers cannot hold travel as the strings `NaN`, `inf` and
/// `-inf`, so a present non-finite value never reads as null.
fn float_to_value(float: f64) -> Value {
    if let Some(number) = Number::from_f64(float) {
        return Value::Number(number);
    }
    let text = if float.is_nan() {
        "NaN"
    } else if float.is_sign_positive() {
        "inf"
    } else {
        "-inf"
    };
    Value::String(text.to_string())
}

fn float_from_value(value: &Value) -> Result<f64, Reason> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => match text.as_str() {
            "NaN" => Some(f64::NAN),
            "inf" => Some(f64::INFINITY),
            "-inf" => Some(f64::NEG_INFINITY),
            _ => None,
        },
        _ => None,
    }
    .ok_or(Reason::TypeMismatch { expected: "a number" })
}

impl FieldValue for f64 {
    fn to_value(&self) -> Value {
        float_to_value(*self)
    }

    fn set_value(&mut self, value: Value) -> Result<(), Reason> {
        *self = float_from_value(&value)?;
        Ok(())
    }
}

impl FieldValue for f32 {
    fn to_value(&self) -> Value {
        float_to_value(f64::from(*self))
    }

    fn set_value(&mut self, value: Value) -> Result<(), Reason> {
        *self = float_from_value(&value)? as f32;
        Ok(())
    }
}

impl FieldValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn set_value(&mut self, value: Value) -> Result<(), Reason> {
        *self = value;
        Ok(())
    }
}

impl<T> FieldValue for Option<T>
where
    T: FieldValue + Default,
{
    fn to_value(&self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::Null,
        }
    }

    fn set_value(&mut self, value: Value) -> Result<(), Reason> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        let mut inner = T::default();
        inner.set_value(value)?;
        *self = Some(inner);
        Ok(())
    }
}

impl<T> FieldValue for Vec<T>
where
    T: FieldValue + Default,
{
    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(FieldValue::to_value).collect())
    }

    fn set_value(&mut self, value: Value) -> Result<(), Reason> {
        let Value::Array(items) = value else {
            return Err(Reason::TypeMismatch {
                expected: "an array",
            });
        };
        let mut converted = Vec::with_capacity(items.len());
        for item in items {
            let mut slot = T::default();
            slot.set_value(item)?;
            converted.push(slot);
        }
        *self = converted;
        Ok(())
    }
}

fn object_entries<T>(value: Value) -> Result<Vec<(String, T)>, Reason>
where
    T: FieldValue + Default,
{
    let Value::Object(entries) = value else {
        return Err(Reason::TypeMismatch {
            expected: "an object",
        });
    };
    entries
        .into_iter()
        .map(|(key, item)| {
            let mut slot = T::default();
            slot.set_value(item)?;
            Ok((key, slot))
        })
        .collect()
}

impl<T> FieldValue for HashMap<String, T>
where
    T: FieldValue + Default,
{
    fn to_value(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(key, item)| (key.clone(), item.to_value()))
                .collect::<Map<String, Value>>(),
        )
    }

    fn set_value(&mut self, value: Value) -> Result<(), Reason> {
        *self = object_entries(value)?.into_iter().collect();
        Ok(())
    }
}

impl<T> FieldValue for BTreeMap<String, T>
where
    T: FieldValue + Default,
{
    fn to_value(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(key, item)| (key.clone(), item.to_value()))
                .collect::<Map<String, Value>>(),
        )
    }

    fn set_value(&mut self, value: Value) -> Result<(), Reason> {
        *self = object_entries(value)?.into_iter().collect();
        Ok(())
    }
}
