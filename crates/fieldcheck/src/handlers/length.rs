//! `len<op><n>`: compare the length of a string, array or object

use crate::error::{LengthOp, Reason};
use crate::handler::{Context, Handler};
use serde_json::Value;

/// Rule-name prefix this handler is registered under
pub const PREFIX: &str = "len";

/// Parameterized length rule, e.g. `len==10`, `len >3`, `len<=255`.
///
/// The operator occupies the two characters after `len`; the single-character
/// operators are right-aligned with a leading space (`len >3`), the unpadded
/// form (`len>3`) is accepted as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct Length;

/// Split a `len` expression into its operator and bound
pub fn parse(rule: &str) -> Result<(LengthOp, usize), Reason> {
    let bad_format = || Reason::BadRuleFormat {
        rule: rule.to_string(),
    };

    let rest = rule.strip_prefix(PREFIX).ok_or_else(bad_format)?;
    let (op, number) = [
        ("==", LengthOp::Eq),
        ("!=", LengthOp::Ne),
        (">=", LengthOp::Ge),
        ("<=", LengthOp::Le),
        (" >", LengthOp::Gt),
        (" <", LengthOp::Lt),
        (">", LengthOp::Gt),
        ("<", LengthOp::Lt),
    ]
    .iter()
    .find_map(|(token, op)| rest.strip_prefix(token).map(|number| (*op, number)))
    .ok_or_else(bad_format)?;

    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad_format());
    }
    let expected = number.parse::<usize>().map_err(|_| bad_format())?;
    Ok((op, expected))
}

/// Length of a measurable value: characters of a string, elements of an
/// array or entries of an object
pub fn measure(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(entries) => Some(entries.len()),
        _ => None,
    }
}

impl Handler for Length {
    fn handle(&self, cx: &Context<'_>, value: Value) -> Result<Value, Reason> {
        let (op, expected) = parse(cx.rule)?;
        let actual = measure(&value).ok_or(Reason::NotMeasurable)?;

        if op.holds(actual, expected) {
            Ok(value)
        } else {
            Err(Reason::Length { op, expected })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Mode;
    use serde_json::json;

    fn run(rule: &str, value: Value) -> Result<Value, Reason> {
        Length.handle(&Context::new(rule, true, Mode::Record), value)
    }

    fn of_len(n: usize) -> Value {
        json!("x".repeat(n))
    }

    fn message(rule: &str, value: Value) -> String {
        run(rule, value).unwrap_err().to_string()
    }

    #[test]
    fn test_len_equal() {
        assert!(run("len==10", of_len(10)).is_ok());
        assert_eq!(message("len==10", of_len(9)), "length should be 10");
        assert_eq!(message("len==10", of_len(11)), "length should be 10");
    }

    #[test]
    fn test_len_not_equal() {
        assert!(run("len!=10", of_len(9)).is_ok());
        assert!(run("len!=10", of_len(11)).is_ok());
        assert_eq!(message("len!=10", of_len(10)), "length should not be 10");
    }

    #[test]
    fn test_len_greater_and_less() {
        assert!(run("len >10", of_len(11)).is_ok());
        assert_eq!(
            message("len >10", of_len(10)),
            "length should be greater than 10"
        );

        assert!(run("len <10", of_len(9)).is_ok());
        assert_eq!(message("len <10", of_len(10)), "length should be less than 10");

        assert!(run("len>10", of_len(11)).is_ok());
        assert!(run("len<10", of_len(10)).is_err());
    }

    #[test]
    fn test_len_inclusive_bounds() {
        assert!(run("len>=10", of_len(10)).is_ok());
        assert!(run("len>=10", of_len(11)).is_ok());
        assert_eq!(
            message("len>=10", of_len(9)),
            "length should be greater than or equal to 10"
        );

        assert!(run("len<=10", of_len(9)).is_ok());
        assert!(run("len<=10", of_len(10)).is_ok());
        assert_eq!(
            message("len<=10", of_len(11)),
            "length should be less than or equal to 10"
        );
    }

    #[test]
    fn test_len_measures_collections_and_chars() {
        assert!(run("len==3", json!([1, 2, 3])).is_ok());
        assert!(run("len==1", json!({"a": 1})).is_ok());
        assert!(run("len==2", json!("éa")).is_ok());
    }

    #[test]
    fn test_len_rejects_unmeasurable_values() {
        assert_eq!(message("len==10", json!(10)), "cannot have a length");
        assert_eq!(run("len==1", json!(true)), Err(Reason::NotMeasurable));
        assert_eq!(run("len==0", Value::Null), Err(Reason::NotMeasurable));
    }

    #[test]
    fn test_len_rejects_malformed_expressions() {
        for rule in ["len", "len==", "len=10", "len~~10", "len==ten", "len==-1", "len== 1"] {
            assert_eq!(
                run(rule, of_len(1)),
                Err(Reason::BadRuleFormat {
                    rule: rule.to_string()
                }),
                "{rule} should be malformed"
            );
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse("len==10"), Ok((LengthOp::Eq, 10)));
        assert_eq!(parse("len >0"), Ok((LengthOp::Gt, 0)));
        assert_eq!(parse("len<=255"), Ok((LengthOp::Le, 255)));
    }
}
