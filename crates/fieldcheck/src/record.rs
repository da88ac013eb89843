//! Records and the field descriptors the engine walks

use crate::value::FieldValue;
use std::fmt;

/// An aggregate whose fields carry validation rules.
///
/// Usually implemented with `#[derive(Record)]`. `describe` lists the fields
/// in declaration order; fields with no rules may be left out.
pub trait Record {
    fn describe(&mut self) -> Vec<Field<'_>>;

    /// Whether this record is an empty indirection (`None`) with nothing to
    /// walk
    fn is_absent(&self) -> bool {
        false
    }
}

impl<T: Record + ?Sized> Record for Box<T> {
    fn describe(&mut self) -> Vec<Field<'_>> {
        (**self).describe()
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: Record> Record for Option<T> {
    fn describe(&mut self) -> Vec<Field<'_>> {
        match self {
            Some(record) => record.describe(),
            None => Vec::new(),
        }
    }

    fn is_absent(&self) -> bool {
        self.as_ref().map_or(true, |record| record.is_absent())
    }
}

/// Access the engine has to a field
pub enum Slot<'a> {
    /// A scalar or collection value handlers run against
    Value(&'a mut dyn FieldValue),
    /// A sub-record validated recursively
    Nested(&'a mut dyn Record),
    /// A field that must not be written; skipped even when annotated
    ReadOnly,
}

impl fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Value(_) => write!(f, "Value"),
            Slot::Nested(_) => write!(f, "Nested"),
            Slot::ReadOnly => write!(f, "ReadOnly"),
        }
    }
}

/// Descriptor of one field of a record
#[derive(Debug)]
pub struct Field<'a> {
    /// Structural field name
    pub name: &'a str,
    /// Alternate external name, preferred when reporting and decoding
    pub rename: Option<&'a str>,
    /// Rule expressions in declared order
    pub rules: &'a [&'a str],
    pub slot: Slot<'a>,
}

impl<'a> Field<'a> {
    /// A validated value field
    pub fn value(name: &'a str, rules: &'a [&'a str], value: &'a mut dyn FieldValue) -> Self {
        Self {
            name,
            rename: None,
            rules,
            slot: Slot::Value(value),
        }
    }

    /// A nested record field
    pub fn nested(name: &'a str, record: &'a mut dyn Record) -> Self {
        Self {
            name,
            rename: None,
            rules: &[],
            slot: Slot::Nested(record),
        }
    }

    /// A read-only field
    pub fn read_only(name: &'a str, rules: &'a [&'a str]) -> Self {
        Self {
            name,
            rename: None,
            rules,
            slot: Slot::ReadOnly,
        }
    }

    /// Set the external name
    pub fn rename(mut self, rename: &'a str) -> Self {
        self.rename = Some(rename);
        self
    }

    /// Name used for reporting and as the decode key
    pub fn key(&self) -> &'a str {
        self.rename.unwrap_or(self.name)
    }
}
