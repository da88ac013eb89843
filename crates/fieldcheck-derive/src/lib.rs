//! # fieldcheck-derive
//!
//! Derive macro for `fieldcheck::Record`.
//!
//! Fields opt in with an `#[is(...)]` attribute:
//! - `#[is("required,lower")]` or `#[is(rules = "required,lower")]`: rule list, run in order
//! - `#[is(rename = "user_name")]`: external name for reports and decoding
//!   (otherwise taken from `#[serde(rename = "...")]`, then the field name)
//! - `#[is(nested)]`: validate the field as a sub-record
//! - `#[is(readonly)]`: never validated or written

use proc_macro::TokenStream;

mod record;

/// Implement `fieldcheck::Record` from `#[is(...)]` field attributes
#[proc_macro_derive(Record, attributes(is))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record_impl(input)
}
