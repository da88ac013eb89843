//! Record derive implementation
//!
//! Turns `#[is(...)]` field attributes into a `describe` method listing
//! field descriptors in declaration order.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    ext::IdentExt,
    parse::{Parse, ParseStream, Result},
    parse_macro_input,
    punctuated::Punctuated,
    Attribute, Data, DeriveInput, Error, Fields, Ident, LitStr, Token,
};

/// Main implementation function for the Record derive
pub fn derive_record_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(result) => result.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// How the engine may touch a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Value,
    Nested,
    ReadOnly,
}

/// Everything extracted from one annotated field
#[derive(Debug)]
struct FieldSpec {
    ident: Ident,
    name: String,
    rename: Option<String>,
    rules: Vec<String>,
    kind: FieldKind,
}

/// One argument inside `#[is(...)]`
enum IsArg {
    Rules(LitStr),
    Rename(LitStr),
    Nested(Span),
    ReadOnly(Span),
}

impl Parse for IsArg {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(LitStr) {
            return Ok(IsArg::Rules(input.parse()?));
        }

        let key: Ident = input.call(Ident::parse_any)?;
        match key.to_string().as_str() {
            "rules" => {
                input.parse::<Token![=]>()?;
                Ok(IsArg::Rules(input.parse()?))
            }
            "rename" => {
                input.parse::<Token![=]>()?;
                Ok(IsArg::Rename(input.parse()?))
            }
            "nested" => Ok(IsArg::Nested(key.span())),
            "readonly" => Ok(IsArg::ReadOnly(key.span())),
            other => Err(Error::new(
                key.span(),
                format!(
                    "unknown #[is] argument `{}`, expected a rule list, `rules`, `rename`, `nested` or `readonly`",
                    other
                ),
            )),
        }
    }
}

fn expand(input: &DeriveInput) -> Result<proc_macro2::TokenStream> {
    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(Error::new_spanned(
                input,
                "#[derive(Record)] can only be applied to structs",
            ))
        }
    };

    let named = match &data.fields {
        Fields::Named(fields) => &fields.named,
        Fields::Unit => {
            return Ok(generate_impl(input, &[]));
        }
        Fields::Unnamed(_) => {
            return Err(Error::new_spanned(
                input,
                "#[derive(Record)] requires structs with named fields",
            ))
        }
    };

    let mut specs = Vec::new();
    for field in named {
        let ident = match &field.ident {
            Some(ident) => ident.clone(),
            None => continue,
        };
        if let Some(spec) = parse_field(ident, &field.attrs)? {
            specs.push(spec);
        }
    }

    Ok(generate_impl(input, &specs))
}

/// Read the `#[is]` and `#[serde]` attributes of a field; `None` when the
/// field is not annotated
fn parse_field(ident: Ident, attrs: &[Attribute]) -> Result<Option<FieldSpec>> {
    let mut annotated = false;
    let mut rules: Option<LitStr> = None;
    let mut rename: Option<LitStr> = None;
    let mut nested: Option<Span> = None;
    let mut readonly: Option<Span> = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("is")) {
        annotated = true;
        let args = attr.parse_args_with(Punctuated::<IsArg, Token![,]>::parse_terminated)?;
        for arg in args {
            match arg {
                IsArg::Rules(lit) => set_once(&mut rules, lit, "rules")?,
                IsArg::Rename(lit) => set_once(&mut rename, lit, "rename")?,
                IsArg::Nested(span) => nested = Some(span),
                IsArg::ReadOnly(span) => readonly = Some(span),
            }
        }
    }

    if !annotated {
        return Ok(None);
    }

    let kind = match (nested, readonly) {
        (Some(span), Some(_)) => {
            return Err(Error::new(span, "a field cannot be both `nested` and `readonly`"));
        }
        (Some(span), None) => {
            if rules.is_some() {
                return Err(Error::new(span, "nested records cannot carry rules"));
            }
            FieldKind::Nested
        }
        (None, Some(_)) => FieldKind::ReadOnly,
        (None, None) => FieldKind::Value,
    };

    let rules = match &rules {
        Some(lit) => split_rules(lit)?,
        None => Vec::new(),
    };

    let rename = rename
        .map(|lit| lit.value())
        .or_else(|| serde_rename(attrs));

    Ok(Some(FieldSpec {
        name: ident.unraw().to_string(),
        ident,
        rename,
        rules,
        kind,
    }))
}

fn set_once(slot: &mut Option<LitStr>, lit: LitStr, what: &str) -> Result<()> {
    if slot.is_some() {
        return Err(Error::new(lit.span(), format!("duplicate `{}` in #[is]", what)));
    }
    *slot = Some(lit);
    Ok(())
}

/// Split a comma-separated rule list, rejecting empty entries
fn split_rules(lit: &LitStr) -> Result<Vec<String>> {
    let value = lit.value();
    let mut rules = Vec::new();
    for rule in value.split(',') {
        let rule = rule.trim();
        if rule.is_empty() {
            return Err(Error::new(lit.span(), format!("empty rule in \"{}\"", value)));
        }
        rules.push(rule.to_string());
    }
    Ok(rules)
}

/// The deserialize-side name from `#[serde(rename = "...")]` or
/// `#[serde(rename(deserialize = "..."))]`
fn serde_rename(attrs: &[Attribute]) -> Option<String> {
    let mut rename = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        // Other serde arguments are skipped; a serde attribute we cannot
        // read never fails this derive.
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if meta.input.peek(Token![=]) {
                    let lit: LitStr = meta.value()?.parse()?;
                    rename = Some(lit.value());
                } else {
                    meta.parse_nested_meta(|inner| {
                        let lit: LitStr = inner.value()?.parse()?;
                        if inner.path.is_ident("deserialize") {
                            rename = Some(lit.value());
                        }
                        Ok(())
                    })?;
                }
            } else if meta.input.peek(Token![=]) {
                meta.value()?.parse::<syn::Expr>()?;
            } else if meta.input.peek(syn::token::Paren) {
                meta.input.parse::<proc_macro2::Group>()?;
            }
            Ok(())
        });
    }

    rename
}

fn generate_impl(input: &DeriveInput, specs: &[FieldSpec]) -> proc_macro2::TokenStream {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let entries: Vec<proc_macro2::TokenStream> = specs
        .iter()
        .map(|spec| {
            let ident = &spec.ident;
            let name = &spec.name;
            let rules = &spec.rules;

            let field = match spec.kind {
                FieldKind::Value => quote! {
                    ::fieldcheck::Field::value(#name, &[#(#rules),*], &mut self.#ident)
                },
                FieldKind::Nested => quote! {
                    ::fieldcheck::Field::nested(#name, &mut self.#ident)
                },
                FieldKind::ReadOnly => quote! {
                    ::fieldcheck::Field::read_only(#name, &[#(#rules),*])
                },
            };

            match &spec.rename {
                Some(rename) => quote! { #field.rename(#rename) },
                None => field,
            }
        })
        .collect();

    quote! {
        impl #impl_generics ::fieldcheck::Record for #struct_name #ty_generics #where_clause {
            fn describe(&mut self) -> ::std::vec::Vec<::fieldcheck::Field<'_>> {
                ::std::vec![#(#entries),*]
            }
        }
    }
}
