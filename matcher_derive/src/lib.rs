extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{quote, quote_spanned};
use syn::ext::IdentExt;
use syn::spanned::Spanned;

/// Derives `fieldwise::Record` for a struct with named fields.
///
/// Every field takes part as a scalar unless annotated:
///
/// - `#[record(nested)]`: the field is another record type.
/// - `#[record(optional)]`: the field is an `Option`; absent compares as the
///   default value and is not printed. Combines with `nested`.
/// - `#[record(repeated)]`: the field is a `Vec`, compared pairwise.
///   Combines with `nested`.
/// - `#[record(has = "method")]`: the field is present when
///   `self.method()` returns `true`.
/// - `#[record(rename = "label")]`: use a different name in paths and
///   printed output.
/// - `#[record(skip)]`: leave the field out entirely.
///
/// On the struct itself, `#[record(name = "Label")]` overrides the record
/// name.
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    match expand(input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: syn::DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let label = record_label(&input)?;

    let fields = match &input.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(fields),
            ..
        }) => fields,
        syn::Data::Struct(_) => {
            return Err(syn::Error::new(
                name.span(),
                "Record can only be derived for structs with named fields",
            ))
        }
        _ => {
            return Err(syn::Error::new(
                name.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut calls = proc_macro2::TokenStream::new();
    for field in &fields.named {
        calls.extend(gen_field(field)?);
    }

    let generics = add_static_bounds(input.generics.clone());
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote_spanned! {name.span()=>
        impl #impl_generics ::fieldwise::Record for #name #ty_generics
        #where_clause {
            fn fields() -> ::fieldwise::FieldSet<Self> {
                ::fieldwise::FieldSet::<Self>::new(#label)
                    #calls
            }
        }
    })
}

fn add_static_bounds(mut generics: syn::Generics) -> syn::Generics {
    for param in &mut generics.params {
        if let syn::GenericParam::Type(type_param) = param {
            type_param.bounds.push(syn::parse_quote!('static));
        }
    }
    generics
}

/// The record name: the struct's name unless overridden.
fn record_label(input: &syn::DeriveInput) -> syn::Result<syn::LitStr> {
    let mut label = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                label = Some(meta.value()?.parse::<syn::LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("unsupported record attribute on a struct"))
            }
        })?;
    }
    Ok(label.unwrap_or_else(|| {
        let ident = input.ident.unraw();
        syn::LitStr::new(&ident.to_string(), ident.span())
    }))
}

#[derive(Default)]
struct FieldOptions {
    nested: bool,
    optional: bool,
    repeated: bool,
    skip: bool,
    has: Option<syn::Ident>,
    rename: Option<syn::LitStr>,
}

impl FieldOptions {
    fn parse(field: &syn::Field) -> syn::Result<Self> {
        let mut opts = FieldOptions::default();
        for attr in &field.attrs {
            if !attr.path().is_ident("record") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("nested") {
                    opts.nested = true;
                } else if meta.path.is_ident("optional") {
                    opts.optional = true;
                } else if meta.path.is_ident("repeated") {
                    opts.repeated = true;
                } else if meta.path.is_ident("skip") {
                    opts.skip = true;
                } else if meta.path.is_ident("has") {
                    let method = meta.value()?.parse::<syn::LitStr>()?;
                    opts.has = Some(method.parse()?);
                } else if meta.path.is_ident("rename") {
                    opts.rename = Some(meta.value()?.parse()?);
                } else {
                    return Err(meta.error("unsupported record attribute"));
                }
                Ok(())
            })?;
        }
        let span = match &field.ident {
            Some(ident) => ident.span(),
            None => field.span(),
        };
        opts.validate(span)?;
        Ok(opts)
    }

    fn validate(&self, span: Span) -> syn::Result<()> {
        let conflict = if self.optional && self.repeated {
            Some("`optional` and `repeated` cannot be combined")
        } else if self.has.is_some() && (self.optional || self.repeated) {
            Some("`has` only applies to singular, non-optional fields")
        } else if self.skip
            && (self.nested
                || self.optional
                || self.repeated
                || self.has.is_some()
                || self.rename.is_some())
        {
            Some("`skip` cannot be combined with other record attributes")
        } else {
            None
        };
        match conflict {
            Some(msg) => Err(syn::Error::new(span, msg)),
            None => Ok(()),
        }
    }
}

/// Generates the builder call declaring one field, e.g.
///
///   .optional_nested("bar", |r: &Self| r.bar.as_ref())
fn gen_field(field: &syn::Field) -> syn::Result<proc_macro2::TokenStream> {
    let opts = FieldOptions::parse(field)?;
    if opts.skip {
        return Ok(proc_macro2::TokenStream::new());
    }

    let ident = match &field.ident {
        Some(ident) => ident,
        None => return Err(syn::Error::new(field.span(), "unnamed field")),
    };
    let label = opts.rename.clone().unwrap_or_else(|| {
        let name = ident.unraw();
        syn::LitStr::new(&name.to_string(), name.span())
    });

    let call = match (&opts.has, opts.optional, opts.repeated, opts.nested) {
        (Some(has), _, _, false) => quote! {
            .scalar_with_presence(#label, |r: &Self| &r.#ident, |r: &Self| r.#has())
        },
        (Some(has), _, _, true) => quote! {
            .nested_with_presence(#label, |r: &Self| &r.#ident, |r: &Self| r.#has())
        },
        (None, true, _, false) => quote! {
            .optional(#label, |r: &Self| r.#ident.as_ref())
        },
        (None, true, _, true) => quote! {
            .optional_nested(#label, |r: &Self| r.#ident.as_ref())
        },
        (None, false, true, false) => quote! {
            .repeated(#label, |r: &Self| &r.#ident[..])
        },
        (None, false, true, true) => quote! {
            .repeated_nested(#label, |r: &Self| &r.#ident[..])
        },
        (None, false, false, false) => quote! {
            .scalar(#label, |r: &Self| &r.#ident)
        },
        (None, false, false, true) => quote! {
            .nested(#label, |r: &Self| &r.#ident)
        },
    };
    Ok(quote_spanned! {field.span()=> #call })
}
