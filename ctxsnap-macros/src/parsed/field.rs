use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::spanned::Spanned;
use syn::{Attribute, Error, Field, Ident, LitStr, Result};

use super::types::{FieldBase, TypeInfo, classify_type};

pub(crate) struct ParsedField {
    pub ident: Ident,
    /// Attribute name, after `rename`.
    pub name: String,
    pub ty: TypeInfo,
    pub json: bool,
    pub skip: bool,
    pub span: Span,
}

impl ParsedField {
    pub(crate) fn from_field(field: &Field) -> Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new(field.span(), "Describable requires named fields"))?;

        let ty = classify_type(&field.ty);
        let mut rename = None;
        let mut json = false;
        let mut skip = false;

        for attr in &field.attrs {
            if attr.path().is_ident("ctxsnap") {
                Self::parse_field_attr(attr, &mut rename, &mut json, &mut skip)?;
            }
        }

        if !skip && !json && ty.base == FieldBase::Other {
            return Err(Error::new(
                field.ty.span(),
                "unsupported attribute type (u64, usize and non-Utc DateTime included); add #[ctxsnap(json)] to store it as JSON or #[ctxsnap(skip)] to leave it out",
            ));
        }

        let name = rename.unwrap_or_else(|| ident.to_string());
        Ok(Self {
            ident,
            name,
            ty,
            json,
            skip,
            span: field.span(),
        })
    }

    fn parse_field_attr(attr: &Attribute, rename: &mut Option<String>, json: &mut bool, skip: &mut bool) -> Result<()> {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                let value = value.value();
                if value.is_empty() {
                    return Err(meta.error("rename requires a non-empty attribute name"));
                }
                *rename = Some(value);
            } else if meta.path.is_ident("json") {
                *json = true;
            } else if meta.path.is_ident("skip") {
                *skip = true;
            } else {
                return Err(meta.error("unknown ctxsnap field option, expected `rename`, `json` or `skip`"));
            }
            Ok(())
        })
    }

    pub(crate) fn name_tokens(&self) -> LitStr {
        LitStr::new(&self.name, Span::call_site())
    }

    pub(crate) fn value_arm(&self) -> TokenStream2 {
        let ident = &self.ident;
        let name = self.name_tokens();
        let value = if self.json && self.ty.optional {
            quote! {
                match &self.#ident {
                    ::std::option::Option::Some(value) => ::ctxsnap::value::AttributeValue::json(value),
                    ::std::option::Option::None => ::ctxsnap::value::AttributeValue::Null,
                }
            }
        } else if self.json {
            quote! { ::ctxsnap::value::AttributeValue::json(&self.#ident) }
        } else {
            quote! { ::ctxsnap::value::AttributeValue::from(::std::clone::Clone::clone(&self.#ident)) }
        };
        quote! {
            #name => ::std::option::Option::Some(#value)
        }
    }

    pub(crate) fn descriptor_tokens(&self) -> TokenStream2 {
        let name = self.name_tokens();
        let optional = self.ty.optional;
        let kind = if self.json {
            quote! { ::ctxsnap::value::AttributeKind::Json }
        } else {
            self.ty
                .base
                .kind_tokens()
                .unwrap_or_else(|| quote! { ::ctxsnap::value::AttributeKind::Json })
        };
        quote! {
            ::ctxsnap::types::AttributeDescriptor {
                name: ::std::string::String::from(#name),
                kind: #kind,
                optional: #optional,
            }
        }
    }
}
