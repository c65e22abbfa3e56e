use std::collections::HashSet;

use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Error, Fields, Generics, Ident, LitStr, Result};

use super::field::ParsedField;

pub(crate) struct ParsedEntity {
    name: Ident,
    generics: Generics,
    entity_name: String,
    fields: Vec<ParsedField>,
}

impl ParsedEntity {
    pub(crate) fn from_input(input: &DeriveInput) -> Result<Self> {
        let mut entity_name: Option<String> = None;

        for attr in &input.attrs {
            if attr.path().is_ident("ctxsnap") {
                Self::parse_container_attr(attr, &mut entity_name)?;
            }
        }

        let fields = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => {
                    let mut parsed = Vec::new();
                    for field in &named.named {
                        let field = ParsedField::from_field(field)?;
                        if !field.skip {
                            parsed.push(field);
                        }
                    }
                    parsed
                }
                _ => return Err(Error::new(input.ident.span(), "Describable requires named fields")),
            },
            _ => return Err(Error::new(input.ident.span(), "Describable can only be derived for structs")),
        };

        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::new(
                    field.span,
                    format!("duplicate attribute name `{}`", field.name),
                ));
            }
        }

        Ok(Self {
            name: input.ident.clone(),
            generics: input.generics.clone(),
            entity_name: entity_name.unwrap_or_else(|| input.ident.to_string()),
            fields,
        })
    }

    fn parse_container_attr(attr: &Attribute, entity_name: &mut Option<String>) -> Result<()> {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("entity") {
                let value: LitStr = meta.value()?.parse()?;
                let value = value.value();
                if value.is_empty() {
                    return Err(meta.error("entity requires a non-empty name"));
                }
                *entity_name = Some(value);
                Ok(())
            } else {
                Err(meta.error("unknown ctxsnap container option, expected `entity`"))
            }
        })
    }

    pub(crate) fn emit(&self) -> TokenStream2 {
        let name = &self.name;
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();
        let entity_lit = LitStr::new(&self.entity_name, Span::call_site());

        let attribute_names = self.fields.iter().map(|field| field.name_tokens());
        let value_arms = self.fields.iter().map(|field| field.value_arm());
        let descriptors = self.fields.iter().map(|field| field.descriptor_tokens());

        quote! {
            impl #impl_generics ::ctxsnap::types::Describable for #name #ty_generics #where_clause {
                fn entity_name(&self) -> &str {
                    #entity_lit
                }

                fn attribute_names(&self) -> ::std::vec::Vec<&str> {
                    ::std::vec![#(#attribute_names),*]
                }

                fn value_for(&self, name: &str) -> ::std::option::Option<::ctxsnap::value::AttributeValue> {
                    match name {
                        #(#value_arms,)*
                        _ => ::std::option::Option::None,
                    }
                }
            }

            impl #impl_generics ::ctxsnap::types::EntityMetadata for #name #ty_generics #where_clause {
                const ENTITY_NAME: &'static str = #entity_lit;

                fn entity_descriptor() -> ::ctxsnap::types::EntityDescriptor {
                    ::ctxsnap::types::EntityDescriptor {
                        name: ::std::string::String::from(#entity_lit),
                        attributes: ::std::vec![#(#descriptors),*],
                    }
                }
            }
        }
    }
}
