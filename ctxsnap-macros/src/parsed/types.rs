use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type, TypePath};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum FieldBase {
    Text,
    Integer,
    Float,
    Boolean,
    Binary,
    DateTime,
    Other,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct TypeInfo {
    pub optional: bool,
    pub base: FieldBase,
}

impl FieldBase {
    pub(crate) fn kind_tokens(self) -> Option<TokenStream2> {
        let kind = match self {
            FieldBase::Text => quote! { ::ctxsnap::value::AttributeKind::Text },
            FieldBase::Integer => quote! { ::ctxsnap::value::AttributeKind::Integer },
            FieldBase::Float => quote! { ::ctxsnap::value::AttributeKind::Float },
            FieldBase::Boolean => quote! { ::ctxsnap::value::AttributeKind::Boolean },
            FieldBase::Binary => quote! { ::ctxsnap::value::AttributeKind::Binary },
            FieldBase::DateTime => quote! { ::ctxsnap::value::AttributeKind::DateTime },
            FieldBase::Other => return None,
        };
        Some(kind)
    }
}

pub(crate) fn classify_type(ty: &Type) -> TypeInfo {
    if let Some(inner) = unwrap_generic(ty, "Option") {
        let info = classify_type(inner);
        return TypeInfo {
            optional: true,
            base: info.base,
        };
    }

    let base = if unwrap_generic(ty, "Vec").is_some_and(|inner| last_ident_is(inner, &["u8"])) {
        FieldBase::Binary
    } else if last_ident_is(ty, &["String"]) {
        FieldBase::Text
    } else if last_ident_is(
        ty,
        &["i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32"],
    ) {
        FieldBase::Integer
    } else if last_ident_is(ty, &["f32", "f64"]) {
        FieldBase::Float
    } else if last_ident_is(ty, &["bool"]) {
        FieldBase::Boolean
    } else if unwrap_generic(ty, "DateTime").is_some_and(|inner| last_ident_is(inner, &["Utc"])) {
        FieldBase::DateTime
    } else {
        FieldBase::Other
    };

    TypeInfo { optional: false, base }
}

fn last_ident(path: &TypePath) -> Option<String> {
    path.path.segments.last().map(|seg| seg.ident.to_string())
}

fn last_ident_is(ty: &Type, candidates: &[&str]) -> bool {
    match ty {
        Type::Path(path) => last_ident(path).is_some_and(|ident| candidates.contains(&ident.as_str())),
        _ => false,
    }
}

fn unwrap_generic<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => args.args.first().and_then(|arg| match arg {
            GenericArgument::Type(inner) => Some(inner),
            _ => None,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn base_of(ty: Type) -> (bool, FieldBase) {
        let info = classify_type(&ty);
        (info.optional, info.base)
    }

    #[test]
    fn classifies_scalar_types() {
        assert_eq!(base_of(parse_quote!(String)), (false, FieldBase::Text));
        assert_eq!(base_of(parse_quote!(u32)), (false, FieldBase::Integer));
        assert_eq!(base_of(parse_quote!(f64)), (false, FieldBase::Float));
        assert_eq!(base_of(parse_quote!(bool)), (false, FieldBase::Boolean));
        assert_eq!(base_of(parse_quote!(chrono::DateTime<Utc>)), (false, FieldBase::DateTime));
    }

    #[test]
    fn classifies_wrappers() {
        assert_eq!(base_of(parse_quote!(Option<String>)), (true, FieldBase::Text));
        assert_eq!(base_of(parse_quote!(Vec<u8>)), (false, FieldBase::Binary));
        assert_eq!(base_of(parse_quote!(Option<Vec<u8>>)), (true, FieldBase::Binary));
        assert_eq!(base_of(parse_quote!(Vec<String>)), (false, FieldBase::Other));
        assert_eq!(base_of(parse_quote!(u128)), (false, FieldBase::Other));
    }

    #[test]
    fn rejects_types_that_do_not_fit_their_kind() {
        // u64 and usize can exceed i64::MAX.
        assert_eq!(base_of(parse_quote!(u64)), (false, FieldBase::Other));
        assert_eq!(base_of(parse_quote!(Option<usize>)), (true, FieldBase::Other));
        assert_eq!(base_of(parse_quote!(DateTime<FixedOffset>)), (false, FieldBase::Other));
        assert_eq!(base_of(parse_quote!(chrono::DateTime<chrono::Local>)), (false, FieldBase::Other));
        assert_eq!(base_of(parse_quote!(DateTime<chrono::Utc>)), (false, FieldBase::DateTime));
    }
}
