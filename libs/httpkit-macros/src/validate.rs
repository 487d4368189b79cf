//! Expansion of `#[derive(Validate)]`.
//!
//! The derive records, once per type, which fields carry a validation tag,
//! what their serialized names are, and how to reach each field's value.
//! Everything else happens at runtime in `httpkit_validate`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{
    Attribute, Data, DeriveInput, Expr, ExprLit, Fields, GenericParam, Ident, Lit, LitStr, Meta,
    Token,
};

const RENAME_RULES: &[&str] = &[
    "lowercase",
    "UPPERCASE",
    "PascalCase",
    "camelCase",
    "snake_case",
    "SCREAMING_SNAKE_CASE",
    "kebab-case",
    "SCREAMING-KEBAB-CASE",
];

const TAG_LIST_HINT: &str =
    "expected a string of comma-separated validator names, e.g. #[validate(\"required\")]";

/// Container-level `#[serde(rename_all = "...")]` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> syn::Result<Self> {
        match lit.value().as_str() {
            "lowercase" => Ok(Self::Lower),
            "UPPERCASE" => Ok(Self::Upper),
            "PascalCase" => Ok(Self::Pascal),
            "camelCase" => Ok(Self::Camel),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            "kebab-case" => Ok(Self::Kebab),
            "SCREAMING-KEBAB-CASE" => Ok(Self::ScreamingKebab),
            other => Err(syn::Error::new_spanned(
                lit,
                format!(
                    "unknown rename_all rule '{other}'; expected one of: {}",
                    RENAME_RULES.join(", ")
                ),
            )),
        }
    }

    /// Serialized name of a field under this rule, matching serde's own
    /// field renaming (identifiers are assumed to be `snake_case`).
    fn apply(self, field: &str) -> String {
        match self {
            Self::Lower | Self::Snake => field.to_owned(),
            Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
            Self::Pascal => {
                let mut pascal = String::with_capacity(field.len());
                let mut capitalize = true;
                for ch in field.chars() {
                    if ch == '_' {
                        capitalize = true;
                    } else if capitalize {
                        pascal.push(ch.to_ascii_uppercase());
                        capitalize = false;
                    } else {
                        pascal.push(ch);
                    }
                }
                pascal
            }
            Self::Camel => {
                let pascal = Self::Pascal.apply(field);
                let mut chars = pascal.chars();
                let Some(first) = chars.next() else {
                    return pascal;
                };
                let mut camel = String::with_capacity(pascal.len());
                camel.push(first.to_ascii_lowercase());
                camel.push_str(chars.as_str());
                camel
            }
            Self::Kebab => field.replace('_', "-"),
            Self::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

struct TaggedField {
    member: Ident,
    ident: String,
    serialized: Option<String>,
    tag: LitStr,
}

/// Expands `#[derive(Validate)]`, turning any error into `compile_error!`.
pub fn expand_validate(input: &DeriveInput) -> TokenStream {
    try_expand(input).unwrap_or_else(syn::Error::into_compile_error)
}

fn try_expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let tagged = tagged_fields(input)?;

    let type_name = name.unraw().to_string();
    let schema_fields = tagged.iter().enumerate().map(|(index, field)| {
        let ident = &field.ident;
        let tag = &field.tag;
        let serialized = match &field.serialized {
            Some(serialized) => quote! { ::core::option::Option::Some(#serialized) },
            None => quote! { ::core::option::Option::None },
        };
        quote! {
            ::httpkit_validate::FieldSchema::new(#index, #ident, #serialized, #tag)
        }
    });

    let field_value_body = if tagged.is_empty() {
        quote! {
            let _ = index;
            ::core::option::Option::None
        }
    } else {
        let arms = tagged.iter().enumerate().map(|(index, field)| {
            let member = &field.member;
            quote! {
                #index => ::core::option::Option::Some(&self.#member as &dyn ::core::any::Any),
            }
        });
        quote! {
            match index {
                #(#arms)*
                _ => ::core::option::Option::None,
            }
        }
    };

    // `Validate: Any` needs every type parameter to be 'static.
    let mut generics = input.generics.clone();
    for param in &mut generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(syn::parse_quote!('static));
        }
    }
    let (impl_generics, _, where_clause) = generics.split_for_impl();
    let (_, ty_generics, _) = input.generics.split_for_impl();

    let registration = if input.generics.params.is_empty() {
        quote! {
            ::httpkit_validate::inventory::submit! {
                ::httpkit_validate::SchemaRegistration::of::<#name>()
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::httpkit_validate::Validate for #name #ty_generics #where_clause {
            fn schema() -> ::httpkit_validate::StructSchema {
                ::httpkit_validate::StructSchema::new(
                    #type_name,
                    ::std::vec![#(#schema_fields),*],
                )
            }

            fn field_value(&self, index: usize) -> ::core::option::Option<&dyn ::core::any::Any> {
                #field_value_body
            }
        }

        #registration
    })
}

/// Tagged named fields in declaration order, with their serialized names.
fn tagged_fields(input: &DeriveInput) -> syn::Result<Vec<TaggedField>> {
    let name = &input.ident;
    let fields: Vec<&syn::Field> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Validate can only be derived for structs with named fields",
                ));
            }
        },
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "Validate cannot be derived for enums",
            ));
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "Validate cannot be derived for unions",
            ));
        }
    };

    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "Validate cannot be derived for types with lifetime parameters",
        ));
    }

    let rename_all = container_rename_rule(&input.attrs)?;

    let mut tagged = Vec::new();
    for field in fields {
        let Some(tag) = validate_tag(&field.attrs)? else {
            continue;
        };
        let Some(member) = field.ident.clone() else {
            continue;
        };
        let ident = member.unraw().to_string();
        let serialized = serde_rename(&field.attrs)
            .or_else(|| rename_all.map(|rule| rule.apply(&ident)));
        tagged.push(TaggedField {
            member,
            ident,
            serialized,
            tag,
        });
    }
    Ok(tagged)
}

/// The field's `#[validate(...)]` tag, if any.
fn validate_tag(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut found: Option<LitStr> = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("validate")) {
        let tag = match &attr.meta {
            Meta::List(_) => attr
                .parse_args::<LitStr>()
                .map_err(|err| syn::Error::new(err.span(), TAG_LIST_HINT))?,
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(lit), ..
                }) => lit.clone(),
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "expected a string of comma-separated validator names",
                    ));
                }
            },
            Meta::Path(path) => {
                return Err(syn::Error::new_spanned(
                    path,
                    "expected #[validate(\"...\")] or #[validate = \"...\"]",
                ));
            }
        };
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate validate attribute"));
        }
        found = Some(tag);
    }
    Ok(found)
}

/// Items of every `#[serde(...)]` attribute. Unparseable ones are left for
/// serde's own derive to report.
fn serde_items(attrs: &[Attribute]) -> Vec<Meta> {
    attrs
        .iter()
        .filter(|a| a.path().is_ident("serde"))
        .filter_map(|a| {
            a.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
                .ok()
        })
        .flatten()
        .collect()
}

/// `key = "..."`, or the `deserialize` half of `key(deserialize = "...")`.
fn string_option(meta: &Meta, key: &str) -> Option<LitStr> {
    if !meta.path().is_ident(key) {
        return None;
    }
    match meta {
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(lit), ..
            }) => Some(lit.clone()),
            _ => None,
        },
        Meta::List(list) => list
            .parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
            .ok()?
            .iter()
            .find_map(|inner| string_option(inner, "deserialize")),
        Meta::Path(_) => None,
    }
}

fn serde_rename(attrs: &[Attribute]) -> Option<String> {
    serde_items(attrs)
        .iter()
        .find_map(|meta| string_option(meta, "rename"))
        .map(|lit| lit.value())
}

fn container_rename_rule(attrs: &[Attribute]) -> syn::Result<Option<RenameRule>> {
    serde_items(attrs)
        .iter()
        .find_map(|meta| string_option(meta, "rename_all"))
        .map(|lit| RenameRule::parse(&lit))
        .transpose()
}
