use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Expr, Field, Fields, Ident, LitInt, LitStr, Type};

pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "Entity derive: generic structs are not supported",
        ));
    }

    let fields = named_fields(input)?;
    let attrs = StructAttrs::parse(input)?;

    let collection = attrs
        .collection
        .unwrap_or_else(|| format!("{}s", to_snake_case(&name.to_string())));
    let noun = attrs.noun.unwrap_or_else(|| name.to_string());
    let id_prefix = match attrs.id_prefix {
        Some(prefix) => quote! { ::core::option::Option::Some(#prefix) },
        None => quote! { ::core::option::Option::None },
    };
    let label = label_field(&attrs.label, fields, name)?;

    let mut rules = Vec::new();
    let mut search = Vec::new();
    let mut preserved = Vec::new();
    let mut tracked = Vec::new();
    for field in fields {
        let parsed = FieldAttrs::parse(field)?;
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new(field.span(), "Entity derive: unnamed field"));
        };
        if parsed.preserve {
            preserved.push(quote! {
                self.#ident = ::core::clone::Clone::clone(&previous.#ident);
            });
        }
        if parsed.lifecycle {
            tracked.push(quote! {
                ::attune_records::Tracked::follows(&self.#ident, &previous.#ident)?;
            });
        }
        if parsed.search {
            if kind_of(&field.ty) != Kind::Text {
                return Err(syn::Error::new(
                    field.span(),
                    "Entity derive: `search` applies to String fields only",
                ));
            }
            search.push(quote! { self.#ident.as_str() });
        }
        rules.extend(field_rules(name, ident, &field.ty, &parsed)?);
    }

    let search_fn = if search.is_empty() {
        quote! {}
    } else {
        quote! {
            fn search_text(&self) -> ::std::vec::Vec<&str> {
                ::std::vec![#(#search),*]
            }
        }
    };

    let keep_fn = if preserved.is_empty() {
        quote! {}
    } else {
        quote! {
            fn keep_on_update(&mut self, previous: &Self) {
                #(#preserved)*
            }
        }
    };

    let check_fn = if tracked.is_empty() {
        quote! {}
    } else {
        quote! {
            fn check_change(
                &self,
                previous: &Self,
            ) -> ::core::result::Result<(), ::attune_records::TransitionError> {
                #(#tracked)*
                ::core::result::Result::Ok(())
            }
        }
    };

    Ok(quote! {
        impl ::attune_records::Entity for #name {
            const COLLECTION: &'static str = #collection;
            const NOUN: &'static str = #noun;
            const ID_PREFIX: ::core::option::Option<&'static str> = #id_prefix;

            fn label(&self) -> &str {
                self.#label.as_str()
            }

            fn schema() -> ::attune_records::Schema<Self> {
                ::attune_records::Schema::new(#noun)
                    #(.rule(#rules))*
            }

            #search_fn

            #keep_fn

            #check_fn
        }
    })
}

fn named_fields(input: &DeriveInput) -> syn::Result<&syn::punctuated::Punctuated<Field, syn::Token![,]>> {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            return Ok(&fields.named);
        }
    }
    Err(syn::Error::new(
        input.ident.span(),
        "Entity derive: only structs with named fields are supported",
    ))
}

fn label_field(
    label: &Option<Ident>,
    fields: &syn::punctuated::Punctuated<Field, syn::Token![,]>,
    name: &Ident,
) -> syn::Result<Ident> {
    let wanted = label.clone().unwrap_or_else(|| Ident::new("name", name.span()));
    for field in fields {
        if field.ident.as_ref() == Some(&wanted) {
            if kind_of(&field.ty) != Kind::Text {
                return Err(syn::Error::new(
                    field.span(),
                    "Entity derive: the label field must be a String",
                ));
            }
            return Ok(wanted);
        }
    }
    Err(syn::Error::new(
        name.span(),
        format!(
            "Entity derive: no label field `{}`; add #[entity(label = field)]",
            wanted
        ),
    ))
}

#[derive(Default)]
struct StructAttrs {
    collection: Option<String>,
    noun: Option<String>,
    label: Option<Ident>,
    id_prefix: Option<String>,
}

impl StructAttrs {
    fn parse(input: &DeriveInput) -> syn::Result<Self> {
        let mut attrs = StructAttrs::default();
        for attr in &input.attrs {
            if !attr.path().is_ident("entity") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("collection") {
                    let value: LitStr = meta.value()?.parse()?;
                    attrs.collection = Some(value.value());
                } else if meta.path.is_ident("noun") {
                    let value: LitStr = meta.value()?.parse()?;
                    attrs.noun = Some(value.value());
                } else if meta.path.is_ident("label") {
                    attrs.label = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("id_prefix") {
                    let value: LitStr = meta.value()?.parse()?;
                    attrs.id_prefix = Some(value.value());
                } else {
                    return Err(meta.error("unknown entity attribute"));
                }
                Ok(())
            })?;
        }
        Ok(attrs)
    }
}

#[derive(Default)]
struct FieldAttrs {
    required: bool,
    optional: bool,
    email: bool,
    search: bool,
    preserve: bool,
    lifecycle: bool,
    min_len: Option<LitInt>,
    max_len: Option<LitInt>,
    min: Option<Expr>,
    max: Option<Expr>,
    min_items: Option<LitInt>,
}

impl FieldAttrs {
    fn parse(field: &Field) -> syn::Result<Self> {
        let mut attrs = FieldAttrs::default();
        for attr in &field.attrs {
            if !attr.path().is_ident("entity") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("required") {
                    attrs.required = true;
                } else if meta.path.is_ident("optional") {
                    attrs.optional = true;
                } else if meta.path.is_ident("email") {
                    attrs.email = true;
                } else if meta.path.is_ident("search") {
                    attrs.search = true;
                } else if meta.path.is_ident("preserve") {
                    attrs.preserve = true;
                } else if meta.path.is_ident("lifecycle") {
                    attrs.lifecycle = true;
                } else if meta.path.is_ident("min_len") {
                    attrs.min_len = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("max_len") {
                    attrs.max_len = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("min") {
                    attrs.min = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("max") {
                    attrs.max = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("min_items") {
                    attrs.min_items = Some(meta.value()?.parse()?);
                } else {
                    return Err(meta.error("unknown entity field attribute"));
                }
                Ok(())
            })?;
        }
        Ok(attrs)
    }

    fn has_text_rules(&self) -> bool {
        self.required || self.email || self.min_len.is_some() || self.max_len.is_some()
    }

    fn has_number_rules(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    Number,
    Count,
    Other,
}

fn kind_of(ty: &Type) -> Kind {
    let Type::Path(path) = ty else {
        return Kind::Other;
    };
    let Some(last) = path.path.segments.last() else {
        return Kind::Other;
    };
    match last.ident.to_string().as_str() {
        "String" => Kind::Text,
        "Vec" => Kind::Count,
        "u8" | "u16" | "u32" | "u64" | "usize" | "i8" | "i16" | "i32" | "i64" | "isize"
        | "f32" | "f64" => Kind::Number,
        _ => Kind::Other,
    }
}

fn field_rules(
    owner: &Ident,
    ident: &Ident,
    ty: &Type,
    attrs: &FieldAttrs,
) -> syn::Result<Vec<TokenStream2>> {
    let field_name = ident.to_string();
    let kind = kind_of(ty);
    let mut rules = Vec::new();

    let mismatch = |what: &str| {
        syn::Error::new(
            ident.span(),
            format!("Entity derive: `{}` does not apply to field `{}`", what, field_name),
        )
    };

    if attrs.has_text_rules() && kind != Kind::Text {
        return Err(mismatch("text constraints"));
    }
    if attrs.has_number_rules() && kind != Kind::Number {
        return Err(mismatch("min/max"));
    }
    if attrs.min_items.is_some() && kind != Kind::Count {
        return Err(mismatch("min_items"));
    }

    let optional = if attrs.optional {
        quote! { .optional() }
    } else {
        quote! {}
    };

    match kind {
        Kind::Text => {
            let get = quote! {
                {
                    fn get(record: &#owner) -> &str {
                        record.#ident.as_str()
                    }
                    get
                }
            };
            let mut constraints = Vec::new();
            if attrs.required {
                constraints.push(quote! { ::attune_records::Constraint::Required });
            }
            if let Some(n) = &attrs.min_len {
                constraints.push(quote! { ::attune_records::Constraint::MinLen(#n) });
            }
            if let Some(n) = &attrs.max_len {
                constraints.push(quote! { ::attune_records::Constraint::MaxLen(#n) });
            }
            if attrs.email {
                constraints.push(quote! { ::attune_records::Constraint::Email });
            }
            for constraint in constraints {
                rules.push(quote! {
                    ::attune_records::FieldRule::text(#field_name, #get, #constraint) #optional
                });
            }
        }
        Kind::Number => {
            let get = quote! {
                {
                    fn get(record: &#owner) -> f64 {
                        record.#ident as f64
                    }
                    get
                }
            };
            let constraint = match (&attrs.min, &attrs.max) {
                (Some(min), Some(max)) => Some(quote! {
                    ::attune_records::Constraint::Range((#min) as f64, (#max) as f64)
                }),
                (Some(min), None) => Some(quote! { ::attune_records::Constraint::Min((#min) as f64) }),
                (None, Some(max)) => Some(quote! { ::attune_records::Constraint::Max((#max) as f64) }),
                (None, None) => None,
            };
            if let Some(constraint) = constraint {
                rules.push(quote! {
                    ::attune_records::FieldRule::number(#field_name, #get, #constraint)
                });
            }
        }
        Kind::Count => {
            if let Some(n) = &attrs.min_items {
                let get = quote! {
                    {
                        fn get(record: &#owner) -> usize {
                            record.#ident.len()
                        }
                        get
                    }
                };
                rules.push(quote! {
                    ::attune_records::FieldRule::count(
                        #field_name,
                        #get,
                        ::attune_records::Constraint::MinItems(#n),
                    )
                });
            }
        }
        Kind::Other => {}
    }

    Ok(rules)
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
