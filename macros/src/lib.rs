use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Type};

/// Defines a configuration struct that can be read out of an `envstore::Store`
///
/// Each field carries `#[field(env = "KEY", ...)]` with exactly one mode:
/// `required`, `default = <expr>`, or `optional` (field type must be `Option<T>`).
/// An optional `doc = "..."` becomes the field's doc comment.
#[proc_macro]
pub fn define_config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_config(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_config(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let vis = &input.vis;
    let struct_attrs = &input.attrs;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "define_config! only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "define_config! only supports structs",
            ));
        }
    };

    let mut field_defs = Vec::new();
    let mut reads = Vec::new();
    let mut inits = Vec::new();

    for field in fields {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "field must be named"))?;
        let field_vis = &field.vis;
        let field_type = &field.ty;

        let config = parse_field_config(field)?;
        let key = &config.key;

        // Everything except our own #[field(...)] is passed through
        let kept_attrs: Vec<&Attribute> = field
            .attrs
            .iter()
            .filter(|attr| !attr.path().is_ident("field"))
            .collect();
        let cfg_attrs: Vec<&Attribute> = field
            .attrs
            .iter()
            .filter(|attr| attr.path().is_ident("cfg"))
            .collect();
        let doc_attr = config.description.as_ref().map(|doc| quote! { #[doc = #doc] });

        field_defs.push(quote! {
            #doc_attr
            #(#kept_attrs)*
            #field_vis #field_name: #field_type
        });

        match config.mode {
            FieldMode::Required => {
                reads.push(quote! {
                    #(#cfg_attrs)*
                    let #field_name = __reader.required::<#field_type>(#key);
                });
                inits.push(quote! {
                    #(#cfg_attrs)*
                    #field_name: #field_name.unwrap()
                });
            }
            FieldMode::Default(ref default_expr) => {
                reads.push(quote! {
                    #(#cfg_attrs)*
                    let #field_name = __reader.or_default::<#field_type>(#key, #default_expr);
                });
                inits.push(quote! {
                    #(#cfg_attrs)*
                    #field_name: #field_name.unwrap()
                });
            }
            FieldMode::Optional => {
                let inner = extract_option_type(field_type).ok_or_else(|| {
                    syn::Error::new_spanned(field_type, "optional fields must have type Option<T>")
                })?;
                reads.push(quote! {
                    #(#cfg_attrs)*
                    let #field_name = __reader.optional::<#inner>(#key);
                });
                inits.push(quote! {
                    #(#cfg_attrs)*
                    #field_name
                });
            }
        }
    }

    let struct_def = quote! {
        #(#struct_attrs)*
        #vis struct #struct_name {
            #(#field_defs),*
        }
    };

    // `finish` returns early on any failed read, so non-optional bindings are Some
    let from_store_impl = quote! {
        impl ::envstore::FromStore for #struct_name {
            fn from_store(
                store: &::envstore::Store,
            ) -> ::std::result::Result<Self, ::std::vec::Vec<::envstore::DotenvError>> {
                let mut __reader = ::envstore::FieldReader::new(store);

                #(#reads)*

                __reader.finish()?;

                ::std::result::Result::Ok(Self {
                    #(#inits),*
                })
            }
        }
    };

    Ok(quote! {
        #struct_def
        #from_store_impl
    })
}

#[derive(Debug)]
struct FieldConfig {
    key: String,
    description: Option<String>,
    mode: FieldMode,
}

#[derive(Debug)]
enum FieldMode {
    Required,
    Default(syn::Expr),
    Optional,
}

/// Parse `#[field(env = "X", doc = "Y", default = val)]`
fn parse_field_config(field: &syn::Field) -> syn::Result<FieldConfig> {
    let field_attr = field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("field"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                field,
                "field must have a #[field(env = \"KEY\", ...)] attribute with required, optional or default = value",
            )
        })?;

    let mut key = None;
    let mut description = None;
    let mut modes = Vec::new();

    field_attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("env") {
            let value: syn::LitStr = meta.value()?.parse()?;
            key = Some(value.value());
        } else if meta.path.is_ident("doc") {
            let value: syn::LitStr = meta.value()?.parse()?;
            description = Some(value.value().trim().to_string());
        } else if meta.path.is_ident("default") {
            let expr: syn::Expr = meta.value()?.parse()?;
            modes.push(FieldMode::Default(expr));
        } else if meta.path.is_ident("required") {
            modes.push(FieldMode::Required);
        } else if meta.path.is_ident("optional") {
            modes.push(FieldMode::Optional);
        } else {
            return Err(meta.error("expected one of: env, doc, required, optional, default"));
        }
        Ok(())
    })?;

    let key = key.ok_or_else(|| {
        syn::Error::new_spanned(field_attr, "field must have env = \"VAR_NAME\"")
    })?;

    if modes.len() != 1 {
        return Err(syn::Error::new_spanned(
            field_attr,
            "field must have exactly one of: required, optional, or default = value",
        ));
    }
    let mode = modes.remove(0);

    Ok(FieldConfig {
        key,
        description,
        mode,
    })
}

/// Extract `T` from `Option<T>`
fn extract_option_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(syn::GenericArgument::Type(inner)) => Some(inner),
        _ => None,
    }
}
