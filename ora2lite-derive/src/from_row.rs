//! FromRow derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Field, Fields, Ident, Result};

/// Per-field settings read from `#[ora2lite(...)]`
struct FieldConfig {
    /// The field identifier
    ident: Ident,
    /// Column label to read; the field name unless renamed, always lower case
    /// because row labels are folded to lower case
    column_name: String,
    /// Fill the field with `Default::default()` instead of reading it
    skip: bool,
    /// The field type, which must implement `FromValue` unless skipped
    ty: syn::Type,
}

fn parse_field_config(field: &Field) -> Result<FieldConfig> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new(field.span(), "tuple structs are not supported"))?;

    let mut column_name = ident.to_string();
    let mut skip = false;

    for attr in &field.attrs {
        if !attr.path().is_ident("ora2lite") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                // Dictionary labels come back upper case; rows store them lower case
                column_name = lit.value().to_lowercase();
            } else if meta.path.is_ident("skip") {
                skip = true;
            } else {
                return Err(meta.error(format!(
                    "unknown ora2lite attribute `{}`",
                    meta.path
                        .get_ident()
                        .map(|i| i.to_string())
                        .unwrap_or_default()
                )));
            }
            Ok(())
        })?;
    }

    Ok(FieldConfig {
        ident,
        column_name,
        skip,
        ty: field.ty.clone(),
    })
}

pub fn derive_from_row_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Err(Error::new(input.span(), "only named fields are supported")),
        },
        _ => return Err(Error::new(input.span(), "only structs are supported")),
    };

    let field_configs: Vec<FieldConfig> = fields
        .iter()
        .map(parse_field_config)
        .collect::<Result<Vec<_>>>()?;

    // One initializer per field, in declaration order
    let field_extractions: Vec<TokenStream> = field_configs
        .iter()
        .map(|config| {
            let field_ident = &config.ident;
            let column_name = &config.column_name;
            let ty = &config.ty;

            if config.skip {
                // Not part of the query; filled in later by the caller
                quote! {
                    #field_ident: <#ty as std::default::Default>::default()
                }
            } else {
                // Typed lookup by label, naming the column on conversion errors
                quote! {
                    #field_ident: ora2lite_db::RowExt::get::<#ty>(row, #column_name)?
                }
            }
        })
        .collect();

    let expanded = quote! {
        impl #impl_generics ora2lite_db::FromRow for #name #ty_generics #where_clause {
            fn from_row<R: ora2lite_db::Row>(row: &R) -> ora2lite_db::Result<Self> {
                Ok(Self {
                    #(#field_extractions),*
                })
            }
        }
    };

    Ok(expanded)
}
