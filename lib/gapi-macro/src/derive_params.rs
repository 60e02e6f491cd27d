//! Implementation of the `#[derive(CallParams)]` macro.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Result, parse2};

use crate::parse::{ParamField, ParamLocation, ParamsConfig};

/// Main implementation for the `#[derive(CallParams)]` macro.
pub fn derive_call_params_impl(input: TokenStream) -> TokenStream {
    match derive_call_params_inner(input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn derive_call_params_inner(input: TokenStream) -> Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let config = ParamsConfig::from_attrs(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unnamed(_) => {
                return Err(Error::new_spanned(
                    &input.ident,
                    "CallParams cannot be derived on tuple structs, parameters need names",
                ));
            }
            Fields::Unit => {
                return Err(Error::new_spanned(
                    &input.ident,
                    "CallParams cannot be derived on unit structs, use `gapi_core::NoParams`",
                ));
            }
        },
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                &input.ident,
                "CallParams cannot be derived on enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                &input.ident,
                "CallParams cannot be derived on unions",
            ));
        }
    };

    // report every invalid field at once
    let mut params = Vec::with_capacity(fields.len());
    let mut errors: Option<Error> = None;
    for field in fields {
        match ParamField::from_field(field) {
            Ok(param) => params.push(param),
            Err(err) => match &mut errors {
                Some(errors) => errors.combine(err),
                None => errors = Some(err),
            },
        }
    }
    if let Some(errors) = errors {
        return Err(errors);
    }

    let bindings = |location: ParamLocation, target: &TokenStream| {
        params
            .iter()
            .filter(|param| param.location == location)
            .map(|param| {
                let ident = &param.ident;
                let name = param.name(config.rename_all);
                quote! { let #target = #target.add_param(#name, &self.#ident); }
            })
            .collect::<Vec<_>>()
    };
    let path = quote! { path };
    let query = quote! { query };
    let path_bindings = bindings(ParamLocation::Path, &path);
    let query_bindings = bindings(ParamLocation::Query, &query);

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        #[automatically_derived]
        impl #impl_generics ::gapi_core::CallParams for #name #ty_generics #where_clause {
            fn add_path_params(&self, path: ::gapi_core::CallPath) -> ::gapi_core::CallPath {
                #(#path_bindings)*
                path
            }

            fn add_query_params(&self, query: ::gapi_core::CallQuery) -> ::gapi_core::CallQuery {
                #(#query_bindings)*
                query
            }
        }
    };

    Ok(expanded)
}
