//! Procedural macros for gapi generated clients.
//!
//! - [`CallParams`] - Derives `gapi_core::CallParams` for a parameter bag
//!
//! ## Examples
//!
//! ```ignore
//! use gapi_core::CallParams;
//!
//! #[derive(CallParams)]
//! #[params(rename_all = "camelCase")]
//! pub struct GetFileParams {
//!     #[param(path)]
//!     pub file_id: String,
//!     #[param(query)]
//!     pub supports_all_drives: Option<bool>,
//!     #[param(query, rename = "fields")]
//!     pub selector: Option<String>,
//! }
//! ```

use proc_macro::TokenStream;

mod derive_params;
mod parse;

/// Derive macro for parameter bags.
///
/// Generates the `gapi_core::CallParams` implementation binding path fields to
/// the path template and query fields to the query string.
///
/// ## Attributes
///
/// On the struct:
/// - `#[params(rename_all = "camelCase")]` - Renames every field (optional)
///
/// On each field, exactly one of:
/// - `#[param(path)]` - The field fills the `{name}` placeholder of the template
/// - `#[param(query)]` - The field is a query parameter
/// - `#[param(skip)]` - The field is not bound
///
/// and optionally `rename = "..."` to set the parameter name.
///
/// Every field type must implement `gapi_core::ParamValue`. A field without a
/// `#[param]` attribute, a tuple struct or an enum is a compile error.
#[proc_macro_derive(CallParams, attributes(param, params))]
pub fn derive_call_params(input: TokenStream) -> TokenStream {
    derive_params::derive_call_params_impl(input.into()).into()
}
