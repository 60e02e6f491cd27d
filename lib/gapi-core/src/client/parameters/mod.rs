//! Request parameter types for building API calls.
//!
//! - [`ParamValue`] - Values accepted as path or query parameters
//! - [`CallPath`] - Path template and its parameters (e.g., `files/{fileId}`)
//! - [`CallQuery`] - Query string parameters
//! - [`CallParams`] - Typed parameter bags, usually derived
//! - [`CallBody`] - JSON request body

mod param;
pub use self::param::ParamValue;

mod path;
pub use self::path::CallPath;
pub(in crate::client) use self::path::{PathResolved, is_placeholder};

mod query;
pub use self::query::CallQuery;

mod params;
pub use self::params::{CallParams, NoParams, StandardParams};

mod body;
pub use self::body::{CallBody, NoBody};
