//! Response handling.
//!
//! This module provides:
//!
//! - [`CallResult`] - The raw response of a call, decoded on demand
//! - [`NoContent`] - The result type of calls without a typed payload
//!
//! Decoding recognizes the Google error envelope and the `data` payload envelope.

pub(in crate::client) mod envelope;

mod result;
pub use self::result::{CallResult, NoContent};
