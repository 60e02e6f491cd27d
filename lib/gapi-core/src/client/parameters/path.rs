use std::collections::BTreeSet;
use std::sync::LazyLock;

use indexmap::IndexMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use tracing::warn;

use super::ParamValue;
use crate::client::ApiClientError;

/// Regular expression for matching path parameters in the format `{name}` or `{+name}`.
static RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?<reserved>\+)?(?<name>\w+)}").expect("a valid regex"));

/// Everything but the RFC 3986 unreserved characters.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Reserved expansion keeps the path delimiters, Discovery uses it for resource names
/// like `projects/my-project/topics/my-topic`.
const RESERVED: &AsciiSet = &SEGMENT
    .remove(b'/')
    .remove(b':')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

/// Returns `true` if the token is a whole `{name}` or `{+name}` placeholder.
pub(in crate::client) fn is_placeholder(token: &str) -> bool {
    RE.find(token).is_some_and(|found| found.as_str() == token)
}

/// `.` and `..` are removed from URLs, the request would target another resource.
fn is_dot_segment(value: &str, reserved: bool) -> bool {
    let is_dots = |segment: &str| matches!(segment, "." | "..");
    if reserved {
        value.split('/').any(is_dots)
    } else {
        is_dots(value)
    }
}

fn encode_path_param_value(value: &str, reserved: bool) -> String {
    let set = if reserved { RESERVED } else { SEGMENT };
    utf8_percent_encode(value, set).to_string()
}

/// A path template with its bound parameters.
///
/// Templates use the Discovery syntax: `{name}` is replaced by the percent-encoded
/// value, `{+name}` keeps reserved characters such as `/`. A parameter can appear
/// several times in a template. Repeated values are joined with `,`.
///
/// # Examples
///
/// ```rust
/// use gapi_core::CallPath;
///
/// let path = CallPath::from("files/{fileId}/permissions/{permissionId}")
///     .add_param("fileId", "1a2b3c")
///     .add_param("permissionId", 42);
///
/// let path = CallPath::from("v1/{+name}:publish")
///     .add_param("name", "projects/my-project/topics/events");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_more::Display)]
#[display("{path}")]
pub struct CallPath {
    /// The path template with parameter placeholders
    pub(in crate::client) path: String,
    /// Rendered parameter values indexed by parameter name
    args: IndexMap<String, Vec<String>>,
}

impl CallPath {
    /// Binds a path parameter.
    ///
    /// An absent value (`None`, empty list) is not bound, resolving a template that
    /// needs it fails with [`ApiClientError::PathUnresolved`]. Binding the same name
    /// twice keeps the last value.
    #[must_use]
    pub fn add_param(mut self, name: impl Into<String>, value: impl ParamValue) -> Self {
        let name = name.into();
        let values = value.to_values();
        if values.is_empty() {
            self.args.shift_remove(&name);
        } else {
            self.args.insert(name, values);
        }
        self
    }

    /// Returns the path template.
    pub fn template(&self) -> &str {
        &self.path
    }

    /// Returns the names of the placeholders in the template, in order of first use.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        RE.captures_iter(&self.path)
            .filter_map(|caps| caps.name("name"))
            .map(|m| m.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Returns `true` if a value is bound for the parameter.
    pub fn contains(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }
}

impl From<&str> for CallPath {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<String> for CallPath {
    fn from(value: String) -> Self {
        Self {
            path: value,
            args: IndexMap::default(),
        }
    }
}

impl From<&String> for CallPath {
    fn from(value: &String) -> Self {
        Self::from(value.clone())
    }
}

#[derive(Debug)]
pub(in crate::client) struct PathResolved {
    pub(in crate::client) path: String,
}

// Build concrete
impl TryFrom<&CallPath> for PathResolved {
    type Error = ApiClientError;

    fn try_from(value: &CallPath) -> Result<Self, Self::Error> {
        let CallPath { path, args } = value;

        let mut resolved = String::with_capacity(path.len());
        let mut missings = Vec::new();
        let mut used = BTreeSet::new();
        let mut last = 0;

        for caps in RE.captures_iter(path) {
            let (Some(placeholder), Some(name)) = (caps.get(0), caps.name("name")) else {
                continue;
            };
            let name = name.as_str();
            let reserved = caps.name("reserved").is_some();

            resolved.push_str(&path[last..placeholder.start()]);
            last = placeholder.end();

            let Some(values) = args.get(name) else {
                if !missings.iter().any(|missing| missing == name) {
                    missings.push(name.to_string());
                }
                resolved.push_str(placeholder.as_str());
                continue;
            };
            used.insert(name);

            if values.iter().any(|value| is_dot_segment(value, reserved)) {
                return Err(ApiClientError::InvalidPath {
                    path: path.clone(),
                    reason: format!("argument '{name}' is a dot segment"),
                });
            }

            let encoded = values
                .iter()
                .map(|value| encode_path_param_value(value, reserved))
                .collect::<Vec<_>>()
                .join(",");
            resolved.push_str(&encoded);
        }
        resolved.push_str(&path[last..]);

        for name in args.keys() {
            if !used.contains(name.as_str()) {
                warn!(?name, %path, "argument name not found in path template");
            }
        }

        if missings.is_empty() {
            Ok(Self { path: resolved })
        } else {
            Err(ApiClientError::PathUnresolved {
                path: path.clone(),
                missings,
            })
        }
    }
}
