use indexmap::IndexMap;

use super::ParamValue;

/// Query string parameters of an API call.
///
/// Parameters keep their insertion order. An absent value (`None`, empty list) is
/// never sent, a repeated value produces one `name=value` pair per element.
///
/// # Examples
///
/// ```rust
/// use gapi_core::CallQuery;
///
/// let query = CallQuery::new()
///     .add_param("pageSize", 10)
///     .add_param("pageToken", None::<String>)
///     .add_param("spaces", vec!["drive", "appDataFolder"]);
///
/// assert_eq!(query.to_query_string(), "pageSize=10&spaces=drive&spaces=appDataFolder");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallQuery {
    params: IndexMap<String, Vec<String>>,
}

impl CallQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a query parameter, replacing any previous value for the same name.
    ///
    /// An absent value removes the parameter.
    #[must_use]
    pub fn add_param(mut self, name: impl Into<String>, value: impl ParamValue) -> Self {
        let name = name.into();
        let values = value.to_values();
        if values.is_empty() {
            self.params.shift_remove(&name);
        } else {
            self.params.insert(name, values);
        }
        self
    }

    /// Merges another query into this one, values of `other` win.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.params.extend(other.params);
        self
    }

    /// Adds the parameters of `other` that are not already bound.
    #[must_use]
    pub fn merge_missing(mut self, other: &Self) -> Self {
        for (name, values) in &other.params {
            if !self.params.contains_key(name) {
                self.params.insert(name.clone(), values.clone());
            }
        }
        self
    }

    /// Returns `true` if no parameter is bound.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the values bound for a parameter.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.params.get(name).map(Vec::as_slice)
    }

    /// Flattens the parameters into `(name, value)` pairs.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .flat_map(|(name, values)| {
                values
                    .iter()
                    .map(move |value| (name.clone(), value.clone()))
            })
            .collect()
    }

    /// Renders the form-urlencoded query string, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in self.pairs() {
            serializer.append_pair(&name, &value);
        }
        serializer.finish()
    }
}
