//! Parsing of the `#[params(...)]` and `#[param(...)]` attributes.

use syn::spanned::Spanned;
use syn::{Attribute, Error, Field, Ident, LitStr, Result};

/// Parsed struct-level configuration from `#[params(...)]` attributes.
#[derive(Debug, Default)]
pub struct ParamsConfig {
    pub rename_all: Option<RenameRule>,
}

impl ParamsConfig {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        let mut config = Self::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("params")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    let value: LitStr = meta.value()?.parse()?;
                    config.rename_all = Some(RenameRule::from_lit(&value)?);
                    Ok(())
                } else {
                    Err(meta.error(format!(
                        "unknown params attribute: `{}`",
                        path_name(&meta.path)
                    )))
                }
            })?;
        }

        Ok(config)
    }
}

/// Naming convention applied to field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    /// `supports_all_drives` becomes `supportsAllDrives`
    CamelCase,
    /// The field name is kept
    SnakeCase,
}

impl RenameRule {
    fn from_lit(lit: &LitStr) -> Result<Self> {
        match lit.value().as_str() {
            "camelCase" => Ok(Self::CamelCase),
            "snake_case" => Ok(Self::SnakeCase),
            other => Err(Error::new(
                lit.span(),
                format!("unknown rename rule: `{other}`. Expected one of: camelCase, snake_case"),
            )),
        }
    }

    pub fn apply(self, name: &str) -> String {
        match self {
            Self::CamelCase => to_camel_case(name),
            Self::SnakeCase => name.to_string(),
        }
    }
}

/// Where a field is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
    Skip,
}

impl ParamLocation {
    fn keyword(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Skip => "skip",
        }
    }
}

/// Parsed field-level configuration from `#[param(...)]` attributes.
#[derive(Debug)]
pub struct ParamField {
    pub ident: Ident,
    pub location: ParamLocation,
    pub rename: Option<String>,
}

impl ParamField {
    pub fn from_field(field: &Field) -> Result<Self> {
        let Some(ident) = field.ident.clone() else {
            return Err(Error::new(field.span(), "expected a named field"));
        };

        let mut location: Option<ParamLocation> = None;
        let mut rename = None;

        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("param")) {
            attr.parse_nested_meta(|meta| {
                let found = if meta.path.is_ident("path") {
                    ParamLocation::Path
                } else if meta.path.is_ident("query") {
                    ParamLocation::Query
                } else if meta.path.is_ident("skip") {
                    ParamLocation::Skip
                } else if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    rename = Some(value.value());
                    return Ok(());
                } else {
                    return Err(meta.error(format!(
                        "unknown param attribute: `{}`. Expected one of: path, query, skip, rename",
                        path_name(&meta.path)
                    )));
                };

                if let Some(previous) = location {
                    return Err(meta.error(format!(
                        "`{}` conflicts with `{}`, a field is bound once",
                        found.keyword(),
                        previous.keyword()
                    )));
                }
                location = Some(found);
                Ok(())
            })?;
        }

        let Some(location) = location else {
            return Err(Error::new(
                ident.span(),
                format!(
                    "missing `#[param(path)]`, `#[param(query)]` or `#[param(skip)]` on field `{ident}`"
                ),
            ));
        };

        Ok(Self {
            ident,
            location,
            rename,
        })
    }

    /// The parameter name, after renaming.
    pub fn name(&self, rule: Option<RenameRule>) -> String {
        if let Some(rename) = &self.rename {
            return rename.clone();
        }
        let field_name = self.ident.to_string();
        let field_name = field_name.strip_prefix("r#").unwrap_or(&field_name);
        match rule {
            Some(rule) => rule.apply(field_name),
            None => field_name.to_string(),
        }
    }
}

fn path_name(path: &syn::Path) -> String {
    path.get_ident().map(ToString::to_string).unwrap_or_default()
}

/// Converts a `snake_case` identifier to `lowerCamelCase`.
pub fn to_camel_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut upper_next = false;

    for ch in name.chars() {
        if ch == '_' {
            upper_next = !result.is_empty();
        } else if upper_next {
            result.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            result.push(ch);
        }
    }

    result
}
