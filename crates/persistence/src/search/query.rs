//! Query string compilation.
//!
//! A [`SearchQuery`] is the raw request: a resource type and the URL query
//! string exactly as received. Compiling it against a
//! [`SearchParameterRegistry`] validates every parameter and yields a
//! [`CompiledQuery`], which backends evaluate.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::errors::{SearchError, SearchResult};
use super::params::{SearchModifier, SearchParamType, SearchValue};
use super::registry::SearchParameterRegistry;

/// Result-size settings applied while compiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Limit used when the query has no `_count`.
    pub default_count: usize,
    /// Upper bound for `_count`.
    pub max_page_size: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            default_count: 100,
            max_page_size: 1000,
        }
    }
}

/// An uncompiled search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The resource type being searched.
    pub resource_type: String,
    /// The URL query string, without the leading `?`.
    pub raw_query: String,
}

impl SearchQuery {
    /// Creates a search query.
    pub fn new(resource_type: impl Into<String>, raw_query: impl Into<String>) -> Self {
        let raw_query = raw_query.into();
        Self {
            resource_type: resource_type.into(),
            raw_query: raw_query.strip_prefix('?').unwrap_or(&raw_query).to_string(),
        }
    }

    /// Returns true if the query string holds no parameters.
    pub fn is_empty(&self) -> bool {
        !has_parameters(&self.raw_query)
    }

    /// Compiles the query against a registry.
    pub fn compile(
        &self,
        registry: &SearchParameterRegistry,
        limits: SearchLimits,
    ) -> SearchResult<CompiledQuery> {
        if !registry.supports(&self.resource_type) {
            return Err(SearchError::UnsupportedResourceType {
                resource_type: self.resource_type.clone(),
            });
        }

        let mut clauses = Vec::new();
        let mut limit = limits.default_count;

        for (key, value) in form_urlencoded::parse(self.raw_query.as_bytes()) {
            if key.is_empty() {
                continue;
            }

            let (name, modifier) = match key.split_once(':') {
                Some((name, modifier)) => (name, Some(modifier)),
                None => (key.as_ref(), None),
            };

            if name == "_count" {
                limit = parse_count(&value)?.min(limits.max_page_size);
                continue;
            }

            let definition = registry.get(&self.resource_type, name).ok_or_else(|| {
                SearchError::UnknownParameter {
                    resource_type: self.resource_type.clone(),
                    parameter: name.to_string(),
                }
            })?;

            let modifier = match modifier {
                Some(raw) => {
                    let parsed = SearchModifier::parse(raw)
                        .filter(|m| m.is_valid_for(definition.param_type))
                        .ok_or_else(|| SearchError::UnsupportedModifier {
                            parameter: name.to_string(),
                            modifier: raw.to_string(),
                        })?;
                    Some(parsed)
                }
                None => None,
            };

            let values = parse_values(name, definition.param_type, modifier, &value)?;

            clauses.push(SearchClause {
                code: name.to_string(),
                param_type: definition.param_type,
                paths: definition.paths.clone(),
                modifier,
                values,
            });
        }

        Ok(CompiledQuery {
            resource_type: self.resource_type.clone(),
            clauses,
            limit,
        })
    }
}

/// Returns true if a raw query string carries at least one named parameter.
pub fn has_parameters(raw_query: &str) -> bool {
    form_urlencoded::parse(raw_query.as_bytes()).any(|(key, _)| !key.is_empty())
}

fn parse_count(value: &str) -> SearchResult<usize> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(SearchError::InvalidValue {
            parameter: "_count".to_string(),
            value: value.to_string(),
            message: "must be a positive integer".to_string(),
        }),
    }
}

fn parse_values(
    name: &str,
    param_type: SearchParamType,
    modifier: Option<SearchModifier>,
    raw: &str,
) -> SearchResult<Vec<SearchValue>> {
    let invalid = |message: &str| SearchError::InvalidValue {
        parameter: name.to_string(),
        value: raw.to_string(),
        message: message.to_string(),
    };

    if modifier == Some(SearchModifier::Missing) {
        return match raw {
            "true" | "false" => Ok(vec![SearchValue::eq(raw)]),
            _ => Err(invalid("expected true or false")),
        };
    }

    let mut values = Vec::new();
    for part in raw.split(',') {
        if part.is_empty() {
            return Err(invalid("empty value"));
        }
        let value = match param_type {
            SearchParamType::Date => {
                let value = SearchValue::with_prefix(part);
                if !is_valid_date(&value.value) {
                    return Err(invalid("expected an ISO 8601 date or dateTime"));
                }
                value
            }
            _ => SearchValue::eq(part),
        };
        values.push(value);
    }
    Ok(values)
}

fn is_valid_date(value: &str) -> bool {
    let year = |s: &str| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit());
    match value.len() {
        4 => year(value),
        7 => NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").is_ok(),
        10 => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
        _ => DateTime::parse_from_rfc3339(value).is_ok(),
    }
}

/// One validated parameter of a compiled query.
///
/// Values are ORed together; clauses are ANDed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchClause {
    /// Parameter code.
    pub code: String,
    /// Parameter type.
    pub param_type: SearchParamType,
    /// Element paths searched.
    pub paths: Vec<String>,
    /// Modifier, if any.
    pub modifier: Option<SearchModifier>,
    /// Alternative values.
    pub values: Vec<SearchValue>,
}

/// A validated search, ready for a backend to evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledQuery {
    resource_type: String,
    clauses: Vec<SearchClause>,
    limit: usize,
}

impl CompiledQuery {
    /// A query matching every document, up to `limit`.
    pub fn match_all(resource_type: impl Into<String>, limit: usize) -> Self {
        Self {
            resource_type: resource_type.into(),
            clauses: Vec::new(),
            limit,
        }
    }

    /// The resource type searched.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// The clauses, all of which must match.
    pub fn clauses(&self) -> &[SearchClause] {
        &self.clauses
    }

    /// Maximum number of results.
    pub fn limit(&self) -> usize {
        self.limit
    }
}
