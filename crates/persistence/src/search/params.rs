//! Search parameter types.
//!
//! Types for a parsed search: parameter types, modifiers and value prefixes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Search parameter types supported by the compiler.
///
/// See: https://hl7.org/fhir/search.html#ptypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchParamType {
    /// A simple string, like a name or an address line.
    String,
    /// A code, optionally qualified by a system.
    Token,
    /// A reference to another resource.
    Reference,
    /// A date or dateTime.
    Date,
}

impl fmt::Display for SearchParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchParamType::String => write!(f, "string"),
            SearchParamType::Token => write!(f, "token"),
            SearchParamType::Reference => write!(f, "reference"),
            SearchParamType::Date => write!(f, "date"),
        }
    }
}

/// Modifiers accepted after a parameter name (`name:exact=...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchModifier {
    /// Exact, case-sensitive string match.
    Exact,
    /// Case-insensitive substring match.
    Contains,
    /// Negated token match.
    Not,
    /// `true` matches records without the element, `false` records with it.
    Missing,
}

impl fmt::Display for SearchModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchModifier::Exact => write!(f, "exact"),
            SearchModifier::Contains => write!(f, "contains"),
            SearchModifier::Not => write!(f, "not"),
            SearchModifier::Missing => write!(f, "missing"),
        }
    }
}

impl SearchModifier {
    /// Parses a modifier string, returning None for unknown modifiers.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "exact" => Some(SearchModifier::Exact),
            "contains" => Some(SearchModifier::Contains),
            "not" => Some(SearchModifier::Not),
            "missing" => Some(SearchModifier::Missing),
            _ => None,
        }
    }

    /// Returns true if this modifier is valid for the given parameter type.
    pub fn is_valid_for(&self, param_type: SearchParamType) -> bool {
        match self {
            SearchModifier::Exact | SearchModifier::Contains => {
                param_type == SearchParamType::String
            }
            SearchModifier::Not => param_type == SearchParamType::Token,
            SearchModifier::Missing => true,
        }
    }
}

/// Comparison prefixes for date parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchPrefix {
    /// Equal (default).
    #[default]
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Less than.
    Lt,
    /// Greater than or equal.
    Ge,
    /// Less than or equal.
    Le,
}

impl fmt::Display for SearchPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SearchPrefix::Eq => "eq",
            SearchPrefix::Ne => "ne",
            SearchPrefix::Gt => "gt",
            SearchPrefix::Lt => "lt",
            SearchPrefix::Ge => "ge",
            SearchPrefix::Le => "le",
        };
        f.write_str(s)
    }
}

impl FromStr for SearchPrefix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(SearchPrefix::Eq),
            "ne" => Ok(SearchPrefix::Ne),
            "gt" => Ok(SearchPrefix::Gt),
            "lt" => Ok(SearchPrefix::Lt),
            "ge" => Ok(SearchPrefix::Ge),
            "le" => Ok(SearchPrefix::Le),
            _ => Err(format!("unknown search prefix: {}", s)),
        }
    }
}

impl SearchPrefix {
    /// Splits a leading prefix off a value string.
    ///
    /// Values without a recognised prefix keep their full text and get
    /// [`SearchPrefix::Eq`].
    pub fn extract(value: &str) -> (Self, &str) {
        if let Some(head) = value.get(..2) {
            if let Ok(prefix) = head.parse() {
                return (prefix, &value[2..]);
            }
        }
        (SearchPrefix::Eq, value)
    }

    /// Evaluates `stored <prefix> wanted` over strings of equal precision.
    pub fn compare(&self, stored: &str, wanted: &str) -> bool {
        match self {
            SearchPrefix::Eq => stored == wanted,
            SearchPrefix::Ne => stored != wanted,
            SearchPrefix::Gt => stored > wanted,
            SearchPrefix::Lt => stored < wanted,
            SearchPrefix::Ge => stored >= wanted,
            SearchPrefix::Le => stored <= wanted,
        }
    }
}

/// A single search value with its prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchValue {
    /// The comparison prefix (meaningful for dates only).
    pub prefix: SearchPrefix,
    /// The value to search for.
    pub value: String,
}

impl SearchValue {
    /// Creates a search value with the default (eq) prefix.
    pub fn eq(value: impl Into<String>) -> Self {
        Self {
            prefix: SearchPrefix::Eq,
            value: value.into(),
        }
    }

    /// Parses a value string, extracting any prefix.
    pub fn with_prefix(s: &str) -> Self {
        let (prefix, value) = SearchPrefix::extract(s);
        Self {
            prefix,
            value: value.to_string(),
        }
    }
}
