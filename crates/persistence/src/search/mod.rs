//! Search compilation and evaluation.
//!
//! - [`params`] - Parameter types, modifiers and value prefixes
//! - [`registry`] - Parameters accepted per resource type
//! - [`query`] - Raw query strings compiled into [`CompiledQuery`]
//! - [`matcher`] - In-process evaluation of a compiled query
//! - [`errors`] - Compilation errors with their HTTP mapping
//!
//! # Supported parameter types
//!
//! | Type      | Value syntax        | Match                                     |
//! |-----------|---------------------|-------------------------------------------|
//! | token     | `[system\|]code`    | exact code, coding or identifier value    |
//! | string    | text                | case-insensitive prefix (`:exact`, `:contains`) |
//! | reference | `Type/id` or `id`   | reference equal to or ending in the value |
//! | date      | `[prefix]date`      | `eq ne gt lt ge le` at the coarser precision |
//!
//! Comma-separated values are ORed; repeated parameters are ANDed. `_count`
//! sets the result limit.
//!
//! # Example
//!
//! ```
//! use carebase_store::search::{SearchLimits, SearchParameterRegistry, SearchQuery};
//! use serde_json::json;
//!
//! let registry = SearchParameterRegistry::with_builtin();
//! let compiled = SearchQuery::new("RelatedPerson", "gender=female&_count=10")
//!     .compile(&registry, SearchLimits::default())
//!     .unwrap();
//!
//! assert_eq!(compiled.limit(), 10);
//! assert!(compiled.matches(&json!({"gender": "female"})));
//! ```

pub mod errors;
pub mod matcher;
pub mod params;
pub mod query;
pub mod registry;

pub use errors::{SearchError, SearchResult};
pub use params::{SearchModifier, SearchParamType, SearchPrefix, SearchValue};
pub use query::{CompiledQuery, SearchClause, SearchLimits, SearchQuery, has_parameters};
pub use registry::{SearchParameterDefinition, SearchParameterRegistry};
