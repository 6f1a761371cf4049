//! # Matcher Module
//!
//! Finds the first registry binding whose pattern matches a request path
//! and produces the merged parameter map the resolver consumes.
//!
//! ## Matching rules
//!
//! 1. Bindings are scanned in registration order; the first pattern match
//!    wins. There is no specificity scoring — bind specific templates first.
//! 2. Captured path values are percent-decoded.
//! 3. The query string is parsed with form-encoding rules; later keys
//!    overwrite earlier ones.
//! 4. Path captures and query pairs merge into one flat map, path captures
//!    winning on name collision.
//!
//! No match (or an empty registry) is a legitimate "no outcome" result,
//! not an error.

mod core;

pub use core::{find_match, parse_query, ParamVec, RouteMatch, MAX_INLINE_PARAMS};
