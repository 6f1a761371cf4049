use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::handler::RouteHandler;
use crate::registry::Registry;

/// Maximum number of merged parameters before heap allocation.
/// Most routes carry a handful of path captures plus a few query pairs.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the match hot path.
///
/// Names use `Arc<str>`: they come from capture groups and query keys that
/// repeat across requests, and cloning them is an atomic increment rather
/// than a string copy. Values stay `String` — they are per-request data.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Result of matching a request path against the registry.
///
/// `params` is the flat merged parameter map: query pairs first, then the
/// percent-decoded path captures, so lookups with last-write-wins
/// semantics give path captures precedence on name collision. Produced per
/// dispatch and never stored.
pub struct RouteMatch {
    /// The winning registration's template.
    pub template: String,
    /// Handler the template resolved to at bind time, if any.
    pub handler: Option<Arc<dyn RouteHandler>>,
    /// Merged path and query parameters.
    pub params: ParamVec,
}

impl RouteMatch {
    /// Get a merged parameter by name.
    ///
    /// Last write wins: path captures are appended after query pairs, so a
    /// path capture shadows a same-named query parameter.
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert the merged parameters to a `HashMap`.
    /// Note: this allocates — use `get_param` on the dispatch path.
    #[must_use]
    pub fn params_map(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Find the first binding whose pattern matches `path`, in registration
/// order, and merge its captures with the parsed query string.
#[must_use]
pub fn find_match(registry: &Registry, path: &str, query: &str) -> Option<RouteMatch> {
    debug!(path = %path, candidates = registry.len(), "Route match attempt");

    for binding in registry.iter() {
        let Some(captures) = binding.pattern.match_path(path) else {
            continue;
        };

        let mut params = parse_query(query);
        for (name, raw) in captures {
            params.push((Arc::from(name.as_str()), percent_decode(&raw)));
        }

        info!(
            template = %binding.template,
            path = %path,
            params = ?params,
            "Route matched"
        );
        return Some(RouteMatch {
            template: binding.template.clone(),
            handler: binding.handler.as_ref().map(Arc::clone),
            params,
        });
    }

    warn!(path = %path, "No route matched");
    None
}

/// Parse a raw query string into parameter pairs using form-encoding rules.
///
/// Pairs keep their wire order; combined with last-write-wins lookups this
/// makes later duplicate keys overwrite earlier ones.
#[must_use]
pub fn parse_query(query: &str) -> ParamVec {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (Arc::from(k.as_ref()), v.into_owned()))
        .collect()
}

/// Percent-decode a captured path value. Captures whose decoded bytes are
/// not valid UTF-8 are kept raw.
fn percent_decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::parse_query;

    #[test]
    fn parse_query_splits_pairs() {
        let params = parse_query("x=1&y=2");
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], ("x".into(), "1".to_string()));
        assert_eq!(params[1], ("y".into(), "2".to_string()));
    }

    #[test]
    fn parse_query_decodes_form_encoding() {
        let params = parse_query("q=a%20b&name=J%C3%B8rn&plus=a+b");
        assert_eq!(params[0].1, "a b");
        assert_eq!(params[1].1, "Jørn");
        assert_eq!(params[2].1, "a b");
    }

    #[test]
    fn parse_query_empty_is_empty() {
        assert!(parse_query("").is_empty());
    }
}
