use regex::Regex;
use tracing::warn;

/// Anchored, case-insensitive matcher derived from a route template.
///
/// Purely a function of the template string: compiling the same template
/// twice yields the same pattern. A template whose substitution produces an
/// uncompilable regex (for example the same `{name}` twice, which would
/// declare a duplicate capture group) is kept with no regex at all and
/// matches nothing.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: String,
    regex: Option<Regex>,
}

impl CompiledPattern {
    /// Compile a route template into an anchored matching pattern.
    #[must_use]
    pub fn compile(template: &str) -> Self {
        let mut body = substitute_placeholders(template);
        if !body.starts_with('/') {
            body.insert(0, '/');
        }

        // Anchor at the start of the path; tolerate either a `?query` suffix
        // or end-of-string so everything after `?` is ignored.
        let pattern = format!(r"(?i)^{body}(?:\?.*$|$)");
        let regex = match Regex::new(&pattern) {
            Ok(regex) => Some(regex),
            Err(err) => {
                warn!(
                    template = %template,
                    error = %err,
                    "Route template compiled to an invalid pattern; it will never match"
                );
                None
            }
        };

        Self { pattern, regex }
    }

    /// The compiled pattern text, mainly for logging and diagnostics.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.as_ref().is_some_and(|regex| regex.is_match(path))
    }

    /// Match `path` and return the named captures in encounter order.
    ///
    /// Values are raw matched text — percent-decoding is the matcher's job.
    /// Returns `None` when the path does not match (or the template never
    /// compiled).
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<Vec<(String, String)>> {
        let regex = self.regex.as_ref()?;
        let captures = regex.captures(path)?;

        let mut params = Vec::with_capacity(regex.captures_len().saturating_sub(1));
        for name in regex.capture_names().flatten() {
            if let Some(value) = captures.name(name) {
                params.push((name.to_string(), value.as_str().to_string()));
            }
        }
        Some(params)
    }
}

/// Replace `{name}`, `**` and `*` with their regex forms, escaping the
/// literal runs in between.
fn substitute_placeholders(template: &str) -> String {
    let mut body = String::with_capacity(template.len() + 16);
    let mut literal = String::new();
    let mut i = 0;

    while i < template.len() {
        let rest = &template[i..];
        if let Some(name) = leading_placeholder_name(rest) {
            flush_literal(&mut body, &mut literal);
            body.push_str("(?P<");
            body.push_str(name);
            body.push_str(">[^/?]+)");
            i += name.len() + 2;
        } else if rest.starts_with("**") {
            flush_literal(&mut body, &mut literal);
            body.push_str("(?:[^?]+)");
            i += 2;
        } else if rest.starts_with('*') {
            flush_literal(&mut body, &mut literal);
            body.push_str("(?:[^/?]+)");
            i += 1;
        } else if let Some(ch) = rest.chars().next() {
            literal.push(ch);
            i += ch.len_utf8();
        } else {
            break;
        }
    }

    flush_literal(&mut body, &mut literal);
    body
}

/// `{name}` at the start of `rest`, where `name` is `[A-Za-z0-9_]+`.
/// Anything else — unclosed brace, empty or non-word name — is literal text.
fn leading_placeholder_name(rest: &str) -> Option<&str> {
    let inner = rest.strip_prefix('{')?;
    let end = inner.find('}')?;
    let name = &inner[..end];
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some(name)
    } else {
        None
    }
}

fn flush_literal(body: &mut String, literal: &mut String) {
    if !literal.is_empty() {
        body.push_str(&regex::escape(literal));
        literal.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::CompiledPattern;

    #[test]
    fn named_placeholder_captures_one_segment() {
        let pattern = CompiledPattern::compile("/users/{id}");
        let params = pattern.match_path("/users/42").unwrap();
        assert_eq!(params, vec![("id".to_string(), "42".to_string())]);
        assert!(pattern.match_path("/users/42/posts").is_none());
        assert!(pattern.match_path("/users/").is_none());
    }

    #[test]
    fn query_suffix_is_ignored() {
        let pattern = CompiledPattern::compile("/users/{id}");
        let params = pattern.match_path("/users/42?trace=1").unwrap();
        assert_eq!(params, vec![("id".to_string(), "42".to_string())]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let pattern = CompiledPattern::compile("/Users/{id}");
        assert!(pattern.is_match("/users/42"));
        assert!(pattern.is_match("/USERS/42"));
    }

    #[test]
    fn single_star_stays_within_a_segment() {
        let pattern = CompiledPattern::compile("/files/*");
        assert!(pattern.is_match("/files/report.txt"));
        assert!(!pattern.is_match("/files/a/b"));
    }

    #[test]
    fn double_star_spans_segments_but_not_the_query() {
        let pattern = CompiledPattern::compile("/files/**");
        assert!(pattern.is_match("/files/a/b/c.txt"));
        assert!(pattern.is_match("/files/a/b/c.txt?download=1"));
        assert!(!pattern.is_match("/files/"));
    }

    #[test]
    fn missing_leading_slash_is_prepended() {
        let pattern = CompiledPattern::compile("users/{id}");
        assert!(pattern.is_match("/users/42"));
        assert!(!pattern.is_match("users/42"));
    }

    #[test]
    fn literal_metacharacters_are_escaped() {
        let pattern = CompiledPattern::compile("/v1.0/status");
        assert!(pattern.is_match("/v1.0/status"));
        assert!(!pattern.is_match("/v1x0/status"));
    }

    #[test]
    fn non_word_brace_content_is_literal() {
        let pattern = CompiledPattern::compile("/a/{not-a-name}");
        assert!(pattern.is_match("/a/{not-a-name}"));
        assert!(!pattern.is_match("/a/value"));
    }

    #[test]
    fn duplicate_capture_names_never_match() {
        // Two captures with the same name make the regex uncompilable; the
        // template is kept but structurally matches nothing.
        let pattern = CompiledPattern::compile("/a/{id}/b/{id}");
        assert!(!pattern.is_match("/a/1/b/2"));
        assert!(pattern.match_path("/a/1/b/2").is_none());
    }

    #[test]
    fn root_template_matches_root_only() {
        let pattern = CompiledPattern::compile("/");
        assert!(pattern.is_match("/"));
        assert!(pattern.is_match("/?x=1"));
        assert!(!pattern.is_match("/a"));
    }

    #[test]
    fn multiple_placeholders_capture_in_encounter_order() {
        let pattern = CompiledPattern::compile("/orgs/{org}/repos/{repo}");
        let params = pattern.match_path("/orgs/acme/repos/widget").unwrap();
        assert_eq!(
            params,
            vec![
                ("org".to_string(), "acme".to_string()),
                ("repo".to_string(), "widget".to_string()),
            ]
        );
    }
}
