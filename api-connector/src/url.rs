//! Path template resolution
//!
//! Templates are `/`-delimited; a segment starting with `:` is a
//! placeholder named by the rest of the segment (`/users/:id/posts`).
//! Missing parameters resolve to an empty segment instead of failing.

use shared::QueryParams;
use std::collections::HashMap;

const PARAM_MARKER: char = ':';

/// Names of the placeholders in a path template, in order
pub fn path_params(template: &str) -> Vec<&str> {
    template
        .split('/')
        .filter_map(|segment| segment.strip_prefix(PARAM_MARKER))
        .collect()
}

/// Substitute every placeholder segment with its value
pub fn create_url(template: &str, params: &HashMap<String, String>) -> String {
    template
        .split('/')
        .map(|segment| match segment.strip_prefix(PARAM_MARKER) {
            Some(name) => match params.get(name) {
                Some(value) => value.as_str(),
                None => {
                    tracing::warn!(param = name, template, "Missing path parameter");
                    ""
                }
            },
            None => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Append a query string; nothing is appended for empty parameters
pub fn with_query(path: String, query: &QueryParams) -> String {
    let search = query.to_query_string();
    if search.is_empty() {
        path
    } else {
        format!("{}?{}", path, search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitutes_all_placeholders() {
        let url = create_url(
            "/schools/:schoolId/classes/:classId",
            &params(&[("schoolId", "12"), ("classId", "7b")]),
        );
        assert_eq!(url, "/schools/12/classes/7b");
    }

    #[test]
    fn test_preserves_segment_order_and_count() {
        let template = "/a/:x/b/:y/:z";
        let url = create_url(template, &params(&[("x", "1"), ("y", "2"), ("z", "3")]));
        assert_eq!(url, "/a/1/b/2/3");
        assert_eq!(
            url.split('/').count(),
            template.split('/').count()
        );
    }

    #[test]
    fn test_missing_param_is_empty_segment() {
        let url = create_url("/users/:id/profile", &HashMap::new());
        assert_eq!(url, "/users//profile");
    }

    #[test]
    fn test_template_without_params() {
        assert_eq!(create_url("/health", &HashMap::new()), "/health");
        assert!(path_params("/health").is_empty());
    }

    #[test]
    fn test_path_params() {
        assert_eq!(path_params("/users/:id/posts/:postId"), vec!["id", "postId"]);
    }

    #[test]
    fn test_with_query() {
        let query = QueryParams::new().with("q", "rust lang");
        assert_eq!(with_query("/search".into(), &query), "/search?q=rust+lang");
        assert_eq!(with_query("/search".into(), &QueryParams::new()), "/search");
    }
}
