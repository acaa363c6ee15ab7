//! The current location as seen by the router.

use std::fmt;

/// Path and query string of a navigation target. Fragments are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Path component, as navigated (not normalized).
    pub path: String,
    /// Query string without the leading `?`.
    pub query: Option<String>,
}

impl Location {
    /// Split a `path?query#fragment` string.
    pub fn parse(target: &str) -> Self {
        let target = target.split_once('#').map_or(target, |(before, _)| before);
        match target.split_once('?') {
            Some((path, query)) if !query.is_empty() => Self {
                path: path.to_string(),
                query: Some(query.to_string()),
            },
            Some((path, _)) => Self {
                path: path.to_string(),
                query: None,
            },
            None => Self {
                path: target.to_string(),
                query: None,
            },
        }
    }

    /// Same query string on a different path.
    pub fn with_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: self.query.clone(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.query {
            Some(query) => write!(f, "{}?{}", self.path, query),
            None => f.write_str(&self.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_query_and_drops_fragment() {
        let loc = Location::parse("/search?city=lagos&beds=2#results");
        assert_eq!(loc.path, "/search");
        assert_eq!(loc.query.as_deref(), Some("city=lagos&beds=2"));
        assert_eq!(loc.to_string(), "/search?city=lagos&beds=2");
    }

    #[test]
    fn test_parse_empty_query() {
        let loc = Location::parse("/about?");
        assert_eq!(loc.query, None);
        assert_eq!(loc.to_string(), "/about");
    }
}
