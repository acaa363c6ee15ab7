//! Path normalization and parsing.

use haven_entity::RouteRole;

/// One of the two privileged route namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `/user/...`
    User,
    /// `/admin/...`
    Admin,
}

impl Namespace {
    /// Recognize a first path segment as a namespace prefix.
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Namespace a signed-in role is routed into.
    pub fn of_role(role: RouteRole) -> Option<Self> {
        match role {
            RouteRole::Public => None,
            RouteRole::User => Some(Self::User),
            RouteRole::Admin => Some(Self::Admin),
        }
    }

    /// Segment text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// A path split into `{prefix, base, rest}`.
///
/// `/admin/reviews/42` parses to prefix `Admin`, base `reviews`, rest `/42`.
/// `/about` parses to no prefix, base `about`, empty rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedPath<'a> {
    /// Namespace prefix, when the first segment is literally `user`/`admin`.
    pub prefix: Option<Namespace>,
    /// Resource segment after the prefix. `None` when the path ends there.
    pub base: Option<&'a str>,
    /// Everything after the base, including its leading `/`.
    pub rest: &'a str,
}

impl ParsedPath<'_> {
    /// Reassemble the path under the given namespace (or none).
    pub fn render(&self, prefix: Option<Namespace>) -> String {
        let mut out = String::new();
        if let Some(ns) = prefix {
            out.push('/');
            out.push_str(ns.as_str());
        }
        if let Some(base) = self.base {
            out.push('/');
            out.push_str(base);
        }
        out.push_str(self.rest);
        if out.is_empty() {
            out.push('/');
        }
        out
    }
}

/// Canonical spelling of a path: a leading `/` and no trailing `/` unless
/// the path is the root.
///
/// A run of trailing slashes is stripped as a whole so that normalizing is
/// idempotent.
pub fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Split a normalized path into prefix, base, and rest.
///
/// Total: every input yields a value. Input is expected to come from
/// [`normalize`]; a missing leading `/` is tolerated.
pub fn parse_path(path: &str) -> ParsedPath<'_> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let (first, after_first) = split_segment(trimmed);

    let (prefix, remaining) = match Namespace::from_segment(first) {
        Some(ns) => (Some(ns), after_first),
        None => (None, trimmed),
    };

    if remaining.is_empty() {
        return ParsedPath {
            prefix,
            base: None,
            rest: "",
        };
    }

    let (base, rest) = match remaining.find('/') {
        Some(idx) => (&remaining[..idx], &remaining[idx..]),
        None => (remaining, ""),
    };

    ParsedPath {
        prefix,
        base: Some(base),
        rest,
    }
}

/// First segment and the text after its separating `/`.
fn split_segment(s: &str) -> (&str, &str) {
    match s.split_once('/') {
        Some((head, tail)) => (head, tail),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/about/"), "/about");
        assert_eq!(normalize("/about"), "/about");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("about"), "/about");
        assert_eq!(normalize("/user/reviews/"), "/user/reviews");
        assert_eq!(normalize("/about//"), "/about");
        assert_eq!(normalize("//"), "/");
    }

    #[test]
    fn test_parse_prefixed() {
        let parsed = parse_path("/admin/reviews/42/edit");
        assert_eq!(parsed.prefix, Some(Namespace::Admin));
        assert_eq!(parsed.base, Some("reviews"));
        assert_eq!(parsed.rest, "/42/edit");
    }

    #[test]
    fn test_parse_unprefixed() {
        let parsed = parse_path("/about");
        assert_eq!(parsed.prefix, None);
        assert_eq!(parsed.base, Some("about"));
        assert_eq!(parsed.rest, "");

        let parsed = parse_path("/listing/abc/photos");
        assert_eq!(parsed.prefix, None);
        assert_eq!(parsed.base, Some("listing"));
        assert_eq!(parsed.rest, "/abc/photos");
    }

    #[test]
    fn test_parse_namespace_home() {
        let parsed = parse_path("/user");
        assert_eq!(parsed.prefix, Some(Namespace::User));
        assert_eq!(parsed.base, None);
        assert_eq!(parsed.rest, "");
    }

    #[test]
    fn test_parse_root() {
        let parsed = parse_path("/");
        assert_eq!(parsed.prefix, None);
        assert_eq!(parsed.base, None);
        assert_eq!(parsed.rest, "");
    }

    #[test]
    fn test_prefix_must_be_whole_segment() {
        let parsed = parse_path("/useradmin/x");
        assert_eq!(parsed.prefix, None);
        assert_eq!(parsed.base, Some("useradmin"));
        assert_eq!(parsed.rest, "/x");

        let parsed = parse_path("/users");
        assert_eq!(parsed.prefix, None);
        assert_eq!(parsed.base, Some("users"));
    }

    #[test]
    fn test_parse_empty_base_segment() {
        let parsed = parse_path("/user//about");
        assert_eq!(parsed.prefix, Some(Namespace::User));
        assert_eq!(parsed.base, Some(""));
        assert_eq!(parsed.rest, "/about");
    }

    #[test]
    fn test_parse_without_leading_slash() {
        assert_eq!(parse_path("admin/settings"), parse_path("/admin/settings"));
    }

    #[test]
    fn test_render_round_trips() {
        for path in ["/", "/about", "/user", "/admin/reviews/42", "/user//about", "/x/y/z"] {
            let parsed = parse_path(path);
            assert_eq!(parsed.render(parsed.prefix), path, "path {path}");
        }
    }

    #[test]
    fn test_render_into_other_namespace() {
        let parsed = parse_path("/admin/settings/alerts");
        assert_eq!(parsed.render(Some(Namespace::User)), "/user/settings/alerts");
        assert_eq!(parsed.render(None), "/settings/alerts");
    }
}
