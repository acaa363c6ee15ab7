//! The route classifier.
//!
//! `classify(path, role)` returns the canonical path for the visitor, or
//! `None` when the path is forbidden for that role. It is a pure function
//! of its inputs and the static [`RouteTable`]; a normalized result is a
//! fixed point (`classify(classify(p)) == classify(p)`).

use haven_entity::RouteRole;

use crate::path::{Namespace, normalize, parse_path};
use crate::table::RouteTable;

/// Classify against the standard route table.
pub fn classify(path: &str, role: RouteRole) -> Option<String> {
    RouteTable::standard().classify(path, role)
}

impl RouteTable {
    /// Map `(path, role)` to a canonical path, or `None` if forbidden.
    ///
    /// - public visitors reach mirrored pages by their public path and are
    ///   forbidden from every other prefixed path
    /// - signed-in visitors are moved into their own namespace for mirrored
    ///   pages and parallel routes, and forbidden from the other
    ///   namespace's private pages
    /// - unknown paths pass through unchanged
    pub fn classify(&self, path: &str, role: RouteRole) -> Option<String> {
        let path = normalize(path);

        let Some(own) = Namespace::of_role(role) else {
            return self.classify_public(path);
        };

        if self.is_auth_only(&path) {
            return Some(role.home().to_string());
        }

        let parsed = parse_path(&path);
        match parsed.prefix {
            None if self.is_public(parsed.base) => Some(parsed.render(Some(own))),
            Some(prefix) if prefix != own => {
                if self.is_shared(parsed.base) {
                    Some(parsed.render(Some(own)))
                } else {
                    None
                }
            }
            _ => Some(path),
        }
    }

    fn classify_public(&self, path: String) -> Option<String> {
        let parsed = parse_path(&path);
        match parsed.prefix {
            Some(_) if self.is_public(parsed.base) => Some(parsed.render(None)),
            Some(_) => None,
            None => Some(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLES: [RouteRole; 3] = [RouteRole::Public, RouteRole::User, RouteRole::Admin];

    fn sample_paths() -> Vec<String> {
        let mut bases: Vec<&str> = Vec::new();
        bases.extend(crate::table::PUBLIC_BASES);
        bases.extend(crate::table::PARALLEL_BASES);
        bases.extend(["listings", "wishlist", "unknown", "", "user", "admin", "sign-in"]);

        let mut paths = vec![
            String::new(),
            "/".to_string(),
            "//".to_string(),
            "/user".to_string(),
            "/admin/".to_string(),
            "/sign-in".to_string(),
            "/sign-up/".to_string(),
            "/oauth".to_string(),
            "/forgot-password".to_string(),
            "no-leading-slash/about".to_string(),
        ];
        for prefix in ["", "/user", "/admin", "/users"] {
            for base in &bases {
                for rest in ["", "/", "/42", "/42/edit/", "//x"] {
                    paths.push(format!("{prefix}/{base}{rest}"));
                }
            }
        }
        paths
    }

    #[test]
    fn test_totality() {
        for role in ROLES {
            for path in sample_paths() {
                if let Some(out) = classify(&path, role) {
                    assert!(out.starts_with('/'), "{path:?} as {role} gave {out:?}");
                }
            }
        }
    }

    #[test]
    fn test_idempotence() {
        for role in ROLES {
            for path in sample_paths() {
                if let Some(first) = classify(&path, role) {
                    assert_eq!(
                        classify(&first, role).as_deref(),
                        Some(first.as_str()),
                        "{path:?} as {role} is not a fixed point"
                    );
                }
            }
        }
    }

    #[test]
    fn test_trailing_slash_is_insignificant() {
        for role in ROLES {
            for path in sample_paths() {
                let slashed = format!("{path}/");
                assert_eq!(classify(&slashed, role), classify(&path, role), "{path:?} as {role}");
            }
        }
    }

    #[test]
    fn test_namespace_isolation_for_public() {
        assert_eq!(classify("/admin/listings", RouteRole::Public), None);
        assert_eq!(classify("/admin/about", RouteRole::Public).as_deref(), Some("/about"));
        assert_eq!(classify("/user/wishlist", RouteRole::Public), None);
        assert_eq!(classify("/user", RouteRole::Public), None);
        assert_eq!(
            classify("/user/listing/abc", RouteRole::Public).as_deref(),
            Some("/listing/abc")
        );
    }

    #[test]
    fn test_public_passthrough() {
        assert_eq!(classify("/", RouteRole::Public).as_deref(), Some("/"));
        assert_eq!(classify("/about", RouteRole::Public).as_deref(), Some("/about"));
        assert_eq!(classify("/listings", RouteRole::Public).as_deref(), Some("/listings"));
    }

    #[test]
    fn test_parallel_route_mirroring() {
        assert_eq!(
            classify("/user/settings", RouteRole::Admin).as_deref(),
            Some("/admin/settings")
        );
        assert_eq!(
            classify("/admin/settings", RouteRole::User).as_deref(),
            Some("/user/settings")
        );
        assert_eq!(
            classify("/admin/reviews/42", RouteRole::User).as_deref(),
            Some("/user/reviews/42")
        );
    }

    #[test]
    fn test_public_pages_move_into_namespace() {
        assert_eq!(classify("/about", RouteRole::User).as_deref(), Some("/user/about"));
        assert_eq!(classify("/faqs", RouteRole::Admin).as_deref(), Some("/admin/faqs"));
        assert_eq!(classify("/admin/faqs", RouteRole::User).as_deref(), Some("/user/faqs"));
    }

    #[test]
    fn test_other_namespace_private_pages_are_forbidden() {
        assert_eq!(classify("/admin/listings", RouteRole::User), None);
        assert_eq!(classify("/admin", RouteRole::User), None);
        assert_eq!(classify("/user/wishlist", RouteRole::Admin), None);
    }

    #[test]
    fn test_own_namespace_unchanged() {
        assert_eq!(
            classify("/user/wishlist", RouteRole::User).as_deref(),
            Some("/user/wishlist")
        );
        assert_eq!(classify("/admin", RouteRole::Admin).as_deref(), Some("/admin"));
        assert_eq!(classify("/listings", RouteRole::Admin).as_deref(), Some("/listings"));
    }

    #[test]
    fn test_auth_page_redirect() {
        assert_eq!(classify("/sign-in", RouteRole::User).as_deref(), Some("/user"));
        assert_eq!(classify("/sign-in", RouteRole::Admin).as_deref(), Some("/admin"));
        assert_eq!(classify("/sign-in", RouteRole::Public).as_deref(), Some("/sign-in"));
        assert_eq!(classify("/oauth/", RouteRole::Admin).as_deref(), Some("/admin"));
        assert_eq!(classify("/sign-up", RouteRole::User).as_deref(), Some("/user"));
    }

    #[test]
    fn test_trailing_slash_normalization() {
        for role in ROLES {
            assert_eq!(classify("/about/", role), classify("/about", role));
        }
        assert_eq!(classify("/about/", RouteRole::Public).as_deref(), Some("/about"));
    }
}
