//! Static route families.

/// Resources with a public-facing page that is mirrored under `/user` and
/// `/admin` for signed-in visitors.
pub const PUBLIC_BASES: &[&str] = &[
    "about",
    "blogs",
    "contact",
    "cookie-policy",
    "faqs",
    "listing",
    "market-trends",
    "privacy",
    "search",
    "terms",
];

/// Resources that exist under both `/user` and `/admin` but have no
/// public page.
pub const PARALLEL_BASES: &[&str] = &[
    "appointments",
    "change-password",
    "my-appointments",
    "notifications",
    "payments",
    "profile",
    "reviews",
    "settings",
    "support",
];

/// Pages that only make sense while signed out.
pub const AUTH_ONLY_PATHS: &[&str] = &["/sign-in", "/sign-up", "/forgot-password", "/oauth"];

/// The rule set the classifier evaluates against.
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    /// Bases with a public mirror.
    pub public_bases: &'static [&'static str],
    /// Bases mirrored between `/user` and `/admin` only.
    pub parallel_bases: &'static [&'static str],
    /// Signed-out-only pages.
    pub auth_only_paths: &'static [&'static str],
}

impl RouteTable {
    /// The marketplace's route families.
    pub const fn standard() -> Self {
        Self {
            public_bases: PUBLIC_BASES,
            parallel_bases: PARALLEL_BASES,
            auth_only_paths: AUTH_ONLY_PATHS,
        }
    }

    /// Whether the base has a public mirror.
    pub fn is_public(&self, base: Option<&str>) -> bool {
        base.is_some_and(|b| self.public_bases.contains(&b))
    }

    /// Whether the base is reachable from either privileged namespace.
    pub fn is_shared(&self, base: Option<&str>) -> bool {
        base.is_some_and(|b| self.public_bases.contains(&b) || self.parallel_bases.contains(&b))
    }

    /// Whether the normalized path is a signed-out-only page.
    pub fn is_auth_only(&self, path: &str) -> bool {
        self.auth_only_paths.contains(&path)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}
