//! API groups, versions, and their display ordering.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Map of API group name → versions served by that group, newest stable first.
pub type GroupVersions = BTreeMap<String, Vec<ApiVersion>>;

/// Stability level encoded in a Kubernetes-style version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stability {
    // Declaration order is display order.
    Ga,
    Beta,
    Alpha,
}

/// Parsed form of `v<major>[alpha|beta][<minor>]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Parsed {
    major: u64,
    stability: Stability,
    minor: u64,
}

/// An API version such as `v1`, `v2beta1`, or `v1alpha3`.
///
/// Ordering is display order: GA before beta before alpha, and within a
/// stability level the higher major (then the higher pre-release number)
/// comes first. So `v2 < v1 < v1beta2 < v1beta1 < v1alpha1`. Strings that
/// don't follow the pattern sort after every parseable version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiVersion(String);

impl ApiVersion {
    /// Wrap a version string.
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    /// The raw version string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn parse(&self) -> Option<Parsed> {
        let rest = self.0.strip_prefix('v')?;
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return None;
        }
        let major = rest[..digits].parse().ok()?;
        let rest = &rest[digits..];

        let (stability, rest) = if let Some(r) = rest.strip_prefix("alpha") {
            (Stability::Alpha, r)
        } else if let Some(r) = rest.strip_prefix("beta") {
            (Stability::Beta, r)
        } else {
            (Stability::Ga, rest)
        };

        let minor = match (stability, rest) {
            (_, "") => 0,
            (Stability::Ga, _) => return None,
            (_, digits) => digits.parse().ok()?,
        };

        Some(Parsed {
            major,
            stability,
            minor,
        })
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.parse(), other.parse()) {
            (Some(a), Some(b)) => a
                .stability
                .cmp(&b.stability)
                .then_with(|| b.major.cmp(&a.major))
                .then_with(|| b.minor.cmp(&a.minor))
                .then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApiVersion {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Display name for an API group: `core` for the legacy (empty) group.
#[must_use]
pub fn group_display_name(group: &str) -> &str {
    if group.is_empty() || group == "core" {
        "core"
    } else {
        group
    }
}
