use std::fmt;

/// A package version as declared in its manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub raw: String,
    pub semver: Option<semver::Version>,
}

/// A version range declared by a dependent package. The raw text is what the
/// manifest says; `semver` is only present when the range is expressible as a
/// cargo-style requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReq {
    pub raw: String,
    pub semver: Option<semver::VersionReq>,
}

impl Version {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let semver = semver::Version::parse(raw.trim()).ok();
        Self { raw, semver }
    }
}

impl VersionReq {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let semver = parse_range(&raw);
        Self { raw, semver }
    }

    /// Range as written in a package.json. npm reads a bare version such as
    /// `1.2.3` as an exact pin, where cargo would read it as `^1.2.3`.
    pub fn npm(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let semver = parse_range(&pin_bare_versions(&raw));
        Self { raw, semver }
    }

    pub fn any() -> Self {
        Self::new("*")
    }

    /// `None` when either side is not parseable semver.
    pub fn matches(&self, version: &Version) -> Option<bool> {
        let req = self.semver.as_ref()?;
        let version = version.semver.as_ref()?;
        Some(req.matches(version))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl fmt::Display for VersionReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// npm writes `>=1.2.0 <2.0.0` where cargo wants commas, and workspace
// protocols prefix the actual range. Unions (`||`) have no semver equivalent.
fn parse_range(raw: &str) -> Option<semver::VersionReq> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("workspace:").unwrap_or(trimmed);
    if trimmed.is_empty() || trimmed.contains("||") {
        return None;
    }
    if let Ok(req) = semver::VersionReq::parse(trimmed) {
        return Some(req);
    }
    if trimmed.contains(',') {
        return None;
    }
    let joined = trimmed.split_whitespace().collect::<Vec<_>>().join(", ");
    semver::VersionReq::parse(&joined).ok()
}

fn pin_bare_versions(raw: &str) -> String {
    let trimmed = raw.trim();
    let (protocol, range) = match trimmed.strip_prefix("workspace:") {
        Some(range) => ("workspace:", range),
        None => ("", trimmed),
    };
    let comparators: Vec<String> = range
        .split_whitespace()
        .map(|token| {
            if is_bare_version(token) {
                format!("={token}")
            } else {
                token.to_string()
            }
        })
        .collect();
    format!("{protocol}{}", comparators.join(" "))
}

// `1`, `1.2`, `1.2.3`, `1.2.3-beta.1`; no operator and no wildcard.
fn is_bare_version(token: &str) -> bool {
    let core = token.split(['-', '+']).next().unwrap_or(token);
    core.starts_with(|c: char| c.is_ascii_digit())
        && core.chars().all(|c| c.is_ascii_digit() || c == '.')
}
