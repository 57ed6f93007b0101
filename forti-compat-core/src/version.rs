//! Firmware version parsing and per-field compatibility rules.
//!
//! Versions are dotted numeric segments with an optional leading `v`, an
//! optional `-pre.release` tag and optional `+build` metadata: `7.0`,
//! `v6.4.12`, `7.2.0-beta.1+b1234`. A tag that starts with a letter may drop
//! the dash (`7.0.0beta`). Missing segments compare as zero, a
//! pre-release sorts before its release, and build metadata is ignored for
//! ordering.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors returned when parsing a version string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("empty version string")]
    Empty,
    #[error("invalid version segment '{segment}' in '{input}'")]
    Segment { input: String, segment: String },
    #[error("invalid pre-release or build tag in '{0}'")]
    Tag(String),
}

/// A parsed firmware version.
#[derive(Debug, Clone)]
pub struct Version {
    segments: Vec<u64>,
    pre: Vec<String>,
    build: Option<String>,
    original: String,
}

impl Version {
    /// Parse a version string.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }
        let body = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let (body, build) = match body.split_once('+') {
            Some((rest, meta)) => {
                if !valid_tag(meta) {
                    return Err(VersionError::Tag(input.to_string()));
                }
                (rest, Some(meta.to_string()))
            }
            None => (body, None),
        };
        let (core, pre) = match body.split_once('-') {
            Some((rest, tag)) => {
                if !valid_tag(tag) {
                    return Err(VersionError::Tag(input.to_string()));
                }
                (rest, tag.split('.').map(str::to_string).collect())
            }
            // `7.0.0beta`: a tag starting with a letter may follow without a dash.
            None => match body.find(|c: char| c.is_ascii_alphabetic()) {
                Some(idx) if idx > 0 && valid_tag(&body[idx..]) => {
                    let (rest, tag) = body.split_at(idx);
                    (rest, tag.split('.').map(str::to_string).collect())
                }
                _ => (body, Vec::new()),
            },
        };

        let segments = core
            .split('.')
            .map(|segment| {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(VersionError::Segment {
                        input: input.to_string(),
                        segment: segment.to_string(),
                    });
                }
                segment.parse::<u64>().map_err(|_| VersionError::Segment {
                    input: input.to_string(),
                    segment: segment.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            segments,
            pre,
            build,
            original: trimmed.to_string(),
        })
    }

    /// Numeric segments as written.
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Pre-release identifiers, empty for a release.
    pub fn pre_release(&self) -> &[String] {
        &self.pre
    }

    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    fn segment(&self, idx: usize) -> u64 {
        self.segments.get(idx).copied().unwrap_or(0)
    }
}

fn valid_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag.split('.').all(|ident| {
            !ident.is_empty()
                && ident
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'~')
        })
}

fn compare_pre(left: &[String], right: &[String]) -> Ordering {
    match (left.is_empty(), right.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    for (a, b) in left.iter().zip(right) {
        let ord = match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => a.cmp(b),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len())
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.segments.len().max(other.segments.len());
        (0..width)
            .map(|idx| self.segment(idx).cmp(&other.segment(idx)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or_else(|| compare_pre(&self.pre, &other.pre))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Comparison operator of a compatibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompatOperator {
    /// Any listed version, compared as exact strings.
    Equal,
    /// At least the first listed version.
    AtLeast,
    /// At most the first listed version.
    AtMost,
}

impl CompatOperator {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "=" => Some(Self::Equal),
            ">=" => Some(Self::AtLeast),
            "<=" => Some(Self::AtMost),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::AtLeast => ">=",
            Self::AtMost => "<=",
        }
    }
}

/// Versions a field is available on, keyed by operator token.
///
/// Serialized as `{"=": ["6.4.0"], ">=": ["7.0.0"]}`. Rules are ORed: a single
/// `>=` and `<=` pair does not form a closed range, it accepts everything
/// either bound accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompatRules {
    rules: BTreeMap<String, Vec<String>>,
}

impl CompatRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add versions under an operator token.
    pub fn with(mut self, operator: &str, versions: &[&str]) -> Self {
        self.rules
            .entry(operator.to_string())
            .or_default()
            .extend(versions.iter().map(|v| v.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rules.iter().map(|(op, list)| (op.as_str(), list.as_slice()))
    }

    /// Whether `version` satisfies at least one rule.
    ///
    /// An unparseable `version` never matches. A rule with an unknown
    /// operator, an empty list, or an unparseable bound is skipped.
    pub fn matches(&self, version: &str) -> bool {
        let Ok(current) = Version::parse(version) else {
            debug!(version, "unparseable firmware version treated as unsupported");
            return false;
        };

        self.iter().any(|(token, versions)| {
            let Some(operator) = CompatOperator::from_token(token) else {
                debug!(operator = token, "skipping compatibility rule with unknown operator");
                return false;
            };
            match operator {
                CompatOperator::Equal => versions.iter().any(|candidate| candidate == version),
                CompatOperator::AtLeast | CompatOperator::AtMost => {
                    let Some(bound) = bound_version(token, versions) else {
                        return false;
                    };
                    if operator == CompatOperator::AtLeast {
                        current >= bound
                    } else {
                        current <= bound
                    }
                }
            }
        })
    }
}

fn bound_version(token: &str, versions: &[String]) -> Option<Version> {
    let raw = versions.first()?;
    match Version::parse(raw) {
        Ok(bound) => Some(bound),
        Err(err) => {
            debug!(operator = token, bound = raw.as_str(), %err, "skipping compatibility rule");
            None
        }
    }
}

impl<'a> FromIterator<(&'a str, Vec<&'a str>)> for CompatRules {
    fn from_iter<I: IntoIterator<Item = (&'a str, Vec<&'a str>)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |rules, (op, versions)| rules.with(op, &versions))
    }
}
