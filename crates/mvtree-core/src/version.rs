//! Maven version parsing, comparison, range matching and version constraints.
//!
//! Maven versions use a custom ordering that differs from semver:
//! - Segments are split on `.` and `-`
//! - Numeric segments compare as numbers
//! - String qualifiers have a special ordering:
//!   `alpha` < `beta` < `milestone` < `rc` < `snapshot` < `""` (release) < `sp`
//! - SNAPSHOT versions sort before their release equivalent

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

/// A version constraint or range that could not be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version range `{spec}`: {reason}")]
    InvalidRange { spec: String, reason: String },
}

impl VersionError {
    fn range(spec: &str, reason: &str) -> Self {
        VersionError::InvalidRange {
            spec: spec.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A parsed Maven version with comparable segments.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    pub original: String,
    segments: Vec<Segment>,
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Segment {
    Numeric(u64),
    Qualifier(QualifierKind),
    Text(String),
}

/// Well-known Maven qualifiers with defined ordering.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
enum QualifierKind {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    Sp,
}

impl MavenVersion {
    pub fn parse(version: &str) -> Self {
        let segments = parse_segments(version);
        Self {
            original: version.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.segments.len().max(other.segments.len());
        for i in 0..max_len {
            let a = self.segments.get(i);
            let b = other.segments.get(i);
            let ord = compare_segments(a, b);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_segments(a: Option<&Segment>, b: Option<&Segment>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(s), None) => compare_segment_to_empty(s),
        (None, Some(s)) => compare_segment_to_empty(s).reverse(),
        (Some(a), Some(b)) => compare_two_segments(a, b),
    }
}

fn compare_segment_to_empty(seg: &Segment) -> Ordering {
    match seg {
        Segment::Numeric(0) => Ordering::Equal,
        Segment::Numeric(_) => Ordering::Greater,
        Segment::Qualifier(q) => q.cmp(&QualifierKind::Release),
        Segment::Text(s) if s.is_empty() => Ordering::Equal,
        Segment::Text(_) => Ordering::Less,
    }
}

fn compare_two_segments(a: &Segment, b: &Segment) -> Ordering {
    match (a, b) {
        (Segment::Numeric(a), Segment::Numeric(b)) => a.cmp(b),
        (Segment::Qualifier(a), Segment::Qualifier(b)) => a.cmp(b),
        (Segment::Numeric(_), Segment::Qualifier(_)) => Ordering::Greater,
        (Segment::Qualifier(_), Segment::Numeric(_)) => Ordering::Less,
        (Segment::Numeric(_), Segment::Text(_)) => Ordering::Greater,
        (Segment::Text(_), Segment::Numeric(_)) => Ordering::Less,
        (Segment::Text(a), Segment::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
        (Segment::Qualifier(q), Segment::Text(_)) => {
            if *q >= QualifierKind::Release {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (Segment::Text(_), Segment::Qualifier(q)) => {
            if *q >= QualifierKind::Release {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
    }
}

fn parse_segments(version: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for ch in version.chars() {
        if ch == '.' || ch == '-' {
            if !current.is_empty() {
                segments.push(classify(&current));
                current.clear();
            }
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        segments.push(classify(&current));
    }

    segments
}

fn classify(token: &str) -> Segment {
    if let Ok(n) = token.parse::<u64>() {
        return Segment::Numeric(n);
    }
    match token.to_lowercase().as_str() {
        "alpha" | "a" => Segment::Qualifier(QualifierKind::Alpha),
        "beta" | "b" => Segment::Qualifier(QualifierKind::Beta),
        "milestone" | "m" => Segment::Qualifier(QualifierKind::Milestone),
        "rc" | "cr" => Segment::Qualifier(QualifierKind::Rc),
        "snapshot" => Segment::Qualifier(QualifierKind::Snapshot),
        "" | "ga" | "final" | "release" => Segment::Qualifier(QualifierKind::Release),
        "sp" => Segment::Qualifier(QualifierKind::Sp),
        _ => Segment::Text(token.to_string()),
    }
}

/// A single Maven version range expression.
///
/// Supports: `[1.0,2.0)`, `[1.0,]`, `(,2.0)`, `[1.0]` (exact).
#[derive(Debug, Clone, PartialEq)]
pub struct VersionRange {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub version: MavenVersion,
    pub inclusive: bool,
}

impl VersionRange {
    /// Parse one bracketed range. Bare versions are rejected.
    pub fn parse(spec: &str) -> Result<Self, VersionError> {
        let s = spec.trim();
        if s.len() < 2 {
            return Err(VersionError::range(spec, "too short"));
        }
        let open_inclusive = match s.as_bytes()[0] {
            b'[' => true,
            b'(' => false,
            _ => return Err(VersionError::range(spec, "must start with `[` or `(`")),
        };
        let close_inclusive = match s.as_bytes()[s.len() - 1] {
            b']' => true,
            b')' => false,
            _ => return Err(VersionError::range(spec, "must end with `]` or `)`")),
        };
        let inner = &s[1..s.len() - 1];

        if let Some((lower, upper)) = inner.split_once(',') {
            let lower = lower.trim();
            let upper = upper.trim();
            if upper.contains(',') {
                return Err(VersionError::range(spec, "more than two bounds"));
            }
            let range = VersionRange {
                lower: (!lower.is_empty()).then(|| Bound {
                    version: MavenVersion::parse(lower),
                    inclusive: open_inclusive,
                }),
                upper: (!upper.is_empty()).then(|| Bound {
                    version: MavenVersion::parse(upper),
                    inclusive: close_inclusive,
                }),
            };
            if let (Some(lo), Some(hi)) = (&range.lower, &range.upper) {
                if lo.version > hi.version {
                    return Err(VersionError::range(spec, "lower bound exceeds upper bound"));
                }
            }
            Ok(range)
        } else {
            // Exact version: [1.0] means exactly 1.0
            let inner = inner.trim();
            if inner.is_empty() {
                return Err(VersionError::range(spec, "empty range"));
            }
            if !open_inclusive || !close_inclusive {
                return Err(VersionError::range(spec, "single version must use `[v]`"));
            }
            let v = MavenVersion::parse(inner);
            Ok(VersionRange {
                lower: Some(Bound {
                    version: v.clone(),
                    inclusive: true,
                }),
                upper: Some(Bound {
                    version: v,
                    inclusive: true,
                }),
            })
        }
    }

    /// Check if a version satisfies this range.
    pub fn contains(&self, version: &MavenVersion) -> bool {
        if let Some(ref lower) = self.lower {
            let cmp = version.cmp(&lower.version);
            if lower.inclusive {
                if cmp == Ordering::Less {
                    return false;
                }
            } else if cmp != Ordering::Greater {
                return false;
            }
        }
        if let Some(ref upper) = self.upper {
            let cmp = version.cmp(&upper.version);
            if upper.inclusive {
                if cmp == Ordering::Greater {
                    return false;
                }
            } else if cmp != Ordering::Less {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(lo), Some(hi)) = (&self.lower, &self.upper) {
            if lo.inclusive && hi.inclusive && lo.version.original == hi.version.original {
                return write!(f, "[{}]", lo.version);
            }
        }
        match &self.lower {
            Some(lo) => write!(f, "{}{}", if lo.inclusive { '[' } else { '(' }, lo.version)?,
            None => f.write_str("(")?,
        }
        f.write_str(",")?;
        match &self.upper {
            Some(hi) => write!(f, "{}{}", hi.version, if hi.inclusive { ']' } else { ')' }),
            None => f.write_str(")"),
        }
    }
}

/// A requested version: either a concrete (soft) version or a set of
/// ranges that the selected version must fall into.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionConstraint {
    /// A plain version such as `1.2.0`; a recommendation, not a requirement.
    Version(MavenVersion),
    /// One or more ranges; a version matches if any range contains it.
    Ranges(Vec<VersionRange>),
}

impl VersionConstraint {
    /// Parse a version specification.
    ///
    /// Returns `Ok(None)` for an empty specification (unconstrained).
    pub fn parse(spec: &str) -> Result<Option<Self>, VersionError> {
        let s = spec.trim();
        if s.is_empty() {
            return Ok(None);
        }
        if !s.starts_with('[') && !s.starts_with('(') {
            return Ok(Some(VersionConstraint::Version(MavenVersion::parse(s))));
        }
        let ranges = split_ranges(s)?
            .into_iter()
            .map(VersionRange::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(VersionConstraint::Ranges(ranges)))
    }

    /// Whether this constraint restricts the selectable versions.
    pub fn is_hard(&self) -> bool {
        matches!(self, VersionConstraint::Ranges(ranges) if !ranges.is_empty())
    }

    /// Check if a version satisfies this constraint.
    pub fn contains(&self, version: &MavenVersion) -> bool {
        match self {
            VersionConstraint::Version(v) => v == version,
            VersionConstraint::Ranges(ranges) => ranges.iter().any(|r| r.contains(version)),
        }
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionConstraint::Version(v) => write!(f, "{v}"),
            VersionConstraint::Ranges(ranges) => {
                for (i, range) in ranges.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{range}")?;
                }
                Ok(())
            }
        }
    }
}

/// Split `[1.0,1.2),[1.5,)` into its bracketed parts.
fn split_ranges(spec: &str) -> Result<Vec<&str>, VersionError> {
    let mut parts = Vec::new();
    let mut start: Option<usize> = None;

    for (i, ch) in spec.char_indices() {
        match ch {
            '[' | '(' => {
                if start.is_some() {
                    return Err(VersionError::range(spec, "nested range"));
                }
                start = Some(i);
            }
            ']' | ')' => {
                let Some(s) = start.take() else {
                    return Err(VersionError::range(spec, "unbalanced brackets"));
                };
                parts.push(&spec[s..=i]);
            }
            ',' if start.is_none() => {}
            c if start.is_none() && !c.is_whitespace() => {
                return Err(VersionError::range(spec, "text outside of a range"));
            }
            _ => {}
        }
    }
    if start.is_some() {
        return Err(VersionError::range(spec, "unterminated range"));
    }
    Ok(parts)
}
