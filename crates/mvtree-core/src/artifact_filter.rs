//! Inclusion predicates over artifact coordinates.

use globset::{Glob, GlobMatcher};
use mvtree_util::errors::MvtreeError;

use crate::coordinate::Coordinate;

/// Decides whether an artifact may appear in a resolved tree.
pub trait ArtifactFilter: Send + Sync {
    fn include(&self, coordinate: &Coordinate) -> bool;
}

impl<F> ArtifactFilter for F
where
    F: Fn(&Coordinate) -> bool + Send + Sync,
{
    fn include(&self, coordinate: &Coordinate) -> bool {
        self(coordinate)
    }
}

/// Matches coordinates against `group[:artifact[:type[:version]]]` patterns
/// whose segments may use glob wildcards.
///
/// A coordinate is included when any pattern matches. Omitted trailing
/// segments match anything; an empty pattern list includes everything.
#[derive(Debug, Clone)]
pub struct PatternArtifactFilter {
    patterns: Vec<ArtifactPattern>,
}

#[derive(Debug, Clone)]
struct ArtifactPattern {
    segments: Vec<GlobMatcher>,
}

const MAX_SEGMENTS: usize = 4;

impl PatternArtifactFilter {
    pub fn new<I, S>(patterns: I) -> Result<Self, MvtreeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| ArtifactPattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl ArtifactPattern {
    fn parse(pattern: &str) -> Result<Self, MvtreeError> {
        let invalid = |message: &str| MvtreeError::Filter {
            pattern: pattern.to_string(),
            message: message.to_string(),
        };
        let raw: Vec<&str> = pattern.trim().split(':').collect();
        if raw.len() > MAX_SEGMENTS {
            return Err(invalid("too many segments"));
        }
        let mut segments = Vec::with_capacity(raw.len());
        for seg in raw {
            if seg.trim().is_empty() {
                return Err(invalid("empty segment"));
            }
            let glob = Glob::new(seg.trim()).map_err(|e| invalid(&e.to_string()))?;
            segments.push(glob.compile_matcher());
        }
        Ok(Self { segments })
    }

    fn matches(&self, coordinate: &Coordinate) -> bool {
        let fields = [
            coordinate.group_id.as_str(),
            coordinate.artifact_id.as_str(),
            coordinate.type_.as_str(),
            coordinate.version.as_str(),
        ];
        self.segments
            .iter()
            .zip(fields)
            .all(|(glob, field)| glob.is_match(field))
    }
}

impl ArtifactFilter for PatternArtifactFilter {
    fn include(&self, coordinate: &Coordinate) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(coordinate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_only_pattern() {
        let filter = PatternArtifactFilter::new(["org.apache.*"]).unwrap();
        assert!(filter.include(&Coordinate::new("org.apache.commons", "lang3", "3.0")));
        assert!(!filter.include(&Coordinate::new("com.google", "guava", "32.0")));
    }

    #[test]
    fn full_pattern_with_version_glob() {
        let filter = PatternArtifactFilter::new(["com.google:guava:jar:32.*"]).unwrap();
        assert!(filter.include(&Coordinate::new("com.google", "guava", "32.1.0")));
        assert!(!filter.include(&Coordinate::new("com.google", "guava", "31.0")));
    }

    #[test]
    fn empty_filter_includes_everything() {
        let filter = PatternArtifactFilter::new(Vec::<String>::new()).unwrap();
        assert!(filter.is_empty());
        assert!(filter.include(&Coordinate::new("x", "y", "1")));
    }

    #[test]
    fn invalid_patterns_are_filter_errors() {
        let err = PatternArtifactFilter::new(["a:b:c:d:e"]).unwrap_err();
        assert!(matches!(err, MvtreeError::Filter { .. }));
        assert!(PatternArtifactFilter::new(["org::lib"]).is_err());
    }

    #[test]
    fn closures_are_filters() {
        let only_lib = |c: &Coordinate| c.artifact_id == "lib";
        assert!(only_lib.include(&Coordinate::new("g", "lib", "1")));
        assert!(!only_lib.include(&Coordinate::new("g", "other", "1")));
    }
}
