//! Glob patterns over dotted logger names
//!
//! Names are matched segment-wise: `*` stays inside one segment, `**` spans
//! any number of segments and `?` is one character. Dots become path
//! separators before compiling, so `globset` does the segment handling.

use super::error::{LoggerError, Result};
use globset::{GlobBuilder, GlobMatcher};

#[derive(Debug, Clone)]
enum Matcher {
    Everything,
    RootOnly,
    Globs(Vec<GlobMatcher>),
}

/// A compiled logger-name pattern.
///
/// ```
/// use rust_logger_hierarchy::core::NamePattern;
///
/// let pattern = NamePattern::compile("app.*.db").unwrap();
/// assert!(pattern.matches("app.users.db"));
/// assert!(!pattern.matches("app.users.cache.db"));
///
/// let subtree = NamePattern::compile("app.**").unwrap();
/// assert!(subtree.matches("app"));
/// assert!(subtree.matches("app.users.cache.db"));
/// ```
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    matcher: Matcher,
}

impl NamePattern {
    pub fn compile(pattern: &str) -> Result<Self> {
        let trimmed = pattern.trim();
        let matcher = match trimmed {
            "*" | "**" => Matcher::Everything,
            "" => Matcher::RootOnly,
            _ => {
                let path = trimmed.replace('.', "/");
                let mut sources = vec![path.clone()];
                if let Some(prefix) = path.strip_suffix("/**") {
                    if !prefix.is_empty() {
                        sources.push(prefix.to_string());
                    }
                }

                let globs = sources
                    .iter()
                    .map(|source| {
                        GlobBuilder::new(source)
                            .literal_separator(true)
                            .backslash_escape(true)
                            .build()
                            .map(|glob| glob.compile_matcher())
                            .map_err(|e| LoggerError::pattern(pattern, e))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Matcher::Globs(globs)
            }
        };

        Ok(Self {
            source: pattern.to_string(),
            matcher,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the logger called `name` (empty for the root) matches
    pub fn matches(&self, name: &str) -> bool {
        match &self.matcher {
            Matcher::Everything => true,
            Matcher::RootOnly => name.is_empty(),
            Matcher::Globs(_) if name.is_empty() => false,
            Matcher::Globs(globs) => {
                let path = name.replace('.', "/");
                globs.iter().any(|glob| glob.is_match(&path))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_star_matches_everything() {
        for source in ["*", "**", " * "] {
            let pattern = NamePattern::compile(source).unwrap();
            assert!(pattern.matches(""));
            assert!(pattern.matches("a"));
            assert!(pattern.matches("a.b.c"));
        }
    }

    #[test]
    fn test_empty_matches_root_only() {
        let pattern = NamePattern::compile("").unwrap();
        assert!(pattern.matches(""));
        assert!(!pattern.matches("a"));
    }

    #[test]
    fn test_single_segment_wildcard() {
        let pattern = NamePattern::compile("a.*").unwrap();
        assert!(pattern.matches("a.b"));
        assert!(!pattern.matches("a"));
        assert!(!pattern.matches("a.b.c"));
        assert!(!pattern.matches("ab"));
        assert!(!pattern.matches(""));
    }

    #[test]
    fn test_double_star_spans_segments() {
        let pattern = NamePattern::compile("a.**.d").unwrap();
        assert!(pattern.matches("a.d"));
        assert!(pattern.matches("a.b.c.d"));
        assert!(!pattern.matches("a.b.c"));

        let leading = NamePattern::compile("**.db").unwrap();
        assert!(leading.matches("db"));
        assert!(leading.matches("app.db"));
        assert!(!leading.matches("app.dbx"));
    }

    #[test]
    fn test_trailing_double_star_includes_prefix() {
        let pattern = NamePattern::compile("a.b.**").unwrap();
        assert!(pattern.matches("a.b"));
        assert!(pattern.matches("a.b.c.d"));
        assert!(!pattern.matches("a"));
        assert!(!pattern.matches("a.bc"));
    }

    #[test]
    fn test_question_mark_within_segment() {
        let pattern = NamePattern::compile("svc?.http").unwrap();
        assert!(pattern.matches("svc1.http"));
        assert!(!pattern.matches("svc.http"));
        assert!(!pattern.matches("svc12.http"));
    }

    #[test]
    fn test_malformed_pattern() {
        let err = NamePattern::compile("a.[b").unwrap_err();
        match err {
            LoggerError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "a.[b"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
