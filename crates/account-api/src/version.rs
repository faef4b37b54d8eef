//! Platform version parsing and constraint matching.
//!
//! Platform releases carry four numeric segments (`6.5.8.2`). Parsing and
//! ordering are done by the `versions` crate; this module adds the
//! constraint grammar on top. Shorter versions are padded with zeros.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use versions::Chunk;

const PLATFORM_SEGMENTS: usize = 4;

/// Errors from parsing versions or constraints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("malformed version: {0:?}")]
    InvalidVersion(String),

    #[error("malformed constraint: {0:?}")]
    InvalidConstraint(String),
}

/// A parsed version such as `6.4.20.1` or `6.5.0.0-rc2`.
#[derive(Debug, Clone)]
pub struct Version(versions::Version);

impl Version {
    fn is_prerelease(&self) -> bool {
        self.0.release.is_some()
    }

    fn segment_count(&self) -> usize {
        self.0.chunks.0.len()
    }

    fn segment(&self, i: usize) -> u32 {
        match self.0.chunks.0.get(i) {
            Some(Chunk::Numeric(n)) => *n,
            _ => 0,
        }
    }

    fn cmp_segments(&self, other: &Self) -> Ordering {
        let len = self.segment_count().max(other.segment_count());
        (0..len)
            .map(|i| self.segment(i).cmp(&other.segment(i)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl Version {
    /// Parses `s` and also returns how many segments it spelled out.
    fn parse_counted(s: &str) -> Result<(Self, usize), VersionError> {
        let invalid = || VersionError::InvalidVersion(s.to_string());
        let raw = s.trim();
        let raw = raw.strip_prefix('v').unwrap_or(raw);

        // `6.5.0.0RC1` is read as `6.5.0.0-RC1`.
        let end = raw
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(raw.len());
        let raw = if raw[end..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            format!("{}-{}", &raw[..end], &raw[end..])
        } else {
            raw.to_string()
        };

        let mut inner = versions::Version::new(&raw).ok_or_else(invalid)?;
        // Release segments must be numbers; `bad-version` parses as a word otherwise.
        let numeric = inner
            .chunks
            .0
            .iter()
            .all(|c| matches!(c, Chunk::Numeric(_)));
        if inner.epoch.is_some() || inner.chunks.0.is_empty() || !numeric {
            return Err(invalid());
        }

        let given = inner.chunks.0.len();
        while inner.chunks.0.len() < PLATFORM_SEGMENTS {
            inner.chunks.0.push(Chunk::Numeric(0));
        }
        Ok((Self(inner), given))
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_counted(s).map(|(version, _)| version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    /// `~>` and `~`: the last given segment may grow.
    Tilde,
    /// `^`: everything up to the first non-zero segment is fixed.
    Caret,
}

const OPERATORS: [(&str, Operator); 10] = [
    ("~>", Operator::Tilde),
    (">=", Operator::Ge),
    ("<=", Operator::Le),
    ("!=", Operator::Ne),
    ("==", Operator::Eq),
    ("=", Operator::Eq),
    (">", Operator::Gt),
    ("<", Operator::Lt),
    ("~", Operator::Tilde),
    ("^", Operator::Caret),
];

#[derive(Debug, Clone)]
enum Clause {
    Compare {
        op: Operator,
        version: Version,
        /// Segments written in the clause, before padding.
        given: usize,
    },
    /// `6.4.*`; an empty prefix (`*`) matches every release.
    Wildcard(Vec<u32>),
}

impl Clause {
    fn parse(token: &str) -> Result<Self, VersionError> {
        let invalid = || VersionError::InvalidConstraint(token.to_string());

        let (op, rest) = OPERATORS
            .iter()
            .find_map(|(sym, op)| token.strip_prefix(sym).map(|rest| (*op, rest)))
            .unwrap_or((Operator::Eq, token));
        let rest = rest.trim();

        if rest == "*" || rest.ends_with(".*") {
            if op != Operator::Eq {
                return Err(invalid());
            }
            let prefix = rest.trim_end_matches('*').trim_end_matches('.');
            let segments = if prefix.is_empty() {
                Vec::new()
            } else {
                prefix
                    .split('.')
                    .map(|s| s.parse::<u32>().map_err(|_| invalid()))
                    .collect::<Result<_, _>>()?
            };
            return Ok(Clause::Wildcard(segments));
        }

        let (version, given) = Version::parse_counted(rest).map_err(|_| invalid())?;
        Ok(Clause::Compare { op, version, given })
    }

    fn check(&self, v: &Version) -> bool {
        match self {
            Clause::Wildcard(prefix) => {
                !v.is_prerelease() && prefix.iter().enumerate().all(|(i, s)| v.segment(i) == *s)
            }
            Clause::Compare { op, version: c, given } => {
                // A pre-release only matches clauses aimed at that exact release line.
                if v.is_prerelease()
                    && *op != Operator::Ne
                    && (!c.is_prerelease() || v.cmp_segments(c).is_ne())
                {
                    return false;
                }
                match op {
                    Operator::Eq => v == c,
                    Operator::Ne => v != c,
                    Operator::Gt => v > c,
                    Operator::Ge => v >= c,
                    Operator::Lt => v < c,
                    Operator::Le => v <= c,
                    Operator::Tilde => {
                        let fixed = given.saturating_sub(1).max(1);
                        v >= c && (0..fixed).all(|i| v.segment(i) == c.segment(i))
                    }
                    Operator::Caret => {
                        let fixed = (0..*given)
                            .position(|i| c.segment(i) != 0)
                            .map_or(*given, |i| i + 1);
                        v >= c && (0..fixed).all(|i| v.segment(i) == c.segment(i))
                    }
                }
            }
        }
    }
}

/// A parsed constraint such as `>=6.4.0.0, <6.6.0.0 || ~6.7`.
///
/// Clauses separated by commas or whitespace must all hold; groups
/// separated by `||` are alternatives.
#[derive(Debug, Clone)]
pub struct Constraints {
    groups: Vec<Vec<Clause>>,
    original: String,
}

impl Constraints {
    /// Returns true if `version` satisfies at least one group.
    pub fn check(&self, version: &Version) -> bool {
        self.groups
            .iter()
            .any(|group| group.iter().all(|clause| clause.check(version)))
    }
}

/// Splits a group into clause tokens, joining a bare operator with the
/// version that follows it (`>= 6.4` becomes `>=6.4`).
fn clause_tokens(group: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut pending_op = false;
    for word in group.split([',', ' ', '\t']).filter(|w| !w.is_empty()) {
        if pending_op && let Some(last) = tokens.last_mut() {
            last.push_str(word);
            pending_op = false;
            continue;
        }
        pending_op = OPERATORS.iter().any(|(sym, _)| word == *sym);
        tokens.push(word.to_string());
    }
    tokens
}

impl FromStr for Constraints {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let groups = s
            .split("||")
            .map(|group| {
                let tokens = clause_tokens(group);
                if tokens.is_empty() {
                    return Err(VersionError::InvalidConstraint(s.to_string()));
                }
                tokens.iter().map(|t| Clause::parse(t)).collect()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            groups,
            original: s.trim().to_string(),
        })
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
