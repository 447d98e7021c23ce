//! Package version types and constraint matching.
//!
//! Provides the Version and Constraint types used to pick the best
//! published artifact among multiple uploaded versions. Versions are
//! two- or three-component dotted integers; the original input string
//! is kept for display so "1.0" round-trips as "1.0", not "1.0.0".

use crate::error::{ParcelError, ParcelResult};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Package version (major.minor[.patch])
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    raw: String,
}

/// Comparison operator for version constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Exact,     // =1.0.0
    Greater,   // >1.0.0
    GreaterEq, // >=1.0.0
    Less,      // <1.0.0
    LessEq,    // <=1.0.0
}

/// Version constraint (>=1.0.0, <=2.0.0, 1.0.0)
#[derive(Debug, Clone)]
pub struct Constraint {
    pub op: Op,
    pub target: Version,
}

impl Version {
    /// Create a version from components; the display form is the
    /// canonical three-part rendering.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            raw: format!("{}.{}.{}", major, minor, patch),
        }
    }

    /// The version string as it was parsed
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Check if this version satisfies a constraint string.
    ///
    /// An empty or whitespace-only constraint matches any version. A
    /// constraint whose target fails to parse matches nothing; the parse
    /// failure is not surfaced to the caller.
    pub fn satisfies(&self, constraint: &str) -> bool {
        match Constraint::parse(constraint) {
            Ok(None) => true,
            Ok(Some(c)) => c.matches(self),
            Err(_) => false,
        }
    }
}

impl FromStr for Version {
    type Err = ParcelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(ParcelError::InvalidFormat {
                input: s.to_string(),
            });
        }

        let major = parse_component(parts[0], s)?;
        let minor = parse_component(parts[1], s)?;
        // Missing patch defaults to 0
        let patch = if parts.len() == 3 {
            parse_component(parts[2], s)?
        } else {
            0
        };

        Ok(Version {
            major,
            minor,
            patch,
            raw: s.to_string(),
        })
    }
}

fn parse_component(part: &str, input: &str) -> ParcelResult<u64> {
    part.parse().map_err(|_| ParcelError::InvalidFormat {
        input: input.to_string(),
    })
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// Equality and ordering are over (major, minor, patch) only; the raw
// string is display metadata, so "1.0" == "1.0.0".
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        (self.major, self.minor, self.patch) == (other.major, other.minor, other.patch)
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl Constraint {
    /// Parse a constraint string.
    ///
    /// Returns `Ok(None)` for an empty or whitespace-only input, which is
    /// the universal constraint. Operator prefixes are recognized in the
    /// order `>=`, `<=`, `>`, `<`, `=`; a bare version means exact match.
    pub fn parse(input: &str) -> ParcelResult<Option<Self>> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        let (op, target_str) = if let Some(stripped) = input.strip_prefix(">=") {
            (Op::GreaterEq, stripped)
        } else if let Some(stripped) = input.strip_prefix("<=") {
            (Op::LessEq, stripped)
        } else if let Some(stripped) = input.strip_prefix(">") {
            (Op::Greater, stripped)
        } else if let Some(stripped) = input.strip_prefix("<") {
            (Op::Less, stripped)
        } else if let Some(stripped) = input.strip_prefix("=") {
            (Op::Exact, stripped)
        } else {
            (Op::Exact, input)
        };

        let target = Version::from_str(target_str.trim())?;
        Ok(Some(Constraint { op, target }))
    }

    /// Check if a version matches this constraint
    pub fn matches(&self, version: &Version) -> bool {
        match self.op {
            Op::Exact => version == &self.target,
            Op::Greater => version > &self.target,
            Op::GreaterEq => version >= &self.target,
            Op::Less => version < &self.target,
            Op::LessEq => version <= &self.target,
        }
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn version_round_trip(
            major in 0u64..1000,
            minor in 0u64..1000,
            patch in prop::option::of(0u64..1000),
        ) {
            let raw = match patch {
                Some(p) => format!("{}.{}.{}", major, minor, p),
                None => format!("{}.{}", major, minor),
            };

            let parsed = Version::from_str(&raw).unwrap();
            prop_assert_eq!(parsed.major, major);
            prop_assert_eq!(parsed.minor, minor);
            prop_assert_eq!(parsed.patch, patch.unwrap_or(0));
            // Display must preserve the input verbatim
            prop_assert_eq!(parsed.to_string(), raw);
        }
    }

    proptest! {
        #[test]
        fn version_comparison_transitivity(
            a_major in 0u64..100,
            a_minor in 0u64..100,
            a_patch in 0u64..100,
            b_major in 0u64..100,
            b_minor in 0u64..100,
            b_patch in 0u64..100,
            c_major in 0u64..100,
            c_minor in 0u64..100,
            c_patch in 0u64..100,
        ) {
            let a = Version::new(a_major, a_minor, a_patch);
            let b = Version::new(b_major, b_minor, b_patch);
            let c = Version::new(c_major, c_minor, c_patch);

            if a < b && b < c {
                prop_assert!(a < c);
            }

            if a > b && b > c {
                prop_assert!(a > c);
            }
        }
    }
}
