//! Version numbers with an arbitrary number of numeric parts
//!
//! Versions follow `v?NUM(.NUM)*(-PRE(.PRE)*)?(+BUILD(.BUILD)*)?`. Ordering
//! compares only the numeric parts both operands have: `1.2` and `1.2.7`
//! compare equal. Callers that need the trailing parts to count should
//! [`normalize`](VersionNumber::normalize) both sides to the same length
//! first.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use cadence_core::config::VersionSchema;
use cadence_core::error::VersionError;
use serde::{Deserialize, Serialize};

/// Maximum accepted length of a version string
pub const MAX_VERSION_LEN: usize = 256;

/// A version: numeric parts plus prerelease and build identifiers.
///
/// Build identifiers never take part in comparison or equality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionNumber {
    /// Numeric parts, most significant first
    pub numerical: Vec<u64>,
    /// Prerelease identifiers (`alpha`, `1`)
    pub prerelease: Vec<String>,
    /// Build metadata identifiers
    pub build: Vec<String>,
}

impl VersionNumber {
    /// Create a release version from numeric parts
    pub fn new(numerical: Vec<u64>) -> Self {
        Self {
            numerical,
            prerelease: Vec::new(),
            build: Vec::new(),
        }
    }

    /// Set prerelease identifiers
    pub fn with_prerelease<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerelease = identifiers.into_iter().map(Into::into).collect();
        self
    }

    /// Set build identifiers
    pub fn with_build<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.build = identifiers.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a version string. Any malformed input yields `None`.
    pub fn parse(input: &str) -> Option<Self> {
        if input.len() > MAX_VERSION_LEN {
            return None;
        }
        let rest = input.strip_prefix('v').unwrap_or(input);

        let (rest, build) = match rest.split_once('+') {
            Some((head, build)) => (head, Some(build)),
            None => (rest, None),
        };
        let (core, prerelease) = match rest.split_once('-') {
            Some((head, pre)) => (head, Some(pre)),
            None => (rest, None),
        };

        let numerical = core
            .split('.')
            .map(parse_number)
            .collect::<Option<Vec<u64>>>()?;

        let prerelease = match prerelease {
            Some(pre) => parse_identifiers(pre)?,
            None => Vec::new(),
        };
        let build = match build {
            Some(build) => parse_identifiers(build)?,
            None => Vec::new(),
        };

        Some(Self {
            numerical,
            prerelease,
            build,
        })
    }

    /// Pad with zeros or truncate to exactly `len` numeric parts
    pub fn normalize(&self, len: usize) -> Self {
        let mut numerical = self.numerical.clone();
        numerical.resize(len, 0);
        Self {
            numerical,
            prerelease: self.prerelease.clone(),
            build: self.build.clone(),
        }
    }

    /// Increment the part at `index`, reset less significant parts to zero
    /// and drop prerelease and build identifiers
    pub fn increment(&self, index: usize) -> Result<Self, VersionError> {
        let len = self.numerical.len();
        let current = *self
            .numerical
            .get(index)
            .ok_or(VersionError::InvalidIndex { index, len })?;
        let bumped = current
            .checked_add(1)
            .ok_or(VersionError::Overflow(index))?;

        let numerical = self
            .numerical
            .iter()
            .enumerate()
            .map(|(i, &n)| match i.cmp(&index) {
                Ordering::Less => n,
                Ordering::Equal => bumped,
                Ordering::Greater => 0,
            })
            .collect();

        Ok(Self::new(numerical))
    }

    /// Total comparison over the shared numeric prefix, then prerelease
    pub fn compare(&self, other: &Self) -> Ordering {
        self.numerical
            .iter()
            .zip(&other.numerical)
            .map(|(a, b)| a.cmp(b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
            .then_with(|| compare_prerelease(&self.prerelease, &other.prerelease))
    }

    /// `self > other`
    pub fn gt(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Greater
    }

    /// `self >= other`
    pub fn gte(&self, other: &Self) -> bool {
        self.compare(other) != Ordering::Less
    }

    /// `self < other`
    pub fn lt(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Less
    }

    /// `self <= other`
    pub fn lte(&self, other: &Self) -> bool {
        self.compare(other) != Ordering::Greater
    }

    /// Whether the version carries prerelease identifiers
    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    /// Value of a named schema part; positions past the end read as zero
    pub fn part(&self, schema: &VersionSchema, name: &str) -> Option<u64> {
        let index = schema.index_of(name)?;
        Some(self.numerical.get(index).copied().unwrap_or(0))
    }

    /// Sort ascending in place, keeping the relative order of equal versions
    pub fn sort_ascending(versions: &mut [Self]) {
        // `compare` is not transitive across different lengths, which the
        // standard sorts may reject; a plain insertion sort only needs it to
        // be consistent pairwise.
        for i in 1..versions.len() {
            let mut j = i;
            while j > 0 && versions[j - 1].gt(&versions[j]) {
                versions.swap(j - 1, j);
                j -= 1;
            }
        }
    }

    /// Sort descending in place, keeping the relative order of equal versions
    pub fn sort_descending(versions: &mut [Self]) {
        for i in 1..versions.len() {
            let mut j = i;
            while j > 0 && versions[j - 1].lt(&versions[j]) {
                versions.swap(j - 1, j);
                j -= 1;
            }
        }
    }

    /// Smallest version; the first wins among equals
    pub fn min<'a, I>(versions: I) -> Option<&'a Self>
    where
        I: IntoIterator<Item = &'a Self>,
    {
        versions
            .into_iter()
            .fold(None, |min, v| match min {
                Some(m) if !v.lt(m) => Some(m),
                _ => Some(v),
            })
    }

    /// Largest version; the first wins among equals
    pub fn max<'a, I>(versions: I) -> Option<&'a Self>
    where
        I: IntoIterator<Item = &'a Self>,
    {
        versions
            .into_iter()
            .fold(None, |max, v| match max {
                Some(m) if !v.gt(m) => Some(m),
                _ => Some(v),
            })
    }
}

/// Equality follows [`VersionNumber::compare`]: build metadata and numeric
/// parts beyond the shorter operand are ignored.
impl PartialEq for VersionNumber {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numbers: Vec<String> = self.numerical.iter().map(u64::to_string).collect();
        write!(f, "{}", numbers.join("."))?;
        if !self.prerelease.is_empty() {
            write!(f, "-{}", self.prerelease.join("."))?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build.join("."))?;
        }
        Ok(())
    }
}

impl FromStr for VersionNumber {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| VersionError::InvalidFormat(s.to_string()))
    }
}

fn parse_number(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn parse_identifiers(list: &str) -> Option<Vec<String>> {
    list.split('.')
        .map(|id| {
            let valid = !id.is_empty()
                && id
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-');
            valid.then(|| id.to_string())
        })
        .collect()
}

fn compare_prerelease(a: &[String], b: &[String]) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    a.iter()
        .zip(b)
        .map(|(x, y)| compare_identifier(x, y))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

fn compare_identifier(a: &str, b: &str) -> Ordering {
    let numeric = |s: &str| s.bytes().all(|c| c.is_ascii_digit());
    match (numeric(a), numeric(b)) {
        (true, true) => {
            // compare digit strings without overflowing
            let a = a.trim_start_matches('0');
            let b = b.trim_start_matches('0');
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> VersionNumber {
        VersionNumber::parse(s).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let version = v("1.2.3");
        assert_eq!(version.numerical, vec![1, 2, 3]);
        assert!(version.prerelease.is_empty());
        assert!(version.build.is_empty());
    }

    #[test]
    fn test_parse_arbitrary_length() {
        assert_eq!(v("7").numerical, vec![7]);
        assert_eq!(v("1.2.3.4.5").numerical, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_parse_prefix_and_leading_zeros() {
        let version = v("v01.002.3");
        assert_eq!(version.numerical, vec![1, 2, 3]);
        assert_eq!(version.to_string(), "1.2.3");
    }

    #[test]
    fn test_parse_prerelease_and_build() {
        let version = v("1.0.0-beta.2+sha.5114f85");
        assert_eq!(version.prerelease, vec!["beta", "2"]);
        assert_eq!(version.build, vec!["sha", "5114f85"]);

        let version = v("1.0.0-rc-1");
        assert_eq!(version.prerelease, vec!["rc-1"]);
        assert!(version.build.is_empty());

        let version = v("1.0.0+build-7");
        assert!(version.prerelease.is_empty());
        assert_eq!(version.build, vec!["build-7"]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "", "v", "1.", ".1", "1..2", "1.a", "1.2-", "1.2+", "1.2-a..b", "1.2-a_b", "V1.2",
            "1.2.3 ", "-1", "1.2+x+y", "99999999999999999999",
        ] {
            assert!(VersionNumber::parse(input).is_none(), "accepted {:?}", input);
        }
    }

    #[test]
    fn test_parse_length_limit() {
        let long = vec!["1"; 129].join(".");
        assert!(long.len() > MAX_VERSION_LEN);
        assert!(VersionNumber::parse(&long).is_none());

        let fits = vec!["1"; 128].join(".");
        assert!(VersionNumber::parse(&fits).is_some());
    }

    #[test]
    fn test_print_round_trip() {
        for version in [
            VersionNumber::new(vec![1, 2, 3]),
            VersionNumber::new(vec![0]),
            VersionNumber::new(vec![4, 0, 0, 12]).with_prerelease(["alpha", "1"]),
            VersionNumber::new(vec![2, 1]).with_build(["x86-64"]),
        ] {
            let printed = version.to_string();
            let parsed = v(&printed);
            assert_eq!(parsed, version);
            assert_eq!(parsed.numerical, version.numerical);
            assert_eq!(parsed.build, version.build);
        }
    }

    #[test]
    fn test_from_str() {
        let version: VersionNumber = "2.0.1".parse().unwrap();
        assert_eq!(version.numerical, vec![2, 0, 1]);
        assert!("nope".parse::<VersionNumber>().is_err());
    }

    #[test]
    fn test_part() {
        let schema = VersionSchema::default();
        let version = v("4.5");
        assert_eq!(version.part(&schema, "MAJOR"), Some(4));
        assert_eq!(version.part(&schema, "MINOR"), Some(5));
        assert_eq!(version.part(&schema, "PATCH"), Some(0));
        assert_eq!(version.part(&schema, "BUILD"), None);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(v("1.2").normalize(4).numerical, vec![1, 2, 0, 0]);
        assert_eq!(v("1.2.3.4").normalize(2).numerical, vec![1, 2]);
        assert_eq!(v("1.2.3-rc.1").normalize(3).prerelease, vec!["rc", "1"]);
    }

    #[test]
    fn test_increment() {
        let next = v("1.2.3-rc.1+abc").increment(1).unwrap();
        assert_eq!(next.numerical, vec![1, 3, 0]);
        assert!(next.prerelease.is_empty());
        assert!(next.build.is_empty());

        let next = v("1.2.3.4").increment(0).unwrap();
        assert_eq!(next.numerical, vec![2, 0, 0, 0]);

        let next = v("1.2.3").increment(2).unwrap();
        assert_eq!(next.numerical, vec![1, 2, 4]);
    }

    #[test]
    fn test_increment_resets_lower_parts() {
        let version = v("3.7.9.11");
        for i in 0..4 {
            let next = version.increment(i).unwrap();
            assert_eq!(next.numerical[i], version.numerical[i] + 1);
            for j in 0..i {
                assert_eq!(next.numerical[j], version.numerical[j]);
            }
            for j in (i + 1)..4 {
                assert_eq!(next.numerical[j], 0);
            }
        }
    }

    #[test]
    fn test_increment_invalid_index() {
        assert_eq!(
            v("1.2").increment(2),
            Err(VersionError::InvalidIndex { index: 2, len: 2 })
        );
        assert_eq!(
            VersionNumber::new(vec![u64::MAX]).increment(0),
            Err(VersionError::Overflow(0))
        );
    }

    #[test]
    fn test_compare_numeric() {
        assert!(v("1.0.0").lt(&v("1.0.1")));
        assert!(v("1.1.0").gt(&v("1.0.9")));
        assert!(v("10.0.0").gt(&v("9.9.9")));
        assert!(v("1.2.3").gte(&v("1.2.3")));
        assert!(v("1.2.3").lte(&v("1.2.3")));
    }

    // Trailing numeric parts beyond the shorter operand are deliberately
    // ignored rather than zero-padded.
    #[test]
    fn test_compare_ignores_trailing_parts() {
        assert_eq!(v("1.2").compare(&v("1.2.5")), Ordering::Equal);
        assert_eq!(v("1.2.9.9").compare(&v("1.2")), Ordering::Equal);
        assert!(v("1.3").gt(&v("1.2.99")));
        assert_eq!(v("1.2"), v("1.2.5"));
    }

    #[test]
    fn test_compare_prerelease() {
        assert!(v("1.0.0-alpha").lt(&v("1.0.0")));
        assert!(v("1.0.0-alpha").lt(&v("1.0.0-alpha.1")));
        assert!(v("1.0.0-alpha.1").lt(&v("1.0.0-alpha.beta")));
        assert!(v("1.0.0-beta.2").lt(&v("1.0.0-beta.11")));
        assert!(v("1.0.0-beta.11").lt(&v("1.0.0-rc.1")));
        assert!(v("1.0.0-1").lt(&v("1.0.0-alpha")));
        assert!(v("1.0.0-007").lt(&v("1.0.0-8")));
        assert_eq!(v("1.0.0-01"), v("1.0.0-1"));
        assert!(v("1.0.0-99999999999999999999999").gt(&v("1.0.0-2")));
    }

    #[test]
    fn test_build_ignored() {
        assert_eq!(v("1.0.0+a"), v("1.0.0+b"));
        assert_eq!(v("1.0.0+a").compare(&v("1.0.0")), Ordering::Equal);
        assert!(v("1.0.0-rc.1+zzz").lt(&v("1.0.0+aaa")));
    }

    #[test]
    fn test_trichotomy_and_symmetry() {
        let versions: Vec<VersionNumber> = [
            "1.0.0", "1.0.0-alpha", "1.0.0-alpha.1", "1.0.0-1", "1.1", "0.9.9", "1.0.0+b", "2",
        ]
        .iter()
        .map(|s| v(s))
        .collect();

        for a in &versions {
            for b in &versions {
                let holds = [a.lt(b), a == b, a.gt(b)];
                assert_eq!(holds.iter().filter(|h| **h).count(), 1, "{} vs {}", a, b);
                assert_eq!(a.gt(b), b.lt(a));
            }
        }
    }

    #[test]
    fn test_sorting() {
        let mut versions = vec![v("1.10.0"), v("1.2.0"), v("1.2.0-rc.1"), v("0.1.0")];

        VersionNumber::sort_ascending(&mut versions);
        let printed: Vec<String> = versions.iter().map(ToString::to_string).collect();
        assert_eq!(printed, vec!["0.1.0", "1.2.0-rc.1", "1.2.0", "1.10.0"]);

        VersionNumber::sort_descending(&mut versions);
        let printed: Vec<String> = versions.iter().map(ToString::to_string).collect();
        assert_eq!(printed, vec!["1.10.0", "1.2.0", "1.2.0-rc.1", "0.1.0"]);
    }

    #[test]
    fn test_min_max() {
        let versions = vec![v("2.0.0"), v("3.0.0-rc.1"), v("1.5.0"), v("3.0.0")];
        assert_eq!(VersionNumber::max(&versions).unwrap().to_string(), "3.0.0");
        assert_eq!(VersionNumber::min(&versions).unwrap().to_string(), "1.5.0");
        assert!(VersionNumber::max(&Vec::<VersionNumber>::new()).is_none());
    }

    #[test]
    fn test_serde() {
        let version = v("1.2.3-rc.1");
        let json = serde_json::to_string(&version).unwrap();
        let back: VersionNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back.prerelease, version.prerelease);
    }
}
