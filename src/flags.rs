//! Flag and alias model (§4.A).
//!
//! A [`Flag`] is an opaque token identifying an affix class or a boolean
//! directive. Hunspell affix files choose one of four encodings for flag
//! strings, set via the `FLAG` directive; we normalize all four into a
//! single `u32` representation so the rest of the engine never needs to
//! know which encoding produced a given [`FlagSet`].

use std::collections::BTreeSet;
use std::fmt;

/// An opaque affix-class or directive flag.
///
/// Regardless of source encoding, a flag collapses to a `u32`: a single
/// Unicode scalar's code point (`short`/`UTF-8`), a packed pair of two
/// scalars (`long`), or a parsed decimal integer (`numeric`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Flag(pub u32);

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four flag encodings a `FLAG` directive can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagEncoding {
    /// Each Unicode scalar is its own flag (the default when `FLAG` is
    /// absent).
    #[default]
    Short,
    /// Identical to `Short` for our purposes; historically distinguished
    /// non-ASCII single-scalar flags.
    Utf8,
    /// Flags are consecutive two-scalar pairs.
    Long,
    /// Flags are comma-separated decimal integers.
    Numeric,
}

impl FlagEncoding {
    /// Parse the `FLAG` directive's argument (e.g. `"long"`, `"UTF-8"`).
    #[must_use]
    pub fn parse(arg: &str) -> Self {
        match arg.trim() {
            "long" => Self::Long,
            "num" | "numeric" => Self::Numeric,
            "UTF-8" | "utf-8" => Self::Utf8,
            _ => Self::Short,
        }
    }
}

/// An unordered set of flags.
///
/// Backed by a [`BTreeSet`] rather than a hash set: flag sets are small,
/// and deterministic iteration order keeps snapshot-style tests (and
/// `Debug` output generally) stable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlagSet(BTreeSet<Flag>);

impl FlagSet {
    /// The empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this set contains no flags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `flag` is a member.
    #[must_use]
    pub fn contains(&self, flag: Flag) -> bool {
        self.0.contains(&flag)
    }

    /// Insert `flag`, returning whether it was newly inserted.
    pub fn insert(&mut self, flag: Flag) -> bool {
        self.0.insert(flag)
    }

    /// Iterate over the contained flags.
    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        self.0.iter().copied()
    }

    /// Number of flags in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `self` and `other` share no flags.
    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.0.is_disjoint(&other.0)
    }

    /// `self` contains every flag in `other`.
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        self.0.is_superset(&other.0)
    }

    /// `self` and `other` share at least one flag.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_disjoint(other)
    }

    /// Union of `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).copied().collect())
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<T: IntoIterator<Item = Flag>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Flag> for FlagSet {
    fn extend<T: IntoIterator<Item = Flag>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

/// Two indexed arrays resolving numeric `AF`/`AM` references in source
/// text, 1-indexed per the `.aff` format (index `0` is unused).
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    af: Vec<FlagSet>,
    am: Vec<BTreeSet<String>>,
}

impl AliasTable {
    /// A table with no aliases registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the flag set at `AF` index `idx` (1-indexed, pushed in
    /// order so index `n` is the `n`th call).
    pub fn push_af(&mut self, set: FlagSet) {
        self.af.push(set);
    }

    /// Register the morphological tag set at `AM` index `idx`.
    pub fn push_am(&mut self, set: BTreeSet<String>) {
        self.am.push(set);
    }

    /// Resolve a 1-indexed `AF` reference, if in range.
    #[must_use]
    pub fn resolve_af(&self, idx: usize) -> Option<&FlagSet> {
        idx.checked_sub(1).and_then(|i| self.af.get(i))
    }

    /// Resolve a 1-indexed `AM` reference, if in range.
    #[must_use]
    pub fn resolve_am(&self, idx: usize) -> Option<&BTreeSet<String>> {
        idx.checked_sub(1).and_then(|i| self.am.get(i))
    }
}

/// Parses a flag *string* (the right-hand side of a `/` in a dictionary
/// entry, or a `PFX`/`SFX` header's flag column) under a given encoding,
/// expanding a bare numeric `AF` reference along the way.
#[must_use]
pub fn parse_flags(s: &str, encoding: FlagEncoding, aliases: &AliasTable) -> FlagSet {
    let s = s.trim();
    if s.is_empty() {
        return FlagSet::new();
    }

    // A purely numeric token indexes AF and expands to that alias's set,
    // taking priority over any encoding-specific reading of the string.
    if let Ok(idx) = s.parse::<usize>() {
        if let Some(set) = aliases.resolve_af(idx) {
            return set.clone();
        }
    }

    match encoding {
        FlagEncoding::Short | FlagEncoding::Utf8 => {
            s.chars().map(|c| Flag(c as u32)).collect()
        }
        FlagEncoding::Long => s
            .chars()
            .collect::<Vec<_>>()
            .chunks(2)
            .map(|pair| {
                let lo = pair.first().copied().unwrap_or_default() as u32;
                let hi = pair.get(1).copied().unwrap_or_default() as u32;
                Flag((lo << 16) | hi)
            })
            .collect(),
        FlagEncoding::Numeric => s
            .split(',')
            .filter_map(|tok| tok.trim().parse::<u32>().ok())
            .map(Flag)
            .collect(),
    }
}

/// Parse a single flag (the first element of [`parse_flags`]'s result),
/// used e.g. for a `PFX`/`SFX` header's class column, which is always
/// exactly one flag.
#[must_use]
pub fn parse_flag(s: &str, encoding: FlagEncoding, aliases: &AliasTable) -> Option<Flag> {
    parse_flags(s, encoding, aliases).iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("A", FlagEncoding::Short, vec![Flag('A' as u32)])]
    #[case("AB", FlagEncoding::Short, vec![Flag('A' as u32), Flag('B' as u32)])]
    #[case("ABCD", FlagEncoding::Long, vec![Flag((('A' as u32) << 16) | 'B' as u32), Flag((('C' as u32) << 16) | 'D' as u32)])]
    #[case("1,2,3", FlagEncoding::Numeric, vec![Flag(1), Flag(2), Flag(3)])]
    fn test_parse_flags(
        #[case] input: &str,
        #[case] encoding: FlagEncoding,
        #[case] expected: Vec<Flag>,
    ) {
        let aliases = AliasTable::new();
        let set = parse_flags(input, encoding, &aliases);
        let expected: FlagSet = expected.into_iter().collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_numeric_token_expands_via_af() {
        let mut aliases = AliasTable::new();
        aliases.push_af([Flag('X' as u32), Flag('Y' as u32)].into_iter().collect());

        let set = parse_flags("1", FlagEncoding::Short, &aliases);
        assert!(set.contains(Flag('X' as u32)));
        assert!(set.contains(Flag('Y' as u32)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_flagset_set_operations() {
        let a: FlagSet = [Flag(1), Flag(2)].into_iter().collect();
        let b: FlagSet = [Flag(2), Flag(3)].into_iter().collect();

        assert!(a.intersects(&b));
        assert!(!a.is_disjoint(&b));
        assert_eq!(a.union(&b).len(), 3);

        let empty = FlagSet::new();
        assert!(a.is_disjoint(&empty));
        assert!(empty.is_empty());
    }
}
