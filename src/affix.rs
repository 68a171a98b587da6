//! Affix tables: prefix/suffix entries with strip, add, condition, and
//! cross-product (§4.D).
//!
//! Conditions use a deliberately tiny regex dialect — `[abc]`, `[^abc]`,
//! single characters, and `.` — implemented directly rather than via a
//! general regex engine, per spec note §9 ("Hunspell condition strings can
//! be frequent and tiny").

use crate::flags::{Flag, FlagSet};
use crate::trie::Trie;

/// One token of a parsed condition pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConditionToken {
    /// `.` — matches any single character.
    Any,
    /// A literal character.
    Char(char),
    /// `[abc]` — matches any of the listed characters.
    Class(Vec<char>),
    /// `[^abc]` — matches any character *not* listed.
    NegatedClass(Vec<char>),
}

impl ConditionToken {
    fn matches(&self, c: char) -> bool {
        match self {
            Self::Any => true,
            Self::Char(expected) => *expected == c,
            Self::Class(set) => set.contains(&c),
            Self::NegatedClass(set) => !set.contains(&c),
        }
    }
}

/// A compiled affix condition: a sequence of [`ConditionToken`]s that
/// must match, anchored, against the stem substring adjacent to the
/// affix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    tokens: Vec<ConditionToken>,
}

impl Condition {
    /// The always-true condition (`.` is Hunspell's own default when a
    /// row omits the condition column).
    #[must_use]
    pub fn any() -> Self {
        Self {
            tokens: vec![ConditionToken::Any],
        }
    }

    /// Parse a condition pattern from the tiny dialect above.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let mut tokens = Vec::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '.' => tokens.push(ConditionToken::Any),
                '[' => {
                    let negated = chars.peek() == Some(&'^');
                    if negated {
                        chars.next();
                    }
                    let mut set = Vec::new();
                    for c in chars.by_ref() {
                        if c == ']' {
                            break;
                        }
                        set.push(c);
                    }
                    tokens.push(if negated {
                        ConditionToken::NegatedClass(set)
                    } else {
                        ConditionToken::Class(set)
                    });
                }
                other => tokens.push(ConditionToken::Char(other)),
            }
        }

        if tokens.is_empty() {
            return Self::any();
        }

        Self { tokens }
    }

    /// Whether `s` matches this condition in full (the condition is
    /// anchored at both ends of `s`, which is the stem substring adjacent
    /// to where the affix attaches).
    #[must_use]
    pub fn matches(&self, s: &str) -> bool {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != self.tokens.len() {
            return false;
        }
        chars
            .iter()
            .zip(self.tokens.iter())
            .all(|(c, tok)| tok.matches(*c))
    }
}

/// Which side of the word an affix attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// A prefix, attaching at the start.
    Prefix,
    /// A suffix, attaching at the end.
    Suffix,
}

/// A single prefix or suffix entry (one row under a `PFX`/`SFX` header).
#[derive(Debug, Clone)]
pub struct AffixEntry {
    /// Which side this entry attaches to.
    pub side: Side,
    /// The class flag this entry belongs to.
    pub class: Flag,
    /// Characters removed from the stem at this side before `add` is
    /// attached (empty if the row's strip column was `0`).
    pub strip: String,
    /// Characters attached to produce the surface form.
    pub add: String,
    /// The condition the stem must satisfy at this side.
    pub condition: Condition,
    /// Whether this entry may combine with an affix of the opposite
    /// side on the same word (the header's cross-product bit).
    pub crossproduct: bool,
    /// Flags contributed to the form when this affix applies.
    pub flags: FlagSet,
}

impl AffixEntry {
    /// Whether `surface` could have been produced by this entry: it has
    /// the right `add` at the right side, and the portion that would
    /// remain after restoring `strip` satisfies the condition.
    #[must_use]
    pub fn on(&self, surface: &str) -> bool {
        let stripped = match self.side {
            Side::Prefix => surface.strip_prefix(self.add.as_str()),
            Side::Suffix => surface.strip_suffix(self.add.as_str()),
        };
        let Some(stripped) = stripped else {
            return false;
        };

        let restored = match self.side {
            Side::Prefix => format!("{}{stripped}", self.strip),
            Side::Suffix => format!("{stripped}{}", self.strip),
        };

        // The condition examines only the portion of the restored stem
        // adjacent to this affix's side, sized to the condition's own
        // token count when that's smaller than the whole restored stem.
        self.condition.matches(&restored) || self.condition_matches_adjacent(&restored)
    }

    fn condition_matches_adjacent(&self, restored: &str) -> bool {
        // Hunspell conditions are often shorter than the stem (e.g. a
        // single trailing-consonant check); match against the maximal
        // suffix/prefix of `restored` the condition's token count covers.
        let n = self.condition_len();
        let chars: Vec<char> = restored.chars().collect();
        if n == 0 || n > chars.len() {
            return false;
        }
        let slice: String = match self.side {
            Side::Prefix => chars[..n].iter().collect(),
            Side::Suffix => chars[chars.len() - n..].iter().collect(),
        };
        self.condition.matches(&slice)
    }

    fn condition_len(&self) -> usize {
        self.condition.tokens.len()
    }

    /// Whether this entry's condition matches `stem` directly (as opposed
    /// to [`Self::on`], which tests a surface and restores strip first).
    /// This is the `relevant(stem)` predicate from §3's Word invariant,
    /// used to precompute each [`crate::dictionary::Word`]'s relevant
    /// affix sets at build time.
    #[must_use]
    pub fn relevant(&self, stem: &str) -> bool {
        self.condition.matches(stem) || self.condition_matches_adjacent(stem)
    }

    /// Given a surface this entry applies to, return the stem it was
    /// derived from (inverse of `apply`: strip `add`, restore `strip`).
    #[must_use]
    pub fn apply(&self, surface: &str) -> Option<String> {
        let stripped = match self.side {
            Side::Prefix => surface.strip_prefix(self.add.as_str())?,
            Side::Suffix => surface.strip_suffix(self.add.as_str())?,
        };
        Some(match self.side {
            Side::Prefix => format!("{}{stripped}", self.strip),
            Side::Suffix => format!("{stripped}{}", self.strip),
        })
    }

    /// Given a stem, produce the surface this entry would create
    /// (forward direction, used by the round-trip invariant and by
    /// generation-style callers).
    #[must_use]
    pub fn produce(&self, stem: &str) -> Option<String> {
        let without_strip = match self.side {
            Side::Prefix => stem.strip_prefix(self.strip.as_str())?,
            Side::Suffix => stem.strip_suffix(self.strip.as_str())?,
        };
        Some(match self.side {
            Side::Prefix => format!("{}{without_strip}", self.add),
            Side::Suffix => format!("{without_strip}{}", self.add),
        })
    }

    /// Whether this entry is compatible with a form that already
    /// `required`-s and `forbidden`-s a set of flags: an empty `required`
    /// means "any"; otherwise this entry's flags must intersect
    /// `required`, and must be disjoint from `forbidden`.
    #[must_use]
    pub fn compatible(&self, required: &FlagSet, forbidden: &FlagSet) -> bool {
        let required_ok = required.is_empty() || self.flags.intersects(required);
        required_ok && self.flags.is_disjoint(forbidden)
    }
}

/// The full prefix/suffix tables for an engine: class flag → set of
/// entries, plus the tries built over them for lookup by substring.
#[derive(Debug, Clone, Default)]
pub struct AffixTables {
    /// Forward-keyed: indexed on `add` as written, for prefix lookup.
    prefix_trie: Trie<usize>,
    /// Reverse-keyed: indexed on the *reversed* `add`, for suffix lookup;
    /// callers pass reversed surfaces.
    suffix_trie: Trie<usize>,
    all_prefixes: Vec<AffixEntry>,
    all_suffixes: Vec<AffixEntry>,
}

impl AffixTables {
    /// Build tables (and their tries) from a flat list of parsed entries.
    #[must_use]
    pub fn build(entries: Vec<AffixEntry>) -> Self {
        let mut tables = Self::default();

        for entry in entries {
            match entry.side {
                Side::Prefix => {
                    let idx = tables.all_prefixes.len();
                    tables.prefix_trie.insert(&entry.add, idx);
                    tables.all_prefixes.push(entry);
                }
                Side::Suffix => {
                    let idx = tables.all_suffixes.len();
                    let reversed: String = entry.add.chars().rev().collect();
                    tables.suffix_trie.insert(&reversed, idx);
                    tables.all_suffixes.push(entry);
                }
            }
        }

        tables
    }

    /// All prefix entries whose `add` is a prefix of `surface`.
    pub fn matching_prefixes<'a>(&'a self, surface: &'a str) -> impl Iterator<Item = &'a AffixEntry> + 'a {
        self.prefix_trie
            .segments(surface)
            .flat_map(|(_, idxs)| idxs.iter().map(move |&i| &self.all_prefixes[i]))
            .filter(move |e| e.on(surface))
    }

    /// All suffix entries whose `add` is a suffix of `surface`.
    pub fn matching_suffixes<'a>(&'a self, surface: &'a str) -> impl Iterator<Item = &'a AffixEntry> + 'a {
        let reversed: String = surface.chars().rev().collect();
        self.suffix_trie
            .segments(&reversed)
            .flat_map(|(_, idxs)| idxs.iter().map(move |&i| &self.all_suffixes[i]))
            .filter(move |e| e.on(surface))
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// Every prefix entry, in build order, for callers (e.g. dictionary
    /// construction) that need to scan the full table rather than a
    /// single class.
    #[must_use]
    pub fn all_prefixes(&self) -> &[AffixEntry] {
        &self.all_prefixes
    }

    /// Every suffix entry, in build order; see [`Self::all_prefixes`].
    #[must_use]
    pub fn all_suffixes(&self) -> &[AffixEntry] {
        &self.all_suffixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(".", "x", true)]
    #[case("[abc]", "b", true)]
    #[case("[abc]", "d", false)]
    #[case("[^abc]", "d", true)]
    #[case("[^abc]", "a", false)]
    #[case("ab", "ab", true)]
    #[case("ab", "ac", false)]
    fn test_condition_matches(#[case] pattern: &str, #[case] input: &str, #[case] expected: bool) {
        assert_eq!(Condition::parse(pattern).matches(input), expected);
    }

    fn entry(side: Side, strip: &str, add: &str, cond: &str, class: u32) -> AffixEntry {
        AffixEntry {
            side,
            class: Flag(class),
            strip: strip.to_string(),
            add: add.to_string(),
            condition: Condition::parse(cond),
            crossproduct: false,
            flags: FlagSet::new(),
        }
    }

    #[test]
    fn test_suffix_apply_and_produce_roundtrip() {
        // SFX A Y 1 / 0 s . : "hello" -> "hellos"
        let e = entry(Side::Suffix, "", "s", ".", 'A' as u32);
        assert!(e.on("hellos"));
        assert_eq!(e.apply("hellos").as_deref(), Some("hello"));
        assert_eq!(e.produce("hello").as_deref(), Some("hellos"));
    }

    #[test]
    fn test_prefix_apply_and_produce_roundtrip() {
        // PFX B Y 1 / 0 re . : "walk" -> "rewalk"
        let e = entry(Side::Prefix, "", "re", ".", 'B' as u32);
        assert!(e.on("rewalk"));
        assert_eq!(e.apply("rewalk").as_deref(), Some("walk"));
        assert_eq!(e.produce("walk").as_deref(), Some("rewalk"));
    }

    #[test]
    fn test_condition_rejects_when_not_satisfied() {
        // Suffix requires stem end in a consonant other than vowels.
        let e = entry(Side::Suffix, "", "ing", "[^aeiou]", 'C' as u32);
        assert!(e.on("runing")); // stem "run" ends in 'n'
        assert!(!entry(Side::Suffix, "", "ing", "[^aeiou]", 'C' as u32).on("seeing")); // "see" ends in 'e'
    }

    #[test]
    fn test_compatible_required_empty_means_any() {
        let mut e = entry(Side::Suffix, "", "s", ".", 'A' as u32);
        e.flags = [Flag('X' as u32)].into_iter().collect();
        assert!(e.compatible(&FlagSet::new(), &FlagSet::new()));
    }

    #[test]
    fn test_compatible_respects_required_and_forbidden() {
        let mut e = entry(Side::Suffix, "", "s", ".", 'A' as u32);
        e.flags = [Flag('X' as u32)].into_iter().collect();

        let required: FlagSet = [Flag('X' as u32)].into_iter().collect();
        assert!(e.compatible(&required, &FlagSet::new()));

        let forbidden: FlagSet = [Flag('X' as u32)].into_iter().collect();
        assert!(!e.compatible(&FlagSet::new(), &forbidden));

        let other_required: FlagSet = [Flag('Z' as u32)].into_iter().collect();
        assert!(!e.compatible(&other_required, &FlagSet::new()));
    }
}
