//! Dictionary index: homonym lookup by stem, and flag queries (§4.E).

use std::collections::{BTreeMap, HashMap};

use crate::affix::AffixEntry;
use crate::flags::{Flag, FlagSet};

/// A single dictionary entry (one line of the word list).
#[derive(Debug, Clone)]
pub struct Word {
    /// The stem text as written (before any affixation).
    pub stem: String,
    /// Flags this entry carries.
    pub flags: FlagSet,
    /// Morphological data (`key:value` pairs from the word-list line).
    pub morph: BTreeMap<String, Vec<String>>,
    /// Alternate spellings from a `ph:` morphological tag, used to widen
    /// phonetic-suggestion candidate generation.
    pub alt_spellings: Vec<String>,
    /// Prefix entries relevant to this word: those whose class flag is in
    /// `flags` and whose condition matches `stem`. Precomputed at build
    /// time as a memory/time tradeoff (§9 design note); omission would
    /// only slow n-gram-driven enumeration, not change results.
    pub relevant_prefixes: Vec<usize>,
    /// Suffix entries relevant to this word, analogous to
    /// `relevant_prefixes`.
    pub relevant_suffixes: Vec<usize>,
}

impl Word {
    /// Whether this entry carries `flag`.
    #[must_use]
    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(flag)
    }
}

/// Ground truth for dictionary membership: homonym lookup by stem, with
/// case-sensitive and case-insensitive variants.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: Vec<Word>,
    by_stem: HashMap<String, Vec<usize>>,
    by_lower_stem: HashMap<String, Vec<usize>>,
}

impl Dictionary {
    /// Build the index from a flat list of parsed words, precomputing
    /// each word's relevant affixes against the given tables.
    #[must_use]
    pub fn build(
        mut words: Vec<Word>,
        prefixes: &[AffixEntry],
        suffixes: &[AffixEntry],
    ) -> Self {
        for word in &mut words {
            word.relevant_prefixes = prefixes
                .iter()
                .enumerate()
                .filter(|(_, p)| word.flags.contains(p.class) && p.relevant(&word.stem))
                .map(|(i, _)| i)
                .collect();
            word.relevant_suffixes = suffixes
                .iter()
                .enumerate()
                .filter(|(_, s)| word.flags.contains(s.class) && s.relevant(&word.stem))
                .map(|(i, _)| i)
                .collect();
        }

        let mut by_stem: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_lower_stem: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, word) in words.iter().enumerate() {
            by_stem.entry(word.stem.clone()).or_default().push(idx);
            by_lower_stem
                .entry(word.stem.to_lowercase())
                .or_default()
                .push(idx);
        }

        Self {
            words,
            by_stem,
            by_lower_stem,
        }
    }

    /// All stored words (index order is stable across the dictionary's
    /// lifetime, referenced by `relevant_prefixes`/`relevant_suffixes`
    /// indices elsewhere).
    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Homonyms of `stem`: case-sensitive by default, or matching any
    /// entry whose lowercased stem equals `stem`'s lowercased form when
    /// `case_insensitive` is set.
    #[must_use]
    pub fn homonyms(&self, stem: &str, case_insensitive: bool) -> Vec<&Word> {
        let idxs = if case_insensitive {
            self.by_lower_stem.get(&stem.to_lowercase())
        } else {
            self.by_stem.get(stem)
        };
        idxs.map(|idxs| idxs.iter().map(|&i| &self.words[i]).collect())
            .unwrap_or_default()
    }

    /// Whether any (or, with `all`, every) homonym of `stem` carries
    /// `flag`.
    #[must_use]
    pub fn has_flag(&self, stem: &str, flag: Flag, all: bool) -> bool {
        let homonyms = self.homonyms(stem, false);
        if homonyms.is_empty() {
            return false;
        }
        if all {
            homonyms.iter().all(|w| w.has_flag(flag))
        } else {
            homonyms.iter().any(|w| w.has_flag(flag))
        }
    }

    /// The subset of the dictionary suitable for n-gram suggestion
    /// scanning: every stored word, precomputed once at build time rather
    /// than filtered per query (§5).
    #[must_use]
    pub fn ngram_candidates(&self) -> &[Word] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(stem: &str, flags: &[Flag]) -> Word {
        Word {
            stem: stem.to_string(),
            flags: flags.iter().copied().collect(),
            morph: BTreeMap::new(),
            alt_spellings: Vec::new(),
            relevant_prefixes: Vec::new(),
            relevant_suffixes: Vec::new(),
        }
    }

    #[test]
    fn test_homonyms_case_sensitive_vs_insensitive() {
        let words = vec![word("Bank", &[]), word("bank", &[])];
        let dict = Dictionary::build(words, &[], &[]);

        assert_eq!(dict.homonyms("Bank", false).len(), 1);
        assert_eq!(dict.homonyms("bank", false).len(), 1);
        assert_eq!(dict.homonyms("Bank", true).len(), 2);
    }

    #[test]
    fn test_has_flag_any_vs_all() {
        let a = Flag('A' as u32);
        let b = Flag('B' as u32);
        let words = vec![word("run", &[a]), word("run", &[a, b])];
        let dict = Dictionary::build(words, &[], &[]);

        assert!(dict.has_flag("run", a, false));
        assert!(dict.has_flag("run", a, true));
        assert!(dict.has_flag("run", b, false));
        assert!(!dict.has_flag("run", b, true));
    }

    #[test]
    fn test_has_flag_missing_stem() {
        let dict = Dictionary::build(Vec::new(), &[], &[]);
        assert!(!dict.has_flag("nope", Flag('A' as u32), false));
    }
}
