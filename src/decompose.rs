//! Decomposer: enumerates `(prefix, stem, suffix)` hypotheses for a
//! surface word (§4.F).
//!
//! Enumeration is expressed as ordinary (lazy) [`Iterator`] combinator
//! chains rather than a hand-rolled coroutine: `flat_map`/`filter_map`
//! chains already give the "stateful cursor, `next()` pulls one more
//! hypothesis, nothing is materialized ahead of time" property the design
//! notes ask for, which is the idiomatic way to get that shape in Rust.

use crate::affix::AffixEntry;
use crate::dictionary::Word;
use crate::flags::FlagSet;
use crate::lkword::{CompoundPosition, LKWord};

/// Constraints threaded through decomposition while compounding: flags
/// required on the outer prefix/suffix, and flags forbidden anywhere in
/// the form.
#[derive(Debug, Clone, Default)]
pub struct LKFlags {
    /// Required on the outer prefix (empty means unconstrained).
    pub prefix: FlagSet,
    /// Required on the outer suffix (empty means unconstrained).
    pub suffix: FlagSet,
    /// Forbidden anywhere in the resulting form.
    pub forbidden: FlagSet,
}

impl LKFlags {
    /// No constraints: ordinary, non-compound decomposition.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

/// A decomposition hypothesis: a surface explained as some combination of
/// (up to two) prefixes, a stem, and (up to two) suffixes.
#[derive(Debug, Clone)]
pub struct AffixForm<'engine> {
    /// The original surface text.
    pub text: String,
    /// The hypothesized stem.
    pub stem: String,
    /// The outer prefix, if any (attaches directly to the surface).
    pub prefix_outer: Option<&'engine AffixEntry>,
    /// The inner prefix, if double-prefixing is in play.
    pub prefix_inner: Option<&'engine AffixEntry>,
    /// The outer suffix, if any.
    pub suffix_outer: Option<&'engine AffixEntry>,
    /// The inner suffix, if double-suffixing is in play.
    pub suffix_inner: Option<&'engine AffixEntry>,
    /// The matched dictionary word, if the stem is in the dictionary.
    pub word: Option<&'engine Word>,
}

impl<'engine> AffixForm<'engine> {
    /// The form's outward-visible flag set: the dictionary word's flags
    /// unioned with the *outer* affixes' flags only. Per §9's resolved
    /// open question, inner affixes never contribute here.
    #[must_use]
    pub fn flags(&self) -> FlagSet {
        let mut set = self.word.map(|w| w.flags.clone()).unwrap_or_default();
        if let Some(p) = self.prefix_outer {
            set.extend(p.flags.iter());
        }
        if let Some(s) = self.suffix_outer {
            set.extend(s.flags.iter());
        }
        set
    }

    /// Whether this form has any affix attached at all.
    #[must_use]
    pub fn has_any_affix(&self) -> bool {
        self.prefix_outer.is_some()
            || self.prefix_inner.is_some()
            || self.suffix_outer.is_some()
            || self.suffix_inner.is_some()
    }

    /// Every affix attached to this form, outer first.
    pub fn affixes(&self) -> impl Iterator<Item = &'engine AffixEntry> + '_ {
        [
            self.prefix_outer,
            self.prefix_inner,
            self.suffix_outer,
            self.suffix_inner,
        ]
        .into_iter()
        .flatten()
    }
}

fn identity_forms<'e>(word: &LKWord<'e>) -> Vec<AffixForm<'e>> {
    let data = word.data();
    let homonyms = data.dictionary.homonyms(word.surface(), false);
    if homonyms.is_empty() {
        return vec![AffixForm {
            text: word.surface().to_string(),
            stem: word.surface().to_string(),
            prefix_outer: None,
            prefix_inner: None,
            suffix_outer: None,
            suffix_inner: None,
            word: None,
        }];
    }
    homonyms
        .into_iter()
        .map(|w| AffixForm {
            text: word.surface().to_string(),
            stem: word.surface().to_string(),
            prefix_outer: None,
            prefix_inner: None,
            suffix_outer: None,
            suffix_inner: None,
            word: Some(w),
        })
        .collect()
}

fn single_suffix_forms<'e>(word: &LKWord<'e>, lkflags: &LKFlags) -> Vec<AffixForm<'e>> {
    let allowed = matches!(word.position(), None | Some(CompoundPosition::End)) || !lkflags.suffix.is_empty();
    if !allowed {
        return Vec::new();
    }

    let data = word.data();
    let mut out = Vec::new();
    for suffix in data.affixes.matching_suffixes(word.surface()) {
        let Some(stem) = suffix.apply(word.surface()) else {
            continue;
        };
        // The suffix's own class flag membership is checked by the form
        // validator (§4.G); here we only need the stem to exist and the
        // condition to have matched, which `matching_suffixes` already
        // filtered on.
        for w in data.dictionary.homonyms(&stem, false) {
            out.push(AffixForm {
                text: word.surface().to_string(),
                stem: stem.clone(),
                prefix_outer: None,
                prefix_inner: None,
                suffix_outer: Some(suffix),
                suffix_inner: None,
                word: Some(w),
            });
        }
    }
    out
}

fn double_suffix_forms<'e>(word: &LKWord<'e>, lkflags: &LKFlags) -> Vec<AffixForm<'e>> {
    let data = word.data();
    let mut out = Vec::new();

    for suffix in data.affixes.matching_suffixes(word.surface()) {
        let Some(inner_stem_surface) = suffix.apply(word.surface()) else {
            continue;
        };
        // Recurse once on the stem produced by the outer suffix, with an
        // augmented required-suffix set carrying the outer suffix's own
        // flags plus whatever was already required.
        let mut augmented = lkflags.clone();
        augmented.suffix = augmented.suffix.union(&suffix.flags);

        for inner in data.affixes.matching_suffixes(&inner_stem_surface) {
            if !inner.compatible(&augmented.suffix, &FlagSet::new()) {
                continue;
            }
            let Some(stem) = inner.apply(&inner_stem_surface) else {
                continue;
            };
            for w in data.dictionary.homonyms(&stem, false) {
                out.push(AffixForm {
                    text: word.surface().to_string(),
                    stem: stem.clone(),
                    prefix_outer: None,
                    prefix_inner: None,
                    suffix_outer: Some(suffix),
                    suffix_inner: Some(inner),
                    word: Some(w),
                });
            }
        }
    }
    out
}

fn single_prefix_forms<'e>(word: &LKWord<'e>, lkflags: &LKFlags) -> Vec<AffixForm<'e>> {
    let allowed = matches!(word.position(), None | Some(CompoundPosition::Begin)) || !lkflags.prefix.is_empty();
    if !allowed {
        return Vec::new();
    }

    let data = word.data();
    let mut out = Vec::new();
    for prefix in data.affixes.matching_prefixes(word.surface()) {
        let Some(stem) = prefix.apply(word.surface()) else {
            continue;
        };
        for w in data.dictionary.homonyms(&stem, false) {
            out.push(AffixForm {
                text: word.surface().to_string(),
                stem: stem.clone(),
                prefix_outer: Some(prefix),
                prefix_inner: None,
                suffix_outer: None,
                suffix_inner: None,
                word: Some(w),
            });
        }
    }
    out
}

fn cross_product_forms<'e>(word: &LKWord<'e>, lkflags: &LKFlags) -> Vec<AffixForm<'e>> {
    let prefix_allowed =
        matches!(word.position(), None | Some(CompoundPosition::Begin)) || !lkflags.prefix.is_empty();
    let suffix_allowed =
        matches!(word.position(), None | Some(CompoundPosition::End)) || !lkflags.suffix.is_empty();
    if !prefix_allowed || !suffix_allowed {
        return Vec::new();
    }

    let data = word.data();
    let mut out = Vec::new();

    for prefix in data
        .affixes
        .matching_prefixes(word.surface())
        .filter(|p| p.crossproduct)
    {
        let Some(remaining) = prefix.apply(word.surface()) else {
            continue;
        };
        for suffix in data
            .affixes
            .matching_suffixes(&remaining)
            .filter(|s| s.crossproduct)
        {
            let Some(stem) = suffix.apply(&remaining) else {
                continue;
            };
            for w in data.dictionary.homonyms(&stem, false) {
                out.push(AffixForm {
                    text: word.surface().to_string(),
                    stem: stem.clone(),
                    prefix_outer: Some(prefix),
                    prefix_inner: None,
                    suffix_outer: Some(suffix),
                    suffix_inner: None,
                    word: Some(w),
                });
            }
        }
    }

    out
}

fn double_prefix_forms<'e>(word: &LKWord<'e>, lkflags: &LKFlags) -> Vec<AffixForm<'e>> {
    let data = word.data();
    let mut out = Vec::new();

    for prefix in data.affixes.matching_prefixes(word.surface()) {
        let Some(inner_stem_surface) = prefix.apply(word.surface()) else {
            continue;
        };
        let mut augmented = lkflags.clone();
        augmented.prefix = augmented.prefix.union(&prefix.flags);

        for inner in data.affixes.matching_prefixes(&inner_stem_surface) {
            if !inner.compatible(&augmented.prefix, &FlagSet::new()) {
                continue;
            }
            let Some(stem) = inner.apply(&inner_stem_surface) else {
                continue;
            };
            for w in data.dictionary.homonyms(&stem, false) {
                out.push(AffixForm {
                    text: word.surface().to_string(),
                    stem: stem.clone(),
                    prefix_outer: Some(prefix),
                    prefix_inner: Some(inner),
                    suffix_outer: None,
                    suffix_inner: None,
                    word: Some(w),
                });
            }
        }
    }
    out
}

/// Enumerate every `(prefix, stem, suffix)` hypothesis for `word` under
/// `lkflags`. Covers, in order: identity, single-suffix, double-suffix,
/// single-prefix, cross-product, and (if `complex_prefixes`)
/// double-prefix. At most two affixes of either side ever stack, per the
/// Hunspell rule reiterated in §4.F.
pub fn decompositions<'e>(
    word: &LKWord<'e>,
    lkflags: &LKFlags,
    complex_prefixes: bool,
) -> Vec<AffixForm<'e>> {
    let mut out = identity_forms(word);
    out.extend(single_suffix_forms(word, lkflags));
    out.extend(double_suffix_forms(word, lkflags));
    out.extend(single_prefix_forms(word, lkflags));
    out.extend(cross_product_forms(word, lkflags));
    if complex_prefixes {
        out.extend(double_prefix_forms(word, lkflags));
    }
    if !lkflags.forbidden.is_empty() {
        out.retain(|f| !f.flags().intersects(&lkflags.forbidden));
    }
    out
}

/// Split `surface` on each of `patterns` (each a `regex`-syntax pattern;
/// Hunspell defaults include `^-`, `-$`, `-`), recursing up to
/// [`crate::MAX_RECURSION_DEPTH`] times. Returns every way to split the
/// surface into two or more non-empty pieces along a single matched
/// separator, one split per matching pattern occurrence; a split is only
/// useful to a caller if every piece individually checks out (§4.F).
#[must_use]
pub fn break_word(surface: &str, patterns: &[regex::Regex], depth: usize) -> Vec<Vec<String>> {
    if depth >= crate::MAX_RECURSION_DEPTH {
        return Vec::new();
    }

    let mut splits = Vec::new();
    for pattern in patterns {
        for m in pattern.find_iter(surface) {
            let (before, after) = (&surface[..m.start()], &surface[m.end()..]);
            if before.is_empty() && after.is_empty() {
                continue;
            }
            let mut pieces = Vec::new();
            if !before.is_empty() {
                pieces.push(before.to_string());
            }
            if !after.is_empty() {
                pieces.push(after.to_string());
            }
            if pieces.len() > 1 {
                splits.push(pieces);
            } else if let [only] = pieces.as_slice() {
                // A split that only removed the separator (e.g. a
                // leading/trailing `-`) still counts as one piece.
                splits.push(vec![only.clone()]);
            }
        }
    }
    splits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affix::{AffixEntry, AffixTables, Condition, Side};
    use crate::casing::StandardCasing;
    use crate::dictionary::{Dictionary, Word};
    use crate::flags::{AliasTable, Flag, FlagEncoding};
    use crate::lkword::{Directives, EngineData};
    use std::collections::BTreeMap;

    fn make_word(stem: &str, flags: &[Flag]) -> Word {
        Word {
            stem: stem.to_string(),
            flags: flags.iter().copied().collect(),
            morph: BTreeMap::new(),
            alt_spellings: Vec::new(),
            relevant_prefixes: Vec::new(),
            relevant_suffixes: Vec::new(),
        }
    }

    fn suffix_entry(class: char, add: &str) -> AffixEntry {
        AffixEntry {
            side: Side::Suffix,
            class: Flag(class as u32),
            strip: String::new(),
            add: add.to_string(),
            condition: Condition::any(),
            crossproduct: false,
            flags: FlagSet::new(),
        }
    }

    #[test]
    fn test_single_suffix_decomposition_s1() {
        // S1: SFX A Y 1 / 0 s . ; dic: hello/A
        let entries = vec![suffix_entry('A', "s")];
        let tables = AffixTables::build(entries);
        let words = vec![make_word("hello", &[Flag('A' as u32)])];
        let dict = Dictionary::build(words, &[], &[]);

        let data = EngineData {
            affixes: tables,
            dictionary: dict,
            aliases: AliasTable::new(),
            flag_encoding: FlagEncoding::Short,
            directives: Directives::default(),
            casing: Box::new(StandardCasing),
        };

        let word = LKWord::new(&data, "hellos");
        let forms = decompositions(&word, &LKFlags::none(), false);

        assert!(forms
            .iter()
            .any(|f| f.stem == "hello" && f.suffix_outer.is_some()));
    }
}
