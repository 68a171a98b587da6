//! Compound engine: flag-based and rule-based segmentation, plus
//! `isBadCompound` (§4.H).

use crate::decompose::{self, AffixForm, LKFlags};
use crate::flags::FlagSet;
use crate::lkword::{CompoundPosition, EngineData, LKWord};
use crate::validate;

/// An ordered sequence of [`AffixForm`]s whose `text` fields concatenate
/// back to the original surface.
#[derive(Debug, Clone)]
pub struct CompoundForm<'engine> {
    pub parts: Vec<AffixForm<'engine>>,
}

impl CompoundForm<'_> {
    /// The reconstructed surface. Under `SIMPLIFIEDTRIPLE`, a part's
    /// `text` is left as the original (shorter) surface text even though
    /// the dictionary lookup behind it used the triple-letter-restored
    /// form, so this still reconstructs the word as actually typed.
    #[must_use]
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

/// Every generatable, non-bad [`CompoundForm`] for `word`, across both
/// the flag-based and rule-based regimes.
#[must_use]
pub fn compound_forms<'e>(data: &'e EngineData, word: &LKWord<'e>) -> Vec<CompoundForm<'e>> {
    let mut out = Vec::new();
    out.extend(compounds_by_flags(data, word, 0));
    out.extend(compounds_by_rules(data, word));
    out.retain(|c| !is_bad_compound(data, c, word.cap()));
    out
}

/// LKFlags for flag-based compounding: `prefix`/`suffix` carry
/// `COMPOUNDPERMITFLAG` (permitting affixes to attach at a non-edge
/// part), and `forbidden` carries `COMPOUNDFORBIDFLAG` (§4.H).
/// `COMPOUNDFLAG` itself gates compound membership elsewhere, in
/// [`validate::accepts`]'s position check, not here.
fn compoundflag_lkflags(data: &EngineData) -> Option<LKFlags> {
    data.directives.compoundflag?;
    let d = &data.directives;

    let mut permit = FlagSet::new();
    if let Some(flag) = d.compoundpermitflag {
        permit.insert(flag);
    }

    let mut forbidden = FlagSet::new();
    if let Some(flag) = d.compoundforbidflag {
        forbidden.insert(flag);
    }

    Some(LKFlags {
        prefix: permit.clone(),
        suffix: permit,
        forbidden,
    })
}

/// Recursive flag-based segmentation (`compoundsByFlags`).
fn compounds_by_flags<'e>(
    data: &'e EngineData,
    word: &LKWord<'e>,
    depth: usize,
) -> Vec<CompoundForm<'e>> {
    let d = &data.directives;
    let surface = word.surface();
    let len = surface.chars().count();

    if depth > d.compoundwordmax {
        return Vec::new();
    }

    let Some(lkflags) = compoundflag_lkflags(data) else {
        return Vec::new();
    };

    let mut out = Vec::new();

    // Try the whole remaining word as a final END segment; only sensible
    // once at least one earlier segment has already been committed, and
    // only if what's left is at least one full part.
    if depth >= 1 && len >= d.compoundmin {
        let end_word = word.shift(CompoundPosition::End);
        for form in decompose::decompositions(&end_word, &lkflags, d.complexprefixes) {
            if !validate::accepts(data, &end_word, &form) {
                continue;
            }
            if form
                .prefix_outer
                .is_some_and(|p| d.compoundforbidflag.is_some_and(|f| p.flags.contains(f)))
            {
                continue;
            }
            out.push(CompoundForm { parts: vec![form] });
        }
    }

    // Further splitting needs room for two more parts; cease otherwise.
    if len < 2 * d.compoundmin {
        return out;
    }

    let chars: Vec<char> = surface.chars().collect();
    for split in d.compoundmin..=(len - d.compoundmin) {
        let left: String = chars[..split].iter().collect();
        let right: String = chars[split..].iter().collect();

        let left_position = if depth == 0 {
            CompoundPosition::Begin
        } else {
            CompoundPosition::Middle
        };
        let left_word = word.to(left.clone()).shift(left_position);

        let mut left_forms = decompose::decompositions(&left_word, &lkflags, d.complexprefixes);

        // SIMPLIFIEDTRIPLE: when the surface elides one of three
        // identical letters at the boundary, retry the left piece with
        // that letter restored, but keep recording the shorter original
        // text on the resulting form.
        if d.simplifiedtriple {
            if let (Some(last), Some(first)) = (left.chars().last(), right.chars().next()) {
                if last == first {
                    let restored_word = left_word.add(&last.to_string());
                    for mut form in
                        decompose::decompositions(&restored_word, &lkflags, d.complexprefixes)
                    {
                        form.text = left.clone();
                        left_forms.push(form);
                    }
                }
            }
        }

        for left_form in left_forms {
            if !validate::accepts(data, &left_word, &left_form) {
                continue;
            }

            let right_word = word.to(right.clone());
            for right_compound in compounds_by_flags(data, &right_word, depth + 1) {
                let mut parts = vec![left_form.clone()];
                parts.extend(right_compound.parts);
                out.push(CompoundForm { parts });
            }
        }
    }

    out
}

/// Rule-based segmentation (`compoundsByRules`): `COMPOUNDRULE` patterns
/// as small regexes over per-part class flags.
fn compounds_by_rules<'e>(data: &'e EngineData, word: &LKWord<'e>) -> Vec<CompoundForm<'e>> {
    let rules = &data.directives.compound_rules;
    if rules.is_empty() {
        return Vec::new();
    }

    let surface = word.surface();
    let chars: Vec<char> = surface.chars().collect();
    let len = chars.len();

    let mut out = Vec::new();
    segment_by_rules(data, word, &chars, 0, len, rules, &mut Vec::new(), &mut out);
    out
}

fn segment_by_rules<'e>(
    data: &'e EngineData,
    word: &LKWord<'e>,
    chars: &[char],
    start: usize,
    len: usize,
    candidate_rules: &[String],
    so_far: &mut Vec<AffixForm<'e>>,
    out: &mut Vec<CompoundForm<'e>>,
) {
    if start == len {
        if !so_far.is_empty() && candidate_rules.iter().any(|r| rule_fully_matches(r, so_far)) {
            out.push(CompoundForm {
                parts: so_far.clone(),
            });
        }
        return;
    }

    for split in (start + 1)..=len {
        let piece: String = chars[start..split].iter().collect();
        let piece_word = word.to(piece);
        let homonyms = data.dictionary.homonyms(piece_word.surface(), false);
        if homonyms.is_empty() {
            continue;
        }

        for w in homonyms {
            let form = AffixForm {
                text: piece_word.surface().to_string(),
                stem: w.stem.clone(),
                prefix_outer: None,
                prefix_inner: None,
                suffix_outer: None,
                suffix_inner: None,
                word: Some(w),
            };

            let still_viable: Vec<String> = candidate_rules
                .iter()
                .filter(|r| {
                    let mut tentative = so_far.clone();
                    tentative.push(form.clone());
                    rule_partial_matches(r, &tentative)
                })
                .cloned()
                .collect();

            if still_viable.is_empty() {
                continue;
            }

            so_far.push(form);
            segment_by_rules(data, word, chars, split, len, &still_viable, so_far, out);
            so_far.pop();
        }
    }
}

/// Whether `rule` (a sequence of single-char class-flag tokens, each
/// optionally followed by `*` or `?`) matches the flag sets of `parts` so
/// far, treating `parts` as a *prefix* of a legal sequence.
fn rule_partial_matches(rule: &str, parts: &[AffixForm<'_>]) -> bool {
    rule_matches(rule, parts, false)
}

/// Whether `rule` fully matches the complete flag-set sequence of `parts`.
fn rule_fully_matches(rule: &str, parts: &[AffixForm<'_>]) -> bool {
    rule_matches(rule, parts, true)
}

fn rule_matches(rule: &str, parts: &[AffixForm<'_>], require_full: bool) -> bool {
    let tokens = parse_compound_rule(rule);
    let flag_sets: Vec<FlagSet> = parts.iter().map(AffixForm::flags).collect();
    matches_tokens(&tokens, &flag_sets, require_full)
}

#[derive(Debug, Clone, Copy)]
enum RuleQuantifier {
    One,
    ZeroOrMore,
    ZeroOrOne,
}

fn parse_compound_rule(rule: &str) -> Vec<(char, RuleQuantifier)> {
    let mut tokens = Vec::new();
    let mut chars = rule.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '(' || c == ')' {
            continue;
        }
        let quant = match chars.peek() {
            Some('*') => {
                chars.next();
                RuleQuantifier::ZeroOrMore
            }
            Some('?') => {
                chars.next();
                RuleQuantifier::ZeroOrOne
            }
            _ => RuleQuantifier::One,
        };
        tokens.push((c, quant));
    }
    tokens
}

fn matches_tokens(tokens: &[(char, RuleQuantifier)], flag_sets: &[FlagSet], require_full: bool) -> bool {
    fn go(tokens: &[(char, RuleQuantifier)], parts: &[FlagSet], require_full: bool) -> bool {
        if tokens.is_empty() {
            return parts.is_empty() || !require_full;
        }
        let (class, quant) = tokens[0];
        let class_flag = crate::flags::Flag(class as u32);

        match quant {
            RuleQuantifier::One => {
                if parts.is_empty() {
                    return !require_full;
                }
                if !parts[0].contains(class_flag) {
                    return false;
                }
                go(&tokens[1..], &parts[1..], require_full)
            }
            RuleQuantifier::ZeroOrOne => {
                if go(&tokens[1..], parts, require_full) {
                    return true;
                }
                if !parts.is_empty() && parts[0].contains(class_flag) {
                    return go(&tokens[1..], &parts[1..], require_full);
                }
                false
            }
            RuleQuantifier::ZeroOrMore => {
                if go(&tokens[1..], parts, require_full) {
                    return true;
                }
                if !parts.is_empty() && parts[0].contains(class_flag) {
                    return go(tokens, &parts[1..], require_full);
                }
                false
            }
        }
    }
    go(tokens, flag_sets, require_full)
}

/// Reject a generated compound per every `isBadCompound` sub-condition.
#[must_use]
pub fn is_bad_compound(
    data: &EngineData,
    compound: &CompoundForm<'_>,
    captype: crate::casing::CapType,
) -> bool {
    use crate::casing::CapType;

    let d = &data.directives;

    if let Some(forceucase) = d.forceucase {
        if !matches!(captype, CapType::All | CapType::Init) {
            if let Some(last) = compound.parts.last() {
                if last.flags().contains(forceucase) {
                    return true;
                }
            }
        }
    }

    for pair in compound.parts.windows(2) {
        let left = &pair[0];
        let right = &pair[1];

        if d.compoundforbidflag
            .is_some_and(|f| left.flags().contains(f))
        {
            return true;
        }

        let joined = format!("{}{}", left.text, right.text);
        let joined_word = LKWord::new(data, joined.clone());
        let spurious = decompose::decompositions(&joined_word, &LKFlags::none(), d.complexprefixes)
            .iter()
            .any(|f| validate::accepts(data, &joined_word, f));
        if spurious {
            return true;
        }

        if d.checkcompoundrep {
            for (from, to) in &d.rep {
                if left.text.ends_with(from.as_str()) || right.text.starts_with(from.as_str()) {
                    let replaced = joined.replacen(from.as_str(), to.as_str(), 1);
                    let replaced_word = LKWord::new(data, replaced);
                    if !data
                        .dictionary
                        .homonyms(replaced_word.surface(), false)
                        .is_empty()
                    {
                        return true;
                    }
                }
            }
        }

        if d.checkcompoundtriple {
            if let (Some(a), Some(b)) = (left.text.chars().last(), right.text.chars().next()) {
                let mut left_chars = left.text.chars().rev();
                let second_last = left_chars.nth(1);
                if a == b && second_last == Some(a) {
                    return true;
                }
                let mut right_chars = right.text.chars();
                right_chars.next();
                if a == b && right_chars.next() == Some(a) {
                    return true;
                }
            }
        }

        if d.checkcompoundcase || d.checkcompoundup {
            let boundary_is_hyphen = left.text.ends_with('-') || right.text.starts_with('-');
            if !boundary_is_hyphen {
                let left_upper = left.text.chars().next_back().is_some_and(char::is_uppercase);
                let right_upper = right.text.chars().next().is_some_and(char::is_uppercase);
                if left_upper || right_upper {
                    return true;
                }
            }
        }

        for (left_end, right_start, _replacement) in &d.compound_patterns {
            if left.text.ends_with(left_end.as_str()) && right.text.starts_with(right_start.as_str()) {
                return true;
            }
        }
    }

    if d.checkcompounddup {
        if let (Some(second_last), Some(last)) = (
            compound.parts.len().checked_sub(2).map(|i| &compound.parts[i]),
            compound.parts.last(),
        ) {
            if second_last.text == last.text {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affix::AffixTables;
    use crate::casing::StandardCasing;
    use crate::dictionary::{Dictionary, Word};
    use crate::flags::{AliasTable, Flag, FlagEncoding};
    use crate::lkword::Directives;
    use std::collections::BTreeMap;

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
    fn test_compoundflag_segments_two_words() {
        let compound = Flag('C' as u32);
        let mut directives = Directives::default();
        directives.compoundflag = Some(compound);
        directives.compoundmin = 3;
        directives.compoundwordmax = 4;

        let words = vec![word("foo", &[compound]), word("bar", &[compound])];
        let data = EngineData {
            affixes: AffixTables::build(Vec::new()),
            dictionary: Dictionary::build(words, &[], &[]),
            aliases: AliasTable::new(),
            flag_encoding: FlagEncoding::Short,
            directives,
            casing: Box::new(StandardCasing),
        };

        let word = LKWord::new(&data, "foobar");
        let forms = compound_forms(&data, &word);

        assert!(forms.iter().any(|c| c.text() == "foobar" && c.parts.len() == 2));
    }

    #[test]
    fn test_compoundmin_rejects_too_short_pieces() {
        let compound = Flag('C' as u32);
        let mut directives = Directives::default();
        directives.compoundflag = Some(compound);
        directives.compoundmin = 4;
        directives.compoundwordmax = 4;

        let words = vec![word("foo", &[compound]), word("bar", &[compound])];
        let data = EngineData {
            affixes: AffixTables::build(Vec::new()),
            dictionary: Dictionary::build(words, &[], &[]),
            aliases: AliasTable::new(),
            flag_encoding: FlagEncoding::Short,
            directives,
            casing: Box::new(StandardCasing),
        };

        let word = LKWord::new(&data, "foobar");
        let forms = compound_forms(&data, &word);

        assert!(forms.is_empty());
    }

    #[test]
    fn test_rule_based_compound_matches_simple_rule() {
        let a = Flag('A' as u32);
        let b = Flag('B' as u32);
        let mut directives = Directives::default();
        directives.compound_rules = vec!["AB".to_string()];

        let words = vec![word("foo", &[a]), word("bar", &[b])];
        let data = EngineData {
            affixes: AffixTables::build(Vec::new()),
            dictionary: Dictionary::build(words, &[], &[]),
            aliases: AliasTable::new(),
            flag_encoding: FlagEncoding::Short,
            directives,
            casing: Box::new(StandardCasing),
        };

        let word = LKWord::new(&data, "foobar");
        let forms = compound_forms(&data, &word);

        assert!(forms.iter().any(|c| c.text() == "foobar"));
    }

    #[test]
    fn test_checkcompoundup_rejects_boundary_uppercase() {
        let compound = Flag('C' as u32);
        let mut directives = Directives::default();
        directives.compoundflag = Some(compound);
        directives.compoundmin = 3;
        directives.compoundwordmax = 4;
        directives.checkcompoundup = true;

        let words = vec![word("foo", &[compound]), word("Bar", &[compound])];
        let data = EngineData {
            affixes: AffixTables::build(Vec::new()),
            dictionary: Dictionary::build(words, &[], &[]),
            aliases: AliasTable::new(),
            flag_encoding: FlagEncoding::Short,
            directives,
            casing: Box::new(StandardCasing),
        };

        let word = LKWord::new(&data, "fooBar");
        let forms = compound_forms(&data, &word);

        assert!(!forms.iter().any(|c| c.text() == "fooBar"));
    }

    #[test]
    fn test_compoundpermitflag_allows_suffix_on_non_edge_part() {
        let compound = Flag('C' as u32);
        let permit = Flag('P' as u32);
        let suffix = Flag('S' as u32);
        let mut directives = Directives::default();
        directives.compoundflag = Some(compound);
        directives.compoundpermitflag = Some(permit);
        directives.compoundmin = 3;
        directives.compoundwordmax = 4;

        let entries = vec![crate::affix::AffixEntry {
            side: crate::affix::Side::Suffix,
            class: suffix,
            strip: String::new(),
            add: "s".to_string(),
            condition: crate::affix::Condition::any(),
            crossproduct: false,
            flags: FlagSet::new(),
        }];

        let mut foos = word("foo", &[compound, permit]);
        foos.flags.insert(suffix);
        let words = vec![foos, word("bar", &[compound])];
        let data = EngineData {
            affixes: AffixTables::build(entries),
            dictionary: Dictionary::build(words, &[], &[]),
            aliases: AliasTable::new(),
            flag_encoding: FlagEncoding::Short,
            directives,
            casing: Box::new(StandardCasing),
        };

        let word = LKWord::new(&data, "foosbar");
        let forms = compound_forms(&data, &word);

        assert!(forms.iter().any(|c| c.text() == "foosbar"));
    }

    #[test]
    fn test_compoundforbidflag_excludes_forbidden_part() {
        let compound = Flag('C' as u32);
        let forbid = Flag('X' as u32);
        let mut directives = Directives::default();
        directives.compoundflag = Some(compound);
        directives.compoundforbidflag = Some(forbid);
        directives.compoundmin = 3;
        directives.compoundwordmax = 4;

        let words = vec![
            word("foo", &[compound, forbid]),
            word("bar", &[compound]),
        ];
        let data = EngineData {
            affixes: AffixTables::build(Vec::new()),
            dictionary: Dictionary::build(words, &[], &[]),
            aliases: AliasTable::new(),
            flag_encoding: FlagEncoding::Short,
            directives,
            casing: Box::new(StandardCasing),
        };

        let word = LKWord::new(&data, "foobar");
        let forms = compound_forms(&data, &word);

        assert!(!forms.iter().any(|c| c.text() == "foobar"));
    }

    #[test]
    fn test_simplifiedtriple_restores_elided_letter() {
        let compound = Flag('C' as u32);
        let mut directives = Directives::default();
        directives.compoundflag = Some(compound);
        directives.compoundmin = 3;
        directives.compoundwordmax = 4;
        directives.simplifiedtriple = true;

        // "cross" + "stitch" concatenated literally would be
        // "crossstitch", with a triple "s" at the boundary; the
        // surface actually carries the simplified "crosstitch", so any
        // split landing inside the doubled "s" needs one restored
        // before the left piece's stem matches.
        let words = vec![word("cross", &[compound]), word("stitch", &[compound])];
        let data = EngineData {
            affixes: AffixTables::build(Vec::new()),
            dictionary: Dictionary::build(words, &[], &[]),
            aliases: AliasTable::new(),
            flag_encoding: FlagEncoding::Short,
            directives,
            casing: Box::new(StandardCasing),
        };

        let word = LKWord::new(&data, "crosstitch");
        let forms = compound_forms(&data, &word);

        assert!(forms
            .iter()
            .any(|c| c.text() == "crosstitch" && c.parts.len() == 2));
    }
}
