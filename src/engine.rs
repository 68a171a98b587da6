//! Engine facade (§4.O): wires parsing, casing, decomposition,
//! validation, compounding, and suggestion generation into the public
//! API.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::affix::AffixTables;
use crate::casing::{Casing, GermanCasing, StandardCasing, TurkicCasing};
use crate::compound;
use crate::decompose::{self, LKFlags};
use crate::dictionary::Dictionary;
use crate::error::ParseError;
use crate::lkword::{EngineData, LKWord};
use crate::parser;
use crate::suggest;
use crate::validate;

/// The outcome of checking a single token (§6). `correct` and
/// `forbidden` are independent: a `FORBIDDENWORD`-flagged homonym is
/// both dictionary-matched and forbidden, which reports as incorrect
/// with `forbidden` set rather than as simply unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckResult {
    pub correct: bool,
    pub forbidden: bool,
    pub warn: bool,
}

/// One accepted reading of a word: the stem text behind it, alongside
/// its morphological tag map. One per accepted `AffixForm`/`CompoundForm`
/// (§4.O).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MorphEntry {
    pub stem: String,
    pub morph: BTreeMap<String, Vec<String>>,
}

/// A spellchecking engine built from a parsed affix description and word
/// list. Construction does all the work; queries afterward only read.
pub struct Engine {
    data: EngineData,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("data", &self.data).finish()
    }
}

impl Engine {
    /// Parse `affix_text`/`dic_text` and build a ready-to-query engine.
    ///
    /// # Errors
    /// Returns [`ParseError`] if either text is malformed.
    pub fn new(affix_text: &str, dic_text: &str) -> Result<Self, ParseError> {
        let parsed_affix = parser::parse_affix(affix_text)?;
        let words = parser::parse_dic(
            dic_text,
            parsed_affix.flag_encoding,
            &parsed_affix.aliases,
        )?;

        let affixes = AffixTables::build(parsed_affix.entries);
        let dictionary = Dictionary::build(words, affixes.all_prefixes(), affixes.all_suffixes());

        let casing: Box<dyn Casing + Send + Sync> = if parsed_affix
            .directives
            .lang
            .as_deref()
            .is_some_and(is_turkic_lang)
        {
            Box::new(TurkicCasing)
        } else if parsed_affix.directives.checksharps {
            Box::new(GermanCasing)
        } else {
            Box::new(StandardCasing)
        };

        let data = EngineData {
            affixes,
            dictionary,
            aliases: parsed_affix.aliases,
            flag_encoding: parsed_affix.flag_encoding,
            directives: parsed_affix.directives,
            casing,
        };

        Ok(Self { data })
    }

    /// Check whether `word` is spelled correctly.
    #[must_use]
    pub fn check(&self, word: &str) -> CheckResult {
        let converted = apply_conversions(word, &self.data.directives.iconv);
        let stripped = strip_ignored(&converted, &self.data.directives.ignore);

        if is_numeric_token(&stripped) {
            return CheckResult {
                correct: true,
                forbidden: false,
                warn: false,
            };
        }

        let forbidden = is_forbidden(&self.data, &stripped);
        let warn = is_warn(&self.data, &stripped);
        let warn_blocks = warn && self.data.directives.forbidwarn;
        let correct = !forbidden && !warn_blocks && spellchecks(&self.data, &stripped);

        CheckResult {
            correct,
            forbidden,
            warn,
        }
    }

    /// Suggest corrections for `word`, ranked best-first.
    #[must_use]
    pub fn suggest(&self, word: &str) -> Vec<String> {
        let converted = apply_conversions(word, &self.data.directives.iconv);
        suggest::suggest(&self.data, &converted)
            .into_iter()
            .map(|s| s.text)
            .collect()
    }

    /// Every stem a valid reading of `word` resolves to.
    #[must_use]
    pub fn stems(&self, word: &str) -> Vec<String> {
        let converted = apply_conversions(word, &self.data.directives.iconv);
        let stripped = strip_ignored(&converted, &self.data.directives.ignore);
        let lk = LKWord::new(&self.data, stripped);

        let mut out = Vec::new();
        for form in decompose::decompositions(
            &lk,
            &LKFlags::none(),
            self.data.directives.complexprefixes,
        ) {
            if validate::accepts(&self.data, &lk, &form) {
                out.push(form.stem.clone());
            }
        }
        if out.is_empty() {
            for c in compound::compound_forms(&self.data, &lk) {
                for part in &c.parts {
                    out.push(part.stem.clone());
                }
            }
        }
        out.into_iter().sorted().dedup().collect()
    }

    /// Every accepted reading of `word`, each carrying its stem text
    /// alongside its morphological tag map (§4.O), across both direct
    /// affix forms and compound forms.
    #[must_use]
    pub fn analyze(&self, word: &str) -> Vec<MorphEntry> {
        let converted = apply_conversions(word, &self.data.directives.iconv);
        let stripped = strip_ignored(&converted, &self.data.directives.ignore);
        let lk = LKWord::new(&self.data, stripped);

        let mut out = Vec::new();
        for form in decompose::decompositions(
            &lk,
            &LKFlags::none(),
            self.data.directives.complexprefixes,
        ) {
            if validate::accepts(&self.data, &lk, &form) {
                if let Some(root) = form.word {
                    out.push(MorphEntry {
                        stem: form.stem.clone(),
                        morph: root.morph.clone(),
                    });
                }
            }
        }
        if out.is_empty() {
            for c in compound::compound_forms(&self.data, &lk) {
                for part in &c.parts {
                    if let Some(root) = part.word {
                        out.push(MorphEntry {
                            stem: part.stem.clone(),
                            morph: root.morph.clone(),
                        });
                    }
                }
            }
        }
        out
    }
}

/// Whether `surface` resolves to at least one accepted reading, either
/// directly or as a compound. Shared by [`Engine::check`] and the
/// suggester, which needs the same predicate over intermediate
/// candidates without re-running conversion/ignore handling each time.
#[must_use]
pub(crate) fn spellchecks(data: &EngineData, surface: &str) -> bool {
    if surface.is_empty() {
        return false;
    }

    let word = LKWord::new(data, surface.to_string());
    let accepted = decompose::decompositions(
        &word,
        &LKFlags::none(),
        data.directives.complexprefixes,
    )
    .iter()
    .any(|form| validate::accepts(data, &word, form));

    if accepted || !compound::compound_forms(data, &word).is_empty() {
        return true;
    }

    breaks_into_correct_pieces(data, surface)
}

/// Whether some `BREAK`-pattern split of `surface` yields pieces that
/// each spellcheck on their own (§4.F, invariant 7).
fn breaks_into_correct_pieces(data: &EngineData, surface: &str) -> bool {
    if data.directives.break_patterns.is_empty() {
        return false;
    }

    let patterns: Vec<regex::Regex> = data
        .directives
        .break_patterns
        .iter()
        .filter_map(|p| regex::Regex::new(p).ok())
        .collect();

    decompose::break_word(surface, &patterns, 0)
        .iter()
        .any(|pieces| pieces.len() > 1 && pieces.iter().all(|p| spellchecks(data, p)))
}

fn is_forbidden(data: &EngineData, surface: &str) -> bool {
    data.directives.forbiddenword.is_some_and(|flag| {
        data.dictionary
            .homonyms(surface, false)
            .iter()
            .any(|w| w.has_flag(flag))
    })
}

fn is_warn(data: &EngineData, surface: &str) -> bool {
    data.directives.warn.is_some_and(|flag| {
        data.dictionary
            .homonyms(surface, false)
            .iter()
            .any(|w| w.has_flag(flag))
    })
}

fn apply_conversions(text: &str, rules: &[(String, String)]) -> String {
    let mut out = text.to_string();
    for (from, to) in rules {
        out = out.replace(from.as_str(), to.as_str());
    }
    out
}

fn strip_ignored(text: &str, ignore: &[char]) -> String {
    if ignore.is_empty() {
        return text.to_string();
    }
    text.chars().filter(|c| !ignore.contains(c)).collect()
}

/// A token made up entirely of digits and ordinary numeric punctuation
/// (`. , -`) always checks out (§6): numbers aren't dictionary words.
fn is_numeric_token(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        && s.chars().any(|c| c.is_ascii_digit())
}

fn is_turkic_lang(lang: &str) -> bool {
    matches!(lang, "tr" | "tr_TR" | "az" | "az_AZ" | "crh" | "crh_UA")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn build(aff: &str, dic: &str) -> Engine {
        Engine::new(aff, dic).unwrap()
    }

    #[test]
    fn test_check_accepts_dictionary_word() {
        let engine = build("", "1\nhello\n");
        assert!(engine.check("hello").correct);
        assert!(!engine.check("helo").correct);
    }

    #[test]
    fn test_check_accepts_suffixed_form() {
        let engine = build("SFX A Y 1\nSFX A 0 s .\n", "1\ncat/A\n");
        assert!(engine.check("cat").correct);
        assert!(engine.check("cats").correct);
        assert!(!engine.check("dogs").correct);
    }

    #[test]
    fn test_check_numeric_tokens_always_correct() {
        let engine = build("", "1\nhello\n");
        assert!(engine.check("1234").correct);
        assert!(engine.check("3.14").correct);
        assert!(engine.check("1,000").correct);
    }

    #[test]
    fn test_check_reports_forbidden() {
        let engine = build("FORBIDDENWORD F\n", "1\nhell/F\n");
        let result = engine.check("hell");
        assert!(!result.correct);
        assert!(result.forbidden);
    }

    #[test]
    fn test_check_forbidwarn_blocks_warn_words() {
        let engine = build("WARN W\nFORBIDWARN\n", "1\nhell/W\n");
        let result = engine.check("hell");
        assert!(result.warn);
        assert!(!result.correct);
    }

    #[test]
    fn test_check_warn_without_forbidwarn_stays_correct() {
        let engine = build("WARN W\n", "1\nhell/W\n");
        let result = engine.check("hell");
        assert!(result.warn);
        assert!(result.correct);
    }

    #[test]
    fn test_stems_returns_dictionary_stem() {
        let engine = build("SFX A Y 1\nSFX A 0 s .\n", "1\ncat/A\n");
        assert_eq!(engine.stems("cats"), vec!["cat".to_string()]);
    }

    #[test]
    fn test_check_accepts_break_separated_pieces() {
        let engine = build("BREAK 1\nBREAK -\n", "2\nfoo\nbar\n");
        assert!(engine.check("foo-bar").correct);
        assert!(!engine.check("foo-baz").correct);
    }

    #[test]
    fn test_analyze_returns_morph_tags() {
        let engine = build("SFX A Y 1\nSFX A 0 s .\n", "1\ncat/A po:noun\n");
        let analyses = engine.analyze("cats");
        assert!(analyses
            .iter()
            .any(|e| e.stem == "cat" && e.morph.get("po") == Some(&vec!["noun".to_string()])));
    }

    #[test]
    fn test_analyze_covers_compound_parts() {
        let engine = build(
            "COMPOUNDFLAG C\nCOMPOUNDMIN 3\nCOMPOUNDWORDMAX 4\n",
            "2\nfoo/C po:noun\nbar/C po:noun\n",
        );
        let analyses = engine.analyze("foobar");
        assert!(analyses.iter().any(|e| e.stem == "foo"));
        assert!(analyses.iter().any(|e| e.stem == "bar"));
    }

    #[test]
    fn test_stems_returns_compound_parts_not_whole_surface() {
        let engine = build(
            "COMPOUNDFLAG C\nCOMPOUNDMIN 3\nCOMPOUNDWORDMAX 4\n",
            "2\nfoo/C\nbar/C\n",
        );
        let stems = engine.stems("foobar");
        assert_eq!(stems, vec!["bar".to_string(), "foo".to_string()]);
    }

    #[test]
    fn test_suggest_offers_correction() {
        let engine = build("", "1\nhello\n");
        let suggestions = engine.suggest("hllo");
        assert!(suggestions.contains(&"hello".to_string()));
    }
}
