//! Form validator: tests an [`AffixForm`] hypothesis against flag
//! directives and compound-position context (§4.G).

use crate::casing::GermanCasing;
use crate::decompose::AffixForm;
use crate::lkword::{CompoundPosition, EngineData, LKWord};

/// Accept `form` as a valid reading of `word`, per every §4.G condition.
#[must_use]
pub fn accepts(data: &EngineData, word: &LKWord<'_>, form: &AffixForm<'_>) -> bool {
    let Some(root) = form.word else {
        return false;
    };

    // NOSUGGEST-bearing words are still valid for `check`; whether to
    // disallow them is the caller's choice (see
    // `excluded_from_suggestions`), not this predicate's, matching §4.G's
    // own "if disallowing NOSUGGEST" phrasing.

    if !capitalization_ok(data, word, form, root) {
        return false;
    }

    if !needaffix_ok(data, form, root) {
        return false;
    }

    let flags = form.flags();
    if let Some(prefix) = form.prefix_outer {
        if !flags.contains(prefix.class) {
            return false;
        }
    }
    if let Some(suffix) = form.suffix_outer {
        if !flags.contains(suffix.class) {
            return false;
        }
    }

    if !circumfix_symmetric(data, form) {
        return false;
    }

    if !compound_position_ok(data, word, &flags) {
        return false;
    }

    true
}

/// Whether `root` is excluded from suggestion generation under
/// `NOSUGGEST`, to be applied by callers that generate (rather than
/// merely check) candidates.
#[must_use]
pub fn excluded_from_suggestions(data: &EngineData, root: &crate::dictionary::Word) -> bool {
    data.directives
        .nosuggest
        .is_some_and(|flag| root.has_flag(flag))
}

fn capitalization_ok(
    data: &EngineData,
    word: &LKWord<'_>,
    form: &AffixForm<'_>,
    root: &crate::dictionary::Word,
) -> bool {
    let Some(keepcase) = data.directives.keepcase else {
        return true;
    };
    if !root.has_flag(keepcase) {
        return true;
    }

    let root_cap = data.casing.guess(&root.stem);
    if word.cap() == root_cap {
        return true;
    }

    if data.directives.checksharps {
        if GermanCasing::sharps_equal(&form.text, &root.stem) {
            return true;
        }
    }

    false
}

fn needaffix_ok(data: &EngineData, form: &AffixForm<'_>, root: &crate::dictionary::Word) -> bool {
    let Some(needaffix) = data.directives.needaffix else {
        return true;
    };

    if form.has_any_affix() {
        !form.affixes().all(|a| a.flags.contains(needaffix))
    } else {
        !root.has_flag(needaffix)
    }
}

fn circumfix_symmetric(data: &EngineData, form: &AffixForm<'_>) -> bool {
    let Some(circumfix) = data.directives.circumfix else {
        return true;
    };

    let prefix_has = form
        .prefix_outer
        .is_some_and(|p| p.flags.contains(circumfix));
    let suffix_has = form
        .suffix_outer
        .is_some_and(|s| s.flags.contains(circumfix));
    prefix_has == suffix_has
}

fn compound_position_ok(
    data: &EngineData,
    word: &LKWord<'_>,
    flags: &crate::flags::FlagSet,
) -> bool {
    let d = &data.directives;
    match word.position() {
        None => d.onlyincompound.is_none_or(|f| !flags.contains(f)),
        Some(pos) => {
            if d.compoundflag.is_some_and(|f| flags.contains(f)) {
                return true;
            }
            let required = match pos {
                CompoundPosition::Begin => d.compoundbegin,
                CompoundPosition::Middle => d.compoundmiddle,
                CompoundPosition::End => d.compoundend,
            };
            required.is_some_and(|f| flags.contains(f))
        }
    }
}
