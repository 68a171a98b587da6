//! Suggester: orchestrates edit permutators and both scorers into a
//! ranked, de-duplicated suggestion list (§4.L).

use std::collections::HashSet;

use crate::casing::CapType;
use crate::edits;
use crate::engine::spellchecks;
use crate::lkword::EngineData;
use crate::ngram;
use crate::phonetic;

/// The kind of edit (or stage) that produced a [`Suggestion`], used to
/// decide whether later stages are suppressed for the current variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    Case,
    Uppercase,
    Compound,
    ReplChars,
    MapChars,
    SwapChar,
    LongSwapChar,
    BadChar,
    BadCharKey,
    ExtraChar,
    ForgotChar,
    MoveChar,
    DoubleTwoChars,
    SpaceWord,
    DashSplit,
    Ngram,
    Phonetic,
}

/// A ranked suggestion: replacement text plus the stage that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    pub kind: SuggestionKind,
}

fn suppresses_compound_pass(kind: SuggestionKind) -> bool {
    matches!(
        kind,
        SuggestionKind::Uppercase | SuggestionKind::ReplChars | SuggestionKind::MapChars
    )
}

fn apply_conversions(text: &str, rules: &[(String, String)]) -> String {
    let mut out = text.to_string();
    for (from, to) in rules {
        out = out.replace(from.as_str(), to.as_str());
    }
    out
}

/// Like [`spellchecks`], but a candidate containing a space (from
/// `twowords`, or a REP rule whose replacement is multi-word) is valid
/// when every space-separated piece spellchecks on its own — joining
/// back into one surface would otherwise never match a dictionary stem.
fn candidate_checks(data: &EngineData, candidate: &str) -> bool {
    if candidate.contains(' ') {
        candidate
            .split(' ')
            .all(|piece| !piece.is_empty() && spellchecks(data, piece))
    } else {
        spellchecks(data, candidate)
    }
}

fn is_forbidden(data: &EngineData, text: &str) -> bool {
    data.directives.forbiddenword.is_some_and(|flag| {
        data.dictionary
            .homonyms(text, false)
            .iter()
            .any(|w| w.has_flag(flag))
    })
}

/// Whether every dictionary homonym backing `text` carries `NOSUGGEST`
/// — such a candidate is a valid `check()` but must never be offered as
/// a suggestion (§4.G).
fn is_nosuggest_only(data: &EngineData, text: &str) -> bool {
    let homonyms = data.dictionary.homonyms(text, false);
    !homonyms.is_empty()
        && homonyms
            .iter()
            .all(|w| crate::validate::excluded_from_suggestions(data, w))
}

/// Coerce, reject-if-forbidden, apply OCONV, and dedup a raw candidate;
/// pushes onto `out` and records in `handled` when accepted.
#[allow(clippy::too_many_arguments)]
fn handle_candidate(
    data: &EngineData,
    original_cap: CapType,
    original_surface: &str,
    candidate: &str,
    kind: SuggestionKind,
    handled: &mut HashSet<String>,
    out: &mut Vec<Suggestion>,
) {
    let coerced = data.casing.coerce(candidate, original_cap);
    let mut text = if is_forbidden(data, &coerced) {
        candidate.to_string()
    } else {
        coerced
    };

    if is_forbidden(data, &text) || is_nosuggest_only(data, &text) {
        return;
    }

    // NOSPLITSUGS: never offer a suggestion that spans more than one word.
    if data.directives.nosplitsugs && text.contains(' ') {
        return;
    }

    // HUH/HUHINIT: preserve whatever precedes the first space in the
    // original surface verbatim, since coercion only reasons about the
    // first letter's case, not a leading space-delimited token.
    if matches!(original_cap, CapType::Huh | CapType::HuhInit) {
        if let Some(space_idx) = original_surface.find(' ') {
            if let Some(candidate_space_idx) = text.find(' ') {
                let prefix = &original_surface[..space_idx];
                text = format!("{prefix}{}", &text[candidate_space_idx..]);
            }
        }
    }

    text = apply_conversions(&text, &data.directives.oconv);

    if !handled.insert(text.clone()) {
        return;
    }

    out.push(Suggestion { text, kind });
}

fn edit_candidates(data: &EngineData, variant: &str) -> Vec<(String, SuggestionKind)> {
    let d = &data.directives;
    let mut out = Vec::new();

    out.extend(
        edits::replchars(variant, &d.rep)
            .into_iter()
            .map(|c| (c, SuggestionKind::ReplChars)),
    );
    out.extend(
        edits::mapchars(variant, &d.map)
            .into_iter()
            .map(|c| (c, SuggestionKind::MapChars)),
    );
    out.extend(
        edits::swapchar(variant)
            .into_iter()
            .map(|c| (c, SuggestionKind::SwapChar)),
    );
    out.extend(
        edits::longswapchar(variant)
            .into_iter()
            .map(|c| (c, SuggestionKind::LongSwapChar)),
    );
    out.extend(
        edits::badchar(variant, &d.try_chars)
            .into_iter()
            .map(|c| (c, SuggestionKind::BadChar)),
    );
    out.extend(
        edits::badcharkey(variant, &d.key_rows)
            .into_iter()
            .map(|c| (c, SuggestionKind::BadCharKey)),
    );
    out.extend(
        edits::extrachar(variant)
            .into_iter()
            .map(|c| (c, SuggestionKind::ExtraChar)),
    );
    out.extend(
        edits::forgotchar(variant, &d.try_chars)
            .into_iter()
            .map(|c| (c, SuggestionKind::ForgotChar)),
    );
    out.extend(
        edits::movechar(variant)
            .into_iter()
            .map(|c| (c, SuggestionKind::MoveChar)),
    );
    out.extend(
        edits::doubletwochars(variant)
            .into_iter()
            .map(|c| (c, SuggestionKind::DoubleTwoChars)),
    );
    out.extend(
        edits::twowords(variant)
            .into_iter()
            .map(|(a, b)| (format!("{a} {b}"), SuggestionKind::SpaceWord)),
    );

    out
}

/// Produce an ordered, de-duplicated suggestion list for `surface`.
#[must_use]
pub fn suggest(data: &EngineData, surface: &str) -> Vec<Suggestion> {
    let original_cap = data.casing.guess(surface);
    let mut handled = HashSet::new();
    let mut out = Vec::new();

    // Stage 1: FORCEUCASE short-circuit.
    if data.directives.forceucase.is_some() && matches!(original_cap, CapType::No) {
        let capitalized = data.casing.to_title(surface);
        if spellchecks(data, &capitalized) {
            handle_candidate(
                data,
                original_cap,
                surface,
                &capitalized,
                SuggestionKind::Case,
                &mut handled,
                &mut out,
            );
            return out;
        }
    }

    let (_, variants) = data.casing.corrections(surface);

    'variants: for variant in &variants {
        if out.len() >= crate::MAX_SUGGESTIONS {
            break;
        }

        if spellchecks(data, variant) {
            handle_candidate(
                data,
                original_cap,
                surface,
                variant,
                SuggestionKind::Case,
                &mut handled,
                &mut out,
            );
        }

        let mut suppressed = false;
        let mut any_good = false;

        for (candidate, kind) in edit_candidates(data, variant) {
            if out.len() >= crate::MAX_SUGGESTIONS {
                break;
            }
            if candidate_checks(data, &candidate) {
                any_good = true;
                handle_candidate(
                    data,
                    original_cap,
                    surface,
                    &candidate,
                    kind,
                    &mut handled,
                    &mut out,
                );
                if suppresses_compound_pass(kind) {
                    suppressed = true;
                }
                if matches!(kind, SuggestionKind::SpaceWord) {
                    break 'variants;
                }
            }
        }

        // Stage 4: dash-splitting fallback, only when no clean edit-level
        // fix was found for this variant.
        if !any_good && variant.contains('-') {
            let pieces: Vec<&str> = variant.split('-').collect();
            if pieces.len() > 1 {
                let mut rebuilt = Vec::new();
                let mut all_ok = true;
                for piece in &pieces {
                    if spellchecks(data, piece) {
                        rebuilt.push((*piece).to_string());
                    } else {
                        let fixed = suggest(data, piece);
                        if let Some(best) = fixed.first() {
                            rebuilt.push(best.text.clone());
                        } else {
                            all_ok = false;
                            break;
                        }
                    }
                }
                if all_ok {
                    let joined = rebuilt.join("-");
                    if spellchecks(data, &joined) {
                        handle_candidate(
                            data,
                            original_cap,
                            surface,
                            &joined,
                            SuggestionKind::DashSplit,
                            &mut handled,
                            &mut out,
                        );
                    }
                }
            }
        }

        if !suppressed {
            let cpd_cap = if data.directives.maxcpdsugs > 0 {
                data.directives.maxcpdsugs
            } else {
                crate::MAXCPDSUGS
            };
            let mut compound_count = 0;
            for (candidate, _) in edit_candidates(data, variant) {
                if compound_count >= cpd_cap {
                    break;
                }
                let word = crate::lkword::LKWord::new(data, candidate.clone());
                let compounds = crate::compound::compound_forms(data, &word);
                if !compounds.is_empty() {
                    compound_count += 1;
                    handle_candidate(
                        data,
                        original_cap,
                        surface,
                        &candidate,
                        SuggestionKind::Compound,
                        &mut handled,
                        &mut out,
                    );
                }
            }
        }
    }

    // Stage 5: n-gram and phonetic scoring over the dictionary.
    if out.len() < crate::MAX_SUGGESTIONS {
        let threshold = ngram::score_threshold(surface);
        let ngram_cap = if data.directives.maxngramsugs > 0 {
            data.directives.maxngramsugs
        } else {
            crate::MAXNGRAMSUGS
        };
        // Narrow the whole dictionary down to a root-score shortlist
        // first (cheap: 3-gram overlap + common prefix), then only run
        // the heavier rough/precise scoring on that shortlist.
        let mut root_shortlist = ngram::ScoresList::new(ngram_cap.saturating_mul(4).max(ngram_cap));
        for candidate in data.dictionary.ngram_candidates() {
            if crate::validate::excluded_from_suggestions(data, candidate) {
                continue;
            }
            let root = ngram::root_score(surface, &candidate.stem);
            root_shortlist.add(root, candidate.stem.as_str());
        }

        let mut ngram_list = ngram::ScoresList::new(ngram_cap);
        for (_, stem) in root_shortlist.finish() {
            let rough = ngram::rough_affix_score(surface, stem);
            if rough < threshold {
                continue;
            }
            let score = ngram::precise_affix_score(surface, stem, 1, rough, false);
            ngram_list.add(score, stem);
        }
        for (_, stem) in ngram_list.finish() {
            handle_candidate(
                data,
                original_cap,
                surface,
                stem,
                SuggestionKind::Ngram,
                &mut handled,
                &mut out,
            );
        }

        if !data.directives.phone.is_empty() {
            let candidates: Vec<&str> = data
                .dictionary
                .ngram_candidates()
                .iter()
                .filter(|w| !crate::validate::excluded_from_suggestions(data, w))
                .map(|w| w.stem.as_str())
                .collect();
            let closest =
                phonetic::closest_by_phonetic_key(surface, candidates, &data.directives.phone);
            for stem in closest {
                handle_candidate(
                    data,
                    original_cap,
                    surface,
                    stem,
                    SuggestionKind::Phonetic,
                    &mut handled,
                    &mut out,
                );
            }
        }
    }

    out.truncate(crate::MAX_SUGGESTIONS);
    out
}
