//! Phonetic (metaphone-style) scoring via the `PHONE` rule table (§4.K).
//!
//! Each rule is `(search, replacement)`. `search` may carry a leading `^`
//! (match only at the start of the remaining scan), a trailing `$`
//! (match only when it reaches the end of the word), `_` as a
//! single-character wildcard, and `(abc)` as a one-of-these-chars class.
//! `replacement` of `_` means "delete" (match consumed, nothing emitted).
//! Rules are tried in table order at each scan position; the first match
//! wins, mirroring Hunspell's own left-to-right rule application.

#[derive(Debug, Clone, PartialEq, Eq)]
enum PhoneToken {
    Literal(char),
    Class(Vec<char>),
    Any,
}

impl PhoneToken {
    fn matches(&self, c: char) -> bool {
        match self {
            Self::Literal(l) => *l == c,
            Self::Class(set) => set.contains(&c),
            Self::Any => true,
        }
    }
}

#[derive(Debug, Clone)]
struct PhoneRule {
    start_anchor: bool,
    end_anchor: bool,
    tokens: Vec<PhoneToken>,
    replacement: String,
}

fn parse_phone_rule(search: &str, replacement: &str) -> PhoneRule {
    let mut body = search;
    let start_anchor = body.starts_with('^');
    if start_anchor {
        body = &body[1..];
    }
    let end_anchor = body.ends_with('$');
    if end_anchor {
        body = &body[..body.len() - 1];
    }

    let mut tokens = Vec::new();
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '_' => tokens.push(PhoneToken::Any),
            '(' => {
                let mut set = Vec::new();
                for c in chars.by_ref() {
                    if c == ')' {
                        break;
                    }
                    set.push(c);
                }
                tokens.push(PhoneToken::Class(set));
            }
            other => tokens.push(PhoneToken::Literal(other)),
        }
    }

    PhoneRule {
        start_anchor,
        end_anchor,
        tokens,
        replacement: replacement.to_string(),
    }
}

fn rule_matches_at(rule: &PhoneRule, chars: &[char], pos: usize) -> bool {
    if rule.start_anchor && pos != 0 {
        return false;
    }
    if pos + rule.tokens.len() > chars.len() {
        return false;
    }
    if rule.end_anchor && pos + rule.tokens.len() != chars.len() {
        return false;
    }
    rule.tokens
        .iter()
        .zip(&chars[pos..pos + rule.tokens.len()])
        .all(|(tok, &c)| tok.matches(c))
}

/// Build a word's phonetic key from the `PHONE` table (already lowercased
/// by the caller's convention; this function lowercases again
/// defensively).
#[must_use]
pub fn phonetic_key(word: &str, rules: &[(String, String)]) -> String {
    let word = word.to_lowercase();
    let chars: Vec<char> = word.chars().collect();
    let compiled: Vec<PhoneRule> = rules
        .iter()
        .map(|(s, r)| parse_phone_rule(s, r))
        .collect();

    let mut out = String::new();
    let mut pos = 0;
    while pos < chars.len() {
        let matched = compiled.iter().find(|rule| rule_matches_at(rule, &chars, pos));
        match matched {
            Some(rule) => {
                if rule.replacement != "_" {
                    out.push_str(&rule.replacement);
                }
                pos += rule.tokens.len().max(1);
            }
            None => {
                out.push(chars[pos]);
                pos += 1;
            }
        }
    }

    dedupe_consecutive(&out)
}

fn dedupe_consecutive(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last = None;
    for c in s.chars() {
        if Some(c) != last {
            out.push(c);
        }
        last = Some(c);
    }
    out
}

/// Levenshtein edit distance between two strings, operating on chars.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        dp[0][j] = j;
    }
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            dp[i][j] = if a[i - 1] == b[j - 1] {
                dp[i - 1][j - 1]
            } else {
                1 + dp[i - 1][j].min(dp[i][j - 1]).min(dp[i - 1][j - 1])
            };
        }
    }
    dp[a.len()][b.len()]
}

/// From `candidates`, return up to [`crate::MAX_PHONET_SUGGESTIONS`]
/// whose phonetic key is closest (by Levenshtein distance) to `miss`'s,
/// nearest first.
#[must_use]
pub fn closest_by_phonetic_key<'a>(
    miss: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    rules: &[(String, String)],
) -> Vec<&'a str> {
    let miss_key = phonetic_key(miss, rules);
    let mut scored: Vec<(usize, &str)> = candidates
        .into_iter()
        .map(|c| (levenshtein(&miss_key, &phonetic_key(c, rules)), c))
        .collect();
    scored.sort_by_key(|(dist, _)| *dist);
    scored
        .into_iter()
        .take(crate::MAX_PHONET_SUGGESTIONS)
        .map(|(_, c)| c)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phonetic_key_applies_deletion_rule() {
        // "h" silent after a vowel at the start, e.g. in some transliteration schemes.
        let rules = vec![("h".to_string(), "_".to_string())];
        assert_eq!(phonetic_key("hat", &rules), "at");
    }

    #[test]
    fn test_phonetic_key_dedupes_consecutive_output() {
        let rules: Vec<(String, String)> = Vec::new();
        assert_eq!(phonetic_key("moon", &rules), "mon");
    }

    #[test]
    fn test_phonetic_key_class_and_anchors() {
        let rules = vec![("^(aeiou)".to_string(), "V".to_string())];
        assert_eq!(phonetic_key("apple", &rules), "Vple");
    }

    #[test]
    fn test_levenshtein_basic() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
    }

    #[test]
    fn test_closest_by_phonetic_key_ranks_nearest_first() {
        let rules: Vec<(String, String)> = Vec::new();
        let candidates = ["nite", "night", "zzzzzz"];
        let closest = closest_by_phonetic_key("knight", candidates, &rules);
        assert_eq!(closest.first(), Some(&"night"));
    }
}
