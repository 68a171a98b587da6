//! Edit permutators: the dozen Hunspell operators used to generate
//! suggestion candidates from a misspelling (§4.I).
//!
//! Each function takes the original surface and returns an owned `Vec`
//! of candidates (rather than a lazy iterator): candidate counts here are
//! small (bounded by word length), so the allocation cost is negligible
//! next to the dictionary lookups each candidate then drives.

/// `replchars(s, REP)` — apply one REP rule; a rule whose replacement
/// contains a space yields a two-word split instead of a single string.
#[must_use]
pub fn replchars(s: &str, rep: &[(String, String)]) -> Vec<String> {
    let mut out = Vec::new();
    for (from, to) in rep {
        let mut start = 0;
        while let Some(pos) = s[start..].find(from.as_str()) {
            let abs = start + pos;
            let mut candidate = String::with_capacity(s.len());
            candidate.push_str(&s[..abs]);
            candidate.push_str(to);
            candidate.push_str(&s[abs + from.len()..]);
            out.push(candidate);
            start = abs + from.len().max(1);
            if start > s.len() {
                break;
            }
        }
    }
    out
}

/// `mapchars(s, MAP)` — substitute one character from a MAP equivalence
/// class at every position where a class member occurs.
#[must_use]
pub fn mapchars(s: &str, map: &[Vec<char>]) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    for (i, &c) in chars.iter().enumerate() {
        for class in map {
            if !class.contains(&c) {
                continue;
            }
            for &alt in class {
                if alt == c {
                    continue;
                }
                let mut candidate = chars.clone();
                candidate[i] = alt;
                out.push(candidate.into_iter().collect());
            }
        }
    }
    out
}

/// `swapchar(s)` — swap any two adjacent characters; for 4- and 5-letter
/// words, additionally try swapping two disjoint adjacent pairs at once.
#[must_use]
pub fn swapchar(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let n = chars.len();
    let mut out = Vec::new();

    for i in 0..n.saturating_sub(1) {
        let mut candidate = chars.clone();
        candidate.swap(i, i + 1);
        out.push(candidate.into_iter().collect());
    }

    if n == 4 || n == 5 {
        let mut candidate = chars.clone();
        candidate.swap(0, 1);
        candidate.swap(2, 3);
        out.push(candidate.into_iter().collect());
    }

    out
}

/// `longswapchar(s)` — swap non-adjacent character pairs up to distance 4.
#[must_use]
pub fn longswapchar(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let n = chars.len();
    let mut out = Vec::new();

    for i in 0..n {
        for j in (i + 2)..n.min(i + 5) {
            let mut candidate = chars.clone();
            candidate.swap(i, j);
            out.push(candidate.into_iter().collect());
        }
    }
    out
}

/// `badchar(s, TRY)` — replace one character with each `TRY`-list
/// character.
#[must_use]
pub fn badchar(s: &str, try_chars: &[char]) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    for i in 0..chars.len() {
        for &t in try_chars {
            if chars[i] == t {
                continue;
            }
            let mut candidate = chars.clone();
            candidate[i] = t;
            out.push(candidate.into_iter().collect());
        }
    }
    out
}

/// `badcharkey(s, KEY)` — replace one character with its keyboard
/// neighbor, per `KEY` rows (each row `|`-split into adjacency groups).
#[must_use]
pub fn badcharkey(s: &str, key_rows: &[Vec<char>]) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    for i in 0..chars.len() {
        for row in key_rows {
            let Some(pos) = row.iter().position(|&c| c == chars[i]) else {
                continue;
            };
            let mut neighbors = Vec::new();
            if pos > 0 {
                neighbors.push(row[pos - 1]);
            }
            if pos + 1 < row.len() {
                neighbors.push(row[pos + 1]);
            }
            for n in neighbors {
                let mut candidate = chars.clone();
                candidate[i] = n;
                out.push(candidate.into_iter().collect());
            }
        }
    }
    out
}

/// `extrachar(s)` — delete one character.
#[must_use]
pub fn extrachar(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    (0..chars.len())
        .map(|i| {
            chars
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &c)| c)
                .collect()
        })
        .collect()
}

/// `forgotchar(s, TRY)` — insert a `TRY` character at every position.
#[must_use]
pub fn forgotchar(s: &str, try_chars: &[char]) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    for i in 0..=chars.len() {
        for &t in try_chars {
            let mut candidate = chars.clone();
            candidate.insert(i, t);
            out.push(candidate.into_iter().collect());
        }
    }
    out
}

/// `movechar(s)` — move one character up to 4 positions away (in either
/// direction).
#[must_use]
pub fn movechar(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let n = chars.len();
    let mut out = Vec::new();

    for i in 0..n {
        for dist in 1..=4 {
            for &j in &[i.checked_sub(dist), (i + dist < n).then_some(i + dist)] {
                let Some(j) = j else { continue };
                let mut candidate = chars.clone();
                let c = candidate.remove(i);
                let insert_at = if j > i { j - 1 } else { j };
                candidate.insert(insert_at.min(candidate.len()), c);
                out.push(candidate.into_iter().collect());
            }
        }
    }
    out
}

/// `doubletwochars(s)` — undo a doubled bigram (`foofoo` -> `foo`).
#[must_use]
pub fn doubletwochars(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let n = chars.len();
    if n < 4 || n % 2 != 0 {
        return Vec::new();
    }
    let half = n / 2;
    if chars[..half] == chars[half..] {
        vec![chars[..half].iter().collect()]
    } else {
        Vec::new()
    }
}

/// `twowords(s)` — every single-space split of `s` into two non-empty
/// pieces.
#[must_use]
pub fn twowords(s: &str) -> Vec<(String, String)> {
    let chars: Vec<char> = s.chars().collect();
    (1..chars.len())
        .map(|i| (chars[..i].iter().collect(), chars[i..].iter().collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swapchar_adjacent_and_double() {
        let candidates = swapchar("abcd");
        assert!(candidates.contains(&"bacd".to_string()));
        assert!(candidates.contains(&"abdc".to_string()));
        assert!(candidates.contains(&"badc".to_string())); // double swap
    }

    #[test]
    fn test_extrachar_deletes_each_position() {
        let candidates = extrachar("abc");
        assert_eq!(candidates, vec!["bc", "ac", "ab"]);
    }

    #[test]
    fn test_forgotchar_inserts_every_position() {
        let candidates = forgotchar("ab", &['x']);
        assert!(candidates.contains(&"xab".to_string()));
        assert!(candidates.contains(&"axb".to_string()));
        assert!(candidates.contains(&"abx".to_string()));
    }

    #[test]
    fn test_doubletwochars_detects_doubled_bigram() {
        assert_eq!(doubletwochars("foofoo"), vec!["foo".to_string()]);
        assert!(doubletwochars("foobar").is_empty());
    }

    #[test]
    fn test_twowords_splits_every_position() {
        let splits = twowords("abc");
        assert_eq!(
            splits,
            vec![
                ("a".to_string(), "bc".to_string()),
                ("ab".to_string(), "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_replchars_applies_rule() {
        let rep = vec![("ph".to_string(), "f".to_string())];
        let candidates = replchars("phone", &rep);
        assert!(candidates.contains(&"fone".to_string()));
    }

    #[test]
    fn test_mapchars_substitutes_equivalence_class() {
        let map = vec![vec!['a', 'á']];
        let candidates = mapchars("cat", &map);
        assert!(candidates.contains(&"cát".to_string()));
    }
}
