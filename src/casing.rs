//! Capitalization classification and case coercion (§4.B).

/// The capitalization class of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapType {
    /// No uppercase letters at all.
    No,
    /// First letter uppercase, rest lowercase.
    Init,
    /// Every letter uppercase.
    All,
    /// Mixed case, first letter lowercase.
    Huh,
    /// Mixed case, first letter uppercase.
    HuhInit,
}

/// Classifies and reshapes words according to a language's casing rules.
///
/// The default [`StandardCasing`] handles the general case; [`GermanCasing`]
/// additionally treats `ß` as case-insensitively equal to `ss`/`SS`, and
/// [`TurkicCasing`] maps `i ↔ İ` and `ı ↔ I` instead of the Unicode
/// default (`i ↔ I`).
pub trait Casing {
    /// Classify `s`'s capitalization.
    fn guess(&self, s: &str) -> CapType;

    /// Lowercase `s` per this casing's rules.
    fn to_lower(&self, s: &str) -> String;

    /// Uppercase `s` per this casing's rules.
    fn to_upper(&self, s: &str) -> String;

    /// Title-case `s` (first letter upper, rest lower) per this casing's
    /// rules.
    fn to_title(&self, s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => {
                let mut out = self.to_upper(&first.to_string());
                out.push_str(&self.to_lower(chars.as_str()));
                out
            }
            None => String::new(),
        }
    }

    /// The original plus the lookup variants worth trying as dictionary
    /// keys for `check`.
    fn variants(&self, s: &str) -> (CapType, Vec<String>) {
        let cap = self.guess(s);
        let mut out = vec![s.to_string()];

        match cap {
            CapType::No => {}
            CapType::Init | CapType::All => {
                let lower = self.to_lower(s);
                if lower != s {
                    out.push(lower);
                }
                if matches!(cap, CapType::All) {
                    let title = self.to_title(s);
                    if !out.contains(&title) {
                        out.push(title);
                    }
                }
            }
            CapType::Huh | CapType::HuhInit => {
                // Mixed case: try the form with only the first letter's
                // case toggled, since that's the only systematic
                // alternative a HUH word could plausibly have meant.
                let mut chars = s.chars();
                if let Some(first) = chars.next() {
                    let toggled = if first.is_uppercase() {
                        self.to_lower(&first.to_string())
                    } else {
                        self.to_upper(&first.to_string())
                    };
                    let mut alt = toggled;
                    alt.push_str(chars.as_str());
                    out.push(alt);
                }
            }
        }

        (cap, out)
    }

    /// Like [`Self::variants`], but for suggestion-search purposes, which
    /// additionally tries title case for `HUH`/`HUHINIT` inputs.
    fn corrections(&self, s: &str) -> (CapType, Vec<String>) {
        let (cap, mut out) = self.variants(s);
        if matches!(cap, CapType::Huh | CapType::HuhInit) {
            let title = self.to_title(s);
            if !out.contains(&title) {
                out.push(title);
            }
        }
        (cap, out)
    }

    /// Reshape `candidate` to match `original_cap`'s capitalization class.
    fn coerce(&self, candidate: &str, original_cap: CapType) -> String {
        match original_cap {
            CapType::No | CapType::Huh => candidate.to_string(),
            CapType::Init | CapType::HuhInit => self.to_title(candidate),
            CapType::All => self.to_upper(candidate),
        }
    }
}

/// The default casing strategy: Unicode's own notion of upper/lowercase,
/// no special-casing of any letter.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCasing;

impl Casing for StandardCasing {
    fn guess(&self, s: &str) -> CapType {
        guess_with(s, char::is_uppercase)
    }

    fn to_lower(&self, s: &str) -> String {
        s.to_lowercase()
    }

    fn to_upper(&self, s: &str) -> String {
        s.to_uppercase()
    }
}

/// Casing that treats `ß` as case-insensitively equal to `ss`/`SS`,
/// selected when the affix description sets `CHECKSHARPS`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GermanCasing;

impl GermanCasing {
    /// Whether `a` and `b` are equal under sharp-s folding: identical, or
    /// one is `ß` where the other is `ss`/`SS`.
    #[must_use]
    pub fn sharps_equal(a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }
        let fold = |s: &str| s.to_lowercase().replace('ß', "ss");
        fold(a) == fold(b)
    }
}

impl Casing for GermanCasing {
    fn guess(&self, s: &str) -> CapType {
        guess_with(s, char::is_uppercase)
    }

    fn to_lower(&self, s: &str) -> String {
        s.to_lowercase()
    }

    fn to_upper(&self, s: &str) -> String {
        // German's uppercase `ß` is conventionally `SS` (the modern
        // capital ẞ exists but is rarely what Hunspell dictionaries use).
        s.to_uppercase().replace('ẞ', "SS")
    }
}

/// Casing for Turkic languages (selected via `LANG`), where `i`/`İ` and
/// `ı`/`I` pair up instead of the Unicode default `i`/`I`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurkicCasing;

impl Casing for TurkicCasing {
    fn guess(&self, s: &str) -> CapType {
        guess_with(s, |c| c.is_uppercase() || c == 'İ')
    }

    fn to_lower(&self, s: &str) -> String {
        s.chars()
            .map(|c| match c {
                'I' => 'ı',
                'İ' => 'i',
                other => other.to_lowercase().next().unwrap_or(other),
            })
            .collect()
    }

    fn to_upper(&self, s: &str) -> String {
        s.chars()
            .map(|c| match c {
                'i' => 'İ',
                'ı' => 'I',
                other => other.to_uppercase().next().unwrap_or(other),
            })
            .collect()
    }
}

fn guess_with(s: &str, is_upper: impl Fn(char) -> bool) -> CapType {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return CapType::No;
    };

    let first_upper = is_upper(first);
    let rest_upper: Vec<bool> = chars.map(&is_upper).collect();
    let any_rest_upper = rest_upper.iter().any(|&u| u);
    let all_rest_upper = rest_upper.iter().all(|&u| u);

    match (first_upper, any_rest_upper, all_rest_upper) {
        (false, false, _) => CapType::No,
        (false, true, true) => CapType::Huh, // rest all-upper, first lower: still mixed
        (false, true, false) => CapType::Huh,
        (true, false, _) => CapType::Init,
        (true, true, true) => CapType::All,
        (true, true, false) => CapType::HuhInit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("hello", CapType::No)]
    #[case("Hello", CapType::Init)]
    #[case("HELLO", CapType::All)]
    #[case("hELLo", CapType::Huh)]
    #[case("HEllo", CapType::HuhInit)]
    #[case("", CapType::No)]
    fn test_guess(#[case] input: &str, #[case] expected: CapType) {
        let casing = StandardCasing;
        assert_eq!(casing.guess(input), expected);
    }

    #[test]
    fn test_coerce_all_uppercase() {
        let casing = StandardCasing;
        assert_eq!(casing.coerce("hello", CapType::All), "HELLO");
    }

    #[test]
    fn test_coerce_init() {
        let casing = StandardCasing;
        assert_eq!(casing.coerce("hello world", CapType::Init), "Hello world");
    }

    #[test]
    fn test_german_sharps_equal() {
        assert!(GermanCasing::sharps_equal("Straße", "STRASSE"));
        assert!(GermanCasing::sharps_equal("fuß", "fuss"));
        assert!(!GermanCasing::sharps_equal("fuß", "fus"));
    }

    #[test]
    fn test_turkic_dotless_i() {
        let casing = TurkicCasing;
        assert_eq!(casing.to_upper("ısırgan"), "ISIRGAN");
        assert_eq!(casing.to_lower("İSTANBUL"), "istanbul");
    }
}
