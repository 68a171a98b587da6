//! Parses the word list (§6): a count line, then one entry per line of
//! `stem[/flags][ key:value ...]`.

use std::collections::BTreeMap;

use crate::dictionary::Word;
use crate::error::ParseError;
use crate::flags::{parse_flags, AliasTable, FlagEncoding, FlagSet};

fn err(line: usize, detail: impl Into<String>) -> ParseError {
    ParseError::Dictionary {
        line,
        detail: detail.into(),
    }
}

/// Split `stem/flags` on the first unescaped `/`, unescaping `\/` in the
/// stem as it goes.
fn split_stem_and_flags(entry: &str) -> (String, Option<&str>) {
    let bytes = entry.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'/' && (i == 0 || bytes[i - 1] != b'\\') {
            let stem = entry[..i].replace("\\/", "/");
            return (stem, Some(&entry[i + 1..]));
        }
        i += 1;
    }
    (entry.replace("\\/", "/"), None)
}

/// Parse a complete word list into its flat entry list. `encoding` and
/// `aliases` come from the paired affix description, since flag strings
/// here are interpreted the same way.
pub fn parse_dic(
    text: &str,
    encoding: FlagEncoding,
    aliases: &AliasTable,
) -> Result<Vec<Word>, ParseError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut iter = lines.iter().enumerate();

    let Some((_, count_line)) = iter.next() else {
        return Err(err(1, "word list is empty, missing the count line"));
    };
    let count: usize = count_line
        .trim()
        .parse()
        .map_err(|_| err(1, "first line must be the entry count"))?;

    let mut words = Vec::with_capacity(count);

    for (idx, raw) in iter {
        let line_no = idx + 1;
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let mut fields = raw.split_whitespace();
        let Some(first) = fields.next() else {
            continue;
        };

        let (stem, flagstr) = split_stem_and_flags(first);
        if stem.is_empty() {
            return Err(err(line_no, "entry has an empty stem"));
        }

        let flags: FlagSet = flagstr
            .map(|s| parse_flags(s, encoding, aliases))
            .unwrap_or_default();

        let mut morph: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for tag in fields {
            if let Some((key, value)) = tag.split_once(':') {
                morph
                    .entry(key.to_string())
                    .or_default()
                    .push(value.to_string());
            } else if let Ok(idx) = tag.parse::<usize>() {
                // A bare number is an `AM` alias: the 1-indexed table row
                // holds the actual `key:value` tags this entry carries.
                if let Some(aliased) = aliases.resolve_am(idx) {
                    for aliased_tag in aliased {
                        if let Some((key, value)) = aliased_tag.split_once(':') {
                            morph
                                .entry(key.to_string())
                                .or_default()
                                .push(value.to_string());
                        }
                    }
                }
            }
        }

        let alt_spellings = morph.get("ph").cloned().unwrap_or_default();

        words.push(Word {
            stem,
            flags,
            morph,
            alt_spellings,
            relevant_prefixes: Vec::new(),
            relevant_suffixes: Vec::new(),
        });
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_entries() {
        let dic = "2\nhello\nworld/S\n";
        let aliases = AliasTable::new();
        let words = parse_dic(dic, FlagEncoding::Short, &aliases).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].stem, "hello");
        assert!(words[0].flags.is_empty());
        assert_eq!(words[1].stem, "world");
        assert!(words[1].flags.contains(crate::flags::Flag('S' as u32)));
    }

    #[test]
    fn test_parse_escaped_slash_in_stem() {
        let dic = "1\nkm\\/h\n";
        let aliases = AliasTable::new();
        let words = parse_dic(dic, FlagEncoding::Short, &aliases).unwrap();
        assert_eq!(words[0].stem, "km/h");
    }

    #[test]
    fn test_parse_morph_tags() {
        let dic = "1\ncolour/S po:noun ph:color\n";
        let aliases = AliasTable::new();
        let words = parse_dic(dic, FlagEncoding::Short, &aliases).unwrap();
        assert_eq!(words[0].morph.get("po"), Some(&vec!["noun".to_string()]));
        assert_eq!(words[0].alt_spellings, vec!["color".to_string()]);
    }

    #[test]
    fn test_parse_am_alias_expands_to_morph_tags() {
        use std::collections::BTreeSet;

        let mut aliases = AliasTable::new();
        aliases.push_am(BTreeSet::from(["po:noun".to_string(), "is:sg".to_string()]));

        let dic = "1\ncolour/S 1\n";
        let words = parse_dic(dic, FlagEncoding::Short, &aliases).unwrap();
        assert_eq!(words[0].morph.get("po"), Some(&vec!["noun".to_string()]));
        assert_eq!(words[0].morph.get("is"), Some(&vec!["sg".to_string()]));
    }

    #[test]
    fn test_missing_count_line_is_an_error() {
        assert!(parse_dic("", FlagEncoding::Short, &AliasTable::new()).is_err());
    }

    #[test]
    fn test_bad_count_line_is_an_error() {
        assert!(parse_dic("not-a-number\nhello\n", FlagEncoding::Short, &AliasTable::new()).is_err());
    }
}
