//! Parses the affix description (§6): directive lines, optionally
//! followed by a declared number of table rows.

use std::collections::BTreeSet;

use crate::affix::{AffixEntry, Condition, Side};
use crate::error::ParseError;
use crate::flags::{parse_flag, parse_flags, AliasTable, Flag, FlagEncoding};
use crate::lkword::Directives;

/// Everything `parse_affix` extracts from the description: the chosen
/// flag encoding, the resolved `AF`/`AM` alias table, every recognized
/// directive, and the flat list of parsed prefix/suffix entries.
#[derive(Debug, Clone)]
pub struct ParsedAffix {
    pub flag_encoding: FlagEncoding,
    pub aliases: AliasTable,
    pub directives: Directives,
    pub entries: Vec<AffixEntry>,
}

fn err(line: usize, detail: impl Into<String>) -> ParseError {
    ParseError::Affix {
        line,
        detail: detail.into(),
    }
}

fn next_flag(
    tokens: &mut std::str::SplitWhitespace<'_>,
    encoding: FlagEncoding,
    aliases: &AliasTable,
    line: usize,
    keyword: &str,
) -> Result<Option<Flag>, ParseError> {
    let Some(arg) = tokens.next() else {
        return Err(err(line, format!("{keyword} missing flag argument")));
    };
    Ok(parse_flag(arg, encoding, aliases))
}

fn next_usize(
    tokens: &mut std::str::SplitWhitespace<'_>,
    line: usize,
    keyword: &str,
) -> Result<usize, ParseError> {
    tokens
        .next()
        .ok_or_else(|| err(line, format!("{keyword} missing numeric argument")))?
        .parse::<usize>()
        .map_err(|_| err(line, format!("{keyword} argument is not a number")))
}

fn next_i32(
    tokens: &mut std::str::SplitWhitespace<'_>,
    line: usize,
    keyword: &str,
) -> Result<i32, ParseError> {
    tokens
        .next()
        .ok_or_else(|| err(line, format!("{keyword} missing numeric argument")))?
        .parse::<i32>()
        .map_err(|_| err(line, format!("{keyword} argument is not a number")))
}

/// Read a `KEYWORD count` line's count, then `count` subsequent rows each
/// expected to restate `keyword` as their own first token. Returns the
/// parsed rows (each as its remaining whitespace-split tokens) and the
/// index just past the last row consumed.
fn read_table<'a>(
    lines: &[&'a str],
    mut i: usize,
    line_no: usize,
    keyword: &str,
    count: usize,
) -> Result<(Vec<Vec<&'a str>>, usize), ParseError> {
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        if i >= lines.len() {
            return Err(err(line_no, format!("{keyword} table is short of rows")));
        }
        let raw = lines[i].trim();
        let row_line = i + 1;
        i += 1;
        let mut tokens = raw.split_whitespace();
        let kw = tokens.next().unwrap_or_default();
        if kw != keyword {
            return Err(err(row_line, format!("expected a {keyword} row")));
        }
        rows.push(tokens.collect::<Vec<_>>());
    }
    Ok((rows, i))
}

/// Parse a complete affix description into its directives, aliases, and
/// flat affix entry list.
#[allow(clippy::too_many_lines)]
pub fn parse_affix(text: &str) -> Result<ParsedAffix, ParseError> {
    let mut encoding = FlagEncoding::Short;
    let mut aliases = AliasTable::new();
    let mut directives = Directives::default();
    let mut entries = Vec::new();

    let lines: Vec<&str> = text.lines().collect();
    let mut i = 0;

    while i < lines.len() {
        let line_no = i + 1;
        let raw = lines[i].trim();
        i += 1;
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }

        let mut tokens = raw.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "FLAG" => {
                let arg = tokens
                    .next()
                    .ok_or_else(|| err(line_no, "FLAG missing argument"))?;
                encoding = FlagEncoding::parse(arg);
            }
            "TRY" => {
                directives.try_chars = tokens.next().unwrap_or_default().chars().collect();
            }
            "KEY" => {
                directives.key_rows = tokens
                    .next()
                    .unwrap_or_default()
                    .split('|')
                    .map(|row| row.chars().collect())
                    .collect();
            }
            "LANG" => {
                directives.lang = tokens.next().map(str::to_string);
            }
            "IGNORE" => {
                directives.ignore = tokens.next().unwrap_or_default().chars().collect();
            }
            "NOSUGGEST" => {
                directives.nosuggest = next_flag(&mut tokens, encoding, &aliases, line_no, keyword)?;
            }
            "KEEPCASE" => {
                directives.keepcase = next_flag(&mut tokens, encoding, &aliases, line_no, keyword)?;
            }
            "NEEDAFFIX" => {
                directives.needaffix = next_flag(&mut tokens, encoding, &aliases, line_no, keyword)?;
            }
            "CIRCUMFIX" => {
                directives.circumfix = next_flag(&mut tokens, encoding, &aliases, line_no, keyword)?;
            }
            "FORBIDDENWORD" => {
                directives.forbiddenword =
                    next_flag(&mut tokens, encoding, &aliases, line_no, keyword)?;
            }
            "WARN" => {
                directives.warn = next_flag(&mut tokens, encoding, &aliases, line_no, keyword)?;
            }
            "ONLYINCOMPOUND" => {
                directives.onlyincompound =
                    next_flag(&mut tokens, encoding, &aliases, line_no, keyword)?;
            }
            "COMPOUNDFLAG" => {
                directives.compoundflag =
                    next_flag(&mut tokens, encoding, &aliases, line_no, keyword)?;
            }
            "COMPOUNDBEGIN" => {
                directives.compoundbegin =
                    next_flag(&mut tokens, encoding, &aliases, line_no, keyword)?;
            }
            "COMPOUNDMIDDLE" => {
                directives.compoundmiddle =
                    next_flag(&mut tokens, encoding, &aliases, line_no, keyword)?;
            }
            "COMPOUNDEND" => {
                directives.compoundend =
                    next_flag(&mut tokens, encoding, &aliases, line_no, keyword)?;
            }
            "COMPOUNDPERMITFLAG" => {
                directives.compoundpermitflag =
                    next_flag(&mut tokens, encoding, &aliases, line_no, keyword)?;
            }
            "COMPOUNDFORBIDFLAG" => {
                directives.compoundforbidflag =
                    next_flag(&mut tokens, encoding, &aliases, line_no, keyword)?;
            }
            "FORCEUCASE" => {
                directives.forceucase =
                    next_flag(&mut tokens, encoding, &aliases, line_no, keyword)?;
            }
            "COMPLEXPREFIXES" => directives.complexprefixes = true,
            "FULLSTRIP" => directives.fullstrip = true,
            "NOSPLITSUGS" => directives.nosplitsugs = true,
            "CHECKSHARPS" => directives.checksharps = true,
            "CHECKCOMPOUNDCASE" => directives.checkcompoundcase = true,
            "CHECKCOMPOUNDUP" => directives.checkcompoundup = true,
            "CHECKCOMPOUNDREP" => directives.checkcompoundrep = true,
            "CHECKCOMPOUNDTRIPLE" => directives.checkcompoundtriple = true,
            "CHECKCOMPOUNDDUP" => directives.checkcompounddup = true,
            "SIMPLIFIEDTRIPLE" => directives.simplifiedtriple = true,
            "ONLYMAXDIFF" => directives.onlymaxdiff = true,
            "FORBIDWARN" => directives.forbidwarn = true,
            "COMPOUNDMIN" => directives.compoundmin = next_usize(&mut tokens, line_no, keyword)?,
            "COMPOUNDWORDMAX" => {
                directives.compoundwordmax = next_usize(&mut tokens, line_no, keyword)?;
            }
            "MAXCPDSUGS" => directives.maxcpdsugs = next_usize(&mut tokens, line_no, keyword)?,
            "MAXNGRAMSUGS" => directives.maxngramsugs = next_usize(&mut tokens, line_no, keyword)?,
            "MAXDIFF" => directives.maxdiff = next_i32(&mut tokens, line_no, keyword)?,
            "REP" => {
                let count = next_usize(&mut tokens, line_no, keyword)?;
                let (rows, next_i) = read_table(&lines, i, line_no, keyword, count)?;
                i = next_i;
                for row in rows {
                    if let [from, to] = row[..] {
                        // `_` stands for a literal space, since the row's
                        // own fields are whitespace-delimited.
                        directives
                            .rep
                            .push((from.replace('_', " "), to.replace('_', " ")));
                    }
                }
            }
            "MAP" => {
                let count = next_usize(&mut tokens, line_no, keyword)?;
                let (rows, next_i) = read_table(&lines, i, line_no, keyword, count)?;
                i = next_i;
                for row in rows {
                    if let [class] = row[..] {
                        directives.map.push(class.chars().collect());
                    }
                }
            }
            "BREAK" => {
                let count = next_usize(&mut tokens, line_no, keyword)?;
                let (rows, next_i) = read_table(&lines, i, line_no, keyword, count)?;
                i = next_i;
                for row in rows {
                    if let [pattern] = row[..] {
                        directives.break_patterns.push(pattern.to_string());
                    }
                }
            }
            "COMPOUNDRULE" => {
                let count = next_usize(&mut tokens, line_no, keyword)?;
                let (rows, next_i) = read_table(&lines, i, line_no, keyword, count)?;
                i = next_i;
                for row in rows {
                    if let [rule] = row[..] {
                        directives.compound_rules.push(rule.to_string());
                    }
                }
            }
            "CHECKCOMPOUNDPATTERN" => {
                let count = next_usize(&mut tokens, line_no, keyword)?;
                let (rows, next_i) = read_table(&lines, i, line_no, keyword, count)?;
                i = next_i;
                for row in rows {
                    match row[..] {
                        [left, right] => directives
                            .compound_patterns
                            .push((left.to_string(), right.to_string(), None)),
                        [left, right, replacement] => directives.compound_patterns.push((
                            left.to_string(),
                            right.to_string(),
                            Some(replacement.to_string()),
                        )),
                        _ => {}
                    }
                }
            }
            "ICONV" => {
                let count = next_usize(&mut tokens, line_no, keyword)?;
                let (rows, next_i) = read_table(&lines, i, line_no, keyword, count)?;
                i = next_i;
                for row in rows {
                    if let [from, to] = row[..] {
                        directives.iconv.push((from.to_string(), to.to_string()));
                    }
                }
            }
            "OCONV" => {
                let count = next_usize(&mut tokens, line_no, keyword)?;
                let (rows, next_i) = read_table(&lines, i, line_no, keyword, count)?;
                i = next_i;
                for row in rows {
                    if let [from, to] = row[..] {
                        directives.oconv.push((from.to_string(), to.to_string()));
                    }
                }
            }
            "PHONE" => {
                let count = next_usize(&mut tokens, line_no, keyword)?;
                let (rows, next_i) = read_table(&lines, i, line_no, keyword, count)?;
                i = next_i;
                for row in rows {
                    if let [search, replacement] = row[..] {
                        directives
                            .phone
                            .push((search.to_string(), replacement.to_string()));
                    }
                }
            }
            "AF" => {
                let count = next_usize(&mut tokens, line_no, keyword)?;
                let (rows, next_i) = read_table(&lines, i, line_no, keyword, count)?;
                i = next_i;
                for row in rows {
                    if let [flagstr] = row[..] {
                        // AF entries parse literally: the table being
                        // built is what later numeric tokens resolve
                        // against, so it cannot reference itself.
                        let empty = AliasTable::new();
                        aliases.push_af(parse_flags(flagstr, encoding, &empty));
                    }
                }
            }
            "AM" => {
                let count = next_usize(&mut tokens, line_no, keyword)?;
                let (rows, next_i) = read_table(&lines, i, line_no, keyword, count)?;
                i = next_i;
                for row in rows {
                    let tags: BTreeSet<String> = row.iter().map(|s| (*s).to_string()).collect();
                    aliases.push_am(tags);
                }
            }
            "PFX" | "SFX" => {
                let side = if keyword == "PFX" {
                    Side::Prefix
                } else {
                    Side::Suffix
                };
                let class_tok = tokens
                    .next()
                    .ok_or_else(|| err(line_no, format!("{keyword} missing class flag")))?;
                let class = parse_flag(class_tok, encoding, &aliases)
                    .ok_or_else(|| err(line_no, format!("{keyword} has an empty class flag")))?;
                let crossproduct = tokens.next().unwrap_or_default() == "Y";
                let count = next_usize(&mut tokens, line_no, keyword)?;
                let (rows, next_i) = read_table(&lines, i, line_no, keyword, count)?;
                i = next_i;

                for row in rows {
                    if row.len() < 4 {
                        continue;
                    }
                    // row: [class, strip, add[/flags], condition, ...morph]
                    let strip = if row[1] == "0" { String::new() } else { row[1].to_string() };
                    let (add, aux_flags) = match row[2].split_once('/') {
                        Some((add, flagstr)) => {
                            (add.to_string(), parse_flags(flagstr, encoding, &aliases))
                        }
                        None => (
                            if row[2] == "0" { String::new() } else { row[2].to_string() },
                            crate::flags::FlagSet::new(),
                        ),
                    };
                    let condition = Condition::parse(row[3]);

                    entries.push(AffixEntry {
                        side,
                        class,
                        strip,
                        add,
                        condition,
                        crossproduct,
                        flags: aux_flags,
                    });
                }
            }
            _ => {
                // Unrecognized directives are inert (§7e): unknown flags
                // and keywords don't fail construction.
            }
        }
    }

    Ok(ParsedAffix {
        flag_encoding: encoding,
        aliases,
        directives,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_suffix_s1() {
        let aff = "SFX A Y 1\nSFX A 0 s .\n";
        let parsed = parse_affix(aff).unwrap();
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].side, Side::Suffix);
        assert_eq!(parsed.entries[0].add, "s");
        assert!(parsed.entries[0].crossproduct);
    }

    #[test]
    fn test_parse_cross_product_s2() {
        let aff = "PFX B Y 1\nPFX B 0 re .\nSFX A Y 1\nSFX A 0 ing .\n";
        let parsed = parse_affix(aff).unwrap();
        assert_eq!(parsed.entries.len(), 2);
        assert!(parsed.entries.iter().all(|e| e.crossproduct));
    }

    #[test]
    fn test_parse_keepcase_directive_s3() {
        let aff = "KEEPCASE K\n";
        let parsed = parse_affix(aff).unwrap();
        assert_eq!(parsed.directives.keepcase, Some(Flag('K' as u32)));
    }

    #[test]
    fn test_parse_compound_directives_s4() {
        let aff = "COMPOUNDFLAG C\nCOMPOUNDMIN 3\n";
        let parsed = parse_affix(aff).unwrap();
        assert_eq!(parsed.directives.compoundflag, Some(Flag('C' as u32)));
        assert_eq!(parsed.directives.compoundmin, 3);
    }

    #[test]
    fn test_parse_compoundrule_table_s5() {
        let aff = "COMPOUNDRULE 1\nCOMPOUNDRULE AB*C\n";
        let parsed = parse_affix(aff).unwrap();
        assert_eq!(parsed.directives.compound_rules, vec!["AB*C".to_string()]);
    }

    #[test]
    fn test_parse_rep_table_s6() {
        let aff = "REP 1\nREP alot a_lot\n";
        let parsed = parse_affix(aff).unwrap();
        assert_eq!(
            parsed.directives.rep,
            vec![("alot".to_string(), "a lot".to_string())]
        );
    }

    #[test]
    fn test_short_table_is_an_error() {
        let aff = "REP 2\nREP alot a_lot\n";
        assert!(parse_affix(aff).is_err());
    }
}
