//! [`LKWord`], the shared representation decomposition and compounding
//! build on (§3).
//!
//! All tables an [`LKWord`] needs (affix tables, dictionary, directives,
//! casing strategy) live in [`EngineData`], built once at
//! [`crate::engine::Engine::new`] and thereafter immutable. `LKWord`
//! borrows it for `'engine`, mirroring the teacher's own
//! lifetime-parameterized `ScopedView<'viewee>`: cheap to clone (it's just
//! a reference plus a small owned string and two `Copy` fields), no
//! reference counting needed since nothing outlives the engine that built
//! it.

use std::fmt;

use crate::affix::AffixTables;
use crate::casing::{Casing, CapType};
use crate::dictionary::Dictionary;
use crate::flags::{AliasTable, Flag, FlagEncoding};

/// A word's position within a compound, or `None` if compounding isn't in
/// play for this query at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundPosition {
    /// The first part of a compound.
    Begin,
    /// Any part between the first and the last.
    Middle,
    /// The last part of a compound.
    End,
}

/// Directive settings recognized from the affix description (§6),
/// restricted to the subset that affects core behavior.
#[derive(Debug, Clone, Default)]
pub struct Directives {
    /// Flags: `NOSUGGEST, KEEPCASE, NEEDAFFIX, CIRCUMFIX, FORBIDDENWORD,
    /// WARN, ONLYINCOMPOUND, COMPOUNDFLAG, COMPOUNDBEGIN, COMPOUNDMIDDLE,
    /// COMPOUNDEND, COMPOUNDPERMITFLAG, COMPOUNDFORBIDFLAG, FORCEUCASE`.
    pub nosuggest: Option<Flag>,
    pub keepcase: Option<Flag>,
    pub needaffix: Option<Flag>,
    pub circumfix: Option<Flag>,
    pub forbiddenword: Option<Flag>,
    pub warn: Option<Flag>,
    pub onlyincompound: Option<Flag>,
    pub compoundflag: Option<Flag>,
    pub compoundbegin: Option<Flag>,
    pub compoundmiddle: Option<Flag>,
    pub compoundend: Option<Flag>,
    pub compoundpermitflag: Option<Flag>,
    pub compoundforbidflag: Option<Flag>,
    pub forceucase: Option<Flag>,

    /// Booleans: `COMPLEXPREFIXES, FULLSTRIP, NOSPLITSUGS, CHECKSHARPS,
    /// CHECKCOMPOUNDCASE, CHECKCOMPOUNDUP, CHECKCOMPOUNDREP,
    /// CHECKCOMPOUNDTRIPLE, CHECKCOMPOUNDDUP, SIMPLIFIEDTRIPLE,
    /// ONLYMAXDIFF, FORBIDWARN`.
    pub complexprefixes: bool,
    pub fullstrip: bool,
    pub nosplitsugs: bool,
    pub checksharps: bool,
    pub checkcompoundcase: bool,
    pub checkcompoundup: bool,
    pub checkcompoundrep: bool,
    pub checkcompoundtriple: bool,
    pub checkcompounddup: bool,
    pub simplifiedtriple: bool,
    pub onlymaxdiff: bool,
    pub forbidwarn: bool,

    /// Numbers: `COMPOUNDMIN, COMPOUNDWORDMAX, MAXCPDSUGS, MAXNGRAMSUGS,
    /// MAXDIFF`.
    pub compoundmin: usize,
    pub compoundwordmax: usize,
    pub maxcpdsugs: usize,
    pub maxngramsugs: usize,
    pub maxdiff: i32,

    /// `TRY` — characters worth trying in `badchar`/`forgotchar`.
    pub try_chars: Vec<char>,
    /// `KEY` — keyboard-adjacency rows for `badcharkey`, `|`-split.
    pub key_rows: Vec<Vec<char>>,
    /// `REP` — `(from, to)` rough-spelling substitution rules.
    pub rep: Vec<(String, String)>,
    /// `MAP` — equivalence classes of interchangeable characters.
    pub map: Vec<Vec<char>>,
    /// `BREAK` — patterns a surface may be split on.
    pub break_patterns: Vec<String>,
    /// `COMPOUNDRULE` — small regexes over class flags.
    pub compound_rules: Vec<String>,
    /// `CHECKCOMPOUNDPATTERN` — `(left-end, right-start, replacement)`.
    pub compound_patterns: Vec<(String, String, Option<String>)>,
    /// `ICONV`/`OCONV` — literal-substring conversion rules.
    pub iconv: Vec<(String, String)>,
    pub oconv: Vec<(String, String)>,
    /// `PHONE` — metaphone-style rule table (`search`, `replacement`).
    pub phone: Vec<(String, String)>,
    /// `IGNORE` — characters stripped from input before any check.
    pub ignore: Vec<char>,
    /// `LANG` — selects [`crate::casing::TurkicCasing`] for Turkic
    /// language codes; otherwise `CHECKSHARPS` selects
    /// [`crate::casing::GermanCasing`], else
    /// [`crate::casing::StandardCasing`].
    pub lang: Option<String>,
}

/// Everything a query needs, built once and thereafter immutable.
pub struct EngineData {
    pub affixes: AffixTables,
    pub dictionary: Dictionary,
    pub aliases: AliasTable,
    pub flag_encoding: FlagEncoding,
    pub directives: Directives,
    pub casing: Box<dyn Casing + Send + Sync>,
}

impl fmt::Debug for EngineData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineData")
            .field("affixes", &self.affixes)
            .field("dictionary", &self.dictionary)
            .field("directives", &self.directives)
            .finish_non_exhaustive()
    }
}

/// An immutable value bundling the engine data a word needs, the surface
/// string, its capitalization class, and an optional compound position.
///
/// All derivations (`to`, `slice`, `shift`, `add`) produce new instances;
/// nothing mutates an existing `LKWord` in place.
#[derive(Clone)]
pub struct LKWord<'engine> {
    data: &'engine EngineData,
    surface: String,
    cap: CapType,
    position: Option<CompoundPosition>,
}

impl fmt::Debug for LKWord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LKWord")
            .field("surface", &self.surface)
            .field("cap", &self.cap)
            .field("position", &self.position)
            .finish()
    }
}

impl<'engine> LKWord<'engine> {
    /// Construct a fresh `LKWord` for `surface`, with no compound
    /// position set.
    #[must_use]
    pub fn new(data: &'engine EngineData, surface: impl Into<String>) -> Self {
        let surface = surface.into();
        let cap = data.casing.guess(&surface);
        Self {
            data,
            surface,
            cap,
            position: None,
        }
    }

    /// The engine data this word is borrowed from.
    #[must_use]
    pub fn data(&self) -> &'engine EngineData {
        self.data
    }

    /// The surface text.
    #[must_use]
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// The capitalization class.
    #[must_use]
    pub fn cap(&self) -> CapType {
        self.cap
    }

    /// The compound position, if any.
    #[must_use]
    pub fn position(&self) -> Option<CompoundPosition> {
        self.position
    }

    /// A new `LKWord` with a different surface but the same data/cap/position.
    #[must_use]
    pub fn to(&self, surface: impl Into<String>) -> Self {
        Self {
            data: self.data,
            surface: surface.into(),
            cap: self.cap,
            position: self.position,
        }
    }

    /// A new `LKWord` over `self.surface()[range]`.
    #[must_use]
    pub fn slice(&self, range: std::ops::Range<usize>) -> Self {
        self.to(self.surface[range].to_string())
    }

    /// A new `LKWord` with `position` set.
    #[must_use]
    pub fn shift(&self, position: CompoundPosition) -> Self {
        Self {
            data: self.data,
            surface: self.surface.clone(),
            cap: self.cap,
            position: Some(position),
        }
    }

    /// A new `LKWord` with `suffix` appended to the surface.
    #[must_use]
    pub fn add(&self, suffix: &str) -> Self {
        let mut surface = self.surface.clone();
        surface.push_str(suffix);
        self.to(surface)
    }

    /// Index into the surface's characters from the end when `n` is
    /// negative-in-spirit (callers pass the Hunspell convention of "from
    /// end"): `at(-1)` is the last character, `at(-2)` the second to
    /// last. Per §9's documented open question, this is the corrected
    /// semantic (`length - n`, not `length + n`).
    #[must_use]
    pub fn at_from_end(&self, n: usize) -> Option<char> {
        let len = self.surface.chars().count();
        let idx = len.checked_sub(n)?;
        self.surface.chars().nth(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affix::AffixTables;
    use crate::casing::StandardCasing;
    use crate::dictionary::Dictionary;

    fn engine_data() -> EngineData {
        EngineData {
            affixes: AffixTables::build(Vec::new()),
            dictionary: Dictionary::build(Vec::new(), &[], &[]),
            aliases: AliasTable::new(),
            flag_encoding: FlagEncoding::Short,
            directives: Directives::default(),
            casing: Box::new(StandardCasing),
        }
    }

    #[test]
    fn test_at_from_end() {
        let data = engine_data();
        let word = LKWord::new(&data, "hello");
        assert_eq!(word.at_from_end(1), Some('o'));
        assert_eq!(word.at_from_end(5), Some('h'));
        assert_eq!(word.at_from_end(6), None);
    }

    #[test]
    fn test_derivations_produce_new_instances() {
        let data = engine_data();
        let word = LKWord::new(&data, "hello");
        let shifted = word.shift(CompoundPosition::Begin);

        assert_eq!(word.position(), None);
        assert_eq!(shifted.position(), Some(CompoundPosition::Begin));
        assert_eq!(shifted.surface(), "hello");
    }

    #[test]
    fn test_slice_and_add() {
        let data = engine_data();
        let word = LKWord::new(&data, "hello");
        assert_eq!(word.slice(0..3).surface(), "hel");
        assert_eq!(word.add("!").surface(), "hello!");
    }
}
