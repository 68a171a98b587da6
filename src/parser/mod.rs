//! Parsers for the two external text formats (§6): the affix
//! description and the word list. Both are line-oriented UTF-8 text;
//! malformed input fails construction outright with a [`crate::ParseError`]
//! carrying the offending line.

pub mod affix;
pub mod dic;

pub use affix::{parse_affix, ParsedAffix};
pub use dic::parse_dic;
