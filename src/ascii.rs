//! # Character classes and raw primitives
//!
//! Thin wrappers over [`Parser`]'s leaf constructors, each carrying the
//! `.expect()` label mpc.c gives the equivalent `mpc_*` constructor. Every
//! constructor here produces `Parser<String>` via [`fold::str_lift`],
//! since single characters are the common currency these combine with
//! `str_fold`.
//!
//! One deliberate fix versus the original: `digit()` matches `"0123456789"`.
//! mpc.c's `mpc_digit` uses `"012345689"`, silently missing `'7'` — a bug
//! in the original this port fixes rather than preserves.

use crate::fold::str_lift;
use crate::lib::std::string::String;
use crate::parser::Parser;

/// Matches any single character.
pub fn any() -> Parser<String> {
    Parser::any(str_lift).expect("any character")
}

/// Matches exactly `c`.
pub fn single(c: char) -> Parser<String> {
    Parser::single(c, str_lift).expect(format!("'{c}'"))
}

/// Matches any character in the inclusive range `lo..=hi`.
pub fn range(lo: char, hi: char) -> Parser<String> {
    Parser::range(lo, hi, str_lift).expect(format!("character between '{lo}' and '{hi}'"))
}

/// Matches any character present in `set`.
pub fn one_of(set: impl Into<String>) -> Parser<String> {
    let set = set.into();
    let label = format!("one of '{set}'");
    Parser::one_of(set, str_lift).expect(label)
}

/// Matches any character absent from `set`.
pub fn none_of(set: impl Into<String>) -> Parser<String> {
    let set = set.into();
    let label = format!("none of '{set}'");
    Parser::none_of(set, str_lift).expect(label)
}

/// Matches a character satisfying `pred`, labelled `label` on failure.
pub fn satisfy(pred: impl Fn(char) -> bool + 'static, label: impl Into<String>) -> Parser<String> {
    Parser::satisfy(pred, str_lift).expect(label)
}

/// Matches the literal string `s`.
pub fn string(s: impl Into<String> + Clone) -> Parser<String> {
    let s = s.into();
    let label = format!("\"{s}\"");
    Parser::string(s, |matched: &str| matched.to_string()).expect(label)
}

/// Matches the start of input, without consuming.
pub fn soi() -> Parser<String> {
    Parser::soi(String::new)
}

/// Matches the end of input, without consuming.
pub fn eoi() -> Parser<String> {
    Parser::eoi(String::new)
}

/// A decimal digit, `'0'..='9'`.
pub fn digit() -> Parser<String> {
    one_of("0123456789").expect("digit")
}

/// A hexadecimal digit, `'0'..='9' | 'A'..='F' | 'a'..='f'`.
pub fn hex_digit() -> Parser<String> {
    one_of("0123456789ABCDEFabcdef").expect("hex digit")
}

/// An octal digit, `'0'..='7'`.
pub fn oct_digit() -> Parser<String> {
    one_of("01234567").expect("oct digit")
}

/// A lowercase ASCII letter.
pub fn lower() -> Parser<String> {
    one_of("abcdefghijklmnopqrstuvwxyz").expect("lowercase letter")
}

/// An uppercase ASCII letter.
pub fn upper() -> Parser<String> {
    one_of("ABCDEFGHIJKLMNOPQRSTUVWXYZ").expect("uppercase letter")
}

/// Any ASCII letter, upper or lower case.
pub fn alpha() -> Parser<String> {
    one_of("abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ").expect("letter")
}

/// A literal underscore.
pub fn underscore() -> Parser<String> {
    single('_').expect("underscore")
}

/// A letter, digit, or underscore.
pub fn alphanum() -> Parser<String> {
    crate::combinator::or(crate::lib::std::vec::Vec::from([alpha(), digit(), underscore()])).expect("alphanumeric")
}

/// A single whitespace character: space, form feed, newline, carriage
/// return, tab, or vertical tab.
pub fn space() -> Parser<String> {
    one_of(" \u{c}\n\r\t\u{b}").expect("space")
}

/// One or more [`space`]s, concatenated.
pub fn spaces() -> Parser<String> {
    crate::combinator::many(space(), crate::fold::str_fold, String::new).expect("spaces")
}

/// Zero or more [`space`]s, discarding the matched text.
///
/// mpc.c's `mpc_whitespace` applies `mpcf_free` over `mpc_spaces()` to
/// discard the accumulated string while still consuming it; here the
/// output is simply an empty `String`, since there is no destructor to
/// invoke.
pub fn whitespace() -> Parser<String> {
    crate::parser::apply(spaces(), |_| String::new()).expect("whitespace")
}

/// A literal newline.
pub fn newline() -> Parser<String> {
    single('\n').expect("newline")
}

/// A literal tab.
pub fn tab() -> Parser<String> {
    single('\t').expect("tab")
}

/// A backslash followed by any one character, concatenated (e.g. `\n`
/// parses as the two-character string `"\\n"`, left for the caller to
/// interpret).
pub fn escape() -> Parser<String> {
    crate::combinator::also(single('\\'), any(), crate::fold::str_fold)
}
