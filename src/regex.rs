//! # POSIX-like regular expressions
//!
//! Compiles a regex literal into a [`Parser<String>`] at run time. Grounded
//! on mpc.c's regex bootstrap (`mpc_re`, `mpc_re_escape`, `mpc_re_range`),
//! whose grammar is, verbatim:
//!
//! ```text
//! <regex>  : (<term> "|" <regex>) | <term>
//! <term>   : <factor>*
//! <factor> : <base> "*" | <base> "+" | <base> "?" | <base> "{" <digits> "}" | <base>
//! <base>   : <char> | "\" <char> | "(" <regex> ")" | "[" <range> "]"
//! ```
//!
//! mpc.c builds this grammar out of its own `mpc_*` combinators, so every
//! grammar node is itself a `void*`-typed parser value. Porting that
//! literally would need a meta value type uniform enough to carry both
//! "a compiled sub-regex" and "a captured digit count" through the same
//! `also`/`or`, which Rust's type system (rightly) won't erase away. This
//! compiler instead walks [`Input`] directly with ordinary recursive
//! descent — one function per grammar symbol above — and only touches the
//! combinator engine at the leaves, where it builds the [`Parser<String>`]
//! each symbol ultimately produces.

use crate::ascii;
use crate::combinator::{also, count, else_, many, many1, not};
use crate::error::ErrorValue;
use crate::fold::str_fold;
use crate::input::Input;
use crate::lib::std::string::String;
use crate::parser::Parser;

/// Compiles `pattern` into a parser. Returns an `ErrorValue` describing
/// where compilation failed, mirroring `mpc_re`'s "Invalid Regex: ..."
/// wrapping but as a structured error rather than a formatted string.
pub fn compile(pattern: &str) -> Result<Parser<String>, ErrorValue> {
    let mut input = Input::new("<regex>", pattern);
    let parser = regex_expr(&mut input)?;
    if !input.at_eoi() {
        return Err(ErrorValue::expected(input.filename(), input.error_state(), "end of regex"));
    }
    Ok(parser)
}

fn regex_expr(input: &mut Input) -> Result<Parser<String>, ErrorValue> {
    let t = term(input)?;
    if input.match_char('|') {
        let rest = regex_expr(input)?;
        Ok(else_(t, rest))
    } else {
        Ok(t)
    }
}

fn term(input: &mut Input) -> Result<Parser<String>, ErrorValue> {
    let mut acc: Option<Parser<String>> = None;
    loop {
        input.mark();
        match factor(input) {
            Ok(f) => {
                input.unmark();
                acc = Some(match acc {
                    None => f,
                    Some(t) => also(t, f, str_fold),
                });
            }
            Err(_) => {
                input.rewind();
                break;
            }
        }
    }
    Ok(acc.unwrap_or_else(|| Parser::pass(String::new)))
}

fn factor(input: &mut Input) -> Result<Parser<String>, ErrorValue> {
    let b = base(input)?;
    if input.match_char('*') {
        Ok(many(b, str_fold, String::new))
    } else if input.match_char('+') {
        Ok(many1(b, str_fold))
    } else if input.match_char('?') {
        Ok(b.maybe(String::new))
    } else if input.match_char('{') {
        let n = count_digits(input)?;
        if !input.match_char('}') {
            return Err(ErrorValue::expected(input.filename(), input.error_state(), "'}'"));
        }
        Ok(count(b, str_fold, n, String::new))
    } else {
        Ok(b)
    }
}

fn count_digits(input: &mut Input) -> Result<usize, ErrorValue> {
    let mut n: usize = 0;
    let mut any = false;
    while let Some(c) = input.peek() {
        if c.is_ascii_digit() {
            any = true;
            n = n * 10 + (c as u8 - b'0') as usize;
            input.advance_one();
        } else {
            break;
        }
    }
    if any {
        Ok(n)
    } else {
        Err(ErrorValue::expected(input.filename(), input.error_state(), "digits"))
    }
}

fn base(input: &mut Input) -> Result<Parser<String>, ErrorValue> {
    if input.match_char('(') {
        let r = regex_expr(input)?;
        if !input.match_char(')') {
            return Err(ErrorValue::expected(input.filename(), input.error_state(), "')'"));
        }
        return Ok(r);
    }
    if input.match_char('[') {
        let r = char_range(input)?;
        if !input.match_char(']') {
            return Err(ErrorValue::expected(input.filename(), input.error_state(), "']'"));
        }
        return Ok(r);
    }

    let state = input.error_state();
    match input.peek() {
        Some(')') | Some('|') | None => Err(ErrorValue::expected(input.filename(), state, "regex base")),
        Some('\\') => {
            input.advance_one();
            match input.advance_one() {
                Some(c) => Ok(escape(c)),
                None => Err(ErrorValue::expected(input.filename(), state, "character after '\\'")),
            }
        }
        Some(c) => {
            input.advance_one();
            Ok(escape_meta(c))
        }
    }
}

fn escape(c: char) -> Parser<String> {
    match c {
        'd' => ascii::digit(),
        'D' => not(ascii::digit(), String::new),
        's' => ascii::space(),
        'S' => not(ascii::space(), String::new),
        'w' => ascii::alphanum(),
        'W' => not(ascii::alphanum(), String::new),
        'Z' => ascii::eoi(),
        other => ascii::single(other),
    }
}

fn escape_meta(c: char) -> Parser<String> {
    match c {
        '.' => ascii::any(),
        '$' => ascii::eoi(),
        '^' => ascii::soi(),
        other => ascii::single(other),
    }
}

fn char_range(input: &mut Input) -> Result<Parser<String>, ErrorValue> {
    let state = input.error_state();
    let comp = input.match_char('^');

    let mut raw: crate::lib::std::vec::Vec<(char, bool)> = crate::lib::std::vec::Vec::new();
    loop {
        match input.peek() {
            None | Some(']') => break,
            Some('\\') => {
                input.advance_one();
                match input.advance_one() {
                    Some(c) => raw.push((c, true)),
                    None => break,
                }
            }
            Some(c) => {
                input.advance_one();
                raw.push((c, false));
            }
        }
    }

    if raw.is_empty() {
        return Err(ErrorValue::expected(input.filename(), state, "regex range specifier"));
    }

    let mut set = String::new();
    let mut i = 0usize;
    while i < raw.len() {
        let (c, escaped) = raw[i];
        if c == '-' && !escaped && i > 0 && i + 1 < raw.len() && !raw[i - 1].1 && !raw[i + 1].1 {
            let start = raw[i - 1].0 as u32;
            let end = raw[i + 1].0 as u32;
            if end < start {
                i += 1;
                continue;
            }
            for k in (start + 1)..=end {
                if let Some(ch) = char::from_u32(k) {
                    set.push(ch);
                }
            }
            i += 2;
            continue;
        }
        set.push(c);
        i += 1;
    }

    Ok(if comp { ascii::none_of(set) } else { ascii::one_of(set) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn alternation() {
        let p = compile("a|b").unwrap();
        assert_eq!(parse("<t>", "a", &p).unwrap(), "a");
        assert_eq!(parse("<t>", "b", &p).unwrap(), "b");
        assert!(parse("<t>", "c", &p).is_err());
    }

    #[test]
    fn star_and_plus() {
        let p = compile("ab*").unwrap();
        assert_eq!(parse("<t>", "a", &p).unwrap(), "a");
        assert_eq!(parse("<t>", "abbb", &p).unwrap(), "abbb");

        let p1 = compile("ab+").unwrap();
        assert!(parse("<t>", "a", &p1).is_err());
        assert_eq!(parse("<t>", "ab", &p1).unwrap(), "ab");
    }

    #[test]
    fn char_class_range() {
        let p = compile("[a-c]+").unwrap();
        assert_eq!(parse("<t>", "abcba", &p).unwrap(), "abcba");
        assert!(parse("<t>", "d", &p).is_err());
    }

    #[test]
    fn negated_class() {
        let p = compile("[^a-c]").unwrap();
        assert_eq!(parse("<t>", "d", &p).unwrap(), "d");
        assert!(parse("<t>", "a", &p).is_err());
    }

    #[test]
    fn grouping_and_count() {
        let p = compile("(ab){2}").unwrap();
        assert_eq!(parse("<t>", "abab", &p).unwrap(), "abab");
        assert!(parse("<t>", "ab", &p).is_err());
    }

    #[test]
    fn digit_escape() {
        let p = compile(r"\d+").unwrap();
        assert_eq!(parse("<t>", "123", &p).unwrap(), "123");
    }

    #[test]
    fn escaped_dash_in_class_is_literal_not_a_range() {
        let p = compile(r"[a\-z]+").unwrap();
        assert_eq!(parse("<t>", "a-z", &p).unwrap(), "a-z");
        assert!(parse("<t>", "b", &p).is_err());
    }

    #[test]
    fn escaped_caret_in_class_is_literal_not_negation() {
        let p = compile(r"[\^ab]+").unwrap();
        assert_eq!(parse("<t>", "^ab", &p).unwrap(), "^ab");
        assert!(parse("<t>", "c", &p).is_err());
    }
}
