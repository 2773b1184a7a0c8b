//! # BNF-like grammar language
//!
//! Compiles a small grammar language into one (`compile`) or many
//! (`compile_many`) [`Ast`][crate::ast::Ast]-producing parsers, resolving
//! `<name>`/`<N>` references against caller-supplied parsers. Grounded on
//! mpc.c's `mpca_grammar_st`/`mpca_lang_st`, whose grammar (after `mpc_tok`
//! is expanded into "optionally preceded by whitespace") is:
//!
//! ```text
//! <grammar> : (<term> "|" <grammar>) | <term>
//! <term>    : <factor>*
//! <factor>  : <base> "*" | <base> "+" | <base> "?" | <base> "{" <int> "}" | <base>
//! <base>    : <string> | <char> | <regex> | "<" (<digits> | <ident>) ">" | "(" <grammar> ")"
//! ```
//!
//! As in [`regex`][crate::regex], this is hand-written recursive descent
//! over [`Input`] rather than a `Parser<RVal>` meta-graph, for the same
//! representability reason spelled out there — a reference's value (an
//! index or a name) and a sub-grammar's value (a compiled parser) don't
//! share a type the combinator vocabulary could unify.

use crate::ast::{self, Ast};
use crate::error::ErrorValue;
use crate::input::Input;
use crate::lib::std::string::String;
use crate::lib::std::vec::Vec;
use crate::parser::{apply, Parser};
use crate::{ascii, regex};

fn skip_ws(input: &mut Input) {
    while matches!(input.peek(), Some(c) if c == ' ' || c == '\t' || c == '\n' || c == '\r') {
        input.advance_one();
    }
}

/// Resolves the mpc.c "escape characters" table for string/char literals.
fn unescape_one(c: char) -> char {
    match c {
        'a' => '\u{7}',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{b}',
        other => other,
    }
}

fn compile_body(body: &str, refs: &[(String, Parser<Ast>)]) -> Result<Parser<Ast>, ErrorValue> {
    let mut input = Input::new("<language>", body);
    let p = grammar_expr(&mut input, refs)?;
    skip_ws(&mut input);
    if !input.at_eoi() {
        return Err(ErrorValue::expected(input.filename(), input.error_state(), "end of grammar"));
    }
    Ok(p)
}

/// Compiles a single grammar body (no top-level `name:` / `;`) against
/// `refs`, a name-to-parser table the body's `<name>`/`<N>` references
/// are resolved against. Tags the result `"root"`, mirroring mpc.c's
/// single-rule `mpca_grammar_st`.
pub fn compile(body: &str, refs: &[(String, Parser<Ast>)]) -> Result<Parser<Ast>, ErrorValue> {
    Ok(ast::tag(compile_body(body, refs)?, "root"))
}

/// Compiles a whole `name: body; name2: body2; ...` language, returning
/// every named rule in declaration order. `builtins` seeds the reference
/// table with parsers the caller already has (e.g. a hand-written
/// `ident` or `number` parser) before the declared rules are added, so a
/// rule body may reference either. Each rule's result is tagged with its
/// own name, not `"root"` — only [`compile`]'s single-rule entry point
/// gets that wrap, matching mpc.c's `mpca_stmt_list_apply_to`, which
/// `mpc_define`s a rule's body unchanged.
pub fn compile_many(language: &str, builtins: &[(&str, Parser<Ast>)]) -> Result<Vec<(String, Parser<Ast>)>, ErrorValue> {
    let mut input = Input::new("<language>", language);
    let stmts = parse_statements(&mut input)?;

    let mut refs: Vec<(String, Parser<Ast>)> = builtins.iter().map(|(n, p)| (String::from(*n), p.clone())).collect();
    let mut named: Vec<(String, Parser<Ast>)> = Vec::new();
    for (name, _) in &stmts {
        let p: Parser<Ast> = Parser::new(name.clone());
        refs.push((name.clone(), p.clone()));
        named.push((name.clone(), p));
    }

    for (name, body) in &stmts {
        let compiled = ast::tag(compile_body(body, &refs)?, name.clone());
        let target = named.iter().find(|(n, _)| n == name).map(|(_, p)| p).expect("inserted above");
        target.define(compiled);
    }

    Ok(named)
}

fn parse_statements(input: &mut Input) -> Result<Vec<(String, String)>, ErrorValue> {
    let mut stmts = Vec::new();
    loop {
        skip_ws(input);
        if input.at_eoi() {
            break;
        }

        let mut name = String::new();
        while let Some(c) = input.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                input.advance_one();
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(ErrorValue::expected(input.filename(), input.error_state(), "rule name"));
        }

        skip_ws(input);
        if !input.match_char(':') {
            return Err(ErrorValue::expected(input.filename(), input.error_state(), "':'"));
        }
        skip_ws(input);

        let mut body = String::new();
        let mut quote: Option<char> = None;
        loop {
            match input.peek() {
                None => return Err(ErrorValue::expected(input.filename(), input.error_state(), "';'")),
                Some(c) if quote.is_some() => {
                    body.push(c);
                    input.advance_one();
                    if c == '\\' {
                        if let Some(escaped) = input.peek() {
                            body.push(escaped);
                            input.advance_one();
                        }
                    } else if Some(c) == quote {
                        quote = None;
                    }
                }
                Some(c @ ('"' | '\'' | '/')) => {
                    quote = Some(c);
                    body.push(c);
                    input.advance_one();
                }
                Some(';') => {
                    input.advance_one();
                    break;
                }
                Some(c) => {
                    body.push(c);
                    input.advance_one();
                }
            }
        }
        stmts.push((name, body));
    }
    Ok(stmts)
}

fn grammar_expr(input: &mut Input, refs: &[(String, Parser<Ast>)]) -> Result<Parser<Ast>, ErrorValue> {
    let t = term(input, refs)?;
    skip_ws(input);
    if input.match_char('|') {
        let rest = grammar_expr(input, refs)?;
        Ok(ast::or(Vec::from([t, rest])))
    } else {
        Ok(t)
    }
}

fn term(input: &mut Input, refs: &[(String, Parser<Ast>)]) -> Result<Parser<Ast>, ErrorValue> {
    let mut acc: Option<Parser<Ast>> = None;
    loop {
        skip_ws(input);
        input.mark();
        match factor(input, refs) {
            Ok(f) => {
                input.unmark();
                acc = Some(match acc {
                    None => f,
                    Some(t) => ast::also(t, f),
                });
            }
            Err(_) => {
                input.rewind();
                break;
            }
        }
    }
    Ok(acc.unwrap_or_else(|| Parser::pass(|| Ast::node("", Vec::new()))))
}

fn factor(input: &mut Input, refs: &[(String, Parser<Ast>)]) -> Result<Parser<Ast>, ErrorValue> {
    let b = base(input, refs)?;
    skip_ws(input);
    if input.match_char('*') {
        Ok(ast::many(b))
    } else if input.match_char('+') {
        Ok(ast::many1(b))
    } else if input.match_char('?') {
        Ok(ast::maybe(b))
    } else if input.match_char('{') {
        skip_ws(input);
        let n = count_digits(input)?;
        skip_ws(input);
        if !input.match_char('}') {
            return Err(ErrorValue::expected(input.filename(), input.error_state(), "'}'"));
        }
        Ok(ast::count(b, n))
    } else {
        Ok(b)
    }
}

fn count_digits(input: &mut Input) -> Result<usize, ErrorValue> {
    let mut n = 0usize;
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

fn base(input: &mut Input, refs: &[(String, Parser<Ast>)]) -> Result<Parser<Ast>, ErrorValue> {
    skip_ws(input);
    let state = input.error_state();

    match input.peek() {
        Some('(') => {
            input.advance_one();
            let g = grammar_expr(input, refs)?;
            skip_ws(input);
            if !input.match_char(')') {
                return Err(ErrorValue::expected(input.filename(), input.error_state(), "')'"));
            }
            Ok(g)
        }
        Some('"') => {
            let text = quoted_literal(input, '"')?;
            Ok(apply(ascii::string(text), |matched: String| Ast::leaf("string", matched)))
        }
        Some('\'') => {
            let text = quoted_literal(input, '\'')?;
            let c = text.chars().next().ok_or_else(|| ErrorValue::expected(input.filename(), state, "char literal"))?;
            Ok(apply(ascii::single(c), |matched: String| Ast::leaf("char", matched)))
        }
        Some('/') => {
            input.advance_one();
            let mut pattern = String::new();
            loop {
                match input.peek() {
                    None => return Err(ErrorValue::expected(input.filename(), input.error_state(), "'/'")),
                    Some('/') => {
                        input.advance_one();
                        break;
                    }
                    Some('\\') => {
                        pattern.push('\\');
                        input.advance_one();
                        if let Some(escaped) = input.advance_one() {
                            pattern.push(escaped);
                        }
                    }
                    Some(c) => {
                        pattern.push(c);
                        input.advance_one();
                    }
                }
            }
            let matcher = regex::compile(&pattern)?;
            Ok(apply(matcher, |matched: String| Ast::leaf("regex", matched)))
        }
        Some('<') => {
            input.advance_one();
            let mut name = String::new();
            while let Some(c) = input.peek() {
                if c == '>' {
                    break;
                }
                name.push(c);
                input.advance_one();
            }
            if !input.match_char('>') {
                return Err(ErrorValue::expected(input.filename(), input.error_state(), "'>'"));
            }
            match find_ref(&name, refs) {
                Some(p) => {
                    let tagged = match p.name() {
                        Some(n) => ast::tag(p.clone(), n),
                        None => p.clone(),
                    };
                    Ok(apply(tagged, ast::insert_root))
                }
                None => Err(ErrorValue::failure(input.filename(), state, format!("unknown grammar reference <{name}>"))),
            }
        }
        _ => Err(ErrorValue::expected(input.filename(), state, "grammar base")),
    }
}

fn quoted_literal(input: &mut Input, quote: char) -> Result<String, ErrorValue> {
    let state = input.error_state();
    input.advance_one();
    let mut text = String::new();
    loop {
        match input.peek() {
            None => return Err(ErrorValue::expected(input.filename(), state, format!("closing '{quote}'"))),
            Some(c) if c == quote => {
                input.advance_one();
                break;
            }
            Some('\\') => {
                input.advance_one();
                match input.advance_one() {
                    Some(c) => text.push(unescape_one(c)),
                    None => return Err(ErrorValue::expected(input.filename(), input.error_state(), "character after '\\'")),
                }
            }
            Some(c) => {
                text.push(c);
                input.advance_one();
            }
        }
    }
    Ok(text)
}

fn find_ref<'a>(name: &str, refs: &'a [(String, Parser<Ast>)]) -> Option<&'a Parser<Ast>> {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) {
        let mut idx = 0usize;
        for c in name.chars() {
            idx = idx * 10 + (c as u8 - b'0') as usize;
        }
        refs.get(idx).map(|(_, p)| p)
    } else {
        refs.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn literal_and_sequence() {
        let p = compile(r#"<digit> <digit>"#, &[(String::from("digit"), apply(ascii::digit(), |s: String| Ast::leaf("digit", s)))]).unwrap();
        let ast = parse("<t>", "12", &p).unwrap();
        assert_eq!(ast.tag, "root");
    }

    #[test]
    fn string_literal() {
        let p = compile(r#""hello""#, &[]).unwrap();
        let ast = parse("<t>", "hello", &p).unwrap();
        assert_eq!(ast.tag, "root");
    }

    #[test]
    fn regex_literal() {
        let p = compile("/[a-z]+/", &[]).unwrap();
        let ast = parse("<t>", "foo", &p).unwrap();
        assert_eq!(ast.tag, "root");
    }

    #[test]
    fn multi_rule_language_resolves_references() {
        let digit = apply(ascii::digit(), |s: String| Ast::leaf("digit", s));
        let rules = compile_many("number: <digit>;", &[("digit", digit)]).unwrap();
        let (_, number) = rules.into_iter().find(|(n, _)| n == "number").unwrap();
        let ast = parse("<t>", "9", &number).unwrap();
        assert_eq!(ast.tag, "number");
    }

    #[test]
    fn multi_rule_language_tags_each_rule_with_its_own_name_not_root() {
        let rules = compile_many("ident:/[a-z]+/;", &[]).unwrap();
        let (_, ident) = rules.into_iter().find(|(n, _)| n == "ident").unwrap();
        let ast = parse("<t>", "foo", &ident).unwrap();
        assert_eq!(ast.tag, "ident");
        assert_eq!(ast.contents, "foo");
    }
}
