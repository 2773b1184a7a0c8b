//! # The parse engine
//!
//! [`eval`] is the recursive interpreter at the heart of the crate: given a
//! [`Parser<V>`] and an [`Input`], it walks the parser graph depth-first,
//! driving the cursor and producing either `V` or an [`ErrorValue`].
//!
//! The one invariant every arm below must preserve: **failure never silently
//! consumes input**. Kinds that try-and-fail a sub-parse they might discard
//! (`Not`, `Count`, `StringLit`, `Also`/`And` past their first element)
//! surround the attempt with [`Input::mark`] and rewind on failure; kinds
//! that merely react to a child's `Err` without needing to undo anything
//! themselves (`Maybe`, `Many`, `Many1`) can skip marking because that
//! invariant already guarantees the child left the cursor untouched.

use crate::error::ErrorValue;
use crate::input::Input;
use crate::lib::std::rc::Rc;
use crate::lib::std::string::String;
use crate::lib::std::vec::Vec;
use crate::parser::{ChildRef, Parser, ParserKind, ParserResult};

/// Evaluates `parser` against `input`, dispatching on its kind.
#[cfg(not(feature = "debug"))]
pub fn eval<V>(parser: &Parser<V>, input: &mut Input) -> ParserResult<V> {
    eval_kind(parser, input)
}

/// Evaluates `parser` against `input`, dispatching on its kind.
///
/// This build logs every node entered/exited via [`crate::trace`].
#[cfg(feature = "debug")]
pub fn eval<V>(parser: &Parser<V>, input: &mut Input) -> ParserResult<V> {
    let depth = crate::trace::Depth::enter();
    let name = parser.name().unwrap_or_else(|| "<anon>".to_string());
    let pos_before = input.pos();
    crate::trace::enter(&depth, &name, pos_before);
    let result = eval_kind(parser, input);
    crate::trace::exit(&depth, &name, pos_before, input.pos(), &result);
    result
}

fn undefined_error<V>(parser: &Parser<V>, input: &Input) -> ErrorValue {
    let who = parser.name().unwrap_or_else(|| "<anonymous>".to_string());
    ErrorValue::failure(input.filename(), input.error_state(), format!("{who} is undefined"))
}

fn dangling_error<V>(input: &Input) -> ErrorValue {
    ErrorValue::failure(
        input.filename(),
        input.error_state(),
        "recursive reference to a parser that has already been released",
    )
}

fn resolve_or_dangling<V>(child: &ChildRef<V>, input: &Input) -> Result<Parser<V>, ErrorValue> {
    child.resolve().ok_or_else(|| dangling_error::<V>(input))
}

fn eval_kind<V>(parser: &Parser<V>, input: &mut Input) -> ParserResult<V> {
    use ParserKind::*;

    // Clone out exactly what we need from the borrowed kind before any
    // recursive call, so the `RefCell` borrow never outlives this match.
    enum Dispatch<V> {
        Undefined,
        Pass(Rc<dyn Fn() -> V>),
        Fail(String),
        Lift(Rc<dyn Fn() -> V>),
        Expect(ChildRef<V>, String),
        Soi(Rc<dyn Fn() -> V>),
        Eoi(Rc<dyn Fn() -> V>),
        Any(Rc<dyn Fn(char) -> V>),
        Single(char, Rc<dyn Fn(char) -> V>),
        Range(char, char, Rc<dyn Fn(char) -> V>),
        OneOf(String, Rc<dyn Fn(char) -> V>),
        NoneOf(String, Rc<dyn Fn(char) -> V>),
        Satisfy(Rc<dyn Fn(char) -> bool>, Rc<dyn Fn(char) -> V>),
        StringLit(String, Rc<dyn Fn(&str) -> V>),
        Mapped(Rc<dyn Fn(&mut Input) -> ParserResult<V>>),
        Predict(ChildRef<V>),
        Not(ChildRef<V>, Rc<dyn Fn() -> V>),
        Maybe(ChildRef<V>, Rc<dyn Fn() -> V>),
        Many(ChildRef<V>, Rc<dyn Fn(V, V) -> V>, Rc<dyn Fn() -> V>),
        Many1(ChildRef<V>, Rc<dyn Fn(V, V) -> V>),
        Count(ChildRef<V>, Rc<dyn Fn(V, V) -> V>, usize, Rc<dyn Fn() -> V>),
        Else(ChildRef<V>, ChildRef<V>),
        Also(ChildRef<V>, ChildRef<V>, Rc<dyn Fn(V, V) -> V>),
        Or(Vec<ChildRef<V>>),
        And(Vec<ChildRef<V>>, Rc<dyn Fn(Vec<V>) -> V>),
    }

    let dispatch = {
        let kind = parser.kind_ref();
        match &*kind {
            Undefined => Dispatch::Undefined,
            Pass(f) => Dispatch::Pass(Rc::clone(f)),
            Fail(m) => Dispatch::Fail(m.clone()),
            Lift(f) => Dispatch::Lift(Rc::clone(f)),
            Expect(child, label) => Dispatch::Expect(clone_child(child), label.clone()),
            Soi(f) => Dispatch::Soi(Rc::clone(f)),
            Eoi(f) => Dispatch::Eoi(Rc::clone(f)),
            Any(f) => Dispatch::Any(Rc::clone(f)),
            Single(c, f) => Dispatch::Single(*c, Rc::clone(f)),
            Range(lo, hi, f) => Dispatch::Range(*lo, *hi, Rc::clone(f)),
            OneOf(set, f) => Dispatch::OneOf(set.clone(), Rc::clone(f)),
            NoneOf(set, f) => Dispatch::NoneOf(set.clone(), Rc::clone(f)),
            Satisfy(p, f) => Dispatch::Satisfy(Rc::clone(p), Rc::clone(f)),
            StringLit(s, f) => Dispatch::StringLit(s.clone(), Rc::clone(f)),
            Mapped(f) => Dispatch::Mapped(Rc::clone(f)),
            Predict(c) => Dispatch::Predict(clone_child(c)),
            Not(c, f) => Dispatch::Not(clone_child(c), Rc::clone(f)),
            Maybe(c, f) => Dispatch::Maybe(clone_child(c), Rc::clone(f)),
            Many(c, fold, lf) => Dispatch::Many(clone_child(c), Rc::clone(fold), Rc::clone(lf)),
            Many1(c, fold) => Dispatch::Many1(clone_child(c), Rc::clone(fold)),
            Count(c, fold, n, lf) => Dispatch::Count(clone_child(c), Rc::clone(fold), *n, Rc::clone(lf)),
            Else(x, y) => Dispatch::Else(clone_child(x), clone_child(y)),
            Also(x, y, fold) => Dispatch::Also(clone_child(x), clone_child(y), Rc::clone(fold)),
            Or(xs) => Dispatch::Or(xs.iter().map(clone_child).collect()),
            And(xs, fold) => Dispatch::And(xs.iter().map(clone_child).collect(), Rc::clone(fold)),
        }
    };

    match dispatch {
        Dispatch::Undefined => Err(undefined_error(parser, input)),
        Dispatch::Pass(f) => Ok(f()),
        Dispatch::Fail(message) => Err(ErrorValue::failure(input.filename(), input.error_state(), message)),
        Dispatch::Lift(f) => Ok(f()),
        Dispatch::Expect(child, label) => {
            let state = input.error_state();
            let filename = input.filename().to_string();
            let attempt = resolve_or_dangling(&child, input).and_then(|p| eval(&p, input));
            attempt.map_err(|_| ErrorValue::expected(filename, state, label))
        }
        Dispatch::Soi(f) => {
            if input.at_soi() {
                Ok(f())
            } else {
                Err(ErrorValue::expected(input.filename(), input.error_state(), "start of input"))
            }
        }
        Dispatch::Eoi(f) => {
            if input.at_eoi() {
                Ok(f())
            } else {
                Err(ErrorValue::expected(input.filename(), input.error_state(), "end of input"))
            }
        }
        Dispatch::Any(emit) => {
            let state = input.error_state();
            match input.advance_one() {
                Some(c) => Ok(emit(c)),
                None => Err(ErrorValue::expected(input.filename(), state, "any character")),
            }
        }
        Dispatch::Single(c, emit) => {
            let state = input.error_state();
            if input.match_char(c) {
                Ok(emit(c))
            } else {
                Err(ErrorValue::expected(input.filename(), state, format!("'{c}'")))
            }
        }
        Dispatch::Range(lo, hi, emit) => {
            let state = input.error_state();
            let next = input.peek();
            if input.match_range(lo, hi) {
                Ok(emit(next.expect("match_range succeeded so a char was present")))
            } else {
                Err(ErrorValue::expected(
                    input.filename(),
                    state,
                    format!("character between '{lo}' and '{hi}'"),
                ))
            }
        }
        Dispatch::OneOf(set, emit) => {
            let state = input.error_state();
            let next = input.peek();
            if input.match_oneof(&set) {
                Ok(emit(next.expect("match_oneof succeeded so a char was present")))
            } else {
                Err(ErrorValue::expected(input.filename(), state, format!("one of '{set}'")))
            }
        }
        Dispatch::NoneOf(set, emit) => {
            let state = input.error_state();
            let next = input.peek();
            if input.match_noneof(&set) {
                Ok(emit(next.expect("match_noneof succeeded so a char was present")))
            } else {
                Err(ErrorValue::expected(input.filename(), state, format!("none of '{set}'")))
            }
        }
        Dispatch::Satisfy(pred, emit) => {
            let state = input.error_state();
            let next = input.peek();
            if input.match_satisfy(&*pred) {
                Ok(emit(next.expect("match_satisfy succeeded so a char was present")))
            } else {
                Err(ErrorValue::expected(input.filename(), state, "a matching character"))
            }
        }
        Dispatch::StringLit(s, emit) => {
            let state = input.error_state();
            if input.match_string(&s) {
                Ok(emit(&s))
            } else {
                Err(ErrorValue::expected(input.filename(), state, format!("\"{s}\"")))
            }
        }
        Dispatch::Mapped(f) => f(input),
        Dispatch::Predict(child) => {
            let resolved = resolve_or_dangling(&child, input);
            input.predict(|input| match resolved {
                Ok(p) => eval(&p, input),
                Err(e) => Err(e),
            })
        }
        Dispatch::Not(child, make) => {
            input.mark();
            match resolve_or_dangling(&child, input).and_then(|p| eval(&p, input)) {
                Ok(_value) => {
                    input.rewind();
                    Err(ErrorValue::expected(input.filename(), input.error_state(), "opposite"))
                }
                Err(_) => {
                    input.unmark();
                    Ok(make())
                }
            }
        }
        // No mark/rewind needed here: every kind that can fail already leaves
        // the cursor where it found it on Err (primitives only advance on
        // Ok, and Also/Count/And/StringLit/Not rewind internally before
        // propagating), so a failing child never leaves residual consumption
        // behind. Many/Many1's loops below lean on the same invariant.
        Dispatch::Maybe(child, make) => match resolve_or_dangling(&child, input).and_then(|p| eval(&p, input)) {
            Ok(value) => Ok(value),
            Err(_) => Ok(make()),
        },
        Dispatch::Many(child, fold, lift_default) => {
            let resolved = resolve_or_dangling(&child, input)?;
            let mut acc: Option<V> = None;
            loop {
                match eval(&resolved, input) {
                    Ok(value) => {
                        acc = Some(match acc {
                            Some(prev) => fold(prev, value),
                            None => value,
                        });
                    }
                    Err(_) => break,
                }
            }
            Ok(acc.unwrap_or_else(|| lift_default()))
        }
        Dispatch::Many1(child, fold) => {
            let resolved = resolve_or_dangling(&child, input)?;
            let mut acc = match eval(&resolved, input) {
                Ok(value) => value,
                Err(e) => return Err(e.promote_many1()),
            };
            loop {
                match eval(&resolved, input) {
                    Ok(value) => acc = fold(acc, value),
                    Err(_) => break,
                }
            }
            Ok(acc)
        }
        Dispatch::Count(child, fold, n, lift_default) => {
            let resolved = resolve_or_dangling(&child, input)?;
            if n == 0 {
                return Ok(lift_default());
            }
            input.mark();
            let mut acc = match eval(&resolved, input) {
                Ok(value) => value,
                Err(e) => {
                    input.rewind();
                    return Err(e.promote_count(n));
                }
            };
            for _ in 1..n {
                match eval(&resolved, input) {
                    Ok(value) => acc = fold(acc, value),
                    Err(e) => {
                        input.rewind();
                        return Err(e.promote_count(n));
                    }
                }
            }
            input.unmark();
            Ok(acc)
        }
        Dispatch::Else(x, y) => {
            let x_parser = resolve_or_dangling(&x, input)?;
            match eval(&x_parser, input) {
                Ok(value) => Ok(value),
                Err(ex) => {
                    let y_parser = resolve_or_dangling(&y, input)?;
                    match eval(&y_parser, input) {
                        Ok(value) => Ok(value),
                        Err(ey) => Err(ErrorValue::either(ex, ey)),
                    }
                }
            }
        }
        Dispatch::Also(x, y, fold) => {
            input.mark();
            let x_parser = resolve_or_dangling(&x, input)?;
            let x_value = match eval(&x_parser, input) {
                Ok(value) => value,
                Err(e) => {
                    input.rewind();
                    return Err(e);
                }
            };
            let y_parser = resolve_or_dangling(&y, input)?;
            match eval(&y_parser, input) {
                Ok(y_value) => {
                    input.unmark();
                    Ok(fold(x_value, y_value))
                }
                Err(e) => {
                    drop(x_value);
                    input.rewind();
                    Err(e)
                }
            }
        }
        Dispatch::Or(xs) => {
            if xs.is_empty() {
                return Err(ErrorValue::failure(input.filename(), input.error_state(), "empty choice"));
            }
            let mut combined: Option<ErrorValue> = None;
            for child in &xs {
                let p = resolve_or_dangling(child, input)?;
                match eval(&p, input) {
                    Ok(value) => return Ok(value),
                    Err(e) => {
                        combined = Some(match combined {
                            Some(acc) => ErrorValue::either(acc, e),
                            None => e,
                        });
                    }
                }
            }
            Err(combined.expect("non-empty xs guarantees at least one error"))
        }
        Dispatch::And(xs, fold) => {
            if xs.is_empty() {
                return Err(ErrorValue::failure(input.filename(), input.error_state(), "empty sequence"));
            }
            input.mark();
            let mut values = Vec::with_capacity(xs.len());
            let mut failure = None;
            for child in &xs {
                let p = match resolve_or_dangling(child, input) {
                    Ok(p) => p,
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                };
                match eval(&p, input) {
                    Ok(value) => values.push(value),
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                }
            }
            match failure {
                Some(e) => {
                    drop(values);
                    input.rewind();
                    Err(e)
                }
                None => {
                    input.unmark();
                    Ok(fold(values))
                }
            }
        }
    }
}

fn clone_child<V>(child: &ChildRef<V>) -> ChildRef<V> {
    match child {
        ChildRef::Strong(p) => ChildRef::Strong(p.clone()),
        ChildRef::Weak(w) => ChildRef::Weak(w.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii;
    use crate::combinator::{also, count, else_, many, many1, not, or};
    use crate::fold::str_fold;

    fn parse_str(text: &str, parser: &Parser<String>) -> ParserResult<String> {
        let mut input = Input::new("<test>", text);
        eval(parser, &mut input)
    }

    #[test]
    fn expect_replaces_child_error_with_single_label() {
        let p = ascii::digit();
        let err = parse_str("x", &p).unwrap_err();
        assert_eq!(err.expected_labels(), Some(&["digit".to_string()][..]));
        assert_eq!(err.state().pos, 0);
    }

    #[test]
    fn else_tries_left_to_right_and_commits_on_first_success() {
        let p = else_(ascii::single('a'), ascii::single('b'));
        assert_eq!(parse_str("a", &p).unwrap(), "a");
        assert_eq!(parse_str("b", &p).unwrap(), "b");
        assert!(parse_str("c", &p).is_err());
    }

    #[test]
    fn also_rewinds_on_second_failure() {
        let p = also(ascii::single('a'), ascii::single('b'), str_fold);
        let mut input = Input::new("<test>", "ac");
        let err = eval(&p, &mut input);
        assert!(err.is_err());
        assert_eq!(input.pos(), 0, "Also must rewind past a successful first element on second failure");
    }

    #[test]
    fn many_stops_at_first_failure_without_consuming_it() {
        let p = many(ascii::digit(), str_fold, || String::new());
        let mut input = Input::new("<test>", "12a");
        let out = eval(&p, &mut input).unwrap();
        assert_eq!(out, "12");
        assert_eq!(input.pos(), 2);
    }

    #[test]
    fn many1_promotes_error_on_zero_matches() {
        let p = many1(ascii::digit(), str_fold);
        let err = parse_str("abc", &p).unwrap_err();
        assert_eq!(err.expected_labels().unwrap()[0], "one or more of digit");
    }

    #[test]
    fn count_rewinds_fully_on_shortfall() {
        let p = count(ascii::single('a'), str_fold, 3, || String::new());
        let mut input = Input::new("<test>", "aab");
        let err = eval(&p, &mut input);
        assert!(err.is_err());
        assert_eq!(input.pos(), 0);
    }

    #[test]
    fn or_combines_errors_by_farthest_position() {
        let p = or(vec![ascii::single('a'), ascii::single('b'), ascii::single('c')]);
        let err = parse_str("d", &p).unwrap_err();
        let labels = err.expected_labels().unwrap();
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn not_fails_without_consuming_when_child_succeeds() {
        let p = not(ascii::single('a'), || String::new());
        let mut input = Input::new("<test>", "abc");
        assert!(eval(&p, &mut input).is_err());
        assert_eq!(input.pos(), 0);
    }
}
