//! # Sequencing, choice, and repetition combinators
//!
//! `self`-consuming constructors that only narrow the output type
//! ([`Parser::expect`], [`Parser::predict`], [`Parser::not`],
//! [`Parser::maybe`]) live as methods on [`Parser`]; everything here
//! combines two or more parsers and so reads more naturally as a free
//! function, matching the `mpc_*` family's combinator style this module is
//! grounded on.

use crate::lib::std::vec::Vec;
use crate::parser::{embed, Parser, ParserKind};

/// Ordered choice: try `x`; if it fails, try `y`. Errors from both
/// branches are combined via [`ErrorValue::either`][crate::error::ErrorValue::either].
pub fn else_<V>(x: Parser<V>, y: Parser<V>) -> Parser<V> {
    let kind = ParserKind::Else(embed(x), embed(y));
    from(kind)
}

/// Generalized [`else_`] over an ordered list: the first alternative to
/// succeed wins; on total failure every branch's error is combined.
pub fn or<V>(xs: Vec<Parser<V>>) -> Parser<V> {
    let kind = ParserKind::Or(xs.into_iter().map(embed).collect());
    from(kind)
}

/// Sequences `x` then `y`, folding their outputs with `fold`. If `y`
/// fails, `x`'s output is dropped and the cursor rewinds past both.
pub fn also<V: 'static>(x: Parser<V>, y: Parser<V>, fold: impl Fn(V, V) -> V + 'static) -> Parser<V> {
    let kind = ParserKind::Also(embed(x), embed(y), crate::lib::std::rc::Rc::new(fold));
    from(kind)
}

/// Generalized [`also`] over an ordered list, folded n-ary. On the k-th
/// child's failure, all prior outputs are dropped and the cursor rewinds
/// past the whole sequence.
pub fn and<V: 'static>(xs: Vec<Parser<V>>, fold: impl Fn(Vec<V>) -> V + 'static) -> Parser<V> {
    let kind = ParserKind::And(xs.into_iter().map(embed).collect(), crate::lib::std::rc::Rc::new(fold));
    from(kind)
}

/// Zero or more repetitions of `child`, left-folded with `fold`;
/// `lift_default()` on zero matches.
pub fn many<V: 'static>(
    child: Parser<V>,
    fold: impl Fn(V, V) -> V + 'static,
    lift_default: impl Fn() -> V + 'static,
) -> Parser<V> {
    let kind = ParserKind::Many(embed(child), crate::lib::std::rc::Rc::new(fold), crate::lib::std::rc::Rc::new(lift_default));
    from(kind)
}

/// One or more repetitions of `child`, left-folded with `fold`. On zero
/// matches, the child's first-attempt error is promoted to
/// `"one or more of ..."`.
pub fn many1<V: 'static>(child: Parser<V>, fold: impl Fn(V, V) -> V + 'static) -> Parser<V> {
    let kind = ParserKind::Many1(embed(child), crate::lib::std::rc::Rc::new(fold));
    from(kind)
}

/// Exactly `n` repetitions of `child`, left-folded with `fold`. On a
/// shortfall, all collected output is dropped, the cursor rewinds to
/// before the first attempt, and the error is promoted to
/// `"<n> of ..."`.
pub fn count<V: 'static>(
    child: Parser<V>,
    fold: impl Fn(V, V) -> V + 'static,
    n: usize,
    lift_default: impl Fn() -> V + 'static,
) -> Parser<V> {
    let kind = ParserKind::Count(
        embed(child),
        crate::lib::std::rc::Rc::new(fold),
        n,
        crate::lib::std::rc::Rc::new(lift_default),
    );
    from(kind)
}

/// Succeeds (without consuming input) exactly when `child` fails;
/// produces `lift_default()`. Free-function form of [`Parser::not`].
pub fn not<V: 'static>(child: Parser<V>, lift_default: impl Fn() -> V + 'static) -> Parser<V> {
    child.not(lift_default)
}

/// Tries `child`; on failure, discards its error and produces
/// `lift_default()`. Free-function form of [`Parser::maybe`].
pub fn maybe<V: 'static>(child: Parser<V>, lift_default: impl Fn() -> V + 'static) -> Parser<V> {
    child.maybe(lift_default)
}

fn from<V>(kind: ParserKind<V>) -> Parser<V> {
    Parser::from_kind(kind)
}
