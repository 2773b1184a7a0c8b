//! # Fold library
//!
//! Plain functions for the `fold`/`lift_default` slots that
//! [`also`][crate::combinator::also], [`many`][crate::combinator::many],
//! [`many1`][crate::combinator::many1], and [`count`][crate::combinator::count]
//! take. Grounded on mpc.c's `mpcf_*` family (`mpcf_strfold`, `mpcf_fst`,
//! `mpcf_snd`, `mpcf_str`) — these are the Rust equivalents, passed by
//! function-item reference rather than wrapped in an extra factory call.

use crate::lib::std::string::String;

/// Concatenates two strings. The default fold for `many`/`many1`/`count`
/// over string-valued children.
pub fn str_fold(a: String, b: String) -> String {
    a + &b
}

/// Lifts a single `char` into a one-character `String`.
pub fn str_lift(c: char) -> String {
    c.to_string()
}

/// Keeps the first of two values, discarding the second.
pub fn fst<V>(a: V, _b: V) -> V {
    a
}

/// Keeps the second of two values, discarding the first.
pub fn snd<V>(_a: V, b: V) -> V {
    b
}

/// Builds a zero-argument `lift_default` that always returns a clone of
/// `value`. Useful for `many`/`count`'s empty-match case when the empty
/// value isn't `Default`.
pub fn const_lift<V: Clone + 'static>(value: V) -> impl Fn() -> V {
    move || value.clone()
}
