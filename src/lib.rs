//! # parsely, a backtracking parser-combinator engine
//!
//! `parsely` is a toolkit for building recursive-descent parsers out of
//! small primitive parsers and higher-order combinators — sequencing,
//! choice, repetition, look-ahead — over an 8-bit input cursor. On top of
//! the combinator core it ships two embedded DSL compilers that reuse the
//! same engine to parse their own source text:
//!
//! - [`regex`] compiles a POSIX-like regular expression literal into a
//!   [`Parser`].
//! - [`lang`] compiles a small BNF-like grammar language into one or many
//!   [`Parser`]s, resolving `<name>`/`<N>` references against
//!   caller-supplied retained parsers.
//!
//! [`ast`] layers a generic tagged tree on top, for callers who just want a
//! parse tree rather than a hand-rolled output type.
//!
//! ## Example
//!
//! ```
//! use parsely::{ascii::digit, combinator::many1, fold::str_fold, parse};
//!
//! let digits = many1(digit(), str_fold);
//! let result = parse("<input>", "12345", &digits).unwrap();
//! assert_eq!(result, "12345");
//! ```
//!
//! ## Recursive grammars
//!
//! A named parser is created with [`Parser::new`], embedded inside other
//! parsers by reference, and later given a body with
//! [`Parser::define`][crate::parser::Parser::define]:
//!
//! ```
//! use parsely::{ascii::digit, ascii::single, combinator::{also, else_}, fold::{fst, snd}, parser::Parser, parse};
//!
//! let expr: Parser<String> = Parser::new("expr");
//! let atom = digit();
//! let paren = also(also(single('('), expr.clone(), snd), single(')'), fst);
//! expr.define(else_(atom, paren));
//!
//! assert_eq!(parse("<input>", "7", &expr).unwrap(), "7");
//! assert_eq!(parse("<input>", "(7)", &expr).unwrap(), "7");
//! ```
//!
//! ## Non-goals
//!
//! Streaming/incremental input, Unicode code-point handling (this engine
//! works over 8-bit code units), left recursion, memoization/packrat
//! caching, and automaton compilation are all out of scope — the engine is
//! a straightforward backtracking interpreter, and grammars that need those
//! things should reach for a different tool.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

#[macro_use]
extern crate alloc;

/// Indirection over `core`/`alloc`/`std`, mirroring the split `winnow` uses
/// so the engine's own modules can be written once regardless of which
/// features are enabled.
pub(crate) mod lib {
    pub(crate) mod std {
        #[cfg(not(feature = "std"))]
        pub(crate) use core::{cmp, fmt, mem, ops};
        #[cfg(feature = "std")]
        pub(crate) use std::{cmp, fmt, mem, ops};

        pub(crate) mod vec {
            #[cfg(not(feature = "std"))]
            pub(crate) use alloc::vec::Vec;
            #[cfg(feature = "std")]
            pub(crate) use std::vec::Vec;
        }

        pub(crate) mod string {
            #[cfg(not(feature = "std"))]
            pub(crate) use alloc::string::String;
            #[cfg(feature = "std")]
            pub(crate) use std::string::String;
        }

        pub(crate) mod rc {
            #[cfg(not(feature = "std"))]
            pub(crate) use alloc::rc::{Rc, Weak};
            #[cfg(feature = "std")]
            pub(crate) use std::rc::{Rc, Weak};
        }

        pub(crate) mod boxed {
            #[cfg(not(feature = "std"))]
            pub(crate) use alloc::boxed::Box;
            #[cfg(feature = "std")]
            pub(crate) use std::boxed::Box;
        }
    }
}

pub mod ascii;
pub mod ast;
pub mod combinator;
pub mod engine;
pub mod error;
pub mod fold;
pub mod input;
pub mod lang;
pub mod number;
pub mod parser;
pub mod regex;

#[cfg(feature = "debug")]
pub mod trace;

pub use crate::error::ErrorValue;
pub use crate::input::Input;
pub use crate::parser::Parser;

/// Commonly imported names, in the spirit of `winnow::prelude`.
pub mod prelude {
    pub use crate::combinator::{also, and, count, else_, many, many1, maybe, not, or};
    pub use crate::error::ErrorValue;
    pub use crate::parser::{Parser, ParserResult};
    pub use crate::{parse, parse_file, parse_filename};
}

/// Parses `text` (named `filename` for diagnostics) against `parser`.
///
/// This is the in-memory entry point; [`parse_file`] and
/// [`parse_filename`] are thin collaborators that read a buffer and then
/// delegate here.
pub fn parse<V>(filename: &str, text: &str, parser: &Parser<V>) -> Result<V, ErrorValue> {
    let mut input = Input::new(filename, text);
    crate::engine::eval(parser, &mut input)
}

/// Reads an entire open file into memory, then [`parse`]s it.
///
/// Only available with the `std` feature, since it performs file I/O.
#[cfg(feature = "std")]
pub fn parse_file<V>(filename: &str, handle: &mut impl std::io::Read, parser: &Parser<V>) -> Result<V, ErrorValue> {
    use std::io::Read as _;
    let mut text = String::new();
    handle
        .read_to_string(&mut text)
        .map_err(|e| ErrorValue::failure(filename, crate::error::ErrorState { pos: 0, row: 0, col: 0, next: None }, e.to_string()))?;
    parse(filename, &text, parser)
}

/// Opens `path`, reads it, and [`parse`]s it.
///
/// Only available with the `std` feature.
#[cfg(feature = "std")]
pub fn parse_filename<V>(path: &str, parser: &Parser<V>) -> Result<V, ErrorValue> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| ErrorValue::failure(path, crate::error::ErrorState { pos: 0, row: 0, col: 0, next: None }, e.to_string()))?;
    parse_file(path, &mut file, parser)
}
