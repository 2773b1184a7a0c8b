//! # Error management
//!
//! A parse failure is an [`ErrorValue`]: the filename and cursor state at the
//! failure site, plus either a set of `expected` labels or a free-form
//! `failure` message. Exactly one of the two is ever populated.
//!
//! Combinators accumulate these along the way:
//! - [`Expect`][crate::parser::Parser::expect] replaces a child's error with
//!   a fresh one naming its own label.
//! - Choice combinators (`else`/`or`) [`combine`][ErrorValue::either] two
//!   competing errors, keeping whichever reached further into the input.
//! - [`many1`][crate::combinator::many1]/[`count`][crate::combinator::count]
//!   [`promote`][ErrorValue::promote_many1] a mismatch into a message that
//!   states the repetition requirement that wasn't met.

use crate::lib::std::fmt;
use crate::lib::std::string::String;
use crate::lib::std::vec::Vec;

/// Cursor coordinates captured at the point an error was raised.
///
/// Carried on every [`ErrorValue`] so that rendering doesn't need to walk
/// the input a second time to recover row/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorState {
    /// Byte offset into the source buffer.
    pub pos: usize,
    /// Zero-based row (newline count before `pos`).
    pub row: usize,
    /// Zero-based column within `row`.
    pub col: usize,
    /// The character actually found at `pos`, or `None` at end of input.
    pub next: Option<char>,
}

/// The body of an [`ErrorValue`]: either a set of expected labels or an
/// outright failure message. The two are never both present.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ErrorBody {
    /// Labels a mismatched primitive or combinator expected to see here.
    /// Order is insertion order; [`ErrorValue::add_expected`] keeps entries
    /// unique.
    Expected(Vec<String>),
    /// A message installed directly by [`Fail`][crate::parser::ParserKind::Fail],
    /// an evaluated `Undefined` parser, or an unreadable file.
    Failure(String),
}

/// A parse error: where it happened and why.
///
/// Two errors are combined with [`either`][ErrorValue::either] along choice
/// boundaries under a "farthest position wins" rule, so that the error
/// surfaced to the user reflects the branch that got furthest into the
/// input, not just the last one tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    filename: String,
    state: ErrorState,
    body: ErrorBody,
}

impl ErrorValue {
    /// Builds an expected-mismatch error with a single label.
    pub fn expected(filename: impl Into<String>, state: ErrorState, label: impl Into<String>) -> Self {
        ErrorValue {
            filename: filename.into(),
            state,
            body: ErrorBody::Expected(vec![label.into()]),
        }
    }

    /// Builds an expected-mismatch error with no labels yet; used as the
    /// starting accumulator inside [`Or`]/[`And`] evaluation before the
    /// first real error is folded in via [`either`][Self::either].
    pub(crate) fn expected_empty(filename: impl Into<String>, state: ErrorState) -> Self {
        ErrorValue {
            filename: filename.into(),
            state,
            body: ErrorBody::Expected(Vec::new()),
        }
    }

    /// Builds an outright-failure error carrying a free-form message.
    pub fn failure(filename: impl Into<String>, state: ErrorState, message: impl Into<String>) -> Self {
        ErrorValue {
            filename: filename.into(),
            state,
            body: ErrorBody::Failure(message.into()),
        }
    }

    /// Cursor state at which this error was raised.
    pub fn state(&self) -> ErrorState {
        self.state
    }

    /// Filename this error is reported against.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The expected labels, if this is an expected-mismatch error.
    pub fn expected_labels(&self) -> Option<&[String]> {
        match &self.body {
            ErrorBody::Expected(xs) => Some(xs),
            ErrorBody::Failure(_) => None,
        }
    }

    /// The failure message, if this is an outright-failure error.
    pub fn failure_message(&self) -> Option<&str> {
        match &self.body {
            ErrorBody::Failure(msg) => Some(msg),
            ErrorBody::Expected(_) => None,
        }
    }

    fn add_expected(&mut self, label: String) {
        if let ErrorBody::Expected(xs) = &mut self.body {
            if !xs.contains(&label) {
                xs.push(label);
            }
        }
    }

    /// Combines two competing errors from alternative branches.
    ///
    /// The error with the greater `state.pos` wins outright, the other is
    /// discarded. On a tie, `y`'s expected labels are merged into `x` (set
    /// semantics, preserving `x`'s order) and `y` is discarded. Failure
    /// errors participate in the position comparison the same as expected
    /// errors; a tie between a failure and an expected error keeps `x` as
    /// written (the first branch tried) without attempting to merge labels
    /// into a failure message.
    pub fn either(x: ErrorValue, y: ErrorValue) -> ErrorValue {
        use core::cmp::Ordering;
        match x.state.pos.cmp(&y.state.pos) {
            Ordering::Greater => x,
            Ordering::Less => y,
            Ordering::Equal => {
                let mut x = x;
                if let ErrorBody::Expected(ys) = y.body {
                    if matches!(x.body, ErrorBody::Expected(_)) {
                        for label in ys {
                            x.add_expected(label);
                        }
                    }
                }
                x
            }
        }
    }

    /// Promotes a mismatch error raised by `many1`'s child on its very first
    /// attempt into `"one or more of A, B, ..."`. This is
    /// applied to the child's first-attempt error even when the child never
    /// advanced the cursor at all.
    pub fn promote_many1(mut self) -> ErrorValue {
        if let ErrorBody::Expected(labels) = &self.body {
            let joined = labels.join(", ");
            self.body = ErrorBody::Expected(vec![format!("one or more of {joined}")]);
        }
        self
    }

    /// Promotes a mismatch error raised during `count(n)` into
    /// `"<n> of A, B, ..."`.
    pub fn promote_count(mut self, n: usize) -> ErrorValue {
        if let ErrorBody::Expected(labels) = &self.body {
            let joined = labels.join(", ");
            self.body = ErrorBody::Expected(vec![format!("{n} of {joined}")]);
        }
        self
    }
}

fn char_name(c: Option<char>) -> String {
    match c {
        None => "end of input".to_string(),
        Some('\u{7}') => "bell".to_string(),
        Some('\u{8}') => "backspace".to_string(),
        Some('\u{c}') => "formfeed".to_string(),
        Some('\r') => "carriage return".to_string(),
        Some('\u{b}') => "vertical tab".to_string(),
        Some('\n') => "newline".to_string(),
        Some('\t') => "tab".to_string(),
        Some(c) => format!("'{c}'"),
    }
}

impl fmt::Display for ErrorValue {
    /// Renders as `<filename>:<row>:<col>: error: <body>`, where body is
    /// either the failure message or `expected X`/`expected X, Y or Z` with
    /// `" at <char-name>"` appended for expected-mismatch errors.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}: error: ", self.filename, self.state.row, self.state.col)?;
        match &self.body {
            ErrorBody::Failure(msg) => writeln!(f, "{msg}"),
            ErrorBody::Expected(labels) => {
                write!(f, "expected ")?;
                match labels.as_slice() {
                    [] => write!(f, "ERROR: NOTHING EXPECTED")?,
                    [only] => write!(f, "{only}")?,
                    many => {
                        let (last, rest) = many.split_last().expect("checked non-empty above");
                        for label in rest.iter().take(rest.len().saturating_sub(1)) {
                            write!(f, "{label}, ")?;
                        }
                        let penultimate = &rest[rest.len() - 1];
                        write!(f, "{penultimate} or {last}")?;
                    }
                }
                writeln!(f, " at {}", char_name(self.state.next))
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ErrorValue {}

#[cfg(test)]
#[path = "error/tests.rs"]
mod tests;
