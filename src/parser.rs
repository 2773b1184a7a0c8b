//! # The parser value model
//!
//! A [`Parser<V>`] is a node in a potentially cyclic directed graph, built
//! by the constructors on this type and the combinators in
//! [`combinator`][crate::combinator]. Two things make recursive grammars
//! possible:
//!
//! - [`Parser::new`] allocates a **retained**, `Undefined` node that may be
//!   embedded inside other parsers — including its own eventual body —
//!   before [`Parser::define`] installs that body.
//! - Embedding always picks the right edge kind for you: embedding a
//!   retained parser stores a [`Weak`] back-edge, embedding anything else
//!   moves it in as a strong, uniquely-owned edge. Rust's ownership checker
//!   enforces "an unretained parser is owned by exactly one parent" at
//!   compile time — reusing an unretained `Parser<V>` without `.clone()` is
//!   a compile error, not a runtime bug. Cycles can therefore only pass
//!   through `Weak` edges, so ordinary `Drop` (and [`Parser::cleanup`], for
//!   doing it eagerly and explicitly) release every node in a cyclic
//!   retained set exactly once.

use crate::lib::std::rc::{Rc, Weak};
use crate::lib::std::string::String;
use crate::lib::std::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::error::ErrorValue;

/// The result of running a [`Parser<V>`]: either its output or the error
/// that stopped it.
pub type ParserResult<V> = Result<V, ErrorValue>;

type Producer<V> = Rc<dyn Fn() -> V>;
type CharEmit<V> = Rc<dyn Fn(char) -> V>;
type StrEmit<V> = Rc<dyn Fn(&str) -> V>;
type Predicate = Rc<dyn Fn(char) -> bool>;
type Fold2<V> = Rc<dyn Fn(V, V) -> V>;
type FoldN<V> = Rc<dyn Fn(Vec<V>) -> V>;
type MapFn<V> = Rc<dyn Fn(&mut crate::input::Input) -> ParserResult<V>>;

/// A child edge inside a combinator's payload: either uniquely owned
/// (`Strong`, for an unretained parser moved into its parent) or a weak
/// back-edge into a retained, possibly-recursive parser.
pub(crate) enum ChildRef<V> {
    Strong(Parser<V>),
    Weak(Weak<ParserCell<V>>),
}

impl<V> ChildRef<V> {
    /// Resolves this edge to a usable `Parser<V>` handle, or `None` if a
    /// weak back-edge's target has already been dropped (meaning the user
    /// released a retained parser that was still referenced recursively —
    /// a use-after-free in the C original, a safe `None` here).
    pub(crate) fn resolve(&self) -> Option<Parser<V>> {
        match self {
            ChildRef::Strong(p) => Some(p.clone()),
            ChildRef::Weak(w) => w.upgrade().map(|cell| Parser { cell }),
        }
    }
}

pub(crate) fn embed<V>(p: Parser<V>) -> ChildRef<V> {
    if p.is_retained() {
        let weak = Rc::downgrade(&p.cell);
        ChildRef::Weak(weak)
    } else {
        ChildRef::Strong(p)
    }
}

/// The closed set of parser kinds this engine understands.
///
/// Destructor callbacks from the original C design are elided throughout:
/// a discarded `V` is simply dropped, since `V`'s own `Drop` impl already
/// does whatever the C source's `dtor` callbacks existed to do.
pub(crate) enum ParserKind<V> {
    /// Placeholder for a named parser before its body is installed; fails
    /// if evaluated.
    Undefined,
    /// Succeeds consuming nothing, producing `make()`.
    Pass(Producer<V>),
    /// Always fails with the stored message.
    Fail(String),
    /// Succeeds consuming nothing, producing `f()`.
    Lift(Producer<V>),
    /// Runs the child; on failure replaces its error with one expecting
    /// `label` at the position where the child was attempted.
    Expect(ChildRef<V>, String),
    /// Succeeds only at the start of input, producing `make()`.
    Soi(Producer<V>),
    /// Succeeds only at the end of input, producing `make()`.
    Eoi(Producer<V>),
    /// Consumes one character unconditionally (fails only at EOI),
    /// producing `emit(c)`.
    Any(CharEmit<V>),
    /// Consumes one character if it equals the stored char.
    Single(char, CharEmit<V>),
    /// Consumes one character if it falls in the inclusive range.
    Range(char, char, CharEmit<V>),
    /// Consumes one character if it is a member of the stored set.
    OneOf(String, CharEmit<V>),
    /// Consumes one character if it is absent from the stored set.
    NoneOf(String, CharEmit<V>),
    /// Consumes one character if the predicate accepts it.
    Satisfy(Predicate, CharEmit<V>),
    /// Consumes the literal string atomically, producing `emit(s)`.
    StringLit(String, StrEmit<V>),
    /// Maps a child's output through a transform; implements both `Apply`
    /// and `ApplyTo` (context is simply captured by the closure).
    Mapped(MapFn<V>),
    /// Runs the child with backtracking disabled.
    Predict(ChildRef<V>),
    /// Succeeds (producing `make()`) when the child fails; fails
    /// (consuming nothing) when the child succeeds.
    Not(ChildRef<V>, Producer<V>),
    /// Tries the child; on failure, discards its error and produces
    /// `make()` instead.
    Maybe(ChildRef<V>, Producer<V>),
    /// Zero or more repetitions, left-folded; `make()` on zero matches.
    Many(ChildRef<V>, Fold2<V>, Producer<V>),
    /// One or more repetitions, left-folded.
    Many1(ChildRef<V>, Fold2<V>),
    /// Exactly `n` repetitions, left-folded; `make()` is unused on success
    /// and exists only to type the zero-repetition accumulator seed.
    Count(ChildRef<V>, Fold2<V>, usize, Producer<V>),
    /// Ordered choice between two parsers.
    Else(ChildRef<V>, ChildRef<V>),
    /// Sequences two parsers, folding their outputs.
    Also(ChildRef<V>, ChildRef<V>, Fold2<V>),
    /// Generalized `Else` over an ordered list.
    Or(Vec<ChildRef<V>>),
    /// Generalized `Also` over an ordered list, n-ary folded.
    And(Vec<ChildRef<V>>, FoldN<V>),
}

pub(crate) struct ParserCell<V> {
    pub(crate) retained: Cell<bool>,
    pub(crate) name: RefCell<Option<String>>,
    pub(crate) kind: RefCell<ParserKind<V>>,
}

/// A node in the parser graph. See the [module docs][self] for the
/// ownership discipline and [`ParserKind`] for the full kind catalogue.
pub struct Parser<V> {
    pub(crate) cell: Rc<ParserCell<V>>,
}

impl<V> Clone for Parser<V> {
    fn clone(&self) -> Self {
        Parser { cell: Rc::clone(&self.cell) }
    }
}

impl<V> Parser<V> {
    fn from_kind_named(kind: ParserKind<V>, name: Option<String>, retained: bool) -> Self {
        Parser {
            cell: Rc::new(ParserCell {
                retained: Cell::new(retained),
                name: RefCell::new(name),
                kind: RefCell::new(kind),
            }),
        }
    }

    /// Builds an unretained, unnamed parser directly from a
    /// [`ParserKind`]. Used by [`combinator`][crate::combinator]'s
    /// multi-parser constructors (`else_`, `also`, `many`, ...), which
    /// aren't naturally `Parser` methods since they take more than one
    /// input parser.
    pub(crate) fn from_kind(kind: ParserKind<V>) -> Self {
        Parser::from_kind_named(kind, None, false)
    }

    /// `true` if this node is retained — created via [`Parser::new`] and
    /// therefore eligible to be embedded by weak back-edge, surviving
    /// inside combinators that reference it recursively.
    pub fn is_retained(&self) -> bool {
        self.cell.retained.get()
    }

    /// This parser's diagnostic name, if it has one.
    pub fn name(&self) -> Option<String> {
        self.cell.name.borrow().clone()
    }

    pub(crate) fn kind_ref(&self) -> core::cell::Ref<'_, ParserKind<V>> {
        self.cell.kind.borrow()
    }

    /// Allocates a fresh, retained, `Undefined` parser named `name`. Embed
    /// it (by `.clone()`) inside combinators that need to refer to it,
    /// including its own eventual body, then call [`Parser::define`] to
    /// install that body.
    pub fn new(name: impl Into<String>) -> Self {
        Parser::from_kind_named(ParserKind::Undefined, Some(name.into()), true)
    }

    /// Installs `body`'s kind and payload into `self`, consuming `body`
    /// (its shell is dropped). If `self` was not created with
    /// [`Parser::new`], this is a usage error: `self`'s kind becomes a
    /// [`Fail`][ParserKind::Fail] explaining the misuse, matching the
    /// "safety net" mpc.c's destructor-callback scheme needed and Rust does not.
    pub fn define(&self, body: Parser<V>) {
        if !self.is_retained() {
            *self.cell.kind.borrow_mut() =
                ParserKind::Fail("Parser::define called on a parser not created with Parser::new".into());
            return;
        }
        let installed = body.cell.kind.replace(ParserKind::Undefined);
        *self.cell.kind.borrow_mut() = installed;
    }

    /// Tears down this parser's body, resetting it to `Undefined` while
    /// preserving the shell (and any retained identity other nodes hold a
    /// weak reference to).
    pub fn undefine(&self) {
        *self.cell.kind.borrow_mut() = ParserKind::Undefined;
    }

    /// Releases a set of retained parsers that may refer to each other
    /// (even cyclically): undefines every one first, severing any
    /// recursive references, then drops the collection. Because recursive
    /// embedding always uses a [`Weak`] back-edge (see the [module
    /// docs][self]), this is equivalent to simply dropping `parsers` —
    /// `cleanup` exists for parity with mpc.c's `mpc_cleanup` and to make the
    /// teardown point explicit at call sites.
    pub fn cleanup(parsers: Vec<Parser<V>>) {
        for p in &parsers {
            p.undefine();
        }
    }

    /// Releases this parser. Provided for API parity with mpc.c's `mpc_delete`; in
    /// Rust this is just `drop(self)`.
    pub fn delete(self) {
        drop(self);
    }

    /// A parser that succeeds consuming nothing, producing `make()`.
    pub fn pass(make: impl Fn() -> V + 'static) -> Self {
        Parser::from_kind_named(ParserKind::Pass(Rc::new(make)), None, false)
    }

    /// A parser that always fails with `message` as its failure text.
    pub fn fail(message: impl Into<String>) -> Self {
        Parser::from_kind_named(ParserKind::Fail(message.into()), None, false)
    }

    /// A parser that succeeds consuming nothing, producing `f()`.
    pub fn lift(f: impl Fn() -> V + 'static) -> Self {
        Parser::from_kind_named(ParserKind::Lift(Rc::new(f)), None, false)
    }

    /// A parser that succeeds consuming nothing, producing a clone of `v`
    /// each time it runs.
    pub fn lift_val(v: V) -> Self
    where
        V: Clone + 'static,
    {
        Parser::from_kind_named(ParserKind::Lift(Rc::new(move || v.clone())), None, false)
    }

    /// Succeeds only at the start of input.
    pub fn soi(make: impl Fn() -> V + 'static) -> Self {
        Parser::from_kind_named(ParserKind::Soi(Rc::new(make)), None, false)
    }

    /// Succeeds only at the end of input.
    pub fn eoi(make: impl Fn() -> V + 'static) -> Self {
        Parser::from_kind_named(ParserKind::Eoi(Rc::new(make)), None, false)
    }

    /// Consumes any one character (fails only at end of input).
    pub fn any(emit: impl Fn(char) -> V + 'static) -> Self {
        Parser::from_kind_named(ParserKind::Any(Rc::new(emit)), None, false)
    }

    /// Consumes exactly the character `c`.
    pub fn single(c: char, emit: impl Fn(char) -> V + 'static) -> Self {
        Parser::from_kind_named(ParserKind::Single(c, Rc::new(emit)), None, false)
    }

    /// Consumes one character in the inclusive range `lo..=hi`.
    pub fn range(lo: char, hi: char, emit: impl Fn(char) -> V + 'static) -> Self {
        Parser::from_kind_named(ParserKind::Range(lo, hi, Rc::new(emit)), None, false)
    }

    /// Consumes one character present in `set`.
    pub fn one_of(set: impl Into<String>, emit: impl Fn(char) -> V + 'static) -> Self {
        Parser::from_kind_named(ParserKind::OneOf(set.into(), Rc::new(emit)), None, false)
    }

    /// Consumes one character absent from `set`.
    pub fn none_of(set: impl Into<String>, emit: impl Fn(char) -> V + 'static) -> Self {
        Parser::from_kind_named(ParserKind::NoneOf(set.into(), Rc::new(emit)), None, false)
    }

    /// Consumes one character accepted by `pred`.
    pub fn satisfy(pred: impl Fn(char) -> bool + 'static, emit: impl Fn(char) -> V + 'static) -> Self {
        Parser::from_kind_named(ParserKind::Satisfy(Rc::new(pred), Rc::new(emit)), None, false)
    }

    /// Consumes the literal string `s` atomically (mark + rewind-on-failure).
    pub fn string(s: impl Into<String>, emit: impl Fn(&str) -> V + 'static) -> Self {
        Parser::from_kind_named(ParserKind::StringLit(s.into(), Rc::new(emit)), None, false)
    }

    /// Wraps `self` so that on failure, its error is replaced by a fresh
    /// expected-mismatch error naming `label` at the position the attempt
    /// started. Every character-primitive constructor in
    /// [`ascii`][crate::ascii] wraps itself this way, so raw primitive
    /// failures never reach the caller unlabeled.
    pub fn expect(self, label: impl Into<String>) -> Self {
        let label = label.into();
        Parser::from_kind_named(ParserKind::Expect(embed(self), label), None, false)
    }

    /// Runs `self` with backtracking disabled: once it starts consuming
    /// input there is no way back out of it. Used to commit to a branch
    /// after enough of it has matched to rule out the alternatives.
    pub fn predict(self) -> Self {
        Parser::from_kind_named(ParserKind::Predict(embed(self)), None, false)
    }

    /// Succeeds (without consuming input, producing `make()`) exactly
    /// when `self` fails; fails with `expected "opposite"` when `self`
    /// succeeds.
    pub fn not(self, make: impl Fn() -> V + 'static) -> Self {
        Parser::from_kind_named(ParserKind::Not(embed(self), Rc::new(make)), None, false)
    }

    /// Tries `self`; on failure, discards its error and produces
    /// `make()` instead.
    pub fn maybe(self, make: impl Fn() -> V + 'static) -> Self {
        Parser::from_kind_named(ParserKind::Maybe(embed(self), Rc::new(make)), None, false)
    }
}

/// Maps `child`'s output through `f`. Free function (rather than a
/// `Parser` method) because it changes the output type.
pub fn apply<V0: 'static, V: 'static>(child: Parser<V0>, f: impl Fn(V0) -> V + 'static) -> Parser<V> {
    let map: MapFn<V> = Rc::new(move |input| {
        let out = crate::engine::eval(&child, input)?;
        Ok(f(out))
    });
    Parser::from_kind_named(ParserKind::Mapped(map), None, false)
}
