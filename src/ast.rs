//! # Generic abstract syntax tree
//!
//! [`Ast`] is the tag + contents + ordered-children tree mpc.c calls
//! `mpc_ast_t`; the functions below are the `mpca_*` family translated to
//! operate on `Parser<Ast>` instead of `mpc_parser_t*`, for callers who
//! want a ready-made tree instead of a hand-rolled output type.

use crate::combinator;
use crate::lib::std::fmt;
use crate::lib::std::string::String;
use crate::lib::std::vec::Vec;
use crate::parser::{apply, Parser};

/// A single parse-tree node: a `tag` (often the grammar rule or literal
/// kind that produced it), its matched `contents` (empty for interior
/// nodes), and an ordered list of `children`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ast {
    /// The rule or literal kind this node was tagged with.
    pub tag: String,
    /// The raw matched text, non-empty only for leaves.
    pub contents: String,
    /// This node's children, in the order they were parsed.
    pub children: Vec<Ast>,
}

impl Ast {
    /// A leaf node: a tag with no children, carrying the matched text.
    pub fn leaf(tag: impl Into<String>, contents: impl Into<String>) -> Self {
        Ast { tag: tag.into(), contents: contents.into(), children: Vec::new() }
    }

    /// An interior node: a tag with children and no contents of its own.
    pub fn node(tag: impl Into<String>, children: Vec<Ast>) -> Self {
        Ast { tag: tag.into(), contents: String::new(), children }
    }

    /// Appends `child`, mirroring `mpc_ast_add_child`.
    pub fn add_child(&mut self, child: Ast) {
        self.children.push(child);
    }

    fn print_depth(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            write!(f, "\t")?;
        }
        if self.contents.is_empty() {
            writeln!(f, "{}:", self.tag)?;
        } else {
            writeln!(f, "{}: '{}'", self.tag, self.contents)?;
        }
        for child in &self.children {
            child.print_depth(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print_depth(f, 0)
    }
}

/// The fold mpc.c's combinators use to merge two `Ast` values into one
/// untagged node: a node with existing children gets them spliced
/// straight into the result, a childless node is appended as a single
/// child. This is what keeps `also`/`many` from nesting a nondescript
/// nameless wrapper at every step of a long sequence or repetition.
pub fn fold_ast(a: Ast, b: Ast) -> Ast {
    let mut r = Ast::node("", Vec::new());
    if a.children.is_empty() {
        r.add_child(a);
    } else {
        r.children.extend(a.children);
    }
    if b.children.is_empty() {
        r.add_child(b);
    } else {
        r.children.extend(b.children);
    }
    r
}

/// Wraps `a` as a single child of a new `"root"` node only when it
/// actually has more than one child already — a zero- or one-child node
/// is returned unchanged, matching `mpc_ast_insert_root`.
pub fn insert_root(a: Ast) -> Ast {
    if a.children.len() <= 1 {
        a
    } else {
        Ast::node("root", Vec::from([a]))
    }
}

/// Lifts a bare `String` capture (e.g. from [`regex::compile`][crate::regex::compile])
/// into an untagged leaf, mirroring `mpcf_apply_str_ast`.
pub fn leaf_from_str(contents: String) -> Ast {
    Ast::leaf("", contents)
}

/// Renames `a`'s tag, mirroring `mpca_tag`.
pub fn tag(a: Parser<Ast>, new_tag: impl Into<String>) -> Parser<Ast> {
    let new_tag = new_tag.into();
    apply(a, move |mut ast: Ast| {
        ast.tag = new_tag.clone();
        ast
    })
}

/// Zero or more repetitions, folded with [`fold_ast`].
pub fn many(a: Parser<Ast>) -> Parser<Ast> {
    combinator::many(a, fold_ast, || Ast::node("", Vec::new()))
}

/// One or more repetitions, folded with [`fold_ast`].
pub fn many1(a: Parser<Ast>) -> Parser<Ast> {
    combinator::many1(a, fold_ast)
}

/// Exactly `n` repetitions, folded with [`fold_ast`].
pub fn count(a: Parser<Ast>, n: usize) -> Parser<Ast> {
    combinator::count(a, fold_ast, n, || Ast::node("", Vec::new()))
}

/// Sequences `a` then `b`, folded with [`fold_ast`].
pub fn also(a: Parser<Ast>, b: Parser<Ast>) -> Parser<Ast> {
    combinator::also(a, b, fold_ast)
}

/// N-ary sequencing, left-folded with [`fold_ast`], mirroring `mpcf_afold_ast`.
pub fn and(xs: Vec<Parser<Ast>>) -> Parser<Ast> {
    combinator::and(xs, |vals: Vec<Ast>| vals.into_iter().fold(Ast::node("", Vec::new()), fold_ast))
}

/// Ordered choice over `xs`, unchanged from [`combinator::or`] since
/// choice doesn't merge trees.
pub fn or(xs: Vec<Parser<Ast>>) -> Parser<Ast> {
    combinator::or(xs)
}

/// Succeeds when `a` fails, producing an empty node.
pub fn not(a: Parser<Ast>) -> Parser<Ast> {
    combinator::not(a, || Ast::node("", Vec::new()))
}

/// Tries `a`, producing an empty node on failure.
pub fn maybe(a: Parser<Ast>) -> Parser<Ast> {
    a.maybe(|| Ast::node("", Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_ast_splices_existing_children() {
        let a = Ast::node("", Vec::from([Ast::leaf("x", "1")]));
        let b = Ast::leaf("y", "2");
        let r = fold_ast(a, b);
        assert_eq!(r.children.len(), 2);
        assert_eq!(r.children[0].tag, "x");
        assert_eq!(r.children[1].tag, "y");
    }

    #[test]
    fn insert_root_only_wraps_multi_child() {
        let single = Ast::node("", Vec::from([Ast::leaf("a", "1")]));
        assert_eq!(insert_root(single.clone()), single);

        let multi = Ast::node("", Vec::from([Ast::leaf("a", "1"), Ast::leaf("b", "2")]));
        let wrapped = insert_root(multi.clone());
        assert_eq!(wrapped.tag, "root");
        assert_eq!(wrapped.children, Vec::from([multi]));
    }

    #[test]
    fn display_matches_mpc_ast_print_format() {
        let tree = Ast::node("root", Vec::from([Ast::leaf("digit", "7")]));
        assert_eq!(format!("{tree}"), "root:\n\tdigit: '7'\n");
    }
}
