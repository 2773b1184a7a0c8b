use parsely::ascii::single;
use parsely::ast::{fold_ast, Ast};
use parsely::combinator::{count, many1};
use parsely::engine::eval;
use parsely::error::{ErrorState, ErrorValue};
use parsely::fold::str_fold;
use parsely::input::Input;
use parsely::parse;
use proptest::collection::vec as prop_vec;
use proptest::prelude::*;

fn state(pos: usize) -> ErrorState {
    ErrorState { pos, row: 0, col: pos, next: Some('x') }
}

fn leaf_strategy() -> impl Strategy<Value = Ast> {
    ("[a-z]{1,4}", "[a-z]{0,4}").prop_map(|(tag, contents)| Ast::leaf(tag, contents))
}

fn ast_strategy() -> impl Strategy<Value = Ast> {
    prop_oneof![leaf_strategy(), prop_vec(leaf_strategy(), 0..4).prop_map(|children| Ast::node("n", children)),]
}

proptest! {
    /// `either` always keeps the error whose position is the max of the
    /// two competing errors.
    #[test]
    fn either_keeps_the_farthest_position(xp in 0usize..200, yp in 0usize..200) {
        let x = ErrorValue::expected("<t>", state(xp), "x");
        let y = ErrorValue::expected("<t>", state(yp), "y");
        let winner = ErrorValue::either(x, y);
        prop_assert_eq!(winner.state().pos, xp.max(yp));
    }

    /// Merging two same-position errors carrying the same label never
    /// produces a duplicate.
    #[test]
    fn either_tie_dedupes_equal_labels(label in "[a-z]{1,6}") {
        let x = ErrorValue::expected("<t>", state(5), label.clone());
        let y = ErrorValue::expected("<t>", state(5), label.clone());
        let merged = ErrorValue::either(x, y);
        prop_assert_eq!(merged.expected_labels().unwrap().len(), 1);
    }

    /// An Expect-wrapped primitive's failure carries exactly one label,
    /// equal to the Expect label.
    #[test]
    fn expect_label_is_the_sole_expected_label(label in "[a-zA-Z0-9 ]{1,12}", c in "[a-wyz]") {
        let p = single('x').expect(label.clone());
        let err = parse("<t>", &c, &p).unwrap_err();
        prop_assert_eq!(err.expected_labels(), Some(&[label][..]));
    }

    /// `count`: on a shortfall the cursor ends up exactly where it started.
    #[test]
    fn count_rewinds_fully_on_shortfall(s in "[ab]{0,8}") {
        let p = count(single('a'), str_fold, 4, String::new);
        let mut input = Input::new("<t>", &s);
        let before = input.pos();
        if eval(&p, &mut input).is_err() {
            prop_assert_eq!(input.pos(), before);
        }
    }

    /// `many1`: failing to match even once leaves the cursor untouched.
    #[test]
    fn many1_rewinds_fully_when_child_never_matches(s in "[bc]{0,8}") {
        let p = many1(single('a'), str_fold);
        let mut input = Input::new("<t>", &s);
        let before = input.pos();
        prop_assert!(eval(&p, &mut input).is_err());
        prop_assert_eq!(input.pos(), before);
    }

    /// Folding two AST nodes produces a node whose children are the
    /// concatenation of each operand's own children, or the operand
    /// itself when it has none.
    #[test]
    fn fold_ast_children_are_the_concatenation_of_operands(a in ast_strategy(), b in ast_strategy()) {
        let mut expected = if a.children.is_empty() { Vec::from([a.clone()]) } else { a.children.clone() };
        expected.extend(if b.children.is_empty() { Vec::from([b.clone()]) } else { b.children.clone() });
        let merged = fold_ast(a, b);
        prop_assert_eq!(merged.children, expected);
    }
}
