use parsely::ast::{self, Ast};
use parsely::parser::apply;
use parsely::{ascii, parse};

#[test]
fn also_and_many1_splice_children_into_one_flat_tree() {
    let digit = apply(ascii::digit(), |s: String| Ast::leaf("digit", s));
    let three = ast::many1(digit);
    let tree = parse("<t>", "123", &three).unwrap();
    assert_eq!(tree.children.len(), 3);
    assert_eq!(tree.children[0].contents, "1");
    assert_eq!(tree.children[2].contents, "3");
}

#[test]
fn tag_renames_a_parsers_output_node() {
    let digit = apply(ascii::digit(), |s: String| Ast::leaf("digit", s));
    let renamed = ast::tag(digit, "num");
    let tree = parse("<t>", "5", &renamed).unwrap();
    assert_eq!(tree.tag, "num");
    assert_eq!(tree.contents, "5");
}

#[test]
fn display_prints_a_tab_indented_tree() {
    let tree = Ast::node("root", Vec::from([Ast::leaf("a", "1"), Ast::leaf("b", "2")]));
    let rendered = format!("{tree}");
    assert_eq!(rendered, "root:\n\ta: '1'\n\tb: '2'\n");
}
