use parsely::ast::Ast;
use parsely::lang::{compile, compile_many};
use parsely::parser::apply;
use parsely::{ascii, parse, regex};

#[test]
fn regex_compiles_alternation_and_repetition() {
    let p = regex::compile("[a-z]+(ab)?").unwrap();
    assert_eq!(parse("<t>", "fooab", &p).unwrap(), "fooab");
    assert_eq!(parse("<t>", "foo", &p).unwrap(), "foo");
}

#[test]
fn regex_rejects_unbalanced_group() {
    assert!(regex::compile("(ab").is_err());
}

#[test]
fn grammar_compiles_a_single_body_into_an_ast() {
    let ident = apply(ascii::alpha(), |s: String| Ast::leaf("ident", s));
    let p = compile("<ident> <ident>", &[(String::from("ident"), ident)]).unwrap();
    let tree = parse("<t>", "ab", &p).unwrap();
    assert_eq!(tree.tag, "root");
    assert_eq!(tree.children.len(), 2);
    assert_eq!(tree.children[0].contents, "a");
    assert_eq!(tree.children[1].contents, "b");
}

#[test]
fn multi_rule_language_builds_a_recursive_grammar() {
    let digit = apply(ascii::digit(), |s: String| Ast::leaf("digit", s));
    let rules = compile_many(
        "expr: <digit> | '(' <expr> ')';",
        &[("digit", digit)],
    )
    .unwrap();
    let (_, expr) = rules.into_iter().find(|(n, _)| n == "expr").unwrap();

    let flat = parse("<t>", "7", &expr).unwrap();
    assert_eq!(flat.tag, "expr");

    let nested = parse("<t>", "(7)", &expr).unwrap();
    assert_eq!(nested.tag, "expr");
}
