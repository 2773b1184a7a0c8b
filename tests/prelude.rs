use parsely::prelude::*;

#[test]
fn prelude_reexports_cover_a_small_end_to_end_parse() {
    use parsely::ascii::digit;
    use parsely::fold::str_fold;

    let digits: Parser<String> = many1(digit(), str_fold);
    let result: Result<String, ErrorValue> = parse("<t>", "42", &digits);
    assert_eq!(result.unwrap(), "42");
}
