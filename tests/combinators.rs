use parsely::ascii::{digit, one_of, single};
use parsely::combinator::{also, and, count, else_, many, many1, maybe, not, or};
use parsely::fold::{fst, snd, str_fold};
use parsely::parse;

#[test]
fn many1_accumulates_and_fails_on_zero_matches() {
    let digits = many1(digit(), str_fold);
    assert_eq!(parse("<t>", "abc", &digits).is_err(), true);
    assert_eq!(parse("<t>", "123abc", &digits).unwrap(), "123");
}

#[test]
fn many_allows_zero_matches() {
    let digits = many(digit(), str_fold, String::new);
    assert_eq!(parse("<t>", "xyz", &digits).unwrap(), "");
}

#[test]
fn count_requires_exactly_n_and_rewinds_on_shortfall() {
    let two_a = count(single('a'), str_fold, 2, String::new);
    assert_eq!(parse("<t>", "aab", &two_a).unwrap(), "aa");
    assert!(parse("<t>", "ab", &two_a).is_err());
}

#[test]
fn also_sequences_and_rewinds_on_second_failure() {
    let ab = also(single('a'), single('b'), str_fold);
    assert_eq!(parse("<t>", "ab", &ab).unwrap(), "ab");
    assert!(parse("<t>", "ac", &ab).is_err());

    let keep_first = also(single('a'), single('b'), fst);
    assert_eq!(parse("<t>", "ab", &keep_first).unwrap(), "a");
    let keep_second = also(single('a'), single('b'), snd);
    assert_eq!(parse("<t>", "ab", &keep_second).unwrap(), "b");
}

#[test]
fn and_folds_an_ordered_list() {
    let abc = and(Vec::from([single('a'), single('b'), single('c')]), |parts: Vec<String>| parts.concat());
    assert_eq!(parse("<t>", "abc", &abc).unwrap(), "abc");
    assert!(parse("<t>", "abx", &abc).is_err());
}

#[test]
fn or_and_else_try_alternatives_in_order() {
    let ab = or(Vec::from([single('a'), single('b')]));
    assert_eq!(parse("<t>", "a", &ab).unwrap(), "a");
    assert_eq!(parse("<t>", "b", &ab).unwrap(), "b");
    assert!(parse("<t>", "c", &ab).is_err());

    let ab2 = else_(single('a'), single('b'));
    assert_eq!(parse("<t>", "b", &ab2).unwrap(), "b");
}

#[test]
fn not_succeeds_without_consuming_when_child_fails() {
    let not_digit = not(digit(), String::new);
    assert_eq!(parse("<t>", "x", &not_digit).unwrap(), "");
    assert!(parse("<t>", "1", &not_digit).is_err());
}

#[test]
fn maybe_never_fails() {
    let opt = maybe(digit(), String::new);
    assert_eq!(parse("<t>", "5", &opt).unwrap(), "5");
    assert_eq!(parse("<t>", "x", &opt).unwrap(), "");
}

#[test]
fn one_of_matches_any_char_in_set() {
    let vowel = one_of("aeiou");
    assert_eq!(parse("<t>", "e", &vowel).unwrap(), "e");
    assert!(parse("<t>", "z", &vowel).is_err());
}
