use parsely::number::{float, hex, int, number, oct, real};
use parsely::parse;

#[test]
fn int_parses_plain_and_signed() {
    assert_eq!(parse("<t>", "12345", &int()).unwrap(), 12345);
    assert_eq!(parse("<t>", "-42", &int()).unwrap(), -42);
    assert_eq!(parse("<t>", "+7", &int()).unwrap(), 7);
}

#[test]
fn int_rejects_non_digits() {
    assert!(parse("<t>", "abc", &int()).is_err());
}

#[test]
fn hex_and_oct_parse_their_bases() {
    assert_eq!(parse("<t>", "1F", &hex()).unwrap(), 31);
    assert_eq!(parse("<t>", "-FF", &hex()).unwrap(), -255);
    assert_eq!(parse("<t>", "017", &oct()).unwrap(), 15);
}

#[test]
fn number_tries_decimal_before_hex_and_oct() {
    assert_eq!(parse("<t>", "10", &number()).unwrap(), 10);
}

#[test]
fn real_parses_fraction_and_exponent() {
    let r = real();
    assert!((parse("<t>", "3.14", &r).unwrap() - 3.14).abs() < 1e-9);
    assert!((parse("<t>", "+3.14e-2", &r).unwrap() - 0.0314).abs() < 1e-9);
    assert_eq!(parse("<t>", "-5", &r).unwrap(), -5.0);
}

#[test]
fn float_is_an_alias_for_real() {
    assert_eq!(parse("<t>", "2.5", &float()).unwrap(), parse("<t>", "2.5", &real()).unwrap());
}
