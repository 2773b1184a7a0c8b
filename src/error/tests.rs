use super::*;

fn state(pos: usize) -> ErrorState {
    ErrorState { pos, row: 0, col: pos, next: Some('x') }
}

#[test]
fn either_keeps_farthest_position() {
    let near = ErrorValue::expected("<t>", state(1), "a");
    let far = ErrorValue::expected("<t>", state(3), "b");
    let winner = ErrorValue::either(near, far);
    assert_eq!(winner.state().pos, 3);
    assert_eq!(winner.expected_labels(), Some(&["b".to_string()][..]));
}

#[test]
fn either_merges_labels_on_tie() {
    let x = ErrorValue::expected("<t>", state(2), "a");
    let y = ErrorValue::expected("<t>", state(2), "b");
    let merged = ErrorValue::either(x, y);
    assert_eq!(merged.expected_labels(), Some(&["a".to_string(), "b".to_string()][..]));
}

#[test]
fn either_merge_is_deduped() {
    let x = ErrorValue::expected("<t>", state(2), "a");
    let y = ErrorValue::expected("<t>", state(2), "a");
    let merged = ErrorValue::either(x, y);
    assert_eq!(merged.expected_labels(), Some(&["a".to_string()][..]));
}

#[test]
fn either_tie_between_failure_and_expected_keeps_x() {
    let x = ErrorValue::failure("<t>", state(2), "boom");
    let y = ErrorValue::expected("<t>", state(2), "a");
    let winner = ErrorValue::either(x, y);
    assert_eq!(winner.failure_message(), Some("boom"));
}

#[test]
fn promote_many1_wraps_labels() {
    let e = ErrorValue::expected("<t>", state(0), "digit").promote_many1();
    assert_eq!(e.expected_labels(), Some(&["one or more of digit".to_string()][..]));
}

#[test]
fn promote_count_wraps_labels_with_n() {
    let e = ErrorValue::expected("<t>", state(0), "digit").promote_count(3);
    assert_eq!(e.expected_labels(), Some(&["3 of digit".to_string()][..]));
}

#[test]
fn display_renders_expected_with_char_name() {
    let e = ErrorValue::expected("<input>", state(0), "digit");
    assert_eq!(format!("{e}"), "<input>:0:0: error: expected digit at 'x'\n");
}

#[test]
fn display_renders_multiple_labels_with_oxford_or() {
    let mut e = ErrorValue::expected("<input>", state(0), "a");
    e.add_expected("b".to_string());
    e.add_expected("c".to_string());
    assert_eq!(format!("{e}"), "<input>:0:0: error: expected a, b or c at 'x'\n");
}

#[test]
fn display_renders_failure_message() {
    let e = ErrorValue::failure("<input>", state(0), "custom failure");
    assert_eq!(format!("{e}"), "<input>:0:0: error: custom failure\n");
}

#[test]
fn display_renders_end_of_input() {
    let e = ErrorValue::expected("<input>", ErrorState { pos: 5, row: 0, col: 5, next: None }, "digit");
    assert_eq!(format!("{e}"), "<input>:0:5: error: expected digit at end of input\n");
}
