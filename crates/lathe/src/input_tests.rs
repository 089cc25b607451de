use crate::Input;

#[test]
fn bump_tracks_line_and_col() {
    let mut input = Input::new("ab\ncd");

    assert_eq!((input.line(), input.col()), (1, 1));
    assert_eq!(input.bump(), Some(b'a'));
    assert_eq!((input.line(), input.col()), (1, 2));
    assert_eq!(input.bump(), Some(b'b'));
    assert_eq!(input.bump(), Some(b'\n'));
    assert_eq!((input.line(), input.col()), (2, 1));
    assert_eq!(input.bump(), Some(b'c'));
    assert_eq!((input.line(), input.col()), (2, 2));
}

#[test]
fn bump_at_end_returns_none() {
    let mut input = Input::new("x");
    input.bump();

    assert!(input.at_end());
    assert_eq!(input.bump(), None);
    assert_eq!(input.pos(), 1);
}

#[test]
fn checkpoint_restore_rewinds_everything() {
    let mut input = Input::new("a\nb");
    let checkpoint = input.checkpoint();

    input.advance(3);
    assert_eq!((input.pos(), input.line(), input.col()), (3, 2, 2));

    input.restore(checkpoint);
    assert_eq!((input.pos(), input.line(), input.col()), (0, 1, 1));
}

#[test]
fn starts_with_is_case_sensitive() {
    let input = Input::new("Begin");

    assert!(input.starts_with("Beg"));
    assert!(!input.starts_with("beg"));
    assert!(input.starts_with_ci("bEgIn"));
    assert!(!input.starts_with_ci("bEgInX"));
}

#[test]
fn snippet_truncates_and_ends() {
    let mut input = Input::new("abcdefghijklmnop");

    assert_eq!(input.snippet(10).as_deref(), Some("abcdefghij"));
    input.advance(16);
    assert_eq!(input.snippet(10), None);
}

#[test]
fn peek_does_not_consume() {
    let input = Input::new("xy");

    assert_eq!(input.peek(), Some(b'x'));
    assert_eq!(input.peek_nth(1), Some(b'y'));
    assert_eq!(input.peek_nth(2), None);
    assert_eq!(input.pos(), 0);
}

#[test]
fn advance_clamps_to_length() {
    let mut input = Input::new("ab");
    input.advance(10);

    assert_eq!(input.pos(), 2);
    assert!(input.at_end());
}
