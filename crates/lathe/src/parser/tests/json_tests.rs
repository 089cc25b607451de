//! A JSON value grammar: recursion, separated lists, string and number
//! primitives, and whole-input acceptance.

use indoc::indoc;

use crate::ast::NONE;
use crate::{
    Ast, Input, Interner, Parser, Slot, Tag, integer, lazy, left, lit, many, map, multi, real,
    right, satisfy, sep_by, seq, string_lit,
};

const T_STR: Tag = 1;
const T_NUM: Tag = 2;
const T_TRUE: Tag = 3;
const T_FALSE: Tag = 4;
const T_NULL: Tag = 5;
const T_ARR: Tag = 6;
const T_OBJ: Tag = 7;
const T_PAIR: Tag = 8;

fn ws() -> Parser {
    many(satisfy(|b| b.is_ascii_whitespace(), NONE))
}

fn token(p: Parser) -> Parser {
    right(ws(), left(p, ws()))
}

fn json_value() -> (Parser, Slot) {
    let slot = Slot::new();

    let string = token(string_lit(T_STR));
    // Reals first so "1.5" is not split into "1" and ".5".
    let number = multi(NONE, vec![token(real(T_NUM)), token(integer(T_NUM))]);
    let true_lit = map(token(lit("true")), |_| Ast::leaf(T_TRUE, None, 0, 0));
    let false_lit = map(token(lit("false")), |_| Ast::leaf(T_FALSE, None, 0, 0));
    let null_lit = map(token(lit("null")), |_| Ast::leaf(T_NULL, None, 0, 0));

    let array = seq(
        T_ARR,
        vec![
            token(lit("[")),
            sep_by(lazy(&slot), token(lit(","))),
            token(lit("]")),
        ],
    );
    let member = seq(
        T_PAIR,
        vec![string.clone(), token(lit(":")), lazy(&slot)],
    );
    let object = seq(
        T_OBJ,
        vec![
            token(lit("{")),
            sep_by(member, token(lit(","))),
            token(lit("}")),
        ],
    );

    let value = multi(
        NONE,
        vec![string, number, object, array, true_lit, false_lit, null_lit],
    );
    slot.set(value.clone());
    (value, slot)
}

fn check_ok(src: &str, check: impl FnOnce(&Ast, &Interner)) {
    let (value, _slot) = json_value();
    let mut input = Input::new(src);
    let ast = value
        .parse_complete(&mut input)
        .unwrap_or_else(|e| panic!("failed to parse {src:?}: {e}"));
    check(&ast, input.interner());
}

fn check_fail(src: &str) {
    let (value, _slot) = json_value();
    let mut input = Input::new(src);
    assert!(
        value.parse_complete(&mut input).is_err(),
        "incorrectly accepted {src:?}"
    );
}

#[test]
fn scalar_literals() {
    check_ok("null", |ast, _| assert_eq!(ast.tag, T_NULL));
    check_ok("true", |ast, _| assert_eq!(ast.tag, T_TRUE));
    check_ok("false", |ast, _| assert_eq!(ast.tag, T_FALSE));
}

#[test]
fn strings_and_numbers() {
    check_ok("\"hello world\"", |ast, interner| {
        assert_eq!(ast.tag, T_STR);
        assert_eq!(ast.text(interner), Some("hello world"));
    });
    check_ok("123", |ast, interner| {
        assert_eq!(ast.tag, T_NUM);
        assert_eq!(ast.text(interner), Some("123"));
    });
    check_ok("-123.45", |ast, interner| {
        assert_eq!(ast.text(interner), Some("-123.45"));
    });
    check_ok("6.022e23", |ast, interner| {
        assert_eq!(ast.text(interner), Some("6.022e23"));
    });
}

#[test]
fn surrounding_whitespace_is_tolerated() {
    check_ok("  42  ", |ast, interner| {
        assert_eq!(ast.text(interner), Some("42"));
    });
    check_ok("  \"hello\"  ", |ast, _| assert_eq!(ast.tag, T_STR));
}

#[test]
fn empty_containers() {
    check_ok("[]", |ast, _| {
        assert_eq!(ast.tag, T_ARR);
        assert!(ast.children.is_empty());
    });
    check_ok("{}", |ast, _| {
        assert_eq!(ast.tag, T_OBJ);
        assert!(ast.children.is_empty());
    });
}

#[test]
fn arrays_keep_element_order() {
    check_ok("[1, \"two\", true]", |ast, interner| {
        assert_eq!(ast.tag, T_ARR);
        assert_eq!(ast.children.len(), 3);
        assert_eq!(ast.children[0].text(interner), Some("1"));
        assert_eq!(ast.children[1].text(interner), Some("two"));
        assert_eq!(ast.children[2].tag, T_TRUE);
    });
}

#[test]
fn objects_pair_keys_with_values() {
    check_ok("{\"key\": \"value\", \"n\": 123}", |ast, interner| {
        assert_eq!(ast.tag, T_OBJ);
        assert_eq!(ast.children.len(), 2);

        let first = &ast.children[0];
        assert_eq!(first.tag, T_PAIR);
        assert_eq!(first.children[0].text(interner), Some("key"));
        assert_eq!(first.children[1].text(interner), Some("value"));

        let second = &ast.children[1];
        assert_eq!(second.children[0].text(interner), Some("n"));
        assert_eq!(second.children[1].text(interner), Some("123"));
    });
}

#[test]
fn nested_document_parses() {
    let src = indoc! {r#"
        {
          "name": "lathe",
          "tags": ["parser", "combinator"],
          "version": 1.5
        }
    "#};

    check_ok(src, |ast, interner| {
        assert_eq!(ast.tag, T_OBJ);
        assert_eq!(ast.children.len(), 3);

        let tags = &ast.children[1];
        assert_eq!(tags.children[0].text(interner), Some("tags"));
        let list = &tags.children[1];
        assert_eq!(list.tag, T_ARR);
        assert_eq!(list.children.len(), 2);

        let version = &ast.children[2];
        assert_eq!(version.children[1].text(interner), Some("1.5"));
    });
}

#[test]
fn malformed_numbers_are_rejected() {
    // "1." has no fractional digits; the real primitive fails and the
    // leftover "." keeps the integer path from consuming everything.
    check_fail("1.");
    check_fail("-");
    check_fail("1.2.3");
    check_fail("1e");
    check_fail("1e-");
}

#[test]
fn misspelled_literals_are_rejected() {
    check_fail("nul");
    check_fail("flase");
    check_fail("ture");
}

#[test]
fn broken_strings_are_rejected() {
    check_fail("\"hello");
}

#[test]
fn malformed_arrays_are_rejected() {
    check_fail("[1, 2, ]");
    check_fail("[1 2]");
    check_fail("[1,");
    check_fail("[");
}

#[test]
fn malformed_objects_are_rejected() {
    check_fail("{\"a\": 1, }");
    check_fail("{\"a\": 1 \"b\": 2}");
    check_fail("{\"a\": }");
    check_fail("{\"a\"");
    check_fail("{");
    check_fail("{\"a\": 1");
}
