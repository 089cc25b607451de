use crate::ast::NONE;
use crate::{
    Assoc, Ast, Fixity, Input, Interner, Parser, Slot, Tag, between, expr, expr_altern,
    expr_insert, integer, lazy, lit, multi,
};

const T_INT: Tag = 1;
const T_ADD: Tag = 2;
const T_SUB: Tag = 3;
const T_MUL: Tag = 4;
const T_NEG: Tag = 5;
const T_POW: Tag = 6;
const T_LT: Tag = 7;
const T_LE: Tag = 8;

/// Integer atoms, parenthesized recursion, +,- below *, prefix - on top.
fn arith() -> (Parser, Slot) {
    let slot = Slot::new();
    let atom = multi(
        NONE,
        vec![
            integer(T_INT),
            between(lit("("), lazy(&slot), lit(")")),
        ],
    );
    let p = expr(atom);
    expr_insert(&p, 0, T_ADD, Fixity::Infix, Assoc::Left, lit("+"));
    expr_altern(&p, 0, T_SUB, lit("-"));
    expr_insert(&p, 1, T_MUL, Fixity::Infix, Assoc::Left, lit("*"));
    expr_insert(&p, 2, T_NEG, Fixity::Prefix, Assoc::None, lit("-"));
    slot.set(p.clone());
    (p, slot)
}

fn shape(ast: &Ast, interner: &Interner) -> String {
    if ast.tag == T_INT {
        return ast.text(interner).unwrap_or("?").to_string();
    }
    let name = match ast.tag {
        T_ADD => "ADD",
        T_SUB => "SUB",
        T_MUL => "MUL",
        T_NEG => "NEG",
        T_POW => "POW",
        T_LT => "LT",
        T_LE => "LE",
        _ => "?",
    };
    let args: Vec<_> = ast
        .children
        .iter()
        .map(|c| shape(c, interner))
        .collect();
    format!("{name}({})", args.join(","))
}

fn parse_shape(src: &str) -> String {
    let (p, _slot) = arith();
    let mut input = Input::new(src);
    let ast = p
        .parse_complete(&mut input)
        .unwrap_or_else(|e| panic!("failed to parse {src:?}: {e}"));
    shape(&ast, input.interner())
}

#[test]
fn precedence_binds_multiplication_tighter() {
    assert_eq!(parse_shape("1+2*3"), "ADD(1,MUL(2,3))");
    assert_eq!(parse_shape("2*3+1"), "ADD(MUL(2,3),1)");
}

#[test]
fn left_associativity_nests_leftward() {
    assert_eq!(parse_shape("1-2-3"), "SUB(SUB(1,2),3)");
    assert_eq!(parse_shape("1+2-3"), "SUB(ADD(1,2),3)");
}

#[test]
fn prefix_binds_above_its_level_only() {
    // NEG sits above MUL, so it grabs the atom, not the product.
    assert_eq!(parse_shape("-2*3"), "MUL(NEG(2),3)");
    assert_eq!(parse_shape("--2"), "NEG(NEG(2))");
}

#[test]
fn parentheses_override_precedence() {
    assert_eq!(parse_shape("(1+2)*3"), "MUL(ADD(1,2),3)");
}

#[test]
fn right_associativity_nests_rightward() {
    let p = expr(integer(T_INT));
    expr_insert(&p, 0, T_POW, Fixity::Infix, Assoc::Right, lit("^"));

    let mut input = Input::new("2^3^4");
    let ast = p.parse_complete(&mut input).expect("power tower");
    assert_eq!(shape(&ast, input.interner()), "POW(2,POW(3,4))");
}

#[test]
fn later_alternatives_shadow_their_prefixes() {
    // "<=" is added after "<"; reverse insertion order must try it first.
    let p = expr(integer(T_INT));
    expr_insert(&p, 0, T_LT, Fixity::Infix, Assoc::Left, lit("<"));
    expr_altern(&p, 0, T_LE, lit("<="));

    let mut input = Input::new("1<=2");
    let ast = p.parse_complete(&mut input).expect("comparison");
    assert_eq!(shape(&ast, input.interner()), "LE(1,2)");

    let mut input = Input::new("1<2");
    let ast = p.parse_complete(&mut input).expect("comparison");
    assert_eq!(shape(&ast, input.interner()), "LT(1,2)");
}

#[test]
fn prefix_and_infix_share_a_level() {
    let p = expr(integer(T_INT));
    expr_insert(&p, 0, T_SUB, Fixity::Infix, Assoc::Left, lit("-"));
    expr_insert(&p, 0, T_NEG, Fixity::Prefix, Assoc::None, lit("-"));

    let mut input = Input::new("1-2");
    let ast = p.parse_complete(&mut input).expect("subtraction");
    assert_eq!(shape(&ast, input.interner()), "SUB(1,2)");

    let mut input = Input::new("-2");
    let ast = p.parse_complete(&mut input).expect("negation");
    assert_eq!(shape(&ast, input.interner()), "NEG(2)");
}

#[test]
fn missing_right_operand_is_a_hard_failure() {
    let (p, _slot) = arith();
    let mut input = Input::new("1+*2");
    let err = p.parse(&mut input).unwrap_err();

    assert_eq!(err.message, "Expected operand after operator");
    // Rewound to just before the consumed operator.
    assert_eq!(input.pos(), 1);

    let partial = err.partial.expect("left side preserved");
    assert_eq!(partial.tag, T_ADD);
    assert_eq!(partial.children.len(), 1);
    assert_eq!(partial.children[0].tag, T_INT);
}

#[test]
fn missing_prefix_operand_is_a_hard_failure() {
    let (p, _slot) = arith();
    let mut input = Input::new("-*");
    let err = p.parse(&mut input).unwrap_err();

    assert_eq!(err.message, "Expected operand after prefix operator");
    assert_eq!(input.pos(), 0);
}

#[test]
fn root_position_matches_entry() {
    let (p, _slot) = arith();
    let mut input = Input::new("1+2");
    let ast = p.parse_complete(&mut input).expect("sum");

    assert_eq!((ast.line, ast.col), (1, 1));
}

#[test]
#[should_panic(expected = "levels must be dense")]
fn sparse_levels_panic() {
    let p = expr(integer(T_INT));
    expr_insert(&p, 2, T_ADD, Fixity::Infix, Assoc::Left, lit("+"));
}

#[test]
#[should_panic(expected = "non-expression parser")]
fn insert_on_non_expression_panics() {
    expr_insert(
        &integer(T_INT),
        0,
        T_ADD,
        Fixity::Infix,
        Assoc::Left,
        lit("+"),
    );
}
