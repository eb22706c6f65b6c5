use mica_frontend::ast::{BinOpKind, Expr, Stmt};
use mica_frontend::parse_source;

fn only_expr(src: &str) -> Expr {
    let program = parse_source(src).expect("parse ok");
    assert_eq!(program.body.len(), 1);
    match program.body.into_iter().next().unwrap() {
        Stmt::Expr(e) => e,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    // 1 + 2 * 3 parses as 1 + (2 * 3)
    let e = only_expr("1 + 2 * 3;");
    match e {
        Expr::BinOp { op: BinOpKind::Add, lhs, rhs, .. } => {
            assert!(matches!(*lhs, Expr::IntLit(1)));
            assert!(matches!(*rhs, Expr::BinOp { op: BinOpKind::Mul, .. }));
        }
        other => panic!("expected top-level add, got {:?}", other),
    }
}

#[test]
fn parentheses_override_precedence() {
    let e = only_expr("(1 + 2) * 3;");
    match e {
        Expr::BinOp { op: BinOpKind::Mul, lhs, .. } => {
            assert!(matches!(*lhs, Expr::BinOp { op: BinOpKind::Add, .. }));
        }
        other => panic!("expected top-level mul, got {:?}", other),
    }
}

#[test]
fn same_precedence_associates_left() {
    // 10 - 3 - 2 parses as (10 - 3) - 2
    let e = only_expr("10 - 3 - 2;");
    match e {
        Expr::BinOp { op: BinOpKind::Sub, lhs, rhs, .. } => {
            assert!(matches!(*lhs, Expr::BinOp { op: BinOpKind::Sub, .. }));
            assert!(matches!(*rhs, Expr::IntLit(2)));
        }
        other => panic!("expected top-level sub, got {:?}", other),
    }
}

#[test]
fn operand_type_caches_start_empty() {
    let e = only_expr("1 + 2;");
    match e {
        Expr::BinOp { lhs_ty, rhs_ty, .. } => {
            assert!(lhs_ty.is_none());
            assert!(rhs_ty.is_none());
        }
        other => panic!("expected binop, got {:?}", other),
    }
}
