//! Bottom-up type checking. Fills the operand-type caches on binary
//! nodes and the value-type cache on print statements; emission
//! depends on those being populated.

use mica_codegen::CompileError;
use mica_frontend::ast::{Expr, ExprType, Program, Stmt};

use crate::symtab::SymbolTable;

pub fn check_program(program: &mut Program, syms: &SymbolTable) -> Result<(), CompileError> {
    for stmt in &mut program.body {
        check_stmt(stmt, syms)?;
    }
    Ok(())
}

fn check_stmt(stmt: &mut Stmt, syms: &SymbolTable) -> Result<(), CompileError> {
    match stmt {
        Stmt::Global { .. } | Stmt::Local { .. } => Ok(()),
        Stmt::Assign { name, value } => {
            let found = check_expr(value, syms)?;
            let expected = syms.variable_type(name)?;
            if found != expected {
                return Err(CompileError::AssignTypeMismatch {
                    name: name.clone(),
                    expected,
                    found,
                });
            }
            Ok(())
        }
        Stmt::Print { value, value_ty } => {
            *value_ty = Some(check_expr(value, syms)?);
            Ok(())
        }
        Stmt::Expr(e) => {
            check_expr(e, syms)?;
            Ok(())
        }
    }
}

pub fn check_expr(expr: &mut Expr, syms: &SymbolTable) -> Result<ExprType, CompileError> {
    match expr {
        Expr::IntLit(_) => Ok(ExprType::Int),
        Expr::DoubleLit(_) => Ok(ExprType::Double),
        Expr::StringLit(_) => Ok(ExprType::String),
        Expr::BoolLit(_) => Ok(ExprType::Boolean),
        Expr::Var(name) => syms.variable_type(name),
        Expr::BinOp {
            op,
            lhs,
            rhs,
            lhs_ty,
            rhs_ty,
        } => {
            // Right operand first; error-reporting order depends on it.
            let rt = check_expr(rhs, syms)?;
            let lt = check_expr(lhs, syms)?;

            let rt_ok = rt == ExprType::Int || rt == ExprType::Double;
            let lt_ok = lt == ExprType::Int || lt == ExprType::Double;
            if !rt_ok || !lt_ok {
                return Err(CompileError::InvalidBinaryOperands { op: op.symbol() });
            }

            *rhs_ty = Some(rt);
            *lhs_ty = Some(lt);
            if rt == ExprType::Double || lt == ExprType::Double {
                Ok(ExprType::Double)
            } else {
                Ok(ExprType::Int)
            }
        }
    }
}
