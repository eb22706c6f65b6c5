//! Preprocessing traversals over the syntax tree. Both run to
//! completion before any code is emitted: the data section (global
//! cells and the literal pool) precedes the text section in the
//! output, so discovery cannot be interleaved with emission.

use mica_codegen::CompileError;
use mica_frontend::ast::{Expr, Program, Stmt};

use crate::symtab::SymbolTable;

/// Pass 1: register every global declaration and every string literal
/// in the whole tree.
pub fn preprocess_globals_and_literals(
    program: &Program,
    syms: &mut SymbolTable,
) -> Result<(), CompileError> {
    for stmt in &program.body {
        match stmt {
            Stmt::Global { name, ty } => syms.register_global(name, *ty)?,
            Stmt::Local { .. } => {}
            Stmt::Assign { value, .. } => collect_string_literals(value, syms),
            Stmt::Print { value, .. } => collect_string_literals(value, syms),
            Stmt::Expr(e) => collect_string_literals(e, syms),
        }
    }
    Ok(())
}

fn collect_string_literals(expr: &Expr, syms: &mut SymbolTable) {
    match expr {
        Expr::StringLit(text) => {
            syms.register_string_literal(text);
        }
        Expr::BinOp { lhs, rhs, .. } => {
            collect_string_literals(lhs, syms);
            collect_string_literals(rhs, syms);
        }
        Expr::IntLit(_) | Expr::DoubleLit(_) | Expr::BoolLit(_) | Expr::Var(_) => {}
    }
}

/// Pass 2: the reset/declare/finalize cycle for the program scope.
/// Offsets become resolvable only after finalization.
pub fn preprocess_locals(program: &Program, syms: &mut SymbolTable) -> Result<(), CompileError> {
    syms.reset_local_scope();
    for stmt in &program.body {
        if let Stmt::Local { name, ty } = stmt {
            syms.declare_local(name, *ty)?;
        }
    }
    syms.finalize_local_layout();
    log::debug!(
        "local frame finalized: extension {} bytes",
        syms.frame_extension_size()
    );
    Ok(())
}
