//! NASM x86-64 emission. Single forward pass over the tree, run only
//! after the preprocessing passes and the type checker succeeded.
//!
//! Evaluation convention: every expression leaves its result in rax;
//! doubles cross between rax and the xmm registers with movq (a bit
//! reinterpretation, never a numeric conversion). Binary operators
//! evaluate left, push rax, evaluate right, then combine.

use anyhow::Result;
use mica_codegen::{Abi, AsmBuf, CodeGenerator, CompileError};
use mica_frontend::ast::{BinOpKind, Expr, ExprType, Program, Stmt};

use crate::passes;
use crate::symtab::{global_variable_label, SymbolKind, SymbolTable};
use crate::typeck;

pub const EXIT_LABEL: &str = "exit_program#";
pub const PRINT_INT_LABEL: &str = "print_int#";
pub const PRINT_STRING_LABEL: &str = "print_string#";
pub const PRINT_DOUBLE_LABEL: &str = "print_double#";
pub const PRINT_BOOLEAN_LABEL: &str = "print_boolean#";

pub struct X86_64Codegen {
    abi: Abi,
    syms: SymbolTable,
}

impl X86_64Codegen {
    pub fn new(abi: Abi) -> Self {
        Self {
            abi,
            syms: SymbolTable::new(),
        }
    }

    pub fn new_linux() -> Self {
        Self::new(Abi::Linux)
    }

    pub fn new_macos() -> Self {
        Self::new(Abi::MacOs)
    }

    fn printf(&self) -> String {
        self.abi.extern_symbol("printf")
    }

    fn emit_prelude(&self, asm: &mut AsmBuf) {
        asm.raw("bits 64");
        asm.raw(&format!("extern {}", self.printf()));
        asm.blank();
    }

    fn emit_data_section(&self, asm: &mut AsmBuf) {
        asm.raw("section .data");
        asm.ins("exit_fmt#: db \"exit code:%d\", 10, 0");
        asm.blank();
        asm.ins("print_int_fmt#: db \"%d\", 10, 0");
        asm.ins("print_string_fmt#: db \"%s\", 10, 0");
        asm.ins("print_double_fmt#: db \"%lf\", 10, 0");
        asm.blank();
        asm.ins("print_boolean_string_true#: db \"true\", 0");
        asm.ins("print_boolean_string_false#: db \"false\", 0");
        asm.blank();

        asm.raw("; string literals");
        for (text, label) in self.syms.string_literals() {
            asm.ins(&format!("{}: db \"{}\", 0", label, text));
        }
        asm.blank();

        asm.raw("; global variables, one zero-initialized 64-bit cell each");
        for name in self.syms.globals() {
            asm.ins(&format!(
                "{}: db 0, 0, 0, 0, 0, 0, 0, 0",
                global_variable_label(name)
            ));
        }
        asm.blank();
    }

    /// The four print routines share one calling shape: save rbp,
    /// realign the stack to 16 bytes for the C call, printf, restore.
    fn emit_runtime(&self, asm: &mut AsmBuf) {
        let printf = self.printf();

        asm.raw("section .text");
        asm.raw(&format!("global {}", self.abi.entry_label()));
        asm.blank();

        asm.raw("; exit with the code held in rax");
        asm.label(EXIT_LABEL);
        asm.ins("and rsp, 0xFFFFFFFFFFFFFFF0");
        asm.ins("push rax");
        asm.ins("lea rdi, [rel exit_fmt#]");
        asm.ins("mov rsi, rax");
        asm.ins("mov rax, 0");
        asm.ins(&format!("call {}", printf));
        asm.ins(&format!("mov rax, {}", self.abi.exit_syscall()));
        asm.ins("pop rdi");
        asm.ins("syscall");
        asm.blank();

        asm.label(PRINT_INT_LABEL);
        asm.ins("push rbp");
        asm.ins("mov rbp, rsp");
        asm.ins("and rsp, 0xFFFFFFFFFFFFFFF0");
        asm.ins("lea rdi, [rel print_int_fmt#]");
        asm.ins("mov rsi, rax");
        asm.ins("mov rax, 0");
        asm.ins(&format!("call {}", printf));
        asm.ins("mov rsp, rbp");
        asm.ins("pop rbp");
        asm.ins("ret");
        asm.blank();

        asm.label(PRINT_STRING_LABEL);
        asm.ins("push rbp");
        asm.ins("mov rbp, rsp");
        asm.ins("and rsp, 0xFFFFFFFFFFFFFFF0");
        asm.ins("lea rdi, [rel print_string_fmt#]");
        asm.ins("mov rsi, rax");
        asm.ins("mov rax, 0");
        asm.ins(&format!("call {}", printf));
        asm.ins("mov rsp, rbp");
        asm.ins("pop rbp");
        asm.ins("ret");
        asm.blank();

        asm.label(PRINT_DOUBLE_LABEL);
        asm.ins("push rbp");
        asm.ins("mov rbp, rsp");
        asm.ins("and rsp, 0xFFFFFFFFFFFFFFF0");
        asm.ins("lea rdi, [rel print_double_fmt#]");
        asm.ins("movq xmm0, rax");
        asm.ins("mov rax, 1");
        asm.ins(&format!("call {}", printf));
        asm.ins("mov rsp, rbp");
        asm.ins("pop rbp");
        asm.ins("ret");
        asm.blank();

        asm.label(PRINT_BOOLEAN_LABEL);
        asm.ins("push rbp");
        asm.ins("mov rbp, rsp");
        asm.ins("and rsp, 0xFFFFFFFFFFFFFFF0");
        asm.ins("cmp rax, 0");
        asm.ins("je .print_boolean_false#");
        asm.label(".print_boolean_true#");
        asm.ins("lea rsi, [rel print_boolean_string_true#]");
        asm.ins("jmp .print_boolean_print#");
        asm.label(".print_boolean_false#");
        asm.ins("lea rsi, [rel print_boolean_string_false#]");
        asm.label(".print_boolean_print#");
        asm.ins("lea rdi, [rel print_string_fmt#]");
        asm.ins("mov rax, 0");
        asm.ins(&format!("call {}", printf));
        asm.ins("mov rsp, rbp");
        asm.ins("pop rbp");
        asm.ins("ret");
        asm.blank();
    }

    fn emit_entry(&self, asm: &mut AsmBuf, program: &Program) -> Result<(), CompileError> {
        asm.label(self.abi.entry_label());
        asm.ins("mov rax, 0");
        asm.ins("push rbp");
        asm.ins("mov rbp, rsp");
        let ext = self.syms.frame_extension_size();
        if ext > 0 {
            asm.ins(&format!("sub rsp, {}", ext));
        }
        asm.blank();

        for stmt in &program.body {
            self.emit_stmt(asm, stmt)?;
        }

        asm.blank();
        asm.ins("mov rsp, rbp");
        asm.ins("pop rbp");
        asm.ins(&format!("jmp {}", EXIT_LABEL));
        Ok(())
    }

    fn emit_stmt(&self, asm: &mut AsmBuf, stmt: &Stmt) -> Result<(), CompileError> {
        match stmt {
            // Storage was laid out by the preprocessing passes.
            Stmt::Global { .. } | Stmt::Local { .. } => Ok(()),
            Stmt::Assign { name, value } => {
                self.emit_expr(asm, value)?;
                match self.syms.symbol_kind(name) {
                    Some(SymbolKind::Local) => {
                        let off = self.syms.resolve_local_offset(name)?;
                        asm.ins(&format!("mov [rbp - {}], rax", off));
                        Ok(())
                    }
                    Some(SymbolKind::Global) => {
                        asm.ins(&format!("mov [rel {}], rax", global_variable_label(name)));
                        Ok(())
                    }
                    None => Err(CompileError::Undeclared(name.clone())),
                }
            }
            Stmt::Print { value, value_ty } => {
                self.emit_expr(asm, value)?;
                let routine = match value_ty {
                    Some(ExprType::Int) => PRINT_INT_LABEL,
                    Some(ExprType::String) => PRINT_STRING_LABEL,
                    Some(ExprType::Double) => PRINT_DOUBLE_LABEL,
                    Some(ExprType::Boolean) => PRINT_BOOLEAN_LABEL,
                    None => {
                        return Err(CompileError::Internal(
                            "print statement reached emission without a checked type",
                        ))
                    }
                };
                asm.ins(&format!("call {}", routine));
                Ok(())
            }
            Stmt::Expr(e) => self.emit_expr(asm, e),
        }
    }

    fn emit_expr(&self, asm: &mut AsmBuf, expr: &Expr) -> Result<(), CompileError> {
        match expr {
            Expr::IntLit(v) => {
                asm.ins(&format!("mov rax, {}", v));
                Ok(())
            }
            Expr::DoubleLit(v) => {
                asm.ins(&format!("mov rax, 0x{:016X} ; double {}", v.to_bits(), v));
                Ok(())
            }
            Expr::StringLit(text) => {
                let label = self.syms.string_literal_label(text)?;
                asm.ins(&format!("lea rax, [rel {}]", label));
                Ok(())
            }
            Expr::BoolLit(v) => {
                asm.ins(&format!("mov rax, {}", if *v { 1 } else { 0 }));
                Ok(())
            }
            Expr::Var(name) => match self.syms.symbol_kind(name) {
                Some(SymbolKind::Local) => {
                    let off = self.syms.resolve_local_offset(name)?;
                    asm.ins(&format!("mov rax, [rbp - {}]", off));
                    Ok(())
                }
                Some(SymbolKind::Global) => {
                    asm.ins(&format!("mov rax, [rel {}]", global_variable_label(name)));
                    Ok(())
                }
                None => Err(CompileError::Undeclared(name.clone())),
            },
            Expr::BinOp {
                op,
                lhs,
                rhs,
                lhs_ty,
                rhs_ty,
            } => {
                self.emit_expr(asm, lhs)?;
                asm.ins("push rax");
                self.emit_expr(asm, rhs)?;
                match (lhs_ty, rhs_ty) {
                    (Some(ExprType::Int), Some(ExprType::Int)) => {
                        emit_op_int_int(asm, *op);
                        Ok(())
                    }
                    (Some(ExprType::Double), Some(ExprType::Int)) => {
                        emit_op_double_int(asm, *op);
                        Ok(())
                    }
                    (Some(ExprType::Int), Some(ExprType::Double)) => {
                        emit_op_int_double(asm, *op);
                        Ok(())
                    }
                    (Some(ExprType::Double), Some(ExprType::Double)) => {
                        emit_op_double_double(asm, *op);
                        Ok(())
                    }
                    // The type checker admits only int/double pairs.
                    _ => Err(CompileError::Internal(
                        "binary node reached emission with unchecked or non-numeric operands",
                    )),
                }
            }
        }
    }
}

/// Both operands are ints: left on the stack, right in rax. The
/// non-commutative operators must compute left op right, so sub moves
/// the right value aside into rbx before popping the left into rax,
/// and idiv parks the divisor in rbx and reloads the dividend from
/// the stack.
fn emit_op_int_int(asm: &mut AsmBuf, op: BinOpKind) {
    match op {
        BinOpKind::Add => {
            asm.ins("add rax, [rsp]");
            asm.ins("add rsp, 8");
        }
        BinOpKind::Sub => {
            asm.ins("mov rbx, rax");
            asm.ins("pop rax");
            asm.ins("sub rax, rbx");
        }
        BinOpKind::Mul => {
            asm.ins("imul rax, [rsp]");
            asm.ins("add rsp, 8");
        }
        BinOpKind::Div => {
            asm.ins("mov rbx, rax");
            asm.ins("mov rdx, 0");
            asm.ins("mov rax, [rsp]");
            asm.ins("add rsp, 8");
            asm.ins("idiv rbx");
        }
    }
}

fn float_op(op: BinOpKind) -> &'static str {
    match op {
        BinOpKind::Add => "addsd xmm0, xmm1",
        BinOpKind::Sub => "subsd xmm0, xmm1",
        BinOpKind::Mul => "mulsd xmm0, xmm1",
        BinOpKind::Div => "divsd xmm0, xmm1",
    }
}

/// Both doubles: xmm0 takes the left operand from the stack, xmm1 the
/// right from rax.
fn emit_op_double_double(asm: &mut AsmBuf, op: BinOpKind) {
    asm.ins("movq xmm1, rax");
    asm.ins("pop rax");
    asm.ins("movq xmm0, rax");
    asm.ins(float_op(op));
    asm.ins("movq rax, xmm0");
}

/// Left int (stack), right double (rax): convert the left side.
fn emit_op_int_double(asm: &mut AsmBuf, op: BinOpKind) {
    asm.ins("movq xmm1, rax");
    asm.ins("pop rax");
    asm.ins("cvtsi2sd xmm0, rax");
    asm.ins(float_op(op));
    asm.ins("movq rax, xmm0");
}

/// Left double (stack), right int (rax): convert the right side.
fn emit_op_double_int(asm: &mut AsmBuf, op: BinOpKind) {
    asm.ins("cvtsi2sd xmm1, rax");
    asm.ins("pop rax");
    asm.ins("movq xmm0, rax");
    asm.ins(float_op(op));
    asm.ins("movq rax, xmm0");
}

impl CodeGenerator for X86_64Codegen {
    fn abi(&self) -> Abi {
        self.abi
    }

    fn generate(&mut self, program: &mut Program) -> Result<String> {
        self.syms = SymbolTable::new();
        passes::preprocess_globals_and_literals(program, &mut self.syms)?;
        passes::preprocess_locals(program, &mut self.syms)?;
        typeck::check_program(program, &self.syms)?;
        log::debug!(
            "passes done: {} globals, {} string literals",
            self.syms.globals().count(),
            self.syms.string_literals().count()
        );

        let mut asm = AsmBuf::new();
        self.emit_prelude(&mut asm);
        self.emit_data_section(&mut asm);
        self.emit_runtime(&mut asm);
        self.emit_entry(&mut asm, program)?;
        Ok(asm.finish())
    }
}
