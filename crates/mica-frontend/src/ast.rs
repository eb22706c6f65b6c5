use std::fmt;

/// The inferred or declared type of an expression. Computed bottom-up
/// by the type checker, never assigned during emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprType {
    Int,
    Double,
    String,
    Boolean,
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprType::Int => write!(f, "int"),
            ExprType::Double => write!(f, "double"),
            ExprType::String => write!(f, "string"),
            ExprType::Boolean => write!(f, "boolean"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOpKind {
    pub fn symbol(&self) -> char {
        match self {
            BinOpKind::Add => '+',
            BinOpKind::Sub => '-',
            BinOpKind::Mul => '*',
            BinOpKind::Div => '/',
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    IntLit(i64),
    DoubleLit(f64),
    StringLit(String),
    BoolLit(bool),
    Var(String),
    /// `lhs_ty`/`rhs_ty` are filled in exactly once by the type
    /// checker; code generation reads them to pick the instruction
    /// sequence and must not run before they are populated.
    BinOp {
        op: BinOpKind,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        lhs_ty: Option<ExprType>,
        rhs_ty: Option<ExprType>,
    },
}

impl Expr {
    pub fn binop(op: BinOpKind, lhs: Expr, rhs: Expr) -> Expr {
        Expr::BinOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            lhs_ty: None,
            rhs_ty: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Global {
        name: String,
        ty: ExprType,
    },
    Local {
        name: String,
        ty: ExprType,
    },
    Assign {
        name: String,
        value: Expr,
    },
    /// `value_ty` is cached by the type checker so emission can route
    /// the value through the matching print routine.
    Print {
        value: Expr,
        value_ty: Option<ExprType>,
    },
    Expr(Expr),
}

#[derive(Debug, Clone)]
pub struct Program {
    pub body: Vec<Stmt>,
}
