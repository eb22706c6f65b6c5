use anyhow::{anyhow, Result};

use crate::ast::*;
use crate::lexer::{Token, TokenKind};

pub struct Parser<'a> {
    toks: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn parse(toks: &'a [Token]) -> Result<Program> {
        let mut p = Parser { toks, pos: 0 };
        let mut body = Vec::new();
        while p.peek_kind() != Some(&TokenKind::Eof) {
            body.push(p.parse_stmt()?);
        }
        Ok(Program { body })
    }

    fn parse_stmt(&mut self) -> Result<Stmt> {
        if self.eat_kind(&TokenKind::Global) {
            let (name, ty) = self.parse_declaration()?;
            return Ok(Stmt::Global { name, ty });
        }
        if self.eat_kind(&TokenKind::Local) {
            let (name, ty) = self.parse_declaration()?;
            return Ok(Stmt::Local { name, ty });
        }
        if self.eat_kind(&TokenKind::Print) {
            let value = self.parse_expr()?;
            self.expect(&TokenKind::Semicolon)?;
            return Ok(Stmt::Print {
                value,
                value_ty: None,
            });
        }
        // `ident = expr ;` is an assignment, anything else is an
        // expression statement.
        if let Some(TokenKind::Ident(name)) = self.peek_kind().cloned() {
            if self.peek_kind_at(1) == Some(&TokenKind::Assign) {
                self.pos += 2;
                let value = self.parse_expr()?;
                self.expect(&TokenKind::Semicolon)?;
                return Ok(Stmt::Assign { name, value });
            }
        }
        let e = self.parse_expr()?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(Stmt::Expr(e))
    }

    fn parse_declaration(&mut self) -> Result<(String, ExprType)> {
        let name = if let Some(TokenKind::Ident(s)) = self.peek_kind().cloned() {
            self.pos += 1;
            s
        } else {
            return Err(anyhow!("expected variable name in declaration"));
        };
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        self.expect(&TokenKind::Semicolon)?;
        Ok((name, ty))
    }

    fn parse_type(&mut self) -> Result<ExprType> {
        let ty = match self.peek_kind() {
            Some(TokenKind::KwInt) => ExprType::Int,
            Some(TokenKind::KwDouble) => ExprType::Double,
            Some(TokenKind::KwString) => ExprType::String,
            Some(TokenKind::KwBoolean) => ExprType::Boolean,
            _ => return Err(anyhow!("expected a type name")),
        };
        self.pos += 1;
        Ok(ty)
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinOpKind::Add,
                Some(TokenKind::Minus) => BinOpKind::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_term()?;
            lhs = Expr::binop(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_factor()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinOpKind::Mul,
                Some(TokenKind::Slash) => BinOpKind::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_factor()?;
            lhs = Expr::binop(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_factor(&mut self) -> Result<Expr> {
        let kind = self
            .peek_kind()
            .cloned()
            .ok_or_else(|| anyhow!("unexpected end of input"))?;
        match kind {
            TokenKind::Int(v) => {
                self.pos += 1;
                Ok(Expr::IntLit(v))
            }
            // negative literals fold at parse time
            TokenKind::Minus => {
                self.pos += 1;
                match self.peek_kind().cloned() {
                    Some(TokenKind::Int(v)) => {
                        self.pos += 1;
                        Ok(Expr::IntLit(-v))
                    }
                    Some(TokenKind::Float(v)) => {
                        self.pos += 1;
                        Ok(Expr::DoubleLit(-v))
                    }
                    _ => Err(anyhow!("expected a numeric literal after unary '-'")),
                }
            }
            TokenKind::Float(v) => {
                self.pos += 1;
                Ok(Expr::DoubleLit(v))
            }
            TokenKind::Str(s) => {
                self.pos += 1;
                Ok(Expr::StringLit(s))
            }
            TokenKind::True => {
                self.pos += 1;
                Ok(Expr::BoolLit(true))
            }
            TokenKind::False => {
                self.pos += 1;
                Ok(Expr::BoolLit(false))
            }
            TokenKind::Ident(name) => {
                self.pos += 1;
                Ok(Expr::Var(name))
            }
            TokenKind::LParen => {
                self.pos += 1;
                let e = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(e)
            }
            other => Err(anyhow!("unexpected token {:?} in expression", other)),
        }
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.toks.get(self.pos).map(|t| &t.kind)
    }

    fn peek_kind_at(&self, ahead: usize) -> Option<&TokenKind> {
        self.toks.get(self.pos + ahead).map(|t| &t.kind)
    }

    fn eat_kind(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if self.eat_kind(kind) {
            Ok(())
        } else {
            Err(anyhow!(
                "expected {:?}, found {:?}",
                kind,
                self.peek_kind()
            ))
        }
    }
}
