use anyhow::{anyhow, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    Global,
    Local,
    Print,
    True,
    False,
    KwInt,
    KwDouble,
    KwString,
    KwBoolean,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Colon,
    Semicolon,
    Assign,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
}

pub struct Lexer;

impl Lexer {
    pub fn tokenize(src: &str) -> Result<Vec<Token>> {
        let mut toks = Vec::new();
        let bytes = src.as_bytes();
        let mut i = 0usize;

        while i < bytes.len() {
            let c = bytes[i] as char;
            if c.is_ascii_whitespace() {
                i += 1;
                continue;
            }
            if c == '/' && i + 1 < bytes.len() && bytes[i + 1] as char == '/' {
                while i < bytes.len() && bytes[i] as char != '\n' {
                    i += 1;
                }
                continue;
            }
            if c.is_ascii_digit() {
                let start = i;
                let mut is_float = false;
                while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                    i += 1;
                }
                if i + 1 < bytes.len()
                    && bytes[i] as char == '.'
                    && (bytes[i + 1] as char).is_ascii_digit()
                {
                    is_float = true;
                    i += 1;
                    while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                        i += 1;
                    }
                }
                let text = &src[start..i];
                let kind = if is_float {
                    TokenKind::Float(text.parse()?)
                } else {
                    TokenKind::Int(text.parse()?)
                };
                toks.push(Token { kind });
                continue;
            }
            if c == '"' {
                i += 1;
                let start = i;
                while i < bytes.len() && bytes[i] as char != '"' {
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err(anyhow!("unterminated string literal"));
                }
                toks.push(Token {
                    kind: TokenKind::Str(src[start..i].to_string()),
                });
                i += 1;
                continue;
            }
            if c.is_ascii_alphabetic() || c == '_' {
                let start = i;
                while i < bytes.len() {
                    let ch = bytes[i] as char;
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        i += 1;
                    } else {
                        break;
                    }
                }
                let word = &src[start..i];
                let kind = match word {
                    "global" => TokenKind::Global,
                    "local" => TokenKind::Local,
                    "print" => TokenKind::Print,
                    "true" => TokenKind::True,
                    "false" => TokenKind::False,
                    "int" => TokenKind::KwInt,
                    "double" => TokenKind::KwDouble,
                    "string" => TokenKind::KwString,
                    "boolean" => TokenKind::KwBoolean,
                    _ => TokenKind::Ident(word.to_string()),
                };
                toks.push(Token { kind });
                continue;
            }
            let kind = match c {
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                ':' => TokenKind::Colon,
                ';' => TokenKind::Semicolon,
                '=' => TokenKind::Assign,
                _ => return Err(anyhow!("unexpected character '{}'", c)),
            };
            toks.push(Token { kind });
            i += 1;
        }

        toks.push(Token {
            kind: TokenKind::Eof,
        });
        Ok(toks)
    }
}
