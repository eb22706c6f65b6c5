pub mod ast;
pub mod lexer;
pub mod parser;

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn parse_source(src: &str) -> Result<ast::Program> {
    let tokens = lexer::Lexer::tokenize(src)?;
    parser::Parser::parse(&tokens)
}

pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ast::Program> {
    let src = fs::read_to_string(path.as_ref())?;
    parse_source(&src)
}
