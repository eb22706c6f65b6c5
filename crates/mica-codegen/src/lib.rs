mod abi;
mod asm;
mod error;

pub use abi::Abi;
pub use asm::AsmBuf;
pub use error::{CompileError, ErrorKind};

use anyhow::Result;
use mica_frontend::ast::Program;

pub trait CodeGenerator {
    fn abi(&self) -> Abi;
    /// Runs the preprocessing passes, the type checker and the
    /// emission pass, returning the complete assembly text. The
    /// program is mutated: type checking fills the per-node type
    /// caches that emission relies on.
    fn generate(&mut self, program: &mut Program) -> Result<String>;
}
