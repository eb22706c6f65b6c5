mod emit;
pub mod passes;
pub mod symtab;
pub mod typeck;

pub use emit::X86_64Codegen;
pub use symtab::{SymbolKind, SymbolTable};
