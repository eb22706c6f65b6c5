use mica_codegen::CompileError;
use mica_frontend::ast::ExprType;

/// Generated labels end with '#', which NASM accepts in identifiers
/// but the lexer never allows in user names, so compiler-generated
/// and user-declared symbols can never collide.
pub fn global_variable_label(name: &str) -> String {
    format!("global_variable#{}", name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Global,
    Local,
}

#[derive(Debug)]
struct GlobalVar {
    name: String,
    ty: ExprType,
}

#[derive(Debug)]
struct StringLiteral {
    text: String,
    label: String,
}

#[derive(Debug)]
struct LocalVar {
    name: String,
    ty: ExprType,
    /// Byte offset below rbp, assigned by `finalize_local_layout`.
    offset: Option<usize>,
}

/// Global-variable registry, string-literal pool and local-variable
/// frame allocator. Filled by the preprocessing passes, read-only
/// during emission.
#[derive(Debug, Default)]
pub struct SymbolTable {
    globals: Vec<GlobalVar>,
    strings: Vec<StringLiteral>,
    locals: Vec<LocalVar>,
    frame_extension: usize,
}

const SLOT_SIZE: usize = 8;
const STACK_ALIGN: usize = 16;

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: the same text always maps to the same label,
    /// distinct texts always get distinct labels.
    pub fn register_string_literal(&mut self, text: &str) -> String {
        if let Some(s) = self.strings.iter().find(|s| s.text == text) {
            return s.label.clone();
        }
        let label = format!("string_literal#{}", self.strings.len());
        self.strings.push(StringLiteral {
            text: text.to_string(),
            label: label.clone(),
        });
        label
    }

    /// Pool entries as `(text, label)` in registration order.
    pub fn string_literals(&self) -> impl Iterator<Item = (&str, &str)> {
        self.strings
            .iter()
            .map(|s| (s.text.as_str(), s.label.as_str()))
    }

    /// Label of an already-pooled literal. The discovery pass has
    /// registered every literal before emission starts, so a miss
    /// here is an internal fault.
    pub fn string_literal_label(&self, text: &str) -> Result<&str, CompileError> {
        self.strings
            .iter()
            .find(|s| s.text == text)
            .map(|s| s.label.as_str())
            .ok_or(CompileError::Internal("string literal missing from pool"))
    }

    pub fn register_global(&mut self, name: &str, ty: ExprType) -> Result<(), CompileError> {
        if self.globals.iter().any(|g| g.name == name) {
            return Err(CompileError::DuplicateGlobal(name.to_string()));
        }
        self.globals.push(GlobalVar {
            name: name.to_string(),
            ty,
        });
        Ok(())
    }

    /// Global names in first-seen order, for the data-section layout.
    pub fn globals(&self) -> impl Iterator<Item = &str> {
        self.globals.iter().map(|g| g.name.as_str())
    }

    /// Locals shadow globals.
    pub fn symbol_kind(&self, name: &str) -> Option<SymbolKind> {
        if self.locals.iter().any(|l| l.name == name) {
            return Some(SymbolKind::Local);
        }
        if self.globals.iter().any(|g| g.name == name) {
            return Some(SymbolKind::Global);
        }
        None
    }

    pub fn variable_type(&self, name: &str) -> Result<ExprType, CompileError> {
        if let Some(l) = self.locals.iter().find(|l| l.name == name) {
            return Ok(l.ty);
        }
        if let Some(g) = self.globals.iter().find(|g| g.name == name) {
            return Ok(g.ty);
        }
        Err(CompileError::Undeclared(name.to_string()))
    }

    /// Clears the local mapping. Must be called at scope entry, before
    /// the declare/finalize cycle for that scope.
    pub fn reset_local_scope(&mut self) {
        self.locals.clear();
        self.frame_extension = 0;
    }

    pub fn declare_local(&mut self, name: &str, ty: ExprType) -> Result<(), CompileError> {
        if self.locals.iter().any(|l| l.name == name) {
            return Err(CompileError::DuplicateLocal(name.to_string()));
        }
        self.locals.push(LocalVar {
            name: name.to_string(),
            ty,
            offset: None,
        });
        Ok(())
    }

    /// Assigns offsets 8, 16, 24, ... in declaration order and rounds
    /// the total frame extension up to the stack alignment unit.
    /// Called once per scope, after all `declare_local` calls.
    pub fn finalize_local_layout(&mut self) {
        for (i, local) in self.locals.iter_mut().enumerate() {
            local.offset = Some((i + 1) * SLOT_SIZE);
        }
        let used = self.locals.len() * SLOT_SIZE;
        self.frame_extension = used.div_ceil(STACK_ALIGN) * STACK_ALIGN;
    }

    /// Alignment-rounded stack space the frame prologue must reserve.
    pub fn frame_extension_size(&self) -> usize {
        self.frame_extension
    }

    /// Byte offset below rbp of a declared local.
    pub fn resolve_local_offset(&self, name: &str) -> Result<usize, CompileError> {
        self.locals
            .iter()
            .find(|l| l.name == name)
            .and_then(|l| l.offset)
            .ok_or_else(|| CompileError::UnresolvedLocal(name.to_string()))
    }
}
