/// Target ABI profile. Exactly three emitted details differ between
/// the two profiles: the mangling of imported C symbols, the spelling
/// of the entry-point label, and the exit syscall number. Everything
/// else in the output is byte-identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abi {
    Linux,
    MacOs,
}

impl Abi {
    /// Name of an imported C function as the linker expects it.
    pub fn extern_symbol(&self, name: &str) -> String {
        match self {
            Abi::Linux => name.to_string(),
            Abi::MacOs => format!("_{}", name),
        }
    }

    pub fn entry_label(&self) -> &'static str {
        match self {
            Abi::Linux => "_start",
            Abi::MacOs => "_main",
        }
    }

    pub fn exit_syscall(&self) -> &'static str {
        match self {
            Abi::Linux => "60",
            Abi::MacOs => "0x2000001",
        }
    }
}
