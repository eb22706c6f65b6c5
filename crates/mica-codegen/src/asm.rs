/// Append-only assembly buffer. All emission goes through these four
/// primitives, in output order; the finished text is materialized to
/// disk only by the caller, after the whole generation succeeded.
#[derive(Debug, Default)]
pub struct AsmBuf {
    out: String,
}

impl AsmBuf {
    pub fn new() -> Self {
        Self { out: String::new() }
    }

    /// A verbatim line at column zero (directives, sections, comments).
    pub fn raw(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    /// An indented instruction line.
    pub fn ins(&mut self, line: &str) {
        self.out.push_str("    ");
        self.out.push_str(line);
        self.out.push('\n');
    }

    pub fn label(&mut self, name: &str) {
        self.out.push_str(name);
        self.out.push_str(":\n");
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    pub fn finish(self) -> String {
        self.out
    }
}
