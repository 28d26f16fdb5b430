use std::fmt;

use super::fault::Fault;

/// Instruction set. The discriminant is the integer written in the bytecode stream.
#[repr(i64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Halt = 0,
    Ldc = 1,
    Ld = 2,
    Add = 3,
    Sub = 4,
    Mul = 5,
    // Two inline targets: zero branch, nonzero branch
    Sel = 6,
    Ldf = 7,
    Ldrf = 8,
    Ap = 9,
    Rtn = 10,
    Join = 11,
}

impl Opcode {
    pub const ALL: [Opcode; 12] = [
        Opcode::Halt,
        Opcode::Ldc,
        Opcode::Ld,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Sel,
        Opcode::Ldf,
        Opcode::Ldrf,
        Opcode::Ap,
        Opcode::Rtn,
        Opcode::Join,
    ];

    #[inline]
    pub const fn code(self) -> i64 {
        self as i64
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Halt => "HALT",
            Opcode::Ldc => "LDC",
            Opcode::Ld => "LD",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Sel => "SEL",
            Opcode::Ldf => "LDF",
            Opcode::Ldrf => "LDRF",
            Opcode::Ap => "AP",
            Opcode::Rtn => "RTN",
            Opcode::Join => "JOIN",
        }
    }

    /// Number of inline operands that follow the opcode in the code segment.
    pub const fn operand_count(self) -> usize {
        match self {
            Opcode::Ldc | Opcode::Ld | Opcode::Ldf | Opcode::Ldrf => 1,
            Opcode::Sel => 2,
            _ => 0,
        }
    }

    pub fn from_mnemonic(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(name))
    }
}

impl TryFrom<i64> for Opcode {
    type Error = Fault;

    fn try_from(word: i64) -> Result<Self, Self::Error> {
        usize::try_from(word)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(Fault::BadOpcode { opcode: word })
    }
}

impl From<Opcode> for i64 {
    fn from(op: Opcode) -> Self {
        op.code()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
