use std::fmt;

use thiserror::Error;

/// Fixed-capacity storage owned by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Code,
    Stack,
    Dump,
    Heap,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Segment::Code => "code segment",
            Segment::Stack => "operand stack",
            Segment::Dump => "dump",
            Segment::Heap => "heap",
        })
    }
}

/// Coarse classification of a [`Fault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// A segment or the heap ran out of room while the program was running.
    Exhaustion,
    /// The bytecode does something no well-formed program does.
    Malformed,
    /// Storage for a segment could not be reserved up front.
    Allocation,
}

/// Fatal machine conditions. None of these are recoverable: once raised, the
/// stack/dump/environment state is no longer trustworthy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("{segment} exhausted (capacity {capacity})")]
    Exhausted { segment: Segment, capacity: usize },
    #[error("cannot reserve {capacity} entries for the {segment}")]
    Reserve { segment: Segment, capacity: usize },
    #[error("invalid opcode {opcode}")]
    BadOpcode { opcode: i64 },
    #[error("invalid operand {operand} for {op}")]
    BadOperand { op: &'static str, operand: i64 },
    #[error("{segment} underflow")]
    Underflow { segment: Segment },
    #[error("code address {address} is outside the loaded code (length {len})")]
    OutOfCode { address: i64, len: usize },
    #[error("environment index {index} out of range ({depth} bindings in scope)")]
    Unbound { index: usize, depth: usize },
    #[error("recursive binding at index {index} read before it was tied")]
    Untied { index: usize },
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: &'static str },
    #[error("{instr} expected a {expected} frame on the dump, found a {found} frame")]
    FrameMismatch {
        instr: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("heap cell {cell} holds a {found}, expected a {expected}")]
    CellKind {
        cell: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("heap cell {cell} was never allocated")]
    Dangling { cell: usize },
}

impl Fault {
    pub fn kind(&self) -> FaultKind {
        match self {
            Fault::Exhausted { .. } => FaultKind::Exhaustion,
            Fault::Reserve { .. } => FaultKind::Allocation,
            _ => FaultKind::Malformed,
        }
    }
}

/// A fault together with the program counter of the instruction that raised it.
///
/// This is what [`crate::vm::Machine::run`] yields instead of a value. Callers
/// are expected to report it and stop, never to resume the machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{fault} at program counter {pc}")]
pub struct Trap {
    pub pc: usize,
    pub fault: Fault,
}

impl Trap {
    pub fn new(pc: usize, fault: Fault) -> Self {
        Self { pc, fault }
    }

    #[inline]
    pub fn kind(&self) -> FaultKind {
        self.fault.kind()
    }
}
