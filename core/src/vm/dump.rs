use super::fault::Fault;
use super::segment::BoundedStack;
use super::value::Env;

/// Saved registers on the dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFrame {
    /// Pushed by SEL, popped by JOIN.
    Branch { resume: usize },
    /// Pushed by AP, popped by RTN.
    Call { resume: usize, env: Env },
}

impl DumpFrame {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            DumpFrame::Branch { .. } => "branch",
            DumpFrame::Call { .. } => "call",
        }
    }
}

pub type Dump = BoundedStack<DumpFrame>;

impl BoundedStack<DumpFrame> {
    /// Pop the frame a JOIN returns through.
    pub fn pop_branch(&mut self) -> Result<usize, Fault> {
        match self.pop()? {
            DumpFrame::Branch { resume } => Ok(resume),
            other => Err(Fault::FrameMismatch {
                instr: "JOIN",
                expected: "branch",
                found: other.kind_name(),
            }),
        }
    }

    /// Pop the frame an RTN returns through.
    pub fn pop_call(&mut self) -> Result<(usize, Env), Fault> {
        match self.pop()? {
            DumpFrame::Call { resume, env } => Ok((resume, env)),
            other => Err(Fault::FrameMismatch {
                instr: "RTN",
                expected: "call",
                found: other.kind_name(),
            }),
        }
    }
}
