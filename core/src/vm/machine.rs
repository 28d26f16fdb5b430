use tracing::{debug, trace};

use crate::config::Capacities;

use super::dump::{Dump, DumpFrame};
use super::fault::{Fault, Segment, Trap};
use super::heap::Heap;
use super::opcode::Opcode;
use super::segment::{BoundedStack, CodeSegment};
use super::value::{Env, Value};

const TRACE_TARGET: &str = "secd::vm::exec";

/// Counters collected while the machine runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Instructions executed.
    pub steps: u64,
    pub peak_stack: usize,
    pub peak_dump: usize,
    /// Heap cells allocated.
    pub heap_cells: usize,
}

/// The SECD machine: code, operand stack, dump, heap and the registers that
/// index into them.
#[derive(Debug)]
pub struct Machine {
    code: CodeSegment,
    stack: BoundedStack<Value>,
    dump: Dump,
    heap: Heap,
    pc: usize,
    env: Env,
    steps: u64,
}

impl Machine {
    /// Reserve the stack, dump and heap, and take ownership of a loaded code segment.
    pub fn new(code: CodeSegment, caps: &Capacities) -> Result<Self, Fault> {
        Ok(Self {
            code,
            stack: BoundedStack::with_capacity(Segment::Stack, caps.stack)?,
            dump: Dump::with_capacity(Segment::Dump, caps.dump)?,
            heap: Heap::with_capacity(caps.heap)?,
            pc: 0,
            env: Env::EMPTY,
            steps: 0,
        })
    }

    pub fn from_words(words: &[i64], caps: &Capacities) -> Result<Self, Fault> {
        Self::new(CodeSegment::from_words(words, caps.code)?, caps)
    }

    /// Run until HALT and return the value it pops.
    pub fn run(&mut self) -> Result<Value, Trap> {
        debug!(
            target: TRACE_TARGET,
            code_len = self.code.len(),
            stack_cap = self.stack.capacity(),
            dump_cap = self.dump.capacity(),
            heap_cap = self.heap.capacity(),
            "run.start"
        );
        loop {
            if let Some(value) = self.step()? {
                let stats = self.stats();
                debug!(
                    target: TRACE_TARGET,
                    result = %value,
                    steps = stats.steps,
                    peak_stack = stats.peak_stack,
                    peak_dump = stats.peak_dump,
                    heap_cells = stats.heap_cells,
                    "run.halt"
                );
                return Ok(value);
            }
        }
    }

    /// Execute one instruction. Returns the result once HALT has executed.
    pub fn step(&mut self) -> Result<Option<Value>, Trap> {
        let at = self.pc;
        self.exec().map_err(|fault| {
            debug!(target: TRACE_TARGET, pc = at, %fault, steps = self.steps, "run.trap");
            Trap::new(at, fault)
        })
    }

    fn exec(&mut self) -> Result<Option<Value>, Fault> {
        let op = Opcode::try_from(self.fetch()?)?;
        self.steps += 1;
        trace!(
            target: TRACE_TARGET,
            pc = self.pc - 1,
            op = op.mnemonic(),
            sp = self.stack.len(),
            dp = self.dump.len(),
            "step"
        );

        match op {
            Opcode::Ldc => {
                let n = self.fetch()?;
                self.stack.push(Value::Int(n))?;
            }
            Opcode::Ld => {
                let raw = self.fetch()?;
                let index = usize::try_from(raw).map_err(|_| Fault::BadOperand { op: "LD", operand: raw })?;
                let value = self.heap.lookup(index, self.env)?;
                self.stack.push(value)?;
            }
            Opcode::Add => self.arith(i64::wrapping_add)?,
            // [.., x, y] -> x - y
            Opcode::Sub => self.arith(i64::wrapping_sub)?,
            Opcode::Mul => self.arith(i64::wrapping_mul)?,
            Opcode::Sel => {
                let cond = self.stack.pop_int()?;
                let on_zero = self.fetch()?;
                let on_nonzero = self.fetch()?;
                // resume past both targets whichever branch runs
                self.dump.push(DumpFrame::Branch { resume: self.pc })?;
                self.pc = self.address(if cond == 0 { on_zero } else { on_nonzero })?;
            }
            Opcode::Ldf => {
                let entry = self.fetch()?;
                let entry = self.address(entry)?;
                let closure = self.heap.make_closure(entry, self.env)?;
                self.stack.push(Value::Closure(closure))?;
            }
            Opcode::Ldrf => {
                let entry = self.fetch()?;
                let entry = self.address(entry)?;
                let closure = self.heap.make_recursive_closure(entry, self.env)?;
                self.stack.push(Value::Closure(closure))?;
            }
            Opcode::Ap => {
                let arg = self.stack.pop()?;
                let callee = self.stack.pop()?.expect_closure()?;
                let closure = self.heap.closure(callee)?;
                self.dump.push(DumpFrame::Call {
                    resume: self.pc,
                    env: self.env,
                })?;
                self.env = self.heap.extend(arg, closure.env)?;
                self.pc = closure.entry;
            }
            Opcode::Rtn => {
                let (resume, env) = self.dump.pop_call()?;
                self.pc = resume;
                self.env = env;
            }
            Opcode::Join => {
                self.pc = self.dump.pop_branch()?;
            }
            Opcode::Halt => return self.stack.pop().map(Some),
        }
        Ok(None)
    }

    #[inline]
    fn fetch(&mut self) -> Result<i64, Fault> {
        let word = self.code.fetch(self.pc).ok_or(Fault::OutOfCode {
            address: self.pc as i64,
            len: self.code.len(),
        })?;
        self.pc += 1;
        Ok(word)
    }

    /// Validate a jump target or closure entry read from the code segment.
    fn address(&self, target: i64) -> Result<usize, Fault> {
        usize::try_from(target)
            .ok()
            .filter(|addr| *addr < self.code.len())
            .ok_or(Fault::OutOfCode {
                address: target,
                len: self.code.len(),
            })
    }

    fn arith(&mut self, op: fn(i64, i64) -> i64) -> Result<(), Fault> {
        let rhs = self.stack.pop_int()?;
        let lhs = self.stack.pop_int()?;
        self.stack.push(Value::Int(op(lhs, rhs)))
    }

    #[inline]
    pub fn pc(&self) -> usize {
        self.pc
    }

    #[inline]
    pub fn env(&self) -> Env {
        self.env
    }

    #[inline]
    pub fn stack(&self) -> &[Value] {
        self.stack.as_slice()
    }

    #[inline]
    pub fn dump(&self) -> &[DumpFrame] {
        self.dump.as_slice()
    }

    #[inline]
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    #[inline]
    pub fn code(&self) -> &CodeSegment {
        &self.code
    }

    pub fn stats(&self) -> RunStats {
        RunStats {
            steps: self.steps,
            peak_stack: self.stack.peak(),
            peak_dump: self.dump.peak(),
            heap_cells: self.heap.len(),
        }
    }
}

/// Load `words` into a fresh machine sized by `caps` and run it to HALT.
pub fn execute(words: &[i64], caps: &Capacities) -> Result<Value, Trap> {
    let mut machine = Machine::from_words(words, caps).map_err(|fault| Trap::new(0, fault))?;
    machine.run()
}
