//! SECD machine subsystem
//!
//! The heap arena, environments and closures, the instruction set, the dispatch
//! loop, and the loader/assembler tooling around the integer bytecode.

mod asm;
mod closure;
mod dump;
mod env;
mod fault;
mod heap;
mod loader;
mod machine;
mod opcode;
mod segment;
mod value;

pub use asm::*;
pub use closure::{Closure, Placeholder};
pub use dump::{Dump, DumpFrame};
pub use fault::*;
pub use heap::Heap;
pub use loader::*;
pub use machine::*;
pub use opcode::Opcode;
pub use segment::{BoundedStack, CodeSegment};
pub use value::*;

#[cfg(test)]
mod vm_test;
