pub(super) use crate::{
    config::Capacities,
    vm::{DumpFrame, Fault, FaultKind, Machine, Opcode, Segment, Trap, Value, assemble, execute},
};

pub(super) fn caps() -> Capacities {
    Capacities {
        code: 1024,
        stack: 256,
        dump: 256,
        heap: 4096,
    }
}

pub(super) fn run_asm(source: &str) -> Result<Value, Trap> {
    let words = assemble(source).unwrap();
    execute(&words, &caps())
}

pub(super) fn machine_for(source: &str) -> Machine {
    let words = assemble(source).unwrap();
    Machine::from_words(&words, &caps()).unwrap()
}

/// `fix fact. \n. if n == 0 then 1 else n * fact (n - 1)` applied to `n`.
pub(super) fn factorial(n: i64) -> String {
    format!(
        "
                LDRF fact
                LDC {n}
                AP
                HALT
        fact:   LD 0
                SEL zero, nonzero
                RTN
        zero:   LDC 1
                JOIN
        nonzero:
                LD 0
                LD 1
                LD 0
                LDC 1
                SUB
                AP
                MUL
                JOIN
        "
    )
}

mod arithmetic;
mod control_flow;
mod functions;
