use super::*;

#[test]
fn test_factorial_of_ten() {
    assert_eq!(run_asm(&factorial(10)).unwrap(), Value::Int(3_628_800));
}

#[test]
fn test_factorial_base_case() {
    assert_eq!(run_asm(&factorial(0)).unwrap(), Value::Int(1));
    assert_eq!(run_asm(&factorial(1)).unwrap(), Value::Int(1));
}

#[test]
fn test_factorial_of_negative_exhausts_a_segment() {
    let trap = run_asm(&factorial(-1)).unwrap_err();
    assert_eq!(trap.kind(), FaultKind::Exhaustion, "{trap}");
}

#[test]
fn test_factorial_of_negative_exhausts_heap_when_dump_is_large() {
    let words = assemble(&factorial(-3)).unwrap();
    let caps = Capacities {
        code: 64,
        stack: 1 << 14,
        dump: 1 << 14,
        heap: 500,
    };
    let trap = execute(&words, &caps).unwrap_err();
    assert!(
        matches!(
            trap.fault,
            Fault::Exhausted {
                segment: Segment::Heap,
                ..
            }
        ),
        "{trap}"
    );
}

#[test]
fn test_curried_closure_captures_outer_argument() {
    let src = "
            LDF add
            LDC 3
            AP
            LDC 4
            AP
            HALT
    add:    LDF inner
            RTN
    inner:  LD 1
            LD 0
            ADD
            RTN
    ";
    assert_eq!(run_asm(src).unwrap(), Value::Int(7));
}

#[test]
fn test_partial_applications_share_captured_tail() {
    // (\k. k 8 - k 20) ((\x. \y. x - y) 50)
    let src = "
            LDF use_k
            LDF sub
            LDC 50
            AP
            AP
            HALT
    sub:    LDF inner
            RTN
    inner:  LD 1
            LD 0
            SUB
            RTN
    use_k:  LD 0
            LDC 8
            AP
            LD 0
            LDC 20
            AP
            SUB
            RTN
    ";
    assert_eq!(run_asm(src).unwrap(), Value::Int(12));
}

#[test]
fn test_rtn_restores_caller_environment() {
    let src = "
            LDF id
            LDC 9
            AP
            HALT
    id:     LD 0
            RTN
    ";
    let mut m = machine_for(src);
    for _ in 0..3 {
        m.step().unwrap(); // LDF, LDC, AP
    }
    assert_eq!(m.pc(), 6);
    assert!(!m.env().is_empty());
    assert_eq!(m.dump().len(), 1);
    assert!(matches!(m.dump()[0], DumpFrame::Call { resume: 5, .. }));

    m.step().unwrap(); // LD 0
    m.step().unwrap(); // RTN
    assert_eq!(m.pc(), 5);
    assert!(m.env().is_empty());
    assert!(m.dump().is_empty());
    assert_eq!(m.stack(), &[Value::Int(9)]);
    assert_eq!(m.step().unwrap(), Some(Value::Int(9)));
}

#[test]
fn test_recursive_closure_finds_itself() {
    let mut m = machine_for("LDRF f\nHALT\nf: RTN");
    let c = m.run().unwrap().as_closure().expect("closure result");
    let closure = m.heap().closure(c).unwrap();
    assert_eq!(closure.entry, 3);
    assert_eq!(m.heap().lookup(0, closure.env).unwrap(), Value::Closure(c));
    assert_eq!(m.heap().env_depth(closure.env).unwrap(), 1);
}

#[test]
fn test_plain_closure_cannot_see_itself() {
    let mut m = machine_for("LDF f\nHALT\nf: RTN");
    let c = m.run().unwrap().as_closure().unwrap();
    let closure = m.heap().closure(c).unwrap();
    assert!(closure.env.is_empty());
}

#[test]
fn test_stats_count_factorial_work() {
    let words = assemble(&factorial(5)).unwrap();
    let mut m = Machine::from_words(&words, &caps()).unwrap();
    assert_eq!(m.run().unwrap(), Value::Int(120));
    let stats = m.stats();
    // one self-binding and one closure cell, then one binding per call
    assert_eq!(stats.heap_cells, 2 + 6);
    // a call frame and a branch frame per level, the innermost call stops at the base case
    assert_eq!(stats.peak_dump, 12);
    assert!(stats.steps > 0);
}
