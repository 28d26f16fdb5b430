use super::*;

const BRANCH: &str = "
        LDC {cond}
        SEL zero, nonzero
        LDC 100
        ADD
        HALT
zero:   LDC 1
        JOIN
nonzero:
        LDC 2
        JOIN
";

fn branch(cond: i64) -> String {
    BRANCH.replace("{cond}", &cond.to_string())
}

#[test]
fn test_sel_zero_takes_first_target() {
    let mut m = machine_for(&branch(0));
    m.step().unwrap(); // LDC
    m.step().unwrap(); // SEL
    assert_eq!(m.pc(), 9);
    assert_eq!(m.dump(), &[DumpFrame::Branch { resume: 5 }]);
    assert!(m.stack().is_empty());
}

#[test]
fn test_sel_nonzero_takes_second_target() {
    for cond in [1, -1, 42] {
        let mut m = machine_for(&branch(cond));
        m.step().unwrap();
        m.step().unwrap();
        assert_eq!(m.pc(), 12, "cond {cond}");
        assert_eq!(m.dump(), &[DumpFrame::Branch { resume: 5 }]);
    }
}

#[test]
fn test_join_resumes_after_inline_targets() {
    let mut m = machine_for(&branch(0));
    for _ in 0..4 {
        m.step().unwrap(); // LDC, SEL, LDC 1, JOIN
    }
    assert_eq!(m.pc(), 5);
    assert!(m.dump().is_empty());
    assert_eq!(m.stack(), &[Value::Int(1)]);
}

#[test]
fn test_branches_end_to_end() {
    assert_eq!(run_asm(&branch(0)).unwrap(), Value::Int(101));
    assert_eq!(run_asm(&branch(9)).unwrap(), Value::Int(102));
}

#[test]
fn test_nested_conditionals() {
    let src = "
            LDC 0
            SEL a0, a1
            HALT
    a0:     LDC 5
            SEL b0, b1
            JOIN
    b0:     LDC 10
            JOIN
    b1:     LDC 20
            JOIN
    a1:     LDC 30
            JOIN
    ";
    assert_eq!(run_asm(src).unwrap(), Value::Int(20));
}
