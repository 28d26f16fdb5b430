use super::*;

#[test]
fn test_add_literals() {
    let words = [
        Opcode::Ldc.code(),
        2,
        Opcode::Ldc.code(),
        3,
        Opcode::Add.code(),
        Opcode::Halt.code(),
    ];
    assert_eq!(execute(&words, &caps()).unwrap(), Value::Int(5));
}

#[test]
fn test_nested_mul_add() {
    // 5 * (42 + 23)
    let out = run_asm("LDC 5\nLDC 42\nLDC 23\nADD\nMUL\nHALT").unwrap();
    assert_eq!(out, Value::Int(325));
}

#[test]
fn test_sub_is_below_minus_top() {
    let out = run_asm("LDC 10\nLDC 3\nSUB\nHALT").unwrap();
    assert_eq!(out, Value::Int(7), "stack [10, 3] must give 10 - 3");
}

#[test]
fn test_negative_literals_and_products() {
    let out = run_asm("LDC -4\nLDC 6\nMUL\nLDC -30\nSUB\nHALT").unwrap();
    assert_eq!(out, Value::Int(6));
}

#[test]
fn test_arithmetic_wraps_on_overflow() {
    let src = format!("LDC {}\nLDC 1\nADD\nHALT", i64::MAX);
    assert_eq!(run_asm(&src).unwrap(), Value::Int(i64::MIN));
}

#[test]
fn test_halt_returns_top_not_bottom() {
    let out = run_asm("LDC 1\nLDC 2\nHALT").unwrap();
    assert_eq!(out, Value::Int(2));
}

#[test]
fn test_runs_are_deterministic() {
    let words = assemble(&factorial(7)).unwrap();
    let mut first = Machine::from_words(&words, &caps()).unwrap();
    let mut second = Machine::from_words(&words, &caps()).unwrap();
    assert_eq!(first.run().unwrap(), second.run().unwrap());
    assert_eq!(first.stats(), second.stats());
}
