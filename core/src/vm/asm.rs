//! Textual assembler and disassembler for the integer bytecode.
//!
//! Assembly syntax is one instruction per line:
//!
//! ```text
//! ; factorial 3
//!         LDRF fact
//!         LDC 3
//!         AP
//!         HALT
//! fact:   LD 0
//!         SEL zero, nonzero
//! ```
//!
//! Mnemonics are case-insensitive, `;` and `#` start comments, and operands are
//! integers or label names (resolved to absolute code addresses).

use std::fmt;

use anyhow::{Result, bail, ensure};
use rustc_hash::FxHashMap;

use super::opcode::Opcode;

struct Pending<'a> {
    line: usize,
    op: Opcode,
    operands: Vec<&'a str>,
}

/// Assemble `source` into the integer stream the loader accepts.
pub fn assemble(source: &str) -> Result<Vec<i64>> {
    let mut labels: FxHashMap<&str, i64> = FxHashMap::default();
    let mut pending = Vec::new();
    let mut address = 0i64;

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let mut rest = raw.split([';', '#']).next().unwrap_or_default().trim();

        while let Some((label, tail)) = rest.split_once(':') {
            let label = label.trim();
            ensure!(is_label(label), "line {line_no}: invalid label `{label}`");
            if labels.insert(label, address).is_some() {
                bail!("line {line_no}: duplicate label `{label}`");
            }
            rest = tail.trim();
        }
        if rest.is_empty() {
            continue;
        }

        let mut parts = rest.split(|c: char| c.is_whitespace() || c == ',').filter(|s| !s.is_empty());
        let Some(mnemonic) = parts.next() else { continue };
        let Some(op) = Opcode::from_mnemonic(mnemonic) else {
            bail!("line {line_no}: unknown instruction `{mnemonic}`");
        };
        let operands: Vec<&str> = parts.collect();
        ensure!(
            operands.len() == op.operand_count(),
            "line {line_no}: {op} takes {} operand(s), got {}",
            op.operand_count(),
            operands.len()
        );
        address += 1 + operands.len() as i64;
        pending.push(Pending {
            line: line_no,
            op,
            operands,
        });
    }

    let mut words = Vec::with_capacity(address as usize);
    for Pending { line, op, operands } in pending {
        words.push(op.code());
        for operand in operands {
            let word = match operand.parse::<i64>() {
                Ok(n) => n,
                Err(_) => match labels.get(operand) {
                    Some(addr) => *addr,
                    None => bail!("line {line}: undefined label `{operand}`"),
                },
            };
            words.push(word);
        }
    }
    Ok(words)
}

fn is_label(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// One decoded entry of a code listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub address: usize,
    /// `None` for words that do not decode to an instruction.
    pub op: Option<Opcode>,
    pub operands: Vec<i64>,
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>5}: ", self.address)?;
        match self.op {
            Some(op) => {
                f.write_str(op.mnemonic())?;
                for operand in &self.operands {
                    write!(f, " {operand}")?;
                }
                Ok(())
            }
            None => match self.operands.first() {
                Some(word) => write!(f, ".word {word}"),
                None => f.write_str(".word"),
            },
        }
    }
}

/// Decode a code segment into a listing. Never fails: words that are not
/// opcodes, and instructions cut short by the end of code, are listed as data.
pub fn disassemble(code: &[i64]) -> Vec<Listing> {
    let mut out = Vec::new();
    let mut pc = 0;
    while pc < code.len() {
        let decoded = Opcode::try_from(code[pc])
            .ok()
            .filter(|op| pc + op.operand_count() < code.len());
        match decoded {
            Some(op) => {
                let operands = code[pc + 1..=pc + op.operand_count()].to_vec();
                out.push(Listing {
                    address: pc,
                    op: Some(op),
                    operands,
                });
                pc += 1 + op.operand_count();
            }
            None => {
                out.push(Listing {
                    address: pc,
                    op: None,
                    operands: vec![code[pc]],
                });
                pc += 1;
            }
        }
    }
    out
}
