//! Machine capacities.
//!
//! Capacities are fixed before any bytecode is read. They can come from a TOML
//! file where every key is optional:
//!
//! ```toml
//! code = 4096
//! stack = 1024
//! dump = 1024
//! heap = 65536
//! ```

use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Capacities {
    /// Words in the code segment.
    pub code: usize,
    /// Values on the operand stack.
    pub stack: usize,
    /// Frames on the dump.
    pub dump: usize,
    /// Cells in the heap arena.
    pub heap: usize,
}

impl Capacities {
    pub const DEFAULT_CODE: usize = 1 << 16;
    pub const DEFAULT_STACK: usize = 1 << 16;
    pub const DEFAULT_DUMP: usize = 1 << 16;
    pub const DEFAULT_HEAP: usize = 1 << 20;

    pub fn from_toml_str(input: &str) -> Result<Self> {
        let caps: Capacities = toml::from_str(input).context("invalid capacity configuration")?;
        caps.validate()?;
        Ok(caps)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("in config '{}'", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.code > 0, "code capacity must be positive");
        ensure!(self.stack > 0, "stack capacity must be positive");
        ensure!(self.dump > 0, "dump capacity must be positive");
        ensure!(self.heap > 0, "heap capacity must be positive");
        Ok(())
    }
}

impl Default for Capacities {
    fn default() -> Self {
        Self {
            code: Self::DEFAULT_CODE,
            stack: Self::DEFAULT_STACK,
            dump: Self::DEFAULT_DUMP,
            heap: Self::DEFAULT_HEAP,
        }
    }
}
