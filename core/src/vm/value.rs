use std::fmt;

use super::fault::Fault;

/// Index of a cell in the heap arena. Only the heap hands these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(usize);

impl CellId {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Environment handle: either empty or the first binding cell of a chain.
///
/// Copying an `Env` shares the chain; chains are never mutated once built, so
/// any number of closures may hold the same tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Env(Option<CellId>);

impl Env {
    pub const EMPTY: Env = Env(None);

    #[inline]
    pub(crate) const fn from_cell(cell: CellId) -> Self {
        Self(Some(cell))
    }

    #[inline]
    pub const fn cell(self) -> Option<CellId> {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0.is_none()
    }
}

/// Non-owning reference to a closure cell. The heap owns the closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClosureRef(CellId);

impl ClosureRef {
    #[inline]
    pub(crate) const fn from_cell(cell: CellId) -> Self {
        Self(cell)
    }

    #[inline]
    pub const fn cell(self) -> CellId {
        self.0
    }
}

/// Runtime value held on the operand stack and in environment cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Closure(ClosureRef),
}

impl Value {
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Closure(_) => "closure",
        }
    }

    #[inline]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Closure(_) => None,
        }
    }

    #[inline]
    pub const fn as_closure(&self) -> Option<ClosureRef> {
        match self {
            Value::Closure(c) => Some(*c),
            Value::Int(_) => None,
        }
    }

    pub(crate) fn expect_int(self) -> Result<i64, Fault> {
        self.as_int().ok_or(Fault::TypeMismatch {
            expected: "integer",
            found: self.type_name(),
        })
    }

    pub(crate) fn expect_closure(self) -> Result<ClosureRef, Fault> {
        self.as_closure().ok_or(Fault::TypeMismatch {
            expected: "closure",
            found: self.type_name(),
        })
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Closure(c) => write!(f, "<closure #{}>", c.cell().index()),
        }
    }
}
