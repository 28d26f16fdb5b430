use super::fault::Fault;
use super::heap::{Cell, Heap};
use super::value::{CellId, ClosureRef, Env, Value};

/// Decoded contents of a closure cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Closure {
    pub entry: usize,
    pub env: Env,
}

/// A binding whose head is not known yet.
///
/// Produced by [`Heap::reserve`] and consumed by [`Heap::tie`]. It is neither
/// `Clone` nor `Copy`, so a reserved binding can be tied at most once.
#[derive(Debug)]
#[must_use = "a reserved binding has to be tied"]
pub struct Placeholder {
    cell: CellId,
}

impl Placeholder {
    /// Environment whose innermost binding is this placeholder.
    #[inline]
    pub fn env(&self) -> Env {
        Env::from_cell(self.cell)
    }
}

impl Heap {
    pub fn make_closure(&mut self, entry: usize, env: Env) -> Result<ClosureRef, Fault> {
        let id = self.alloc()?;
        *self.cell_mut(id)? = Cell::Closure { entry, env };
        Ok(ClosureRef::from_cell(id))
    }

    pub fn closure(&self, closure: ClosureRef) -> Result<Closure, Fault> {
        let id = closure.cell();
        match *self.cell(id)? {
            Cell::Closure { entry, env } => Ok(Closure { entry, env }),
            other => Err(Fault::CellKind {
                cell: id.index(),
                expected: "closure",
                found: other.kind_name(),
            }),
        }
    }

    /// Prepend an unfilled binding to `tail`.
    pub fn reserve(&mut self, tail: Env) -> Result<Placeholder, Fault> {
        let cell = self.alloc()?;
        *self.cell_mut(cell)? = Cell::Pending { tail };
        Ok(Placeholder { cell })
    }

    /// Fill a reserved binding with `closure`, returning the finished environment.
    pub fn tie(&mut self, placeholder: Placeholder, closure: ClosureRef) -> Result<Env, Fault> {
        let Placeholder { cell } = placeholder;
        let slot = self.cell_mut(cell)?;
        let current = *slot;
        match current {
            Cell::Pending { tail } => {
                *slot = Cell::Binding {
                    head: Value::Closure(closure),
                    tail,
                };
                Ok(Env::from_cell(cell))
            }
            other => Err(Fault::CellKind {
                cell: cell.index(),
                expected: "pending binding",
                found: other.kind_name(),
            }),
        }
    }

    /// Closure that finds itself at index 0 of its own environment.
    pub fn make_recursive_closure(&mut self, entry: usize, env: Env) -> Result<ClosureRef, Fault> {
        let slot = self.reserve(env)?;
        let closure = self.make_closure(entry, slot.env())?;
        self.tie(slot, closure)?;
        Ok(closure)
    }
}
