//! Fixed-capacity cell arena backing environments and closures.
//!
//! Cells are handed out by a monotonic cursor and never freed individually;
//! the whole arena goes away when the [`Heap`] is dropped.

use tracing::trace;

use super::fault::{Fault, Segment};
use super::value::{CellId, Env, Value};

const TRACE_TARGET: &str = "secd::vm::heap";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) enum Cell {
    /// Freshly allocated, not yet written.
    #[default]
    Vacant,
    /// Binding reserved for a recursive closure; the head is filled in by `tie`.
    Pending { tail: Env },
    Binding { head: Value, tail: Env },
    Closure { entry: usize, env: Env },
}

impl Cell {
    pub(super) const fn kind_name(&self) -> &'static str {
        match self {
            Cell::Vacant => "vacant cell",
            Cell::Pending { .. } => "pending binding",
            Cell::Binding { .. } => "binding",
            Cell::Closure { .. } => "closure",
        }
    }
}

#[derive(Debug)]
pub struct Heap {
    cells: Vec<Cell>,
    capacity: usize,
}

impl Heap {
    /// Reserve room for exactly `capacity` cells.
    pub fn with_capacity(capacity: usize) -> Result<Self, Fault> {
        let mut cells = Vec::new();
        cells.try_reserve_exact(capacity).map_err(|_| Fault::Reserve {
            segment: Segment::Heap,
            capacity,
        })?;
        trace!(target: TRACE_TARGET, capacity, "heap.init");
        Ok(Self { cells, capacity })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cells handed out so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.cells.len()
    }

    /// Hand out the next vacant cell.
    pub(super) fn alloc(&mut self) -> Result<CellId, Fault> {
        if self.cells.len() >= self.capacity {
            return Err(Fault::Exhausted {
                segment: Segment::Heap,
                capacity: self.capacity,
            });
        }
        let id = CellId::new(self.cells.len());
        self.cells.push(Cell::Vacant);
        Ok(id)
    }

    pub(super) fn cell(&self, id: CellId) -> Result<&Cell, Fault> {
        self.cells.get(id.index()).ok_or(Fault::Dangling { cell: id.index() })
    }

    pub(super) fn cell_mut(&mut self, id: CellId) -> Result<&mut Cell, Fault> {
        self.cells
            .get_mut(id.index())
            .ok_or(Fault::Dangling { cell: id.index() })
    }
}
