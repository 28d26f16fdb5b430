use super::fault::Fault;
use super::heap::{Cell, Heap};
use super::value::{Env, Value};

impl Heap {
    /// Prepend a binding to `env`. `env` itself is left untouched.
    pub fn extend(&mut self, value: Value, env: Env) -> Result<Env, Fault> {
        let id = self.alloc()?;
        *self.cell_mut(id)? = Cell::Binding { head: value, tail: env };
        Ok(Env::from_cell(id))
    }

    /// Value bound `index` links down the chain starting at `env`.
    pub fn lookup(&self, index: usize, env: Env) -> Result<Value, Fault> {
        let mut cursor = env;
        let mut depth = 0;
        loop {
            let id = cursor.cell().ok_or(Fault::Unbound { index, depth })?;
            let (head, tail) = match *self.cell(id)? {
                Cell::Binding { head, tail } => (Some(head), tail),
                Cell::Pending { tail } => (None, tail),
                other => {
                    return Err(Fault::CellKind {
                        cell: id.index(),
                        expected: "binding",
                        found: other.kind_name(),
                    });
                }
            };
            if depth == index {
                return head.ok_or(Fault::Untied { index });
            }
            depth += 1;
            cursor = tail;
        }
    }

    /// Number of bindings reachable from `env`.
    pub fn env_depth(&self, env: Env) -> Result<usize, Fault> {
        let mut cursor = env;
        let mut depth = 0;
        while let Some(id) = cursor.cell() {
            cursor = match *self.cell(id)? {
                Cell::Binding { tail, .. } | Cell::Pending { tail } => tail,
                other => {
                    return Err(Fault::CellKind {
                        cell: id.index(),
                        expected: "binding",
                        found: other.kind_name(),
                    });
                }
            };
            depth += 1;
        }
        Ok(depth)
    }
}
