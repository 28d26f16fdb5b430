pub mod config;

// Heap, environments, closures and the dispatch loop
pub mod vm;

pub use config::Capacities;
pub use vm::{Machine, Trap, Value, execute};
