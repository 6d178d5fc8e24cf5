//! Background Tasks Module
//!
//! Tasks that drive cache cleanup independently of store/retrieve traffic.
//!
//! # Tasks
//! - Periodic sweep: runs intelligent cleanup at a configured interval
//! - Memory pressure: sheds Low and expired entries on each low-memory signal

mod cleanup;
mod memory;

pub use cleanup::spawn_cleanup_task;
pub use memory::{spawn_memory_pressure_responder, MemoryPressureSignal, MemoryWarning};
