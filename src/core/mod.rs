//! Compilation, dependency analysis, scheduling, and play orchestration.

pub mod analyzer;
pub mod compiler;
pub mod edition;
pub mod graph;
pub mod library;
pub mod render;
pub mod scheduler;
pub mod session;
