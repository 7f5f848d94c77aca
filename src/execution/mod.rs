//! # Execution Primitives
//!
//! Transport-agnostic concurrency building blocks used by the partition
//! scheduler: a bounded dynamic-pull worker pool and a cooperative shutdown
//! signal.

pub mod bounded_executor;
pub mod shutdown;

pub use bounded_executor::BoundedDynamicExecutor;
pub use shutdown::{ShutdownController, ShutdownSignal};
