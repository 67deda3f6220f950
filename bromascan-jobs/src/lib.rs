//! The parallel fan-out driver (§4.7, §5): a fixed-size worker pool over a
//! shared task queue, plus atomic progress counters.
//!
//! This module is part of the `bromascan` crate family.

mod counters;
mod pool;

pub use counters::Counters;
pub use pool::ThreadPool;
