//! Application layer: the filter-sort engine and the worker that runs it.
//!
//! `engine` is a pure function of a catalog snapshot and a set of criteria.
//! `worker` moves that work onto a dedicated thread and hands results back over
//! `tokio` channels, one reply per request.

pub mod engine;
pub mod worker;
