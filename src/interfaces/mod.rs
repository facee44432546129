//! Adapters between the outside world and the engine: the JSON request and
//! response messages exchanged with the worker, and CSV catalogs for the CLI.

pub mod csv;
pub mod json;
