//! Ten Match (workspace facade crate).
//!
//! Re-exports the workspace crates as `tenmatch::{core, adapter, term, input, types}`
//! while the implementation lives in dedicated crates under `crates/`.

pub use tenmatch_adapter as adapter;
pub use tenmatch_core as core;
pub use tenmatch_input as input;
pub use tenmatch_term as term;
pub use tenmatch_types as types;
