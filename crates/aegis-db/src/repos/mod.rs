//! Repository modules implementing persistence for all Aegis entities.
//!
//! Each module adds methods to `AegisService` via `impl AegisService` blocks.

pub mod assessment;
pub mod framework;
pub mod import;
pub mod response;
