//! Entity structs for all Aegis domain objects.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! validation.

mod assessment;
mod clause;
mod control;
mod framework;
mod response;

pub use assessment::Assessment;
pub use clause::Clause;
pub use control::Control;
pub use framework::Framework;
pub use response::{Locator, Response};
