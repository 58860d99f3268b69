//! # aegis-snapshot
//!
//! Distribution of framework trees through an object-store cache.
//!
//! - [`SnapshotBuilder`] walks a PUBLISHED framework in the content store and
//!   overwrites `{prefix}/{code}.json` with one put.
//! - [`TreeReader`] serves trees from that cache and falls back to walking the
//!   content store on any miss, so a stale or missing cache never blocks reads.
//!
//! Both use the same [`Walker`] with the same depth limit, which is what makes
//! a cache hit and a fallback read produce the same tree.

pub mod builder;
pub mod cache;
pub mod error;
pub mod reader;
pub mod source;
pub mod store;
pub mod walk;

pub use builder::{PublishOutcome, PublishReport, SnapshotBuilder};
pub use cache::{CachedSnapshot, SnapshotCache, SnapshotMeta};
pub use error::SnapshotError;
pub use reader::{TreeOrigin, TreeRead, TreeReader};
pub use source::ContentSource;
pub use store::open_object_store;
pub use walk::{Walk, Walker};
