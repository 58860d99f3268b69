//! # aegis-core
//!
//! Core types and pure logic for Aegis.
//!
//! This crate provides the foundational types shared across all Aegis crates:
//! - Entity structs for frameworks, clauses, controls, assessments, responses
//! - Status enums with state machine transitions
//! - ID prefix constants
//! - Cross-cutting error types
//! - Snapshot wire documents
//! - The framework tree arena, its linear projection, and score/maturity
//!   aggregation

pub mod entities;
pub mod enums;
pub mod errors;
pub mod fields;
pub mod ids;
pub mod projection;
pub mod scoring;
pub mod snapshot;
pub mod tree;
