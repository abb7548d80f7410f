//! Application layer: the batch engine and its public operation surface.
//!
//! `BatchEngine` is the single entry point for mutating and querying a
//! batch. It enforces the reentrancy guard and the all-or-nothing semantics
//! of every operation.

pub mod engine;
