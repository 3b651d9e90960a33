//! Seeded randomness for demand sampling
//!
//! A single xorshift64* stream owned by the orchestrator. Its state is
//! part of every checkpoint, so nothing else may draw random numbers.

mod xorshift;

pub use xorshift::RngManager;
